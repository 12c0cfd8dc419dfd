use crate::models::{HotelListingPhrasing, Intent};

/// Lowercase and trim, nothing else. Matching is case- and edge-whitespace-
/// insensitive but interior whitespace and punctuation pass through
/// untouched.
pub fn normalize_query(input: &str) -> String {
    input.trim().to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Exact(&'static str),
    Prefix(&'static str),
}

impl Pattern {
    /// Returns the captured remainder on a match: the text after the prefix,
    /// or an empty capture for an exact match.
    fn matches<'a>(self, normalized: &'a str) -> Option<&'a str> {
        match self {
            Pattern::Exact(literal) => (normalized == literal).then_some(""),
            Pattern::Prefix(prefix) => normalized.strip_prefix(prefix),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum RuleTarget {
    ListCities,
    HotelListing(HotelListingPhrasing),
}

/// First match wins. The order is a contract: patterns may overlap, and a
/// query like "find hotels in bern" must reach the fourth rule untouched by
/// the third.
const CLASSIFICATION_RULES: &[(Pattern, RuleTarget)] = &[
    (Pattern::Exact("list cities"), RuleTarget::ListCities),
    (Pattern::Exact("show cities"), RuleTarget::ListCities),
    (
        Pattern::Prefix("hotels in "),
        RuleTarget::HotelListing(HotelListingPhrasing::HotelsIn),
    ),
    (
        Pattern::Prefix("find hotels in "),
        RuleTarget::HotelListing(HotelListingPhrasing::HotelsFoundIn),
    ),
];

/// Classify a raw query against the ordered rule list.
///
/// Pure: no state, no randomness. The unclassified variant keeps the
/// original text untouched because the fallback model receives it verbatim.
pub fn classify_query(original: &str) -> Intent {
    let normalized = normalize_query(original);

    for (pattern, target) in CLASSIFICATION_RULES {
        if let Some(capture) = pattern.matches(&normalized) {
            return match target {
                RuleTarget::ListCities => Intent::ListCities,
                RuleTarget::HotelListing(phrasing) => Intent::HotelsByLocation {
                    location: capture.trim().to_string(),
                    phrasing: *phrasing,
                },
            };
        }
    }

    Intent::Unclassified {
        original: original.to_string(),
    }
}
