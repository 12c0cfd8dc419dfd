use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which hotel-listing prefix matched the query. The two prefixes produce
/// different verbatim listing headers, so the distinction survives
/// classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HotelListingPhrasing {
    HotelsIn,
    HotelsFoundIn,
}

/// Classified category of an inbound query.
///
/// Derived deterministically from the query text; identical input always
/// yields the identical variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    ListCities,
    HotelsByLocation {
        location: String,
        phrasing: HotelListingPhrasing,
    },
    /// No pattern matched; carries the original, non-normalized text for the
    /// generative fallback.
    Unclassified { original: String },
}

impl Intent {
    pub fn kind(&self) -> IntentKind {
        match self {
            Intent::ListCities => IntentKind::ListCities,
            Intent::HotelsByLocation { .. } => IntentKind::HotelsByLocation,
            Intent::Unclassified { .. } => IntentKind::Unclassified,
        }
    }
}

/// Payload-free view of an intent, used for logging and response metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    ListCities,
    HotelsByLocation,
    Unclassified,
}

/// One row of hotel inventory. Owned by the catalog store; the router only
/// reads projections of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelRecord {
    pub name: String,
    pub location: String,
    pub price_tier: String,
    pub checkin_date: NaiveDate,
    pub checkout_date: NaiveDate,
    pub booked: bool,
}

/// Where the reply text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    /// Answered deterministically from the catalog.
    Catalog,
    /// Generative fallback answered verbatim.
    Fallback,
    /// A collaborator was empty or unavailable; a fixed degraded-service
    /// message was substituted.
    Degraded,
}

/// Final outcome of routing one query. Produced once per request, returned to
/// the transport layer, never retained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutedReply {
    pub reply_text: String,
    pub intent: IntentKind,
    pub source: ReplySource,
}
