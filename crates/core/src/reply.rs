use crate::models::{HotelListingPhrasing, HotelRecord};

/// Degraded-service message when the catalog store yields nothing or fails.
pub const STORE_UNREACHABLE_MESSAGE: &str =
    "Could not retrieve city list from database. Please ensure the database is running and accessible.";

/// Fixed message when the fallback model has no usable credential.
pub const AI_UNCONFIGURED_MESSAGE: &str =
    "AI functionality is not available due to missing or invalid API key.";

/// Fixed message when the fallback model answered without usable text.
pub const AI_INVALID_RESPONSE_MESSAGE: &str = "Gemini AI did not return a valid response.";

/// System instruction pinning the fallback model to travel topics.
pub const TRAVEL_SYSTEM_INSTRUCTION: &str = "You are a travel agent. Only answer questions about country, state, cities, places in cities and what it is like to visit there or famous for, hotels/resorts/stays, travel planning, price details and travel related details of country. If a question is outside of this context, respond with: 'Hi, I'm an travel Agent and ask me question only about travel/country/state/city/stay/travel planning related details. Thank you!'";

/// Title-case a location for display: uppercase the first alphabetic
/// character after any non-alphabetic one, lowercase the rest. Matches
/// Python's `str.title()`, which the listing headers were shaped by.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_word_start = true;

    for ch in value.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }

    out
}

/// `"Available cities: Bern, Geneva, Zurich."`
pub fn format_city_list(cities: &[String]) -> String {
    format!("Available cities: {}.", cities.join(", "))
}

fn listing_header(phrasing: HotelListingPhrasing, location: &str) -> String {
    match phrasing {
        HotelListingPhrasing::HotelsIn => format!("Hotels in {}:", title_case(location)),
        HotelListingPhrasing::HotelsFoundIn => {
            format!("Hotels found in {}:", title_case(location))
        }
    }
}

fn listing_line(hotel: &HotelRecord) -> String {
    let status = if hotel.booked { "Booked" } else { "Available" };
    format!(
        "- {} ({}) - Check-in: {}, Check-out: {} Status: {}",
        hotel.name, hotel.price_tier, hotel.checkin_date, hotel.checkout_date, status
    )
}

/// Header line plus one line per record, newline-joined, no trailing newline.
/// `NaiveDate` displays as ISO `YYYY-MM-DD`, which is the wire contract.
pub fn format_hotel_listing(
    phrasing: HotelListingPhrasing,
    location: &str,
    hotels: &[HotelRecord],
) -> String {
    let mut lines = Vec::with_capacity(hotels.len() + 1);
    lines.push(listing_header(phrasing, location));
    lines.extend(hotels.iter().map(listing_line));
    lines.join("\n")
}

/// Deliberately the same text for "no such city" and "query failed".
pub fn no_hotels_message(location: &str) -> String {
    format!(
        "No hotels found in {} in our database, or an error occurred.",
        title_case(location)
    )
}

/// Runtime fallback failure, with the underlying detail surfaced.
pub fn ai_error_message(detail: &str) -> String {
    format!("Error communicating with AI: {detail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn hotel(name: &str, booked: bool) -> HotelRecord {
        HotelRecord {
            name: name.to_string(),
            location: "Zurich".to_string(),
            price_tier: "mid".to_string(),
            checkin_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            checkout_date: NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
            booked,
        }
    }

    #[test]
    fn city_list_is_comma_joined_with_trailing_period() {
        let cities = vec!["Bern".to_string(), "Geneva".to_string(), "Zurich".to_string()];
        assert_eq!(format_city_list(&cities), "Available cities: Bern, Geneva, Zurich.");
    }

    #[test]
    fn single_city_list_shape() {
        assert_eq!(
            format_city_list(&["Basel".to_string()]),
            "Available cities: Basel."
        );
    }

    #[test]
    fn hotel_line_shape_is_exact() {
        let listing = format_hotel_listing(
            HotelListingPhrasing::HotelsIn,
            "zurich",
            &[hotel("Lakeview", true)],
        );
        assert_eq!(
            listing,
            "Hotels in Zurich:\n- Lakeview (mid) - Check-in: 2024-05-01, Check-out: 2024-05-03 Status: Booked"
        );
    }

    #[test]
    fn find_phrasing_uses_found_header() {
        let listing = format_hotel_listing(
            HotelListingPhrasing::HotelsFoundIn,
            "zurich",
            &[hotel("Lakeview", false)],
        );
        assert!(listing.starts_with("Hotels found in Zurich:\n"));
        assert!(listing.ends_with("Status: Available"));
    }

    #[test]
    fn listing_has_no_trailing_newline() {
        let listing = format_hotel_listing(
            HotelListingPhrasing::HotelsIn,
            "zurich",
            &[hotel("A", false), hotel("B", true)],
        );
        assert!(!listing.ends_with('\n'));
        assert_eq!(listing.lines().count(), 3);
    }

    #[test]
    fn no_hotels_message_title_cases_location() {
        assert_eq!(
            no_hotels_message("atlantis"),
            "No hotels found in Atlantis in our database, or an error occurred."
        );
    }

    #[test]
    fn title_case_handles_multi_word_and_punctuation() {
        assert_eq!(title_case("new york"), "New York");
        assert_eq!(title_case("st. moritz"), "St. Moritz");
        assert_eq!(title_case("aix-en-provence"), "Aix-En-Provence");
        assert_eq!(title_case(""), "");
    }
}
