pub mod intent;
pub mod models;
pub mod reply;

pub use intent::{classify_query, normalize_query};
pub use models::*;
pub use reply::{
    ai_error_message, format_city_list, format_hotel_listing, no_hotels_message, title_case,
    AI_INVALID_RESPONSE_MESSAGE, AI_UNCONFIGURED_MESSAGE, STORE_UNREACHABLE_MESSAGE,
    TRAVEL_SYSTEM_INSTRUCTION,
};
