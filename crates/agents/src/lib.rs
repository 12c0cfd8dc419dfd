use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument, warn};
use wayfinder_catalog::HotelInventory;
use wayfinder_core::{
    ai_error_message, classify_query, format_city_list, format_hotel_listing, no_hotels_message,
    HotelListingPhrasing, Intent, IntentKind, ReplySource, RoutedReply, AI_INVALID_RESPONSE_MESSAGE,
    AI_UNCONFIGURED_MESSAGE, STORE_UNREACHABLE_MESSAGE, TRAVEL_SYSTEM_INSTRUCTION,
};
use wayfinder_genai::{CompletionProvider, FallbackError};
use wayfinder_observability::AppMetrics;

/// Routes one free-text query: classify against the fixed grammar, answer
/// from the catalog, or hand off to the generative fallback.
///
/// Constructed once at startup and passed into the request path explicitly;
/// holds no per-request state. `route` never fails — collaborator errors are
/// recovered into degraded reply text here.
#[derive(Clone)]
pub struct TravelAgent<S, F>
where
    S: HotelInventory,
    F: CompletionProvider,
{
    store: Arc<S>,
    fallback: Arc<F>,
    metrics: Arc<AppMetrics>,
}

impl<S, F> TravelAgent<S, F>
where
    S: HotelInventory,
    F: CompletionProvider,
{
    pub fn new(store: Arc<S>, fallback: Arc<F>, metrics: Arc<AppMetrics>) -> Self {
        Self {
            store,
            fallback,
            metrics,
        }
    }

    pub fn fallback_configured(&self) -> bool {
        self.fallback.is_configured()
    }

    #[instrument(skip(self, query))]
    pub async fn route(&self, query: &str) -> RoutedReply {
        let started = Instant::now();
        self.metrics.inc_request();

        let intent = classify_query(query);
        let kind = intent.kind();

        let reply = match intent {
            Intent::ListCities => self.list_cities_reply().await,
            Intent::HotelsByLocation { location, phrasing } => {
                self.hotel_listing_reply(&location, phrasing).await
            }
            Intent::Unclassified { original } => self.fallback_reply(&original).await,
        };

        self.metrics.observe_latency(started.elapsed());
        info!(intent = ?kind, source = ?reply.source, "query routed");
        reply
    }

    async fn list_cities_reply(&self) -> RoutedReply {
        match self.store.list_cities().await {
            Ok(cities) if !cities.is_empty() => {
                self.metrics.add_catalog_rows(cities.len());
                catalog_reply(format_city_list(&cities), IntentKind::ListCities)
            }
            Ok(_) => self.degraded(STORE_UNREACHABLE_MESSAGE.to_string(), IntentKind::ListCities),
            Err(error) => {
                warn!(%error, "city lookup failed");
                self.degraded(STORE_UNREACHABLE_MESSAGE.to_string(), IntentKind::ListCities)
            }
        }
    }

    async fn hotel_listing_reply(
        &self,
        location: &str,
        phrasing: HotelListingPhrasing,
    ) -> RoutedReply {
        match self.store.hotels_by_location(location).await {
            Ok(hotels) if !hotels.is_empty() => {
                self.metrics.add_catalog_rows(hotels.len());
                catalog_reply(
                    format_hotel_listing(phrasing, location, &hotels),
                    IntentKind::HotelsByLocation,
                )
            }
            // Empty result and store failure deliberately read the same.
            Ok(_) => self.degraded(no_hotels_message(location), IntentKind::HotelsByLocation),
            Err(error) => {
                warn!(%error, location, "hotel lookup failed");
                self.degraded(no_hotels_message(location), IntentKind::HotelsByLocation)
            }
        }
    }

    async fn fallback_reply(&self, original: &str) -> RoutedReply {
        self.metrics.inc_fallback();

        match self
            .fallback
            .complete(TRAVEL_SYSTEM_INSTRUCTION, original)
            .await
        {
            Ok(text) => RoutedReply {
                reply_text: text,
                intent: IntentKind::Unclassified,
                source: ReplySource::Fallback,
            },
            Err(FallbackError::Unconfigured) => {
                self.degraded(AI_UNCONFIGURED_MESSAGE.to_string(), IntentKind::Unclassified)
            }
            Err(FallbackError::EmptyResponse) => self.degraded(
                AI_INVALID_RESPONSE_MESSAGE.to_string(),
                IntentKind::Unclassified,
            ),
            Err(FallbackError::Request(detail)) => {
                warn!(detail, "fallback call failed");
                self.degraded(ai_error_message(&detail), IntentKind::Unclassified)
            }
        }
    }

    fn degraded(&self, reply_text: String, intent: IntentKind) -> RoutedReply {
        self.metrics.inc_degraded();
        RoutedReply {
            reply_text,
            intent,
            source: ReplySource::Degraded,
        }
    }
}

fn catalog_reply(reply_text: String, intent: IntentKind) -> RoutedReply {
    RoutedReply {
        reply_text,
        intent,
        source: ReplySource::Catalog,
    }
}
