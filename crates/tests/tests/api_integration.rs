use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use serde_json::json;
use tower::ServiceExt;
use wayfinder_agents::TravelAgent;
use wayfinder_api::{build_router, ApiState};
use wayfinder_catalog::{HotelInventory, Store};
use wayfinder_core::HotelRecord;
use wayfinder_genai::{GeminiClient, GeminiConfig};
use wayfinder_observability::AppMetrics;

fn hotel(name: &str, location: &str, booked: bool) -> HotelRecord {
    HotelRecord {
        name: name.to_string(),
        location: location.to_string(),
        price_tier: "mid".to_string(),
        checkin_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        checkout_date: NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
        booked,
    }
}

/// Router over a seeded in-memory catalog and an unconfigured fallback, so
/// every reply is deterministic.
async fn seeded_app() -> Router {
    let store = Store::memory();
    store.upsert_hotel(hotel("Lakeview", "Zurich", true)).await.unwrap();
    store.upsert_hotel(hotel("Pine Lodge", "Bern", false)).await.unwrap();

    let metrics = AppMetrics::shared();
    let fallback = GeminiClient::new(GeminiConfig::default()).unwrap();
    let agent = Arc::new(TravelAgent::new(
        Arc::new(store),
        Arc::new(fallback),
        metrics.clone(),
    ));

    build_router(ApiState {
        agent,
        metrics,
        sqlite_catalog: false,
    })
}

async fn post_query(app: Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/query_ai")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed = serde_json::from_slice(&bytes).unwrap();
    (status, parsed)
}

#[tokio::test]
async fn health_is_public() {
    let app = seeded_app().await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(parsed["status"], "ok");
    assert_eq!(parsed["capabilities"]["generative_fallback"], false);
}

#[tokio::test]
async fn missing_query_field_is_rejected() {
    let app = seeded_app().await;
    let (status, body) = post_query(app, json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No query provided in the request body.");
}

#[tokio::test]
async fn empty_query_is_rejected() {
    let app = seeded_app().await;
    let (status, _) = post_query(app, json!({ "query": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn city_list_payload_is_exact() {
    let app = seeded_app().await;
    let (status, body) = post_query(app, json!({ "query": "list cities" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Available cities: Bern, Zurich.");
    assert_eq!(body["intent"], "list_cities");
    assert_eq!(body["source"], "catalog");
}

#[tokio::test]
async fn hotel_listing_payload_is_exact() {
    let app = seeded_app().await;
    let (status, body) = post_query(app, json!({ "query": "HOTELS IN zurich" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["response"],
        "Hotels in Zurich:\n- Lakeview (mid) - Check-in: 2024-05-01, Check-out: 2024-05-03 Status: Booked"
    );
}

#[tokio::test]
async fn find_prefix_uses_found_header() {
    let app = seeded_app().await;
    let (_, body) = post_query(app, json!({ "query": "find hotels in bern" })).await;

    assert_eq!(
        body["response"],
        "Hotels found in Bern:\n- Pine Lodge (mid) - Check-in: 2024-05-01, Check-out: 2024-05-03 Status: Available"
    );
}

#[tokio::test]
async fn unknown_city_reports_no_hotels() {
    let app = seeded_app().await;
    let (_, body) = post_query(app, json!({ "query": "hotels in atlantis" })).await;

    assert_eq!(
        body["response"],
        "No hotels found in Atlantis in our database, or an error occurred."
    );
    assert_eq!(body["source"], "degraded");
}

#[tokio::test]
async fn unclassified_without_credentials_reports_ai_unavailable() {
    let app = seeded_app().await;
    let (status, body) = post_query(app, json!({ "query": "what is Bern famous for?" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["response"],
        "AI functionality is not available due to missing or invalid API key."
    );
    assert_eq!(body["intent"], "unclassified");
}
