use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use property_finder::geocode::{GeocodeProvider, Geocoder, Pacer, ProviderError, Throttle};
use property_finder::listing::{Coordinate, Listing};
use property_finder::query::Catalog;
use property_finder::server::{build_router, AppState};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// Resolves a fixed set of addresses; everything else has no match.
struct FixedProvider {
    calls: Arc<AtomicUsize>,
}

impl GeocodeProvider for FixedProvider {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn lookup(&self, address: &str) -> Result<Option<Coordinate>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let coordinate = match address {
            "Herzl 12, Haifa, Israel" => Coordinate::new(32.8072, 35.0432),
            "Hanassi 7, Haifa, Israel" => Coordinate::new(32.8022, 35.0482),
            "Moriah 101, Haifa, Israel" => Coordinate::new(32.7800, 35.0100),
            _ => None,
        };
        Ok(coordinate)
    }
}

struct NoPause;

impl Pacer for NoPause {
    fn pause(&self, _duration: Duration) {}
}

fn app() -> (axum::Router, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = FixedProvider {
        calls: calls.clone(),
    };
    let throttle = Throttle::with_pacer(Duration::from_secs(1), Box::new(NoPause));
    let geocoder = Geocoder::new(Box::new(provider), throttle).with_country(Some("Israel".into()));

    let listings = vec![
        Listing::new("Haifa", "Herzl", "12")
            .with_price(1_600_000.0)
            .with_rooms(3.0),
        Listing::new("Haifa", "Hanassi", "7")
            .with_price(1_900_000.0)
            .with_rooms(4.0),
        Listing::new("Haifa", "Moriah", "101")
            .with_price(2_500_000.0)
            .with_rooms(5.0),
        Listing::new("Haifa", "Nowhere", "1").with_price(1_000_000.0),
    ];
    let catalog = Catalog::from_listings(listings, geocoder);
    (build_router(Arc::new(AppState::new(catalog))), calls)
}

async fn send(router: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_call(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/tools/call")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let (router, _) = app();
    let (status, body) = send(router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn lists_both_tools() {
    let (router, calls) = app();
    let (status, body) = send(router, get("/api/tools")).await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = body["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|tool| tool["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["find_closest_properties", "property_statistics"]);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn find_closest_returns_text_report() {
    let (router, calls) = app();
    let (status, body) = send(
        router,
        post_call(json!({ "name": "find_closest_properties", "arguments": {} })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isError"], false);
    assert_eq!(body["content"][0]["type"], "text");

    let text = body["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("Closest to Clinic:\n1. Herzl 12, Haifa"));
    assert!(text.contains("Closest to School:\n1. Hanassi 7, Haifa"));
    assert!(!text.contains("Moriah"));
    assert!(text.contains("Found 3 properties out of 4 total"));
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn unknown_location_type_is_rejected_before_geocoding() {
    let (router, calls) = app();
    let (status, body) = send(
        router,
        post_call(json!({
            "name": "find_closest_properties",
            "arguments": { "location_type": "park" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("park"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unknown_tool_is_rejected() {
    let (router, _) = app();
    let (status, body) = send(router, post_call(json!({ "name": "sell_house" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn statistics_view_is_structured() {
    let (router, _) = app();
    let (status, body) = send(router, get("/api/statistics")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 4);
    assert_eq!(body["resolved"], 3);
    assert_eq!(body["price"]["count"], 4);
    assert_eq!(body["rooms"]["count"], 3);
    assert_eq!(body["rooms"]["min"], 3.0);
}

#[tokio::test]
async fn closest_view_single_target_unfiltered() {
    let (router, _) = app();
    let (status, body) = send(
        router,
        get("/api/closest?location_type=school&unfiltered=true"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let sections = body["sections"].as_array().unwrap();
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0]["target"]["name"], "school");

    let results = sections[0]["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["listing"]["street"], "Hanassi");
    assert_eq!(results[2]["listing"]["street"], "Moriah");
    assert!(results[0]["distance_m"].as_f64().unwrap() < 50.0);
}
