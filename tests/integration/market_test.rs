//! Ranked market endpoint

use crate::common::{assert_cors, send, state_with, MockUpstream};
use axum::http::StatusCode;
use kalshi_gateway::market::RawMarket;
use kalshi_gateway::proxy::router;
use serde_json::json;

fn market(ticker: &str, volume_24h: i64, liquidity: i64, open_interest: i64, close_time: &str) -> RawMarket {
    serde_json::from_value(json!({
        "ticker": ticker,
        "title": format!("Will {} resolve yes?", ticker),
        "status": "open",
        "yes_ask": 60,
        "no_ask": 42,
        "last_price": 60,
        "previous_price": 50,
        "volume_24h": volume_24h,
        "liquidity": liquidity,
        "open_interest": open_interest,
        "close_time": close_time,
    }))
    .unwrap()
}

fn sample_markets() -> Vec<RawMarket> {
    vec![
        market("SMALL", 10, 100, 5, "2099-03-01T00:00:00Z"),
        market("BIG", 50_000, 0, 0, "2099-01-01T00:00:00Z"),
        market("DEEP", 1_000, 1_000_000, 500_000, "2099-02-01T00:00:00Z"),
        market("DEAD", 0, 0, 0, "2099-01-01T00:00:00Z"),
        market("PAST", 500, 10, 10, "2001-01-01T00:00:00Z"),
    ]
}

fn tickers(json: &serde_json::Value) -> Vec<String> {
    json.as_array()
        .unwrap()
        .iter()
        .map(|m| m["ticker"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_trending_view() {
    let upstream = MockUpstream::responding(StatusCode::OK, "{}");
    let app = router(state_with(upstream.clone(), None, sample_markets()));

    let response = send(app, "GET", "/api/markets/trending", "").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_cors(&response.headers);
    let json = response.json();
    assert_eq!(tickers(&json), vec!["BIG", "DEEP", "PAST", "SMALL"]);

    let first = &json[0];
    assert_eq!(first["id"], "BIG");
    assert_eq!(first["yesPrice"], 0.6);
    assert_eq!(first["noPrice"], 0.42);
    assert_eq!(first["change24h"], 0.2);
    assert_eq!(first["volume24h"], 50_000);
    assert_eq!(first["outcomes"], json!(["Yes", "No"]));
    assert_eq!(first["outcomePrices"], json!(["0.60", "0.42"]));
    assert_eq!(upstream.calls(), 0);
}

#[tokio::test]
async fn test_ending_soon_skips_closed_times() {
    let upstream = MockUpstream::responding(StatusCode::OK, "{}");
    let app = router(state_with(upstream, None, sample_markets()));

    let response = send(app, "GET", "/api/markets/ending-soon?limit=2", "").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(tickers(&response.json()), vec!["BIG", "DEEP"]);
}

#[tokio::test]
async fn test_hot_view() {
    let upstream = MockUpstream::responding(StatusCode::OK, "{}");
    let app = router(state_with(upstream, None, sample_markets()));

    let response = send(app, "GET", "/api/markets/hot?limit=1", "").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(tickers(&response.json()), vec!["DEEP"]);
}

#[tokio::test]
async fn test_unknown_view_is_404() {
    let upstream = MockUpstream::responding(StatusCode::OK, "{}");
    let app = router(state_with(upstream, None, sample_markets()));

    let response = send(app, "GET", "/api/markets/cold", "").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.json()["error"].is_string());
    assert_cors(&response.headers);
}
