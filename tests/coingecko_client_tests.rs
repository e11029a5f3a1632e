use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::json;
use warp::http::StatusCode;
use warp::Filter;

use btc_whatif::services::coingecko::{CoinGeckoClient, PriceSource};
use btc_whatif::services::errors::FetchError;

/// Serves `status` + `body` for every request on an ephemeral port and
/// counts requests that carried `Accept: application/json`.
fn stub_server(status: StatusCode, body: serde_json::Value) -> (SocketAddr, Arc<AtomicUsize>) {
    let json_requests = Arc::new(AtomicUsize::new(0));
    let counter = json_requests.clone();

    let route = warp::any()
        .and(warp::header::optional::<String>("accept"))
        .map(move |accept: Option<String>| {
            if accept.as_deref() == Some("application/json") {
                counter.fetch_add(1, Ordering::SeqCst);
            }
            warp::reply::with_status(warp::reply::json(&body), status)
        });

    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    (addr, json_requests)
}

fn client_for(addr: SocketAddr) -> CoinGeckoClient {
    CoinGeckoClient::new(format!("http://{}/api/v3/", addr)).unwrap()
}

#[tokio::test]
async fn decodes_market_chart_in_timestamp_order() {
    let (addr, json_requests) = stub_server(
        StatusCode::OK,
        json!({
            "prices": [
                [1700086400000.0, 36500.25],
                [1700000000000.0, 35000.0],
                [1700172800000.0, 37000.5]
            ],
            "market_caps": [],
            "total_volumes": []
        }),
    );

    let series = client_for(addr).price_series().await.unwrap();
    let prices: Vec<f64> = series.points().iter().map(|p| p.price).collect();
    assert_eq!(prices, vec![35000.0, 36500.25, 37000.5]);
    assert_eq!(series.first().unwrap().timestamp_ms, 1_700_000_000_000);
    assert_eq!(json_requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn decodes_simple_price() {
    let (addr, _) = stub_server(StatusCode::OK, json!({ "bitcoin": { "usd": 64123.5 } }));
    assert_eq!(client_for(addr).current_price().await, Ok(64123.5));
}

#[tokio::test]
async fn http_429_is_rate_limited() {
    let (addr, _) = stub_server(
        StatusCode::TOO_MANY_REQUESTS,
        json!({ "status": { "error_code": 429, "error_message": "You've exceeded the Rate Limit" } }),
    );
    assert_eq!(client_for(addr).price_series().await, Err(FetchError::RateLimited));
}

#[tokio::test]
async fn upstream_error_carries_body_message() {
    let (addr, _) = stub_server(StatusCode::NOT_FOUND, json!({ "error": "coin not found" }));
    assert_eq!(
        client_for(addr).current_price().await,
        Err(FetchError::UpstreamError { status: 404, message: "coin not found".into() })
    );
}

#[tokio::test]
async fn unexpected_body_is_a_network_error() {
    let (addr, _) = stub_server(StatusCode::OK, json!({ "unexpected": true }));
    assert!(matches!(
        client_for(addr).price_series().await,
        Err(FetchError::NetworkError(_))
    ));
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() {
    // Bind and drop to get a port with nothing listening on it.
    let addr = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    assert!(matches!(
        client_for(addr).current_price().await,
        Err(FetchError::NetworkError(_))
    ));
}

#[test]
fn cache_keys_include_base_url() {
    let client = CoinGeckoClient::new("http://prices.local/api/v3/").unwrap();
    assert_eq!(client.base_url(), "http://prices.local/api/v3");
    assert!(client.series_key().starts_with("http://prices.local/api/v3/coins/bitcoin/market_chart"));
    assert!(client.current_price_key().ends_with("/simple/price?ids=bitcoin&vs_currencies=usd"));
}
