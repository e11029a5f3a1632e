// src/services/coingecko.rs
use async_trait::async_trait;
use log::{debug, info};
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::models::{MarketChartResponse, PriceSeries, SimplePriceResponse};
use super::errors::FetchError;

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const MARKET_CHART_PATH: &str = "/coins/bitcoin/market_chart?vs_currency=usd&days=365&interval=daily";
pub const SIMPLE_PRICE_PATH: &str = "/simple/price?ids=bitcoin&vs_currencies=usd";

/// Source of Bitcoin prices. Each call is exactly one request; retrying and
/// caching are layered on top by the callers.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Daily USD prices over the trailing 365 days.
    async fn price_series(&self) -> Result<PriceSeries, FetchError>;

    /// Latest USD price.
    async fn current_price(&self) -> Result<f64, FetchError>;

    /// Cache key for the price series request (endpoint + params).
    fn series_key(&self) -> String {
        MARKET_CHART_PATH.to_string()
    }

    /// Cache key for the current price request (endpoint + params).
    fn current_price_key(&self) -> String {
        SIMPLE_PRICE_PATH.to_string()
    }
}

pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
}

impl CoinGeckoClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent("btc-whatif/0.1")
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        info!("Fetching price data from URL: {}", url);

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("Price API responded with HTTP {} ({} bytes)", status, body.len());

        if !status.is_success() {
            return Err(classify_failure(status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| FetchError::NetworkError(format!("failed to decode response from {}: {}", url, e)))
    }
}

#[async_trait]
impl PriceSource for CoinGeckoClient {
    async fn price_series(&self) -> Result<PriceSeries, FetchError> {
        let chart: MarketChartResponse = self.get_json(MARKET_CHART_PATH).await?;
        let series = PriceSeries::from(chart);
        info!("Received {} daily Bitcoin prices", series.len());
        Ok(series)
    }

    async fn current_price(&self) -> Result<f64, FetchError> {
        let quote: SimplePriceResponse = self.get_json(SIMPLE_PRICE_PATH).await?;
        info!("Current Bitcoin price: {}", quote.bitcoin.usd);
        Ok(quote.bitcoin.usd)
    }

    fn series_key(&self) -> String {
        format!("{}{}", self.base_url, MARKET_CHART_PATH)
    }

    fn current_price_key(&self) -> String {
        format!("{}{}", self.base_url, SIMPLE_PRICE_PATH)
    }
}

/// Maps a non-success response onto a `FetchError`.
pub fn classify_failure(status: StatusCode, body: &str) -> FetchError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return FetchError::RateLimited;
    }
    let message = extract_error_message(body)
        .unwrap_or_else(|| format!("price API request failed with status {}", status));
    FetchError::UpstreamError { status: status.as_u16(), message }
}

/// Pulls a human readable message out of an error body, if it is JSON and
/// carries one in any of the shapes the API is known to use.
pub fn extract_error_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;

    let candidates = [
        json.get("error"),
        json.get("error_message"),
        json.get("message"),
        json.pointer("/status/error_message"),
        json.pointer("/status/error"),
    ];

    let message = candidates
        .into_iter()
        .flatten()
        .filter_map(|v| v.as_str())
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string);
    message
}
