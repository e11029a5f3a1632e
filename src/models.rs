// src/models.rs
use serde::{Serialize, Deserialize};
use chrono::{DateTime, TimeZone, Utc};

/// One daily sample from the market chart endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp_ms: i64,
    pub price: f64,
}

impl PricePoint {
    pub fn time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp_ms).single()
    }
}

/// Price history for the fixed trailing window, ascending by timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.timestamp_ms);
        Self { points }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Wire shape of `/coins/bitcoin/market_chart`.
#[derive(Debug, Deserialize)]
pub struct MarketChartResponse {
    pub prices: Vec<(f64, f64)>,
}

impl From<MarketChartResponse> for PriceSeries {
    fn from(resp: MarketChartResponse) -> Self {
        PriceSeries::new(
            resp.prices
                .into_iter()
                .map(|(ts, price)| PricePoint { timestamp_ms: ts as i64, price })
                .collect(),
        )
    }
}

/// Wire shape of `/simple/price?ids=bitcoin&vs_currencies=usd`.
#[derive(Debug, Deserialize)]
pub struct SimplePriceResponse {
    pub bitcoin: UsdQuote,
}

#[derive(Debug, Deserialize)]
pub struct UsdQuote {
    pub usd: f64,
}

/// Calculator inputs exactly as the user typed them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    pub amount: String,
    pub start_year: String,
}

impl Default for RawInput {
    fn default() -> Self {
        RawInput {
            amount: "1000".to_string(),
            start_year: "2009".to_string(),
        }
    }
}

/// Inputs after validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvestmentInput {
    pub amount: f64,
    pub start_year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub initial_value: f64,
    pub final_value: f64,
    pub return_percent: f64,
    pub initial_price: f64,
    pub current_price: f64,
    pub start_year: i32,
}

/// Lifecycle of an asynchronously loaded value, as a display would see it.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> QueryState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            QueryState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QueryState::Loading => "loading",
            QueryState::Ready(_) => "ready",
            QueryState::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub created_at: DateTime<Utc>,
}
