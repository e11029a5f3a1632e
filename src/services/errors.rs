// src/services/errors.rs
use thiserror::Error;

/// Failures of a single request against the price API.
///
/// `Clone` because one in-flight request can be awaited by several consumers
/// through the request cache.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("rate limited by price API (HTTP 429)")]
    RateLimited,
    #[error("price API error (HTTP {status}): {message}")]
    UpstreamError { status: u16, message: String },
    #[error("network error: {0}")]
    NetworkError(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::NetworkError(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculatorError {
    #[error("invalid investment amount: {0:?}")]
    InvalidAmount(String),
    #[error("start year {year} outside supported range {min}-{max}")]
    UnsupportedDateRange { year: String, min: i32, max: i32 },
    #[error("price history unavailable: {0}")]
    SeriesUnavailable(String),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl CalculatorError {
    /// Stable identifier used in JSON error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            CalculatorError::InvalidAmount(_) => "InvalidAmount",
            CalculatorError::UnsupportedDateRange { .. } => "UnsupportedDateRange",
            CalculatorError::SeriesUnavailable(_) => "SeriesUnavailable",
            CalculatorError::Fetch(FetchError::RateLimited) => "RateLimited",
            CalculatorError::Fetch(FetchError::UpstreamError { .. }) => "UpstreamError",
            CalculatorError::Fetch(FetchError::NetworkError(_)) => "NetworkError",
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CalculatorError::InvalidAmount(_) | CalculatorError::UnsupportedDateRange { .. }
        )
    }
}
