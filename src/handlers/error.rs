// src/handlers/error.rs
use std::fmt;
use warp::http::StatusCode;
use warp::reject::Reject;

use crate::services::errors::{CalculatorError, FetchError};

#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub kind: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, kind: &'static str, message: impl Into<String>) -> Self {
        ApiError {
            status,
            kind,
            message: message.into(),
        }
    }
}

impl From<CalculatorError> for ApiError {
    fn from(e: CalculatorError) -> Self {
        let status = match &e {
            CalculatorError::InvalidAmount(_) | CalculatorError::UnsupportedDateRange { .. } => {
                StatusCode::BAD_REQUEST
            }
            CalculatorError::SeriesUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CalculatorError::Fetch(FetchError::RateLimited) => StatusCode::TOO_MANY_REQUESTS,
            CalculatorError::Fetch(FetchError::UpstreamError { .. }) => StatusCode::BAD_GATEWAY,
            CalculatorError::Fetch(FetchError::NetworkError(_)) => StatusCode::SERVICE_UNAVAILABLE,
        };
        ApiError::new(status, e.kind(), e.to_string())
    }
}

impl From<FetchError> for ApiError {
    fn from(e: FetchError) -> Self {
        CalculatorError::from(e).into()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}
impl Reject for ApiError {}
