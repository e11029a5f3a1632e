// src/handlers/calculate.rs
use serde::Deserialize;
use serde_json::Value;
use warp::reply::Json;
use warp::Rejection;
use log::{error, info, warn};

use crate::models::RawInput;
use super::error::ApiError;
use super::AppState;

/// Form fields arrive as text, but numbers are accepted too.
#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    #[serde(default)]
    pub amount: Value,
    #[serde(default)]
    pub start_year: Value,
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl From<CalculateRequest> for RawInput {
    fn from(req: CalculateRequest) -> Self {
        RawInput {
            amount: as_text(&req.amount),
            start_year: as_text(&req.start_year),
        }
    }
}

pub async fn calculate(state: AppState, req: CalculateRequest) -> Result<Json, Rejection> {
    let raw = RawInput::from(req);
    info!("Handling calculation request: amount={:?}, start_year={:?}", raw.amount, raw.start_year);

    match state.calculator.calculate_with(&raw) {
        Ok(result) => Ok(warp::reply::json(&result)),
        Err(e) => {
            if e.is_validation() {
                warn!("Calculation rejected: {}", e);
            } else {
                error!("Calculation failed: {}", e);
            }
            Err(warp::reject::custom(ApiError::from(e)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fields_become_raw_text() {
        let req: CalculateRequest = serde_json::from_value(json!({ "amount": 250.5, "start_year": "2015" })).unwrap();
        assert_eq!(
            RawInput::from(req),
            RawInput { amount: "250.5".to_string(), start_year: "2015".to_string() }
        );
    }

    #[test]
    fn missing_fields_are_empty() {
        let req: CalculateRequest = serde_json::from_value(json!({})).unwrap();
        let raw = RawInput::from(req);
        assert_eq!(raw.amount, "");
        assert_eq!(raw.start_year, "");
    }
}
