// src/handlers/price.rs
use serde::Serialize;
use warp::reply::Json;
use warp::Rejection;
use log::{error, info};

use crate::models::{PricePoint, QueryState};
use super::error::ApiError;
use super::AppState;

#[derive(Serialize)]
struct PriceResponse {
    state: &'static str,
    price: Option<f64>,
    display: String,
}

#[derive(Serialize)]
struct PriceSeriesResponse<'a> {
    state: &'static str,
    points: &'a [PricePoint],
    error: Option<&'a str>,
}

pub async fn get_price(state: AppState) -> Result<Json, Rejection> {
    info!("Handling request to get current Bitcoin price");
    let current = state.ticker.price().get();
    Ok(warp::reply::json(&PriceResponse {
        state: current.label(),
        price: current.ready().copied(),
        display: state.ticker.display_price(),
    }))
}

pub async fn get_price_series(state: AppState) -> Result<Json, Rejection> {
    info!("Handling request to get Bitcoin price history");
    let series = state.calculator.series().get();
    let reply = match &series {
        QueryState::Ready(series) => warp::reply::json(&PriceSeriesResponse {
            state: "ready",
            points: series.points(),
            error: None,
        }),
        QueryState::Loading => warp::reply::json(&PriceSeriesResponse {
            state: "loading",
            points: &[],
            error: None,
        }),
        QueryState::Failed(message) => warp::reply::json(&PriceSeriesResponse {
            state: "failed",
            points: &[],
            error: Some(message.as_str()),
        }),
    };
    Ok(reply)
}

pub async fn refresh_price_series(state: AppState) -> Result<Json, Rejection> {
    info!("Handling request to refresh Bitcoin price history");
    match state.calculator.refresh_series().await {
        Ok(series) => Ok(warp::reply::json(&PriceSeriesResponse {
            state: "ready",
            points: series.points(),
            error: None,
        })),
        Err(e) => {
            error!("Price history refresh failed: {}", e);
            Err(warp::reject::custom(ApiError::from(e)))
        }
    }
}
