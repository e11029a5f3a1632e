// src/routes.rs
use std::convert::Infallible;

use log::info;
use serde_json::json;
use warp::http::StatusCode;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::calculate::calculate;
use crate::handlers::error::ApiError;
use crate::handlers::price::{get_price, get_price_series, refresh_price_series};
use crate::handlers::stats::{get_notifications, get_stats};
use crate::handlers::AppState;

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (code, kind, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "NotFound", "Not Found".to_string())
    } else if let Some(api_error) = err.find::<ApiError>() {
        (api_error.status, api_error.kind, api_error.message.clone())
    } else if let Some(body_error) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, "BadRequest", body_error.to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "MethodNotAllowed", "Method Not Allowed".to_string())
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal", "Internal Server Error".to_string())
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&json!({
            "error": message,
            "kind": kind,
        })),
        code,
    ))
}

pub fn routes(state: AppState) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let state_filter = warp::any().map(move || state.clone());

    let price_route = warp::path!("api" / "v1" / "price")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_price);

    let price_series_route = warp::path!("api" / "v1" / "price_series")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_price_series);

    let refresh_route = warp::path!("api" / "v1" / "price_series" / "refresh")
        .and(warp::post())
        .and(state_filter.clone())
        .and_then(refresh_price_series);

    let calculate_route = warp::path!("api" / "v1" / "calculate")
        .and(warp::post())
        .and(state_filter.clone())
        .and(warp::body::content_length_limit(4 * 1024))
        .and(warp::body::json())
        .and_then(calculate);

    let stats_route = warp::path!("api" / "v1" / "stats")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_stats);

    let notifications_route = warp::path!("api" / "v1" / "notifications")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_notifications);

    info!("All routes configured successfully.");

    price_route
        .or(price_series_route)
        .or(refresh_route)
        .or(calculate_route)
        .or(stats_route)
        .or(notifications_route)
        .recover(handle_rejection)
}
