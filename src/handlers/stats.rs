// src/handlers/stats.rs
use warp::reply::Json;
use warp::Rejection;
use log::debug;

use crate::services::stats::investment_stats;
use super::AppState;

pub async fn get_stats(state: AppState) -> Result<Json, Rejection> {
    let stats = investment_stats(&state.ticker, &state.calculator);
    debug!("Returning investment stats: {:?}", stats);
    Ok(warp::reply::json(&stats))
}

pub async fn get_notifications(state: AppState) -> Result<Json, Rejection> {
    Ok(warp::reply::json(&state.notifications.recent()))
}
