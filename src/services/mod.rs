// src/services/mod.rs
pub mod cache;
pub mod calculations;
pub mod calculator;
pub mod coingecko;
pub mod errors;
pub mod notify;
pub mod retry;
pub mod stats;
pub mod store;
pub mod ticker;
