// src/handlers/mod.rs
use std::sync::Arc;

use crate::services::calculator::ReturnCalculator;
use crate::services::notify::NotificationCenter;
use crate::services::ticker::PriceTicker;

pub mod calculate;
pub mod error;
pub mod price;
pub mod stats;

/// Everything the route handlers share.
#[derive(Clone)]
pub struct AppState {
    pub calculator: Arc<ReturnCalculator>,
    pub ticker: Arc<PriceTicker>,
    pub notifications: Arc<NotificationCenter>,
}
