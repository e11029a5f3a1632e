// src/services/ticker.rs
use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::models::QueryState;
use super::cache::RequestCache;
use super::calculations::format_usd;
use super::coingecko::PriceSource;
use super::store::StateStore;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Polls the current Bitcoin price and publishes the latest value.
pub struct PriceTicker {
    source: Arc<dyn PriceSource>,
    cache: Arc<RequestCache<f64>>,
    poll_interval: Duration,
    price: StateStore<QueryState<f64>>,
}

impl PriceTicker {
    pub fn new(source: Arc<dyn PriceSource>, cache: Arc<RequestCache<f64>>, poll_interval: Duration) -> Self {
        Self {
            source,
            cache,
            poll_interval,
            price: StateStore::new(QueryState::Loading),
        }
    }

    pub fn price(&self) -> &StateStore<QueryState<f64>> {
        &self.price
    }

    pub fn latest(&self) -> Option<f64> {
        self.price.get().ready().copied()
    }

    /// One poll. Failures are logged and leave the last good price in place.
    pub async fn refresh(&self) {
        let source = self.source.clone();
        let key = source.current_price_key();
        let fetched = self
            .cache
            .get_or_fetch(&key, move || async move { source.current_price().await })
            .await;

        match fetched {
            Ok(price) => self.price.set(QueryState::Ready(price)),
            Err(e) => warn!("Current price poll failed, keeping previous value: {}", e),
        }
    }

    /// Polls right away and then every `poll_interval` until the handle is aborted.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        info!("Starting price ticker, polling every {:?}", self.poll_interval);
        tokio::spawn(async move {
            let mut ticks = interval(self.poll_interval);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                self.refresh().await;
            }
        })
    }

    pub fn display_price(&self) -> String {
        match self.latest() {
            Some(price) => format_usd(price),
            None => "Loading...".to_string(),
        }
    }
}
