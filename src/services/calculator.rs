// src/services/calculator.rs
use std::sync::{Arc, Mutex};

use log::{error, info};

use crate::models::{CalculationResult, NotificationKind, PriceSeries, QueryState, RawInput};
use super::cache::RequestCache;
use super::calculations::{compute_return, current_year, format_usd, validate_input};
use super::coingecko::PriceSource;
use super::errors::{CalculatorError, FetchError};
use super::notify::Notifier;
use super::retry::RetryPolicy;
use super::store::StateStore;

/// Fetches the price series through the shared cache, retrying with backoff.
pub async fn fetch_price_series(
    source: Arc<dyn PriceSource>,
    cache: &RequestCache<PriceSeries>,
    retry: RetryPolicy,
) -> Result<PriceSeries, FetchError> {
    let key = source.series_key();
    cache
        .get_or_fetch(&key, move || async move {
            retry
                .run("Bitcoin price history fetch", || source.price_series())
                .await
        })
        .await
}

/// The investment calculator: user inputs, the loaded price history and the
/// latest result.
pub struct ReturnCalculator {
    source: Arc<dyn PriceSource>,
    cache: Arc<RequestCache<PriceSeries>>,
    retry: RetryPolicy,
    notifier: Arc<dyn Notifier>,
    input: Mutex<RawInput>,
    series: StateStore<QueryState<PriceSeries>>,
    result: StateStore<Option<CalculationResult>>,
}

impl ReturnCalculator {
    pub fn new(
        source: Arc<dyn PriceSource>,
        cache: Arc<RequestCache<PriceSeries>>,
        retry: RetryPolicy,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            source,
            cache,
            retry,
            notifier,
            input: Mutex::new(RawInput::default()),
            series: StateStore::new(QueryState::Loading),
            result: StateStore::new(None),
        }
    }

    pub fn set_amount(&self, amount: impl Into<String>) {
        self.lock_input().amount = amount.into();
    }

    pub fn set_start_year(&self, start_year: impl Into<String>) {
        self.lock_input().start_year = start_year.into();
    }

    pub fn input(&self) -> RawInput {
        self.lock_input().clone()
    }

    fn lock_input(&self) -> std::sync::MutexGuard<'_, RawInput> {
        self.input.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn series(&self) -> &StateStore<QueryState<PriceSeries>> {
        &self.series
    }

    pub fn result(&self) -> &StateStore<Option<CalculationResult>> {
        &self.result
    }

    /// Loads (or reloads from cache) the price history and publishes it.
    pub async fn load_series(&self) -> Result<PriceSeries, FetchError> {
        if self.series.get().ready().is_none() {
            self.series.set_if_changed(QueryState::Loading);
        }

        match fetch_price_series(self.source.clone(), &self.cache, self.retry).await {
            Ok(series) => {
                info!("Price history loaded ({} points)", series.len());
                self.series.set(QueryState::Ready(series.clone()));
                Ok(series)
            }
            Err(e) => {
                error!("Failed to load Bitcoin price history: {}", e);
                self.series.set(QueryState::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    /// Drops the cached history and fetches it again.
    pub async fn refresh_series(&self) -> Result<PriceSeries, FetchError> {
        self.cache.invalidate(&self.source.series_key()).await;
        self.load_series().await
    }

    /// Runs the calculation for the current inputs.
    pub fn calculate(&self) -> Result<CalculationResult, CalculatorError> {
        let raw = self.input();
        self.calculate_with(&raw)
    }

    /// Runs the calculation for `raw`, which does not touch the stored inputs.
    pub fn calculate_with(&self, raw: &RawInput) -> Result<CalculationResult, CalculatorError> {
        let input = match validate_input(raw, current_year()) {
            Ok(input) => input,
            Err(e) => {
                self.notify_validation_failure(&e);
                return Err(e);
            }
        };

        let series = match self.series.get() {
            QueryState::Ready(series) => series,
            QueryState::Loading => {
                return Err(CalculatorError::SeriesUnavailable("price history is still loading".to_string()))
            }
            QueryState::Failed(message) => return Err(CalculatorError::SeriesUnavailable(message)),
        };

        let result = compute_return(&input, &series)?;
        info!(
            "Calculated return for ${} invested in {}: {} ({}%)",
            input.amount, input.start_year, result.final_value, result.return_percent
        );
        self.result.set(Some(result.clone()));
        self.notifier.notify(
            "Investment Calculated",
            &format!(
                "{} invested at the start of the window would be worth {} today",
                format_usd(input.amount),
                format_usd(result.final_value)
            ),
            NotificationKind::Default,
        );
        Ok(result)
    }

    fn notify_validation_failure(&self, e: &CalculatorError) {
        match e {
            CalculatorError::InvalidAmount(_) => self.notifier.notify(
                "Invalid Investment Amount",
                "Please enter a valid number for your investment.",
                NotificationKind::Destructive,
            ),
            CalculatorError::UnsupportedDateRange { min, max, .. } => self.notifier.notify(
                "Unsupported Start Year",
                &format!("Please choose a start year between {} and {}.", min, max),
                NotificationKind::Destructive,
            ),
            _ => {}
        }
    }
}
