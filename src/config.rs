// src/config.rs
use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use log::warn;

use crate::services::coingecko::DEFAULT_BASE_URL;
use crate::services::retry::RetryPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub price_api_base_url: String,
    pub ticker_interval: Duration,
    pub cache_ttl: Duration,
    pub retry: RetryPolicy,
}

impl Config {
    /// Reads configuration from the environment (call `dotenv().ok()` first
    /// to pick up a `.env` file).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = RetryPolicy::default();
        Ok(Config {
            port: parse_or(&lookup, "PORT", 3030)?,
            price_api_base_url: lookup("PRICE_API_BASE_URL").unwrap_or_else(|| {
                warn!("PRICE_API_BASE_URL not set, defaulting to {}", DEFAULT_BASE_URL);
                DEFAULT_BASE_URL.to_string()
            }),
            ticker_interval: Duration::from_secs(parse_or(&lookup, "TICKER_INTERVAL_SECS", 60)?),
            cache_ttl: Duration::from_secs(parse_or(&lookup, "CACHE_TTL_SECS", 60)?),
            retry: RetryPolicy {
                max_retries: parse_or(&lookup, "RETRY_MAX", defaults.max_retries)?,
                base_delay: Duration::from_millis(parse_or(&lookup, "RETRY_BASE_DELAY_MS", 1000)?),
                max_delay: Duration::from_millis(parse_or(&lookup, "RETRY_MAX_DELAY_MS", 30_000)?),
            },
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr + std::fmt::Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{} must be a number, got {:?}", key, raw)),
        None => {
            warn!("{} not set, defaulting to {}", key, default);
            Ok(default)
        }
    }
}
