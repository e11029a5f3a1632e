// src/bin/whatif.rs
//! One-shot calculation: `whatif <amount> [start_year]`.
use std::env;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use dotenv::dotenv;
use log::info;

use btc_whatif::config::Config;
use btc_whatif::models::RawInput;
use btc_whatif::services::cache::RequestCache;
use btc_whatif::services::calculations::format_usd;
use btc_whatif::services::calculator::ReturnCalculator;
use btc_whatif::services::coingecko::CoinGeckoClient;
use btc_whatif::services::notify::NotificationCenter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let mut args = env::args().skip(1);
    let defaults = RawInput::default();
    let raw = RawInput {
        amount: args.next().unwrap_or(defaults.amount),
        start_year: args.next().unwrap_or(defaults.start_year),
    };
    if args.next().is_some() {
        bail!("usage: whatif <amount> [start_year]");
    }

    let config = Config::from_env()?;
    let calculator = ReturnCalculator::new(
        Arc::new(CoinGeckoClient::new(config.price_api_base_url.clone())?),
        Arc::new(RequestCache::new(config.cache_ttl)),
        config.retry,
        Arc::new(NotificationCenter::default()),
    );

    calculator.set_amount(raw.amount);
    calculator.set_start_year(raw.start_year);

    let series = calculator
        .load_series()
        .await
        .context("could not load Bitcoin price history")?;
    info!("Loaded {} price points", series.len());

    let result = calculator.calculate()?;
    println!("Invested:      {}", format_usd(result.initial_value));
    println!("Bought at:     {}", format_usd(result.initial_price));
    println!("Current price: {}", format_usd(result.current_price));
    println!("Worth today:   {}", format_usd(result.final_value));
    println!("Return:        {:+.2}%", result.return_percent);
    Ok(())
}
