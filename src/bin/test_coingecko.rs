// src/bin/test_coingecko.rs
use btc_whatif::services::coingecko::{CoinGeckoClient, PriceSource, DEFAULT_BASE_URL};
use btc_whatif::BoxError;
use dotenv::dotenv;
use log::{error, info};
use std::env;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    dotenv().ok();
    env_logger::init();

    let base_url = env::var("PRICE_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    info!("Testing price API at {}", base_url);
    let client = CoinGeckoClient::new(base_url)?;

    match client.current_price().await {
        Ok(price) => println!("Current price:  {}", price),
        Err(e) => error!("ERROR: current price fetch failed: {}", e),
    }

    let series = client.price_series().await?;
    println!("History points: {}", series.len());
    if let (Some(first), Some(last)) = (series.first(), series.last()) {
        println!("First:          {:?} {}", first.time(), first.price);
        println!("Last:           {:?} {}", last.time(), last.price);
    }
    Ok(())
}
