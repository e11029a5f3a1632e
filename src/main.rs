use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use log::{debug, info, warn};
use warp::Filter;

use btc_whatif::config::Config;
use btc_whatif::handlers::AppState;
use btc_whatif::routes;
use btc_whatif::services::cache::RequestCache;
use btc_whatif::services::calculator::ReturnCalculator;
use btc_whatif::services::coingecko::{CoinGeckoClient, PriceSource};
use btc_whatif::services::notify::NotificationCenter;
use btc_whatif::services::ticker::PriceTicker;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let config = Config::from_env().context("invalid configuration")?;
    info!("Using configuration: {:?}", config);

    let source: Arc<dyn PriceSource> = Arc::new(
        CoinGeckoClient::new(config.price_api_base_url.clone())
            .context("failed to build price API client")?,
    );
    let notifications = Arc::new(NotificationCenter::default());

    let calculator = Arc::new(ReturnCalculator::new(
        source.clone(),
        Arc::new(RequestCache::new(config.cache_ttl)),
        config.retry,
        notifications.clone(),
    ));
    let ticker = Arc::new(PriceTicker::new(
        source,
        Arc::new(RequestCache::new(config.cache_ttl)),
        config.ticker_interval,
    ));

    ticker.clone().spawn();

    let mut price_updates = ticker.price().subscribe();
    tokio::spawn(async move {
        while price_updates.changed().await.is_ok() {
            debug!("Ticker state changed: {:?}", *price_updates.borrow_and_update());
        }
    });

    // Initial history load; failures stay visible through /api/v1/price_series
    let loader = calculator.clone();
    tokio::spawn(async move {
        if let Err(e) = loader.load_series().await {
            warn!("Initial price history load failed: {}", e);
        }
    });

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    info!("Will bind to: {}", addr);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET", "POST"]);

    let api = routes::routes(AppState {
        calculator,
        ticker,
        notifications,
    })
    .with(cors);
    info!("Routes configured successfully with CORS.");

    info!("Starting server on {}", addr);
    warp::serve(api).run(addr).await;
    Ok(())
}
