mod config;

use anyhow::Result;
use config::Config;
use dotenv::dotenv;
use oddsline_core::sources::OddsApiAdapter;
use oddsline_core::{
    run_sync, Bookmaker, CatalogStore, DbPoolConfig, PgCatalogStore, SourceRegistry, SyncConfig,
    SyncReport,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    info!("Starting Odds Sync Service...");

    let config = Config::from_env();
    let store = PgCatalogStore::connect(&config.database_url, &DbPoolConfig::from_env()).await?;
    let store: Arc<dyn CatalogStore> = Arc::new(store);

    let mut registry = SourceRegistry::new();
    for key in &config.bookmakers {
        registry.register(Arc::new(OddsApiAdapter::new(
            config.odds_api_key.clone(),
            Bookmaker::new(key),
        )));
    }
    if registry.is_empty() {
        warn!("no source adapters configured, nothing to sync");
    }

    let sync_config = SyncConfig {
        window_back_days: config.window_back_days,
        window_ahead_days: config.window_ahead_days,
    };

    loop {
        match run_sync(store.clone(), &registry, &sync_config).await {
            Ok(report) => log_report(&report),
            Err(e) => error!("sync pass aborted: {:#}", e),
        }

        if config.run_once {
            break;
        }
        tokio::time::sleep(Duration::from_secs(config.sync_interval_secs)).await;
    }

    Ok(())
}

/// One line per source so a silent match-rate collapse shows up in logs.
fn log_report(report: &SyncReport) {
    info!(
        "sync pass complete: {} window events, {} persisted markets, {} failed sources",
        report.window_events,
        report.total_persisted(),
        report.failed_sources()
    );
    for source in &report.sources {
        match &source.error {
            Some(err) => warn!("  {}: FAILED ({})", source.bookmaker, err),
            None => info!(
                "  {}: scraped={} matched={} unmatched={} persisted={} failed_markets={}",
                source.bookmaker,
                source.deduped_fixtures,
                source.matched_fixtures,
                source.unmatched_fixtures,
                source.persisted_markets,
                source.failed_markets
            ),
        }
    }
}
