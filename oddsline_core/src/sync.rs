//! Reconciliation orchestrator.
//!
//! One `run_sync` call is one reconciliation pass: read the canonical event
//! window and alias set, fan the registered source adapters out as parallel
//! tasks, and let each task match, normalize and persist its own fixtures the
//! moment its fetch completes. Sources never wait on each other, and nothing
//! below the window/alias read can abort the run: every fixture- or
//! market-level failure is folded into the per-source report instead.

use crate::alias::{normalize_name, AliasIndex};
use crate::markets::normalize;
use crate::matching::find_matching_event;
use crate::sources::{SourceAdapter, SourceRegistry};
use crate::store::CatalogStore;
use crate::types::{CanonicalEvent, NormalizedMarketSnapshot, ScrapedFixture};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use futures_util::future::join_all;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Bounds of the canonical event window, relative to the run start.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub window_back_days: i64,
    pub window_ahead_days: i64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            window_back_days: 3,
            window_ahead_days: 14,
        }
    }
}

/// Outcome tally for one source.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SourceReport {
    pub bookmaker: String,
    pub scraped_fixtures: usize,
    /// Fixtures remaining after in-source deduplication.
    pub deduped_fixtures: usize,
    pub matched_fixtures: usize,
    pub unmatched_fixtures: usize,
    pub persisted_markets: usize,
    pub failed_markets: usize,
    /// Present when the source failed outright (fetch error or panic).
    pub error: Option<String>,
}

impl SourceReport {
    fn failed(bookmaker: String, error: String) -> Self {
        Self {
            bookmaker,
            error: Some(error),
            ..Default::default()
        }
    }
}

/// Aggregate result of one reconciliation pass.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub window_events: usize,
    pub sources: Vec<SourceReport>,
}

impl SyncReport {
    pub fn total_persisted(&self) -> usize {
        self.sources.iter().map(|s| s.persisted_markets).sum()
    }

    pub fn total_matched(&self) -> usize {
        self.sources.iter().map(|s| s.matched_fixtures).sum()
    }

    pub fn failed_sources(&self) -> usize {
        self.sources.iter().filter(|s| s.error.is_some()).count()
    }
}

/// Run one reconciliation pass over all registered sources.
///
/// Only a failure to read the event window or the alias set returns an error;
/// everything else is reported per source.
pub async fn run_sync(
    store: Arc<dyn CatalogStore>,
    sources: &SourceRegistry,
    config: &SyncConfig,
) -> Result<SyncReport> {
    let started_at = Utc::now();
    let from = started_at - Duration::days(config.window_back_days);
    let to = started_at + Duration::days(config.window_ahead_days);

    let events = store
        .get_event_window(from, to)
        .await
        .context("failed to acquire canonical event window")?;
    let alias_rows = store
        .get_all_aliases()
        .await
        .context("failed to acquire alias set")?;

    let events: Arc<Vec<CanonicalEvent>> = Arc::new(events);
    let aliases = Arc::new(AliasIndex::build(&alias_rows));

    info!(
        "sync started: {} events in window, {} aliases, {} sources",
        events.len(),
        aliases.len(),
        sources.len()
    );

    let mut bookmakers = Vec::with_capacity(sources.len());
    let mut handles = Vec::with_capacity(sources.len());
    for adapter in sources.adapters() {
        let adapter = Arc::clone(adapter);
        let store = Arc::clone(&store);
        let events = Arc::clone(&events);
        let aliases = Arc::clone(&aliases);
        bookmakers.push(adapter.bookmaker().as_str().to_string());
        handles.push(tokio::spawn(async move {
            process_source(adapter, store, &events, &aliases).await
        }));
    }

    let mut reports: Vec<SourceReport> = bookmakers
        .into_iter()
        .zip(join_all(handles).await)
        .map(|(bookmaker, joined)| match joined {
            Ok(report) => report,
            Err(e) => {
                warn!("source task for '{}' panicked: {}", bookmaker, e);
                SourceReport::failed(bookmaker, format!("task panicked: {e}"))
            }
        })
        .collect();

    // Keep report order stable regardless of completion order.
    reports.sort_by(|a, b| a.bookmaker.cmp(&b.bookmaker));

    let report = SyncReport {
        started_at,
        finished_at: Utc::now(),
        window_events: events.len(),
        sources: reports,
    };

    info!(
        "sync finished: {} matched fixtures, {} persisted markets, {} failed sources",
        report.total_matched(),
        report.total_persisted(),
        report.failed_sources()
    );

    Ok(report)
}

/// Fetch one source and drive its fixtures through match → normalize → upsert.
async fn process_source(
    adapter: Arc<dyn SourceAdapter>,
    store: Arc<dyn CatalogStore>,
    events: &[CanonicalEvent],
    aliases: &AliasIndex,
) -> SourceReport {
    let bookmaker = adapter.bookmaker();
    let mut report = SourceReport {
        bookmaker: bookmaker.as_str().to_string(),
        ..Default::default()
    };

    let fixtures = match adapter.fetch().await {
        Ok(fixtures) => fixtures,
        Err(e) => {
            warn!("source '{}' failed to fetch: {:#}", bookmaker, e);
            report.error = Some(e.to_string());
            return report;
        }
    };
    report.scraped_fixtures = fixtures.len();

    let fixtures = dedup_fixtures(fixtures);
    report.deduped_fixtures = fixtures.len();

    for fixture in &fixtures {
        let event = match find_matching_event(fixture, events, aliases) {
            Some(event) => event,
            None => {
                report.unmatched_fixtures += 1;
                debug!(
                    "source '{}': no match for '{}' vs '{}'",
                    bookmaker, fixture.raw_home_name, fixture.raw_away_name
                );
                continue;
            }
        };
        report.matched_fixtures += 1;

        for market in &fixture.markets {
            let outcomes = match normalize(market, &bookmaker) {
                Ok(outcomes) => outcomes,
                Err(e) => {
                    report.failed_markets += 1;
                    debug!("source '{}': market skipped: {}", bookmaker, e);
                    continue;
                }
            };

            let snapshot = NormalizedMarketSnapshot {
                event_id: event.id,
                bookmaker: bookmaker.clone(),
                market_kind: market.kind,
                source_market_id: market.source_market_id.clone(),
                home_price: outcomes.home_price,
                draw_price: outcomes.draw_price,
                away_price: outcomes.away_price,
                recorded_at: Utc::now(),
            };

            match store.upsert_market_snapshot(&snapshot).await {
                Ok(()) => report.persisted_markets += 1,
                Err(e) => {
                    report.failed_markets += 1;
                    warn!(
                        "source '{}': failed to persist snapshot for event {}: {:#}",
                        bookmaker, event.id, e
                    );
                }
            }
        }
    }

    report
}

/// Drop repeated fixtures within one source's output, keyed by normalized
/// team names and kickoff date. Sources occasionally list the same game
/// twice across market pages.
fn dedup_fixtures(fixtures: Vec<ScrapedFixture>) -> Vec<ScrapedFixture> {
    let mut seen = HashSet::new();
    fixtures
        .into_iter()
        .filter(|f| {
            let key = (
                normalize_name(&f.raw_home_name),
                normalize_name(&f.raw_away_name),
                f.kickoff_time.map(|t| t.date_naive()),
            );
            seen.insert(key)
        })
        .collect()
}
