//! Catalog store access.
//!
//! The catalog owns canonical events, teams and aliases; this pipeline reads
//! them and writes market snapshots, nothing else. The trait keeps the
//! orchestrator testable without a database.

use crate::types::{CanonicalEvent, NormalizedMarketSnapshot, TeamAlias};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub mod pg;

pub use pg::{DbPoolConfig, PgCatalogStore};

/// Read and write operations this pipeline needs from the catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Canonical events scheduled in [from, to], with embedded team id+name.
    async fn get_event_window(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<CanonicalEvent>>;

    /// The full current alias set.
    async fn get_all_aliases(&self) -> Result<Vec<TeamAlias>>;

    /// Insert-or-replace keyed by (event_id, bookmaker, market_kind).
    ///
    /// Must atomically replace any existing row for that key; re-running with
    /// unchanged data leaves the store unchanged apart from `recorded_at`.
    async fn upsert_market_snapshot(&self, snapshot: &NormalizedMarketSnapshot) -> Result<()>;
}
