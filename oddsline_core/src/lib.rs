//! Oddsline Core - bookmaker odds reconciliation.
//!
//! This crate provides:
//! - Team alias resolution over free-text source names
//! - Fixture-to-canonical-event identity matching (exact → alias → fuzzy)
//! - Per-bookmaker market label normalization to home/draw/away
//! - A reconciliation orchestrator running all sources in parallel with
//!   per-source failure isolation and idempotent snapshot upserts
//! - Catalog store access over PostgreSQL

pub mod alias;
pub mod error;
pub mod markets;
pub mod matching;
pub mod sources;
pub mod store;
pub mod sync;
pub mod types;

pub use alias::AliasIndex;
pub use error::NormalizationError;
pub use matching::find_matching_event;
pub use sources::{SourceAdapter, SourceRegistry};
pub use store::{CatalogStore, DbPoolConfig, PgCatalogStore};
pub use sync::{run_sync, SourceReport, SyncConfig, SyncReport};
pub use types::*;
