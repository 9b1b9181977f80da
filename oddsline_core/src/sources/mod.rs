//! Source adapter contract and registry.
//!
//! Each bookmaker connector sits behind the same capability trait: fetch the
//! current fixtures with raw markets, or fail as a unit. Loosely typed source
//! payloads are converted to strict `ScrapedFixture`s inside the adapter, so
//! everything downstream of `fetch` is uniform regardless of bookmaker.

use crate::types::{Bookmaker, ScrapedFixture};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

pub mod odds_api;

pub use odds_api::OddsApiAdapter;

/// One per-bookmaker connector.
///
/// An `Err` from `fetch` marks the whole source as failed for this run; it is
/// isolated into that source's report entry and never blocks sibling sources.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// The bookmaker identity this adapter scrapes for.
    fn bookmaker(&self) -> Bookmaker;

    /// Fetch the current fixtures with their raw markets.
    async fn fetch(&self) -> Result<Vec<ScrapedFixture>>;
}

/// Registered source adapters, one per bookmaker.
#[derive(Default)]
pub struct SourceRegistry {
    adapters: HashMap<String, Arc<dyn SourceAdapter>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter under its bookmaker key, replacing any previous
    /// adapter for the same bookmaker.
    pub fn register(&mut self, adapter: Arc<dyn SourceAdapter>) {
        let key = adapter.bookmaker().as_str().to_string();
        if self.adapters.insert(key.clone(), adapter).is_some() {
            warn!("replaced existing source adapter for '{}'", key);
        } else {
            info!("registered source adapter for '{}'", key);
        }
    }

    pub fn adapters(&self) -> impl Iterator<Item = &Arc<dyn SourceAdapter>> {
        self.adapters.values()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullAdapter(Bookmaker);

    #[async_trait]
    impl SourceAdapter for NullAdapter {
        fn bookmaker(&self) -> Bookmaker {
            self.0.clone()
        }

        async fn fetch(&self) -> Result<Vec<ScrapedFixture>> {
            Ok(vec![])
        }
    }

    #[test]
    fn test_register_replaces_same_bookmaker() {
        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(NullAdapter(Bookmaker::new("bet365"))));
        registry.register(Arc::new(NullAdapter(Bookmaker::new("bet365"))));
        registry.register(Arc::new(NullAdapter(Bookmaker::new("pinnacle"))));
        assert_eq!(registry.len(), 2);
    }
}
