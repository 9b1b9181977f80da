//! Source adapter over the-odds-api.com aggregated odds feed.
//!
//! One adapter instance scrapes for exactly one bookmaker: the feed returns
//! per-match blocks for many bookmakers, and the adapter keeps only the block
//! matching its own identity, converting it to strict fixtures at the
//! boundary.

use crate::sources::SourceAdapter;
use crate::types::{Bookmaker, MarketKind, RawMarket, RawOutcome, ScrapedFixture};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.the-odds-api.com/v4";
const SPORT_KEY: &str = "soccer_epl";

#[derive(Clone)]
pub struct OddsApiAdapter {
    client: Client,
    base_url: String,
    api_key: String,
    bookmaker: Bookmaker,
}

impl OddsApiAdapter {
    pub fn new(api_key: impl Into<String>, bookmaker: Bookmaker) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            bookmaker,
        }
    }

    /// Point the adapter at a different host (used against local stubs).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn parse_fixture(&self, entry: &serde_json::Value) -> Option<ScrapedFixture> {
        let raw_home_name = entry["home_team"].as_str()?.to_string();
        let raw_away_name = entry["away_team"].as_str()?.to_string();
        let kickoff_time = entry["commence_time"]
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let mut markets = Vec::new();
        if let Some(blocks) = entry["bookmakers"].as_array() {
            for block in blocks {
                if block["key"].as_str() != Some(self.bookmaker.as_str()) {
                    continue;
                }
                for market in block["markets"].as_array().unwrap_or(&vec![]) {
                    let kind = match market["key"]
                        .as_str()
                        .and_then(MarketKind::from_source_key)
                    {
                        Some(k) => k,
                        None => continue,
                    };
                    let outcomes = market["outcomes"]
                        .as_array()
                        .unwrap_or(&vec![])
                        .iter()
                        .filter_map(|o| {
                            Some(RawOutcome {
                                label: o["name"].as_str()?.to_string(),
                                price: o["price"].as_f64(),
                            })
                        })
                        .collect();
                    markets.push(RawMarket {
                        kind,
                        source_market_id: entry["id"].as_str().map(|s| s.to_string()),
                        outcomes,
                    });
                }
            }
        }

        if markets.is_empty() {
            return None;
        }

        Some(ScrapedFixture {
            raw_home_name,
            raw_away_name,
            kickoff_time,
            markets,
        })
    }
}

#[async_trait]
impl SourceAdapter for OddsApiAdapter {
    fn bookmaker(&self) -> Bookmaker {
        self.bookmaker.clone()
    }

    async fn fetch(&self) -> Result<Vec<ScrapedFixture>> {
        let url = format!("{}/sports/{}/odds", self.base_url, SPORT_KEY);
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("regions", "uk,eu"),
                ("markets", "h2h,totals"),
                ("oddsFormat", "decimal"),
            ])
            .send()
            .await
            .context("odds feed request failed")?
            .error_for_status()
            .context("odds feed returned an error status")?;

        let data: serde_json::Value = resp.json().await.context("odds feed body was not JSON")?;

        let fixtures: Vec<ScrapedFixture> = data
            .as_array()
            .unwrap_or(&vec![])
            .iter()
            .filter_map(|entry| self.parse_fixture(entry))
            .collect();

        debug!(
            "odds feed: {} fixtures carry markets for '{}'",
            fixtures.len(),
            self.bookmaker
        );
        Ok(fixtures)
    }
}
