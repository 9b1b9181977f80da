//! Core data model for the odds reconciliation pipeline.
//!
//! Canonical events, teams and aliases are owned by the catalog store and are
//! read-only here. Scraped fixtures and raw markets live for one sync run
//! only; the `NormalizedMarketSnapshot` is the unit of persistence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bookmaker identity, keyed by its lowercase source key (e.g. "bet365").
///
/// Kept open rather than a closed enum: the label-convention table decides
/// which bookmakers are actually understood, so adding one is a data change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bookmaker(String);

impl Bookmaker {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Bookmaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Category of wagering market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketKind {
    /// Three-way match result (1X2).
    MatchResult,
    /// Over/under total goals.
    Totals,
    /// Both teams to score.
    BothTeamsToScore,
}

impl MarketKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketKind::MatchResult => "1x2",
            MarketKind::Totals => "totals",
            MarketKind::BothTeamsToScore => "btts",
        }
    }

    /// Map a source market key to a kind, if recognized.
    pub fn from_source_key(key: &str) -> Option<Self> {
        match key {
            "h2h" | "1x2" => Some(MarketKind::MatchResult),
            "totals" => Some(MarketKind::Totals),
            "btts" => Some(MarketKind::BothTeamsToScore),
            _ => None,
        }
    }
}

/// Event status, as stored by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Scheduled,
    Live,
    Finished,
    Cancelled,
    Postponed,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Scheduled => "scheduled",
            EventStatus::Live => "live",
            EventStatus::Finished => "finished",
            EventStatus::Cancelled => "cancelled",
            EventStatus::Postponed => "postponed",
        }
    }

    pub fn from_str_or_scheduled(s: &str) -> Self {
        match s {
            "live" => EventStatus::Live,
            "finished" => EventStatus::Finished,
            "cancelled" => EventStatus::Cancelled,
            "postponed" => EventStatus::Postponed,
            _ => EventStatus::Scheduled,
        }
    }
}

/// A team as embedded in a canonical event (id plus canonical name).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: Uuid,
    pub name: String,
}

/// The authoritative representation of one sporting fixture.
///
/// Identity is immutable once created; this pipeline never writes events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalEvent {
    pub id: Uuid,
    pub scheduled_time: DateTime<Utc>,
    pub status: EventStatus,
    pub home: TeamRef,
    pub away: TeamRef,
}

/// An alternate free-text name for a canonical team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamAlias {
    pub team_id: Uuid,
    pub alias: String,
}

/// One outcome line of a raw market, in the source's own label vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOutcome {
    pub label: String,
    pub price: Option<f64>,
}

/// A market as scraped, before label normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMarket {
    pub kind: MarketKind,
    pub source_market_id: Option<String>,
    pub outcomes: Vec<RawOutcome>,
}

/// A fixture as reported by one source adapter.
///
/// Ephemeral: produced by an adapter, consumed and discarded within one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapedFixture {
    pub raw_home_name: String,
    pub raw_away_name: String,
    pub kickoff_time: Option<DateTime<Utc>>,
    pub markets: Vec<RawMarket>,
}

/// One point-in-time recorded price set for an (event, bookmaker, market kind).
///
/// At most one live row exists per key; each run overwrites the prior
/// snapshot for that key. A price of 0.0 means the source did not quote
/// that outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedMarketSnapshot {
    pub event_id: Uuid,
    pub bookmaker: Bookmaker,
    pub market_kind: MarketKind,
    pub source_market_id: Option<String>,
    pub home_price: f64,
    pub draw_price: f64,
    pub away_price: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Implied probabilities for a three-way market, normalized to sum to 1.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ImpliedProbabilities {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl NormalizedMarketSnapshot {
    /// Implied probabilities from decimal odds, margin removed by
    /// renormalization. None when any outcome is unquoted (0.0 sentinel).
    pub fn implied_probabilities(&self) -> Option<ImpliedProbabilities> {
        if self.home_price <= 0.0 || self.draw_price <= 0.0 || self.away_price <= 0.0 {
            return None;
        }
        let home = 1.0 / self.home_price;
        let draw = 1.0 / self.draw_price;
        let away = 1.0 / self.away_price;
        let total = home + draw + away;
        Some(ImpliedProbabilities {
            home: home / total,
            draw: draw / total,
            away: away / total,
        })
    }

    /// Bookmaker overround (margin) in percent. 0.0 when any outcome is
    /// unquoted.
    pub fn overround(&self) -> f64 {
        if self.home_price <= 0.0 || self.draw_price <= 0.0 || self.away_price <= 0.0 {
            return 0.0;
        }
        (1.0 / self.home_price + 1.0 / self.draw_price + 1.0 / self.away_price - 1.0) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(home: f64, draw: f64, away: f64) -> NormalizedMarketSnapshot {
        NormalizedMarketSnapshot {
            event_id: Uuid::new_v4(),
            bookmaker: Bookmaker::new("pinnacle"),
            market_kind: MarketKind::MatchResult,
            source_market_id: None,
            home_price: home,
            draw_price: draw,
            away_price: away,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn test_bookmaker_key_normalized() {
        assert_eq!(Bookmaker::new(" Bet365 ").as_str(), "bet365");
        assert_eq!(Bookmaker::new("PINNACLE"), Bookmaker::new("pinnacle"));
    }

    #[test]
    fn test_market_kind_source_keys() {
        assert_eq!(MarketKind::from_source_key("h2h"), Some(MarketKind::MatchResult));
        assert_eq!(MarketKind::from_source_key("totals"), Some(MarketKind::Totals));
        assert_eq!(MarketKind::from_source_key("player_props"), None);
    }

    #[test]
    fn test_implied_probabilities_sum_to_one() {
        let snap = snapshot(1.8, 3.4, 4.2);
        let probs = snap.implied_probabilities().unwrap();
        let total = probs.home + probs.draw + probs.away;
        assert!((total - 1.0).abs() < 1e-9);
        assert!(probs.home > probs.draw && probs.draw > probs.away);
    }

    #[test]
    fn test_implied_probabilities_missing_price() {
        let snap = snapshot(1.8, 0.0, 4.2);
        assert!(snap.implied_probabilities().is_none());
        assert_eq!(snap.overround(), 0.0);
    }

    #[test]
    fn test_overround_positive_for_real_book() {
        // 1/1.8 + 1/3.4 + 1/4.2 ≈ 1.088 → ~8.8% margin
        let snap = snapshot(1.8, 3.4, 4.2);
        assert!(snap.overround() > 8.0 && snap.overround() < 10.0);
    }

    #[test]
    fn test_event_status_roundtrip() {
        assert_eq!(EventStatus::from_str_or_scheduled("live"), EventStatus::Live);
        assert_eq!(
            EventStatus::from_str_or_scheduled("unknown_thing"),
            EventStatus::Scheduled
        );
        let json = serde_json::to_string(&EventStatus::Postponed).unwrap();
        assert_eq!(json, "\"postponed\"");
    }
}
