//! Fixture-to-event identity matching.
//!
//! Given one scraped fixture and the window of canonical events, find the
//! single event it refers to, or decide there is none. Scoring is ordered:
//! exact normalized match beats an alias hit beats fuzzy similarity, and a
//! candidate only qualifies when BOTH sides match in the correct order:
//! scraped home against canonical home, scraped away against canonical away.
//! Ambiguity yields no match, never a guess.

use crate::alias::{normalize_name, AliasIndex};
use crate::types::{CanonicalEvent, ScrapedFixture, TeamRef};
use chrono::Duration;
use strsim::jaro_winkler;

/// Maximum kickoff-time difference before a name match is rejected anyway.
/// Guards against rescheduled games and double fixtures between the same
/// opponents.
pub const KICKOFF_TOLERANCE_HOURS: i64 = 3;

/// Score for a side resolved through the alias index.
const ALIAS_SCORE: f64 = 0.9;

/// Minimum Jaro-Winkler similarity for a fuzzy side match. Below this the
/// side is non-matching and the candidate disqualifies.
const FUZZY_THRESHOLD: f64 = 0.85;

/// Score one side of a fixture against one side of a candidate event.
///
/// Exact normalized equality scores 1.0, an alias hit 0.9, and fuzzy
/// similarity is scaled into (0, 0.85] so it always ranks below an alias hit.
fn score_side(raw_name: &str, team: &TeamRef, aliases: &AliasIndex) -> Option<f64> {
    let raw_norm = normalize_name(raw_name);
    if raw_norm.is_empty() {
        return None;
    }

    if raw_norm == normalize_name(&team.name) {
        return Some(1.0);
    }

    if aliases.resolve(raw_name) == Some(team.id) {
        return Some(ALIAS_SCORE);
    }

    let similarity = jaro_winkler(&raw_norm, &normalize_name(&team.name));
    if similarity >= FUZZY_THRESHOLD {
        Some(FUZZY_THRESHOLD * similarity)
    } else {
        None
    }
}

/// A candidate that passed both side checks and the kickoff gate.
struct Qualifier<'a> {
    event: &'a CanonicalEvent,
    score: f64,
    /// Absolute kickoff delta in seconds; i64::MAX when the fixture carries
    /// no kickoff time, so time-less candidates never win a tie-break.
    kickoff_delta: i64,
}

/// Find the single best-matching canonical event for a scraped fixture.
///
/// `candidates` is a pre-filtered time window; this function is read-only and
/// has no side effects. Zero qualifiers, or a tie that the kickoff delta
/// cannot break, both yield `None`.
pub fn find_matching_event<'a>(
    fixture: &ScrapedFixture,
    candidates: &'a [CanonicalEvent],
    aliases: &AliasIndex,
) -> Option<&'a CanonicalEvent> {
    let mut qualifiers: Vec<Qualifier<'a>> = Vec::new();

    for event in candidates {
        let kickoff_delta = match fixture.kickoff_time {
            Some(kickoff) => {
                let delta = (kickoff - event.scheduled_time).num_seconds().abs();
                if delta > Duration::hours(KICKOFF_TOLERANCE_HOURS).num_seconds() {
                    continue;
                }
                delta
            }
            None => i64::MAX,
        };

        let home = match score_side(&fixture.raw_home_name, &event.home, aliases) {
            Some(s) => s,
            None => continue,
        };
        let away = match score_side(&fixture.raw_away_name, &event.away, aliases) {
            Some(s) => s,
            None => continue,
        };

        qualifiers.push(Qualifier {
            event,
            score: (home + away) / 2.0,
            kickoff_delta,
        });
    }

    let best_score = qualifiers
        .iter()
        .map(|q| q.score)
        .fold(f64::NEG_INFINITY, f64::max);
    if best_score == f64::NEG_INFINITY {
        return None;
    }

    // Keep only top-scoring candidates, then break ties by kickoff delta.
    let mut top: Vec<&Qualifier<'a>> = qualifiers
        .iter()
        .filter(|q| (q.score - best_score).abs() < f64::EPSILON)
        .collect();
    if top.len() > 1 {
        let min_delta = top.iter().map(|q| q.kickoff_delta).min().unwrap_or(i64::MAX);
        top.retain(|q| q.kickoff_delta == min_delta);
    }

    match top.as_slice() {
        [only] => Some(only.event),
        _ => None,
    }
}
