//! Raw market normalization.
//!
//! Every bookmaker encodes the three-way outcome differently: positional
//! digits ("1"/"2"/"3" or "1"/"0"/"2"), the classic "1"/"X"/"2", or verbose
//! feed labels. One label convention per known bookmaker resolves home, draw
//! and away prices by label; the table is pure data, so supporting a new
//! bookmaker is a one-line change here.

use crate::error::NormalizationError;
use crate::types::{Bookmaker, MarketKind, RawMarket};

/// The source labels under which one bookmaker quotes home, draw and away.
#[derive(Debug, Clone, Copy)]
pub struct LabelConvention {
    pub home: &'static str,
    pub draw: &'static str,
    pub away: &'static str,
}

/// Label convention for a bookmaker, if it is a known identity.
pub fn label_convention(bookmaker: &Bookmaker) -> Option<&'static LabelConvention> {
    match bookmaker.as_str() {
        // Positional encodings: home/draw/away in slot order.
        "pinnacle" => Some(&LabelConvention { home: "1", draw: "2", away: "3" }),
        "bet365" => Some(&LabelConvention { home: "1", draw: "0", away: "2" }),
        // Classic 1X2.
        "unibet" => Some(&LabelConvention { home: "1", draw: "X", away: "2" }),
        "betfair" => Some(&LabelConvention { home: "1", draw: "X", away: "2" }),
        "1xbet" => Some(&LabelConvention { home: "W1", draw: "X", away: "W2" }),
        // Verbose odds-feed labels.
        "williamhill" => Some(&LabelConvention {
            home: "Home Team",
            draw: "Draw",
            away: "Away Team",
        }),
        "betway" => Some(&LabelConvention { home: "Home", draw: "Draw", away: "Away" }),
        _ => None,
    }
}

/// Home, draw and away prices resolved from a raw market. 0.0 marks an
/// outcome the source listed but did not price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedOutcomes {
    pub home_price: f64,
    pub draw_price: f64,
    pub away_price: f64,
}

/// Price for one expected label. A present label with no price yields the
/// 0.0 sentinel (partial markets are expected); an absent label is an error.
fn price_for_label(raw: &RawMarket, label: &'static str) -> Result<f64, NormalizationError> {
    raw.outcomes
        .iter()
        .find(|o| o.label.trim() == label)
        .map(|o| o.price.unwrap_or(0.0))
        .ok_or(NormalizationError::MissingLabel {
            label: label.to_string(),
        })
}

/// Map one raw market to canonical home/draw/away prices.
///
/// Fails per market only: an unknown bookmaker, a non-three-way kind, or a
/// missing expected label reject this market while sibling markets of the
/// same fixture are still processed. Prices pass through unmodified.
pub fn normalize(
    raw: &RawMarket,
    bookmaker: &Bookmaker,
) -> Result<NormalizedOutcomes, NormalizationError> {
    if raw.kind != MarketKind::MatchResult {
        return Err(NormalizationError::UnsupportedMarket(raw.kind));
    }

    let convention = label_convention(bookmaker)
        .ok_or_else(|| NormalizationError::UnknownBookmaker(bookmaker.clone()))?;

    Ok(NormalizedOutcomes {
        home_price: price_for_label(raw, convention.home)?,
        draw_price: price_for_label(raw, convention.draw)?,
        away_price: price_for_label(raw, convention.away)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawOutcome;

    fn market(kind: MarketKind, outcomes: &[(&str, Option<f64>)]) -> RawMarket {
        RawMarket {
            kind,
            source_market_id: Some("m-1".to_string()),
            outcomes: outcomes
                .iter()
                .map(|(label, price)| RawOutcome {
                    label: label.to_string(),
                    price: *price,
                })
                .collect(),
        }
    }

    #[test]
    fn test_positional_123_convention() {
        let raw = market(
            MarketKind::MatchResult,
            &[("1", Some(1.8)), ("2", Some(3.4)), ("3", Some(4.2))],
        );
        let out = normalize(&raw, &Bookmaker::new("pinnacle")).unwrap();
        assert_eq!(out.home_price, 1.8);
        assert_eq!(out.draw_price, 3.4);
        assert_eq!(out.away_price, 4.2);
    }

    #[test]
    fn test_positional_102_convention() {
        let raw = market(
            MarketKind::MatchResult,
            &[("1", Some(1.75)), ("0", Some(3.5)), ("2", Some(4.3))],
        );
        let out = normalize(&raw, &Bookmaker::new("bet365")).unwrap();
        assert_eq!(out.home_price, 1.75);
        assert_eq!(out.draw_price, 3.5);
        assert_eq!(out.away_price, 4.3);
    }

    #[test]
    fn test_label_order_in_payload_is_irrelevant() {
        let raw = market(
            MarketKind::MatchResult,
            &[("X", Some(3.2)), ("2", Some(4.0)), ("1", Some(1.9))],
        );
        let out = normalize(&raw, &Bookmaker::new("unibet")).unwrap();
        assert_eq!(out.home_price, 1.9);
        assert_eq!(out.draw_price, 3.2);
        assert_eq!(out.away_price, 4.0);
    }

    #[test]
    fn test_verbose_labels() {
        let raw = market(
            MarketKind::MatchResult,
            &[
                ("Home Team", Some(2.1)),
                ("Draw", Some(3.3)),
                ("Away Team", Some(3.6)),
            ],
        );
        let out = normalize(&raw, &Bookmaker::new("williamhill")).unwrap();
        assert_eq!(out.home_price, 2.1);
        assert_eq!(out.away_price, 3.6);
    }

    #[test]
    fn test_unknown_bookmaker_fails() {
        let raw = market(MarketKind::MatchResult, &[("1", Some(1.8))]);
        let err = normalize(&raw, &Bookmaker::new("shadybook")).unwrap_err();
        assert!(matches!(err, NormalizationError::UnknownBookmaker(_)));
    }

    #[test]
    fn test_missing_label_fails_that_market() {
        let raw = market(
            MarketKind::MatchResult,
            &[("1", Some(1.8)), ("2", Some(3.4))],
        );
        let err = normalize(&raw, &Bookmaker::new("pinnacle")).unwrap_err();
        assert!(matches!(
            err,
            NormalizationError::MissingLabel { ref label } if label == "3"
        ));
    }

    #[test]
    fn test_unpriced_outcome_uses_zero_sentinel() {
        let raw = market(
            MarketKind::MatchResult,
            &[("1", Some(1.8)), ("2", None), ("3", Some(4.2))],
        );
        let out = normalize(&raw, &Bookmaker::new("pinnacle")).unwrap();
        assert_eq!(out.draw_price, 0.0);
    }

    #[test]
    fn test_non_three_way_kind_unsupported() {
        let raw = market(
            MarketKind::Totals,
            &[("Over_2.5", Some(1.9)), ("Under_2.5", Some(1.9))],
        );
        let err = normalize(&raw, &Bookmaker::new("pinnacle")).unwrap_err();
        assert!(matches!(err, NormalizationError::UnsupportedMarket(_)));
    }

    #[test]
    fn test_labels_trimmed_before_compare() {
        let raw = market(
            MarketKind::MatchResult,
            &[(" 1 ", Some(1.8)), ("2", Some(3.4)), ("3", Some(4.2))],
        );
        let out = normalize(&raw, &Bookmaker::new("pinnacle")).unwrap();
        assert_eq!(out.home_price, 1.8);
    }
}
