//! Pipeline error types.
//!
//! Only a failure to read the event window or alias set aborts a sync run;
//! everything below is counted into the run report and skipped.

use crate::types::{Bookmaker, MarketKind};
use thiserror::Error;

/// A single raw market could not be mapped to the canonical three-way shape.
#[derive(Debug, Error)]
pub enum NormalizationError {
    /// No label convention is registered for this bookmaker.
    #[error("no label convention for bookmaker '{0}'")]
    UnknownBookmaker(Bookmaker),

    /// The market kind has no three-way outcome mapping.
    #[error("market kind '{}' is not a three-way market", .0.as_str())]
    UnsupportedMarket(MarketKind),

    /// The payload carries no outcome for an expected label.
    #[error("market is missing expected outcome label '{label}'")]
    MissingLabel { label: String },
}
