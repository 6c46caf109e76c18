//! Technical indicators computed over daily bars.
//!
//! `series` wraps the `ta` crate, `oscillators` adds the indicators it lacks,
//! and `snapshot` reduces both to the latest values the scorers consume.

pub mod oscillators;
pub mod series;
pub mod snapshot;

pub use snapshot::{IndicatorName, IndicatorSet, RealtimeSnapshot, TechnicalSnapshot};

use thiserror::Error;

/// One value per input bar, `None` inside the warm-up window
pub type Series = Vec<Option<f64>>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Insufficient data: need at least {needed} bars, got {got}")]
    InsufficientData { needed: usize, got: usize },
    #[error("Invalid indicator parameter: {0}")]
    InvalidParameter(String),
}
