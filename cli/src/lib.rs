//! # ashare-score - A-share screening library
//!
//! Pure computation behind the screening and signal binary:
//! - Technical indicators over daily bars (`ta` plus hand-rolled oscillators)
//! - Technical, fundamental and intraday scoring
//! - Chat-driven candidate selection and prompt templates
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ashare_score::prelude::*;
//!
//! fn score(bars: &[Bar]) -> Result<f64, IndicatorError> {
//!     let snapshot = TechnicalSnapshot::from_bars(bars, 14)?;
//!     Ok(TechnicalScorer::default().score(&snapshot).final_score)
//! }
//! ```

pub mod ask_ai;
pub mod indicators;
pub mod models;
pub mod scoring;
pub mod selection;
pub mod services;
pub mod utils;

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use ashare_score::prelude::*;
    //! ```

    pub use crate::ask_ai::{Language, PromptVars};
    pub use crate::indicators::{
        IndicatorError, IndicatorName, IndicatorSet, RealtimeSnapshot, TechnicalSnapshot,
    };
    pub use crate::models::{merge_spot, Bank, Bar, FinancialStatement, Grade, IndustryBenchmarks, IntradaySignal, ScoredSymbol, SpotQuote};
    pub use crate::scoring::{assess, intraday_signal, HealthReport, TechnicalScore, TechnicalScorer};
    pub use crate::selection::{blend, select_first, select_second, sentiment_score, BlendWeights, CannedOracle, ChatOracle};
}

pub use utils::{init_logger, Logger, Timer};
