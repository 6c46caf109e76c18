//! Scoring stages: technical "banking" score, fundamental health score and
//! the intraday investment coefficient.

pub mod fundamental;
pub mod intraday;
pub mod technical;

pub use fundamental::{assess, FinancialMetrics, HealthReport};
pub use intraday::{intraday_signal, investment_coefficient, score_indicator};
pub use technical::{TechnicalScore, TechnicalScorer, TechnicalWeights};
