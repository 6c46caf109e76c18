use crate::ask_ai::Language;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Five-band grade attached to an intraday investment coefficient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

impl Grade {
    /// Band a coefficient: >= 0.6, [0.2, 0.6), (-0.2, 0.2), (-0.6, -0.2], <= -0.6
    pub fn from_coefficient(coefficient: f64) -> Self {
        if coefficient >= 0.6 {
            Grade::StrongBuy
        } else if coefficient >= 0.2 {
            Grade::Buy
        } else if coefficient > -0.2 {
            Grade::Hold
        } else if coefficient > -0.6 {
            Grade::Sell
        } else {
            Grade::StrongSell
        }
    }

    pub fn label(&self, language: &Language) -> &'static str {
        match (self, language) {
            (Grade::StrongBuy, Language::Chinese) => "强烈买入",
            (Grade::Buy, Language::Chinese) => "买入",
            (Grade::Hold, Language::Chinese) => "持有",
            (Grade::Sell, Language::Chinese) => "卖出",
            (Grade::StrongSell, Language::Chinese) => "强烈卖出",
            (Grade::StrongBuy, Language::English) => "Strong Buy",
            (Grade::Buy, Language::English) => "Buy",
            (Grade::Hold, Language::English) => "Hold",
            (Grade::Sell, Language::English) => "Sell",
            (Grade::StrongSell, Language::English) => "Strong Sell",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label(&Language::English))
    }
}

/// Blended screening score for one code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSymbol {
    pub code: String,
    pub score: f64,
}

/// Intraday coefficient and its grade for one code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntradaySignal {
    pub code: String,
    pub coefficient: f64,
    pub grade: Grade,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_band_edges() {
        assert_eq!(Grade::from_coefficient(0.6), Grade::StrongBuy);
        assert_eq!(Grade::from_coefficient(0.59), Grade::Buy);
        assert_eq!(Grade::from_coefficient(0.2), Grade::Buy);
        assert_eq!(Grade::from_coefficient(0.19), Grade::Hold);
        assert_eq!(Grade::from_coefficient(-0.19), Grade::Hold);
        assert_eq!(Grade::from_coefficient(-0.2), Grade::Sell);
        assert_eq!(Grade::from_coefficient(-0.59), Grade::Sell);
        assert_eq!(Grade::from_coefficient(-0.6), Grade::StrongSell);
    }

    #[test]
    fn test_grade_labels() {
        assert_eq!(Grade::StrongBuy.label(&Language::Chinese), "强烈买入");
        assert_eq!(Grade::Hold.to_string(), "Hold");
    }
}
