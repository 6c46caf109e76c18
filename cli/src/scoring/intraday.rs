use crate::indicators::{IndicatorName, IndicatorSet};
use crate::models::{Grade, IntradaySignal};

const DEFAULT_ATR: f64 = 0.5;
const DEFAULT_PRICE: f64 = 10.0;
const MIN_VOLATILITY_ADJUST: f64 = 0.5;

/// Weights of the indicators that feed the intraday coefficient
pub const INDICATOR_WEIGHTS: [(IndicatorName, f64); 12] = [
    (IndicatorName::Adx, 0.10),
    (IndicatorName::MacdHist, 0.10),
    (IndicatorName::BbPosition, 0.10),
    (IndicatorName::Rsi, 0.08),
    (IndicatorName::Mom, 0.07),
    (IndicatorName::Roc, 0.10),
    (IndicatorName::Mfi, 0.10),
    (IndicatorName::ObvChange, 0.08),
    (IndicatorName::VolumeChangeRate, 0.07),
    (IndicatorName::Bias, 0.08),
    (IndicatorName::Wr, 0.07),
    (IndicatorName::Atr, 0.05),
];

fn clip(v: f64) -> f64 {
    v.clamp(-1.0, 1.0)
}

/// Map one indicator value to [-1, 1]; 1 is strongly bullish.
///
/// `set` supplies context for indicators that depend on another one
/// (volume expansion only counts as bullish while price is rising).
pub fn score_indicator(name: IndicatorName, value: Option<f64>, set: &IndicatorSet) -> f64 {
    let v = match value {
        Some(v) if v.is_finite() => v,
        _ => return 0.0,
    };

    match name {
        IndicatorName::Adx => (v / 50.0).min(1.0),
        IndicatorName::MacdHist => clip(v * 10.0),
        IndicatorName::BbPosition => {
            if v < 0.3 {
                1.0 - v / 0.3
            } else if v > 0.7 {
                (0.7 - v) / 0.3
            } else {
                0.0
            }
        }
        IndicatorName::Rsi => {
            if v < 30.0 {
                (30.0 - v) / 30.0
            } else if v > 70.0 {
                (70.0 - v) / 30.0
            } else {
                (v - 50.0) / 20.0
            }
        }
        IndicatorName::Mom => clip(v / 5.0),
        IndicatorName::Roc => clip(v / 10.0),
        IndicatorName::Mfi => {
            if v < 20.0 {
                (20.0 - v) / 20.0
            } else if v > 80.0 {
                (80.0 - v) / 20.0
            } else {
                (v - 50.0) / 30.0
            }
        }
        IndicatorName::ObvChange => clip(v),
        IndicatorName::VolumeChangeRate => match set.get(IndicatorName::Roc) {
            Some(roc) if roc > 0.0 => clip(v / 200.0),
            Some(_) => -clip(v / 200.0),
            None => 0.0,
        },
        IndicatorName::Bias => clip(-v / 5.0),
        IndicatorName::Wr => clip((v + 50.0) / 30.0),
        _ => 0.0,
    }
}

/// Weighted indicator score damped by volatility (ATR relative to price)
pub fn investment_coefficient(set: &IndicatorSet) -> f64 {
    let total: f64 = INDICATOR_WEIGHTS
        .iter()
        .filter_map(|(name, weight)| {
            set.get(*name)
                .map(|value| score_indicator(*name, Some(value), set) * weight)
        })
        .sum();

    let atr = set.get(IndicatorName::Atr).unwrap_or(DEFAULT_ATR);
    let price = set
        .get(IndicatorName::Close)
        .filter(|p| *p != 0.0)
        .unwrap_or(DEFAULT_PRICE);
    let adjust = (1.0 - atr / price * 10.0).max(MIN_VOLATILITY_ADJUST);

    total * adjust
}

pub fn intraday_signal(code: &str, set: &IndicatorSet) -> IntradaySignal {
    let coefficient = investment_coefficient(set);
    IntradaySignal {
        code: code.to_string(),
        coefficient,
        grade: Grade::from_coefficient(coefficient),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[(IndicatorName, f64)]) -> IndicatorSet {
        let mut set = IndicatorSet::new();
        for (name, value) in values {
            set.insert(*name, Some(*value));
        }
        set
    }

    #[test]
    fn test_weights_sum_to_one() {
        let sum: f64 = INDICATOR_WEIGHTS.iter().map(|(_, w)| w).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_indicator_bands() {
        let empty = IndicatorSet::new();
        assert_eq!(score_indicator(IndicatorName::Adx, Some(100.0), &empty), 1.0);
        assert_eq!(score_indicator(IndicatorName::MacdHist, Some(-0.5), &empty), -1.0);
        assert!((score_indicator(IndicatorName::BbPosition, Some(0.15), &empty) - 0.5).abs() < 1e-12);
        assert_eq!(score_indicator(IndicatorName::BbPosition, Some(0.5), &empty), 0.0);
        assert!((score_indicator(IndicatorName::BbPosition, Some(1.0), &empty) + 1.0).abs() < 1e-12);
        assert_eq!(score_indicator(IndicatorName::Rsi, Some(15.0), &empty), 0.5);
        assert_eq!(score_indicator(IndicatorName::Rsi, Some(60.0), &empty), 0.5);
        assert_eq!(score_indicator(IndicatorName::Mfi, Some(90.0), &empty), -0.5);
        assert_eq!(score_indicator(IndicatorName::Bias, Some(-10.0), &empty), 1.0);
        assert_eq!(score_indicator(IndicatorName::Wr, Some(-50.0), &empty), 0.0);
        assert_eq!(score_indicator(IndicatorName::Atr, Some(3.0), &empty), 0.0);
        assert_eq!(score_indicator(IndicatorName::Cci, Some(300.0), &empty), 0.0);
    }

    #[test]
    fn test_missing_value_is_neutral() {
        let empty = IndicatorSet::new();
        assert_eq!(score_indicator(IndicatorName::Rsi, None, &empty), 0.0);
        assert_eq!(score_indicator(IndicatorName::Rsi, Some(f64::NAN), &empty), 0.0);
    }

    #[test]
    fn test_volume_change_follows_roc_sign() {
        let rising = set(&[(IndicatorName::Roc, 3.0)]);
        let falling = set(&[(IndicatorName::Roc, -3.0)]);
        let vcr = Some(100.0);

        assert_eq!(score_indicator(IndicatorName::VolumeChangeRate, vcr, &rising), 0.5);
        assert_eq!(score_indicator(IndicatorName::VolumeChangeRate, vcr, &falling), -0.5);
        assert_eq!(
            score_indicator(IndicatorName::VolumeChangeRate, vcr, &IndicatorSet::new()),
            0.0
        );
    }

    #[test]
    fn test_coefficient_volatility_adjustment() {
        // ADX alone: 1.0 * 0.1 = 0.1 before adjustment
        let calm = set(&[
            (IndicatorName::Adx, 60.0),
            (IndicatorName::Atr, 0.1),
            (IndicatorName::Close, 10.0),
        ]);
        assert!((investment_coefficient(&calm) - 0.1 * 0.9).abs() < 1e-12);

        let wild = set(&[
            (IndicatorName::Adx, 60.0),
            (IndicatorName::Atr, 2.0),
            (IndicatorName::Close, 10.0),
        ]);
        assert!((investment_coefficient(&wild) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_coefficient_defaults_without_atr_and_price() {
        // ATR 0.5 over price 10 gives an adjust factor of 0.5
        let only_adx = set(&[(IndicatorName::Adx, 50.0)]);
        assert!((investment_coefficient(&only_adx) - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_intraday_signal_grades() {
        let bullish = set(&[
            (IndicatorName::Adx, 60.0),
            (IndicatorName::MacdHist, 0.5),
            (IndicatorName::BbPosition, 0.0),
            (IndicatorName::Rsi, 0.0),
            (IndicatorName::Mom, 10.0),
            (IndicatorName::Roc, 20.0),
            (IndicatorName::Mfi, 0.0),
            (IndicatorName::ObvChange, 2.0),
            (IndicatorName::VolumeChangeRate, 400.0),
            (IndicatorName::Bias, -10.0),
            (IndicatorName::Wr, 0.0),
            (IndicatorName::Atr, 0.01),
            (IndicatorName::Close, 10.0),
        ]);
        let signal = intraday_signal("600519", &bullish);
        assert_eq!(signal.grade, Grade::StrongBuy);
        assert!(signal.coefficient > 0.9);
        assert!(signal.coefficient <= 1.0);
    }
}
