use crate::indicators::{IndicatorName, TechnicalSnapshot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Score used when an indicator has no value yet
const NEUTRAL: f64 = 50.0;

const BASE_SHARE: f64 = 0.7;
const TREND_SHARE: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalWeights(pub BTreeMap<IndicatorName, f64>);

impl Default for TechnicalWeights {
    fn default() -> Self {
        Self(BTreeMap::from([
            (IndicatorName::Rsi, 15.0),
            (IndicatorName::MaRatio, 10.0),
            (IndicatorName::Macd, 15.0),
            (IndicatorName::Adx, 10.0),
            (IndicatorName::BbPosition, 10.0),
            (IndicatorName::Wr, 10.0),
            (IndicatorName::Cci, 10.0),
            (IndicatorName::ObvChange, 20.0),
        ]))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalScore {
    /// Weighted average of the sub-scores
    pub total: f64,
    /// Total adjusted by trend, volume and strong-buy factors
    pub final_score: f64,
    pub sub_scores: BTreeMap<IndicatorName, f64>,
    pub trend_factor: f64,
    pub volume_confirm: f64,
    pub strong_buy: f64,
}

/// Sigmoid centred between `low` and `high`, saturating at `max_score`
pub fn smooth_score(value: f64, low: f64, high: f64, max_score: f64) -> f64 {
    let normalized = (value - (low + high) / 2.0) / ((high - low) / 4.0);
    max_score / (1.0 + (-normalized).exp())
}

fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct TechnicalScorer {
    pub weights: TechnicalWeights,
}

impl TechnicalScorer {
    pub fn new(weights: TechnicalWeights) -> Self {
        Self { weights }
    }

    /// 0-100 score for each weighted indicator
    pub fn sub_scores(&self, snap: &TechnicalSnapshot) -> BTreeMap<IndicatorName, f64> {
        let rsi = snap
            .rsi
            .map_or(NEUTRAL, |v| 100.0 - ((v - 50.0).abs() * 2.0).clamp(0.0, 100.0));
        let ma_ratio = snap.ma_ratio.map_or(NEUTRAL, |v| (v * 100.0).clamp(0.0, 100.0));
        let macd = match (snap.macd, snap.macd_signal) {
            (Some(m), Some(s)) => ((m - s) * 5.0 + 50.0).clamp(0.0, 100.0),
            _ => NEUTRAL,
        };
        let adx = snap.adx.map_or(NEUTRAL, |v| (v * 2.0).clamp(0.0, 100.0));
        let bb = snap
            .bb_position
            .map_or(NEUTRAL, |v| ((1.0 - v) * 100.0).clamp(0.0, 100.0));
        let wr = snap.wr.map_or(NEUTRAL, |v| (-v).clamp(0.0, 100.0));
        let cci = snap.cci.map_or(NEUTRAL, |v| (50.0 - v / 4.0).clamp(0.0, 100.0));
        let obv = snap
            .obv_change
            .map_or(NEUTRAL, |v| (v * 500.0 + 50.0).clamp(0.0, 100.0));

        BTreeMap::from([
            (IndicatorName::Rsi, rsi),
            (IndicatorName::MaRatio, ma_ratio),
            (IndicatorName::Macd, macd),
            (IndicatorName::Adx, adx),
            (IndicatorName::BbPosition, bb),
            (IndicatorName::Wr, wr),
            (IndicatorName::Cci, cci),
            (IndicatorName::ObvChange, obv),
        ])
    }

    /// MA20 slope and price distance, clamped to [0.6, 1.4]
    pub fn trend_factor(snap: &TechnicalSnapshot) -> f64 {
        let (ma20, ma20_prev) = match (snap.ma20, snap.ma20_prev) {
            (Some(ma20), Some(prev)) if ma20 != 0.0 && prev != 0.0 => (ma20, prev),
            _ => return 1.0,
        };

        let slope = (ma20 - ma20_prev) / ma20_prev * 100.0;
        let slope_factor = 1.0 + slope * 0.4;
        let price_factor = 1.0 + (snap.close - ma20) / ma20 * 3.0;
        (slope_factor * price_factor).clamp(0.6, 1.4)
    }

    pub fn score(&self, snap: &TechnicalSnapshot) -> TechnicalScore {
        let sub_scores = self.sub_scores(snap);
        let sub = |name: IndicatorName| sub_scores.get(&name).copied().unwrap_or(NEUTRAL);

        let weight_sum: f64 = self.weights.0.values().sum();
        let total = if weight_sum > 0.0 {
            self.weights
                .0
                .iter()
                .map(|(name, w)| sub(*name) * w)
                .sum::<f64>()
                / weight_sum
        } else {
            NEUTRAL
        };

        let trend_factor = Self::trend_factor(snap);

        let rsi_score = 0.8 / (1.0 + (-(sub(IndicatorName::Rsi) - 50.0) / 40.0 * 3.0).exp());
        let hist_diff = snap.macd_hist_diff.unwrap_or(0.0);
        let macd_score = smooth_score(sub(IndicatorName::Macd), 0.0, 30.0, 1.0)
            * (1.0 + smooth_score(hist_diff, 0.0, 10.0, 0.5));
        let wr_score = smooth_score(-sub(IndicatorName::Wr), 20.0, 80.0, 1.0);
        let cci_score = smooth_score(sub(IndicatorName::Cci), 0.0, 200.0, 1.0);
        let strong_buy = 0.25 * (rsi_score + macd_score + wr_score + cci_score);

        let price_change = match snap.prev_close {
            Some(prev) if prev != 0.0 => (snap.close - prev) / prev * 100.0,
            _ => 0.0,
        };
        let correlation = sign(price_change) * snap.obv_change.map_or(0.0, sign);
        let volume_factor = 1.0
            + (correlation * price_change.abs() * 0.2).max(0.0)
                * (sub(IndicatorName::BbPosition) / 100.0);
        let volume_confirm = volume_factor.min(1.2);

        let final_score = total * BASE_SHARE
            + total * TREND_SHARE * trend_factor * volume_confirm * (0.5 + strong_buy);

        debug!(
            total = total,
            final_score = final_score,
            trend_factor = trend_factor,
            volume_confirm = volume_confirm,
            strong_buy = strong_buy,
            "Technical score computed"
        );

        TechnicalScore {
            total,
            final_score,
            sub_scores,
            trend_factor,
            volume_confirm,
            strong_buy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neutral_snapshot() -> TechnicalSnapshot {
        TechnicalSnapshot {
            rsi: Some(50.0),
            ma_ratio: Some(1.0),
            macd: Some(0.0),
            macd_signal: Some(0.0),
            adx: Some(25.0),
            bb_position: Some(0.5),
            wr: Some(-50.0),
            cci: Some(0.0),
            obv_change: Some(0.0),
            close: 10.0,
            prev_close: Some(10.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_sub_scores_formulas() {
        let scorer = TechnicalScorer::default();
        let snap = TechnicalSnapshot {
            rsi: Some(70.0),
            ma_ratio: Some(1.2),
            macd: Some(2.0),
            macd_signal: Some(1.0),
            adx: Some(30.0),
            bb_position: Some(0.25),
            wr: Some(-80.0),
            cci: Some(-100.0),
            obv_change: Some(0.02),
            ..neutral_snapshot()
        };
        let s = scorer.sub_scores(&snap);

        assert_eq!(s[&IndicatorName::Rsi], 60.0);
        assert_eq!(s[&IndicatorName::MaRatio], 100.0);
        assert_eq!(s[&IndicatorName::Macd], 55.0);
        assert_eq!(s[&IndicatorName::Adx], 60.0);
        assert_eq!(s[&IndicatorName::BbPosition], 75.0);
        assert_eq!(s[&IndicatorName::Wr], 80.0);
        assert_eq!(s[&IndicatorName::Cci], 75.0);
        assert!((s[&IndicatorName::ObvChange] - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_inputs_are_neutral() {
        let scorer = TechnicalScorer::default();
        let snap = TechnicalSnapshot {
            close: 10.0,
            ..Default::default()
        };
        let s = scorer.sub_scores(&snap);
        assert!(s.values().all(|v| *v == 50.0));
        assert_eq!(scorer.score(&snap).total, 50.0);
    }

    #[test]
    fn test_weighted_total() {
        let scorer = TechnicalScorer::default();
        let snap = neutral_snapshot();
        // RSI 100, MA 100, MACD 50, ADX 50, BB 50, WR 50, CCI 50, OBV 50
        let expected = (100.0 * 15.0 + 100.0 * 10.0 + 50.0 * 75.0) / 100.0;
        assert!((scorer.score(&snap).total - expected).abs() < 1e-9);
    }

    #[test]
    fn test_trend_factor() {
        let mut snap = neutral_snapshot();
        assert_eq!(TechnicalScorer::trend_factor(&snap), 1.0);

        snap.ma20 = Some(10.0);
        snap.ma20_prev = Some(10.0);
        snap.close = 10.0;
        assert!((TechnicalScorer::trend_factor(&snap) - 1.0).abs() < 1e-12);

        // steep rise saturates at the upper clamp
        snap.ma20_prev = Some(9.0);
        snap.close = 11.0;
        assert_eq!(TechnicalScorer::trend_factor(&snap), 1.4);

        snap.ma20_prev = Some(11.0);
        snap.close = 9.0;
        assert_eq!(TechnicalScorer::trend_factor(&snap), 0.6);
    }

    #[test]
    fn test_volume_confirmation_on_aligned_move() {
        let scorer = TechnicalScorer::default();
        let snap = TechnicalSnapshot {
            close: 11.0,
            prev_close: Some(10.0),
            obv_change: Some(0.1),
            bb_position: Some(0.0),
            ..neutral_snapshot()
        };
        // 10% rise with rising OBV: 1 + 10 * 0.2 * 1.0, capped at 1.2
        assert_eq!(scorer.score(&snap).volume_confirm, 1.2);

        let against = TechnicalSnapshot {
            obv_change: Some(-0.1),
            ..snap
        };
        assert_eq!(scorer.score(&against).volume_confirm, 1.0);
    }

    #[test]
    fn test_final_score_combines_factors() {
        let scorer = TechnicalScorer::default();
        let score = scorer.score(&neutral_snapshot());
        let expected = score.total * 0.7
            + score.total * 0.3 * score.trend_factor * score.volume_confirm * (0.5 + score.strong_buy);
        assert!((score.final_score - expected).abs() < 1e-9);
        assert!(score.strong_buy > 0.0 && score.strong_buy < 1.5);
    }

    #[test]
    fn test_smooth_score_midpoint() {
        assert!((smooth_score(15.0, 0.0, 30.0, 1.0) - 0.5).abs() < 1e-12);
        assert!((smooth_score(5.0, 0.0, 10.0, 0.5) - 0.25).abs() < 1e-12);
    }
}
