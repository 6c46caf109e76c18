use super::oscillators::{adx, cci, mom, roc, williams_r};
use super::series::{atr, bollinger, macd, mfi, obv, rsi, sma};
use super::{IndicatorError, Series};
use crate::models::{closes, Bar};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Bollinger look-back is the scoring period plus this offset
pub const BOLLINGER_OFFSET: usize = 6;
pub const BOLLINGER_DEV: f64 = 2.0;
pub const MA20_PERIOD: usize = 20;
const VOLUME_MEAN_WINDOW: usize = 5;
const OBV_CHANGE_LAG: usize = 4;

fn last(series: &Series) -> Option<f64> {
    series.last().copied().flatten()
}

fn prev(series: &Series) -> Option<f64> {
    series.iter().rev().nth(1).copied().flatten()
}

fn macd_sub_score(macd: f64, signal: f64) -> f64 {
    ((macd - signal) * 5.0 + 50.0).clamp(0.0, 100.0)
}

fn validate(bars: &[Bar], period: usize) -> Result<(), IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter(
            "period must be positive".to_string(),
        ));
    }
    if bars.len() < period + 1 {
        return Err(IndicatorError::InsufficientData {
            needed: period + 1,
            got: bars.len(),
        });
    }
    Ok(())
}

/// Latest daily indicator values feeding the technical score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSnapshot {
    pub rsi: Option<f64>,
    pub ma_ratio: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_hist: Option<f64>,
    /// Change of the clipped MACD sub-score between the last two bars
    pub macd_hist_diff: Option<f64>,
    pub mom: Option<f64>,
    pub adx: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    pub bb_position: Option<f64>,
    pub wr: Option<f64>,
    pub cci: Option<f64>,
    pub obv: Option<f64>,
    pub obv_change: Option<f64>,
    pub ma20: Option<f64>,
    pub ma20_prev: Option<f64>,
    pub close: f64,
    pub prev_close: Option<f64>,
}

impl TechnicalSnapshot {
    pub fn from_bars(bars: &[Bar], period: usize) -> Result<Self, IndicatorError> {
        validate(bars, period)?;

        let close_series = closes(bars);
        let close = close_series[close_series.len() - 1];

        let rsi_series = rsi(&close_series, period)?;
        let sma_series = sma(&close_series, period)?;
        let macd_series = macd(&close_series)?;
        let bands = bollinger(&close_series, period + BOLLINGER_OFFSET, BOLLINGER_DEV)?;
        let ma20_series = sma(&close_series, MA20_PERIOD)?;
        let obv_series = obv(bars);

        let ma_ratio = last(&sma_series).filter(|ma| *ma != 0.0).map(|ma| close / ma);

        let (macd_line, macd_signal) = (last(&macd_series.macd), last(&macd_series.signal));
        let macd_hist_diff = match (
            macd_line,
            macd_signal,
            prev(&macd_series.macd),
            prev(&macd_series.signal),
        ) {
            (Some(m), Some(s), Some(pm), Some(ps)) => {
                Some(macd_sub_score(m, s) - macd_sub_score(pm, ps))
            }
            _ => None,
        };

        let (bb_upper, bb_middle, bb_lower) =
            (last(&bands.upper), last(&bands.middle), last(&bands.lower));
        let bb_position = match (bb_upper, bb_lower) {
            (Some(upper), Some(lower)) if upper != lower => Some((close - lower) / (upper - lower)),
            _ => None,
        };

        let obv_change = if obv_series.len() > OBV_CHANGE_LAG {
            let base = obv_series[obv_series.len() - 1 - OBV_CHANGE_LAG];
            match (last(&obv_series), base) {
                (Some(now), Some(base)) if base != 0.0 => Some((now - base) / base),
                _ => None,
            }
        } else {
            None
        };

        Ok(Self {
            rsi: last(&rsi_series),
            ma_ratio,
            macd: macd_line,
            macd_signal,
            macd_hist: last(&macd_series.histogram),
            macd_hist_diff,
            mom: last(&mom(&close_series, period)?),
            adx: last(&adx(bars, period)?),
            bb_upper,
            bb_middle,
            bb_lower,
            bb_position,
            wr: last(&williams_r(bars, period)?),
            cci: last(&cci(bars, period)?),
            obv: last(&obv_series),
            obv_change,
            ma20: last(&ma20_series),
            ma20_prev: prev(&ma20_series),
            close,
            prev_close: close_series.iter().rev().nth(1).copied(),
        })
    }

    pub fn to_indicator_set(&self) -> IndicatorSet {
        let mut set = IndicatorSet::new();
        set.insert(IndicatorName::Rsi, self.rsi);
        set.insert(IndicatorName::MaRatio, self.ma_ratio);
        set.insert(IndicatorName::Macd, self.macd);
        set.insert(IndicatorName::MacdSignal, self.macd_signal);
        set.insert(IndicatorName::MacdHist, self.macd_hist);
        set.insert(IndicatorName::MacdHistDiff, self.macd_hist_diff);
        set.insert(IndicatorName::Mom, self.mom);
        set.insert(IndicatorName::Adx, self.adx);
        set.insert(IndicatorName::BbUpper, self.bb_upper);
        set.insert(IndicatorName::BbMiddle, self.bb_middle);
        set.insert(IndicatorName::BbLower, self.bb_lower);
        set.insert(IndicatorName::BbPosition, self.bb_position);
        set.insert(IndicatorName::Wr, self.wr);
        set.insert(IndicatorName::Cci, self.cci);
        set.insert(IndicatorName::Obv, self.obv);
        set.insert(IndicatorName::ObvChange, self.obv_change);
        set.insert(IndicatorName::Ma20, self.ma20);
        set.insert(IndicatorName::Close, Some(self.close));
        set
    }
}

/// Indicators recomputed on history plus the live bar
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RealtimeSnapshot {
    pub mfi: Option<f64>,
    pub bias: Option<f64>,
    pub atr: Option<f64>,
    pub volume_change_rate: Option<f64>,
    pub roc: Option<f64>,
    pub close: f64,
}

impl RealtimeSnapshot {
    /// `bars` must already end with the live bar (see `merge_spot`)
    pub fn from_bars(bars: &[Bar], period: usize) -> Result<Self, IndicatorError> {
        validate(bars, period)?;

        let close_series = closes(bars);
        let close = close_series[close_series.len() - 1];

        let bias = last(&sma(&close_series, period)?)
            .filter(|ma| *ma != 0.0)
            .map(|ma| (close - ma) / ma * 100.0);

        let recent = &bars[bars.len().saturating_sub(VOLUME_MEAN_WINDOW)..];
        let vol_mean = recent.iter().map(|b| b.volume).sum::<f64>() / recent.len() as f64;
        let volume_change_rate = if vol_mean != 0.0 {
            Some((bars[bars.len() - 1].volume - vol_mean) / vol_mean * 100.0)
        } else {
            None
        };

        Ok(Self {
            mfi: last(&mfi(bars, period)?),
            bias,
            atr: last(&atr(bars, period)?),
            volume_change_rate,
            roc: last(&roc(&close_series, period)?),
            close,
        })
    }

    pub fn to_indicator_set(&self) -> IndicatorSet {
        let mut set = IndicatorSet::new();
        set.insert(IndicatorName::Mfi, self.mfi);
        set.insert(IndicatorName::Bias, self.bias);
        set.insert(IndicatorName::Atr, self.atr);
        set.insert(IndicatorName::VolumeChangeRate, self.volume_change_rate);
        set.insert(IndicatorName::Roc, self.roc);
        set.insert(IndicatorName::Close, Some(self.close));
        set
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IndicatorName {
    Rsi,
    MaRatio,
    Macd,
    MacdSignal,
    MacdHist,
    MacdHistDiff,
    Mom,
    Adx,
    BbUpper,
    BbMiddle,
    BbLower,
    BbPosition,
    Wr,
    Cci,
    Obv,
    ObvChange,
    Ma20,
    Close,
    Mfi,
    Bias,
    Atr,
    VolumeChangeRate,
    Roc,
}

impl IndicatorName {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorName::Rsi => "RSI",
            IndicatorName::MaRatio => "MA_ratio",
            IndicatorName::Macd => "MACD",
            IndicatorName::MacdSignal => "MACD_signal",
            IndicatorName::MacdHist => "MACD_hist",
            IndicatorName::MacdHistDiff => "MACD_hist_diff",
            IndicatorName::Mom => "MOM",
            IndicatorName::Adx => "ADX",
            IndicatorName::BbUpper => "BB_upper",
            IndicatorName::BbMiddle => "BB_middle",
            IndicatorName::BbLower => "BB_lower",
            IndicatorName::BbPosition => "BB_position",
            IndicatorName::Wr => "WR",
            IndicatorName::Cci => "CCI",
            IndicatorName::Obv => "OBV",
            IndicatorName::ObvChange => "OBV_change",
            IndicatorName::Ma20 => "MA20",
            IndicatorName::Close => "Close",
            IndicatorName::Mfi => "MFI",
            IndicatorName::Bias => "BIAS",
            IndicatorName::Atr => "ATR",
            IndicatorName::VolumeChangeRate => "Volume_Change_Rate",
            IndicatorName::Roc => "ROC",
        }
    }
}

impl fmt::Display for IndicatorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named indicator values for one code; absent names have no value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    values: BTreeMap<IndicatorName, f64>,
}

impl IndicatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-finite and missing values are not stored
    pub fn insert(&mut self, name: IndicatorName, value: Option<f64>) {
        match value {
            Some(v) if v.is_finite() => {
                self.values.insert(name, v);
            }
            _ => {
                self.values.remove(&name);
            }
        }
    }

    pub fn get(&self, name: IndicatorName) -> Option<f64> {
        self.values.get(&name).copied()
    }

    /// Values from `other` overwrite values already present
    pub fn merge(mut self, other: IndicatorSet) -> Self {
        self.values.extend(other.values);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (IndicatorName, f64)> + '_ {
        self.values.iter().map(|(name, value)| (*name, *value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
