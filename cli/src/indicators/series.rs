//! Library-backed indicator series.
//!
//! The `ta` indicators emit a value from the first sample on. These helpers
//! blank out the warm-up window so a value only appears once the full
//! look-back is available, which is what the scorers expect from a
//! "latest value" lookup.

use super::{IndicatorError, Series};
use crate::models::Bar;
use ta::indicators::{
    AverageTrueRange, BollingerBands, MoneyFlowIndex, MovingAverageConvergenceDivergence,
    OnBalanceVolume, RelativeStrengthIndex, SimpleMovingAverage,
};
use ta::Next;

pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;

/// MACD line, signal line and histogram, index-aligned with the input
#[derive(Debug, Clone, Default)]
pub struct MacdSeries {
    pub macd: Series,
    pub signal: Series,
    pub histogram: Series,
}

/// Bollinger upper, middle and lower bands
#[derive(Debug, Clone, Default)]
pub struct BollingerSeries {
    pub upper: Series,
    pub middle: Series,
    pub lower: Series,
}

fn invalid(name: &str, err: impl std::fmt::Debug) -> IndicatorError {
    IndicatorError::InvalidParameter(format!("{}: {:?}", name, err))
}

/// Keep values from index `first_valid` onwards
fn warm_up(values: Vec<f64>, first_valid: usize) -> Series {
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| {
            if i >= first_valid && v.is_finite() {
                Some(v)
            } else {
                None
            }
        })
        .collect()
}

pub fn rsi(closes: &[f64], period: usize) -> Result<Series, IndicatorError> {
    let mut ind = RelativeStrengthIndex::new(period).map_err(|e| invalid("RSI", e))?;
    let values = closes.iter().map(|&c| ind.next(c)).collect();
    Ok(warm_up(values, period))
}

pub fn sma(values: &[f64], period: usize) -> Result<Series, IndicatorError> {
    let mut ind = SimpleMovingAverage::new(period).map_err(|e| invalid("SMA", e))?;
    let out = values.iter().map(|&v| ind.next(v)).collect();
    Ok(warm_up(out, period.saturating_sub(1)))
}

/// MACD(12, 26, 9); the signal line needs slow + signal - 2 prior bars
pub fn macd(closes: &[f64]) -> Result<MacdSeries, IndicatorError> {
    let mut ind = MovingAverageConvergenceDivergence::new(MACD_FAST, MACD_SLOW, MACD_SIGNAL)
        .map_err(|e| invalid("MACD", e))?;

    let mut macd = Vec::with_capacity(closes.len());
    let mut signal = Vec::with_capacity(closes.len());
    let mut histogram = Vec::with_capacity(closes.len());

    for &c in closes {
        let out = ind.next(c);
        macd.push(out.macd);
        signal.push(out.signal);
        histogram.push(out.histogram);
    }

    let first_valid = MACD_SLOW + MACD_SIGNAL - 2;
    Ok(MacdSeries {
        macd: warm_up(macd, first_valid),
        signal: warm_up(signal, first_valid),
        histogram: warm_up(histogram, first_valid),
    })
}

pub fn bollinger(closes: &[f64], period: usize, multiplier: f64) -> Result<BollingerSeries, IndicatorError> {
    let mut ind = BollingerBands::new(period, multiplier).map_err(|e| invalid("BBANDS", e))?;

    let mut upper = Vec::with_capacity(closes.len());
    let mut middle = Vec::with_capacity(closes.len());
    let mut lower = Vec::with_capacity(closes.len());

    for &c in closes {
        let out = ind.next(c);
        upper.push(out.upper);
        middle.push(out.average);
        lower.push(out.lower);
    }

    let first_valid = period.saturating_sub(1);
    Ok(BollingerSeries {
        upper: warm_up(upper, first_valid),
        middle: warm_up(middle, first_valid),
        lower: warm_up(lower, first_valid),
    })
}

pub fn atr(bars: &[Bar], period: usize) -> Result<Series, IndicatorError> {
    let mut ind = AverageTrueRange::new(period).map_err(|e| invalid("ATR", e))?;
    let values = bars.iter().map(|b| ind.next(b)).collect();
    Ok(warm_up(values, period))
}

pub fn mfi(bars: &[Bar], period: usize) -> Result<Series, IndicatorError> {
    let mut ind = MoneyFlowIndex::new(period).map_err(|e| invalid("MFI", e))?;
    let values = bars.iter().map(|b| ind.next(b)).collect();
    Ok(warm_up(values, period))
}

pub fn obv(bars: &[Bar]) -> Series {
    let mut ind = OnBalanceVolume::default();
    let values = bars.iter().map(|b| ind.next(b)).collect();
    warm_up(values, 0)
}
