// =============================================================================
// Hand-rolled oscillators
// =============================================================================
//
// MOM, ROC, Williams %R, CCI and ADX are not in the indicator library. They
// follow the same convention as the library-backed series: one entry per
// input bar, `None` until the look-back is complete.
// =============================================================================

use super::{IndicatorError, Series};
use crate::models::Bar;
use ta::indicators::{Maximum, Minimum};
use ta::Next;

fn check_period(name: &str, period: usize) -> Result<(), IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter(format!(
            "{}: period must be positive",
            name
        )));
    }
    Ok(())
}

/// Momentum: close[t] - close[t - period]
pub fn mom(closes: &[f64], period: usize) -> Result<Series, IndicatorError> {
    check_period("MOM", period)?;
    Ok((0..closes.len())
        .map(|t| (t >= period).then(|| closes[t] - closes[t - period]))
        .collect())
}

/// Rate of change in percent
pub fn roc(closes: &[f64], period: usize) -> Result<Series, IndicatorError> {
    check_period("ROC", period)?;
    Ok((0..closes.len())
        .map(|t| {
            if t < period || closes[t - period] == 0.0 {
                return None;
            }
            Some((closes[t] / closes[t - period] - 1.0) * 100.0)
        })
        .collect())
}

/// Williams %R in [-100, 0]
pub fn williams_r(bars: &[Bar], period: usize) -> Result<Series, IndicatorError> {
    let mut highest = Maximum::new(period)
        .map_err(|e| IndicatorError::InvalidParameter(format!("WILLR: {:?}", e)))?;
    let mut lowest = Minimum::new(period)
        .map_err(|e| IndicatorError::InvalidParameter(format!("WILLR: {:?}", e)))?;

    Ok(bars
        .iter()
        .enumerate()
        .map(|(t, bar)| {
            let hh = highest.next(bar.high);
            let ll = lowest.next(bar.low);
            if t + 1 < period {
                return None;
            }
            let range = hh - ll;
            if range == 0.0 {
                Some(0.0)
            } else {
                Some((hh - bar.close) / range * -100.0)
            }
        })
        .collect())
}

/// Commodity Channel Index with the usual 0.015 constant
pub fn cci(bars: &[Bar], period: usize) -> Result<Series, IndicatorError> {
    check_period("CCI", period)?;
    let tp: Vec<f64> = bars.iter().map(Bar::typical_price).collect();
    let p = period as f64;

    Ok((0..tp.len())
        .map(|t| {
            if t + 1 < period {
                return None;
            }
            let window = &tp[t + 1 - period..=t];
            let mean = window.iter().sum::<f64>() / p;
            let mad = window.iter().map(|v| (v - mean).abs()).sum::<f64>() / p;
            if mad == 0.0 {
                Some(0.0)
            } else {
                Some((tp[t] - mean) / (0.015 * mad))
            }
        })
        .collect())
}

fn dx(plus_dm: f64, minus_dm: f64, tr: f64) -> f64 {
    if tr == 0.0 {
        return 0.0;
    }
    let plus_di = plus_dm / tr * 100.0;
    let minus_di = minus_dm / tr * 100.0;
    let sum = plus_di + minus_di;
    if sum == 0.0 {
        0.0
    } else {
        (plus_di - minus_di).abs() / sum * 100.0
    }
}

/// Average Directional Index with Wilder smoothing.
///
/// The first value lands on index `2 * period - 1`: `period` transitions seed
/// the smoothed +DM/-DM/TR, then `period` DX values seed the average.
pub fn adx(bars: &[Bar], period: usize) -> Result<Series, IndicatorError> {
    check_period("ADX", period)?;
    let n = bars.len();
    let mut out: Series = vec![None; n];
    if n < 2 * period {
        return Ok(out);
    }

    let p = period as f64;
    let mut plus_dm = vec![0.0; n];
    let mut minus_dm = vec![0.0; n];
    let mut tr = vec![0.0; n];

    for i in 1..n {
        let (cur, prev) = (&bars[i], &bars[i - 1]);
        tr[i] = (cur.high - cur.low)
            .max((cur.high - prev.close).abs())
            .max((cur.low - prev.close).abs());

        let up_move = cur.high - prev.high;
        let down_move = prev.low - cur.low;
        if up_move > down_move && up_move > 0.0 {
            plus_dm[i] = up_move;
        }
        if down_move > up_move && down_move > 0.0 {
            minus_dm[i] = down_move;
        }
    }

    let mut s_plus: f64 = plus_dm[1..=period].iter().sum();
    let mut s_minus: f64 = minus_dm[1..=period].iter().sum();
    let mut s_tr: f64 = tr[1..=period].iter().sum();

    let mut dx_values = Vec::with_capacity(n - period);
    dx_values.push(dx(s_plus, s_minus, s_tr));

    for i in period + 1..n {
        s_plus = s_plus - s_plus / p + plus_dm[i];
        s_minus = s_minus - s_minus / p + minus_dm[i];
        s_tr = s_tr - s_tr / p + tr[i];
        dx_values.push(dx(s_plus, s_minus, s_tr));
    }

    // dx_values[k] belongs to bar index period + k
    let mut value = dx_values[..period].iter().sum::<f64>() / p;
    out[2 * period - 1] = Some(value);

    for (k, &d) in dx_values.iter().enumerate().skip(period) {
        value = (value * (p - 1.0) + d) / p;
        out[period + k] = Some(value);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(i: i64, high: f64, low: f64, close: f64) -> Bar {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        Bar::new(start + chrono::Duration::days(i), close, high, low, close, 1000.0)
    }

    fn trending_bars(n: usize) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let c = 10.0 + i as f64;
                bar(i as i64, c + 0.5, c - 0.5, c)
            })
            .collect()
    }

    #[test]
    fn test_mom_and_roc() {
        let closes = [10.0, 11.0, 12.0, 15.0];
        let m = mom(&closes, 2).unwrap();
        assert_eq!(m[1], None);
        assert_eq!(m[2], Some(2.0));
        assert_eq!(m[3], Some(4.0));

        let r = roc(&closes, 2).unwrap();
        assert!((r[2].unwrap() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_roc_zero_base_is_none() {
        let r = roc(&[0.0, 1.0, 2.0], 1).unwrap();
        assert_eq!(r[1], None);
        assert_eq!(r[2], Some(100.0));
    }

    #[test]
    fn test_williams_r_bounds() {
        let bars = vec![
            bar(0, 11.0, 9.0, 10.0),
            bar(1, 12.0, 10.0, 12.0),
            bar(2, 12.0, 8.0, 8.0),
        ];
        let wr = williams_r(&bars, 3).unwrap();
        assert_eq!(wr[1], None);
        // close at the lowest low of the window
        assert!((wr[2].unwrap() + 100.0).abs() < 1e-9);

        let top = williams_r(&bars[..2], 2).unwrap();
        assert!(top[1].unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_cci_flat_series_is_zero() {
        let bars: Vec<Bar> = (0..10).map(|i| bar(i, 10.5, 9.5, 10.0)).collect();
        let series = cci(&bars, 5).unwrap();
        assert_eq!(series[3], None);
        assert_eq!(series[9], Some(0.0));
    }

    #[test]
    fn test_cci_breakout_is_positive() {
        let mut bars: Vec<Bar> = (0..9).map(|i| bar(i, 10.5, 9.5, 10.0)).collect();
        bars.push(bar(9, 13.0, 11.0, 12.5));
        let last = cci(&bars, 5).unwrap()[9].unwrap();
        assert!(last > 100.0);
    }

    #[test]
    fn test_adx_first_value_index() {
        let bars = trending_bars(40);
        let series = adx(&bars, 14).unwrap();
        assert!(series[26].is_none());
        assert!(series[27].is_some());
        // a steady uptrend has all movement on the plus side
        let last = series[39].unwrap();
        assert!(last > 90.0, "expected strong trend, got {last}");
    }

    #[test]
    fn test_adx_short_input() {
        let bars = trending_bars(10);
        let series = adx(&bars, 14).unwrap();
        assert_eq!(series.len(), 10);
        assert!(series.iter().all(Option::is_none));
        assert!(adx(&bars, 0).is_err());
    }
}
