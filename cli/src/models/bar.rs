use crate::utils::date::{latest_trading_day, parse_compact};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily OHLCV bar, front-adjusted prices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Typical price used by CCI and MFI
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }
}

impl ta::Open for Bar {
    fn open(&self) -> f64 {
        self.open
    }
}

impl ta::High for Bar {
    fn high(&self) -> f64 {
        self.high
    }
}

impl ta::Low for Bar {
    fn low(&self) -> f64 {
        self.low
    }
}

impl ta::Close for Bar {
    fn close(&self) -> f64 {
        self.close
    }
}

impl ta::Volume for Bar {
    fn volume(&self) -> f64 {
        self.volume
    }
}

/// Real-time quote for one code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotQuote {
    pub code: String,
    pub name: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    /// Last traded price, stands in for the close during the session
    pub latest: f64,
    pub prev_close: f64,
    pub volume: f64,
    pub total_shares: Option<f64>,
}

impl SpotQuote {
    /// Map the live quote onto a bar dated `date`
    pub fn to_bar(&self, date: NaiveDate) -> Bar {
        // Before the open the feed reports zero open/high/low
        let open = if self.open > 0.0 { self.open } else { self.latest };
        let high = if self.high > 0.0 { self.high } else { self.latest };
        let low = if self.low > 0.0 { self.low } else { self.latest };

        Bar::new(date, open, high, low, self.latest, self.volume)
    }

    /// Suspended codes come back with no last price
    pub fn is_trading(&self) -> bool {
        self.latest > 0.0 && self.latest.is_finite()
    }
}

/// Fold the live quote into daily history.
///
/// On a trading day the quote becomes today's bar, replacing it if history
/// already has one. Outside a trading day the feed repeats the last session,
/// so the quote overwrites the last bar and keeps its date.
pub fn merge_spot(mut history: Vec<Bar>, quote: &SpotQuote, today: NaiveDate) -> Vec<Bar> {
    let trading_day = latest_trading_day(today) == today;

    match history.last_mut() {
        Some(last) if !trading_day || last.date == today => {
            *last = quote.to_bar(last.date);
        }
        _ => history.push(quote.to_bar(latest_trading_day(today))),
    }

    history
}

/// Raw CSV row format: date,open,high,low,close,volume
#[derive(Debug, Deserialize)]
pub struct RawBar {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl RawBar {
    /// Convert to Bar, accepting YYYY-MM-DD or YYYYMMDD dates
    pub fn to_bar(&self) -> anyhow::Result<Bar> {
        let date = match NaiveDate::parse_from_str(&self.date, "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => parse_compact(&self.date)?,
        };

        Ok(Bar::new(
            date,
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
        ))
    }
}

/// Closing prices of a bar slice
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
    }

    fn quote(latest: f64) -> SpotQuote {
        SpotQuote {
            code: "600519".to_string(),
            name: "贵州茅台".to_string(),
            open: 10.0,
            high: 11.0,
            low: 9.5,
            latest,
            prev_close: 10.0,
            volume: 1200.0,
            total_shares: None,
        }
    }

    #[test]
    fn test_merge_spot_appends_new_day() {
        let history = vec![Bar::new(day(17), 10.0, 10.5, 9.8, 10.2, 1000.0)];
        let merged = merge_spot(history, &quote(10.8), day(18));

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1].date, day(18));
        assert_eq!(merged[1].close, 10.8);
    }

    #[test]
    fn test_merge_spot_replaces_same_day() {
        let history = vec![
            Bar::new(day(17), 10.0, 10.5, 9.8, 10.2, 1000.0),
            Bar::new(day(18), 10.2, 10.4, 10.0, 10.3, 500.0),
        ];
        let merged = merge_spot(history, &quote(10.6), day(18));

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1].close, 10.6);
        assert_eq!(merged[1].volume, 1200.0);
    }

    #[test]
    fn test_merge_spot_on_weekend_replaces_last_session() {
        // 2025-07-18 is a Friday
        let history: Vec<Bar> = (14..=18)
            .map(|d| Bar::new(day(d), 10.0, 10.5, 9.8, 10.0 + d as f64 * 0.1, 1000.0))
            .collect();
        let mut friday = quote(11.8);
        friday.prev_close = 11.7;

        let saturday = merge_spot(history.clone(), &friday, day(19));
        assert_eq!(saturday.len(), 5);
        assert_eq!(saturday[4].date, day(18));
        assert_eq!(saturday[4].close, 11.8);
        assert_eq!(saturday[3], history[3]);

        let sunday = merge_spot(history, &friday, day(20));
        assert_eq!(sunday.len(), 5);
        assert_eq!(sunday[4].date, day(18));
    }

    #[test]
    fn test_merge_spot_empty_history() {
        let merged = merge_spot(Vec::new(), &quote(10.8), day(19));
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].date, day(18));
    }

    #[test]
    fn test_spot_bar_before_open_uses_latest() {
        let mut q = quote(10.0);
        q.open = 0.0;
        q.high = 0.0;
        q.low = 0.0;
        let bar = q.to_bar(day(18));
        assert_eq!(bar.open, 10.0);
        assert_eq!(bar.high, 10.0);
        assert_eq!(bar.low, 10.0);
    }

    #[test]
    fn test_raw_bar_date_formats() {
        let raw = RawBar {
            date: "20250718".to_string(),
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
            volume: 10.0,
        };
        assert_eq!(raw.to_bar().unwrap().date, day(18));

        let raw = RawBar {
            date: "2025-07-18".to_string(),
            ..raw
        };
        assert_eq!(raw.to_bar().unwrap().date, day(18));

        let bad = RawBar {
            date: "18/07/2025".to_string(),
            ..raw
        };
        assert!(bad.to_bar().is_err());
    }
}
