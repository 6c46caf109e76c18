use chrono::{Datelike, Duration, NaiveDate, Weekday};

const COMPACT_FORMAT: &str = "%Y%m%d";

/// Format a date as YYYYMMDD, the form the quote endpoints expect
pub fn to_compact(date: NaiveDate) -> String {
    date.format(COMPACT_FORMAT).to_string()
}

/// Parse a YYYYMMDD date
pub fn parse_compact(date_str: &str) -> anyhow::Result<NaiveDate> {
    Ok(NaiveDate::parse_from_str(date_str, COMPACT_FORMAT)?)
}

/// Calendar window ending at `end` and reaching back `days_ago` days
pub fn history_window(end: NaiveDate, days_ago: u32) -> (NaiveDate, NaiveDate) {
    (end - Duration::days(i64::from(days_ago)), end)
}

/// Check if it's weekend (Saturday or Sunday)
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Get the latest trading day on or before `date` (weekends only, no holiday calendar)
pub fn latest_trading_day(date: NaiveDate) -> NaiveDate {
    let mut day = date;
    while is_weekend(day) {
        day -= Duration::days(1);
    }
    day
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_compact_round_trip() {
        let date = ymd(2025, 7, 18);
        assert_eq!(to_compact(date), "20250718");
        assert_eq!(parse_compact("20250718").unwrap(), date);
        assert!(parse_compact("2025-07-18").is_err());
    }

    #[test]
    fn test_history_window() {
        let (start, end) = history_window(ymd(2025, 7, 18), 50);
        assert_eq!(start, ymd(2025, 5, 29));
        assert_eq!(end, ymd(2025, 7, 18));
    }

    #[test]
    fn test_latest_trading_day() {
        // 2025-07-19 is a Saturday
        assert!(is_weekend(ymd(2025, 7, 19)));
        assert_eq!(latest_trading_day(ymd(2025, 7, 19)), ymd(2025, 7, 18));
        assert_eq!(latest_trading_day(ymd(2025, 7, 20)), ymd(2025, 7, 18));
        assert_eq!(latest_trading_day(ymd(2025, 7, 16)), ymd(2025, 7, 16));
    }
}
