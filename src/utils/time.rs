//! Time utilities
//!
//! Booking dates and times are wall-clock values in the server's local zone.

use chrono::{Datelike, DateTime, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Today's date in the server's local zone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// First day of `date`'s month and first day of the following month
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day0(0).unwrap_or(date);
    let next = first
        .checked_add_months(Months::new(1))
        .unwrap_or(NaiveDate::MAX);
    (first, next)
}

/// UTC instant of local midnight at the start of `date`
pub fn local_midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    let naive = NaiveDateTime::new(date, NaiveTime::MIN);
    naive
        .and_local_timezone(Local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

/// Parse an `HH:MM` or `HH:MM:SS` wall-clock time
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(month_bounds(date(2024, 2, 15)), (date(2024, 2, 1), date(2024, 3, 1)));
        assert_eq!(month_bounds(date(2024, 12, 31)), (date(2024, 12, 1), date(2025, 1, 1)));
        assert_eq!(month_bounds(date(2024, 1, 1)).0.day(), 1);
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("09:00"), NaiveTime::from_hms_opt(9, 0, 0));
        assert_eq!(parse_time("17:30:00"), NaiveTime::from_hms_opt(17, 30, 0));
        assert!(parse_time("9am").is_none());
        assert!(parse_time("25:00").is_none());
    }

    #[test]
    fn test_local_midnight_is_before_next_day() {
        let d = date(2024, 6, 1);
        assert!(local_midnight_utc(d) < local_midnight_utc(date(2024, 6, 2)));
    }
}
