//! Julian day and calendar helpers shared by the ephemeris backends and
//! the progression/return calculators.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

/// Julian day of 2000-01-01 12:00 TT (treated as UT here).
pub const J2000_JD: f64 = 2_451_545.0;
/// Julian day of 1970-01-01 00:00 UTC.
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;
/// Mean tropical year in days.
pub const TROPICAL_YEAR_DAYS: f64 = 365.242_189;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Convert UTC datetime to Julian Day
pub fn datetime_to_julian_day(dt: DateTime<Utc>) -> f64 {
    UNIX_EPOCH_JD + dt.timestamp_millis() as f64 / MILLIS_PER_DAY
}

/// Convert Julian Day to UTC datetime (millisecond resolution)
pub fn julian_day_to_datetime(jd: f64) -> Option<DateTime<Utc>> {
    if !jd.is_finite() {
        return None;
    }
    let millis = ((jd - UNIX_EPOCH_JD) * MILLIS_PER_DAY).round();
    if millis.abs() > i64::MAX as f64 {
        return None;
    }
    Utc.timestamp_millis_opt(millis as i64).single()
}

/// Julian centuries since J2000.
pub fn julian_centuries(jd: f64) -> f64 {
    (jd - J2000_JD) / 36_525.0
}

/// Signed elapsed time in tropical years.
pub fn tropical_years_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_DAY / TROPICAL_YEAR_DAYS
}

/// Shift an instant by a fractional (possibly negative) number of days.
pub fn add_days(dt: DateTime<Utc>, days: f64) -> Option<DateTime<Utc>> {
    let millis = days * MILLIS_PER_DAY;
    if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
        return None;
    }
    dt.checked_add_signed(Duration::milliseconds(millis.round() as i64))
}

/// Parse a user-facing date.
///
/// Accepts RFC 3339 (`2024-03-01T08:00:00+09:00`), `YYYY-MM-DD HH:MM` (UTC)
/// and bare `YYYY-MM-DD`, which is taken at 12:00 UTC.
pub fn parse_moment(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// First instant (UTC) of a calendar month; `None` for an invalid month/year.
pub fn month_start(year: i32, month: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_j2000_round_trip() {
        let j2000 = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert!((datetime_to_julian_day(j2000) - J2000_JD).abs() < 1e-9);
        assert_eq!(julian_day_to_datetime(J2000_JD), Some(j2000));
    }

    #[test]
    fn test_tropical_years() {
        let a = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let b = add_days(a, TROPICAL_YEAR_DAYS * 2.0).unwrap();
        assert!((tropical_years_between(a, b) - 2.0).abs() < 1e-6);
        assert!((tropical_years_between(b, a) + 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_parse_moment_formats() {
        let noon = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(parse_moment("2024-03-01"), Some(noon));
        assert_eq!(
            parse_moment("2024-03-01T21:00:00+09:00"),
            Some(noon)
        );
        assert_eq!(parse_moment("2024-03-01 12:00"), Some(noon));
        assert_eq!(parse_moment("next tuesday"), None);
        assert_eq!(parse_moment("2024-02-30"), None);
    }

    #[test]
    fn test_month_start_rejects_bad_month() {
        assert!(month_start(2024, 13).is_none());
        assert!(month_start(2024, 12).is_some());
    }
}
