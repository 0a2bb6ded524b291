//! Time related utils.

use chrono::TimeDelta;
use chrono::Utc;

/// DateTime in UTC, the only zone a signature is ever computed in.
pub type DateTime = chrono::DateTime<Utc>;

/// Return the current time.
pub fn now() -> DateTime {
    Utc::now()
}

/// Shift a time by a clock-skew offset in milliseconds.
pub fn apply_clock_offset(t: DateTime, offset_millis: i64) -> DateTime {
    t + TimeDelta::milliseconds(offset_millis)
}

/// Format a time into the signing date: `20220313`.
pub fn format_date(t: DateTime) -> String {
    t.format("%Y%m%d").to_string()
}

/// Format a time into the signing timestamp: `20220313T072004Z`.
///
/// No separators, no fractional seconds.
pub fn format_iso8601(t: DateTime) -> String {
    t.format("%Y%m%dT%H%M%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_time() -> DateTime {
        Utc.with_ymd_and_hms(1982, 12, 17, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_format_iso8601() {
        assert_eq!(format_iso8601(test_time()), "19821217T000000Z");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(test_time()), "19821217");
        assert_eq!(format_date(test_time()), &format_iso8601(test_time())[..8]);
    }

    #[test]
    fn test_apply_clock_offset() {
        let shifted = apply_clock_offset(test_time(), 1500);
        assert_eq!(format_iso8601(shifted), "19821217T000001Z");

        let shifted = apply_clock_offset(test_time(), -1000);
        assert_eq!(format_iso8601(shifted), "19821216T235959Z");

        assert_eq!(apply_clock_offset(test_time(), 0), test_time());
    }
}
