//! Human-friendly timestamp labels.

use chrono::{DateTime, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;

/// Label for `timestamp` relative to `now`.
///
/// Recent times render as "Just now", "5m ago", "3h ago", "Yesterday" or
/// "4d ago"; anything older than a week (or in the future) renders as an
/// absolute date such as "Jan 5, 2024".
#[must_use]
pub fn format_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(timestamp).num_seconds();

    match elapsed {
        s if s < 0 => format_absolute(timestamp),
        s if s < MINUTE => "Just now".to_string(),
        s if s < HOUR => format!("{}m ago", s / MINUTE),
        s if s < DAY => format!("{}h ago", s / HOUR),
        s if s < 2 * DAY => "Yesterday".to_string(),
        s if s < WEEK => format!("{}d ago", s / DAY),
        _ => format_absolute(timestamp),
    }
}

/// Label for `timestamp` relative to the current time.
#[must_use]
pub fn format_time_now(timestamp: DateTime<Utc>) -> String {
    format_time(timestamp, Utc::now())
}

/// Absolute date label, e.g. "Jan 5, 2024".
#[must_use]
pub fn format_absolute(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%b %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_relative_buckets() {
        let now = now();
        assert_eq!(format_time(now, now), "Just now");
        assert_eq!(format_time(now - Duration::seconds(59), now), "Just now");
        assert_eq!(format_time(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(format_time(now - Duration::hours(3), now), "3h ago");
        assert_eq!(format_time(now - Duration::hours(30), now), "Yesterday");
        assert_eq!(format_time(now - Duration::days(4), now), "4d ago");
    }

    #[test]
    fn test_absolute_for_old_and_future() {
        let now = now();
        assert_eq!(format_time(now - Duration::days(10), now), "May 10, 2024");
        assert_eq!(format_time(now + Duration::hours(1), now), "May 20, 2024");
        assert_eq!(
            format_absolute(Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap()),
            "Jan 5, 2024"
        );
    }

    #[test]
    fn test_deterministic() {
        let now = now();
        let ts = now - Duration::minutes(42);
        assert_eq!(format_time(ts, now), format_time(ts, now));
    }
}
