//! Interval bucket arithmetic for first-of-interval aggregation
//!
//! All bucket lengths divide one hour, so buckets are aligned within the
//! hour of the input timestamp. The bucket stamp carries a fixed minute
//! offset (0 for labs and respiratory settings; the observed export offset
//! for vitals).

use chrono::{DateTime, Duration, Timelike, Utc};

/// Snap a timestamp to its interval bucket stamp.
///
/// The bucket covers `[hour + n*interval, hour + (n+1)*interval)`; the
/// returned stamp is the bucket start plus `offset_minutes`, with seconds
/// and sub-seconds cleared.
pub fn snap_to_interval(
    timestamp: DateTime<Utc>,
    interval_minutes: u32,
    offset_minutes: u32,
) -> DateTime<Utc> {
    debug_assert!(interval_minutes > 0 && 60 % interval_minutes == 0);
    debug_assert!(offset_minutes < interval_minutes);

    let minute = timestamp.minute();
    let bucket_minute = (minute / interval_minutes) * interval_minutes + offset_minutes;

    timestamp
        .with_minute(bucket_minute)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        // bucket_minute < 60 by construction; with_* cannot fail here
        .unwrap_or(timestamp)
}

/// Duration of a fluid-balance window in whole hours (rounded down)
pub fn window_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - start).num_hours()
}

/// Check a fluid-balance window against the configured duration bounds
pub fn window_within_bounds(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    min_hours: i64,
    max_hours: i64,
) -> bool {
    let duration = end - start;
    duration >= Duration::hours(min_hours) && duration <= Duration::hours(max_hours)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 8, 6, hour, minute, second).unwrap()
    }

    #[test]
    fn test_hourly_snap_with_offset() {
        // Any reading within the hour lands on the :50 stamp
        assert_eq!(snap_to_interval(ts(14, 7, 12), 60, 50), ts(14, 50, 0));
        assert_eq!(snap_to_interval(ts(14, 50, 0), 60, 50), ts(14, 50, 0));
        assert_eq!(snap_to_interval(ts(14, 59, 59), 60, 50), ts(14, 50, 0));
        assert_eq!(snap_to_interval(ts(15, 0, 0), 60, 50), ts(15, 50, 0));
    }

    #[test]
    fn test_hourly_snap_is_idempotent() {
        let snapped = snap_to_interval(ts(14, 7, 12), 60, 50);
        assert_eq!(snap_to_interval(snapped, 60, 50), snapped);
    }

    #[test]
    fn test_half_hourly_snap() {
        assert_eq!(snap_to_interval(ts(14, 0, 0), 30, 0), ts(14, 0, 0));
        assert_eq!(snap_to_interval(ts(14, 29, 59), 30, 0), ts(14, 0, 0));
        assert_eq!(snap_to_interval(ts(14, 30, 0), 30, 0), ts(14, 30, 0));
        assert_eq!(snap_to_interval(ts(14, 42, 10), 30, 0), ts(14, 30, 0));
    }

    #[test]
    fn test_minutely_snap_truncates_seconds() {
        assert_eq!(snap_to_interval(ts(14, 59, 42), 1, 0), ts(14, 59, 0));
        assert_eq!(snap_to_interval(ts(14, 59, 0), 1, 0), ts(14, 59, 0));
    }

    #[test]
    fn test_configurable_offset() {
        // The :50 offset is empirical; other sites may stamp differently
        assert_eq!(snap_to_interval(ts(14, 7, 0), 60, 0), ts(14, 0, 0));
        assert_eq!(snap_to_interval(ts(14, 7, 0), 60, 15), ts(14, 15, 0));
    }

    #[test]
    fn test_window_bounds() {
        let start = Utc.with_ymd_and_hms(2024, 8, 3, 6, 0, 0).unwrap();
        let end_72h = Utc.with_ymd_and_hms(2024, 8, 6, 6, 0, 0).unwrap();
        let end_48h = Utc.with_ymd_and_hms(2024, 8, 5, 6, 0, 0).unwrap();

        assert_eq!(window_hours(start, end_72h), 72);
        assert!(window_within_bounds(start, end_72h, 71, 73));
        assert!(!window_within_bounds(start, end_48h, 71, 73));
    }
}
