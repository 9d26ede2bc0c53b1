// src/services/recency.rs

//! Trailing-window filter on publish timestamps.

use chrono::{DateTime, Utc};

use crate::models::PublishedAt;

/// Accepts listings published within the last `window_days` whole days.
#[derive(Debug, Clone, Copy)]
pub struct RecencyFilter {
    now: DateTime<Utc>,
    window_days: i64,
}

impl RecencyFilter {
    pub fn new(now: DateTime<Utc>, window_days: u32) -> Self {
        Self {
            now,
            window_days: i64::from(window_days),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Whether a raw timestamp is recent.
    ///
    /// Missing and unparsable timestamps are never recent.
    pub fn is_recent(&self, published_at: Option<&str>) -> bool {
        self.accepts(&PublishedAt::parse(published_at))
    }

    /// Whether a parsed timestamp is recent.
    pub fn accepts(&self, published: &PublishedAt) -> bool {
        published
            .elapsed_days(self.now)
            .is_some_and(|days| days <= self.window_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, SecondsFormat, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 5, 12, 0, 0).unwrap()
    }

    fn ago(hours: i64) -> String {
        (now() - Duration::hours(hours)).to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    #[test]
    fn test_missing_and_malformed_are_not_recent() {
        let filter = RecencyFilter::new(now(), 3);
        assert!(!filter.is_recent(None));
        assert!(!filter.is_recent(Some("")));
        assert!(!filter.is_recent(Some("not a date")));
        assert!(!filter.is_recent(Some("2025-13-45T99:00:00Z")));
    }

    #[test]
    fn test_window_boundary_uses_whole_days() {
        let filter = RecencyFilter::new(now(), 3);
        assert!(filter.is_recent(Some(&ago(0))));
        assert!(filter.is_recent(Some(&ago(3 * 24))));
        // 3 days 23 hours is still 3 whole days
        assert!(filter.is_recent(Some(&ago(4 * 24 - 1))));
        assert!(!filter.is_recent(Some(&ago(4 * 24))));
    }

    #[test]
    fn test_offsets_are_respected() {
        let filter = RecencyFilter::new(now(), 3);
        // 2025-10-01T16:00+0300 is 13:00Z, i.e. 3 days 23 hours before now
        assert!(filter.is_recent(Some("2025-10-01T16:00:00+0300")));
        // 2025-10-01T14:00+0300 is 11:00Z, 4 days 1 hour before now
        assert!(!filter.is_recent(Some("2025-10-01T14:00:00+0300")));
    }

    #[test]
    fn test_future_timestamps_are_recent() {
        let filter = RecencyFilter::new(now(), 3);
        assert!(filter.is_recent(Some("2025-10-06T12:00:00Z")));
    }

    #[test]
    fn test_monotonic_in_elapsed_time() {
        let filter = RecencyFilter::new(now(), 3);
        let verdicts: Vec<bool> = (0..24 * 10)
            .step_by(5)
            .map(|h| filter.is_recent(Some(&ago(h))))
            .collect();
        // Once rejected, every older timestamp stays rejected
        let first_reject = verdicts.iter().position(|v| !v).unwrap();
        assert!(verdicts[first_reject..].iter().all(|v| !v));
        assert!(verdicts[..first_reject].iter().all(|v| *v));
    }
}
