//! Session Window
//!
//! Core data model for a time-boxed remote session: the start/end timestamps
//! granted by the backend plus the account's hard cap, and the policy for
//! when to interrupt the user about expiry. All timestamps are UTC; the wall
//! clock enters only through an explicit `now` argument so the math stays
//! testable.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The start/end timestamps bounding the user's current allotment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionWindow {
    /// Session start as granted by the backend
    pub start: DateTime<Utc>,
    /// Session end as granted by the backend
    pub end: DateTime<Utc>,
    /// Maximum allowed session duration, in seconds
    pub max_duration_secs: i64,
}

impl SessionWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, max_duration_secs: i64) -> Self {
        Self {
            start,
            end,
            max_duration_secs,
        }
    }

    /// Milliseconds until the session ends. Negative once expired.
    pub fn remaining_ms(&self, now: DateTime<Utc>) -> i64 {
        (self.end - now).num_milliseconds()
    }

    /// Fractional minutes until the session ends.
    pub fn minutes_remaining(&self, now: DateTime<Utc>) -> f64 {
        self.remaining_ms(now) as f64 / 60_000.0
    }

    /// Whole minutes for display, rounded up so "1 minute left" never reads
    /// as zero while time remains.
    pub fn minutes_remaining_display(&self, now: DateTime<Utc>) -> i64 {
        self.minutes_remaining(now).ceil() as i64
    }

    /// Whether the window is inside the warning threshold: still running but
    /// ending in less than `threshold_minutes`. Already-expired windows are
    /// outside; there is nothing left to renew.
    pub fn within_threshold(&self, now: DateTime<Utc>, threshold_minutes: u32) -> bool {
        let remaining = self.remaining_ms(now);
        remaining > 0 && remaining < i64::from(threshold_minutes) * 60_000
    }

    /// Whether the session has outgrown its maximum allowed lifetime.
    ///
    /// Compares granted span against the cap, `start + max_duration < end +
    /// grace`, so the answer does not drift with the wall clock. Once true,
    /// renewal is no longer offered.
    pub fn exceeded_max_lifetime(&self, grace: Duration) -> bool {
        self.start + Duration::seconds(self.max_duration_secs) < self.end + grace
    }
}

/// Policy for when to warn the user about expiry. Fixed after config load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPolicy {
    /// Minutes before expiry at which the renewal prompt fires
    pub threshold_minutes: u32,
}

impl NotificationPolicy {
    /// How long an unanswered prompt stays up before it is abandoned: the
    /// same span as the warning threshold.
    pub fn prompt_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(u64::from(self.threshold_minutes) * 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 2, hour, min, sec).unwrap()
    }

    #[test]
    fn test_remaining_ms_counts_down() {
        let window = SessionWindow::new(at(15, 30, 0), at(16, 30, 0), 28800);

        assert_eq!(window.remaining_ms(at(15, 30, 0)), 3_600_000);
        assert_eq!(window.remaining_ms(at(16, 29, 59)), 1_000);
        assert_eq!(window.remaining_ms(at(16, 30, 0)), 0);
        assert_eq!(window.remaining_ms(at(16, 30, 1)), -1_000);
    }

    #[test]
    fn test_within_threshold_boundaries() {
        let window = SessionWindow::new(at(12, 0, 0), at(16, 0, 0), 28800);

        // 9.5 minutes remaining: inside a 10-minute threshold
        assert!(window.within_threshold(at(15, 50, 30), 10));
        // 10.5 minutes remaining: outside
        assert!(!window.within_threshold(at(15, 49, 30), 10));
        // exactly 10 minutes remaining: outside (strict comparison)
        assert!(!window.within_threshold(at(15, 50, 0), 10));
    }

    #[test]
    fn test_expired_window_is_outside_threshold() {
        let window = SessionWindow::new(at(12, 0, 0), at(13, 0, 0), 28800);

        assert!(!window.within_threshold(at(13, 0, 0), 10));
        assert!(!window.within_threshold(at(14, 0, 0), 10));
    }

    #[test]
    fn test_display_minutes_round_up() {
        let window = SessionWindow::new(at(12, 0, 0), at(13, 0, 0), 28800);

        assert_eq!(window.minutes_remaining_display(at(12, 50, 30)), 10);
        assert_eq!(window.minutes_remaining_display(at(12, 59, 59)), 1);
        assert_eq!(window.minutes_remaining_display(at(12, 55, 0)), 5);
    }

    #[test]
    fn test_max_lifetime_with_grace() {
        // 4 hour cap, 1 hour grace: the limit trips once more than 3 hours
        // have been granted.
        let grace = Duration::minutes(60);
        let cap = 4 * 3600;

        let modest = SessionWindow::new(at(8, 0, 0), at(10, 0, 0), cap);
        assert!(!modest.exceeded_max_lifetime(grace));

        let at_margin = SessionWindow::new(at(8, 0, 0), at(11, 0, 0), cap);
        assert!(!at_margin.exceeded_max_lifetime(grace));

        let over = SessionWindow::new(at(8, 0, 0), at(11, 30, 0), cap);
        assert!(over.exceeded_max_lifetime(grace));
    }

    #[test]
    fn test_extension_can_trip_max_lifetime() {
        let grace = Duration::minutes(60);
        let cap = 4 * 3600;

        let before = SessionWindow::new(at(8, 0, 0), at(11, 0, 0), cap);
        assert!(!before.exceeded_max_lifetime(grace));

        // Granting another half hour pushes the window past the cap.
        let after = SessionWindow::new(before.start, before.end + Duration::minutes(30), cap);
        assert!(after.exceeded_max_lifetime(grace));
    }

    #[test]
    fn test_prompt_timeout_matches_threshold() {
        let policy = NotificationPolicy {
            threshold_minutes: 10,
        };
        assert_eq!(policy.prompt_timeout(), std::time::Duration::from_secs(600));
    }
}
