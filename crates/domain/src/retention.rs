//! Retention window rules.
//!
//! Pure functions over resource age; callers sample "now" once per run and
//! pass it in so every decision within a run agrees on the same instant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Retention applied when the invocation does not request one.
pub const DEFAULT_RETENTION_DAYS: u32 = 7;

/// How long a resource must exist before it may be reclaimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "days", rename_all = "snake_case")]
pub enum RetentionConfig {
    /// Resources strictly older than this many whole days are expired.
    Days(u32),
    /// Age is not checked; every resource counts as expired.
    Unenforced,
}

impl RetentionConfig {
    /// Maps a requested day count onto a retention config.
    ///
    /// Absent means the default window. Zero or negative disables retention
    /// entirely; it does not mean "same-day cleanup".
    #[must_use]
    pub fn from_requested_days(requested_days: Option<i64>) -> Self {
        match requested_days {
            None => Self::Days(DEFAULT_RETENTION_DAYS),
            Some(days) if days <= 0 => Self::Unenforced,
            Some(days) => Self::Days(u32::try_from(days).unwrap_or(u32::MAX)),
        }
    }
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self::Days(DEFAULT_RETENTION_DAYS)
    }
}

impl std::fmt::Display for RetentionConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Days(days) => write!(formatter, "{days} days"),
            Self::Unenforced => formatter.write_str("unenforced"),
        }
    }
}

/// Whole days elapsed between `started_at` and `now`, truncated toward zero.
#[must_use]
pub fn age_in_days(started_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    now.signed_duration_since(started_at).num_days()
}

/// Returns true when a resource of `age_days` is past the retention window.
///
/// A resource exactly at the threshold is not yet expired.
#[must_use]
pub fn is_expired(age_days: i64, config: RetentionConfig) -> bool {
    match config {
        RetentionConfig::Unenforced => true,
        RetentionConfig::Days(threshold) => age_days > i64::from(threshold),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;

    use super::{DEFAULT_RETENTION_DAYS, RetentionConfig, age_in_days, is_expired};

    #[test]
    fn threshold_boundary_is_exclusive() {
        let config = RetentionConfig::Days(7);
        assert!(!is_expired(7, config));
        assert!(is_expired(8, config));
    }

    #[test]
    fn unenforced_expires_brand_new_resources() {
        assert!(is_expired(0, RetentionConfig::Unenforced));
        assert!(is_expired(-1, RetentionConfig::Unenforced));
    }

    #[test]
    fn zero_day_window_differs_from_unenforced() {
        assert!(!is_expired(0, RetentionConfig::Days(0)));
        assert!(is_expired(1, RetentionConfig::Days(0)));
    }

    #[test]
    fn requested_days_default_and_sentinel() {
        assert_eq!(
            RetentionConfig::from_requested_days(None),
            RetentionConfig::Days(DEFAULT_RETENTION_DAYS)
        );
        assert_eq!(
            RetentionConfig::from_requested_days(Some(0)),
            RetentionConfig::Unenforced
        );
        assert_eq!(
            RetentionConfig::from_requested_days(Some(-3)),
            RetentionConfig::Unenforced
        );
        assert_eq!(
            RetentionConfig::from_requested_days(Some(30)),
            RetentionConfig::Days(30)
        );
        assert_eq!(
            RetentionConfig::from_requested_days(Some(i64::MAX)),
            RetentionConfig::Days(u32::MAX)
        );
    }

    #[test]
    fn age_truncates_partial_days() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).single();
        assert!(now.is_some());
        let now = now.unwrap_or_else(|| unreachable!());

        assert_eq!(age_in_days(now - Duration::hours(23), now), 0);
        assert_eq!(age_in_days(now - Duration::hours(47), now), 1);
        assert_eq!(age_in_days(now - Duration::days(10), now), 10);
        assert_eq!(age_in_days(now + Duration::hours(5), now), 0);
    }

    proptest! {
        #[test]
        fn expiry_matches_strict_threshold(age in -1_000_i64..10_000, threshold in 0_u32..5_000) {
            prop_assert_eq!(
                is_expired(age, RetentionConfig::Days(threshold)),
                age > i64::from(threshold)
            );
        }

        #[test]
        fn unenforced_is_always_expired(age in any::<i64>()) {
            prop_assert!(is_expired(age, RetentionConfig::Unenforced));
        }

        #[test]
        fn whole_day_offsets_produce_exact_age(days in 0_i64..20_000, extra_seconds in 0_i64..86_399) {
            let now = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).single().unwrap_or_else(|| unreachable!());
            let started_at = now - Duration::days(days) - Duration::seconds(extra_seconds);
            prop_assert_eq!(age_in_days(started_at, now), days);
        }
    }
}
