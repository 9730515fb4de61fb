//! Timestamp and date-interval utilities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Format a timestamp as a day-granular `YYYY-MM-DD` string, the granularity
/// the imagery provider's time-range filter works at.
pub fn format_date(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// Closed date interval, inclusive-day semantics at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DateInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Human-readable label used in response metadata and logs,
    /// e.g. `2026-07-31 to 2026-08-30`.
    pub fn label(&self) -> String {
        format!("{} to {}", format_date(self.start), format_date(self.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800);
    }

    #[test]
    fn test_format_date_day_granular() {
        let ts = Utc.with_ymd_and_hms(2026, 8, 30, 15, 42, 7).unwrap();
        assert_eq!(format_date(ts), "2026-08-30");
    }

    #[test]
    fn test_interval_label() {
        let start = Utc.with_ymd_and_hms(2026, 7, 31, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 8, 30, 0, 0, 0).unwrap();
        let interval = DateInterval::new(start, end);
        assert_eq!(interval.label(), "2026-07-31 to 2026-08-30");
    }
}
