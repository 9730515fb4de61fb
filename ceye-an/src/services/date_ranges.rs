//! Date-range arithmetic for comparison windows
//!
//! Turns a comparison option into two closed date intervals: the current
//! period (always the last 30 days) and a historical baseline whose placement
//! depends on the option. Pure functions of `now`, so tests pin the clock.

use ceye_common::DateInterval;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::error::ApiError;
use crate::types::ComparisonOption;

/// A custom baseline date must be at least this many days in the past
pub const MIN_CUSTOM_AGE_DAYS: i64 = 60;

/// Length of every analysis window, in days
pub const WINDOW_DAYS: i64 = 30;

/// The two date intervals an analysis compares
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateRanges {
    pub current: DateInterval,
    pub historical: DateInterval,
}

/// Whole days elapsed between a baseline date and `now` (day-granular)
pub fn elapsed_days(date: NaiveDate, now: DateTime<Utc>) -> i64 {
    (now.date_naive() - date).num_days()
}

/// Enforce the 60-day rule for custom baselines, returning the elapsed days.
///
/// Called from both request intake and [`compute`]; the duplication of call
/// sites is deliberate, the logic lives only here.
pub fn validate_custom_date(date: NaiveDate, now: DateTime<Utc>) -> Result<i64, ApiError> {
    let elapsed = elapsed_days(date, now);
    if elapsed < MIN_CUSTOM_AGE_DAYS {
        return Err(ApiError::Validation(format!(
            "custom comparison date must be at least {MIN_CUSTOM_AGE_DAYS} days in the past \
             (got {elapsed} days)"
        )));
    }
    Ok(elapsed)
}

/// Compute the current and historical intervals for a comparison option.
///
/// - current is always `[now - 30d, now]`
/// - `30days`: historical is the 30 days immediately preceding current
/// - `60days`: historical is a 30-day window ending 60 days before now
/// - `custom`: historical is the 30 days ending at the requested date
pub fn compute(option: &ComparisonOption, now: DateTime<Utc>) -> Result<DateRanges, ApiError> {
    let current_end = now;
    let current_start = now - Duration::days(WINDOW_DAYS);

    let (historical_start, historical_end) = match option {
        ComparisonOption::Last30 => {
            let end = current_start;
            (end - Duration::days(WINDOW_DAYS), end)
        }
        ComparisonOption::Last60 => {
            let end = now - Duration::days(60);
            (end - Duration::days(WINDOW_DAYS), end)
        }
        ComparisonOption::Custom { date } => {
            validate_custom_date(*date, now)?;
            let end = date.and_time(NaiveTime::MIN).and_utc();
            (end - Duration::days(WINDOW_DAYS), end)
        }
    };

    Ok(DateRanges {
        current: DateInterval::new(current_start, current_end),
        historical: DateInterval::new(historical_start, historical_end),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_current_window_is_always_30_days() {
        let now = fixed_now();
        for option in [
            ComparisonOption::Last30,
            ComparisonOption::Last60,
            ComparisonOption::Custom {
                date: NaiveDate::from_ymd_opt(2025, 8, 30).unwrap(),
            },
        ] {
            let ranges = compute(&option, now).unwrap();
            assert_eq!(ranges.current.end, now);
            assert_eq!(ranges.current.end - ranges.current.start, Duration::days(30));
        }
    }

    #[test]
    fn test_last30_historical_abuts_current() {
        let ranges = compute(&ComparisonOption::Last30, fixed_now()).unwrap();
        assert_eq!(ranges.historical.end, ranges.current.start);
        assert_eq!(
            ranges.historical.end - ranges.historical.start,
            Duration::days(30)
        );
    }

    #[test]
    fn test_last60_historical_ends_60_days_back() {
        let now = fixed_now();
        let ranges = compute(&ComparisonOption::Last60, now).unwrap();
        assert_eq!(ranges.historical.end, now - Duration::days(60));
        assert_eq!(
            ranges.historical.start,
            ranges.historical.end - Duration::days(30)
        );
    }

    #[test]
    fn test_custom_historical_ends_at_requested_date() {
        let now = fixed_now();
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let ranges = compute(&ComparisonOption::Custom { date }, now).unwrap();
        assert_eq!(
            ranges.historical.end,
            Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            ranges.historical.start,
            Utc.with_ymd_and_hms(2025, 5, 2, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_custom_date_too_recent_is_rejected() {
        let now = fixed_now();
        let date = now.date_naive() - Duration::days(10);
        let err = compute(&ComparisonOption::Custom { date }, now).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        // same rule through the shared validator used at intake
        let err = validate_custom_date(date, now).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_custom_date_exactly_60_days_is_accepted() {
        let now = fixed_now();
        let date = now.date_naive() - Duration::days(60);
        assert_eq!(validate_custom_date(date, now).unwrap(), 60);
        assert!(compute(&ComparisonOption::Custom { date }, now).is_ok());
    }

    #[test]
    fn test_elapsed_days_is_day_granular() {
        let now = fixed_now();
        let date = NaiveDate::from_ymd_opt(2026, 8, 20).unwrap();
        assert_eq!(elapsed_days(date, now), 10);
    }
}
