//! Date windows for weekly and monthly batch targets.

use chrono::{Datelike, Duration, Months, NaiveDate};

use crate::types::Cadence;

/// Sunday that starts the week containing `today`.
pub fn week_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(i64::from(today.weekday().num_days_from_sunday()))
}

/// Last day of a target window starting on `start`.
///
/// Weekly windows span seven days. Monthly windows end the day before the
/// same day of the next month; month arithmetic clamps to the month end.
pub fn window_end(start: NaiveDate, cadence: Cadence) -> NaiveDate {
    match cadence {
        Cadence::Weekly => start + Duration::days(6),
        Cadence::Monthly => {
            start
                .checked_add_months(Months::new(1))
                .unwrap_or(NaiveDate::MAX)
                - Duration::days(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_start_is_sunday() {
        // 2025-01-15 is a Wednesday
        assert_eq!(week_start(date(2025, 1, 15)), date(2025, 1, 12));
        assert_eq!(week_start(date(2025, 1, 12)), date(2025, 1, 12));
        assert_eq!(week_start(date(2025, 1, 18)), date(2025, 1, 12));
    }

    #[test]
    fn test_weekly_window() {
        assert_eq!(window_end(date(2025, 1, 12), Cadence::Weekly), date(2025, 1, 18));
        assert_eq!(window_end(date(2024, 12, 29), Cadence::Weekly), date(2025, 1, 4));
    }

    #[test]
    fn test_monthly_window() {
        assert_eq!(window_end(date(2025, 1, 1), Cadence::Monthly), date(2025, 1, 31));
        assert_eq!(window_end(date(2025, 3, 15), Cadence::Monthly), date(2025, 4, 14));
    }

    #[test]
    fn test_monthly_window_clamps_to_month_end() {
        // Jan 31 + 1 month clamps to Feb 28
        assert_eq!(window_end(date(2025, 1, 31), Cadence::Monthly), date(2025, 2, 27));
    }
}
