//! Consecutive-day streaks
//!
//! One calculator serves habits, gratitude and reflection journals. Dates are
//! deduplicated to calendar days before walking, so several entries on the
//! same day count once.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::Dated;

/// Current and longest run of consecutive days
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    pub current: u32,
    pub longest: u32,
}

fn distinct_days(dates: impl IntoIterator<Item = NaiveDate>) -> BTreeSet<NaiveDate> {
    dates.into_iter().collect()
}

/// Length of the run of days ending on `today`.
///
/// Dates after `today` are ignored. A run whose latest day is older than
/// yesterday is broken and yields 0; a run ending yesterday has not reached
/// `today` yet and also counts 0.
pub fn current_streak(dates: impl IntoIterator<Item = NaiveDate>, today: NaiveDate) -> u32 {
    let days: BTreeSet<NaiveDate> = distinct_days(dates)
        .into_iter()
        .filter(|d| *d <= today)
        .collect();

    let Some(&latest) = days.iter().next_back() else {
        return 0;
    };
    if latest < today - Duration::days(1) {
        return 0;
    }

    let mut streak = 0;
    let mut expected = today;
    while days.contains(&expected) {
        streak += 1;
        expected -= Duration::days(1);
    }
    streak
}

/// Longest run of consecutive days anywhere in the history
pub fn longest_streak(dates: impl IntoIterator<Item = NaiveDate>) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for day in distinct_days(dates) {
        run = match previous {
            Some(prev) if day - prev == Duration::days(1) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(day);
    }
    longest
}

pub fn compute_streaks(
    dates: impl IntoIterator<Item = NaiveDate>,
    today: NaiveDate,
) -> StreakSummary {
    let days = distinct_days(dates);
    StreakSummary {
        current: current_streak(days.iter().copied(), today),
        longest: longest_streak(days),
    }
}

/// Streaks over a record collection, skipping records without a usable date
pub fn streaks_for<R: Dated>(records: &[R], today: NaiveDate) -> StreakSummary {
    compute_streaks(records.iter().filter_map(Dated::date), today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn back(today: NaiveDate, n: i64) -> NaiveDate {
        today - Duration::days(n)
    }

    struct Entry(Option<NaiveDate>);

    impl Dated for Entry {
        fn date(&self) -> Option<NaiveDate> {
            self.0
        }
    }

    #[test]
    fn test_empty_history() {
        let today = day(2024, 3, 10);
        assert_eq!(
            compute_streaks(Vec::new(), today),
            StreakSummary { current: 0, longest: 0 }
        );
    }

    #[test]
    fn test_four_day_run_ending_today() {
        let t = day(2024, 3, 10);
        let dates = vec![back(t, 3), back(t, 2), back(t, 1), t];
        assert_eq!(
            compute_streaks(dates, t),
            StreakSummary { current: 4, longest: 4 }
        );
    }

    #[test]
    fn test_gap_breaks_current_run() {
        let t = day(2024, 3, 10);
        let dates = vec![back(t, 3), back(t, 2), t];
        assert_eq!(
            compute_streaks(dates, t),
            StreakSummary { current: 1, longest: 2 }
        );
    }

    #[test]
    fn test_duplicate_days_count_once() {
        let t = day(2024, 3, 10);
        assert_eq!(current_streak(vec![t, t], t), 1);
        assert_eq!(longest_streak(vec![t, t, t]), 1);
    }

    #[test]
    fn test_run_ending_yesterday_has_no_current() {
        let t = day(2024, 3, 10);
        let dates = vec![back(t, 2), back(t, 1)];
        assert_eq!(
            compute_streaks(dates, t),
            StreakSummary { current: 0, longest: 2 }
        );
    }

    #[test]
    fn test_stale_run_is_zero() {
        let t = day(2024, 3, 10);
        let dates = vec![back(t, 4), back(t, 3), back(t, 2)];
        assert_eq!(current_streak(dates.clone(), t), 0);
        assert_eq!(longest_streak(dates), 3);
    }

    #[test]
    fn test_future_dates_ignored_for_current() {
        let t = day(2024, 3, 10);
        let dates = vec![back(t, 1), t, t + Duration::days(1), t + Duration::days(5)];
        assert_eq!(current_streak(dates, t), 2);
    }

    #[test]
    fn test_order_independent() {
        let t = day(2024, 3, 10);
        let forward = vec![back(t, 5), back(t, 4), back(t, 1), t];
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(compute_streaks(forward, t), compute_streaks(reversed, t));
    }

    #[test]
    fn test_habit_with_missed_middle_day() {
        // Done Jan 1-5 except Jan 3
        let today = day(2024, 1, 5);
        let dates = vec![day(2024, 1, 1), day(2024, 1, 2), day(2024, 1, 4), today];
        assert_eq!(
            compute_streaks(dates, today),
            StreakSummary { current: 2, longest: 2 }
        );
    }

    #[test]
    fn test_longest_run_across_month_boundary() {
        let dates = vec![day(2024, 1, 30), day(2024, 1, 31), day(2024, 2, 1), day(2024, 2, 10)];
        assert_eq!(longest_streak(dates), 3);
    }

    #[test]
    fn test_streaks_for_skips_undated_records() {
        let t = day(2024, 3, 10);
        let records = vec![Entry(Some(t)), Entry(None), Entry(Some(back(t, 1)))];
        assert_eq!(
            streaks_for(&records, t),
            StreakSummary { current: 2, longest: 2 }
        );
    }
}
