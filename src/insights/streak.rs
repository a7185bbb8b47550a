use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub current: u32,
    pub longest: u32,
}

/// Counts consecutive completion days.
///
/// `current` is the run ending on `as_of` or the day before it, so a streak
/// stays alive until a full day is skipped. `longest` is the longest run anywhere
/// in the history. Dates after `as_of` and duplicates are ignored.
pub fn compute_streak<I>(dates: I, as_of: NaiveDate) -> Streak
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut days: Vec<NaiveDate> = dates.into_iter().filter(|d| *d <= as_of).collect();
    days.sort_unstable_by(|a, b| b.cmp(a));
    days.dedup();

    let Some(&latest) = days.first() else {
        return Streak::default();
    };

    let mut current = 0u32;
    if latest == as_of || latest == as_of - Duration::days(1) {
        current = 1;
        for pair in days.windows(2) {
            if pair[0] - pair[1] == Duration::days(1) {
                current += 1;
            } else {
                break;
            }
        }
    }

    let mut longest = 1u32;
    let mut run = 1u32;
    for pair in days.windows(2) {
        if pair[0] - pair[1] == Duration::days(1) {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 1;
        }
    }

    Streak { current, longest }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_history_has_no_streak() {
        assert_eq!(compute_streak(Vec::<NaiveDate>::new(), date(2024, 3, 3)), Streak::default());
    }

    #[test]
    fn single_completion_today_counts() {
        let today = date(2024, 3, 3);
        let streak = compute_streak([today], today);
        assert_eq!(streak.current, 1);
        assert!(streak.longest >= 1);
    }

    #[test]
    fn yesterday_keeps_streak_alive() {
        let streak = compute_streak([date(2024, 3, 2)], date(2024, 3, 3));
        assert_eq!(streak.current, 1);
    }

    #[test]
    fn gap_breaks_current_streak() {
        let today = date(2024, 3, 3);
        let three = compute_streak([date(2024, 3, 1), date(2024, 3, 2), today], today);
        assert_eq!(three, Streak { current: 3, longest: 3 });

        let stale = compute_streak([date(2024, 3, 1)], today);
        assert_eq!(stale, Streak { current: 0, longest: 1 });
    }

    #[test]
    fn removing_middle_day_leaves_only_latest() {
        let today = date(2024, 3, 3);
        let streak = compute_streak([date(2024, 3, 1), today], today);
        assert_eq!(streak.current, 1);
        assert_eq!(streak.longest, 1);
    }

    #[test]
    fn longest_comes_from_older_run() {
        let today = date(2024, 3, 20);
        let mut dates: Vec<NaiveDate> = (1..=5).map(|d| date(2024, 3, d)).collect();
        dates.extend([date(2024, 3, 19), date(2024, 3, 20)]);
        let streak = compute_streak(dates, today);
        assert_eq!(streak, Streak { current: 2, longest: 5 });
    }

    #[test]
    fn duplicates_and_future_dates_are_ignored() {
        let today = date(2024, 3, 3);
        let streak = compute_streak(
            [today, today, date(2024, 3, 2), date(2024, 3, 9)],
            today,
        );
        assert_eq!(streak, Streak { current: 2, longest: 2 });
    }

    #[test]
    fn streak_crosses_month_boundary() {
        let today = date(2024, 3, 1);
        let streak = compute_streak([date(2024, 2, 28), date(2024, 2, 29), today], today);
        assert_eq!(streak.current, 3);
    }
}
