//! Clock-aware front for the streak computations in [`crate::stats`].
//!
//! Every method resolves "today" through the injected [`Clock`] in the
//! caller's timezone and then delegates to the pure `*_at` functions.

use crate::checkin::CheckinMap;
use crate::clock::{self, Clock, SystemClock};
use crate::models::{CompletionRate, HabitStatsResponse, HeatmapCell, RangePoint};
use crate::stats;
use chrono::NaiveDate;
use chrono_tz::Tz;
use std::sync::Arc;

#[derive(Clone)]
pub struct StreakEngine {
    clock: Arc<dyn Clock>,
}

impl Default for StreakEngine {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl StreakEngine {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn today(&self, tz: Tz) -> NaiveDate {
        clock::today(self.clock.as_ref(), tz)
    }

    pub fn current_streak(
        &self,
        checkins: &CheckinMap,
        habit_id: &str,
        tz: Tz,
        as_of: Option<NaiveDate>,
    ) -> u32 {
        let anchor = as_of.unwrap_or_else(|| self.today(tz));
        stats::current_streak_at(checkins, habit_id, anchor)
    }

    pub fn best_streak(&self, checkins: &CheckinMap, habit_id: &str) -> u32 {
        stats::best_streak(checkins, habit_id)
    }

    pub fn completion_rate(
        &self,
        checkins: &CheckinMap,
        habit_id: &str,
        window_days: u32,
        tz: Tz,
    ) -> CompletionRate {
        stats::completion_rate_at(checkins, habit_id, window_days, self.today(tz))
    }

    pub fn range_projection(
        &self,
        checkins: &CheckinMap,
        habit_id: &str,
        days: u32,
        tz: Tz,
    ) -> Vec<RangePoint> {
        stats::range_projection_at(checkins, habit_id, days, self.today(tz))
    }

    pub fn heatmap(
        &self,
        checkins: &CheckinMap,
        habit_ids: &[&str],
        days: u32,
        tz: Tz,
    ) -> Vec<HeatmapCell> {
        stats::heatmap_at(checkins, habit_ids, days, self.today(tz))
    }

    /// Everything the habit detail view needs, computed against one "today".
    pub fn habit_summary(
        &self,
        checkins: &CheckinMap,
        habit_id: &str,
        tz: Tz,
        window_days: u32,
        range_days: u32,
        as_of: Option<NaiveDate>,
    ) -> HabitStatsResponse {
        let today = self.today(tz);
        let anchor = as_of.unwrap_or(today);
        HabitStatsResponse {
            habit_id: habit_id.to_string(),
            today: clock::format_date_key(today),
            current_streak: stats::current_streak_at(checkins, habit_id, anchor),
            best_streak: stats::best_streak(checkins, habit_id),
            completion: stats::completion_rate_at(checkins, habit_id, window_days, today),
            range: stats::range_projection_at(checkins, habit_id, range_days, today),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkin::{CheckinValue, DayRecord};
    use crate::clock::{format_date_key, FixedClock};
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn engine_at(y: i32, m: u32, d: u32, h: u32) -> StreakEngine {
        StreakEngine::new(Arc::new(FixedClock(
            Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap(),
        )))
    }

    fn record(habit: &str, value: CheckinValue) -> DayRecord {
        DayRecord::from([(habit.to_string(), value)])
    }

    #[test]
    fn today_is_resolved_in_the_user_timezone() {
        // 2024-01-03 04:00 UTC is still Jan 2 in New York.
        let engine = engine_at(2024, 1, 3, 4);
        let mut checkins = CheckinMap::new();
        checkins.insert("2024-01-01".into(), record("h1", CheckinValue::Flag(true)));
        checkins.insert("2024-01-02".into(), record("h1", CheckinValue::Flag(true)));
        checkins.insert("2024-01-03".into(), record("h1", CheckinValue::Flag(false)));

        let new_york = chrono_tz::America::New_York;
        assert_eq!(engine.current_streak(&checkins, "h1", new_york, None), 2);
        assert_eq!(engine.current_streak(&checkins, "h1", chrono_tz::UTC, None), 0);
        assert_eq!(
            engine.current_streak(
                &checkins,
                "h1",
                chrono_tz::UTC,
                NaiveDate::from_ymd_opt(2024, 1, 2)
            ),
            2
        );
    }

    #[test]
    fn completion_window_ends_today_inclusive() {
        let engine = engine_at(2024, 1, 7, 12);
        let mut checkins = CheckinMap::new();
        checkins.insert("2024-01-01".into(), record("h1", CheckinValue::Flag(true)));
        checkins.insert("2024-01-03".into(), record("h1", CheckinValue::Flag(false)));
        checkins.insert("2024-01-07".into(), record("h1", CheckinValue::Flag(true)));

        let rate = engine.completion_rate(&checkins, "h1", 7, chrono_tz::UTC);
        assert_eq!(rate, CompletionRate { completed: 2, total: 3, rate: 67 });
        let rate = engine.completion_rate(&checkins, "h1", 6, chrono_tz::UTC);
        assert_eq!(rate, CompletionRate { completed: 1, total: 2, rate: 50 });
    }

    #[test]
    fn summary_uses_one_today_for_every_field() {
        let engine = engine_at(2024, 1, 2, 12);
        let mut checkins = CheckinMap::new();
        checkins.insert("2024-01-01".into(), record("h1", CheckinValue::Flag(true)));

        let summary = engine.habit_summary(&checkins, "h1", chrono_tz::UTC, 7, 3, None);
        assert_eq!(summary.today, "2024-01-02");
        assert_eq!(summary.current_streak, 1);
        assert_eq!(summary.best_streak, 1);
        assert_eq!(summary.completion, CompletionRate { completed: 1, total: 1, rate: 100 });
        let checked: Vec<Option<bool>> = summary.range.iter().map(|p| p.checked).collect();
        assert_eq!(checked, [None, Some(true), None]);
        assert_eq!(summary.range.last().map(|p| p.date.as_str()), Some("2024-01-02"));
    }

    #[test]
    fn best_streak_and_projection_through_engine() {
        let engine = engine_at(2024, 1, 5, 12);
        let mut checkins = CheckinMap::new();
        for day in ["2024-01-01", "2024-01-02", "2024-01-04"] {
            checkins.insert(day.into(), record("h1", CheckinValue::Flag(true)));
        }

        assert_eq!(engine.best_streak(&checkins, "h1"), 2);
        let points = engine.range_projection(&checkins, "h1", 3, chrono_tz::UTC);
        let checked: Vec<Option<bool>> = points.iter().map(|p| p.checked).collect();
        assert_eq!(checked, [None, Some(true), None]);
        assert_eq!(points[0].date, "2024-01-03");
    }

    fn history() -> impl Strategy<Value = Vec<Option<bool>>> {
        prop::collection::vec(prop::option::of(any::<bool>()), 0..60)
    }

    /// Lays `days` out so that the last element lands on `anchor`.
    fn build(days: &[Option<bool>], anchor: NaiveDate) -> CheckinMap {
        let mut checkins = CheckinMap::new();
        for (index, day) in days.iter().enumerate() {
            let offset = (days.len() - 1 - index) as i64;
            let key = format_date_key(anchor - Duration::days(offset));
            match day {
                Some(value) => {
                    checkins.insert(key, record("h1", CheckinValue::Flag(*value)));
                }
                None => {
                    checkins.insert(key, DayRecord::new());
                }
            }
        }
        checkins
    }

    fn trailing_run(days: &[Option<bool>]) -> u32 {
        let body = match days.last() {
            Some(None) => &days[..days.len() - 1],
            _ => days,
        };
        body.iter().rev().take_while(|day| **day == Some(true)).count() as u32
    }

    proptest! {
        #[test]
        fn current_streak_is_the_trailing_run(days in history()) {
            let anchor = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
            let checkins = build(&days, anchor);
            let streak = stats::current_streak_at(&checkins, "h1", anchor);
            prop_assert_eq!(streak, trailing_run(&days));
            prop_assert_eq!(streak, stats::current_streak_at(&checkins, "h1", anchor));
            prop_assert!(stats::best_streak(&checkins, "h1") >= streak);
        }

        #[test]
        fn checking_the_next_day_extends_the_streak(days in history()) {
            let anchor = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
            let mut checkins = build(&days, anchor);
            let before = stats::current_streak_at(&checkins, "h1", anchor);
            // An unlogged anchor is not part of the run, so it is the next day.
            let next = match days.last() {
                Some(None) => anchor,
                _ => anchor + Duration::days(1),
            };
            if before > 0 {
                checkins.insert(format_date_key(next), record("h1", CheckinValue::Flag(true)));
                prop_assert_eq!(stats::current_streak_at(&checkins, "h1", next), before + 1);
            }
        }

        #[test]
        fn projection_length_matches_request(days in history(), len in 0u32..400) {
            let anchor = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
            let checkins = build(&days, anchor);
            let points = stats::range_projection_at(&checkins, "h1", len, anchor);
            prop_assert_eq!(points.len(), len as usize);
            let rate = stats::completion_rate_at(&checkins, "h1", len, anchor);
            prop_assert!(rate.rate <= 100);
            prop_assert!(rate.completed <= rate.total);
        }
    }
}
