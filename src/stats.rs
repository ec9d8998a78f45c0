use crate::checkin::{day_state, CheckinMap, DayRecord, DayState};
use crate::clock::{format_date_key, parse_date_key};
use crate::models::{CompletionRate, HeatmapCell, RangePoint};
use chrono::{Duration, NaiveDate};
use tracing::debug;

/// Current streaks are not traced further back than this many days.
pub const MAX_STREAK_LOOKBACK: usize = 365;

/// Consecutive checked days ending at `anchor`, walking backwards.
///
/// An explicit unchecked entry ends the walk. A day with no entry ends it too,
/// except the anchor itself: a habit not yet logged today keeps yesterday's run.
pub fn current_streak_at(checkins: &CheckinMap, habit_id: &str, anchor: NaiveDate) -> u32 {
    let mut streak = 0u32;
    let mut date = anchor;

    for _ in 0..MAX_STREAK_LOOKBACK {
        match day_state(checkins, date, habit_id) {
            DayState::Checked => streak += 1,
            DayState::Unchecked => break,
            DayState::NoData if date == anchor => {}
            DayState::NoData => break,
        }

        date = match date.pred_opt() {
            Some(previous) => previous,
            None => break,
        };
    }

    streak
}

/// Longest run of consecutive checked days anywhere in the history.
///
/// Unlike [`current_streak_at`], missing days and unchecked days are treated
/// the same: either one ends a run.
pub fn best_streak(checkins: &CheckinMap, habit_id: &str) -> u32 {
    let mut dates: Vec<NaiveDate> = checkins
        .iter()
        .filter(|(_, record)| record.get(habit_id).is_some_and(|value| value.is_checked()))
        .filter_map(|(key, _)| match parse_date_key(key) {
            Ok(date) => Some(date),
            Err(err) => {
                debug!("skipping check-in key: {err}");
                None
            }
        })
        .collect();
    dates.sort_unstable();
    dates.dedup();

    let mut best = 0u32;
    let mut running = 0u32;
    let mut previous: Option<NaiveDate> = None;

    for date in dates {
        running = match previous {
            Some(prev) if (date - prev).num_days() == 1 => running + 1,
            _ => 1,
        };
        best = best.max(running);
        previous = Some(date);
    }

    best
}

/// Completion over the `window_days` days ending at `today`, inclusive.
///
/// Only days with an entry for the habit count towards `total`.
pub fn completion_rate_at(
    checkins: &CheckinMap,
    habit_id: &str,
    window_days: u32,
    today: NaiveDate,
) -> CompletionRate {
    let mut completed = 0u32;
    let mut total = 0u32;

    for date in window(today, window_days) {
        match day_state(checkins, date, habit_id) {
            DayState::Checked => {
                completed += 1;
                total += 1;
            }
            DayState::Unchecked => total += 1,
            DayState::NoData => {}
        }
    }

    CompletionRate {
        completed,
        total,
        rate: percentage(completed, total),
    }
}

/// Exactly `days` points, oldest first, ending at `today`.
pub fn range_projection_at(
    checkins: &CheckinMap,
    habit_id: &str,
    days: u32,
    today: NaiveDate,
) -> Vec<RangePoint> {
    window(today, days)
        .map(|date| RangePoint {
            date: format_date_key(date),
            checked: day_state(checkins, date, habit_id).as_option(),
        })
        .collect()
}

/// Share of the user's habits completed on one day, in `0.0..=1.0`.
///
/// Entries for habits outside `habit_ids` (deleted ones, typically) are ignored.
pub fn day_intensity(record: Option<&DayRecord>, habit_ids: &[&str]) -> f64 {
    if habit_ids.is_empty() {
        return 0.0;
    }
    completed_count(record, habit_ids) as f64 / habit_ids.len() as f64
}

pub fn heatmap_at(
    checkins: &CheckinMap,
    habit_ids: &[&str],
    days: u32,
    today: NaiveDate,
) -> Vec<HeatmapCell> {
    window(today, days)
        .map(|date| {
            let key = format_date_key(date);
            let record = checkins.get(&key);
            HeatmapCell {
                completed: completed_count(record, habit_ids),
                total: habit_ids.len(),
                intensity: day_intensity(record, habit_ids),
                date: key,
            }
        })
        .collect()
}

fn completed_count(record: Option<&DayRecord>, habit_ids: &[&str]) -> usize {
    let Some(record) = record else {
        return 0;
    };
    habit_ids
        .iter()
        .filter(|id| DayState::of(record.get(**id)) == DayState::Checked)
        .count()
}

fn percentage(completed: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    (f64::from(completed) * 100.0 / f64::from(total)).round() as u8
}

/// Dates `today - (days - 1) ..= today`, oldest first.
fn window(today: NaiveDate, days: u32) -> impl Iterator<Item = NaiveDate> {
    (0..i64::from(days))
        .rev()
        .filter_map(move |offset| today.checked_sub_signed(Duration::days(offset)))
}
