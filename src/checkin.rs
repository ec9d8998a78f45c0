//! Check-in values as stored per day and per habit.
//!
//! Stored values come in two shapes: a bare boolean, or an annotated object
//! `{ "checked": bool, "note": "..." }`. Anything else is kept verbatim so the
//! document round-trips, but reads as "not checked". Algorithms never look at
//! the raw shape; they go through [`DayState`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Habit id -> value, for a single calendar day.
pub type DayRecord = BTreeMap<String, CheckinValue>;

/// `YYYY-MM-DD` (in the user's timezone) -> that day's record.
pub type CheckinMap = BTreeMap<String, DayRecord>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CheckinValue {
    Flag(bool),
    Annotated {
        checked: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
    /// Legacy or malformed entry.
    Other(serde_json::Value),
}

impl CheckinValue {
    pub fn new(checked: bool, note: Option<String>) -> Self {
        match note {
            Some(note) if !note.trim().is_empty() => CheckinValue::Annotated {
                checked,
                note: Some(note),
            },
            _ => CheckinValue::Flag(checked),
        }
    }

    pub fn is_checked(&self) -> bool {
        match self {
            CheckinValue::Flag(checked) => *checked,
            CheckinValue::Annotated { checked, .. } => *checked,
            CheckinValue::Other(_) => false,
        }
    }

    pub fn note(&self) -> Option<&str> {
        match self {
            CheckinValue::Annotated { note, .. } => note.as_deref(),
            _ => None,
        }
    }
}

/// Normalized view of one habit on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayState {
    Checked,
    Unchecked,
    NoData,
}

impl DayState {
    pub fn of(value: Option<&CheckinValue>) -> Self {
        match value {
            Some(value) if value.is_checked() => DayState::Checked,
            Some(_) => DayState::Unchecked,
            None => DayState::NoData,
        }
    }

    /// `Some(true | false)` for an observed day, `None` when nothing was logged.
    pub fn as_option(self) -> Option<bool> {
        match self {
            DayState::Checked => Some(true),
            DayState::Unchecked => Some(false),
            DayState::NoData => None,
        }
    }
}

/// Looks up `habit_id` on `date`. A date without the habit is [`DayState::NoData`].
pub fn day_state(checkins: &CheckinMap, date: NaiveDate, habit_id: &str) -> DayState {
    let record = checkins.get(&crate::clock::format_date_key(date));
    DayState::of(record.and_then(|record| record.get(habit_id)))
}
