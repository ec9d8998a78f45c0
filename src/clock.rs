//! Day boundaries.
//!
//! This is the only place wall-clock time enters the crate. Everything
//! downstream works on [`NaiveDate`]s that are already civil dates in the
//! user's timezone.

use crate::errors::EngineError;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Source of "now". Swap in a [`FixedClock`] to pin tests to an instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz, EngineError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| EngineError::InvalidTimezone(name.to_string()))
}

/// Parses a canonical `YYYY-MM-DD` key. Unpadded or padded-with-space forms
/// are rejected, since lookups always go through [`format_date_key`].
pub fn parse_date_key(key: &str) -> Result<NaiveDate, EngineError> {
    NaiveDate::parse_from_str(key, DATE_KEY_FORMAT)
        .ok()
        .filter(|date| format_date_key(*date) == key)
        .ok_or_else(|| EngineError::InvalidDate(key.to_string()))
}

pub fn format_date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Calendar date of `instant` as seen on a wall clock in `tz`.
pub fn civil_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

pub fn date_key(instant: DateTime<Utc>, tz: Tz) -> String {
    format_date_key(civil_date(instant, tz))
}

pub fn today(clock: &dyn Clock, tz: Tz) -> NaiveDate {
    civil_date(clock.now(), tz)
}
