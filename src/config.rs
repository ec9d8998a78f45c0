use crate::clock::parse_timezone;
use crate::errors::EngineError;
use chrono_tz::Tz;
use std::{env, path::PathBuf};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_PATH: &str = "data/state.json";
pub const DEFAULT_TIMEZONE: &str = "UTC";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    /// Used for users who never picked a timezone.
    pub default_timezone: Tz,
}

impl Config {
    pub fn from_env() -> Result<Self, EngineError> {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let data_path = env::var("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_PATH));

        let default_timezone = match env::var("APP_DEFAULT_TIMEZONE") {
            Ok(name) if !name.trim().is_empty() => parse_timezone(&name)?,
            _ => parse_timezone(DEFAULT_TIMEZONE)?,
        };

        Ok(Self {
            port,
            data_path,
            default_timezone,
        })
    }
}
