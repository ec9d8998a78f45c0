use crate::clock::Clock;
use crate::engine::StreakEngine;
use crate::models::AppData;
use chrono_tz::Tz;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
    pub engine: StreakEngine,
    pub default_timezone: Tz,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData, default_timezone: Tz) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
            engine: StreakEngine::default(),
            default_timezone,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.engine = StreakEngine::new(clock);
        self
    }
}
