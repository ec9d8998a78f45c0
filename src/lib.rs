pub mod app;
pub mod checkin;
pub mod clock;
pub mod config;
pub mod engine;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;

pub use app::router;
pub use checkin::{CheckinMap, CheckinValue, DayRecord, DayState};
pub use config::Config;
pub use engine::StreakEngine;
pub use state::AppState;
pub use storage::load_data;
