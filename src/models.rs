use crate::checkin::CheckinMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HabitOwner {
    User { user_id: String },
    Circle { circle_id: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub cadence: Cadence,
    pub owner: HabitOwner,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserSettings {
    #[serde(default)]
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserData {
    #[serde(default)]
    pub settings: UserSettings,
    #[serde(default)]
    pub habits: BTreeMap<String, Habit>,
    #[serde(default)]
    pub checkins: CheckinMap,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub users: BTreeMap<String, UserData>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRate {
    pub completed: u32,
    pub total: u32,
    pub rate: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangePoint {
    pub date: String,
    pub checked: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub date: String,
    pub completed: usize,
    pub total: usize,
    pub intensity: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodayResponse {
    pub date: String,
    pub timezone: String,
}

#[derive(Debug, Deserialize)]
pub struct SettingsRequest {
    pub timezone: String,
}

#[derive(Debug, Deserialize)]
pub struct HabitRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub cadence: Cadence,
    #[serde(default)]
    pub circle_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CheckinRequest {
    pub habit_id: String,
    pub checked: bool,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckinResponse {
    pub date: String,
    pub habit_id: String,
    pub checked: bool,
    pub note: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HabitStatsResponse {
    pub habit_id: String,
    pub today: String,
    pub current_streak: u32,
    pub best_streak: u32,
    pub completion: CompletionRate,
    pub range: Vec<RangePoint>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub score: u32,
    pub habits: usize,
}

#[derive(Debug, Deserialize)]
pub struct TodayQuery {
    pub timezone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub window: Option<u32>,
    pub days: Option<u32>,
    pub as_of: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HeatmapQuery {
    pub days: Option<u32>,
}
