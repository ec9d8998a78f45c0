use crate::checkin::CheckinValue;
use crate::clock::{format_date_key, parse_date_key, parse_timezone};
use crate::errors::{AppError, EngineError};
use crate::models::{
    AppData, CheckinRequest, CheckinResponse, Habit, HabitOwner, HabitRequest,
    HabitStatsResponse, HeatmapCell, HeatmapQuery, LeaderboardEntry, SettingsRequest, StatsQuery,
    TodayQuery, TodayResponse, UserData, UserSettings,
};
use crate::state::AppState;
use crate::storage::persist_data;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use chrono_tz::Tz;
use tracing::{info, warn};

pub const DEFAULT_WINDOW_DAYS: u32 = 7;
pub const DEFAULT_RANGE_DAYS: u32 = 30;
pub const MAX_RANGE_DAYS: u32 = 366;

pub async fn get_today(
    State(state): State<AppState>,
    Query(query): Query<TodayQuery>,
) -> Result<Json<TodayResponse>, AppError> {
    let tz = match query.timezone.as_deref() {
        Some(name) => parse_timezone(name)?,
        None => state.default_timezone,
    };
    Ok(Json(TodayResponse {
        date: format_date_key(state.engine.today(tz)),
        timezone: tz.name().to_string(),
    }))
}

pub async fn get_settings(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<UserSettings> {
    let data = state.data.lock().await;
    let settings = data
        .users
        .get(&user_id)
        .map(|user| user.settings.clone())
        .unwrap_or_default();
    Json(settings)
}

pub async fn put_settings(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<SettingsRequest>,
) -> Result<Json<UserSettings>, AppError> {
    let tz = parse_timezone(&payload.timezone)?;
    let mut data = state.data.lock().await;
    let settings = commit(&state, &mut data, |doc| {
        let user = doc.users.entry(user_id.clone()).or_default();
        user.settings.timezone = Some(tz.name().to_string());
        Ok(user.settings.clone())
    })
    .await?;

    info!("user {user_id} timezone set to {}", tz.name());
    Ok(Json(settings))
}

pub async fn list_habits(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<Vec<Habit>> {
    let data = state.data.lock().await;
    let habits = data
        .users
        .get(&user_id)
        .map(|user| user.habits.values().cloned().collect())
        .unwrap_or_default();
    Json(habits)
}

pub async fn create_habit(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<HabitRequest>,
) -> Result<(StatusCode, Json<Habit>), AppError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("habit name must not be empty"));
    }

    let id = match payload.id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => generate_habit_id(),
    };
    let owner = match payload.circle_id {
        Some(circle_id) => HabitOwner::Circle { circle_id },
        None => HabitOwner::User {
            user_id: user_id.clone(),
        },
    };
    let habit = Habit {
        id: id.clone(),
        name: name.to_string(),
        icon: payload.icon,
        color: payload.color,
        cadence: payload.cadence,
        owner,
    };

    let mut data = state.data.lock().await;
    commit(&state, &mut data, |doc| {
        let user = doc.users.entry(user_id.clone()).or_default();
        if user.habits.contains_key(&id) {
            return Err(AppError::bad_request(format!("habit '{id}' already exists")));
        }
        user.habits.insert(id.clone(), habit.clone());
        Ok(())
    })
    .await?;

    info!("user {user_id} created habit {id}");
    Ok((StatusCode::CREATED, Json(habit)))
}

pub async fn update_habit(
    State(state): State<AppState>,
    Path((user_id, habit_id)): Path<(String, String)>,
    Json(payload): Json<HabitRequest>,
) -> Result<Json<Habit>, AppError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("habit name must not be empty"));
    }

    let mut data = state.data.lock().await;
    let updated = commit(&state, &mut data, |doc| {
        let habit = doc
            .users
            .get_mut(&user_id)
            .and_then(|user| user.habits.get_mut(&habit_id))
            .ok_or_else(|| AppError::not_found(format!("habit '{habit_id}' not found")))?;
        habit.name = name.to_string();
        habit.icon = payload.icon;
        habit.color = payload.color;
        habit.cadence = payload.cadence;
        Ok(habit.clone())
    })
    .await?;

    info!("user {user_id} updated habit {habit_id}");
    Ok(Json(updated))
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Path((user_id, habit_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let mut data = state.data.lock().await;
    commit(&state, &mut data, |doc| {
        doc.users
            .get_mut(&user_id)
            .and_then(|user| user.habits.remove(&habit_id))
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(format!("habit '{habit_id}' not found")))
    })
    .await?;

    info!("user {user_id} deleted habit {habit_id}");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn record_checkin(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<CheckinRequest>,
) -> Result<Json<CheckinResponse>, AppError> {
    let mut data = state.data.lock().await;
    let response = commit(&state, &mut data, |doc| {
        let user = doc
            .users
            .get_mut(&user_id)
            .filter(|user| user.habits.contains_key(&payload.habit_id))
            .ok_or_else(|| {
                AppError::not_found(format!("habit '{}' not found", payload.habit_id))
            })?;

        let date = match payload.date.as_deref() {
            Some(raw) => parse_date_key(raw)?,
            None => state.engine.today(user_timezone(&state, user)?),
        };
        let key = format_date_key(date);
        let value = CheckinValue::new(payload.checked, payload.note);
        let response = CheckinResponse {
            date: key.clone(),
            habit_id: payload.habit_id.clone(),
            checked: value.is_checked(),
            note: value.note().map(str::to_string),
        };
        user.checkins
            .entry(key)
            .or_default()
            .insert(payload.habit_id, value);
        Ok(response)
    })
    .await?;

    info!(
        "user {user_id} checked in {} on {} checked={}",
        response.habit_id, response.date, response.checked
    );
    Ok(Json(response))
}

pub async fn get_habit_stats(
    State(state): State<AppState>,
    Path((user_id, habit_id)): Path<(String, String)>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<HabitStatsResponse>, AppError> {
    let as_of = query.as_of.as_deref().map(parse_date_key).transpose()?;
    let window = clamp_days(query.window, DEFAULT_WINDOW_DAYS);
    let days = clamp_days(query.days, DEFAULT_RANGE_DAYS);

    let data = state.data.lock().await;
    let empty = UserData::default();
    let user = data.users.get(&user_id).unwrap_or(&empty);
    let tz = user_timezone(&state, user)?;

    let summary = state
        .engine
        .habit_summary(&user.checkins, &habit_id, tz, window, days, as_of);
    Ok(Json(summary))
}

pub async fn get_heatmap(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<HeatmapQuery>,
) -> Result<Json<Vec<HeatmapCell>>, AppError> {
    let days = clamp_days(query.days, DEFAULT_RANGE_DAYS);

    let data = state.data.lock().await;
    let empty = UserData::default();
    let user = data.users.get(&user_id).unwrap_or(&empty);
    let tz = user_timezone(&state, user)?;

    let habit_ids: Vec<&str> = user.habits.keys().map(String::as_str).collect();
    Ok(Json(state.engine.heatmap(&user.checkins, &habit_ids, days, tz)))
}

pub async fn get_leaderboard(State(state): State<AppState>) -> Json<Vec<LeaderboardEntry>> {
    let data = state.data.lock().await;
    let mut entries = Vec::with_capacity(data.users.len());

    for (user_id, user) in &data.users {
        let tz = match user_timezone(&state, user) {
            Ok(tz) => tz,
            Err(err) => {
                warn!("leaderboard skipping user {user_id}: {err}");
                continue;
            }
        };
        let score = user
            .habits
            .keys()
            .map(|habit_id| state.engine.current_streak(&user.checkins, habit_id, tz, None))
            .sum();
        entries.push(LeaderboardEntry {
            user_id: user_id.clone(),
            score,
            habits: user.habits.len(),
        });
    }

    entries.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.user_id.cmp(&b.user_id)));
    Json(entries)
}

/// Applies `change` to a copy of the document and swaps the copy in only
/// once it is on disk, so a failed write leaves the live document untouched.
async fn commit<T>(
    state: &AppState,
    data: &mut AppData,
    change: impl FnOnce(&mut AppData) -> Result<T, AppError>,
) -> Result<T, AppError> {
    let mut next = data.clone();
    let output = change(&mut next)?;
    persist_data(&state.data_path, &next).await?;
    *data = next;
    Ok(output)
}

fn user_timezone(state: &AppState, user: &UserData) -> Result<Tz, EngineError> {
    match user.settings.timezone.as_deref() {
        Some(name) => parse_timezone(name),
        None => Ok(state.default_timezone),
    }
}

fn clamp_days(value: Option<u32>, default: u32) -> u32 {
    value.unwrap_or(default).clamp(1, MAX_RANGE_DAYS)
}

fn generate_habit_id() -> String {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("h_{nanos}")
}
