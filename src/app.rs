use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/today", get(handlers::get_today))
        .route("/api/leaderboard", get(handlers::get_leaderboard))
        .route(
            "/api/users/:user_id/settings",
            get(handlers::get_settings).put(handlers::put_settings),
        )
        .route(
            "/api/users/:user_id/habits",
            get(handlers::list_habits).post(handlers::create_habit),
        )
        .route(
            "/api/users/:user_id/habits/:habit_id",
            put(handlers::update_habit).delete(handlers::delete_habit),
        )
        .route(
            "/api/users/:user_id/habits/:habit_id/stats",
            get(handlers::get_habit_stats),
        )
        .route("/api/users/:user_id/checkins", post(handlers::record_checkin))
        .route("/api/users/:user_id/heatmap", get(handlers::get_heatmap))
        .with_state(state)
}
