use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/mood", post(handlers::log_mood_form))
        .route("/api/moods", get(handlers::get_moods).post(handlers::log_mood))
        .with_state(state)
}
