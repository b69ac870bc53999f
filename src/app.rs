use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/add", post(handlers::add_entry))
        .route("/set_goal", post(handlers::set_goal))
        .route("/health", get(handlers::health))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .with_state(state)
}
