use crate::dashboard::build_dashboard;
use crate::errors::AppError;
use crate::flash::{has_cookie, Flash, CLEAR_COOKIE};
use crate::models::{Dashboard, EntryForm, GoalForm};
use crate::state::AppState;
use crate::storage::RECENT_ENTRY_LIMIT;
use crate::ui::render_index;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use tracing::{error, info, warn};

pub async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let dashboard = load_dashboard(&state).await?;
    let flash = state.flash.read(&headers);
    let page = Html(render_index(&dashboard, flash.as_ref()));

    // Stale or forged cookies are expired too, not just the one shown.
    if has_cookie(&headers) {
        Ok(([(header::SET_COOKIE, CLEAR_COOKIE)], page).into_response())
    } else {
        Ok(page.into_response())
    }
}

pub async fn get_dashboard(State(state): State<AppState>) -> Result<Json<Dashboard>, AppError> {
    Ok(Json(load_dashboard(&state).await?))
}

pub async fn add_entry(State(state): State<AppState>, Form(form): Form<EntryForm>) -> Response {
    let entry = match form.parse() {
        Ok(entry) => entry,
        Err(err) => {
            warn!("rejected entry: {err}");
            return redirect_with(&state, Flash::error(err.to_string()));
        }
    };

    match state.store.insert_entry(&entry).await {
        Ok(()) => {
            info!(date = %entry.date, "entry added");
            redirect_with(&state, Flash::success("Entry added."))
        }
        Err(err) => {
            error!("failed to add entry: {err}");
            redirect_with(&state, Flash::error(format!("Error adding entry: {err}")))
        }
    }
}

pub async fn set_goal(State(state): State<AppState>, Form(form): Form<GoalForm>) -> Response {
    let goal = match form.parse() {
        Ok(goal) => goal,
        Err(err) => {
            warn!("rejected calorie goal: {err}");
            return redirect_with(&state, Flash::error(err.to_string()));
        }
    };

    match state.store.replace_goal(goal).await {
        Ok(()) => {
            info!(goal = goal, "calorie goal updated");
            redirect_with(&state, Flash::success("Calorie goal updated."))
        }
        Err(err) => {
            error!("failed to update calorie goal: {err}");
            redirect_with(&state, Flash::error(format!("Error updating goal: {err}")))
        }
    }
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, &'static str) {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "OK"),
        Err(err) => {
            error!("health check failed: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, "DB error")
        }
    }
}

async fn load_dashboard(state: &AppState) -> Result<Dashboard, AppError> {
    let goal = state.store.fetch_goal().await.map_err(log_store_error)?;
    let entries = state
        .store
        .fetch_recent_entries(RECENT_ENTRY_LIMIT)
        .await
        .map_err(log_store_error)?;
    Ok(build_dashboard(&entries, goal))
}

fn log_store_error(err: crate::errors::StoreError) -> AppError {
    error!("failed to load dashboard: {err}");
    AppError::store(err)
}

fn redirect_with(state: &AppState, flash: Flash) -> Response {
    (
        [(header::SET_COOKIE, state.flash.set_cookie(&flash))],
        Redirect::to("/"),
    )
        .into_response()
}
