use crate::dispatch::ViewSnapshot;
use crate::errors::AppError;
use crate::state::AppState;
use crate::store::Tab;
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Form, Json,
};
use serde::Deserialize;
use std::future::Future;
use std::time::Instant;

#[derive(Debug, Deserialize)]
pub struct FilterForm {
    #[serde(default)]
    pub priority: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub email: String,
}

/// Runs an event that talks to the backend on its own task, so it still
/// completes and clears its loading state if the browser drops the request.
async fn run_event<F>(event: F) -> Result<Redirect, AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(event)
        .await
        .map_err(|err| AppError::internal(format!("event failed: {err}")))?;
    Ok(Redirect::to("/"))
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let view = state.dashboard.view().await;
    Html(render_index(&view, Instant::now()))
}

pub async fn get_view(State(state): State<AppState>) -> Json<ViewSnapshot> {
    let view = state.dashboard.view().await;
    Json(view.snapshot(Instant::now()))
}

pub async fn switch_tab(
    State(state): State<AppState>,
    Path(tab): Path<String>,
) -> Result<Redirect, AppError> {
    let tab: Tab = tab.parse().map_err(AppError::bad_request)?;
    run_event(async move { state.dashboard.switch_tab(tab).await }).await
}

pub async fn toggle_theme(State(state): State<AppState>) -> Redirect {
    state.dashboard.toggle_theme().await;
    Redirect::to("/")
}

pub async fn refresh(State(state): State<AppState>) -> Result<Redirect, AppError> {
    run_event(async move { state.dashboard.refresh().await }).await
}

pub async fn filter_tasks(State(state): State<AppState>, Form(form): Form<FilterForm>) -> Redirect {
    state.dashboard.filter_tasks(&form.priority).await;
    Redirect::to("/")
}

pub async fn search_contact(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> Result<Redirect, AppError> {
    run_event(async move { state.dashboard.search_contact(&form.email).await }).await
}

pub async fn refresh_contact(State(state): State<AppState>) -> Result<Redirect, AppError> {
    run_event(async move { state.dashboard.refresh_contact().await }).await
}
