use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/tab/:tab", post(handlers::switch_tab))
        .route("/theme", post(handlers::toggle_theme))
        .route("/refresh", post(handlers::refresh))
        .route("/tasks/filter", post(handlers::filter_tasks))
        .route("/crm/search", post(handlers::search_contact))
        .route("/crm/refresh", post(handlers::refresh_contact))
        .route("/api/view", get(handlers::get_view))
        .with_state(state)
}
