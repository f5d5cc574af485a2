pub mod api;
pub mod app;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod format;
pub mod handlers;
pub mod models;
pub mod render;
pub mod state;
pub mod store;
pub mod ui;

pub use api::{Backend, HttpBackend};
pub use app::router;
pub use config::Config;
pub use dispatch::Dashboard;
pub use state::AppState;
