use crate::dispatch::Dashboard;
use std::sync::Arc;

/// Shared handle to the single dashboard. The dashboard guards its own view,
/// so handlers never hold a lock while the backend is being called.
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
}

impl AppState {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard: Arc::new(dashboard),
        }
    }
}
