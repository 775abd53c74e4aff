use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::context::DashboardContext;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is read-only.
#[derive(Clone)]
pub struct AppState {
    /// Dataset and fitted forecast.
    pub context: Arc<DashboardContext>,
    /// Configuration the context was built with.
    pub config: Arc<DashboardConfig>,
}

impl AppState {
    pub fn new(context: DashboardContext, config: DashboardConfig) -> Self {
        Self {
            context: Arc::new(context),
            config: Arc::new(config),
        }
    }
}
