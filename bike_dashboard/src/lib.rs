//! Seoul bike-demand dashboard service.
//!
//! Exposes the building blocks (config, context, charts, routes) so both the
//! binary entrypoint and integration tests can assemble the same router.

pub mod charts;
pub mod config;
pub mod context;
pub mod error;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;

pub use crate::config::{ConfigError, DashboardConfig};
pub use crate::context::DashboardContext;
pub use crate::error::{AppError, AppResult};
pub use crate::router::build_app_router;
pub use crate::state::AppState;
