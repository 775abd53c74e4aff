pub mod charts;
pub mod controls;
pub mod forecast;
pub mod health;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /controls                 date picker bounds, covariate options
/// /charts/seasons           season histogram
/// /charts/hourly?date=      hourly demand on a date
/// /charts/climate?covariate= demand vs. a weather covariate
/// /charts/forecast          forecast with confidence band
/// /forecast                 forecast rows, model summary, hold-out accuracy
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/controls", get(controls::get_controls))
        .nest("/charts", charts::router())
        .route("/forecast", get(forecast::get_forecast))
}
