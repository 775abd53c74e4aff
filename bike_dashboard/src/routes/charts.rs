//! Chart callbacks: each recomputes one chart for the current control value.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use bike_forecast::data::{parse_date, Covariate};
use serde::Deserialize;

use crate::charts::{self, ChartDescription};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// `?date=YYYY-MM-DD`; the earliest date when absent
#[derive(Debug, Deserialize)]
pub struct HourlyParams {
    pub date: Option<String>,
}

/// `?covariate=<key>`; wind speed when absent or empty
#[derive(Debug, Deserialize)]
pub struct ClimateParams {
    pub covariate: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/seasons", get(seasons))
        .route("/hourly", get(hourly))
        .route("/climate", get(climate))
        .route("/forecast", get(forecast))
}

async fn seasons(State(state): State<AppState>) -> Json<DataResponse<ChartDescription>> {
    Json(DataResponse::new(charts::season_histogram(
        state.context.dataset(),
    )))
}

async fn hourly(
    State(state): State<AppState>,
    Query(params): Query<HourlyParams>,
) -> AppResult<Json<DataResponse<ChartDescription>>> {
    let date = params
        .date
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(parse_date)
        .transpose()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let chart = charts::hourly_demand(state.context.dataset(), date)?;
    tracing::debug!(title = %chart.title, points = chart.traces[0].points.len(), "Hourly chart");
    Ok(Json(DataResponse::new(chart)))
}

async fn climate(
    State(state): State<AppState>,
    Query(params): Query<ClimateParams>,
) -> AppResult<Json<DataResponse<ChartDescription>>> {
    let covariate = match params
        .covariate
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
    {
        None => Covariate::default(),
        Some(raw) => raw.parse::<Covariate>()?,
    };

    Ok(Json(DataResponse::new(charts::climate_scatter(
        state.context.dataset(),
        covariate,
    ))))
}

async fn forecast(State(state): State<AppState>) -> Json<DataResponse<ChartDescription>> {
    Json(DataResponse::new(charts::forecast_chart(
        state.context.daily(),
        state.context.forecast(),
    )))
}
