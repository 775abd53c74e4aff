use axum::extract::State;
use axum::Json;
use bike_forecast::metrics::ForecastAccuracy;
use bike_forecast::models::arima::ModelSummary;
use bike_forecast::ForecastPoint;
use serde::Serialize;

use crate::response::DataResponse;
use crate::state::AppState;

/// The fitted forecast as raw rows
#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub model: ModelSummary,
    pub confidence_level: f64,
    pub points: Vec<ForecastPoint>,
    /// Absent when hold-out scoring is disabled or failed
    pub holdout_accuracy: Option<ForecastAccuracy>,
}

/// GET /api/v1/forecast
pub async fn get_forecast(State(state): State<AppState>) -> Json<DataResponse<ForecastResponse>> {
    let context = &state.context;
    Json(DataResponse::new(ForecastResponse {
        model: context.summary().clone(),
        confidence_level: context.forecast().confidence_level(),
        points: context.forecast().points().to_vec(),
        holdout_accuracy: context.accuracy().cloned(),
    }))
}
