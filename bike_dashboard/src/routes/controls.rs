//! Metadata for the dashboard's controls.

use axum::extract::State;
use axum::Json;
use bike_forecast::data::{Covariate, Season};
use chrono::NaiveDate;
use serde::Serialize;

use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DatePicker {
    pub min: NaiveDate,
    pub max: NaiveDate,
    pub default: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct CovariateOption {
    pub key: &'static str,
    pub label: &'static str,
    pub column: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SeasonLegend {
    pub code: u8,
    pub label: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Controls {
    pub date: DatePicker,
    pub covariates: Vec<CovariateOption>,
    pub default_covariate: &'static str,
    pub seasons: Vec<SeasonLegend>,
}

/// GET /api/v1/controls
pub async fn get_controls(State(state): State<AppState>) -> Json<DataResponse<Controls>> {
    let (min, max) = state.context.dataset().date_range();

    let covariates = Covariate::ALL
        .into_iter()
        .map(|c| CovariateOption {
            key: c.key(),
            label: c.label(),
            column: c.column(),
        })
        .collect();

    let seasons = Season::ALL
        .into_iter()
        .map(|s| SeasonLegend {
            code: s.code(),
            label: s.label(),
            color: s.color(),
        })
        .collect();

    Json(DataResponse::new(Controls {
        date: DatePicker {
            min,
            max,
            default: min,
        },
        covariates,
        default_covariate: Covariate::default().key(),
        seasons,
    }))
}
