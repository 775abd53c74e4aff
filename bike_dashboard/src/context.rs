//! Immutable state computed once at start-up and shared by every handler.

use bike_forecast::data::{Dataset, TimeSeries};
use bike_forecast::metrics::{holdout_accuracy, ForecastAccuracy};
use bike_forecast::models::arima::{ArimaModel, ModelSummary};
use bike_forecast::models::{ForecastModel, TrainedForecastModel};
use bike_forecast::{ForecastError, ForecastResult};

use crate::config::DashboardConfig;

/// The dataset plus the forecast fitted to its daily totals
#[derive(Debug)]
pub struct DashboardContext {
    dataset: Dataset,
    daily: TimeSeries,
    forecast: ForecastResult,
    summary: ModelSummary,
    accuracy: Option<ForecastAccuracy>,
}

impl DashboardContext {
    /// Aggregate the dataset to daily totals, fit the configured order and
    /// project the configured horizon.
    ///
    /// A hold-out score is attached when `config.holdout > 0`; failing to
    /// compute it only logs a warning.
    pub fn build(dataset: Dataset, config: &DashboardConfig) -> Result<Self, ForecastError> {
        let daily = dataset.daily_totals()?;
        if !daily.is_regular() {
            tracing::warn!(
                observations = daily.len(),
                "Daily demand series has missing dates; forecast periods follow the inferred step"
            );
        }

        let model = ArimaModel::new(config.order);
        let trained = model.train(&daily)?;
        let forecast = trained.forecast_with_level(config.horizon, config.confidence_level)?;
        let summary = trained.summary();
        tracing::info!(
            model = %summary.name,
            iterations = summary.iterations,
            sigma2 = summary.sigma2,
            horizon = forecast.horizon(),
            "Fitted forecast model"
        );

        let accuracy = if config.holdout > 0 {
            match holdout_accuracy(&model, &daily, config.holdout) {
                Ok(accuracy) => {
                    tracing::info!(holdout = config.holdout, %accuracy, "Hold-out accuracy");
                    Some(accuracy)
                }
                Err(e) => {
                    tracing::warn!(holdout = config.holdout, error = %e, "Hold-out scoring skipped");
                    None
                }
            }
        } else {
            None
        };

        Ok(Self {
            dataset,
            daily,
            forecast,
            summary,
            accuracy,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Daily rental totals the model was fitted to
    pub fn daily(&self) -> &TimeSeries {
        &self.daily
    }

    pub fn forecast(&self) -> &ForecastResult {
        &self.forecast
    }

    pub fn summary(&self) -> &ModelSummary {
        &self.summary
    }

    pub fn accuracy(&self) -> Option<&ForecastAccuracy> {
        self.accuracy.as_ref()
    }
}
