//! Forecasting models for time series data

use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt::Debug;

/// Confidence level used when none is given
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// One projected period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub timestamp: NaiveDateTime,
    /// Point estimate
    pub value: f64,
    /// Lower bound of the confidence band
    pub lower: f64,
    /// Upper bound of the confidence band
    pub upper: f64,
}

/// Forecast result containing predicted values and their confidence band
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    points: Vec<ForecastPoint>,
    confidence_level: f64,
}

impl ForecastResult {
    /// Create a new forecast result.
    ///
    /// Every point must satisfy `lower <= value <= upper`, timestamps must be
    /// strictly increasing and the confidence level must lie in (0, 1).
    pub fn new(points: Vec<ForecastPoint>, confidence_level: f64) -> Result<Self> {
        if !(confidence_level > 0.0 && confidence_level < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "Confidence level must be between 0 and 1, got {}",
                confidence_level
            )));
        }

        if let Some(point) = points
            .iter()
            .find(|p| !(p.lower <= p.value && p.value <= p.upper))
        {
            return Err(ForecastError::Validation(format!(
                "Forecast at {} is outside its band: {} not in [{}, {}]",
                point.timestamp, point.value, point.lower, point.upper
            )));
        }

        if points.windows(2).any(|w| w[1].timestamp <= w[0].timestamp) {
            return Err(ForecastError::Validation(
                "Forecast timestamps must be strictly increasing".to_string(),
            ));
        }

        Ok(Self {
            points,
            confidence_level,
        })
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    /// Number of periods forecasted
    pub fn horizon(&self) -> usize {
        self.points.len()
    }

    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    /// Point estimates
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    /// (lower, upper) pairs
    pub fn intervals(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.lower, p.upper)).collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Generate a forecast at the default confidence level
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        self.forecast_with_level(horizon, DEFAULT_CONFIDENCE_LEVEL)
    }

    /// Generate a forecast with a band at `confidence_level`
    fn forecast_with_level(&self, horizon: usize, confidence_level: f64)
        -> Result<ForecastResult>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on time series data
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on time series data
    fn train(&self, series: &TimeSeries) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod arima;
