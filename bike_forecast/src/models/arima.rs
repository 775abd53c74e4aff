//! ARIMA models for time series forecasting
//!
//! Fits ARIMA(p, d, q) by conditional maximum likelihood: the series is
//! differenced `d` times and the ARMA(p, q) conditional sum of squares is
//! minimised with a Nelder-Mead search. AR and MA coefficients are
//! reparametrised through partial autocorrelations, so every candidate the
//! optimizer visits is stationary and invertible. A mean is estimated only
//! when `d == 0`.
//!
//! ```rust
//! use bike_forecast::data::TimeSeries;
//! use bike_forecast::models::arima::{forecast, ArimaOrder};
//! use chrono::NaiveDate;
//!
//! let start = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
//! let dates: Vec<_> = (0..40).map(|i| start + chrono::Duration::days(i)).collect();
//! let values: Vec<f64> = (0..40).map(|i| 100.0 + 3.0 * i as f64 + (i % 3) as f64).collect();
//! let series = TimeSeries::from_dates(dates, values).unwrap();
//!
//! let result = forecast(&series, ArimaOrder::new(1, 1, 0), 5).unwrap();
//! assert_eq!(result.horizon(), 5);
//! ```

use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::models::{
    ForecastModel, ForecastPoint, ForecastResult, TrainedForecastModel, DEFAULT_CONFIDENCE_LEVEL,
};
use crate::utils::{future_timestamps, Frequency};
use bike_math::optimize::NelderMead;
use bike_math::{arma, stats, transform};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The (p, d, q) order triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArimaOrder {
    /// Autoregressive lags
    pub p: usize,
    /// Differencing degree
    pub d: usize,
    /// Moving-average lags
    pub q: usize,
}

impl ArimaOrder {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// A mean term is estimated only for undifferenced series
    pub fn includes_mean(&self) -> bool {
        self.d == 0
    }

    /// Number of estimated coefficients, excluding the innovation variance
    pub fn parameter_count(&self) -> usize {
        self.p + self.q + usize::from(self.includes_mean())
    }

    /// Shortest series the order can be fitted to.
    ///
    /// After differencing and conditioning on the first `p` values there must
    /// be at least one more residual than estimated coefficients.
    pub fn minimum_observations(&self) -> usize {
        self.d + self.p + self.parameter_count() + 1
    }
}

impl fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.p, self.d, self.q)
    }
}

impl FromStr for ArimaOrder {
    type Err = ForecastError;

    /// Parses `p,d,q`, optionally wrapped in parentheses
    fn from_str(s: &str) -> Result<Self> {
        let inner = s.trim().trim_start_matches('(').trim_end_matches(')');
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(ForecastError::InvalidParameter(format!(
                "ARIMA order must have three components, got '{}'",
                s
            )));
        }

        let parse = |part: &str| {
            part.parse::<usize>().map_err(|_| {
                ForecastError::InvalidParameter(format!(
                    "ARIMA order components must be non-negative integers, got '{}'",
                    part
                ))
            })
        };

        Ok(Self::new(parse(parts[0])?, parse(parts[1])?, parse(parts[2])?))
    }
}

/// ARIMA model (AutoRegressive Integrated Moving Average)
#[derive(Debug, Clone)]
pub struct ArimaModel {
    /// Name of the model
    name: String,
    order: ArimaOrder,
    optimizer: NelderMead,
}

/// Trained ARIMA model
#[derive(Debug, Clone)]
pub struct TrainedArimaModel {
    name: String,
    order: ArimaOrder,
    /// Fitted AR coefficients
    ar_coefficients: Vec<f64>,
    /// Fitted MA coefficients
    ma_coefficients: Vec<f64>,
    /// Mean of the differenced series (zero when d > 0)
    mean: f64,
    /// Innovation variance
    sigma2: f64,
    /// Historical observations on the original scale
    observations: Vec<f64>,
    /// Residuals on the differenced scale
    residuals: Vec<f64>,
    last_timestamp: NaiveDateTime,
    frequency: Frequency,
    iterations: usize,
}

/// Serializable description of a fitted model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub name: String,
    pub order: ArimaOrder,
    pub ar_coefficients: Vec<f64>,
    pub ma_coefficients: Vec<f64>,
    /// Only present when the model estimates a mean
    pub mean: Option<f64>,
    pub sigma2: f64,
    pub observations: usize,
    pub frequency: String,
    pub iterations: usize,
}

impl ArimaModel {
    /// Create a new ARIMA model with the default optimizer settings
    pub fn new(order: ArimaOrder) -> Self {
        Self {
            name: format!("ARIMA{}", order),
            order,
            optimizer: NelderMead::default(),
        }
    }

    /// Override the optimizer's iteration cap and tolerance
    pub fn with_optimizer(mut self, max_iterations: usize, tolerance: f64) -> Result<Self> {
        self.optimizer = NelderMead::new(max_iterations, tolerance)
            .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;
        Ok(self)
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    /// Split an optimizer vector into (AR, MA, mean)
    fn decode(&self, params: &[f64]) -> (Vec<f64>, Vec<f64>, f64) {
        let ArimaOrder { p, q, .. } = self.order;
        let ar = transform::constrain_stationary(&params[..p]);
        let ma = transform::constrain_invertible(&params[p..p + q]);
        let mean = if self.order.includes_mean() {
            params[p + q]
        } else {
            0.0
        };
        (ar, ma, mean)
    }

    fn start_values(&self, differenced: &[f64]) -> Result<Vec<f64>> {
        let ArimaOrder { p, q, .. } = self.order;
        let mut start = Vec::with_capacity(self.order.parameter_count());

        if p > 0 {
            let acov = stats::autocovariances(differenced, p)?;
            let yule_walker = stats::levinson_durbin(&acov, p)?;
            start.extend(transform::partials_to_unconstrained(
                &yule_walker.partial_autocorrelations,
            ));
        }
        start.extend(std::iter::repeat(0.0).take(q));
        if self.order.includes_mean() {
            start.push(stats::mean(differenced)?);
        }

        Ok(start)
    }
}

impl ForecastModel for ArimaModel {
    type Trained = TrainedArimaModel;

    fn train(&self, series: &TimeSeries) -> Result<TrainedArimaModel> {
        let values = series.values();

        if let Some(position) = values.iter().position(|v| !v.is_finite()) {
            return Err(ForecastError::ModelFit(format!(
                "Series contains a non-finite value at position {}",
                position
            )));
        }

        let required = self.order.minimum_observations();
        if values.len() < required {
            return Err(ForecastError::ModelFit(format!(
                "Insufficient data for {}. Need at least {} observations, got {}.",
                self.name,
                required,
                values.len()
            )));
        }

        let last_timestamp = series
            .last_timestamp()
            .ok_or_else(|| ForecastError::ModelFit("Empty time series".to_string()))?;
        let frequency = series.frequency()?;

        let differenced = stats::difference(values, self.order.d);
        let start = self.start_values(&differenced)?;

        let minimum = self.optimizer.minimize(
            |params| {
                let (ar, ma, mean) = self.decode(params);
                arma::conditional_sum_of_squares(&differenced, &ar, &ma, mean)
            },
            &start,
        )?;

        let (ar_coefficients, ma_coefficients, mean) = self.decode(&minimum.point);
        let residuals = arma::residuals(&differenced, &ar_coefficients, &ma_coefficients, mean);
        let effective = differenced.len() - self.order.p;
        let sigma2 = minimum.value / effective as f64;

        if !sigma2.is_finite() {
            return Err(ForecastError::ModelFit(format!(
                "{} produced a non-finite innovation variance",
                self.name
            )));
        }

        Ok(TrainedArimaModel {
            name: self.name.clone(),
            order: self.order,
            ar_coefficients,
            ma_coefficients,
            mean,
            sigma2,
            observations: values.to_vec(),
            residuals,
            last_timestamp,
            frequency,
            iterations: minimum.iterations,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedArimaModel {
    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coefficients
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coefficients
    }

    /// Estimated mean, when the order includes one
    pub fn mean(&self) -> Option<f64> {
        self.order.includes_mean().then_some(self.mean)
    }

    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            name: self.name.clone(),
            order: self.order,
            ar_coefficients: self.ar_coefficients.clone(),
            ma_coefficients: self.ma_coefficients.clone(),
            mean: self.mean(),
            sigma2: self.sigma2,
            observations: self.observations.len(),
            frequency: self.frequency.to_string(),
            iterations: self.iterations,
        }
    }
}

impl TrainedForecastModel for TrainedArimaModel {
    fn forecast_with_level(&self, horizon: usize, confidence_level: f64) -> Result<ForecastResult> {
        if horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "Forecast horizon must be at least 1".to_string(),
            ));
        }
        if !(confidence_level > 0.0 && confidence_level < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "Confidence level must be between 0 and 1, got {}",
                confidence_level
            )));
        }

        let differenced = stats::difference(&self.observations, self.order.d);
        let projected = arma::forecast(
            &differenced,
            &self.residuals,
            &self.ar_coefficients,
            &self.ma_coefficients,
            self.mean,
            horizon,
        );
        let values = arma::undifference(&self.observations, self.order.d, &projected)?;
        let standard_errors = arma::forecast_standard_errors(
            &self.ar_coefficients,
            &self.ma_coefficients,
            self.order.d,
            self.sigma2,
            horizon,
        );
        let z = stats::z_score(confidence_level)?;
        let timestamps = future_timestamps(self.last_timestamp, horizon, self.frequency)?;

        let points = timestamps
            .into_iter()
            .zip(values)
            .zip(standard_errors)
            .map(|((timestamp, value), se)| ForecastPoint {
                timestamp,
                value,
                lower: value - z * se,
                upper: value + z * se,
            })
            .collect();

        ForecastResult::new(points, confidence_level)
            .map_err(|e| ForecastError::ModelFit(e.to_string()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Fit `order` to `series` and project `horizon` periods at the default
/// (95%) confidence level
pub fn forecast(series: &TimeSeries, order: ArimaOrder, horizon: usize) -> Result<ForecastResult> {
    forecast_with_level(series, order, horizon, DEFAULT_CONFIDENCE_LEVEL)
}

/// Fit `order` to `series` and project `horizon` periods with a band at
/// `confidence_level`
pub fn forecast_with_level(
    series: &TimeSeries,
    order: ArimaOrder,
    horizon: usize,
    confidence_level: f64,
) -> Result<ForecastResult> {
    if horizon == 0 {
        return Err(ForecastError::InvalidParameter(
            "Forecast horizon must be at least 1".to_string(),
        ));
    }
    ArimaModel::new(order)
        .train(series)?
        .forecast_with_level(horizon, confidence_level)
}
