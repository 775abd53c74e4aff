//! # Bike Forecast
//!
//! Loading and forecasting for the Seoul bike-rental demand dataset.
//!
//! ## Features
//!
//! - Hourly dataset loading from CSV (raw or cleaned export)
//! - Season and weather-covariate helpers
//! - Daily demand as a regular [`TimeSeries`]
//! - ARIMA(p, d, q) forecasting with confidence bands
//! - Hold-out accuracy metrics
//!
//! ## Quick Start
//!
//! ```no_run
//! use bike_forecast::data::Dataset;
//! use bike_forecast::models::arima::{forecast, ArimaOrder};
//!
//! let dataset = Dataset::from_csv("data/SeoulBikeData.csv")?;
//! let daily = dataset.daily_totals()?;
//!
//! let result = forecast(&daily, ArimaOrder::new(5, 1, 0), 50)?;
//! for point in result.points() {
//!     println!("{} {:.0} [{:.0}, {:.0}]", point.timestamp, point.value, point.lower, point.upper);
//! }
//! # Ok::<(), bike_forecast::ForecastError>(())
//! ```

pub mod data;
pub mod error;
pub mod metrics;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use crate::data::{BikeRecord, Covariate, Dataset, Season, TimeSeries};
pub use crate::error::ForecastError;
pub use crate::models::arima::{ArimaModel, ArimaOrder, ModelSummary, TrainedArimaModel};
pub use crate::models::{ForecastModel, ForecastPoint, ForecastResult, TrainedForecastModel};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
