//! # Bikecast
//!
//! `bikecast` bundles the Seoul bike-demand workspace: the numeric core
//! ([`math`]), dataset loading and ARIMA forecasting ([`forecast`]) and the
//! JSON dashboard service ([`dashboard`]).
//!
//! ## Example
//!
//! ```
//! use bikecast::forecast::models::arima::{forecast, ArimaOrder};
//! use bikecast::forecast::TimeSeries;
//! use chrono::{Duration, NaiveDate};
//!
//! let last = NaiveDate::from_ymd_opt(2018, 11, 30).unwrap();
//! let dates: Vec<_> = (0..30).rev().map(|i| last - Duration::days(i)).collect();
//! let values: Vec<f64> = (0..30).map(|i| 5000.0 + 40.0 * i as f64 + (i % 4) as f64 * 90.0).collect();
//! let series = TimeSeries::from_dates(dates, values).unwrap();
//!
//! let result = forecast(&series, ArimaOrder::new(2, 1, 0), 3).unwrap();
//! assert_eq!(
//!     result.timestamps()[0].date(),
//!     NaiveDate::from_ymd_opt(2018, 12, 1).unwrap()
//! );
//! ```

pub use bike_dashboard as dashboard;
pub use bike_forecast as forecast;
pub use bike_math as math;

pub use bike_forecast::{ArimaOrder, Dataset, ForecastError, ForecastResult, TimeSeries};
