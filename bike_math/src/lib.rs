//! # Bike Math
//!
//! Numerical building blocks for fitting and projecting ARIMA models.
//! This crate knows nothing about bikes or dates; it works on plain `f64`
//! slices and is driven by `bike_forecast`.

use thiserror::Error;

pub mod arma;
pub mod optimize;
pub mod stats;
pub mod transform;

/// Errors that can occur in numerical calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Optimizer did not converge: {0}")]
    ConvergenceFailure(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for numerical operations
pub type Result<T> = std::result::Result<T, MathError>;
