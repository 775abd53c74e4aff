//! Error types for the bike_forecast crate

use bike_math::MathError;
use thiserror::Error;

/// Custom error types for the bike_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The dataset could not be read or parsed
    #[error("Data load error: {0}")]
    DataLoad(String),

    /// Fitting or projecting a model failed
    #[error("Model fit error: {0}")]
    ModelFit(String),

    /// Error related to input validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error from JSON serialization
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<MathError> for ForecastError {
    fn from(err: MathError) -> Self {
        ForecastError::ModelFit(err.to_string())
    }
}
