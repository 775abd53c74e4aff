//! Descriptive statistics and autocorrelation helpers
//!
//! Contains:
//! - Mean and (biased) autocovariances
//! - Differencing
//! - Levinson-Durbin recursion (Yule-Walker AR estimates and partial autocorrelations)
//! - Standard normal quantiles for confidence bands

use crate::{MathError, Result};
use statrs::distribution::{ContinuousCDF, Normal};

/// Arithmetic mean of a non-empty slice
pub fn mean(data: &[f64]) -> Result<f64> {
    if data.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot compute the mean of an empty series".to_string(),
        ));
    }
    Ok(data.iter().sum::<f64>() / data.len() as f64)
}

/// Apply `order` rounds of first differencing.
///
/// Each round shortens the series by one; differencing past the series
/// length yields an empty vector.
pub fn difference(data: &[f64], order: usize) -> Vec<f64> {
    let mut result = data.to_vec();
    for _ in 0..order {
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Sample autocovariances for lags `0..=max_lag`, divided by `n`.
///
/// The series is centred on its own mean. Lags beyond the series length are zero.
pub fn autocovariances(data: &[f64], max_lag: usize) -> Result<Vec<f64>> {
    let n = data.len();
    let mu = mean(data)?;
    let centered: Vec<f64> = data.iter().map(|x| x - mu).collect();

    let acov = (0..=max_lag)
        .map(|k| {
            if k >= n {
                return 0.0;
            }
            let sum: f64 = (k..n).map(|i| centered[i] * centered[i - k]).sum();
            sum / n as f64
        })
        .collect();

    Ok(acov)
}

/// Output of the Levinson-Durbin recursion
#[derive(Debug, Clone, PartialEq)]
pub struct YuleWalker {
    /// AR coefficients `phi_1..phi_p`
    pub coefficients: Vec<f64>,
    /// Partial autocorrelations `r_1..r_p`
    pub partial_autocorrelations: Vec<f64>,
    /// Innovation variance of the AR(p) fit
    pub innovation_variance: f64,
}

/// Solve the Yule-Walker equations of order `order` from autocovariances.
///
/// `autocov` must hold at least `order + 1` lags. A (near) zero lag-0
/// autocovariance, as produced by a constant series, yields all-zero
/// coefficients.
pub fn levinson_durbin(autocov: &[f64], order: usize) -> Result<YuleWalker> {
    if autocov.len() < order + 1 {
        return Err(MathError::InsufficientData(format!(
            "Need {} autocovariances for order {}, got {}",
            order + 1,
            order,
            autocov.len()
        )));
    }

    let mut phi = vec![0.0; order];
    let mut pacf = vec![0.0; order];
    let mut variance = autocov[0];

    if variance.abs() < 1e-12 {
        return Ok(YuleWalker {
            coefficients: phi,
            partial_autocorrelations: pacf,
            innovation_variance: 0.0,
        });
    }

    for k in 0..order {
        let mut numerator = autocov[k + 1];
        for j in 0..k {
            numerator -= phi[j] * autocov[k - j];
        }
        let reflection = numerator / variance;

        let previous = phi.clone();
        phi[k] = reflection;
        for j in 0..k {
            phi[j] = previous[j] - reflection * previous[k - 1 - j];
        }

        pacf[k] = reflection;
        variance *= 1.0 - reflection * reflection;
        if variance <= 0.0 {
            // Perfectly predictable series; higher lags add nothing.
            break;
        }
    }

    Ok(YuleWalker {
        coefficients: phi,
        partial_autocorrelations: pacf,
        innovation_variance: variance.max(0.0),
    })
}

/// Quantile of the standard normal distribution
pub fn normal_quantile(probability: f64) -> Result<f64> {
    if !(probability > 0.0 && probability < 1.0) {
        return Err(MathError::InvalidInput(format!(
            "Probability must be in (0, 1), got {}",
            probability
        )));
    }
    let normal =
        Normal::new(0.0, 1.0).map_err(|e| MathError::CalculationError(e.to_string()))?;
    Ok(normal.inverse_cdf(probability))
}

/// Two-sided critical value for a confidence level, e.g. 1.96 for 0.95
pub fn z_score(confidence_level: f64) -> Result<f64> {
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(MathError::InvalidInput(format!(
            "Confidence level must be between 0 and 1, got {}",
            confidence_level
        )));
    }
    normal_quantile(1.0 - (1.0 - confidence_level) / 2.0)
}
