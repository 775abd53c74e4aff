//! ARMA recursions on a (differenced) series
//!
//! Conventions used throughout:
//!
//! ```text
//! (w_t - mu) = sum_i phi_i (w_{t-i} - mu) + e_t + sum_j theta_j e_{t-j}
//! ```
//!
//! Pre-sample errors are zero and the first `p` observations are taken as
//! given, which makes the likelihood conditional on them.

use crate::stats::difference;
use crate::{MathError, Result};

/// One-step-ahead residuals of an ARMA model.
///
/// The returned vector has the same length as `data`; the first `ar.len()`
/// entries are zero because they are conditioned on.
pub fn residuals(data: &[f64], ar: &[f64], ma: &[f64], mean: f64) -> Vec<f64> {
    let p = ar.len();
    let mut errors = vec![0.0; data.len()];

    for t in p..data.len() {
        let mut prediction = mean;
        for (i, phi) in ar.iter().enumerate() {
            prediction += phi * (data[t - i - 1] - mean);
        }
        for (j, theta) in ma.iter().enumerate() {
            if t > j {
                prediction += theta * errors[t - j - 1];
            }
        }
        errors[t] = data[t] - prediction;
    }

    errors
}

/// Conditional sum of squared residuals.
///
/// Minimising this is the conditional Gaussian maximum-likelihood fit once
/// the innovation variance is concentrated out.
pub fn conditional_sum_of_squares(data: &[f64], ar: &[f64], ma: &[f64], mean: f64) -> f64 {
    residuals(data, ar, ma, mean)
        .iter()
        .skip(ar.len())
        .map(|e| e * e)
        .sum()
}

/// Point forecasts of an ARMA model for `horizon` steps.
///
/// Future errors are set to their expectation (zero).
pub fn forecast(
    data: &[f64],
    errors: &[f64],
    ar: &[f64],
    ma: &[f64],
    mean: f64,
    horizon: usize,
) -> Vec<f64> {
    let mut history = data.to_vec();
    let mut shocks = errors.to_vec();

    for _ in 0..horizon {
        let mut next = mean;
        for (i, phi) in ar.iter().enumerate() {
            if let Some(value) = history.len().checked_sub(i + 1).map(|idx| history[idx]) {
                next += phi * (value - mean);
            }
        }
        for (j, theta) in ma.iter().enumerate() {
            if let Some(shock) = shocks.len().checked_sub(j + 1).map(|idx| shocks[idx]) {
                next += theta * shock;
            }
        }
        history.push(next);
        shocks.push(0.0);
    }

    history.split_off(data.len())
}

/// AR coefficients of `phi(B) (1 - B)^d` written as `1 - sum_i phi*_i B^i`
pub fn integrated_ar(ar: &[f64], d: usize) -> Vec<f64> {
    // Polynomial coefficients, constant term first.
    let mut poly: Vec<f64> = std::iter::once(1.0).chain(ar.iter().map(|c| -c)).collect();
    for _ in 0..d {
        let mut next = vec![0.0; poly.len() + 1];
        for (i, c) in poly.iter().enumerate() {
            next[i] += c;
            next[i + 1] -= c;
        }
        poly = next;
    }
    poly.into_iter().skip(1).map(|c| -c).collect()
}

/// First `count` weights of the MA(infinity) representation.
///
/// `psi_0 = 1` and `psi_j = theta_j + sum_i phi_i psi_{j-i}`.
pub fn psi_weights(ar: &[f64], ma: &[f64], count: usize) -> Vec<f64> {
    let mut psi = Vec::with_capacity(count);
    for j in 0..count {
        if j == 0 {
            psi.push(1.0);
            continue;
        }
        let mut weight = ma.get(j - 1).copied().unwrap_or(0.0);
        for (i, phi) in ar.iter().enumerate().take(j) {
            weight += phi * psi[j - i - 1];
        }
        psi.push(weight);
    }
    psi
}

/// Forecast standard errors for horizons `1..=horizon`
pub fn forecast_standard_errors(
    ar: &[f64],
    ma: &[f64],
    d: usize,
    sigma2: f64,
    horizon: usize,
) -> Vec<f64> {
    let psi = psi_weights(&integrated_ar(ar, d), ma, horizon);
    let mut cumulative = 0.0;
    psi.iter()
        .map(|w| {
            cumulative += w * w;
            (sigma2 * cumulative).sqrt()
        })
        .collect()
}

/// Undo `d` rounds of differencing on forecasts of the differenced series.
///
/// `series` is the original (undifferenced) history; forecasts are
/// accumulated starting from its last value at each differencing level.
pub fn undifference(series: &[f64], d: usize, forecasts: &[f64]) -> Result<Vec<f64>> {
    if series.len() <= d {
        return Err(MathError::InsufficientData(format!(
            "Need more than {} observations to undo {} differences",
            d, d
        )));
    }

    let anchors: Vec<f64> = (0..d)
        .filter_map(|level| difference(series, level).last().copied())
        .collect();

    let mut result = forecasts.to_vec();
    for anchor in anchors.iter().rev() {
        let mut running = *anchor;
        for value in result.iter_mut() {
            running += *value;
            *value = running;
        }
    }

    Ok(result)
}
