//! Parameter transforms that keep ARMA estimates admissible
//!
//! The optimizer searches an unconstrained space. Each unconstrained value is
//! squashed into a partial autocorrelation in (-1, 1) and the Durbin-Levinson
//! recursion turns those into polynomial coefficients, so every candidate is a
//! stationary AR polynomial (or an invertible MA polynomial).

/// Largest partial autocorrelation accepted when building start values
const MAX_START_PARTIAL: f64 = 0.95;

/// Map unconstrained values to partial autocorrelations in (-1, 1)
fn squash(x: f64) -> f64 {
    x / (1.0 + x * x).sqrt()
}

/// Durbin-Levinson: partial autocorrelations to AR coefficients.
///
/// The result describes `y_t = phi_1 y_{t-1} + ... + phi_p y_{t-p} + e_t`.
pub fn partials_to_coefficients(partials: &[f64]) -> Vec<f64> {
    let mut phi: Vec<f64> = Vec::with_capacity(partials.len());
    for (k, &r) in partials.iter().enumerate() {
        let previous = phi.clone();
        for j in 0..k {
            phi[j] = previous[j] - r * previous[k - 1 - j];
        }
        phi.push(r);
    }
    phi
}

/// Unconstrained values to stationary AR coefficients
pub fn constrain_stationary(unconstrained: &[f64]) -> Vec<f64> {
    let partials: Vec<f64> = unconstrained.iter().map(|&x| squash(x)).collect();
    partials_to_coefficients(&partials)
}

/// Unconstrained values to invertible MA coefficients.
///
/// The MA polynomial is `1 + theta_1 B + ...`, i.e. the AR polynomial of
/// the negated stationary coefficients.
pub fn constrain_invertible(unconstrained: &[f64]) -> Vec<f64> {
    constrain_stationary(unconstrained)
        .into_iter()
        .map(|c| -c)
        .collect()
}

/// Inverse of the squashing step for start values.
///
/// Partials are clipped to +/-0.95 first so the start sits strictly inside
/// the admissible region.
pub fn partials_to_unconstrained(partials: &[f64]) -> Vec<f64> {
    partials
        .iter()
        .map(|&r| {
            let r = if r.is_finite() {
                r.clamp(-MAX_START_PARTIAL, MAX_START_PARTIAL)
            } else {
                0.0
            };
            r / (1.0 - r * r).sqrt()
        })
        .collect()
}
