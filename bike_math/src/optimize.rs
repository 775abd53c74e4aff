//! Derivative-free minimisation
//!
//! A deterministic Nelder-Mead simplex search. Used to maximise the
//! conditional likelihood of ARMA models, where gradients are awkward
//! because of the stationarity transforms.

use crate::{MathError, Result};

/// Reflection, expansion, contraction and shrink coefficients
const ALPHA: f64 = 1.0;
const GAMMA: f64 = 2.0;
const RHO: f64 = 0.5;
const SIGMA: f64 = 0.5;

/// Guards the relative tolerance test when the minimum is (close to) zero
const TINY: f64 = 1e-10;

/// Nelder-Mead simplex optimizer
#[derive(Debug, Clone, PartialEq)]
pub struct NelderMead {
    max_iterations: usize,
    tolerance: f64,
}

/// Best point found by the optimizer
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    /// Location of the minimum
    pub point: Vec<f64>,
    /// Objective value at `point`
    pub value: f64,
    /// Iterations used
    pub iterations: usize,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            max_iterations: 20_000,
            tolerance: 1e-9,
        }
    }
}

impl NelderMead {
    /// Create an optimizer with an iteration cap and relative tolerance on
    /// the spread of objective values across the simplex
    pub fn new(max_iterations: usize, tolerance: f64) -> Result<Self> {
        if max_iterations == 0 {
            return Err(MathError::InvalidInput(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if !(tolerance > 0.0 && tolerance.is_finite()) {
            return Err(MathError::InvalidInput(format!(
                "tolerance must be a positive finite number, got {}",
                tolerance
            )));
        }
        Ok(Self {
            max_iterations,
            tolerance,
        })
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Every vertex within tolerance of the best one, coordinate-wise
    fn collapsed(&self, simplex: &[Vec<f64>]) -> bool {
        let best = &simplex[0];
        simplex[1..].iter().all(|vertex| {
            vertex
                .iter()
                .zip(best)
                .all(|(x, b)| (x - b).abs() <= self.tolerance * (1.0 + b.abs()))
        })
    }

    /// Minimise `objective` starting from `start`.
    ///
    /// Non-finite objective values are treated as +infinity so the simplex
    /// moves away from them. Fails when the iteration cap is reached before
    /// the simplex collapses, or when no finite value was ever found.
    pub fn minimize<F>(&self, objective: F, start: &[f64]) -> Result<Minimum>
    where
        F: Fn(&[f64]) -> f64,
    {
        let eval = |x: &[f64]| {
            let v = objective(x);
            if v.is_finite() {
                v
            } else {
                f64::INFINITY
            }
        };

        let n = start.len();
        if n == 0 {
            let value = eval(start);
            if !value.is_finite() {
                return Err(MathError::CalculationError(
                    "Objective is not finite at the start point".to_string(),
                ));
            }
            return Ok(Minimum {
                point: Vec::new(),
                value,
                iterations: 0,
            });
        }

        let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
        simplex.push(start.to_vec());
        for i in 0..n {
            let mut vertex = start.to_vec();
            vertex[i] += if vertex[i].abs() > 1e-8 {
                0.05 * vertex[i]
            } else {
                0.1
            };
            simplex.push(vertex);
        }
        let mut values: Vec<f64> = simplex.iter().map(|v| eval(v)).collect();

        for iteration in 0..self.max_iterations {
            order_simplex(&mut simplex, &mut values);

            let best = values[0];
            let worst = values[n];
            let flat =
                2.0 * (worst - best).abs() <= self.tolerance * (worst.abs() + best.abs()) + TINY;
            if best.is_finite() && (flat || self.collapsed(&simplex)) {
                return Ok(Minimum {
                    point: simplex[0].clone(),
                    value: best,
                    iterations: iteration,
                });
            }

            let centroid: Vec<f64> = (0..n)
                .map(|j| simplex[..n].iter().map(|v| v[j]).sum::<f64>() / n as f64)
                .collect();

            let reflected = along(&centroid, &simplex[n], -ALPHA);
            let f_reflected = eval(&reflected);

            if f_reflected < values[0] {
                let expanded = along(&centroid, &simplex[n], -GAMMA);
                let f_expanded = eval(&expanded);
                if f_expanded < f_reflected {
                    simplex[n] = expanded;
                    values[n] = f_expanded;
                } else {
                    simplex[n] = reflected;
                    values[n] = f_reflected;
                }
                continue;
            }

            if f_reflected < values[n - 1] {
                simplex[n] = reflected;
                values[n] = f_reflected;
                continue;
            }

            let (contracted, f_contracted) = if f_reflected < values[n] {
                let point = along(&centroid, &reflected, RHO);
                let value = eval(&point);
                (point, value)
            } else {
                let point = along(&centroid, &simplex[n], RHO);
                let value = eval(&point);
                (point, value)
            };

            if f_contracted < values[n].min(f_reflected) {
                simplex[n] = contracted;
                values[n] = f_contracted;
                continue;
            }

            let anchor = simplex[0].clone();
            for i in 1..=n {
                simplex[i] = along(&anchor, &simplex[i], SIGMA);
                values[i] = eval(&simplex[i]);
            }
        }

        Err(MathError::ConvergenceFailure(format!(
            "no convergence within {} iterations",
            self.max_iterations
        )))
    }
}

/// `origin + t * (target - origin)`
fn along(origin: &[f64], target: &[f64], t: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(target)
        .map(|(o, x)| o + t * (x - o))
        .collect()
}

/// Sort vertices by objective value, ties broken by insertion order
fn order_simplex(simplex: &mut Vec<Vec<f64>>, values: &mut Vec<f64>) {
    let mut indices: Vec<usize> = (0..values.len()).collect();
    indices.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    *simplex = indices.iter().map(|&i| simplex[i].clone()).collect();
    *values = indices.iter().map(|&i| values[i]).collect();
}
