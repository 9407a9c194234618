//! Two-parameter gamma distribution fitted by maximum likelihood.

use crate::error::SpiError;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Gamma};
use statrs::function::gamma::digamma;

/// Relative width at which the shape bisection stops.
const SHAPE_TOLERANCE: f64 = 1e-12;

/// Iteration cap for bracketing and for bisection.
const MAX_ITERATIONS: usize = 500;

/// Gamma distribution parameters with location fixed at zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GammaParams {
    pub shape: f64,
    pub scale: f64,
}

impl GammaParams {
    /// Build the statrs distribution. statrs parameterises by rate = 1 / scale.
    pub fn distribution(&self) -> Result<Gamma, SpiError> {
        Gamma::new(self.shape, 1.0 / self.scale).map_err(|e| {
            SpiError::FitDivergence(format!(
                "invalid parameters shape={} scale={}: {}",
                self.shape, self.scale, e
            ))
        })
    }

    /// Cumulative probability of `x`.
    pub fn cdf(&self, x: f64) -> Result<f64, SpiError> {
        Ok(self.distribution()?.cdf(x))
    }

    pub fn mean(&self) -> f64 {
        self.shape * self.scale
    }
}

/// Fit shape and scale to strictly positive values by maximum likelihood.
///
/// With `s = ln(mean) - mean(ln x)` the shape solves `ln a - digamma(a) = s`,
/// and the scale is `mean / a`. The left side is strictly decreasing in `a`,
/// so the root is bracketed around Thom's approximation and bisected.
pub fn fit_gamma_mle(values: &[f64]) -> Result<GammaParams, SpiError> {
    if values.len() < 2 {
        return Err(SpiError::InsufficientData {
            available: values.len(),
            required: 2,
        });
    }
    if values.iter().any(|v| !v.is_finite() || *v <= 0.0) {
        return Err(SpiError::FitDivergence(
            "values must be finite and strictly positive".to_string(),
        ));
    }
    if count_distinct(values) < 2 {
        return Err(SpiError::FitDivergence(
            "all values are identical".to_string(),
        ));
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let mean_log = values.iter().map(|v| v.ln()).sum::<f64>() / n;
    let s = mean.ln() - mean_log;
    if !s.is_finite() || s <= 0.0 {
        return Err(SpiError::FitDivergence(format!(
            "degenerate log-likelihood (s = {})",
            s
        )));
    }

    let shape = solve_shape(s)?;
    let scale = mean / shape;
    if !shape.is_finite() || !scale.is_finite() || scale <= 0.0 {
        return Err(SpiError::FitDivergence(format!(
            "non-finite estimate shape={} scale={}",
            shape, scale
        )));
    }
    Ok(GammaParams { shape, scale })
}

/// Root of `ln a - digamma(a) - s`.
fn solve_shape(s: f64) -> Result<f64, SpiError> {
    let objective = |a: f64| a.ln() - digamma(a) - s;

    let initial = (3.0 - s + ((s - 3.0).powi(2) + 24.0 * s).sqrt()) / (12.0 * s);
    let mut lo = initial;
    let mut hi = initial;

    let mut iterations = 0;
    while objective(lo) < 0.0 {
        lo /= 2.0;
        iterations += 1;
        if iterations > MAX_ITERATIONS || lo <= f64::MIN_POSITIVE {
            return Err(SpiError::FitDivergence(
                "could not bracket shape from below".to_string(),
            ));
        }
    }
    iterations = 0;
    while objective(hi) > 0.0 {
        hi *= 2.0;
        iterations += 1;
        if iterations > MAX_ITERATIONS || !hi.is_finite() {
            return Err(SpiError::FitDivergence(
                "could not bracket shape from above".to_string(),
            ));
        }
    }

    for _ in 0..MAX_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        if objective(mid) > 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo <= SHAPE_TOLERANCE * hi {
            break;
        }
    }
    Ok(0.5 * (lo + hi))
}

fn count_distinct(values: &[f64]) -> usize {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted.dedup();
    sorted.len()
}
