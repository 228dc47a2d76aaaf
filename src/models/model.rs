//! Model evaluation for the three fitted families.
//!
//! The fitters need one primitive per model: evaluate `y(x)` given the fitted
//! parameters. Resampled curves, label previews and the sine phase search all go
//! through these functions.

use std::f64::consts::PI;

use crate::domain::{FitParams, GaussianParams, PolynomialParams, SineParams};

/// Evaluate `Σ coefs[p] * x^p` (Horner form).
pub fn eval_polynomial(coefs: &[f64], x: f64) -> f64 {
    coefs.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Normal density `1/(σ√(2π)) · exp(-(x-μ)²/(2σ²))`.
pub fn normal_density(x: f64, mu: f64, sigma: f64) -> f64 {
    let z = (x - mu) / sigma;
    (-(z * z) / 2.0).exp() / (sigma * (2.0 * PI).sqrt())
}

/// `magnitude * sin(pulsation * x + phase) + carrier(x)`.
pub fn sine_with_carrier(
    x: f64,
    magnitude: f64,
    pulsation: f64,
    phase: f64,
    carrier: &[f64],
) -> f64 {
    magnitude * (pulsation * x + phase).sin() + eval_polynomial(carrier, x)
}

/// Evaluate a fitted model at an arbitrary x.
pub trait Predict {
    fn predict(&self, x: f64) -> f64;
}

impl Predict for PolynomialParams {
    fn predict(&self, x: f64) -> f64 {
        eval_polynomial(&self.coefs, x)
    }
}

impl Predict for GaussianParams {
    fn predict(&self, x: f64) -> f64 {
        normal_density(x, self.mu, self.sigma)
    }
}

impl Predict for SineParams {
    fn predict(&self, x: f64) -> f64 {
        sine_with_carrier(
            x,
            self.magnitude,
            self.pulsation,
            self.phase,
            &self.carrier.params.coefs,
        )
    }
}

impl Predict for FitParams {
    fn predict(&self, x: f64) -> f64 {
        match self {
            FitParams::Polynomial(p) => p.predict(x),
            FitParams::Gaussian(g) => g.predict(x),
            FitParams::Sine(s) => s.predict(x),
        }
    }
}
