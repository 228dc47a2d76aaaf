//! Seeded synthetic measurements.
//!
//! Used by the `synth` command (demo data without an instrument) and as test
//! fixtures. Every generator takes an explicit seed; there is no global RNG.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{Column, Measurement, Point};
use crate::error::FitError;
use crate::models::{eval_polynomial, normal_density, sine_with_carrier};

/// Ground truth for a sinusoid with polynomial carrier.
#[derive(Debug, Clone, PartialEq)]
pub struct SineSpec {
    pub magnitude: f64,
    pub pulsation: f64,
    pub phase: f64,
    pub carrier: Vec<f64>,
}

impl Default for SineSpec {
    fn default() -> Self {
        Self {
            magnitude: 3.0,
            pulsation: 0.5,
            phase: 1.0,
            carrier: vec![2.0, 0.1],
        }
    }
}

fn noise_source(noise: f64, count: usize) -> Result<Normal<f64>, FitError> {
    if count == 0 {
        return Err(FitError::invalid("Sample count must be > 0."));
    }
    if !(noise.is_finite() && noise >= 0.0) {
        return Err(FitError::invalid(format!(
            "Noise must be finite and >= 0, got {noise}"
        )));
    }
    Normal::new(0.0, noise).map_err(|e| FitError::invalid(format!("Noise distribution error: {e}")))
}

fn evenly_spaced<F>(count: usize, dx: f64, noise: f64, seed: u64, f: F) -> Result<Vec<Point>, FitError>
where
    F: Fn(f64) -> f64,
{
    let normal = noise_source(noise, count)?;
    if !(dx.is_finite() && dx > 0.0) {
        return Err(FitError::invalid(format!("Sample spacing must be > 0, got {dx}")));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    Ok((0..count)
        .map(|i| {
            let x = i as f64 * dx;
            let jitter = if noise > 0.0 { normal.sample(&mut rng) } else { 0.0 };
            Point::new(x, f(x) + jitter)
        })
        .collect())
}

/// `count` samples of a sinusoid with carrier at `x = i * dx`, plus N(0, noise²).
pub fn generate_sine(
    spec: &SineSpec,
    count: usize,
    dx: f64,
    noise: f64,
    seed: u64,
) -> Result<Vec<Point>, FitError> {
    evenly_spaced(count, dx, noise, seed, |x| {
        sine_with_carrier(x, spec.magnitude, spec.pulsation, spec.phase, &spec.carrier)
    })
}

/// `count` samples of a polynomial at `x = i * dx`, plus N(0, noise²).
pub fn generate_polynomial(
    coefs: &[f64],
    count: usize,
    dx: f64,
    noise: f64,
    seed: u64,
) -> Result<Vec<Point>, FitError> {
    evenly_spaced(count, dx, noise, seed, |x| eval_polynomial(coefs, x))
}

/// `count` draws from N(mu, sigma²) as x, with the density as y.
///
/// Points are returned sorted by x.
pub fn generate_gaussian(mu: f64, sigma: f64, count: usize, seed: u64) -> Result<Vec<Point>, FitError> {
    if !(sigma.is_finite() && sigma > 0.0 && mu.is_finite()) {
        return Err(FitError::invalid(format!(
            "Gaussian parameters must be finite with sigma > 0, got mu={mu}, sigma={sigma}"
        )));
    }
    let normal = noise_source(sigma, count)?;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut points: Vec<Point> = (0..count)
        .map(|_| {
            let x = mu + normal.sample(&mut rng);
            Point::new(x, normal_density(x, mu, sigma))
        })
        .collect();
    points.sort_by(|a, b| a.x.total_cmp(&b.x));
    Ok(points)
}

/// Wrap generated points in a two-column measurement.
pub fn to_measurement(name: &str, points: &[Point]) -> Measurement {
    Measurement {
        name: name.to_string(),
        description: format!("{name}.txt"),
        columns: vec![
            Column {
                name: "x".to_string(),
                unit: None,
                description: Some("synthetic abscissa".to_string()),
            },
            Column {
                name: "y".to_string(),
                unit: None,
                description: Some("synthetic signal".to_string()),
            },
        ],
        rows: points.iter().map(|p| vec![p.x, p.y]).collect(),
    }
}
