//! Sinusoid fit with a polynomial carrier.
//!
//! Model:
//!
//! ```text
//! y(x) = magnitude * sin(pulsation * x + phase) + carrier(x)
//! ```
//!
//! This is a closed-form seeded heuristic, not a nonlinear optimizer:
//!
//! 1. sort by x and find strict local extrema
//! 2. magnitude = mean(|Δy| / 2), pulsation = π / mean(|Δx|) over adjacent extrema
//! 3. phase from the mean position of an ideal alternating extremum sequence
//! 4. carrier = polynomial fit of every other extremum, shifted by `magnitude`
//! 5. phase search: step the phase by `resolution` until the curve matches the
//!    first extremum within `5 * resolution` (at most 200 steps)
//!
//! Adequate for roughly periodic, lightly noisy lab data (about 15% on
//! magnitude and pulsation).

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use serde::{Deserialize, Serialize};

use crate::domain::{FitOptions, FitResult, Point, PolynomialParams, SineParams};
use crate::error::FitError;
use crate::fit::polynomial::{ensure_finite, fit_polynomial};
use crate::math::{mean, nearest_grid_point, range};
use crate::models::sine_with_carrier;

/// Maximum number of phase steps before the fit is abandoned.
pub const MAX_PHASE_STEPS: usize = 200;

/// Match tolerance in units of `resolution`.
pub const MATCH_TOLERANCE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtremumKind {
    Maximum,
    Minimum,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extremum {
    pub point: Point,
    pub kind: ExtremumKind,
}

/// Closed-form estimates before phase refinement.
#[derive(Debug, Clone, PartialEq)]
pub struct SineEstimate {
    pub extrema: Vec<Extremum>,
    pub magnitude: f64,
    pub pulsation: f64,
    /// Initial phase in `[0, 2π)`.
    pub phase: f64,
    /// The first extremum is above the second (the signal starts on a maximum).
    pub falling: bool,
    pub carrier: FitResult<PolynomialParams>,
    pub x_min: f64,
    pub x_max: f64,
}

impl SineEstimate {
    fn params_with_phase(&self, phase: f64) -> SineParams {
        SineParams {
            magnitude: self.magnitude,
            pulsation: self.pulsation,
            phase: phase.rem_euclid(TAU),
            carrier: self.carrier.clone(),
        }
    }
}

/// Outcome of a successful phase search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseSearch {
    /// Accepted phase in `[0, 2π)`.
    pub phase: f64,
    /// Number of phase steps taken (0 when the estimate matched immediately).
    pub steps: usize,
    /// Domain x used for the comparison.
    pub anchor_x: f64,
    /// `|observed - reconstructed|` at the anchor.
    pub mismatch: f64,
}

/// Strict local extrema of an x-sorted sequence.
///
/// A point qualifies when the backward and forward differences are both
/// non-zero with opposite signs. Flat runs never produce extrema.
pub fn find_extrema(sorted: &[Point]) -> Vec<Extremum> {
    sorted
        .windows(3)
        .filter_map(|w| {
            let back = w[1].y - w[0].y;
            let fwd = w[2].y - w[1].y;
            if back > 0.0 && fwd < 0.0 {
                Some(Extremum {
                    point: w[1],
                    kind: ExtremumKind::Maximum,
                })
            } else if back < 0.0 && fwd > 0.0 {
                Some(Extremum {
                    point: w[1],
                    kind: ExtremumKind::Minimum,
                })
            } else {
                None
            }
        })
        .collect()
}

/// Steps 1-4: extrema, magnitude, pulsation, initial phase and carrier.
pub fn estimate_sine(points: &[Point], opts: &FitOptions) -> Result<SineEstimate, FitError> {
    opts.validate()?;
    ensure_finite(points)?;
    if points.len() < 3 {
        return Err(FitError::insufficient("points", 3, points.len()));
    }

    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x));

    let extrema = find_extrema(&sorted);
    if extrema.len() < 2 {
        return Err(FitError::insufficient("extrema", 2, extrema.len()));
    }

    let (magnitudes, half_periods): (Vec<f64>, Vec<f64>) = extrema
        .windows(2)
        .map(|w| {
            let (a, b) = (w[0].point, w[1].point);
            ((b.y - a.y).abs() / 2.0, (b.x - a.x).abs())
        })
        .unzip();

    let (Some(magnitude), Some(half_period)) = (mean(&magnitudes), mean(&half_periods)) else {
        return Err(FitError::insufficient("extrema", 2, extrema.len()));
    };
    if half_period <= 0.0 {
        return Err(FitError::insufficient("distinct extremum positions", 2, 1));
    }
    let pulsation = PI / half_period;

    // Position of the first extremum of an ideal sequence spaced half a period apart.
    let offsets: Vec<f64> = extrema
        .iter()
        .enumerate()
        .map(|(i, e)| e.point.x - i as f64 * PI / pulsation)
        .collect();
    let t0 = mean(&offsets).unwrap_or(extrema[0].point.x);

    // A maximum sits at pulsation * x + phase = π/2; a minimum half a turn earlier.
    let falling = extrema[0].point.y > extrema[1].point.y;
    let mut phase = FRAC_PI_2 - pulsation * t0;
    if !falling {
        phase -= PI;
    }
    let phase = phase.rem_euclid(TAU);

    let shift = if falling { -magnitude } else { magnitude };
    let baseline: Vec<Point> = extrema
        .iter()
        .step_by(2)
        .map(|e| Point::new(e.point.x, e.point.y + shift))
        .collect();
    let carrier = fit_polynomial(&baseline, opts).map_err(|e| match e {
        FitError::InsufficientData {
            required, found, ..
        } => FitError::insufficient("same-class extrema", required, found),
        other => other,
    })?;

    Ok(SineEstimate {
        extrema,
        magnitude,
        pulsation,
        phase,
        falling,
        carrier,
        x_min: sorted[0].x,
        x_max: sorted[sorted.len() - 1].x,
    })
}

/// Step 5: walk the phase until the curve meets the first extremum.
pub fn search_phase(estimate: &SineEstimate, opts: &FitOptions) -> Result<PhaseSearch, FitError> {
    opts.validate()?;
    let target = estimate.extrema[0].point;
    let tolerance = MATCH_TOLERANCE * opts.resolution;

    let anchor_x = nearest_grid_point(estimate.x_min, estimate.x_max, opts.resolution, target.x)?
        .unwrap_or(target.x);

    let coefs = &estimate.carrier.params.coefs;
    let mut last_tried = estimate.phase;
    for steps in 0..MAX_PHASE_STEPS {
        let phase = estimate.phase + steps as f64 * opts.resolution;
        let y = sine_with_carrier(anchor_x, estimate.magnitude, estimate.pulsation, phase, coefs);
        let mismatch = (target.y - y).abs();
        if mismatch <= tolerance {
            return Ok(PhaseSearch {
                phase: phase.rem_euclid(TAU),
                steps,
                anchor_x,
                mismatch,
            });
        }
        last_tried = phase;
    }

    Err(FitError::FitDidNotConverge {
        iterations: MAX_PHASE_STEPS,
        last: Box::new(estimate.params_with_phase(last_tried)),
    })
}

/// Fit `magnitude * sin(pulsation * x + phase) + carrier(x)`.
///
/// The input does not need to be sorted. The returned curve covers
/// `min(x) .. max(x)` (end exclusive) at `resolution`.
pub fn fit_sine(points: &[Point], opts: &FitOptions) -> Result<FitResult<SineParams>, FitError> {
    let estimate = estimate_sine(points, opts)?;
    let search = search_phase(&estimate, opts)?;
    let params = estimate.params_with_phase(search.phase);

    let coefs = &params.carrier.params.coefs;
    let fitted = range(estimate.x_min, estimate.x_max, opts.resolution)?
        .into_iter()
        .map(|x| {
            Point::new(
                x,
                sine_with_carrier(x, params.magnitude, params.pulsation, params.phase, coefs),
            )
        })
        .collect();

    Ok(FitResult {
        points: fitted,
        params,
    })
}
