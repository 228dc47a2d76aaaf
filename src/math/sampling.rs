//! Sampling helpers shared by all fitters.
//!
//! - `range`: evenly spaced grid used for the resampled output curves
//! - `transpose` / `zip`: convert between point sequences and coordinate vectors

use crate::domain::Point;
use crate::error::FitError;

/// Upper bound on the number of samples a single grid may hold.
pub const MAX_SAMPLES: usize = 10_000_000;

/// Ascending grid `start, start + step, start + 2*step, ...` while `< end`.
///
/// Values are computed as `start + i * step`, so long grids do not accumulate
/// rounding drift. An empty grid is returned when `end <= start`.
pub fn range(start: f64, end: f64, step: f64) -> Result<Vec<f64>, FitError> {
    if !(step.is_finite() && step > 0.0) {
        return Err(FitError::invalid(format!(
            "step must be finite and > 0, got {step}"
        )));
    }
    if !(start.is_finite() && end.is_finite()) {
        return Err(FitError::invalid(format!(
            "range bounds must be finite, got {start}..{end}"
        )));
    }
    if end <= start {
        return Ok(Vec::new());
    }

    let estimate = ((end - start) / step).ceil();
    if estimate > MAX_SAMPLES as f64 {
        return Err(FitError::invalid(format!(
            "range {start}..{end} at step {step} exceeds {MAX_SAMPLES} samples"
        )));
    }

    let mut out = Vec::with_capacity(estimate as usize + 1);
    let mut i = 0usize;
    loop {
        let value = start + i as f64 * step;
        if value >= end {
            break;
        }
        out.push(value);
        i += 1;
    }
    Ok(out)
}

/// The point of `range(start, end, step)` closest to `target`, without building the grid.
///
/// Ties go to the lower grid point. `None` when the grid is empty.
pub fn nearest_grid_point(start: f64, end: f64, step: f64, target: f64) -> Result<Option<f64>, FitError> {
    if !(step.is_finite() && step > 0.0) {
        return Err(FitError::invalid(format!(
            "step must be finite and > 0, got {step}"
        )));
    }
    if !(start.is_finite() && end.is_finite() && target.is_finite()) {
        return Err(FitError::invalid(format!(
            "grid bounds and target must be finite, got {start}..{end}, target {target}"
        )));
    }
    if end <= start {
        return Ok(None);
    }

    // Index of the last grid value still below `end`.
    let mut last = ((end - start) / step).ceil().max(1.0) as usize;
    while last > 0 && start + last as f64 * step >= end {
        last -= 1;
    }
    while start + (last + 1) as f64 * step < end {
        last += 1;
    }

    let pos = ((target - start) / step).clamp(0.0, last as f64);
    let lo = pos.floor() as usize;
    let hi = (lo + 1).min(last);
    let (x_lo, x_hi) = (start + lo as f64 * step, start + hi as f64 * step);
    if (x_hi - target).abs() < (x_lo - target).abs() {
        Ok(Some(x_hi))
    } else {
        Ok(Some(x_lo))
    }
}

/// Split points into `(xs, ys)`, preserving order.
pub fn transpose(points: &[Point]) -> (Vec<f64>, Vec<f64>) {
    points.iter().map(|p| (p.x, p.y)).unzip()
}

/// Pair `xs[i]` with `ys[i]`.
///
/// Both sequences must have the same length; there is no silent truncation.
pub fn zip(xs: &[f64], ys: &[f64]) -> Result<Vec<Point>, FitError> {
    if xs.len() != ys.len() {
        return Err(FitError::LengthMismatch {
            left: xs.len(),
            right: ys.len(),
        });
    }
    Ok(xs
        .iter()
        .zip(ys.iter())
        .map(|(&x, &y)| Point::new(x, y))
        .collect())
}

/// Smallest and largest x of a non-empty point set.
pub fn x_bounds(points: &[Point]) -> Option<(f64, f64)> {
    let first = points.first()?;
    Some(points.iter().fold((first.x, first.x), |(lo, hi), p| {
        (lo.min(p.x), hi.max(p.x))
    }))
}
