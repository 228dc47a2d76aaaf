//! Gaussian fit by moment estimation.
//!
//! The x-coordinates are treated as a univariate sample; y is ignored. Binned
//! histograms must be expanded by the caller.

use crate::domain::{FitOptions, FitResult, GaussianParams, Point};
use crate::error::FitError;
use crate::fit::polynomial::ensure_finite;
use crate::math::{mean, range, sample_std, x_bounds};
use crate::models::normal_density;

pub fn fit_gaussian(
    points: &[Point],
    opts: &FitOptions,
) -> Result<FitResult<GaussianParams>, FitError> {
    opts.validate()?;
    ensure_finite(points)?;

    let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let (Some(mu), Some(sigma)) = (mean(&xs), sample_std(&xs)) else {
        return Err(FitError::insufficient("points", 2, xs.len()));
    };
    if sigma <= 0.0 {
        return Err(FitError::insufficient("distinct x values", 2, 1));
    }

    let Some((x_min, x_max)) = x_bounds(points) else {
        return Err(FitError::insufficient("points", 2, 0));
    };
    let fitted = range(x_min, x_max + opts.resolution, opts.resolution)?
        .into_iter()
        .map(|x| Point::new(x, normal_density(x, mu, sigma)))
        .collect();

    Ok(FitResult {
        points: fitted,
        params: GaussianParams { mu, sigma },
    })
}
