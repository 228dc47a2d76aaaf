//! Model dispatch and parallel batch fitting.
//!
//! Each fit is a pure function of its inputs, so a batch is evaluated with
//! rayon and no coordination. Failures stay per measurement.

use rayon::prelude::*;

use crate::domain::{FitOptions, FitParams, FitResult, ModelKind, Point};
use crate::error::FitError;
use crate::fit::{fit_gaussian, fit_polynomial, fit_sine};

/// Fit one point set with the selected model, returning tagged parameters.
pub fn fit_model(
    kind: ModelKind,
    points: &[Point],
    opts: &FitOptions,
) -> Result<FitResult<FitParams>, FitError> {
    match kind {
        ModelKind::Polynomial => fit_polynomial(points, opts).map(|r| FitResult {
            points: r.points,
            params: FitParams::Polynomial(r.params),
        }),
        ModelKind::Gaussian => fit_gaussian(points, opts).map(|r| FitResult {
            points: r.points,
            params: FitParams::Gaussian(r.params),
        }),
        ModelKind::Sine => fit_sine(points, opts).map(|r| FitResult {
            points: r.points,
            params: FitParams::Sine(r.params),
        }),
    }
}

/// Fit many independent point sets in parallel.
///
/// Results keep input order.
pub fn fit_batch<S>(
    kind: ModelKind,
    point_sets: &[S],
    opts: &FitOptions,
) -> Vec<Result<FitResult<FitParams>, FitError>>
where
    S: AsRef<[Point]> + Sync,
{
    point_sets
        .par_iter()
        .map(|points| fit_model(kind, points.as_ref(), opts))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::synthetic::{SineSpec, generate_sine};

    #[test]
    fn dispatch_tags_params_by_model() {
        let points: Vec<Point> = (0..20)
            .map(|i| Point::new(i as f64, 1.0 + 0.5 * i as f64))
            .collect();
        let opts = FitOptions::new(0.5, 1);

        for kind in [ModelKind::Polynomial, ModelKind::Gaussian] {
            let fit = fit_model(kind, &points, &opts).unwrap();
            assert_eq!(fit.params.kind(), kind);
            assert!(!fit.points.is_empty());
        }
    }

    #[test]
    fn batch_keeps_order_and_isolates_failures() {
        let good = generate_sine(&SineSpec::default(), 40, 1.0, 0.0, 1).unwrap();
        let bad = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        let sets = vec![good.clone(), bad, good];

        let results = fit_batch(ModelKind::Sine, &sets, &FitOptions::new(0.1, 1));
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(FitError::InsufficientData { .. })));
        assert_eq!(results[0].as_ref().unwrap(), results[2].as_ref().unwrap());
    }

    #[test]
    fn batch_matches_sequential_fits() {
        let sets: Vec<Vec<Point>> = (0..8)
            .map(|k| {
                (0..15)
                    .map(|i| Point::new(i as f64, k as f64 + 0.25 * (i * i) as f64))
                    .collect()
            })
            .collect();
        let opts = FitOptions::new(0.25, 2);

        let parallel = fit_batch(ModelKind::Polynomial, &sets, &opts);
        for (set, result) in sets.iter().zip(parallel.iter()) {
            let sequential = fit_model(ModelKind::Polynomial, set, &opts).unwrap();
            assert_eq!(result.as_ref().unwrap(), &sequential);
        }
    }
}
