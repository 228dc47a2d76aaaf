//! Polynomial least squares fit.
//!
//! Given points `(x_i, y_i)` and a degree `d`, solve for `c_0..c_d` minimizing
//! the squared residuals, then evaluate the polynomial over the resampled
//! domain `min(x) .. max(x) + resolution`.

use crate::domain::{FitOptions, FitResult, Point, PolynomialParams};
use crate::error::FitError;
use crate::math::{polynomial_least_squares, range, transpose, x_bounds};
use crate::models::eval_polynomial;

pub fn fit_polynomial(
    points: &[Point],
    opts: &FitOptions,
) -> Result<FitResult<PolynomialParams>, FitError> {
    opts.validate()?;
    ensure_finite(points)?;

    let k = opts.degree + 1;
    if points.len() < k {
        return Err(FitError::insufficient("points", k, points.len()));
    }

    let (xs, ys) = transpose(points);
    let coefs = polynomial_least_squares(&xs, &ys, opts.degree).ok_or(FitError::SingularSystem {
        n: points.len(),
        k,
    })?;

    let Some((x_min, x_max)) = x_bounds(points) else {
        return Err(FitError::insufficient("points", k, 0));
    };
    let fitted = range(x_min, x_max + opts.resolution, opts.resolution)?
        .into_iter()
        .map(|x| Point::new(x, eval_polynomial(&coefs, x)))
        .collect();

    Ok(FitResult {
        points: fitted,
        params: PolynomialParams { coefs },
    })
}

pub(crate) fn ensure_finite(points: &[Point]) -> Result<(), FitError> {
    match points.iter().position(|p| !p.is_finite()) {
        Some(idx) => Err(FitError::invalid(format!(
            "point {idx} is not finite: ({}, {})",
            points[idx].x, points[idx].y
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;
    use rand::rngs::StdRng;

    fn generate(coefs: &[f64], n: usize) -> Vec<Point> {
        (0..n)
            .map(|i| {
                let x = i as f64;
                Point::new(x, eval_polynomial(coefs, x))
            })
            .collect()
    }

    #[test]
    fn recovers_seeded_coefficients_for_degrees_one_to_four() {
        let mut rng = StdRng::seed_from_u64(42);

        for degree in 1..=4 {
            let coefs: Vec<f64> = (0..=degree)
                .map(|_| (rng.gen_range(0.5..5.0_f64) * 1e4).round() / 1e4)
                .collect();
            let n = rng.gen_range((degree + 1)..100);
            let data = generate(&coefs, n);

            let fit = fit_polynomial(&data, &FitOptions::new(1.0, degree)).unwrap();

            assert_eq!(fit.params.coefs.len(), degree + 1);
            for (fitted, truth) in fit.params.coefs.iter().zip(coefs.iter()) {
                assert!(
                    (fitted - truth).abs() <= truth.abs() * 0.01,
                    "degree {degree}: {fitted} vs {truth}"
                );
            }

            // At resolution 1 the resampled grid lands on the generator's x values.
            assert_eq!(fit.points.len(), data.len());
            for (fitted, truth) in fit.points.iter().zip(data.iter()) {
                assert!((fitted.x - truth.x).abs() <= truth.x.abs() * 0.01);
                assert!((fitted.y - truth.y).abs() <= truth.y.abs() * 0.01);
            }
        }
    }

    #[test]
    fn fits_unsorted_noisy_line() {
        let data = vec![
            Point::new(3.0, 7.1),
            Point::new(0.0, 0.9),
            Point::new(2.0, 5.0),
            Point::new(1.0, 3.1),
        ];
        let fit = fit_polynomial(&data, &FitOptions::new(0.5, 1)).unwrap();
        assert!((fit.params.coefs[0] - 0.95).abs() < 1e-9);
        assert!((fit.params.coefs[1] - 2.05).abs() < 1e-9);

        let xs: Vec<f64> = fit.points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0]);
    }

    #[test]
    fn rejects_underdetermined_system() {
        let data = generate(&[1.0, 1.0, 1.0], 2);
        let err = fit_polynomial(&data, &FitOptions::new(0.1, 2)).unwrap_err();
        assert!(matches!(
            err,
            FitError::InsufficientData {
                required: 3,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn rejects_invalid_resolution() {
        let data = generate(&[1.0, 1.0], 5);
        let err = fit_polynomial(&data, &FitOptions::new(-0.1, 1)).unwrap_err();
        assert!(matches!(err, FitError::InvalidParameter(_)));
    }

    #[test]
    fn rejects_non_finite_points() {
        let mut data = generate(&[1.0, 1.0], 5);
        data[2].y = f64::NAN;
        let err = fit_polynomial(&data, &FitOptions::default()).unwrap_err();
        assert!(matches!(err, FitError::InvalidParameter(_)));
    }

    #[test]
    fn repeated_fits_are_identical() {
        let data = generate(&[0.3, -1.2, 0.05], 30);
        let opts = FitOptions::new(0.1, 2);
        assert_eq!(
            fit_polynomial(&data, &opts).unwrap(),
            fit_polynomial(&data, &opts).unwrap()
        );
    }
}
