//! Least squares solver for polynomial fits.
//!
//! We solve
//!
//! ```text
//! minimize Σ (y_i - Σ_p c_p x_i^p)^2
//! ```
//!
//! over the Vandermonde design matrix.
//!
//! Implementation choices:
//! - SVD rather than normal equations: `X^T X` squares the condition number,
//!   which hurts quickly for degree >= 3.
//! - Columns are scaled to unit max-norm before the solve and the coefficients
//!   unscaled afterwards. Raw powers of x span many orders of magnitude.
//! - Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices, so it is not used here.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fill one Vandermonde row: `[1, x, x^2, ..., x^degree]`.
pub fn fill_vandermonde_row(x: f64, out: &mut [f64]) {
    let mut power = 1.0;
    for slot in out.iter_mut() {
        *slot = power;
        power *= x;
    }
}

/// Least squares polynomial coefficients (lowest power first).
///
/// `xs` and `ys` must have equal length; callers validate sizes.
pub fn polynomial_least_squares(xs: &[f64], ys: &[f64], degree: usize) -> Option<Vec<f64>> {
    let n = xs.len();
    let k = degree + 1;

    let mut design = DMatrix::<f64>::zeros(n, k);
    let mut row = vec![0.0; k];
    for (i, &x) in xs.iter().enumerate() {
        fill_vandermonde_row(x, &mut row);
        for (j, &value) in row.iter().enumerate() {
            design[(i, j)] = value;
        }
    }

    // Equilibrate columns. A zero column (all x = 0 for p >= 1) keeps scale 1.
    let scales: Vec<f64> = (0..k)
        .map(|j| {
            let max = design.column(j).amax();
            if max > 0.0 && max.is_finite() { max } else { 1.0 }
        })
        .collect();
    for (j, &scale) in scales.iter().enumerate() {
        let mut column = design.column_mut(j);
        column /= scale;
    }

    let y = DVector::from_column_slice(ys);
    let beta = solve_least_squares(&design, &y)?;

    Some(
        beta.iter()
            .zip(scales.iter())
            .map(|(b, s)| b / s)
            .collect(),
    )
}
