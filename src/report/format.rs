//! Formatted terminal output and legend labels.
//!
//! Formatting lives in one place so:
//! - the fitting code stays free of presentation concerns
//! - output changes are localized

use crate::domain::{FitOptions, FitParams, FitResult, GaussianParams, ModelKind, PolynomialParams, SineParams};
use crate::error::FitError;
use crate::math::x_bounds;

/// Legend text for a set of fitted parameters.
pub fn format_params(params: &FitParams) -> String {
    match params {
        FitParams::Polynomial(p) => format_polynomial(p),
        FitParams::Gaussian(g) => format_gaussian(g),
        FitParams::Sine(s) => format_sine(s),
    }
}

/// Coefficients rounded to 2 decimals, highest power first:
/// `0.5 * x^2 + 1.2 * x^1 + 3`.
pub fn format_polynomial(params: &PolynomialParams) -> String {
    params
        .coefs
        .iter()
        .enumerate()
        .rev()
        .map(|(power, &coef)| {
            if power == 0 {
                format!("{}", round2(coef))
            } else {
                format!("{} * x^{power}", round2(coef))
            }
        })
        .collect::<Vec<_>>()
        .join(" + ")
}

pub fn format_gaussian(params: &GaussianParams) -> String {
    format!("μ = {:.4}, σ = {:.4}", params.mu, params.sigma)
}

pub fn format_sine(params: &SineParams) -> String {
    format!(
        "{:.4}·sin({:.4}x + {:.4}) + [{}]",
        params.magnitude,
        params.pulsation,
        params.phase,
        format_polynomial(&params.carrier.params)
    )
}

/// Multi-line summary of one fit.
pub fn format_fit_summary(
    name: &str,
    kind: ModelKind,
    options: &FitOptions,
    result: Result<&FitResult<FitParams>, &FitError>,
) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {name} ({}) ===\n", kind.display_name()));
    out.push_str(&format!(
        "Options: resolution={} | degree={}\n",
        options.resolution, options.degree
    ));

    match result {
        Ok(fit) => {
            out.push_str(&format!("Fit: {}\n", format_params(&fit.params)));
            match x_bounds(&fit.points) {
                Some((lo, hi)) => out.push_str(&format!(
                    "Curve: n={} | x=[{lo:.3}, {hi:.3}]\n",
                    fit.points.len()
                )),
                None => out.push_str("Curve: n=0\n"),
            }
            if let FitParams::Sine(s) = &fit.params {
                out.push_str(&format!(
                    "Period: {:.4} | carrier: {}\n",
                    std::f64::consts::TAU / s.pulsation,
                    fmt_vec(&s.carrier.params.coefs)
                ));
            }
        }
        Err(e) => out.push_str(&format!("Failed: {e}\n")),
    }

    out
}

/// One line per measurement, used by the batch command.
pub fn format_batch_line(name: &str, result: &Result<FitResult<FitParams>, FitError>) -> String {
    match result {
        Ok(fit) => format!("{:<24} ok    {}", truncate(name, 24), format_params(&fit.params)),
        Err(e) => format!("{:<24} error {e}", truncate(name, 24)),
    }
}

/// Rounded to 2 decimals; `-0.0` comes out as `0`.
fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0 + 0.0
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.6}")).collect();
    format!("[{}]", parts.join(", "))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
