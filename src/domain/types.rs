//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between ingest, fitting and export without conversion
//! - written to JSON for an external plotting tool
//! - reloaded later for comparisons

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::FitError;

/// A single `(x, y)` observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// One column of an instrument export, e.g. `"Spannung" U_A1 / V`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub unit: Option<String>,
    pub description: Option<String>,
}

impl Column {
    /// Header cell as written by the tabular export.
    pub fn header_label(&self) -> String {
        let description = self.description.as_deref().unwrap_or(&self.name);
        format!(
            "\"{description}\" {} / {}",
            self.name,
            self.unit.as_deref().unwrap_or("")
        )
    }
}

/// One experimental run: column metadata plus numeric rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub name: String,
    pub description: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<f64>>,
}

impl Measurement {
    /// Resolve a column by name, falling back to a zero-based index.
    pub fn column_index(&self, selector: &str) -> Result<usize, FitError> {
        if let Some(idx) = self.columns.iter().position(|c| c.name == selector) {
            return Ok(idx);
        }
        match selector.parse::<usize>() {
            Ok(idx) if idx < self.columns.len() => Ok(idx),
            _ => Err(FitError::invalid(format!(
                "Unknown column '{selector}' in measurement '{}' (available: {})",
                self.name,
                self.columns
                    .iter()
                    .map(|c| c.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }

    /// Extract the `(x, y)` point sequence from two columns, keeping row order.
    pub fn points(&self, x_col: usize, y_col: usize) -> Result<Vec<Point>, FitError> {
        let width = self.columns.len();
        if x_col >= width || y_col >= width {
            return Err(FitError::invalid(format!(
                "Column index out of range: x={x_col}, y={y_col}, columns={width}"
            )));
        }

        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| match (row.get(x_col), row.get(y_col)) {
                (Some(&x), Some(&y)) => Ok(Point::new(x, y)),
                _ => Err(FitError::invalid(format!(
                    "Row {i} of measurement '{}' has {} values, expected at least {}",
                    self.name,
                    row.len(),
                    x_col.max(y_col) + 1
                ))),
            })
            .collect()
    }
}

/// Options shared by every fitter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
    /// Step of the resampled output domain.
    ///
    /// The sine fitter also uses it as its match tolerance (`5 * resolution`)
    /// and as the phase search step.
    pub resolution: f64,
    /// Polynomial degree (the sine fitter uses it for its carrier).
    pub degree: usize,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            resolution: 0.01,
            degree: 1,
        }
    }
}

impl FitOptions {
    pub fn new(resolution: f64, degree: usize) -> Self {
        Self { resolution, degree }
    }

    pub fn validate(&self) -> Result<(), FitError> {
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(FitError::invalid(format!(
                "resolution must be finite and > 0, got {}",
                self.resolution
            )));
        }
        Ok(())
    }
}

/// A fitted curve: the resampled points plus fitter-specific parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult<P> {
    pub points: Vec<Point>,
    pub params: P,
}

/// Polynomial coefficients, `coefs[i]` multiplies `x^i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolynomialParams {
    pub coefs: Vec<f64>,
}

/// Sample mean and unbiased standard deviation of the x-coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianParams {
    pub mu: f64,
    pub sigma: f64,
}

/// `magnitude * sin(pulsation * x + phase) + carrier(x)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SineParams {
    pub magnitude: f64,
    /// Angular frequency (rad per x-unit).
    pub pulsation: f64,
    /// Radians, in `[0, 2π)`.
    pub phase: f64,
    pub carrier: FitResult<PolynomialParams>,
}

/// Parameters of any fitter, tagged by model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FitParams {
    Polynomial(PolynomialParams),
    Gaussian(GaussianParams),
    Sine(SineParams),
}

impl FitParams {
    pub fn kind(&self) -> ModelKind {
        match self {
            FitParams::Polynomial(_) => ModelKind::Polynomial,
            FitParams::Gaussian(_) => ModelKind::Gaussian,
            FitParams::Sine(_) => ModelKind::Sine,
        }
    }
}

/// Which model to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Polynomial,
    Gaussian,
    Sine,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [ModelKind::Polynomial, ModelKind::Gaussian, ModelKind::Sine];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ModelKind::Polynomial => "Polynomial",
            ModelKind::Gaussian => "Gaussian",
            ModelKind::Sine => "Sine + carrier",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_measurement() -> Measurement {
        Measurement {
            name: "run".to_string(),
            description: "run.txt".to_string(),
            columns: vec![
                Column {
                    name: "t".to_string(),
                    unit: Some("s".to_string()),
                    description: Some("Zeit".to_string()),
                },
                Column {
                    name: "U_A1".to_string(),
                    unit: Some("V".to_string()),
                    description: None,
                },
            ],
            rows: vec![vec![0.0, 1.5], vec![0.1, 1.25]],
        }
    }

    #[test]
    fn default_options() {
        let opts = FitOptions::default();
        assert_eq!(opts.resolution, 0.01);
        assert_eq!(opts.degree, 1);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn validate_rejects_non_positive_resolution() {
        for resolution in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            let err = FitOptions::new(resolution, 1).validate().unwrap_err();
            assert!(matches!(err, FitError::InvalidParameter(_)));
        }
    }

    #[test]
    fn column_lookup_by_name_or_index() {
        let m = sample_measurement();
        assert_eq!(m.column_index("U_A1").unwrap(), 1);
        assert_eq!(m.column_index("0").unwrap(), 0);
        assert!(m.column_index("missing").is_err());
        assert!(m.column_index("7").is_err());
    }

    #[test]
    fn points_follow_row_order() {
        let m = sample_measurement();
        let pts = m.points(0, 1).unwrap();
        assert_eq!(pts, vec![Point::new(0.0, 1.5), Point::new(0.1, 1.25)]);
    }

    #[test]
    fn header_label_falls_back_to_name() {
        let m = sample_measurement();
        assert_eq!(m.columns[0].header_label(), "\"Zeit\" t / s");
        assert_eq!(m.columns[1].header_label(), "\"U_A1\" U_A1 / V");
    }

    #[test]
    fn params_serialize_with_kind_tag() {
        let params = FitParams::Gaussian(GaussianParams { mu: 1.0, sigma: 2.0 });
        let json = serde_json::to_string(&params).unwrap();
        assert!(json.contains("\"kind\":\"gaussian\""));
        let back: FitParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind(), ModelKind::Gaussian);
    }
}
