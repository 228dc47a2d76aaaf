//! Read/write fit JSON files.
//!
//! A fit JSON is the portable record of one fit:
//! - which measurement and columns it came from
//! - model kind, options and fitted parameters
//! - the resampled curve for quick plotting
//!
//! The schema is `FitFile`.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{FitOptions, FitParams, FitResult, ModelKind, Point};
use crate::error::AppError;

pub const TOOL_NAME: &str = "labfit";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    /// Measurement name (or the input file name when unnamed).
    pub measurement: String,
    pub model: ModelKind,
    pub options: FitOptions,
    pub params: FitParams,
    /// Human-readable formula, as printed by the report.
    pub label: String,
    pub points: Vec<Point>,
}

impl FitFile {
    pub fn new(measurement: &str, options: FitOptions, fit: &FitResult<FitParams>, label: String) -> Self {
        Self {
            tool: TOOL_NAME.to_string(),
            generated_at: Utc::now(),
            measurement: measurement.to_string(),
            model: fit.params.kind(),
            options,
            params: fit.params.clone(),
            label,
            points: fit.points.clone(),
        }
    }
}

/// Write a fit JSON file.
pub fn write_fit_json(path: &Path, fit: &FitFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create fit JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, fit).map_err(|e| AppError::new(2, format!("Failed to write fit JSON: {e}")))?;
    Ok(())
}

/// Read a fit JSON file.
pub fn read_fit_json(path: &Path) -> Result<FitFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open fit JSON '{}': {e}", path.display())))?;
    let fit: FitFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid fit JSON: {e}")))?;
    Ok(fit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GaussianParams, PolynomialParams, SineParams};

    fn sine_fit() -> FitResult<FitParams> {
        FitResult {
            points: vec![Point::new(0.0, 4.5), Point::new(0.1, 4.6)],
            params: FitParams::Sine(SineParams {
                magnitude: 3.0,
                pulsation: 0.5,
                phase: 1.0,
                carrier: FitResult {
                    points: vec![Point::new(0.0, 2.0)],
                    params: PolynomialParams { coefs: vec![2.0, 0.1] },
                },
            }),
        }
    }

    #[test]
    fn json_round_trip_keeps_params() {
        let file = FitFile::new("pendulum", FitOptions::new(0.1, 1), &sine_fit(), "sine".to_string());
        assert_eq!(file.model, ModelKind::Sine);

        let path = std::env::temp_dir().join(format!("labfit_fit_{}.json", std::process::id()));
        write_fit_json(&path, &file).unwrap();
        let back = read_fit_json(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(back, file);
    }

    #[test]
    fn params_are_tagged_by_kind() {
        let params = FitParams::Gaussian(GaussianParams { mu: 1.0, sigma: 2.0 });
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["kind"], "gaussian");
        assert_eq!(value["mu"], 1.0);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_fit_json(Path::new("/nonexistent/labfit.json")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
