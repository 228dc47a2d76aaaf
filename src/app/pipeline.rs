//! Shared "fit pipeline" logic used by the CLI commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CASSY ingest -> column selection -> validation -> fit
//!
//! The command handlers can then focus on presentation and exports.

use std::path::Path;

use crate::cli::{FitSettings, SynthArgs};
use crate::data::{generate_gaussian, generate_polynomial, generate_sine, to_measurement, SineSpec};
use crate::domain::{FitParams, FitResult, Measurement, ModelKind, Point};
use crate::error::{AppError, FitError};
use crate::fit::{fit_batch, fit_model};

/// All computed outputs of a single `labfit fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub measurement: Measurement,
    pub points: Vec<Point>,
    pub fit: FitResult<FitParams>,
}

/// Outputs of a `labfit batch` run, in file order.
#[derive(Debug, Clone)]
pub struct BatchOutput {
    pub results: Vec<(String, Result<FitResult<FitParams>, FitError>)>,
}

/// Read one export and fit the selected columns.
pub fn run_fit(input: &Path, name: Option<&str>, settings: &FitSettings) -> Result<RunOutput, AppError> {
    let opts = settings.options();
    opts.validate()?;

    let name = name.map(str::to_string).unwrap_or_else(|| super::file_stem(input));
    let measurement = crate::io::cassy::read_cassy(input, &name)?;
    let points = select_points(&measurement, settings)?;

    let fit = fit_model(settings.model, &points, &opts)?;

    Ok(RunOutput {
        measurement,
        points,
        fit,
    })
}

/// Read every export in `dir` and fit them in parallel.
///
/// Unreadable files abort the batch; per-measurement fit failures do not.
pub fn run_batch(dir: &Path, names: &[String], settings: &FitSettings) -> Result<BatchOutput, AppError> {
    let opts = settings.options();
    opts.validate()?;

    let measurements = crate::io::cassy::read_cassy_dir(dir, names)?;
    if measurements.is_empty() {
        return Err(AppError::new(3, format!("No .txt exports found in '{}'.", dir.display())));
    }

    let mut labels = Vec::with_capacity(measurements.len());
    let mut point_sets = Vec::with_capacity(measurements.len());
    for m in &measurements {
        match select_points(m, settings) {
            Ok(points) => {
                labels.push(format!("{} ({})", m.name, m.description));
                point_sets.push(points);
            }
            Err(e) => eprintln!("Skipping '{}': {e}", m.description),
        }
    }

    let results = labels
        .into_iter()
        .zip(fit_batch(settings.model, &point_sets, &opts))
        .collect();

    Ok(BatchOutput { results })
}

/// Generate a synthetic measurement for the `synth` command.
pub fn synthesize(args: &SynthArgs) -> Result<Measurement, AppError> {
    let points = match args.model {
        ModelKind::Sine => generate_sine(&SineSpec::default(), args.count, args.dx, args.noise, args.seed)?,
        ModelKind::Polynomial => generate_polynomial(&[1.0, 0.5, -0.02], args.count, args.dx, args.noise, args.seed)?,
        ModelKind::Gaussian => generate_gaussian(0.0, 1.0, args.count, args.seed)?,
    };

    let name = super::file_stem(&args.output);
    Ok(to_measurement(&name, &points))
}

/// Resolve the x/y selectors and extract finite points.
///
/// Rows with non-finite values are reported on stderr and dropped.
fn select_points(measurement: &Measurement, settings: &FitSettings) -> Result<Vec<Point>, AppError> {
    let x_col = measurement.column_index(&settings.x)?;
    let y_col = measurement.column_index(&settings.y)?;
    let points = measurement.points(x_col, y_col)?;

    let total = points.len();
    let finite: Vec<Point> = points.into_iter().filter(Point::is_finite).collect();
    if finite.len() < total {
        eprintln!(
            "Dropped {} non-finite row(s) from '{}'.",
            total - finite.len(),
            measurement.description
        );
    }
    Ok(finite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::cassy::write_cassy;

    fn settings(model: ModelKind) -> FitSettings {
        FitSettings {
            model,
            degree: 1,
            resolution: 0.1,
            x: "x".to_string(),
            y: "1".to_string(),
        }
    }

    fn temp_dir(tag: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("labfit_pipeline_{tag}_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn fit_reads_export_and_fits_columns() {
        let dir = temp_dir("fit");
        let path = dir.join("line.txt");
        let pts = generate_polynomial(&[1.0, 2.0], 10, 1.0, 0.0, 0).unwrap();
        write_cassy(&path, &to_measurement("line", &pts)).unwrap();

        let run = run_fit(&path, None, &settings(ModelKind::Polynomial)).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(run.measurement.name, "line");
        assert_eq!(run.points, pts);
        let FitParams::Polynomial(p) = &run.fit.params else {
            panic!("expected polynomial params");
        };
        assert!((p.coefs[0] - 1.0).abs() < 1e-9);
        assert!((p.coefs[1] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn batch_keeps_going_after_a_failed_fit() {
        let dir = temp_dir("batch");
        let sine = generate_sine(&SineSpec::default(), 40, 1.0, 0.0, 0).unwrap();
        let ramp = generate_polynomial(&[0.0, 1.0], 10, 1.0, 0.0, 0).unwrap();
        write_cassy(&dir.join("a.txt"), &to_measurement("a", &sine)).unwrap();
        write_cassy(&dir.join("b.txt"), &to_measurement("b", &ramp)).unwrap();

        let batch = run_batch(&dir, &["wave".to_string()], &settings(ModelKind::Sine)).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(batch.results.len(), 2);
        assert_eq!(batch.results[0].0, "wave (a.txt)");
        assert!(batch.results[0].1.is_ok());
        assert_eq!(batch.results[1].0, "undefined (b.txt)");
        assert!(matches!(batch.results[1].1, Err(FitError::InsufficientData { .. })));
    }

    #[test]
    fn empty_directory_is_insufficient_data() {
        let dir = temp_dir("empty");
        let err = run_batch(&dir, &[], &settings(ModelKind::Gaussian)).unwrap_err();
        std::fs::remove_dir_all(&dir).ok();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn invalid_resolution_fails_before_reading() {
        let mut s = settings(ModelKind::Polynomial);
        s.resolution = -1.0;
        let err = run_fit(Path::new("/nonexistent.txt"), None, &s).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("resolution"));
    }

    #[test]
    fn synth_names_measurement_after_output() {
        let args = SynthArgs {
            model: ModelKind::Gaussian,
            count: 25,
            dx: 1.0,
            seed: 3,
            noise: 0.0,
            output: "runs/normal.txt".into(),
        };
        let m = synthesize(&args).unwrap();
        assert_eq!(m.name, "normal");
        assert_eq!(m.rows.len(), 25);
    }
}
