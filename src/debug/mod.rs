//! Debug bundle writer for inspecting a single fit.
//!
//! The bundle is a markdown file with the options, the input points and, for
//! sine fits, every intermediate of the estimate and the phase search.

use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::domain::{FitOptions, ModelKind, Point};
use crate::error::AppError;
use crate::fit::{estimate_sine, fit_model, search_phase, ExtremumKind};
use crate::models::Predict;
use crate::report::format_params;

/// Write `<dir>/labfit_debug_<timestamp>.md` and return its path.
pub fn write_debug_bundle(
    dir: &Path,
    name: &str,
    kind: ModelKind,
    points: &[Point],
    opts: &FitOptions,
) -> Result<PathBuf, AppError> {
    create_dir_all(dir).map_err(|e| AppError::new(2, format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("labfit_debug_{ts}.md"));

    let mut file = File::create(&path).map_err(|e| AppError::new(2, format!("Failed to create debug file: {e}")))?;
    render_debug(&mut file, name, kind, points, opts)
        .map_err(|e| AppError::new(2, format!("Failed to write debug: {e}")))?;

    Ok(path)
}

/// Render the bundle body.
pub fn render_debug<W: Write>(
    out: &mut W,
    name: &str,
    kind: ModelKind,
    points: &[Point],
    opts: &FitOptions,
) -> std::io::Result<()> {
    writeln!(out, "# labfit debug bundle")?;
    writeln!(out, "- generated: {}", Local::now().to_rfc3339())?;
    writeln!(out, "- measurement: {name}")?;
    writeln!(out, "- model: {}", kind.display_name())?;
    writeln!(out, "- resolution: {}", opts.resolution)?;
    writeln!(out, "- degree: {}", opts.degree)?;
    writeln!(out, "- points: {}", points.len())?;

    if kind == ModelKind::Sine {
        write_sine_section(out, points, opts)?;
    }

    writeln!(out, "\n## Result")?;
    let fit = fit_model(kind, points, opts);
    match &fit {
        Ok(fit) => {
            writeln!(out, "- params: {}", format_params(&fit.params))?;
            writeln!(out, "- curve points: {}", fit.points.len())?;
        }
        Err(e) => writeln!(out, "- failed: {e}")?,
    }

    writeln!(out, "\n## Input points")?;
    writeln!(out, "| x | y | fitted |")?;
    writeln!(out, "| - | - | - |")?;
    for p in points {
        let fitted = fit.as_ref().ok().map(|f| f.params.predict(p.x));
        writeln!(out, "| {:.6} | {:.6} | {} |", p.x, p.y, fmt_opt(fitted))?;
    }

    Ok(())
}

fn write_sine_section<W: Write>(out: &mut W, points: &[Point], opts: &FitOptions) -> std::io::Result<()> {
    writeln!(out, "\n## Sine estimate")?;
    let estimate = match estimate_sine(points, opts) {
        Ok(estimate) => estimate,
        Err(e) => {
            writeln!(out, "- estimate failed: {e}")?;
            return Ok(());
        }
    };

    writeln!(out, "- magnitude: {:.6}", estimate.magnitude)?;
    writeln!(out, "- pulsation: {:.6}", estimate.pulsation)?;
    writeln!(out, "- initial phase: {:.6}", estimate.phase)?;
    writeln!(out, "- starts on: {}", if estimate.falling { "maximum" } else { "minimum" })?;
    writeln!(out, "- carrier: {}", fmt_vec(&estimate.carrier.params.coefs))?;

    writeln!(out, "\n### Extrema")?;
    writeln!(out, "| # | kind | x | y |")?;
    writeln!(out, "| - | - | - | - |")?;
    for (i, e) in estimate.extrema.iter().enumerate() {
        let kind = match e.kind {
            ExtremumKind::Maximum => "max",
            ExtremumKind::Minimum => "min",
        };
        writeln!(out, "| {i} | {kind} | {:.6} | {:.6} |", e.point.x, e.point.y)?;
    }

    writeln!(out, "\n### Phase search")?;
    match search_phase(&estimate, opts) {
        Ok(search) => {
            writeln!(out, "- steps: {}", search.steps)?;
            writeln!(out, "- phase: {:.6}", search.phase)?;
            writeln!(out, "- anchor x: {:.6}", search.anchor_x)?;
            writeln!(out, "- mismatch: {:.6}", search.mismatch)?;
        }
        Err(e) => writeln!(out, "- failed: {e}")?,
    }

    Ok(())
}

fn fmt_vec(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| format!("{v:.6}")).collect();
    format!("[{}]", parts.join(", "))
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.6}"),
        _ => "-".to_string(),
    }
}
