//! Delimited text exports.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts:
//! - a measurement with its column metadata in the header
//! - a fitted curve as plain `x;y` rows

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::{Measurement, Point};
use crate::error::AppError;

pub const DEFAULT_SEPARATOR: char = ';';

/// Write a measurement: one header cell per column, then the raw rows.
pub fn write_measurement<W: Write>(out: &mut W, measurement: &Measurement, separator: char) -> std::io::Result<()> {
    let sep = separator.to_string();
    let header: Vec<String> = measurement.columns.iter().map(|c| c.header_label()).collect();
    writeln!(out, "{}", header.join(&sep))?;

    for row in &measurement.rows {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        writeln!(out, "{}", cells.join(&sep))?;
    }
    Ok(())
}

/// Write fitted points as `x<sep>y` rows under an `x<sep>y` header.
pub fn write_points<W: Write>(out: &mut W, points: &[Point], separator: char) -> std::io::Result<()> {
    writeln!(out, "x{separator}y")?;
    for p in points {
        writeln!(out, "{}{separator}{}", p.x, p.y)?;
    }
    Ok(())
}

/// Write a measurement to a CSV file.
pub fn write_measurement_csv(path: &Path, measurement: &Measurement, separator: char) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);
    write_measurement(&mut out, measurement, separator)
        .and_then(|_| out.flush())
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV '{}': {e}", path.display())))
}

/// Write fitted points to a CSV file.
pub fn write_fit_points_csv(path: &Path, points: &[Point], separator: char) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create points CSV '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);
    write_points(&mut out, points, separator)
        .and_then(|_| out.flush())
        .map_err(|e| AppError::new(2, format!("Failed to write points CSV '{}': {e}", path.display())))
}
