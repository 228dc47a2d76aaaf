//! CASSY text-export ingest.
//!
//! Layout of an export (tab separated, every line ends with a tab):
//!
//! ```text
//! line 1-4   free-form preamble (ignored)
//! line 5     "<description>" <name> / <unit>   one cell per column
//! line 6..   numeric rows, decimal comma or point
//! ```
//!
//! Parsing goes through the `csv` reader with quoting disabled: header cells
//! contain literal quotes that are part of the description syntax.

use std::fs;
use std::path::{Path, PathBuf};

use csv::StringRecord;

use crate::domain::{Column, Measurement};
use crate::error::AppError;

/// 1-based line holding the column headers.
pub const HEADER_LINE: u64 = 5;

/// Parse the text of a CASSY export.
pub fn parse_cassy(text: &str, name: &str, description: &str) -> Result<Measurement, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(text.as_bytes());

    let mut columns: Option<Vec<Column>> = None;
    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| AppError::new(2, format!("Failed to read CASSY export '{description}': {e}")))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if line < HEADER_LINE {
            continue;
        }
        if line == HEADER_LINE {
            columns = Some(parse_header(&record, description)?);
            continue;
        }
        if columns.is_none() {
            break;
        }

        let cells = trimmed_cells(&record);
        if cells.is_empty() {
            continue;
        }
        let row = cells
            .iter()
            .map(|cell| parse_number(cell))
            .collect::<Option<Vec<f64>>>()
            .ok_or_else(|| {
                AppError::new(
                    2,
                    format!("Non-numeric value on line {line} of '{description}': {:?}", cells),
                )
            })?;
        rows.push(row);
    }

    let columns = columns.ok_or_else(|| {
        AppError::new(
            2,
            format!("Can't parse headers of '{description}': no header on line {HEADER_LINE}."),
        )
    })?;

    Ok(Measurement {
        name: name.to_string(),
        description: description.to_string(),
        columns,
        rows,
    })
}

/// Read one export; the file name becomes the measurement description.
pub fn read_cassy(path: &Path, name: &str) -> Result<Measurement, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CASSY export '{}': {e}", path.display())))?;
    let description = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    parse_cassy(&text, name, &description)
}

/// Read every `.txt` export in `dir` (sorted by path).
///
/// Measurements are named from `names` in order; `"undefined"` once it runs out.
pub fn read_cassy_dir(dir: &Path, names: &[String]) -> Result<Vec<Measurement>, AppError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| AppError::new(2, format!("Failed to list '{}': {e}", dir.display())))?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| AppError::new(2, format!("Failed to list '{}': {e}", dir.display())))?;
        let path = entry.path();
        let is_txt = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
        if path.is_file() && is_txt {
            paths.push(path);
        }
    }
    paths.sort();

    paths
        .iter()
        .enumerate()
        .map(|(i, path)| {
            let name = names.get(i).map(String::as_str).unwrap_or("undefined");
            read_cassy(path, name)
        })
        .collect()
}

/// Write a measurement in CASSY export layout (used for synthetic data).
pub fn write_cassy(path: &Path, measurement: &Measurement) -> Result<(), AppError> {
    let mut out = String::new();
    out.push_str("MEASUREMENT\t\n");
    out.push_str(&format!("{}\t\n", measurement.name));
    out.push_str(&format!("{}\t\n", measurement.description));
    out.push_str("labfit\t\n");
    for column in &measurement.columns {
        let description = column.description.as_deref().unwrap_or(&column.name);
        match &column.unit {
            Some(unit) => out.push_str(&format!("\"{description}\" {} / {unit}\t", column.name)),
            None => out.push_str(&format!("\"{description}\" {}\t", column.name)),
        }
    }
    out.push('\n');
    for row in &measurement.rows {
        for value in row {
            out.push_str(&format!("{value}\t"));
        }
        out.push('\n');
    }

    fs::write(path, out)
        .map_err(|e| AppError::new(2, format!("Failed to write CASSY export '{}': {e}", path.display())))
}

/// Cells with the trailing empty cell(s) removed.
fn trimmed_cells(record: &StringRecord) -> Vec<&str> {
    let mut cells: Vec<&str> = record.iter().map(str::trim).collect();
    while cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    cells
}

fn parse_header(record: &StringRecord, description: &str) -> Result<Vec<Column>, AppError> {
    let cells = trimmed_cells(record);
    if cells.is_empty() {
        return Err(AppError::new(
            2,
            format!("Can't parse headers of '{description}': line {HEADER_LINE} is empty."),
        ));
    }
    cells
        .iter()
        .map(|cell| {
            parse_header_cell(cell).ok_or_else(|| {
                AppError::new(2, format!("Can't parse header cell {cell:?} in '{description}'."))
            })
        })
        .collect()
}

/// `"Spannung" U_A1 / V` -> name `U_A1`, unit `V`, description `Spannung`.
fn parse_header_cell(cell: &str) -> Option<Column> {
    let (description, rest) = match cell.strip_prefix('"') {
        Some(after) => {
            let end = after.find('"')?;
            (Some(after[..end].to_string()), &after[end + 1..])
        }
        None => (None, cell),
    };

    let (name, unit) = match rest.split_once('/') {
        Some((name, unit)) => (name.trim(), unit.trim()),
        None => (rest.trim(), ""),
    };
    let name = name.split_whitespace().next()?;

    Some(Column {
        name: name.to_string(),
        unit: (!unit.is_empty()).then(|| unit.to_string()),
        description: description.filter(|d| !d.is_empty()),
    })
}

fn parse_number(cell: &str) -> Option<f64> {
    cell.replace(',', ".").parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = "MEASUREMENT\t\n\
        CASSY Lab 2\t\n\
        Pendel\t\n\
        \t\n\
        \"Zeit\" t / s\t\"Spannung\" U_A1 / V\t\"Index\" n\t\n\
        0\t1,5\t1\t\n\
        0,05\t1,25\t2\t\n\
        \n\
        0,1\t-0,75\t3\t\n";

    #[test]
    fn parses_headers_units_and_decimal_commas() {
        let m = parse_cassy(EXPORT, "pendulum", "pendel.txt").unwrap();
        assert_eq!(m.name, "pendulum");
        assert_eq!(m.description, "pendel.txt");

        let names: Vec<&str> = m.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["t", "U_A1", "n"]);
        assert_eq!(m.columns[0].unit.as_deref(), Some("s"));
        assert_eq!(m.columns[1].description.as_deref(), Some("Spannung"));
        assert_eq!(m.columns[2].unit, None);

        assert_eq!(
            m.rows,
            vec![
                vec![0.0, 1.5, 1.0],
                vec![0.05, 1.25, 2.0],
                vec![0.1, -0.75, 3.0]
            ]
        );
    }

    #[test]
    fn missing_header_line_is_an_error() {
        let err = parse_cassy("a\t\nb\t\n", "x", "short.txt").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("short.txt"));
    }

    #[test]
    fn non_numeric_cell_reports_line() {
        let text = EXPORT.replace("0,05\t1,25", "0,05\tabc");
        let err = parse_cassy(&text, "x", "bad.txt").unwrap_err();
        assert!(err.to_string().contains("line 7"), "{err}");
    }

    #[test]
    fn header_cell_variants() {
        let c = parse_header_cell("\"Weg\" s_B1 / cm").unwrap();
        assert_eq!((c.name.as_str(), c.unit.as_deref()), ("s_B1", Some("cm")));
        let c = parse_header_cell("plain").unwrap();
        assert_eq!((c.name.as_str(), c.unit, c.description), ("plain", None, None));
        assert!(parse_header_cell("\"unterminated").is_none());
    }

    #[test]
    fn write_then_read_directory() {
        let dir = std::env::temp_dir().join(format!("labfit_cassy_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let m = parse_cassy(EXPORT, "pendulum", "pendel.txt").unwrap();
        write_cassy(&dir.join("b.txt"), &m).unwrap();
        write_cassy(&dir.join("a.txt"), &m).unwrap();
        fs::write(dir.join("notes.md"), "ignored").unwrap();

        let all = read_cassy_dir(&dir, &["first".to_string()]).unwrap();
        fs::remove_dir_all(&dir).ok();

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "first");
        assert_eq!(all[0].description, "a.txt");
        assert_eq!(all[1].name, "undefined");
        assert_eq!(all[1].columns, m.columns);
        assert_eq!(all[1].rows, m.rows);
    }
}
