//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - runs the fit pipeline
//! - prints reports
//! - writes optional exports

use std::path::Path;

use clap::Parser;

use crate::cli::{BatchArgs, Command, ConvertArgs, FitArgs, SynthArgs};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `labfit` binary.
pub fn run() -> Result<(), AppError> {
    // Must run before parsing so clap sees `LABFIT_*` values from `.env`.
    dotenvy::dotenv().ok();
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Batch(args) => handle_batch(args),
        Command::Convert(args) => handle_convert(args),
        Command::Synth(args) => handle_synth(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let opts = args.settings.options();
    let run = pipeline::run_fit(&args.input, args.name.as_deref(), &args.settings)?;

    println!(
        "{}",
        crate::report::format_fit_summary(&run.measurement.name, args.settings.model, &opts, Ok(&run.fit))
    );

    if args.debug {
        let path = crate::debug::write_debug_bundle(
            Path::new("debug"),
            &run.measurement.name,
            args.settings.model,
            &run.points,
            &opts,
        )?;
        eprintln!("Debug bundle written to {}", path.display());
    }

    if let Some(path) = &args.export_points {
        crate::io::export::write_fit_points_csv(path, &run.fit.points, crate::io::DEFAULT_SEPARATOR)?;
    }
    if let Some(path) = &args.export_json {
        let label = crate::report::format_params(&run.fit.params);
        let file = crate::io::fit_json::FitFile::new(&run.measurement.name, opts, &run.fit, label);
        crate::io::fit_json::write_fit_json(path, &file)?;
    }

    Ok(())
}

fn handle_batch(args: BatchArgs) -> Result<(), AppError> {
    let batch = pipeline::run_batch(&args.dir, &args.names, &args.settings)?;

    for (name, result) in &batch.results {
        println!("{}", crate::report::format_batch_line(name, result));
    }

    let failed = batch.results.iter().filter(|(_, r)| r.is_err()).count();
    println!("\n{} fitted, {failed} failed", batch.results.len() - failed);
    Ok(())
}

fn handle_convert(args: ConvertArgs) -> Result<(), AppError> {
    let name = file_stem(&args.input);
    let measurement = crate::io::cassy::read_cassy(&args.input, &name)?;
    crate::io::export::write_measurement_csv(&args.output, &measurement, args.separator)?;
    eprintln!(
        "Converted {} rows x {} columns to {}",
        measurement.rows.len(),
        measurement.columns.len(),
        args.output.display()
    );
    Ok(())
}

fn handle_synth(args: SynthArgs) -> Result<(), AppError> {
    let measurement = pipeline::synthesize(&args)?;
    crate::io::cassy::write_cassy(&args.output, &measurement)?;
    eprintln!("Wrote {} samples to {}", measurement.rows.len(), args.output.display());
    Ok(())
}

pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "undefined".to_string())
}
