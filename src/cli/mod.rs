//! Command-line parsing for the lab measurement fitter.
//!
//! The goal of this module is to keep **argument parsing** separate from
//! ingest and fitting code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{FitOptions, ModelKind};
use crate::io::DEFAULT_SEPARATOR;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "labfit", version, about = "Curve fitting for CASSY lab measurements")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit one model to two columns of a CASSY export.
    Fit(FitArgs),
    /// Fit every `.txt` export in a directory in parallel.
    Batch(BatchArgs),
    /// Convert a CASSY export to a delimited CSV file.
    Convert(ConvertArgs),
    /// Write a synthetic measurement as a CASSY-style text file.
    Synth(SynthArgs),
}

/// Fitting knobs shared by `fit` and `batch`.
///
/// Values come from flags, then `LABFIT_*` environment variables (a `.env`
/// file is loaded at startup), then the library defaults.
#[derive(Debug, Args, Clone)]
pub struct FitSettings {
    /// Which model to fit.
    #[arg(short = 'm', long, value_enum)]
    pub model: ModelKind,

    /// Polynomial degree (carrier degree for sine fits).
    #[arg(short = 'd', long, env = "LABFIT_DEGREE", default_value_t = 1)]
    pub degree: usize,

    /// Step of the resampled curve; also the sine phase step.
    #[arg(short = 'r', long, env = "LABFIT_RESOLUTION", default_value_t = 0.01)]
    pub resolution: f64,

    /// Column used as x (name or zero-based index).
    #[arg(long, default_value = "0")]
    pub x: String,

    /// Column used as y (name or zero-based index).
    #[arg(long, default_value = "1")]
    pub y: String,
}

impl FitSettings {
    pub fn options(&self) -> FitOptions {
        FitOptions::new(self.resolution, self.degree)
    }
}

#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    /// CASSY text export.
    #[arg(short = 'i', long, value_name = "FILE")]
    pub input: PathBuf,

    /// Measurement name (defaults to the file stem).
    #[arg(long)]
    pub name: Option<String>,

    #[command(flatten)]
    pub settings: FitSettings,

    /// Export the fitted curve to CSV.
    #[arg(long, value_name = "CSV")]
    pub export_points: Option<PathBuf>,

    /// Export params + fitted curve to JSON.
    #[arg(long, value_name = "JSON")]
    pub export_json: Option<PathBuf>,

    /// Write a markdown debug bundle under `debug/`.
    #[arg(long)]
    pub debug: bool,
}

#[derive(Debug, Args, Clone)]
pub struct BatchArgs {
    /// Directory containing CASSY `.txt` exports.
    #[arg(long, value_name = "DIR")]
    pub dir: PathBuf,

    /// Measurement names, assigned in file order.
    #[arg(long = "names", value_delimiter = ',')]
    pub names: Vec<String>,

    #[command(flatten)]
    pub settings: FitSettings,
}

#[derive(Debug, Args, Clone)]
pub struct ConvertArgs {
    /// CASSY text export.
    #[arg(short = 'i', long, value_name = "FILE")]
    pub input: PathBuf,

    /// Destination CSV.
    #[arg(short = 'o', long, value_name = "CSV")]
    pub output: PathBuf,

    /// Field separator.
    #[arg(long, default_value_t = DEFAULT_SEPARATOR)]
    pub separator: char,
}

#[derive(Debug, Args, Clone)]
pub struct SynthArgs {
    /// Shape of the generated signal.
    #[arg(short = 'm', long, value_enum)]
    pub model: ModelKind,

    /// Number of samples.
    #[arg(short = 'n', long, default_value_t = 40)]
    pub count: usize,

    /// Spacing between samples (ignored for gaussian draws).
    #[arg(long, default_value_t = 1.0)]
    pub dx: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Standard deviation of the additive noise.
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Destination text file.
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_defaults() {
        let cli = Cli::try_parse_from(["labfit", "fit", "--input", "a.txt", "--model", "sine"]).unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.settings.model, ModelKind::Sine);
        assert_eq!(args.settings.x, "0");
        assert_eq!(args.settings.y, "1");
        assert!(!args.debug);
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "labfit", "fit", "-i", "a.txt", "-m", "polynomial", "--degree", "3", "--resolution", "0.5", "--x", "t",
        ])
        .unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.settings.options(), FitOptions::new(0.5, 3));
        assert_eq!(args.settings.x, "t");
    }

    #[test]
    fn batch_names_are_comma_separated() {
        let cli = Cli::try_parse_from(["labfit", "batch", "--dir", "runs", "-m", "gaussian", "--names", "a,b"]).unwrap();
        let Command::Batch(args) = cli.command else {
            panic!("expected batch");
        };
        assert_eq!(args.names, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn unknown_model_is_rejected() {
        assert!(Cli::try_parse_from(["labfit", "fit", "-i", "a.txt", "-m", "spline"]).is_err());
    }
}
