//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - observations and measurements (`Point`, `Column`, `Measurement`)
//! - fit configuration (`FitOptions`, `ModelKind`)
//! - fit outputs (`FitResult`, `FitParams` and the per-model parameter sets)

pub mod types;

pub use types::*;
