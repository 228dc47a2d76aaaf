//! Input/output helpers.
//!
//! - CASSY text-export ingest (`cassy`)
//! - delimited exports of measurements and fitted curves (`export`)
//! - fit JSON read/write (`fit_json`)

pub mod cassy;
pub mod export;
pub mod fit_json;

pub use cassy::*;
pub use export::*;
pub use fit_json::*;
