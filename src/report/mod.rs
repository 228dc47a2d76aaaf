//! Reporting: legend labels and terminal summaries.

pub mod format;

pub use format::*;
