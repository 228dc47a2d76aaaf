//! `labfit` library crate.
//!
//! The binary (`labfit`) is a thin wrapper around this library so that:
//!
//! - fitters are testable without spawning processes
//! - the sampling and fitting modules are reusable from other tools

pub mod app;
pub mod cli;
pub mod data;
pub mod debug;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
