//! Mathematical utilities: sampling grids, sample statistics and least squares.

pub mod ols;
pub mod sampling;
pub mod stats;

pub use ols::*;
pub use sampling::*;
pub use stats::*;
