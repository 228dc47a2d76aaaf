//! Curve fitting.
//!
//! Responsibilities:
//!
//! - polynomial least squares (`polynomial`)
//! - Gaussian moment estimation (`gaussian`)
//! - sinusoid + polynomial carrier heuristic (`sine`)
//! - model dispatch and parallel batches (`batch`)

pub mod batch;
pub mod gaussian;
pub mod polynomial;
pub mod sine;

pub use batch::*;
pub use gaussian::*;
pub use polynomial::*;
pub use sine::*;
