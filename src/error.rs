//! Error types.
//!
//! - `FitError`: failures of the fitting engine and its helpers (library level)
//! - `AppError`: a message plus a process exit code (application boundary)
//!
//! Exit codes used by the binary:
//! - `2`: invalid input or configuration (bad flags, unreadable files)
//! - `3`: not enough usable data
//! - `4`: the fit itself failed (solver, convergence)

use crate::domain::SineParams;

/// Errors raised by the fitters and sampling utilities.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FitError {
    /// An option or input value is outside its valid domain.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Fewer points (or extrema) than the fitter needs.
    #[error("Insufficient data: need at least {required} {what}, got {found}")]
    InsufficientData {
        what: &'static str,
        required: usize,
        found: usize,
    },

    /// Parallel sequences of different lengths were combined.
    #[error("Length mismatch: {left} values vs {right} values")]
    LengthMismatch { left: usize, right: usize },

    /// Phase refinement of a sine fit ran out of attempts.
    ///
    /// `last` holds the parameters of the final attempt for diagnostics.
    #[error(
        "Sine fit did not converge after {iterations} phase steps (last: magnitude={:.4}, pulsation={:.4}, phase={:.4}, carrier={:?})",
        .last.magnitude,
        .last.pulsation,
        .last.phase,
        .last.carrier.params.coefs
    )]
    FitDidNotConverge {
        iterations: usize,
        last: Box<SineParams>,
    },

    /// Least squares produced no finite solution.
    #[error("Least squares system could not be solved [n: {n}, k: {k}]")]
    SingularSystem { n: usize, k: usize },
}

impl FitError {
    pub fn invalid(message: impl Into<String>) -> Self {
        FitError::InvalidParameter(message.into())
    }

    pub fn insufficient(what: &'static str, required: usize, found: usize) -> Self {
        FitError::InsufficientData {
            what,
            required,
            found,
        }
    }

    /// Exit code used when this error reaches the binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            FitError::InvalidParameter(_) | FitError::LengthMismatch { .. } => 2,
            FitError::InsufficientData { .. } => 3,
            FitError::FitDidNotConverge { .. } | FitError::SingularSystem { .. } => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
