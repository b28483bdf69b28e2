//! Error types.
//!
//! - `PipelineError` is the taxonomy raised by the classification and
//!   prediction stages. Every variant is terminal for the run.
//! - `AppError` is what the binary reports: a message plus a process exit code.
//!
//! Exit codes:
//! - `2`: bad input (unreadable files, bad calibration table, missing columns)
//! - `3`: not enough data for the requested work
//! - `4`: internal pipeline failure

use thiserror::Error;

/// Terminal failures of the core pipeline stages.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// The mass-radius reference table cannot define an interpolant.
    #[error("Calibration table error: {reason}")]
    Calibration { reason: String },

    /// The data cannot support the configured fold count (or the count itself is invalid).
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    /// A feature column required by the disposition predictor is absent from the catalog.
    #[error("Missing feature column `{column}` in catalog '{catalog}' (required for disposition prediction)")]
    MissingFeature { column: String, catalog: String },

    /// Predictions could not be mapped one-to-one onto the record set.
    #[error("Prediction assembly error: {reason}")]
    Assembly { reason: String },
}

impl PipelineError {
    pub fn calibration(reason: impl Into<String>) -> Self {
        Self::Calibration { reason: reason.into() }
    }

    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration { reason: reason.into() }
    }

    pub fn assembly(reason: impl Into<String>) -> Self {
        Self::Assembly { reason: reason.into() }
    }

    /// Process exit code used when this error reaches the binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::Calibration { .. } | PipelineError::MissingFeature { .. } => 2,
            PipelineError::Configuration { .. } => 3,
            PipelineError::Assembly { .. } => 4,
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

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
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
