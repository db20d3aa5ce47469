//! Error types for the biomass-cycles library.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, CycleError>;

/// Errors that can occur while building or analysing a series.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CycleError {
    /// The series has no observations.
    #[error("empty series")]
    EmptySeries,

    /// Input violates a precondition (unsorted or duplicated dates).
    #[error("contract violation: {0}")]
    ContractViolation(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Scene file name does not carry a parsable acquisition date.
    #[error("invalid scene name: {0}")]
    InvalidSceneName(String),

    /// Writing a table failed.
    #[error("export failed: {0}")]
    Export(String),
}

impl From<csv::Error> for CycleError {
    fn from(err: csv::Error) -> Self {
        CycleError::Export(err.to_string())
    }
}

impl From<std::io::Error> for CycleError {
    fn from(err: std::io::Error) -> Self {
        CycleError::Export(err.to_string())
    }
}

impl<E> From<plotters::drawing::DrawingAreaErrorKind<E>> for CycleError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        CycleError::Export(err.to_string())
    }
}
