//! Error types for the multi-advice crate

use thiserror::Error;

/// Main error type for the multi-advice crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("advisor {advisor} record is malformed: {reason}")]
    MalformedAdvisorRecord { advisor: usize, reason: String },

    #[error("advisor {advisor} advises on unrecognized feature '{kind}'")]
    UnrecognizedAdviceKind { advisor: usize, kind: String },

    #[error(
        "network estimator was built for a {}x{} grid but received a {}x{} grid",
        expected.0, expected.1, got.0, got.1
    )]
    EstimatorInputShapeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },

    #[error("failed to read records for advisor {advisor}: {source}")]
    AdvisorSource {
        advisor: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
