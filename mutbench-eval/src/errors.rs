use thiserror::Error;

/// Error type for call-table loading and evaluation.
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required column {column} missing from {source_name}")]
    MissingColumn { column: String, source_name: String },

    #[error("Replicate id {0:?} is not of the form <sample>_<percent>")]
    InvalidReplicateId(String),

    #[error("No entry for sample {0:?}")]
    UnknownSample(String),

    #[error("Can't read file: {0}")]
    FileReadError(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for evaluation operations.
pub type Result<T> = std::result::Result<T, EvalError>;
