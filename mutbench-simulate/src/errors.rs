use thiserror::Error;

/// Error type for mutation generation and VAF simulation.
#[derive(Error, Debug)]
pub enum SimulationError {
    /// Caller supplied arguments the operation cannot honor.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The external depth tool could not be run or failed without output.
    #[error("External tool error: {0}")]
    ExternalTool(String),

    #[error("Can't read file: {0}")]
    FileReadError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for simulation operations.
pub type Result<T> = std::result::Result<T, SimulationError>;
