use thiserror::Error;

#[derive(Error, Debug)]
pub enum EquivalencyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// No registered step claimed the node. Every reachable value must be
    /// handled by some step, so this is a pipeline configuration fault.
    #[error("No equivalency step can handle {path} (expected type {expected_type})")]
    NoApplicableStep { path: String, expected_type: String },

    #[error("{0}")]
    NotEquivalent(String),
}

pub type Result<T> = std::result::Result<T, EquivalencyError>;
