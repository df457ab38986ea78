//! Error type shared by the simulation, the brain persistence layer and the trainer.

use thiserror::Error;

/// Errors raised by the library.
///
/// Collisions, ground hits and gate passes are ordinary state transitions and
/// never show up here.
#[derive(Debug, Error)]
pub enum Error {
    /// A brain whose input width differs from the feature vector was attached to a bird.
    #[error("brain expects {actual} inputs but the feature extractor produces {expected}")]
    InvalidInputSize {
        /// Width of the feature vector.
        expected: usize,
        /// Input width declared by the brain.
        actual: usize,
    },
    /// A persisted brain could not be restored.
    #[error("failed to load model: {0}")]
    ModelLoad(String),
    /// Parameters are inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Underlying filesystem failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// JSON encoding or decoding failure.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
