//! Error types shared by the whole crate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, NetworkError>;

/// Failures while reading or writing a persisted model or config.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("binary model encoding failed: {0}")]
    Binary(#[from] bincode::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The record's format tag is not one this build understands.
    #[error("unknown model format tag '{0}'")]
    UnknownFormat(String),
}

#[derive(Debug, Error)]
pub enum NetworkError {
    /// A vector or matrix does not have the dimension its position requires.
    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    #[error("invalid hyperparameter `{name}`: {reason}")]
    InvalidHyperparameter { name: &'static str, reason: String },

    #[error("{0} set is empty")]
    EmptyDataset(&'static str),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl NetworkError {
    pub(crate) fn shape(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        NetworkError::ShapeMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }

    pub(crate) fn hyper(name: &'static str, reason: impl Into<String>) -> Self {
        NetworkError::InvalidHyperparameter {
            name,
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for NetworkError {
    fn from(e: std::io::Error) -> Self {
        NetworkError::Storage(StorageError::Io(e))
    }
}

impl From<bincode::Error> for NetworkError {
    fn from(e: bincode::Error) -> Self {
        NetworkError::Storage(StorageError::Binary(e))
    }
}

impl From<serde_json::Error> for NetworkError {
    fn from(e: serde_json::Error) -> Self {
        NetworkError::Storage(StorageError::Json(e))
    }
}
