use std::path::PathBuf;
use thiserror::Error;

use crate::scene::ObjectId;

/// Result type for modeling, scene and export operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors raised by objects, strategies, the scene and the exporter
#[derive(Debug, Error)]
pub enum ModelError {
    /// Invalid configuration (scene mode, viewer settings)
    #[error("configuration error: {0}")]
    Config(String),

    /// A model or mesh was requested before it was built
    #[error("{0} has not been built yet")]
    Unbuilt(&'static str),

    /// Operation not provided by the generic base object
    #[error("{0} is not implemented for this object")]
    NotImplemented(&'static str),

    /// An operation received an empty sequence
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    /// Removal of an object that is not in the scene
    #[error("object {0} is not part of the scene")]
    ObjectNotFound(ObjectId),

    /// The solid kernel rejected its parameters
    #[error("kernel error: {0}")]
    Kernel(String),

    /// The mesh engine rejected its input
    #[error("mesh error: {0}")]
    Mesh(String),

    /// File system failure
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A mesh file could not be decoded
    #[error("invalid mesh file {path}: {message}")]
    Format { path: PathBuf, message: String },
}

impl ModelError {
    pub fn kernel(message: impl Into<String>) -> Self {
        Self::Kernel(message.into())
    }

    pub fn mesh(message: impl Into<String>) -> Self {
        Self::Mesh(message.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn format(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Format {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<truck_modeling::errors::Error> for ModelError {
    fn from(err: truck_modeling::errors::Error) -> Self {
        Self::Kernel(err.to_string())
    }
}
