//! Error types for generators.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while rendering or writing generator output.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// No generator is registered under the requested name.
    #[error("Unresolved generator: {0}")]
    UnresolvedGenerator(String),

    /// A `-a key=value` parameter has a value the generator cannot use.
    #[error("invalid value for generator parameter {key}: {value}")]
    InvalidParam { key: String, value: String },

    /// The output file exists and overwriting was not forced.
    #[error("[{} already exists, not overwriting]", .0.display())]
    AlreadyExists(PathBuf),

    /// Writing an output file failed.
    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing to the output stream failed.
    #[error("cannot write output: {0}")]
    Stream(#[source] std::io::Error),

    #[error("cannot encode model: {0}")]
    Json(#[from] serde_json::Error),

    /// A shape referenced by the model is not defined in it.
    #[error("Undefined shape: {0}")]
    UndefinedShape(String),

    /// The model uses something the target notation cannot express.
    #[error("{0}")]
    Unsupported(String),
}

impl GenerateError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
