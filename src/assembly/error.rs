//! Error types for assembly.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::parser::SyntaxError;

/// Errors that abort an assembly. There is no partial result.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// A file or directory could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed.
    #[error("cannot walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// An IDL file did not parse.
    #[error("{0}")]
    Parse(#[from] SyntaxError),

    /// A JSON AST file did not decode.
    #[error("cannot parse Smithy AST file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The same shape id is defined by two inputs.
    #[error("Duplicate shape in assembly: {0}")]
    DuplicateShape(String),

    /// The same metadata key carries different values.
    #[error("Conflict when merging metadata in models: {0}")]
    MetadataConflict(String),

    /// A model declares a version other than 1.x or 2.x.
    #[error("Unsupported Smithy version: {0}")]
    UnsupportedVersion(String),

    /// An input path names a file that is neither IDL nor JSON.
    #[error("Unrecognized file type: {}", .0.display())]
    UnsupportedFileType(PathBuf),
}

impl AssemblyError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn json(path: impl AsRef<Path>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
