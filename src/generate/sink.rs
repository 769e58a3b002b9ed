//! Where generated files go.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use tracing::debug;

use super::error::GenerateError;
use super::{GeneratorConfig, OutputFile};

/// File name for a namespace document: dots become dashes.
pub fn file_name(namespace: &str, extension: &str) -> String {
    format!("{}{extension}", namespace.replace('.', "-"))
}

/// Receives rendered files.
///
/// Without an output directory every file goes to `stream`, preceded by a
/// `// ===== File("name")` marker when the generator asks for one. With a
/// directory each file is written there, and an existing file is only
/// replaced when `force` is set.
pub struct Sink<W: Write> {
    out_dir: Option<PathBuf>,
    force: bool,
    stream: W,
}

impl<W: Write> Sink<W> {
    pub fn new(config: &GeneratorConfig, stream: W) -> Self {
        Self {
            out_dir: config.out_dir.clone(),
            force: config.force,
            stream,
        }
    }

    pub fn emit(&mut self, file: &OutputFile) -> Result<(), GenerateError> {
        let Some(dir) = &self.out_dir else {
            if file.separated {
                write!(self.stream, "\n// ===== File({:?})\n\n", file.name).map_err(GenerateError::Stream)?;
            }
            return self
                .stream
                .write_all(file.content.as_bytes())
                .map_err(GenerateError::Stream);
        };
        fs::create_dir_all(dir).map_err(|e| GenerateError::io(dir, e))?;
        let path = dir.join(&file.name);
        if !self.force && path.exists() {
            return Err(GenerateError::AlreadyExists(path));
        }
        debug!(path = %path.display(), bytes = file.content.len(), "writing");
        fs::write(&path, &file.content).map_err(|e| GenerateError::io(&path, e))
    }

    pub fn emit_all(&mut self, files: &[OutputFile]) -> Result<(), GenerateError> {
        for file in files {
            self.emit(file)?;
        }
        self.stream.flush().map_err(GenerateError::Stream)
    }

    pub fn into_inner(self) -> W {
        self.stream
    }
}
