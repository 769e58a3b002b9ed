//! Input discovery and per-file loading.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::debug;
use walkdir::WalkDir;

use super::error::AssemblyError;
use crate::base::constants::{IDL_EXTENSION, JSON_EXTENSION};
use crate::model::Ast;
use crate::parser::{ParsedFile, ParserOptions, parse};

/// Expand `paths` into the list of model files to load.
///
/// Files are kept as given (in order) and must carry a recognized
/// extension. Directories are walked recursively, keeping only recognized
/// files, sorted by path so the load order does not depend on the
/// filesystem.
pub fn collect_file_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>, AssemblyError> {
    let mut files = Vec::new();
    for path in paths {
        let meta = std::fs::metadata(path).map_err(|e| AssemblyError::io(path, e))?;
        if !meta.is_dir() {
            if !is_model_file(path) {
                return Err(AssemblyError::UnsupportedFileType(path.clone()));
            }
            files.push(path.clone());
            continue;
        }
        let mut found = Vec::new();
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() && is_model_file(entry.path()) {
                found.push(entry.into_path());
            }
        }
        found.sort();
        debug!(dir = %path.display(), count = found.len(), "collected model files");
        files.extend(found);
    }
    Ok(files)
}

fn is_model_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some(ext) if ext == IDL_EXTENSION || ext == JSON_EXTENSION
    )
}

/// Load one model file, dispatching on its extension.
pub fn load_file(path: &Path, options: &ParserOptions) -> Result<ParsedFile, AssemblyError> {
    let text = std::fs::read_to_string(path).map_err(|e| AssemblyError::io(path, e))?;
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext == IDL_EXTENSION => {
            let parsed = parse(&path.display().to_string(), &text, options)?;
            Ok(parsed)
        }
        Some(ext) if ext == JSON_EXTENSION => {
            let ast = Ast::from_json(&text).map_err(|e| AssemblyError::json(path, e))?;
            Ok(ParsedFile {
                path: path.display().to_string(),
                ast,
                namespace: None,
                uses: IndexMap::new(),
                applies: Vec::new(),
                warnings: Vec::new(),
            })
        }
        _ => Err(AssemblyError::UnsupportedFileType(path.to_path_buf())),
    }
}
