//! Model assembly
//!
//! Loads any number of IDL and JSON AST files and folds them into one
//! [`Ast`]:
//!
//! ```text
//! paths → collect_file_paths (walkdir, sorted)
//!       → load_file per path (rayon, in parallel)
//!       → merge in input order
//!       → resolve deferred `apply` statements
//!       → filter by tags (optional)
//! ```
//!
//! Files are independent until the merge, so parsing runs in parallel; the
//! merge itself is a sequential fold in the caller's order, which keeps the
//! shape order of the result reproducible.

mod error;
mod filter;
mod loader;
mod merge;

pub use error::AssemblyError;
pub use loader::{collect_file_paths, load_file};
pub use merge::major_version;

use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::model::Ast;
use crate::parser::{DeferredApply, ParsedFile, ParserOptions};

/// Loads and merges model files
#[derive(Debug, Clone, Default)]
pub struct Assembler {
    options: ParserOptions,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParserOptions) -> Self {
        Self { options }
    }

    /// Assemble every model file under `paths`. When `tags` is non-empty the
    /// result is filtered to the tagged shapes and their dependencies.
    pub fn assemble<S: AsRef<str>>(&self, paths: &[PathBuf], tags: &[S]) -> Result<Ast, AssemblyError> {
        let files = collect_file_paths(paths)?;
        info!(files = files.len(), "assembling model");

        let loaded: Vec<Result<ParsedFile, AssemblyError>> = files
            .par_iter()
            .map(|path| loader::load_file(path, &self.options))
            .collect();
        let parsed = loaded.into_iter().collect::<Result<Vec<_>, _>>()?;

        let mut ast = self.merge_all(parsed)?;
        if !tags.is_empty() {
            ast.filter(tags);
        }
        Ok(ast)
    }

    /// Merge already-loaded files in order, then resolve their deferred
    /// applies against the merged model.
    pub fn merge_all(&self, files: Vec<ParsedFile>) -> Result<Ast, AssemblyError> {
        let mut ast = Ast::default();
        let mut applies: Vec<DeferredApply> = Vec::new();
        for file in files {
            debug!(path = %file.path, shapes = file.ast.shapes.len(), "merging");
            ast.merge(file.ast)?;
            applies.extend(file.applies);
        }
        for apply in applies {
            if !ast.apply_traits(&apply.target, &apply.traits) {
                warn!(path = %apply.path, target = %apply.target, "apply target not found; traits dropped");
            }
        }
        Ok(ast)
    }
}

/// Assemble with default parser options.
pub fn assemble<S: AsRef<str>>(paths: &[PathBuf], tags: &[S]) -> Result<Ast, AssemblyError> {
    Assembler::new().assemble(paths, tags)
}

#[cfg(test)]
mod tests;
