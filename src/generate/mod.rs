//! Output generators
//!
//! A [`Generator`] renders an assembled [`Ast`] into one or more
//! [`OutputFile`]s; a [`Sink`] then writes them to a directory or a stream.
//!
//! | name   | output                                  |
//! |--------|-----------------------------------------|
//! | `idl`  | one `.smithy` document per namespace    |
//! | `ast`  | `model.json`, the JSON AST              |
//! | `sadl` | a single simplified `.sadl` document    |

mod ast;
mod error;
mod idl;
mod sadl;
mod sink;

pub use ast::AstGenerator;
pub use error::GenerateError;
pub use idl::IdlGenerator;
pub use sadl::SadlGenerator;
pub use sink::{Sink, file_name};

use std::path::PathBuf;

use indexmap::IndexMap;

use crate::model::Ast;

/// Names accepted by [`generator_for`].
pub const GENERATORS: &[&str] = &["idl", "ast", "sadl"];

/// Options shared by all generators, plus free-form `key=value` params.
#[derive(Debug, Clone, Default)]
pub struct GeneratorConfig {
    /// Write files here instead of to the output stream.
    pub out_dir: Option<PathBuf>,
    /// Replace existing files in `out_dir`.
    pub force: bool,
    pub params: IndexMap<String, String>,
}

impl GeneratorConfig {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// A boolean param: `true`, `yes`, `1` or a bare key count as set.
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.param(key), Some("" | "true" | "yes" | "1"))
    }
}

/// A rendered document and the file name it is meant for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub name: String,
    pub content: String,
    /// Precede the content with a file marker when streaming.
    pub separated: bool,
}

impl OutputFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            separated: false,
        }
    }

    pub fn separated(mut self) -> Self {
        self.separated = true;
        self
    }
}

pub trait Generator {
    fn name(&self) -> &'static str;

    /// Render the model without touching the filesystem.
    fn render(&self, ast: &Ast, config: &GeneratorConfig) -> Result<Vec<OutputFile>, GenerateError>;

    /// Render and write to `config.out_dir`, or to stdout when it is unset.
    fn generate(&self, ast: &Ast, config: &GeneratorConfig) -> Result<(), GenerateError> {
        let files = self.render(ast, config)?;
        Sink::new(config, std::io::stdout().lock()).emit_all(&files)
    }
}

/// Look up a generator by name.
pub fn generator_for(name: &str) -> Result<Box<dyn Generator>, GenerateError> {
    match name {
        "idl" => Ok(Box::new(IdlGenerator)),
        "ast" => Ok(Box::new(AstGenerator)),
        "sadl" => Ok(Box::new(SadlGenerator)),
        _ => Err(GenerateError::UnresolvedGenerator(name.to_string())),
    }
}
