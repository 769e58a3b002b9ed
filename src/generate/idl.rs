use tracing::debug;

use super::sink::file_name;
use super::{GenerateError, Generator, GeneratorConfig, OutputFile};
use crate::base::constants::IDL_EXTENSION;
use crate::model::Ast;
use crate::unparse::{IdlOptions, MetadataPolicy, unparse_with};

/// One IDL document per namespace.
///
/// Parameters: `metadata=primary|all|none` picks which documents carry the
/// model metadata.
#[derive(Debug, Default)]
pub struct IdlGenerator;

impl IdlGenerator {
    fn options(config: &GeneratorConfig) -> Result<IdlOptions, GenerateError> {
        let metadata = match config.param("metadata") {
            None => MetadataPolicy::default(),
            Some(value) => MetadataPolicy::parse(value).ok_or_else(|| GenerateError::InvalidParam {
                key: "metadata".to_string(),
                value: value.to_string(),
            })?,
        };
        Ok(IdlOptions { metadata })
    }
}

impl Generator for IdlGenerator {
    fn name(&self) -> &'static str {
        "idl"
    }

    fn render(&self, ast: &Ast, config: &GeneratorConfig) -> Result<Vec<OutputFile>, GenerateError> {
        let options = Self::options(config)?;
        let files = ast
            .namespaces()
            .into_iter()
            .map(|ns| {
                debug!(namespace = %ns, "rendering IDL");
                let name = file_name(&ns, &format!(".{IDL_EXTENSION}"));
                OutputFile::new(name, unparse_with(ast, &ns, &options)).separated()
            })
            .collect();
        Ok(files)
    }
}
