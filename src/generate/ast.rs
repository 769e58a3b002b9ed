use super::{GenerateError, Generator, GeneratorConfig, OutputFile};
use crate::model::Ast;

/// The JSON AST of the whole model as `model.json`.
#[derive(Debug, Default)]
pub struct AstGenerator;

impl Generator for AstGenerator {
    fn name(&self) -> &'static str {
        "ast"
    }

    fn render(&self, ast: &Ast, _config: &GeneratorConfig) -> Result<Vec<OutputFile>, GenerateError> {
        let mut content = ast.to_json_pretty()?;
        content.push('\n');
        Ok(vec![OutputFile::new("model.json", content)])
    }
}
