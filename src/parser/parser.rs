//! Recursive descent parser for the Smithy IDL
//!
//! Reads significant tokens from a [`TokenStream`] and builds an [`Ast`]
//! directly; there is no intermediate syntax tree. Traits and `///` doc
//! comments accumulate as pending state until a shape statement consumes
//! them.
//!
//! The first error stops the parse. Warnings (deprecated syntax, unknown
//! control statements) are collected and returned alongside the AST.

use indexmap::IndexMap;
use text_size::TextRange;
use tracing::{debug, warn};

use super::errors::{ErrorCode, SyntaxError};
use super::lexer::{Token, TokenKind, TokenStream};
use super::traits::{TraitRegistry, TraitVisitor};
use crate::base::LineIndex;
use crate::base::shape_id::{absolute, is_prelude_type, prelude_id, split_member};
use crate::model::{Ast, Shape, Traits};

pub type PResult<T> = Result<T, SyntaxError>;

/// Parser configuration
#[derive(Debug, Clone, Default)]
pub struct ParserOptions {
    /// Append `source: <path>` to the documentation of every shape
    pub annotate_sources: bool,
    /// Trait visitors by bare trait name
    pub traits: TraitRegistry,
}

impl ParserOptions {
    /// Register `visitor` for the bare trait name `name`, replacing any
    /// built-in visitor for it.
    pub fn with_visitor(mut self, name: impl Into<String>, visitor: TraitVisitor) -> Self {
        self.traits.register(name, visitor);
        self
    }
}

/// An `apply` whose target was not defined in the same file
#[derive(Debug, Clone, PartialEq)]
pub struct DeferredApply {
    pub target: String,
    pub traits: Traits,
    pub path: String,
}

/// Everything a single file contributes
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub path: String,
    pub ast: Ast,
    pub namespace: Option<String>,
    /// Short name → absolute id, from `use` statements
    pub uses: IndexMap<String, String>,
    pub applies: Vec<DeferredApply>,
    pub warnings: Vec<SyntaxError>,
}

/// Parse one IDL file.
pub fn parse(path: &str, source: &str, options: &ParserOptions) -> Result<ParsedFile, SyntaxError> {
    let index = LineIndex::new(source);
    debug!(path, "parsing IDL");
    let mut parsed = IdlParser::new(path, source, options)
        .run()
        .map_err(|e| e.locate(path, source, &index))?;
    parsed.warnings = parsed
        .warnings
        .into_iter()
        .map(|w| w.locate(path, source, &index))
        .collect();
    Ok(parsed)
}

/// Parse IDL text with default options.
pub fn parse_str(source: &str) -> Result<Ast, SyntaxError> {
    parse_str_with(source, &ParserOptions::default())
}

/// Parse IDL text into a standalone AST. Applies to shapes outside the text
/// are dropped with a warning.
pub fn parse_str_with(source: &str, options: &ParserOptions) -> Result<Ast, SyntaxError> {
    let parsed = parse("<input>", source, options)?;
    for apply in &parsed.applies {
        warn!(target = %apply.target, "apply target not found; traits dropped");
    }
    Ok(parsed.ast)
}

/// Traits and docs seen but not yet attached to a shape
#[derive(Debug, Default)]
struct Pending {
    traits: Traits,
    docs: Vec<String>,
    first: Option<TextRange>,
}

/// The parser state
pub struct IdlParser<'a> {
    pub(crate) path: String,
    pub(crate) tokens: TokenStream<'a>,
    pub(crate) options: &'a ParserOptions,
    pub(crate) ast: Ast,
    pub(crate) namespace: Option<String>,
    pub(crate) version: u8,
    uses: IndexMap<String, String>,
    applies: Vec<DeferredApply>,
    warnings: Vec<SyntaxError>,
    pending: Pending,
}

impl<'a> IdlParser<'a> {
    pub fn new(path: &str, source: &'a str, options: &'a ParserOptions) -> Self {
        Self {
            path: path.to_string(),
            tokens: TokenStream::new(source),
            options,
            ast: Ast::default(),
            namespace: None,
            version: 1,
            uses: IndexMap::new(),
            applies: Vec::new(),
            warnings: Vec::new(),
            pending: Pending::default(),
        }
    }

    pub fn run(mut self) -> PResult<ParsedFile> {
        self.parse_model()?;
        Ok(ParsedFile {
            path: self.path,
            ast: self.ast,
            namespace: self.namespace,
            uses: self.uses,
            applies: self.applies,
            warnings: self.warnings,
        })
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_model(&mut self) -> PResult<()> {
        while let Some(tok) = self.tokens.next_with_docs() {
            match tok.kind {
                TokenKind::LineComment => self.pending.docs.push(tok.doc_text().to_string()),
                TokenKind::At => {
                    self.pending.first.get_or_insert(tok.range);
                    let mut traits = std::mem::take(&mut self.pending.traits);
                    self.parse_trait(&mut traits)?;
                    self.pending.traits = traits;
                }
                TokenKind::Dollar => {
                    self.ensure_no_pending_traits("control statement")?;
                    self.parse_control()?;
                }
                TokenKind::Symbol => self.parse_statement(tok)?,
                _ => return Err(self.unexpected(&tok, "a statement")),
            }
        }
        if let Some(range) = self.pending.first {
            if !self.pending.traits.is_empty() {
                return Err(SyntaxError::new(
                    "traits at end of file are not attached to any shape",
                    range,
                    ErrorCode::E0305,
                ));
            }
        }
        Ok(())
    }

    fn parse_statement(&mut self, tok: Token<'a>) -> PResult<()> {
        match tok.text {
            "namespace" => {
                self.ensure_no_pending_traits("namespace")?;
                self.parse_namespace(tok)
            }
            "metadata" => {
                self.ensure_no_pending_traits("metadata")?;
                self.parse_metadata()
            }
            "use" => {
                self.ensure_no_pending_traits("use")?;
                self.parse_use()
            }
            "apply" => {
                self.ensure_no_pending_traits("apply")?;
                self.parse_apply()
            }
            keyword => self.parse_shape_statement(keyword, tok),
        }
    }

    fn parse_control(&mut self) -> PResult<()> {
        let key = self.expect(TokenKind::Symbol, "control statement name")?;
        self.expect(TokenKind::Colon, "':'")?;
        let value_tok = self.next_token("a value")?;
        let value = self.parse_value_from(value_tok)?;
        self.pending.docs.clear();
        if key.text != "version" {
            self.warn_at(
                format!("ignoring unknown control statement '${}'", key.text),
                key.range,
                ErrorCode::E0602,
            );
            return Ok(());
        }
        let (major, smithy) = match value.as_str() {
            Some("1") | Some("1.0") => (1, "1.0"),
            Some("2") | Some("2.0") => (2, "2.0"),
            _ => {
                return Err(SyntaxError::new(
                    format!("unsupported version: {value}"),
                    value_tok.range,
                    ErrorCode::E0601,
                )
                .with_hint("supported versions are \"1.0\" and \"2.0\""));
            }
        };
        self.version = major;
        self.ast.smithy = smithy.to_string();
        Ok(())
    }

    fn parse_namespace(&mut self, tok: Token<'a>) -> PResult<()> {
        if self.namespace.is_some() {
            return Err(SyntaxError::new(
                "namespace already declared in this file",
                tok.range,
                ErrorCode::E0501,
            ));
        }
        let first = self.expect(TokenKind::Symbol, "namespace name")?;
        let mut ns = first.text.to_string();
        while self.eat(TokenKind::Dot) {
            let part = self.expect(TokenKind::Symbol, "namespace segment")?;
            ns.push('.');
            ns.push_str(part.text);
        }
        debug!(path = %self.path, namespace = %ns, "namespace");
        self.namespace = Some(ns);
        self.pending.docs.clear();
        Ok(())
    }

    fn parse_metadata(&mut self) -> PResult<()> {
        let key_tok = self.next_token("metadata key")?;
        if !matches!(key_tok.kind, TokenKind::Symbol | TokenKind::String) {
            return Err(self.unexpected(&key_tok, "metadata key"));
        }
        let key = self.key_text(&key_tok)?;
        self.expect(TokenKind::Equals, "'='")?;
        let value = self.parse_value()?;
        self.ast.metadata.insert(key, value);
        self.pending.docs.clear();
        Ok(())
    }

    fn parse_use(&mut self) -> PResult<()> {
        let first = self.expect(TokenKind::Symbol, "shape id")?;
        let id = self.parse_shape_id_from(first)?;
        let Some((_, name)) = id.split_once('#') else {
            return Err(SyntaxError::new(
                format!("use requires an absolute shape id, found '{id}'"),
                first.range,
                ErrorCode::E0503,
            ));
        };
        if let Some(existing) = self.uses.get(name) {
            if existing != &id {
                return Err(SyntaxError::new(
                    format!("'{name}' already refers to {existing}"),
                    first.range,
                    ErrorCode::E0503,
                ));
            }
        }
        self.uses.insert(name.to_string(), id.clone());
        self.pending.docs.clear();
        Ok(())
    }

    fn parse_apply(&mut self) -> PResult<()> {
        let first = self.expect(TokenKind::Symbol, "shape id")?;
        let written = self.parse_shape_id_from(first)?;
        let target = self.resolve(&written);
        let mut traits = Traits::new();
        let tok = self.next_token("'@' or '{'")?;
        match tok.kind {
            TokenKind::At => self.parse_trait(&mut traits)?,
            TokenKind::LBrace => loop {
                let tok = self.next_token("'}'")?;
                match tok.kind {
                    TokenKind::RBrace => break,
                    TokenKind::At => self.parse_trait(&mut traits)?,
                    _ => return Err(self.unexpected(&tok, "'@' or '}'")),
                }
            },
            _ => return Err(self.unexpected(&tok, "'@' or '{'")),
        }
        if !self.ast.apply_traits(&target, &traits) {
            debug!(path = %self.path, target = %target, "deferring apply");
            self.applies.push(DeferredApply {
                target,
                traits,
                path: self.path.clone(),
            });
        }
        self.pending.docs.clear();
        Ok(())
    }

    // =========================================================================
    // Pending traits and docs
    // =========================================================================

    fn ensure_no_pending_traits(&self, statement: &str) -> PResult<()> {
        match self.pending.first {
            Some(range) if !self.pending.traits.is_empty() => Err(SyntaxError::new(
                format!("traits cannot be applied to a {statement} statement"),
                range,
                ErrorCode::E0305,
            )),
            _ => Ok(()),
        }
    }

    /// Take the pending traits for a new shape, with the pending doc comment
    /// folded into the documentation slot.
    pub(crate) fn take_shape_traits(&mut self) -> Traits {
        let pending = std::mem::take(&mut self.pending);
        let mut traits = pending.traits;
        traits.attach_documentation(&pending.docs.join("\n"));
        if self.options.annotate_sources {
            traits.attach_documentation(&format!("source: {}", self.path));
        }
        traits
    }

    pub(crate) fn add_shape(&mut self, name: &Token<'_>, shape: Shape) -> PResult<()> {
        let id = self.shape_id(name)?;
        self.put_new_shape(id, shape, name.range)
    }

    pub(crate) fn put_new_shape(&mut self, id: String, shape: Shape, range: TextRange) -> PResult<()> {
        if self.ast.get_shape(&id).is_some() {
            return Err(SyntaxError::new(
                format!("Duplicate shape: {id}"),
                range,
                ErrorCode::E0301,
            ));
        }
        self.ast.put_shape(id, shape);
        Ok(())
    }

    /// Absolute id for a shape declared in this file.
    pub(crate) fn shape_id(&self, name: &Token<'_>) -> PResult<String> {
        match &self.namespace {
            Some(ns) => Ok(absolute(ns, name.text)),
            None => Err(SyntaxError::new(
                format!("shape '{}' declared before any namespace statement", name.text),
                name.range,
                ErrorCode::E0502,
            )),
        }
    }

    // =========================================================================
    // Names
    // =========================================================================

    /// Read the rest of a shape id (`a.b#C$d`) whose first symbol was read.
    pub(crate) fn parse_shape_id_from(&mut self, first: Token<'a>) -> PResult<String> {
        let mut id = first.text.to_string();
        loop {
            let Some(tok) = self.tokens.next() else {
                break;
            };
            let sep = match tok.kind {
                TokenKind::Dot => '.',
                TokenKind::Hash => '#',
                TokenKind::Dollar => '$',
                _ => {
                    self.tokens.unget();
                    break;
                }
            };
            let part = self.expect(TokenKind::Symbol, "identifier")?;
            id.push(sep);
            id.push_str(part.text);
        }
        Ok(id)
    }

    /// Resolve a shape id as written to an absolute id: already absolute,
    /// a `use` alias, a prelude type, or a name in this file's namespace.
    /// A `$member` suffix is carried through.
    pub(crate) fn resolve(&self, written: &str) -> String {
        let (shape, member) = split_member(written);
        let mut id = if shape.contains('#') {
            shape.to_string()
        } else if let Some(full) = self.uses.get(shape) {
            full.clone()
        } else if is_prelude_type(shape) {
            prelude_id(shape)
        } else {
            match &self.namespace {
                Some(ns) => absolute(ns, shape),
                None => shape.to_string(),
            }
        };
        if let Some(member) = member {
            id.push('$');
            id.push_str(member);
        }
        id
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    /// Next significant token, or an end-of-file error naming what was expected.
    pub(crate) fn next_token(&mut self, expected: &str) -> PResult<Token<'a>> {
        self.tokens.next().ok_or_else(|| {
            SyntaxError::at_offset(
                format!("unexpected end of file, expected {expected}"),
                self.tokens.end(),
                ErrorCode::E0202,
            )
        })
    }

    pub(crate) fn expect(&mut self, kind: TokenKind, expected: &str) -> PResult<Token<'a>> {
        let tok = self.next_token(expected)?;
        if tok.kind == kind {
            Ok(tok)
        } else {
            Err(self.unexpected(&tok, expected))
        }
    }

    /// Consume the next token if it has `kind`.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        match self.tokens.next() {
            Some(tok) if tok.kind == kind => true,
            _ => {
                self.tokens.unget();
                false
            }
        }
    }

    pub(crate) fn unexpected(&self, tok: &Token<'_>, expected: &str) -> SyntaxError {
        match tok.kind {
            TokenKind::Error if tok.text.starts_with('"') => {
                SyntaxError::new("unterminated string literal", tok.range, ErrorCode::E0102)
            }
            TokenKind::Error => SyntaxError::new(
                format!("invalid character '{}'", tok.text),
                tok.range,
                ErrorCode::E0101,
            ),
            _ => SyntaxError::new(
                format!("expected {expected}, found '{}'", tok.text),
                tok.range,
                ErrorCode::E0201,
            ),
        }
    }

    pub(crate) fn warn_at(&mut self, message: String, range: TextRange, code: ErrorCode) {
        warn!(path = %self.path, "{}", message);
        self.warnings.push(SyntaxError::warning(message, range, code));
    }
}
