//! Recursive-descent parser for the Smithy IDL
//!
//! This module turns IDL text straight into the [`Ast`](crate::model::Ast):
//! - **logos** for fast lexing
//! - a hand-written statement parser with one token of pushback
//! - a closed set of trait visitors keyed by trait name
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with TokenKind and TextRange
//!     ↓
//! TokenStream → significant tokens, `///` docs on request, unget
//!     ↓
//! IdlParser → statements, shapes, node values, trait visitors
//!     ↓
//! ParsedFile → Ast + use map + deferred applies + warnings
//! ```
//!
//! Names are resolved while parsing: a bare name becomes a `use` alias
//! target, a prelude id, or an id in the file's namespace.

#[allow(clippy::module_inception)]
mod parser;

pub mod errors;
mod lexer;
mod literals;
mod shapes;
mod traits;

pub use errors::{ErrorCode, Severity, SyntaxError};
pub use lexer::{Lexer, Token, TokenKind, TokenStream, tokenize};
pub use parser::{DeferredApply, ParsedFile, ParserOptions, parse, parse_str, parse_str_with};
pub use traits::{TraitArgs, TraitRegistry, TraitVisitor};
