//! # smithy-base
//!
//! Core library for Smithy IDL parsing, model assembly, and regeneration
//! as IDL, JSON AST, or SADL.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! generate  → Generators (idl, ast, sadl) and the output sink
//!   ↓
//! unparse   → AST + namespace → IDL text
//!   ↓
//! assembly  → File discovery, parallel load, merge, tag filter
//!   ↓
//! parser    → Logos lexer, recursive-descent parser, trait visitors
//!   ↓
//! model     → Ordered AST: shapes, members, traits, dependency walks
//!   ↓
//! base      → Primitives (TextRange, LineIndex, shape ids, constants)
//! ```

// ============================================================================
// MODULES (dependency order: base → model → parser → assembly → unparse → generate)
// ============================================================================

/// Foundation types: TextRange, LineIndex, shape-id helpers
pub mod base;

/// Order-preserving data model and its JSON AST encoding
pub mod model;

/// Parser: Logos lexer, recursive-descent parser, trait registry
pub mod parser;

/// Assembly: load, merge, and filter many model files
pub mod assembly;

/// IDL unparser
pub mod unparse;

/// Output generators and the file/stream sink
pub mod generate;

// Re-export the common entry points
pub use assembly::{Assembler, AssemblyError, assemble};
pub use generate::{GenerateError, Generator, GeneratorConfig, generator_for};
pub use model::{Ast, Shape, ShapeKind};
pub use parser::{ParserOptions, SyntaxError, parse, parse_str};
pub use unparse::{IdlOptions, MetadataPolicy, unparse, unparse_with};

// Re-export foundation types
pub use base::{LineCol, LineIndex, TextRange, TextSize};
