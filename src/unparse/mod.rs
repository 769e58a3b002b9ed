//! IDL unparser
//!
//! Serializes the shapes of one namespace back into IDL text. The output
//! parses back to the same shapes, traits, and order when the input was in
//! canonical order (service, then operations, then everything else).
//!
//! ## Document layout
//!
//! ```text
//! $version: "2"
//! metadata ...            (see MetadataPolicy)
//! namespace example.a
//! use other.ns#Thing      (external references)
//! service ...             (services first)
//! operation ...           (each followed by its non-inline input/output)
//! ...remaining shapes in map order...
//! apply Op @examples(...)
//! ```

mod node;
mod writer;

pub use node::{render_node, render_trait};
pub use writer::IdlWriter;

use crate::model::Ast;

/// Which namespace documents carry the model metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetadataPolicy {
    /// Only the primary namespace (the first service's, else the first one)
    #[default]
    Primary,
    /// Every namespace document repeats all metadata
    All,
    /// Metadata is not written
    None,
}

impl MetadataPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "primary" => Some(Self::Primary),
            "all" => Some(Self::All),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

/// Formatting options for the IDL writer
#[derive(Debug, Clone, Default)]
pub struct IdlOptions {
    pub metadata: MetadataPolicy,
}

/// Render one namespace of `ast` with default options.
pub fn unparse(ast: &Ast, namespace: &str) -> String {
    unparse_with(ast, namespace, &IdlOptions::default())
}

pub fn unparse_with(ast: &Ast, namespace: &str, options: &IdlOptions) -> String {
    IdlWriter::new(ast, namespace, options).write()
}
