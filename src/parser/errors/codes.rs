//! Error code definitions for parser diagnostics
//!
//! Error codes follow a naming convention: E{category}{number}
//! - E01xx: Lexical errors (invalid tokens, bad escapes)
//! - E02xx: Structural errors (unexpected tokens, end of input)
//! - E03xx: Declaration errors (shapes, members, traits)
//! - E04xx: Node value errors
//! - E05xx: Namespace errors
//! - E06xx: Control statement errors

use std::fmt;

/// Error codes for parser diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // E01xx: Lexical errors
    // =========================================================================
    /// Invalid or unexpected character in source
    E0101,
    /// Unterminated string literal
    E0102,
    /// Invalid escape sequence in a string
    E0103,
    /// Invalid numeric literal
    E0104,

    // =========================================================================
    // E02xx: Structural errors
    // =========================================================================
    /// Unexpected token in current context
    E0201,
    /// Input ended in the middle of a statement
    E0202,

    // =========================================================================
    // E03xx: Declaration errors
    // =========================================================================
    /// Shape defined twice in one file
    E0301,
    /// Unknown statement or shape keyword
    E0302,
    /// List or map refers to itself directly
    E0303,
    /// Collection without its required member
    E0304,
    /// Traits or docs not followed by a shape
    E0305,
    /// Inline operation input/output in a version 1 file
    E0306,
    /// Trait value does not fit the trait
    E0307,
    /// Duplicate member name
    E0308,

    // =========================================================================
    // E04xx: Node value errors
    // =========================================================================
    /// Invalid node value
    E0401,

    // =========================================================================
    // E05xx: Namespace errors
    // =========================================================================
    /// Second `namespace` statement
    E0501,
    /// Shape declared before any `namespace` statement
    E0502,
    /// Malformed `use` statement
    E0503,

    // =========================================================================
    // E06xx: Control statement errors
    // =========================================================================
    /// Unsupported `$version`
    E0601,
    /// Malformed control statement
    E0602,
}

impl ErrorCode {
    /// Get the string representation of the error code (e.g., "E0201")
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E0101 => "E0101",
            Self::E0102 => "E0102",
            Self::E0103 => "E0103",
            Self::E0104 => "E0104",
            Self::E0201 => "E0201",
            Self::E0202 => "E0202",
            Self::E0301 => "E0301",
            Self::E0302 => "E0302",
            Self::E0303 => "E0303",
            Self::E0304 => "E0304",
            Self::E0305 => "E0305",
            Self::E0306 => "E0306",
            Self::E0307 => "E0307",
            Self::E0308 => "E0308",
            Self::E0401 => "E0401",
            Self::E0501 => "E0501",
            Self::E0502 => "E0502",
            Self::E0503 => "E0503",
            Self::E0601 => "E0601",
            Self::E0602 => "E0602",
        }
    }

    /// Get a short description of the error category
    pub fn category_description(&self) -> &'static str {
        match self {
            Self::E0101 | Self::E0102 | Self::E0103 | Self::E0104 => "lexical error",
            Self::E0201 | Self::E0202 => "syntax error",
            Self::E0301
            | Self::E0302
            | Self::E0303
            | Self::E0304
            | Self::E0305
            | Self::E0306
            | Self::E0307
            | Self::E0308 => "declaration error",
            Self::E0401 => "value error",
            Self::E0501 | Self::E0502 | Self::E0503 => "namespace error",
            Self::E0601 | Self::E0602 => "control error",
        }
    }

    /// Get the default message template for this error code
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::E0101 => "invalid character",
            Self::E0102 => "unterminated string literal",
            Self::E0103 => "invalid escape sequence",
            Self::E0104 => "invalid numeric literal",
            Self::E0201 => "unexpected token",
            Self::E0202 => "unexpected end of file",
            Self::E0301 => "duplicate shape",
            Self::E0302 => "unknown statement",
            Self::E0303 => "directly recursive type references not allowed",
            Self::E0304 => "missing required member",
            Self::E0305 => "traits must precede a shape definition",
            Self::E0306 => "inline operation bodies require version 2",
            Self::E0307 => "invalid trait value",
            Self::E0308 => "duplicate member",
            Self::E0401 => "invalid node value",
            Self::E0501 => "namespace already declared",
            Self::E0502 => "no namespace declared",
            Self::E0503 => "invalid use statement",
            Self::E0601 => "unsupported version",
            Self::E0602 => "invalid control statement",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
