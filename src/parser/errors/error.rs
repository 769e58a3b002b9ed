//! Syntax error and warning types
//!
//! Provides rich error information including:
//! - Error codes for categorization
//! - Severity levels
//! - Hints/suggestions for fixes
//! - File path, line/column, and the offending source line

use std::fmt;

use text_size::{TextRange, TextSize};

use super::codes::ErrorCode;
use crate::base::{LineCol, LineIndex};

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    /// A hard error that prevents valid parsing
    #[default]
    Error,
    /// A warning that doesn't prevent parsing
    Warning,
}

impl Severity {
    /// Check if this is an error
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// Where in which file a diagnostic points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub line_col: LineCol,
    /// The full source line containing the error
    pub snippet: String,
}

/// A syntax error (or warning) with enhanced information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Human-readable error message
    pub message: String,
    /// Source location
    pub range: TextRange,
    /// Categorized error code
    pub code: ErrorCode,
    /// Error severity
    pub severity: Severity,
    /// Optional suggestion for fixing the error
    pub hint: Option<String>,
    /// Resolved file position, filled in once the source is known
    pub location: Option<Location>,
}

impl SyntaxError {
    /// Create a new syntax error with minimal information
    pub fn new(message: impl Into<String>, range: TextRange, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            range,
            code,
            severity: Severity::Error,
            hint: None,
            location: None,
        }
    }

    /// Create an error at a specific offset with zero-width range
    pub fn at_offset(message: impl Into<String>, offset: TextSize, code: ErrorCode) -> Self {
        Self::new(message, TextRange::empty(offset), code)
    }

    /// Create a warning
    pub fn warning(message: impl Into<String>, range: TextRange, code: ErrorCode) -> Self {
        Self::new(message, range, code).with_severity(Severity::Warning)
    }

    /// Add a hint to this error
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Set the severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Resolve the byte range against the source text of `path`.
    pub fn locate(mut self, path: &str, source: &str, index: &LineIndex) -> Self {
        let line_col = index.line_col(self.range.start());
        self.location = Some(Location {
            path: path.to_string(),
            line_col,
            snippet: index.line_text(source, line_col.line).to_string(),
        });
        self
    }

    /// Check if this error has a hint
    pub fn has_hint(&self) -> bool {
        self.hint.is_some()
    }

    /// Render with the source line and a caret under the error column.
    pub fn format(&self) -> String {
        let mut result = self.to_string();
        if let Some(loc) = &self.location {
            if !loc.snippet.is_empty() {
                let pad = " ".repeat((loc.line_col.col as usize).saturating_sub(1));
                result.push_str(&format!("\n    {}\n    {}^", loc.snippet, pad));
            }
        }
        if let Some(hint) = &self.hint {
            result.push_str(&format!("\n  hint: {}", hint));
        }
        result
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(loc) = &self.location {
            write!(f, "{}:{}:{}: ", loc.path, loc.line_col.line, loc.line_col.col)?;
        }
        write!(
            f,
            "{}[{}]: {}",
            self.severity.as_str(),
            self.code,
            self.message
        )
    }
}

impl std::error::Error for SyntaxError {}
