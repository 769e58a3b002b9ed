//! Parser error handling module
//!
//! This module provides error handling for the IDL parser:
//! - Categorized error codes for filtering and documentation
//! - Severity levels, so warnings travel the same way as errors
//! - File/line/column location with the offending source line

mod codes;
mod error;

pub use codes::ErrorCode;
pub use error::{Location, Severity, SyntaxError};

#[cfg(test)]
mod tests;
