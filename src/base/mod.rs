//! Foundation types for the Smithy toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineCol`], [`LineIndex`] - Line/column conversion
//! - Shape-id helpers (`ns#Name$member` splitting, prelude lookup)
//! - Comment wrapping for the text emitters
//! - Domain constants (prelude namespace, file extensions, trait ids)
//!
//! This module has NO dependencies on other smithy modules.

pub mod constants;
mod position;
pub mod shape_id;
pub mod text;

pub use position::{LineCol, LineIndex};
pub use text_size::{TextRange, TextSize};

// Re-export text-size types for convenience
pub use text_size;
