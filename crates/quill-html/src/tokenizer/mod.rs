//! Markup tokenizer.
//!
//! A pull tokenizer over borrowed input: every token is a span of the source
//! plus its kind. Entity decoding is left to the tree builders, which use the
//! [`entities`] table.

/// Character entity table and translation.
pub mod entities;
/// Helper methods for the token loop.
mod helpers;
/// Token and error types.
pub mod token;
/// The tokenizer state machine.
#[allow(clippy::module_inception)]
pub mod tokenizer;

pub use entities::{Decoded, EntityTable, default_table};
pub use token::{SyntaxError, SyntaxErrorKind, Token, TokenKind};
pub use tokenizer::{MarkupTokenizer, RawBody, TagState};
