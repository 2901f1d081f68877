//! Style tokenizer module.

/// Style token types and errors.
pub mod token;
/// Style tokenizer implementation.
#[allow(clippy::module_inception)]
pub mod tokenizer;

pub use token::{StyleError, StyleField, StyleToken, StyleTokenKind, unquote};
pub use tokenizer::StyleTokenizer;
