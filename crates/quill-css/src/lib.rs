//! Style tokenizer and parser for the quill markup engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **Style Tokenizer** - selector / property / value tokens over inline
//!   `style=""` text or stylesheet-like rule lists, with comma-flagged kinds
//!   for comma-separated lists
//! - **Style Parser** - grouping of values under their property into a
//!   reusable fixed-capacity record, plus owned declaration and rule lists
//!
//! # Not Implemented
//!
//! - Value interpretation (lengths, colors, ...) beyond splitting
//! - Cascade, specificity and selector matching
//! - At-rules

/// Style parser.
pub mod parser;
/// Style tokenizer.
pub mod tokenizer;

pub use parser::{
    Declaration, Property, Rule, Stylesheet, parse_declarations, parse_inline, parse_stylesheet,
};
pub use tokenizer::{StyleError, StyleField, StyleToken, StyleTokenKind, StyleTokenizer};
