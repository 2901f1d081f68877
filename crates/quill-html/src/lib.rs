//! Forgiving markup tokenizer and tree builders for the quill engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **Markup Tokenizer** - a pull tokenizer over borrowed HTML-like input,
//!   producing tag, attribute, body and comment tokens as spans of the source
//! - **Entity Table** - named and numeric character references, with
//!   allocation-free, copying and in-place translation
//! - **Tree Builder** - a generic builder driven by [`TreeHooks`], with a
//!   strict XML flavour and a forgiving HTML flavour
//! - **HTML Object Model** - tag kinds with static metadata, typed
//!   attributes and word fragments linked into logical words
//!
//! # Not Implemented
//!
//! - Conformance with the WHATWG tree construction algorithm
//! - Schema or DTD validation
//! - Tree mutation beyond appending

/// HTML object model.
pub mod object;
/// Tree construction.
pub mod parser;
/// Markup tokenizer and entity table.
pub mod tokenizer;

pub use object::{HtmlNode, HtmlTag, TagKind, Word, WordKind, logical_words};
pub use parser::{
    HtmlParser, ParseError, Parsed, TreeBuilder, TreeHooks, XmlNode, XmlParser, friendly_error,
    parse_html, parse_xml, print_tree,
};
pub use tokenizer::{EntityTable, MarkupTokenizer, SyntaxError, Token, TokenKind};
