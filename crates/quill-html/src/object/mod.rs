//! HTML object model.
//!
//! Closed node variants ([`HtmlNode`], [`TagKind`]) with static per-kind
//! metadata ([`TagInfo`]) and typed attribute interpretation
//! ([`TagAttributes`]).

/// Typed attribute values.
pub mod attributes;
/// Node payloads.
pub mod node;
/// Tag kinds and their metadata.
pub mod tag;

pub use attributes::{
    Align, AttrFlags, Color, ColorTable, FontSize, Length, TagAttributes, default_color_table,
};
pub use node::{Comment, HtmlNode, HtmlTag, Word, WordKind, logical_words};
pub use tag::{BodyMode, TagFlags, TagInfo, TagKind, TagTable, WordBreak, default_tag_table};
