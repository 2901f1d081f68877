//! Tree construction.
//!
//! [`builder`] holds the generic, hook-driven tree builder. The [`xml`] and
//! [`html`] flavours plug their own node types and recovery policies into it.

/// Generic hook-driven tree builder.
pub mod builder;
/// HTML flavour.
pub mod html;
/// Strict XML flavour.
pub mod xml;

pub use builder::{
    CommentKind, DEFAULT_MAX_DEPTH, Mismatch, ParseError, Parsed, StructureError,
    StructureErrorKind, TextKind, TreeBuilder, TreeCursor, TreeHooks, dump_tree, friendly_error,
    print_tree,
};
pub use html::{HtmlHooks, HtmlParser, ImageCreator, parse_html};
pub use xml::{XmlHooks, XmlNode, XmlParser, parse_xml};
