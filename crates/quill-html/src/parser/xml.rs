//! Strict XML-like flavour of the tree builder.
//!
//! Names are case-sensitive, every mismatched closing tag is an error and
//! nothing is closed implicitly. Text is entity-decoded with the default
//! table; whitespace-only text is dropped.

use core::fmt;

use quill_dom::Tree;

use super::builder::{CommentKind, Parsed, TextKind, TreeBuilder, TreeCursor, TreeHooks};
use crate::tokenizer::entities::default_table;

/// Payload of an XML tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    /// The document root.
    Document,
    /// An element and its attributes in source order.
    Element {
        /// Element name, as written.
        name: String,
        /// `(name, value)` pairs; `None` for attributes without `=`.
        attrs: Vec<(String, Option<String>)>,
    },
    /// Decoded text, or the inside of a CDATA section.
    Text(String),
    /// A comment-like construct, kept when asked for.
    Comment {
        /// Which construct it was.
        kind: CommentKind,
        /// Its text, verbatim.
        text: String,
    },
}

impl XmlNode {
    /// Element name, if this is an element.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Value of attribute `name` on an element.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match self {
            Self::Element { attrs, .. } => attrs
                .iter()
                .find(|(attr, _)| attr == name)
                .and_then(|(_, value)| value.as_deref()),
            _ => None,
        }
    }
}

impl fmt::Display for XmlNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document => write!(f, "#document"),
            Self::Element { name, attrs } => {
                write!(f, "<{name}")?;
                for (attr, value) in attrs {
                    match value {
                        Some(value) => write!(f, " {attr}=\"{value}\"")?,
                        None => write!(f, " {attr}")?,
                    }
                }
                write!(f, ">")
            }
            Self::Text(text) => write!(f, "\"{text}\""),
            Self::Comment { kind, text } => write!(f, "<!-- {kind}: {text} -->"),
        }
    }
}

/// Hooks for the XML flavour.
#[derive(Debug, Clone, Default)]
pub struct XmlHooks {
    /// Keep comments, processing instructions and declarations as nodes.
    pub keep_comments: bool,
}

impl TreeHooks for XmlHooks {
    type Node = XmlNode;

    fn create_root(&mut self) -> XmlNode {
        XmlNode::Document
    }

    fn create_tag(&mut self, _cursor: &mut TreeCursor<'_, XmlNode>, name: &str) -> XmlNode {
        XmlNode::Element {
            name: name.to_string(),
            attrs: Vec::new(),
        }
    }

    fn name_matches(&self, node: &XmlNode, closing: &str) -> bool {
        node.name() == Some(closing)
    }

    fn process_attribute(&mut self, node: &mut XmlNode, name: &str, value: Option<&str>) {
        if let XmlNode::Element { attrs, .. } = node {
            let value = value.map(|v| default_table().translate_copy(v));
            attrs.push((name.to_string(), value));
        }
    }

    fn create_word(&mut self, text: &str, kind: TextKind) -> Option<XmlNode> {
        match kind {
            TextKind::Body if text.trim_ascii().is_empty() => None,
            TextKind::Body => Some(XmlNode::Text(default_table().translate_copy(text))),
            TextKind::Cdata | TextKind::Raw => Some(XmlNode::Text(text.to_string())),
        }
    }

    fn create_comment(&mut self, kind: CommentKind, text: &str) -> Option<XmlNode> {
        self.keep_comments.then(|| XmlNode::Comment {
            kind,
            text: text.to_string(),
        })
    }

    fn tag_name<'n>(&self, node: &'n XmlNode) -> &'n str {
        node.name().unwrap_or_default()
    }
}

/// Parser for the XML flavour.
#[derive(Debug)]
pub struct XmlParser {
    builder: TreeBuilder<XmlHooks>,
}

impl XmlParser {
    /// Create a parser that drops comments.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            builder: TreeBuilder::new(XmlHooks {
                keep_comments: false,
            }),
        }
    }

    /// Keep comment-like constructs as [`XmlNode::Comment`] nodes.
    #[must_use]
    pub fn keep_comments(mut self, keep: bool) -> Self {
        self.builder.hooks_mut().keep_comments = keep;
        self
    }

    /// Set the maximum nesting depth.
    #[must_use]
    pub fn with_max_depth(self, max_depth: usize) -> Self {
        Self {
            builder: self.builder.with_max_depth(max_depth),
        }
    }

    /// Parse `src`.
    pub fn parse(&mut self, src: &str) -> Parsed<XmlNode> {
        self.builder.parse(src)
    }
}

impl Default for XmlParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `src` with a default [`XmlParser`].
#[must_use]
pub fn parse_xml(src: &str) -> Parsed<XmlNode> {
    XmlParser::new().parse(src)
}

/// Text content of `tree` in document order, one entry per text node.
#[must_use]
pub fn texts(tree: &Tree<XmlNode>) -> Vec<&str> {
    tree.walk()
        .filter_map(|(id, _)| match tree.data(id) {
            Some(XmlNode::Text(text)) => Some(text.as_str()),
            _ => None,
        })
        .collect()
}
