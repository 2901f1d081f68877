//! Node payloads of an HTML tree.

use core::fmt;
use std::collections::HashSet;

use quill_common::image::LoadedImage;
use quill_dom::{NodeId, Tree};
use strum_macros::{Display, IntoStaticStr};

use super::attributes::TagAttributes;
use super::tag::{TagFlags, TagInfo, TagKind, WordBreak};
use crate::parser::builder::CommentKind;

/// What a [`Word`] was made from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum WordKind {
    /// A whitespace-delimited piece of body text.
    Text,
    /// One line of a verbatim block (`pre`).
    Line,
    /// The whole verbatim body of `script`, `style` or `textarea`.
    Raw,
    /// The inside of a CDATA section.
    Cdata,
}

/// A word fragment.
///
/// A word interrupted by inline tags (`a<b>c</b>d`) is stored as several
/// fragments, each linked to the next through `continues`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    /// The text, entities decoded.
    pub text: String,
    /// What the word was made from.
    pub kind: WordKind,
    /// Whether a space (written or implied by a block boundary) follows.
    pub space_after: bool,
    /// The next fragment of the same logical word.
    pub continues: Option<NodeId>,
}

impl Word {
    /// A fragment with undecided boundary.
    #[must_use]
    pub fn new(text: &str, kind: WordKind) -> Self {
        Self {
            text: text.to_string(),
            kind,
            space_after: false,
            continues: None,
        }
    }
}

/// A comment kept in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Which construct it was.
    pub kind: CommentKind,
    /// Its text, verbatim.
    pub text: String,
}

/// A tag node.
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlTag {
    /// What the tag is.
    pub kind: TagKind,
    /// Lowercase name as written (differs from the kind's name for unknown
    /// tags and remapped dialects).
    pub name: String,
    /// Interpreted attributes.
    pub attributes: TagAttributes,
    /// Image returned by the image creator.
    pub image: Option<LoadedImage>,
}

impl HtmlTag {
    /// A tag with no attributes.
    #[must_use]
    pub fn new(kind: TagKind, name: &str) -> Self {
        Self {
            kind,
            name: name.to_ascii_lowercase(),
            attributes: TagAttributes::default(),
            image: None,
        }
    }

    /// Static metadata of the kind.
    #[must_use]
    pub const fn info(&self) -> TagInfo {
        self.kind.info()
    }

    /// Structural class.
    #[must_use]
    pub const fn flags(&self) -> TagFlags {
        self.kind.info().flags
    }

    /// Flags of incoming tags that implicitly close this one.
    #[must_use]
    pub const fn closed_by(&self) -> TagFlags {
        self.kind.info().closed_by
    }

    /// Whether the tag interrupts word concatenation.
    #[must_use]
    pub const fn breaks_word(&self) -> bool {
        !matches!(self.kind.info().word_break, WordBreak::Join)
    }

    /// Whether the tag is block-level.
    #[must_use]
    pub const fn is_block(&self) -> bool {
        self.flags().contains(TagFlags::BLOCK)
    }
}

/// Payload of an HTML tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum HtmlNode {
    /// The document root.
    Document,
    /// A tag.
    Tag(HtmlTag),
    /// A word fragment.
    Word(Word),
    /// A comment, when comments are kept.
    Comment(Comment),
}

impl HtmlNode {
    /// The tag, if this is one.
    #[must_use]
    pub const fn as_tag(&self) -> Option<&HtmlTag> {
        match self {
            Self::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    /// The tag, mutably.
    pub const fn as_tag_mut(&mut self) -> Option<&mut HtmlTag> {
        match self {
            Self::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    /// The word, if this is one.
    #[must_use]
    pub const fn as_word(&self) -> Option<&Word> {
        match self {
            Self::Word(word) => Some(word),
            _ => None,
        }
    }

    /// The word, mutably.
    pub const fn as_word_mut(&mut self) -> Option<&mut Word> {
        match self {
            Self::Word(word) => Some(word),
            _ => None,
        }
    }
}

impl fmt::Display for HtmlNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document => write!(f, "Document"),
            Self::Tag(tag) => {
                write!(f, "<{}>", tag.name)?;
                if let Some(image) = &tag.image {
                    write!(f, " [image {}x{}]", image.width(), image.height())?;
                }
                Ok(())
            }
            Self::Word(word) => {
                let display = word.text.replace('\n', "\\n");
                match word.kind {
                    WordKind::Text => write!(f, "\"{display}\"")?,
                    kind => write!(f, "{kind} \"{display}\"")?,
                }
                if word.continues.is_some() {
                    write!(f, " +")?;
                }
                if word.space_after {
                    write!(f, " \u{00B7}")?;
                }
                Ok(())
            }
            Self::Comment(comment) => write!(f, "<!-- {} -->", comment.text),
        }
    }
}

/// The logical words of a tree in document order, with linked fragments
/// merged.
#[must_use]
pub fn logical_words(tree: &Tree<HtmlNode>) -> Vec<String> {
    let continuations: HashSet<NodeId> = tree
        .walk()
        .filter_map(|(id, _)| tree.data(id)?.as_word()?.continues)
        .collect();

    let mut words = Vec::new();
    for (id, _) in tree.walk() {
        if continuations.contains(&id) {
            continue;
        }
        let Some(mut word) = tree.data(id).and_then(HtmlNode::as_word) else {
            continue;
        };
        let mut text = word.text.clone();
        while let Some(next) = word.continues.and_then(|next| tree.data(next)?.as_word()) {
            text.push_str(&next.text);
            word = next;
        }
        words.push(text);
    }
    words
}
