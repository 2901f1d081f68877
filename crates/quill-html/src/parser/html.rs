//! HTML flavour of the tree builder.
//!
//! On top of the generic builder this flavour:
//! - maps tag names to [`TagKind`]s through a [`TagTable`]
//! - closes tags implicitly by similarity (`<li>` closes an open `<li>`)
//! - recovers from mismatched closing tags of implicitly closable tags and
//!   from dangling `</p>`
//! - splits body text into word fragments, linking fragments separated only
//!   by inline tags into one logical word
//! - keeps `pre`-like bodies as lines and `script`-like bodies verbatim
//! - hands `img src`, `input type=image src` and `background` references
//!   to an image creator

use core::fmt;
use std::mem;

use quill_common::image::{ImageHint, LoadedImage};
use quill_common::scan::{get_word, is_space};
use quill_common::url::{resolve_url, split_filename};
use quill_common::warning::warn_once;
use quill_dom::{NodeId, Tree};

use super::builder::{CommentKind, Mismatch, Parsed, TextKind, TreeBuilder, TreeCursor, TreeHooks};
use crate::object::{
    BodyMode, ColorTable, Comment, HtmlNode, HtmlTag, TagKind, TagTable, Word, WordBreak, WordKind,
    default_color_table, default_tag_table,
};
use crate::tokenizer::entities::{EntityTable, default_table};

/// Callback turning a resolved image reference into an image.
pub type ImageCreator<'t> = Box<dyn FnMut(&str, ImageHint) -> Option<LoadedImage> + 't>;

/// Hooks for the HTML flavour.
pub struct HtmlHooks<'t> {
    entities: &'t EntityTable<'t>,
    tags: &'t TagTable<'t>,
    colors: &'t ColorTable<'t>,
    image_creator: Option<ImageCreator<'t>>,
    keep_comments: bool,
    /// Decode buffer reused for the whole parse.
    scratch: String,
    /// Last word whose trailing boundary is still undecided.
    pending: Option<NodeId>,
    filename: Option<String>,
    directory: Option<String>,
    /// `<base href>` of the current document.
    base: Option<String>,
    title: Option<String>,
}

impl fmt::Debug for HtmlHooks<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlHooks")
            .field("entities", &self.entities.len())
            .field("tags", &self.tags.len())
            .field("image_creator", &self.image_creator.is_some())
            .field("keep_comments", &self.keep_comments)
            .field("pending", &self.pending)
            .field("filename", &self.filename)
            .field("base", &self.base)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

impl HtmlHooks<'_> {
    fn new() -> Self {
        Self {
            entities: default_table(),
            tags: default_tag_table(),
            colors: default_color_table(),
            image_creator: None,
            keep_comments: false,
            scratch: String::new(),
            pending: None,
            filename: None,
            directory: None,
            base: None,
            title: None,
        }
    }

    /// Resolve `href` against `<base href>`, else the document directory.
    fn resolve(&self, href: &str) -> String {
        let dir = self
            .base
            .as_deref()
            .map(base_directory)
            .or(self.directory.as_deref())
            .filter(|dir| !dir.is_empty());
        resolve_url(href, dir)
    }

    fn load_image(&mut self, href: &str, hint: ImageHint) -> Option<LoadedImage> {
        let url = self.resolve(href);
        let creator = self.image_creator.as_mut()?;
        creator(&url, hint)
    }

    /// Apply a tag's effect on the pending word.
    fn break_word(&mut self, tree: &mut Tree<HtmlNode>, word_break: WordBreak) {
        match word_break {
            WordBreak::Join => {}
            WordBreak::Reset => self.pending = None,
            WordBreak::Space => {
                if let Some(word) = self
                    .pending
                    .take()
                    .and_then(|id| tree.data_mut(id))
                    .and_then(HtmlNode::as_word_mut)
                {
                    word.space_after = true;
                }
            }
        }
    }

    /// Split decoded body text into word fragments.
    fn push_words(&mut self, cursor: &mut TreeCursor<'_, HtmlNode>, text: &str) {
        if text.bytes().next().is_some_and(is_space) {
            self.break_word(cursor.tree_mut(), WordBreak::Space);
        }

        let mut rest = text;
        loop {
            let (word, after) = get_word(rest);
            if word.is_empty() {
                break;
            }
            let id = cursor.append(HtmlNode::Word(Word::new(word, WordKind::Text)));
            if let Some(previous) = self.pending.replace(id) {
                if let Some(fragment) = cursor
                    .tree_mut()
                    .data_mut(previous)
                    .and_then(HtmlNode::as_word_mut)
                {
                    fragment.continues = Some(id);
                }
            }
            if !after.is_empty() {
                self.break_word(cursor.tree_mut(), WordBreak::Space);
            }
            rest = after;
        }
    }

    /// One `Line` word per line of a verbatim block.
    fn push_lines(&mut self, cursor: &mut TreeCursor<'_, HtmlNode>, text: &str) {
        self.pending = None;
        let mut scratch = mem::take(&mut self.scratch);
        let decoded = self.entities.translate(text, &mut scratch);
        let body = decoded
            .strip_prefix("\r\n")
            .or_else(|| decoded.strip_prefix('\n'))
            .unwrap_or(decoded);
        let body = body.strip_suffix('\n').unwrap_or(body);

        let mut lines = body.split('\n').peekable();
        while let Some(line) = lines.next() {
            let mut word = Word::new(line.strip_suffix('\r').unwrap_or(line), WordKind::Line);
            word.space_after = lines.peek().is_some();
            let _ = cursor.append(HtmlNode::Word(word));
        }
        self.scratch = scratch;
    }
}

/// Directory part of a `<base href>`.
fn base_directory(base: &str) -> &str {
    match base.find("://") {
        Some(at) if !base[at + 3..].contains('/') => base,
        _ => split_filename(base).0,
    }
}

/// Text of the words below `id`, spaces restored.
fn text_under(tree: &Tree<HtmlNode>, id: NodeId) -> String {
    let mut text = String::new();
    for (child, _) in tree.walk_from(id) {
        if let Some(word) = tree.data(child).and_then(HtmlNode::as_word) {
            text.push_str(&word.text);
            if word.space_after {
                text.push(' ');
            }
        }
    }
    text.truncate(text.trim_end().len());
    text
}

impl TreeHooks for HtmlHooks<'_> {
    type Node = HtmlNode;

    fn begin(&mut self) {
        self.pending = None;
        self.base = None;
        self.title = None;
    }

    fn create_root(&mut self) -> HtmlNode {
        HtmlNode::Document
    }

    fn create_tag(&mut self, cursor: &mut TreeCursor<'_, HtmlNode>, name: &str) -> HtmlNode {
        let kind = self.tags.find_case(name).copied().unwrap_or_else(|| {
            warn_once("HTML Parser", &format!("unknown tag <{name}>"));
            TagKind::Unknown
        });
        self.break_word(cursor.tree_mut(), kind.info().word_break);
        HtmlNode::Tag(HtmlTag::new(kind, name))
    }

    fn name_matches(&self, node: &HtmlNode, closing: &str) -> bool {
        node.as_tag()
            .is_some_and(|tag| tag.name.eq_ignore_ascii_case(closing))
    }

    fn process_attribute(&mut self, node: &mut HtmlNode, name: &str, value: Option<&str>) {
        let Some(tag) = node.as_tag_mut() else {
            return;
        };
        let mut scratch = mem::take(&mut self.scratch);
        let value = match value {
            Some(value) => Some(self.entities.translate(value, &mut scratch)),
            None => None,
        };
        let _ = tag.attributes.apply(name, value, self.colors);
        self.scratch = scratch;
    }

    fn create_word(&mut self, text: &str, kind: TextKind) -> Option<HtmlNode> {
        let kind = match kind {
            TextKind::Body => WordKind::Text,
            TextKind::Cdata => WordKind::Cdata,
            TextKind::Raw => WordKind::Raw,
        };
        Some(HtmlNode::Word(Word::new(text, kind)))
    }

    fn insert_text(&mut self, cursor: &mut TreeCursor<'_, HtmlNode>, text: &str, kind: TextKind) {
        match kind {
            TextKind::Body => {
                let mut scratch = mem::take(&mut self.scratch);
                let decoded = self.entities.translate(text, &mut scratch);
                self.push_words(cursor, decoded);
                self.scratch = scratch;
            }
            TextKind::Raw
                if cursor
                    .tree()
                    .data(cursor.parent())
                    .and_then(HtmlNode::as_tag)
                    .is_some_and(|tag| tag.info().body_mode == BodyMode::Lines) =>
            {
                self.push_lines(cursor, text);
            }
            TextKind::Cdata | TextKind::Raw => {
                self.pending = None;
                if let Some(node) = self.create_word(text, kind) {
                    let _ = cursor.append(node);
                }
            }
        }
    }

    fn create_comment(&mut self, kind: CommentKind, text: &str) -> Option<HtmlNode> {
        self.keep_comments.then(|| {
            HtmlNode::Comment(Comment {
                kind,
                text: text.to_string(),
            })
        })
    }

    fn is_void(&self, node: &HtmlNode) -> bool {
        node.as_tag().is_some_and(|tag| tag.info().void)
    }

    fn auto_closes(&self, open: &HtmlNode, incoming: &HtmlNode) -> bool {
        let (Some(open), Some(incoming)) = (open.as_tag(), incoming.as_tag()) else {
            return false;
        };
        let closes = open.closed_by().intersects(incoming.flags());
        if closes && open.kind != incoming.kind {
            warn_once(
                "HTML Parser",
                &format!("implicitly closed <{}> at <{}>", open.name, incoming.name),
            );
        }
        closes
    }

    fn closes_at_end(&self, open: &HtmlNode) -> bool {
        open.as_tag().is_some_and(|tag| {
            !tag.closed_by().is_empty() || matches!(tag.kind, TagKind::Html | TagKind::Head | TagKind::Body)
        })
    }

    fn handle_bad_closing_tag(
        &mut self,
        open: Option<&HtmlNode>,
        closing: &str,
        open_below: bool,
    ) -> Mismatch {
        let paragraph = closing.eq_ignore_ascii_case("p");
        match open.and_then(HtmlNode::as_tag) {
            Some(tag) if !tag.closed_by().is_empty() || (paragraph && open_below) => {
                warn_once(
                    "HTML Parser",
                    &format!("implicitly closed <{}> at </{closing}>", tag.name),
                );
                Mismatch::CloseOpen
            }
            _ if paragraph => {
                warn_once("HTML Parser", "ignored dangling </p>");
                Mismatch::Ignore
            }
            _ => Mismatch::Reject,
        }
    }

    fn finish_tag(&mut self, cursor: &mut TreeCursor<'_, HtmlNode>, id: NodeId) {
        let Some(tag) = cursor.tree().data(id).and_then(HtmlNode::as_tag) else {
            return;
        };
        let kind = tag.kind;
        let word_break = tag.info().word_break;
        let href = tag.attributes.href.clone();
        let inline = match kind {
            TagKind::Img => tag.attributes.src.as_ref(),
            TagKind::Input
                if tag
                    .attributes
                    .input_type
                    .as_deref()
                    .is_some_and(|value| value.eq_ignore_ascii_case("image")) =>
            {
                tag.attributes.src.as_ref()
            }
            _ => None,
        };
        let image_ref = match (inline, &tag.attributes.background) {
            (Some(src), _) => Some((src.clone(), ImageHint::Inline)),
            (None, Some(background)) => Some((background.clone(), ImageHint::Background)),
            (None, None) => None,
        };

        self.break_word(cursor.tree_mut(), word_break);
        match kind {
            TagKind::Base => {
                if let Some(href) = href {
                    self.base = Some(self.resolve(&href));
                }
            }
            TagKind::Title => self.title = Some(text_under(cursor.tree(), id)),
            _ => {}
        }

        if let Some((href, hint)) = image_ref {
            let image = self.load_image(&href, hint);
            if let Some(tag) = cursor.tree_mut().data_mut(id).and_then(HtmlNode::as_tag_mut) {
                tag.image = image;
            }
        }
    }

    fn raw_body(&self, node: &HtmlNode) -> bool {
        node.as_tag()
            .is_some_and(|tag| tag.info().body_mode != BodyMode::Normal)
    }

    fn tag_name<'n>(&self, node: &'n HtmlNode) -> &'n str {
        node.as_tag().map_or("", |tag| tag.name.as_str())
    }
}

/// Parser for the HTML flavour.
///
/// Instances are reusable: each [`parse`](HtmlParser::parse) starts from a
/// clean state but keeps the configured tables, the image creator, the
/// filename and the scratch buffer.
#[derive(Debug)]
pub struct HtmlParser<'t> {
    builder: TreeBuilder<HtmlHooks<'t>>,
}

impl<'t> HtmlParser<'t> {
    /// Create a parser with the default tables.
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: TreeBuilder::new(HtmlHooks::new()),
        }
    }

    /// Decode entities with `entities` instead of the default table.
    #[must_use]
    pub fn with_entity_table(mut self, entities: &'t EntityTable<'t>) -> Self {
        self.builder.hooks_mut().entities = entities;
        self
    }

    /// Map tag names with `tags` instead of the default table.
    #[must_use]
    pub fn with_tag_table(mut self, tags: &'t TagTable<'t>) -> Self {
        self.builder.hooks_mut().tags = tags;
        self
    }

    /// Resolve color names with `colors` instead of the default table.
    #[must_use]
    pub fn with_color_table(mut self, colors: &'t ColorTable<'t>) -> Self {
        self.builder.hooks_mut().colors = colors;
        self
    }

    /// Set the maximum nesting depth.
    #[must_use]
    pub fn with_max_depth(self, max_depth: usize) -> Self {
        Self {
            builder: self.builder.with_max_depth(max_depth),
        }
    }

    /// Keep comment-like constructs as [`HtmlNode::Comment`] nodes.
    #[must_use]
    pub fn with_comments(mut self, keep: bool) -> Self {
        self.builder.hooks_mut().keep_comments = keep;
        self
    }

    /// Call `creator` for `img src` and `background` references.
    ///
    /// It receives the reference resolved against the document location and
    /// its result is stored on the tag.
    #[must_use]
    pub fn with_image_creator<F>(mut self, creator: F) -> Self
    where
        F: FnMut(&str, ImageHint) -> Option<LoadedImage> + 't,
    {
        self.builder.hooks_mut().image_creator = Some(Box::new(creator));
        self
    }

    /// Record the path of the document being parsed.
    pub fn set_filename(&mut self, path: &str) {
        let hooks = self.builder.hooks_mut();
        hooks.filename = Some(path.to_string());
        hooks.directory = Some(split_filename(path).0.to_string());
    }

    /// Path set with [`set_filename`](HtmlParser::set_filename).
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.builder.hooks().filename.as_deref()
    }

    /// Directory of the document.
    #[must_use]
    pub fn directory(&self) -> Option<&str> {
        self.builder.hooks().directory.as_deref()
    }

    /// `<base href>` of the last document, resolved.
    #[must_use]
    pub fn base(&self) -> Option<&str> {
        self.builder.hooks().base.as_deref()
    }

    /// Resolve a reference the way image and link references are resolved.
    #[must_use]
    pub fn resolve(&self, href: &str) -> String {
        self.builder.hooks().resolve(href)
    }

    /// Text of the `<title>` of the last document.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.builder.hooks().title.as_deref()
    }

    /// Parse `src`.
    pub fn parse(&mut self, src: &str) -> Parsed<HtmlNode> {
        self.builder.parse(src)
    }

    /// Forget the last document, keeping configuration and buffers.
    pub fn reset(&mut self) {
        self.builder.reset();
        self.builder.hooks_mut().begin();
    }
}

impl Default for HtmlParser<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `src` with a default [`HtmlParser`].
#[must_use]
pub fn parse_html(src: &str) -> Parsed<HtmlNode> {
    HtmlParser::new().parse(src)
}
