//! Generic tree builder.
//!
//! [`TreeBuilder`] turns the token stream into a [`Tree`] through a set of
//! [`TreeHooks`]. The hooks decide what a node is and how forgiving the
//! structure rules are; the builder owns the parent stack, attribute
//! pairing, opaque bodies and error reporting.
//!
//! A parse always returns the tree built so far. Errors come alongside it in
//! [`Parsed::error`].

use core::fmt::{self, Write as _};

use quill_dom::{NodeId, Tree};
use strum_macros::{Display, IntoStaticStr};
use thiserror::Error;

use crate::tokenizer::{MarkupTokenizer, SyntaxError, TokenKind};

/// Nesting depth used when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// What kind of text is handed to [`TreeHooks::insert_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum TextKind {
    /// Body text between tags, entities not yet decoded.
    Body,
    /// The inside of a CDATA section.
    Cdata,
    /// The verbatim body of an opaque element.
    Raw,
}

/// Comment-like constructs handed to [`TreeHooks::create_comment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum CommentKind {
    /// `<!-- ... -->`
    Comment,
    /// `<? ... ?>`
    Question,
    /// Any other `<! ... >`, DOCTYPE included.
    Declaration,
}

impl CommentKind {
    const fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Comment => Some(Self::Comment),
            TokenKind::QuestionComment => Some(Self::Question),
            TokenKind::UnknownComment => Some(Self::Declaration),
            _ => None,
        }
    }
}

/// Recovery decision for a closing tag that does not match the open tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mismatch {
    /// Report a structural error.
    Reject,
    /// Close the open tag and try the closing tag again one level up.
    CloseOpen,
    /// Drop the closing tag.
    Ignore,
}

/// A tree under construction plus the node new children are appended to.
#[derive(Debug)]
pub struct TreeCursor<'t, N> {
    tree: &'t mut Tree<N>,
    parent: NodeId,
}

impl<'t, N> TreeCursor<'t, N> {
    /// Point at `parent` in `tree`.
    #[must_use]
    pub const fn new(tree: &'t mut Tree<N>, parent: NodeId) -> Self {
        Self { tree, parent }
    }

    /// The node new children go under.
    #[must_use]
    pub const fn parent(&self) -> NodeId {
        self.parent
    }

    /// The tree being built.
    #[must_use]
    pub fn tree(&self) -> &Tree<N> {
        self.tree
    }

    /// The tree being built, mutably.
    pub fn tree_mut(&mut self) -> &mut Tree<N> {
        self.tree
    }

    /// Append `data` as the last child of the parent.
    pub fn append(&mut self, data: N) -> NodeId {
        self.tree.append(self.parent, data)
    }
}

/// Node creation and structure policy for a [`TreeBuilder`].
///
/// Only node creation and name matching are required. The defaults give a
/// strict builder: no void tags, no implicit closing, every mismatched
/// closing tag rejected, comments discarded.
pub trait TreeHooks {
    /// Payload type stored in the tree.
    type Node;

    /// Reset per-parse state. Called once at the start of every parse.
    fn begin(&mut self) {}

    /// The document root.
    fn create_root(&mut self) -> Self::Node;

    /// A node for an opening tag. `name` is as written.
    ///
    /// The node is appended by the builder after implicit closing; the
    /// cursor points at the parent it would get before that.
    fn create_tag(&mut self, cursor: &mut TreeCursor<'_, Self::Node>, name: &str) -> Self::Node;

    /// Whether the open tag `node` is closed by `</closing>`.
    fn name_matches(&self, node: &Self::Node, closing: &str) -> bool;

    /// One attribute of the tag just created. `value` has its quotes
    /// removed; `None` for an attribute written without `=`.
    fn process_attribute(&mut self, _node: &mut Self::Node, _name: &str, _value: Option<&str>) {}

    /// A node for a piece of text, or `None` to drop it.
    fn create_word(&mut self, text: &str, kind: TextKind) -> Option<Self::Node>;

    /// Add text under the cursor. The default appends one [`create_word`]
    /// node.
    ///
    /// [`create_word`]: TreeHooks::create_word
    fn insert_text(&mut self, cursor: &mut TreeCursor<'_, Self::Node>, text: &str, kind: TextKind) {
        if let Some(node) = self.create_word(text, kind) {
            let _ = cursor.append(node);
        }
    }

    /// A node for a comment-like construct, or `None` to discard it.
    fn create_comment(&mut self, _kind: CommentKind, _text: &str) -> Option<Self::Node> {
        None
    }

    /// Whether the tag never has a body (`<br>`).
    fn is_void(&self, _node: &Self::Node) -> bool {
        false
    }

    /// Whether opening `incoming` implicitly closes the open tag `open`.
    fn auto_closes(&self, _open: &Self::Node, _incoming: &Self::Node) -> bool {
        false
    }

    /// Whether `open` may be left unclosed at the end of input.
    fn closes_at_end(&self, _open: &Self::Node) -> bool {
        false
    }

    /// Decide what to do with `</closing>` when the open tag is `open`
    /// (`None` when nothing is open). `open_below` tells whether a tag
    /// further down the parent stack matches `closing`.
    fn handle_bad_closing_tag(
        &mut self,
        _open: Option<&Self::Node>,
        _closing: &str,
        _open_below: bool,
    ) -> Mismatch {
        Mismatch::Reject
    }

    /// The tag `id` is complete: closed, void or self-closed. The cursor
    /// points at its parent.
    fn finish_tag(&mut self, _cursor: &mut TreeCursor<'_, Self::Node>, _id: NodeId) {}

    /// Whether the body of `node` is read verbatim up to its closing tag.
    fn raw_body(&self, _node: &Self::Node) -> bool {
        false
    }

    /// Name of a tag node, for error messages.
    fn tag_name<'n>(&self, _node: &'n Self::Node) -> &'n str {
        ""
    }
}

/// What went wrong in a [`StructureError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum StructureErrorKind {
    /// A closing tag with nothing open.
    #[strum(to_string = "Bad closing tag")]
    BadClosingTag,
    /// A closing tag that does not match the open tag.
    #[strum(to_string = "Bad closing tag name")]
    BadClosingTagName,
    /// A tag still open at the end of input.
    #[strum(to_string = "Unclosed tag")]
    UnclosedTag,
    /// An opaque body without its closing tag.
    #[strum(to_string = "Unfinished tag")]
    UnfinishedTag,
    /// Nesting deeper than the configured maximum.
    #[strum(to_string = "Nesting too deep")]
    NestingTooDeep,
}

impl StructureErrorKind {
    /// Integer code of the error (always positive).
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::BadClosingTag => 1,
            Self::BadClosingTagName => 2,
            Self::UnclosedTag => 3,
            Self::UnfinishedTag => 4,
            Self::NestingTooDeep => 255,
        }
    }
}

/// Structural error raised after the recovery hooks declined to fix it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} <{tag}> at byte {offset}")]
pub struct StructureError {
    /// What went wrong.
    pub kind: StructureErrorKind,
    /// The tag involved, as written.
    pub tag: String,
    /// Approximate byte offset.
    pub offset: usize,
}

/// Any error a parse can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The markup could not be tokenized.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    /// The tag structure could not be repaired.
    #[error(transparent)]
    Structure(#[from] StructureError),
}

impl ParseError {
    /// Integer code: negative for lexical errors, positive for structure.
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::Syntax(error) => error.code(),
            Self::Structure(error) => error.kind.code(),
        }
    }

    /// Approximate byte offset of the failure.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            Self::Syntax(error) => error.offset,
            Self::Structure(error) => error.offset,
        }
    }
}

/// Human-readable message for an error code (`0` is success).
#[must_use]
pub const fn friendly_error(code: i32) -> &'static str {
    match code {
        0 => "No error",
        1 => "Bad closing tag",
        2 => "Bad closing tag name",
        3 => "Unclosed tag",
        4 => "Unfinished tag",
        255 => "Nesting too deep",
        -1 => "Bad tag name",
        -2 => "Bad attribute name",
        -3 => "Bad attribute value",
        -4 => "End of input in tag",
        -5 => "End of input in comment",
        _ => "Unknown error",
    }
}

/// Result of a parse: the tree built so far and the error that stopped it.
#[derive(Debug)]
pub struct Parsed<N> {
    /// The document tree. Complete when `error` is `None`.
    pub tree: Tree<N>,
    /// The first error, if any.
    pub error: Option<ParseError>,
}

impl<N> Parsed<N> {
    /// Whether the parse finished without error.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Convert into a `Result`, dropping the partial tree on error.
    ///
    /// # Errors
    ///
    /// Returns the parse error, if any.
    pub fn into_result(self) -> Result<Tree<N>, ParseError> {
        match self.error {
            None => Ok(self.tree),
            Some(error) => Err(error),
        }
    }
}

/// The tag whose attributes are being read.
#[derive(Debug, Clone, Copy)]
enum PendingTag<'a> {
    None,
    Open { id: NodeId, name: &'a str },
    Closing,
}

/// Builds a [`Tree`] from markup, see the module documentation.
#[derive(Debug)]
pub struct TreeBuilder<H> {
    hooks: H,
    max_depth: usize,
    stack: Vec<NodeId>,
}

impl<H: TreeHooks> TreeBuilder<H> {
    /// Create a builder around `hooks`.
    #[must_use]
    pub const fn new(hooks: H) -> Self {
        Self {
            hooks,
            max_depth: DEFAULT_MAX_DEPTH,
            stack: Vec::new(),
        }
    }

    /// Set the maximum nesting depth.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Maximum nesting depth.
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// The hooks.
    #[must_use]
    pub const fn hooks(&self) -> &H {
        &self.hooks
    }

    /// The hooks, mutably.
    pub const fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    /// Unwrap the hooks.
    #[must_use]
    pub fn into_hooks(self) -> H {
        self.hooks
    }

    /// Forget the open-tag stack, keeping its storage.
    pub fn reset(&mut self) {
        self.stack.clear();
    }

    /// Parse `src` into a tree.
    pub fn parse(&mut self, src: &str) -> Parsed<H::Node> {
        self.reset();
        self.hooks.begin();
        let mut tree = Tree::new(self.hooks.create_root());
        let mut tokenizer = MarkupTokenizer::new(src);
        let error = self.run(&mut tree, &mut tokenizer).err();
        Parsed { tree, error }
    }

    fn run(&mut self, tree: &mut Tree<H::Node>, tokenizer: &mut MarkupTokenizer<'_>) -> Result<(), ParseError> {
        let mut pending = PendingTag::None;
        let mut attribute: Option<&str> = None;

        while let Some(token) = tokenizer.next_token()? {
            match token.kind {
                TokenKind::TagName => {
                    if let Some(name) = token.closing_name() {
                        pending = PendingTag::Closing;
                        self.close_tag(tree, name, token.offset)?;
                    } else {
                        let id = self.open_tag(tree, token.value);
                        pending = PendingTag::Open { id, name: token.value };
                    }
                }
                TokenKind::AttributeName => {
                    if let Some(name) = attribute.replace(token.value) {
                        self.attribute(tree, pending, name, None);
                    }
                }
                TokenKind::AttributeValue => {
                    if let Some(name) = attribute.take() {
                        self.attribute(tree, pending, name, Some(token.unquoted()));
                    }
                }
                TokenKind::EndTag | TokenKind::EndSelfClosedTag => {
                    if let Some(name) = attribute.take() {
                        self.attribute(tree, pending, name, None);
                    }
                    if let PendingTag::Open { id, name } = pending {
                        if token.kind == TokenKind::EndTag {
                            self.enter_tag(tree, tokenizer, id, name)?;
                        } else {
                            self.finish(tree, id);
                        }
                    }
                    pending = PendingTag::None;
                }
                TokenKind::Body | TokenKind::Cdata => {
                    let kind = if token.kind == TokenKind::Body {
                        TextKind::Body
                    } else {
                        TextKind::Cdata
                    };
                    let mut cursor = TreeCursor::new(tree, self.current_parent());
                    self.hooks.insert_text(&mut cursor, token.value, kind);
                }
                TokenKind::Comment | TokenKind::QuestionComment | TokenKind::UnknownComment => {
                    let node = CommentKind::from_token(token.kind)
                        .and_then(|kind| self.hooks.create_comment(kind, token.value));
                    if let Some(node) = node {
                        let _ = tree.append(self.current_parent(), node);
                    }
                }
            }
        }

        self.close_at_end(tree, tokenizer.input().len())
    }

    fn current_parent(&self) -> NodeId {
        self.stack.last().copied().unwrap_or(NodeId::ROOT)
    }

    fn attribute(&mut self, tree: &mut Tree<H::Node>, pending: PendingTag<'_>, name: &str, value: Option<&str>) {
        if let PendingTag::Open { id, .. } = pending {
            if let Some(node) = tree.data_mut(id) {
                self.hooks.process_attribute(node, name, value);
            }
        }
    }

    /// Create the node for an opening tag, close what it implicitly closes
    /// and append it.
    fn open_tag(&mut self, tree: &mut Tree<H::Node>, name: &str) -> NodeId {
        let node = {
            let mut cursor = TreeCursor::new(tree, self.current_parent());
            self.hooks.create_tag(&mut cursor, name)
        };

        while let Some(&top) = self.stack.last() {
            let closes = tree
                .data(top)
                .is_some_and(|open| self.hooks.auto_closes(open, &node));
            if !closes {
                break;
            }
            let _ = self.stack.pop();
            self.finish(tree, top);
        }

        tree.append(self.current_parent(), node)
    }

    /// The `>` of an opening tag was read.
    fn enter_tag(
        &mut self,
        tree: &mut Tree<H::Node>,
        tokenizer: &mut MarkupTokenizer<'_>,
        id: NodeId,
        name: &str,
    ) -> Result<(), ParseError> {
        let (void, raw) = match tree.data(id) {
            Some(node) => (self.hooks.is_void(node), self.hooks.raw_body(node)),
            None => return Ok(()),
        };
        if void {
            self.finish(tree, id);
            return Ok(());
        }
        if self.stack.len() >= self.max_depth {
            return Err(structure(StructureErrorKind::NestingTooDeep, name, tokenizer.offset()));
        }
        self.stack.push(id);

        if raw {
            let body = tokenizer.read_raw_body(name);
            if !body.text.is_empty() {
                let mut cursor = TreeCursor::new(tree, id);
                self.hooks.insert_text(&mut cursor, body.text, TextKind::Raw);
            }
            if !body.terminated {
                let offset = MarkupTokenizer::position(tokenizer);
                return Err(structure(StructureErrorKind::UnfinishedTag, name, offset));
            }
        }
        Ok(())
    }

    /// Match `</name>` against the open tags.
    fn close_tag(&mut self, tree: &mut Tree<H::Node>, name: &str, offset: usize) -> Result<(), ParseError> {
        loop {
            let Some(&top) = self.stack.last() else {
                return match self.hooks.handle_bad_closing_tag(None, name, false) {
                    Mismatch::Reject => Err(structure(StructureErrorKind::BadClosingTag, name, offset)),
                    Mismatch::CloseOpen | Mismatch::Ignore => Ok(()),
                };
            };

            let open = tree.data(top);
            if open.is_some_and(|node| self.hooks.name_matches(node, name)) {
                let _ = self.stack.pop();
                self.finish(tree, top);
                return Ok(());
            }

            let open_below = self.stack[..self.stack.len() - 1]
                .iter()
                .any(|&id| tree.data(id).is_some_and(|node| self.hooks.name_matches(node, name)));
            match self.hooks.handle_bad_closing_tag(open, name, open_below) {
                Mismatch::CloseOpen => {
                    let _ = self.stack.pop();
                    self.finish(tree, top);
                }
                Mismatch::Ignore => return Ok(()),
                Mismatch::Reject => {
                    return Err(structure(StructureErrorKind::BadClosingTagName, name, offset));
                }
            }
        }
    }

    /// Close everything still open at the end of input.
    fn close_at_end(&mut self, tree: &mut Tree<H::Node>, offset: usize) -> Result<(), ParseError> {
        let mut unclosed = None;
        while let Some(top) = self.stack.pop() {
            if unclosed.is_none() && !tree.data(top).is_some_and(|node| self.hooks.closes_at_end(node)) {
                unclosed = Some(top);
            }
            self.finish(tree, top);
        }
        match unclosed {
            None => Ok(()),
            Some(id) => {
                let tag = tree
                    .data(id)
                    .map(|node| self.hooks.tag_name(node).to_string())
                    .unwrap_or_default();
                Err(StructureError {
                    kind: StructureErrorKind::UnclosedTag,
                    tag,
                    offset,
                }
                .into())
            }
        }
    }

    fn finish(&mut self, tree: &mut Tree<H::Node>, id: NodeId) {
        let parent = tree.parent(id).unwrap_or(NodeId::ROOT);
        let mut cursor = TreeCursor::new(tree, parent);
        self.hooks.finish_tag(&mut cursor, id);
    }
}

fn structure(kind: StructureErrorKind, tag: &str, offset: usize) -> ParseError {
    ParseError::Structure(StructureError {
        kind,
        tag: tag.to_string(),
        offset,
    })
}

/// Render a tree as indented lines, one node per line.
#[must_use]
pub fn dump_tree<N: fmt::Display>(tree: &Tree<N>) -> String {
    let mut out = String::new();
    for (id, depth) in tree.walk() {
        if let Some(data) = tree.data(id) {
            let _ = writeln!(out, "{:indent$}{data}", "", indent = depth * 2);
        }
    }
    out
}

/// Print a tree to stdout, see [`dump_tree`].
pub fn print_tree<N: fmt::Display>(tree: &Tree<N>) {
    print!("{}", dump_tree(tree));
}
