use core::fmt;

use strum_macros::{Display, IntoStaticStr};
use thiserror::Error;

/// Kind of a markup [`Token`].
///
/// Codes match the integers callers have always switched on: tag name 1
/// through unknown comment 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum TokenKind {
    /// A tag name, with a leading `/` for closing tags.
    TagName,
    /// An attribute name inside a tag.
    AttributeName,
    /// An attribute value. Quoted values keep their quotes.
    AttributeValue,
    /// The `>` that ends a tag.
    EndTag,
    /// The `/>` that ends a self-closed tag.
    EndSelfClosedTag,
    /// Text between tags, verbatim.
    Body,
    /// The inside of `<!-- ... -->`.
    Comment,
    /// The inside of `<![CDATA[ ... ]]>`.
    Cdata,
    /// The inside of `<? ... ?>`.
    QuestionComment,
    /// The inside of any other `<! ... >`, such as a DOCTYPE.
    UnknownComment,
}

impl TokenKind {
    /// Integer code of this kind.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::TagName => 1,
            Self::AttributeName => 2,
            Self::AttributeValue => 3,
            Self::EndTag => 4,
            Self::EndSelfClosedTag => 5,
            Self::Body => 6,
            Self::Comment => 7,
            Self::Cdata => 8,
            Self::QuestionComment => 9,
            Self::UnknownComment => 10,
        }
    }

    /// Whether this kind is one of the comment-like constructs.
    #[must_use]
    pub const fn is_comment(self) -> bool {
        matches!(
            self,
            Self::Comment | Self::QuestionComment | Self::UnknownComment
        )
    }
}

/// One markup token: a kind and the span of the input it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// What the span is.
    pub kind: TokenKind,
    /// The token text, borrowed from the input.
    pub value: &'a str,
    /// Byte offset of `value` in the input.
    pub offset: usize,
}

impl<'a> Token<'a> {
    /// The value with one level of matching `"` or `'` quotes removed.
    #[must_use]
    pub fn unquoted(&self) -> &'a str {
        let bytes = self.value.as_bytes();
        match (bytes.first(), bytes.last()) {
            (Some(&(open @ (b'"' | b'\''))), Some(&close)) if bytes.len() >= 2 && open == close => {
                &self.value[1..self.value.len() - 1]
            }
            _ => self.value,
        }
    }

    /// For a closing tag name (`/div`), the name without the slash.
    #[must_use]
    pub fn closing_name(&self) -> Option<&'a str> {
        match self.kind {
            TokenKind::TagName => self.value.strip_prefix('/'),
            _ => None,
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}:{}>", self.kind, self.value)
    }
}

/// What went wrong in a [`SyntaxError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum SyntaxErrorKind {
    /// `<` not followed by a valid tag name.
    #[strum(to_string = "bad tag name")]
    BadTagName,
    /// A byte inside a tag that cannot start an attribute name.
    #[strum(to_string = "bad attribute name")]
    BadAttributeName,
    /// `=` not followed by a value.
    #[strum(to_string = "bad attribute value")]
    BadAttributeValue,
    /// The input ended inside a tag or a quoted value.
    #[strum(to_string = "end of input in tag")]
    EofInTag,
    /// The input ended inside a comment, CDATA section or declaration.
    #[strum(to_string = "end of input in comment")]
    EofInComment,
}

impl SyntaxErrorKind {
    /// Integer code of the error (always negative).
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::BadTagName => -1,
            Self::BadAttributeName => -2,
            Self::BadAttributeValue => -3,
            Self::EofInTag => -4,
            Self::EofInComment => -5,
        }
    }
}

/// Lexical error. Tokenization stops at the first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} at byte {offset}")]
pub struct SyntaxError {
    /// What went wrong.
    pub kind: SyntaxErrorKind,
    /// Approximate byte offset of the failure.
    pub offset: usize,
}

impl SyntaxError {
    /// Integer code of the error (always negative).
    #[must_use]
    pub const fn code(&self) -> i32 {
        self.kind.code()
    }
}
