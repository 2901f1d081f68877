//! Style token types.
//!
//! A style token is a borrowed span of the input together with its kind. The
//! kind codes are stable integers so callers that switch on raw codes keep
//! working: selector 1, property 2, value 3, and the comma flag 4 OR-ed onto
//! selector or value when the token follows a `,`.

use core::fmt;

use strum_macros::{Display, IntoStaticStr};
use thiserror::Error;

/// Which part of a rule the tokenizer is currently reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum StyleField {
    /// Selector list before `{` (stylesheet-like input).
    Selector,
    /// Property name of a declaration (inline `style=""` input).
    Property,
    /// Values after `:`.
    Value,
}

/// Kind of a [`StyleToken`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum StyleTokenKind {
    /// A selector.
    Selector,
    /// A property name.
    Property,
    /// A property value.
    Value,
    /// A selector following a `,`.
    CommaSelector,
    /// A value following a `,`.
    CommaValue,
}

impl StyleTokenKind {
    /// Bit OR-ed onto selector and value codes after a comma.
    pub const COMMA: i32 = 4;

    /// Integer code of this kind.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Selector => 1,
            Self::Property => 2,
            Self::Value => 3,
            Self::CommaSelector => Self::COMMA | 1,
            Self::CommaValue => Self::COMMA | 3,
        }
    }

    /// Whether the token follows a `,` separator.
    #[must_use]
    pub const fn is_comma(self) -> bool {
        matches!(self, Self::CommaSelector | Self::CommaValue)
    }

    /// Whether this is a (possibly comma-flagged) value.
    #[must_use]
    pub const fn is_value(self) -> bool {
        matches!(self, Self::Value | Self::CommaValue)
    }

    /// Whether this is a (possibly comma-flagged) selector.
    #[must_use]
    pub const fn is_selector(self) -> bool {
        matches!(self, Self::Selector | Self::CommaSelector)
    }
}

/// One style token: a kind and the span of the input it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleToken<'a> {
    /// What the span is.
    pub kind: StyleTokenKind,
    /// The token text. Quoted values keep their quotes.
    pub value: &'a str,
    /// Byte offset of `value` in the input.
    pub offset: usize,
}

impl<'a> StyleToken<'a> {
    /// The value with one level of matching quotes removed.
    #[must_use]
    pub fn unquoted(&self) -> &'a str {
        unquote(self.value)
    }
}

impl fmt::Display for StyleToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}:{}>", self.kind, self.value)
    }
}

/// Remove one level of matching `"` or `'` quotes.
#[must_use]
pub fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(&(open @ (b'"' | b'\''))), Some(&close)) if bytes.len() >= 2 && open == close => {
            &value[1..value.len() - 1]
        }
        _ => value,
    }
}

/// Malformed style input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StyleError {
    /// A separator (`,`, `:`, `{`, `}`, `;`) where it cannot appear, or an
    /// empty selector or property name.
    #[error("invalid separator at byte {offset}")]
    InvalidSeparator {
        /// Byte offset of the offending separator.
        offset: usize,
    },
}

impl StyleError {
    /// Integer code of the error (always negative).
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::InvalidSeparator { .. } => -1,
        }
    }

    /// Approximate byte offset of the failure.
    #[must_use]
    pub const fn offset(self) -> usize {
        match self {
            Self::InvalidSeparator { offset } => offset,
        }
    }
}
