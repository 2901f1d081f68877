//! Style parser: groups style tokens into properties and rules.
//!
//! [`parse_inline`] is the allocation-free core. It reuses one caller-owned
//! [`Property`] record and hands it to a callback once per property. The
//! owned helpers ([`parse_declarations`], [`parse_stylesheet`]) are built on
//! the same token stream.

use quill_common::warning::warn_once;

use crate::tokenizer::{StyleError, StyleField, StyleTokenKind, StyleTokenizer, unquote};

/// Reusable `(property, values, commas)` record filled by [`parse_inline`].
///
/// The record holds at most `capacity` values. Values beyond that are
/// dropped with a warning; the storage never grows past the capacity chosen
/// by the caller.
#[derive(Debug, Clone)]
pub struct Property<'a> {
    name: &'a str,
    values: Vec<&'a str>,
    commas: Vec<bool>,
    capacity: usize,
}

impl<'a> Property<'a> {
    /// Default number of values a record holds.
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Create a record holding up to [`Property::DEFAULT_CAPACITY`] values.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a record holding up to `capacity` values.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            name: "",
            values: Vec::with_capacity(capacity),
            commas: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Property name, as written.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// Values in source order. Quoted values keep their quotes.
    #[must_use]
    pub fn values(&self) -> &[&'a str] {
        &self.values
    }

    /// For each value, whether a `,` separated it from the previous one.
    #[must_use]
    pub fn commas(&self) -> &[bool] {
        &self.commas
    }

    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no value was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Maximum number of values.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Start a new property, keeping the storage.
    pub fn clear(&mut self, name: &'a str) {
        self.name = name;
        self.values.clear();
        self.commas.clear();
    }

    /// Record a value. Returns `false` when the record is full and the value
    /// was dropped.
    pub fn add(&mut self, value: &'a str, comma: bool) -> bool {
        if self.values.len() >= self.capacity {
            warn_once(
                "Style Parser",
                &format!(
                    "dropped value '{value}' of '{}': more than {} values",
                    self.name, self.capacity
                ),
            );
            return false;
        }
        self.values.push(value);
        self.commas.push(comma);
        true
    }
}

impl Default for Property<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an inline declaration list (`color: red; font: 12px a, b`).
///
/// `callback` is invoked once per property with the record filled in. Tokens
/// from a selector part (input such as `} h1 {`) are skipped.
///
/// # Errors
///
/// Returns the tokenizer's [`StyleError`]. Properties completed before the
/// error have already been reported; the property being read when the error
/// occurred is reported too if it had at least one value.
pub fn parse_inline<'a, F>(
    src: &'a str,
    property: &mut Property<'a>,
    mut callback: F,
) -> Result<(), StyleError>
where
    F: FnMut(&Property<'a>),
{
    let mut tokenizer = StyleTokenizer::new(src, StyleField::Property);
    let mut open = false;
    property.clear("");

    loop {
        match tokenizer.next_token() {
            Ok(Some(token)) => match token.kind {
                StyleTokenKind::Property => {
                    if open {
                        callback(property);
                    }
                    property.clear(token.value);
                    open = true;
                }
                StyleTokenKind::Value | StyleTokenKind::CommaValue => {
                    if open {
                        let _ = property.add(token.value, token.kind.is_comma());
                    }
                }
                StyleTokenKind::Selector | StyleTokenKind::CommaSelector => {
                    if open {
                        callback(property);
                        open = false;
                    }
                }
            },
            Ok(None) => {
                if open {
                    callback(property);
                }
                return Ok(());
            }
            Err(error) => {
                if open && !property.is_empty() {
                    callback(property);
                }
                return Err(error);
            }
        }
    }
}

const IMPORTANT: &str = "!important";

/// An owned declaration, as stored on parsed tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// The property name, ASCII-lowercased.
    pub name: String,
    /// The values in source order. Quoted values keep their quotes.
    pub values: Vec<String>,
    /// For each value, whether a `,` preceded it.
    pub commas: Vec<bool>,
    /// Whether the declaration ended with `!important`.
    pub important: bool,
}

impl Declaration {
    /// Copy a filled [`Property`] record, splitting off `!important`.
    #[must_use]
    pub fn from_property(property: &Property<'_>) -> Self {
        let mut values: Vec<String> = property.values().iter().map(|v| (*v).to_string()).collect();
        let mut commas = property.commas().to_vec();
        let mut important = false;

        if let Some(last) = values.last_mut() {
            let marker = last
                .len()
                .checked_sub(IMPORTANT.len())
                .filter(|&at| last.is_char_boundary(at) && last[at..].eq_ignore_ascii_case(IMPORTANT));
            if let Some(at) = marker {
                important = true;
                last.truncate(at);
                if last.is_empty() {
                    let _ = values.pop();
                    let _ = commas.pop();
                }
            }
        }

        Self {
            name: property.name().to_ascii_lowercase(),
            values,
            commas,
            important,
        }
    }

    /// First value with quotes removed.
    #[must_use]
    pub fn first_value(&self) -> Option<&str> {
        self.values.first().map(|v| unquote(v))
    }

    /// All values joined back into text (`12px a, b`).
    #[must_use]
    pub fn value_text(&self) -> String {
        let mut text = String::new();
        for (i, (value, &comma)) in self.values.iter().zip(&self.commas).enumerate() {
            if comma {
                text.push(',');
            }
            if i > 0 {
                text.push(' ');
            }
            text.push_str(value);
        }
        text
    }
}

/// Parse an inline declaration list into owned declarations.
///
/// # Errors
///
/// Returns the first [`StyleError`]; declarations read before it are lost.
/// Use [`parse_inline`] for best-effort results.
pub fn parse_declarations(src: &str) -> Result<Vec<Declaration>, StyleError> {
    let mut declarations = Vec::new();
    let mut property = Property::new();
    parse_inline(src, &mut property, |p| declarations.push(Declaration::from_property(p)))?;
    Ok(declarations)
}

/// One `selectors { declarations }` rule.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rule {
    /// The comma-separated selectors, trimmed.
    pub selectors: Vec<String>,
    /// The declarations of the block.
    pub declarations: Vec<Declaration>,
}

/// A parsed list of rules.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stylesheet {
    /// Rules in source order.
    pub rules: Vec<Rule>,
}

/// Parse stylesheet-like input (`h1, h2 { color: red } p { margin: 0 }`).
///
/// # Errors
///
/// Returns the first [`StyleError`].
pub fn parse_stylesheet(src: &str) -> Result<Stylesheet, StyleError> {
    let mut tokenizer = StyleTokenizer::new(src, StyleField::Selector);
    let mut property = Property::new();
    let mut open = false;
    let mut rules = Vec::new();
    let mut rule = Rule::default();

    while let Some(token) = tokenizer.next_token()? {
        match token.kind {
            StyleTokenKind::Selector | StyleTokenKind::CommaSelector => {
                if open {
                    rule.declarations.push(Declaration::from_property(&property));
                    open = false;
                }
                if token.kind == StyleTokenKind::Selector && !rule.selectors.is_empty() {
                    rules.push(std::mem::take(&mut rule));
                }
                rule.selectors.push(token.value.to_string());
            }
            StyleTokenKind::Property => {
                if open {
                    rule.declarations.push(Declaration::from_property(&property));
                }
                property.clear(token.value);
                open = true;
            }
            StyleTokenKind::Value | StyleTokenKind::CommaValue => {
                let _ = property.add(token.value, token.kind.is_comma());
            }
        }
    }

    if open {
        rule.declarations.push(Declaration::from_property(&property));
    }
    if !rule.selectors.is_empty() || !rule.declarations.is_empty() {
        rules.push(rule);
    }
    Ok(Stylesheet { rules })
}
