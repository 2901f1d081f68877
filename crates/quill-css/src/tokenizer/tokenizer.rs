use std::mem;

use super::token::{StyleError, StyleField, StyleToken, StyleTokenKind};

/// Pull tokenizer over an embedded style string.
///
/// Input is either a stylesheet-like list of rules (`h1, h2 { color: red }`,
/// start in [`StyleField::Selector`]) or the body of a `style=""` attribute
/// (`color: red; margin: 0 auto`, start in [`StyleField::Property`]).
/// `/* ... */` comments are skipped anywhere whitespace is allowed. A NUL
/// byte ends the input.
#[derive(Debug, Clone)]
pub struct StyleTokenizer<'a> {
    /// The input being tokenized, cut at the first NUL.
    input: &'a str,
    /// Current byte position in the input
    position: usize,
    /// Part of a rule being read.
    field: StyleField,
    /// A `,` separated the previous selector or value from the next one.
    pending_comma: bool,
    /// Values read since the current property started.
    values: usize,
    /// An error was returned; the iterator is exhausted.
    failed: bool,
}

impl<'a> StyleTokenizer<'a> {
    /// Create a tokenizer starting in `start`.
    #[must_use]
    pub fn new(input: &'a str, start: StyleField) -> Self {
        let mut tokenizer = Self {
            input: "",
            position: 0,
            field: start,
            pending_comma: false,
            values: 0,
            failed: false,
        };
        tokenizer.reset(input, start);
        tokenizer
    }

    /// Restart on new input.
    pub fn reset(&mut self, input: &'a str, start: StyleField) {
        self.input = input.find('\0').map_or(input, |nul| &input[..nul]);
        self.position = 0;
        self.field = start;
        self.pending_comma = false;
        self.values = 0;
        self.failed = false;
    }

    /// Current byte position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// The field the next token will come from.
    #[must_use]
    pub const fn field(&self) -> StyleField {
        self.field
    }

    /// Produce the next token.
    ///
    /// Returns `Ok(None)` at the end of input and after an error.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::InvalidSeparator`] on a separator that cannot
    /// appear where it is, or on an empty selector or property name.
    pub fn next_token(&mut self) -> Result<Option<StyleToken<'a>>, StyleError> {
        if self.failed {
            return Ok(None);
        }
        loop {
            self.skip_whitespace_and_comments();
            let Some(b) = self.peek() else {
                return Ok(None);
            };

            match self.field {
                StyleField::Selector => return self.consume_selector().map(Some),
                StyleField::Property => match b {
                    b';' => self.position += 1,
                    b'}' => self.end_block(),
                    _ => return self.consume_property().map(Some),
                },
                StyleField::Value => match b {
                    b';' | b'}' if self.pending_comma => return Err(self.invalid()),
                    b';' => {
                        self.position += 1;
                        self.field = StyleField::Property;
                    }
                    b'}' => self.end_block(),
                    b',' if self.pending_comma || self.values == 0 => {
                        return Err(self.invalid());
                    }
                    b',' => {
                        self.position += 1;
                        self.pending_comma = true;
                    }
                    b'{' | b':' => return Err(self.invalid()),
                    _ => return Ok(Some(self.consume_value())),
                },
            }
        }
    }

    fn end_block(&mut self) {
        self.position += 1;
        self.field = StyleField::Selector;
        self.pending_comma = false;
    }

    fn consume_selector(&mut self) -> Result<StyleToken<'a>, StyleError> {
        let start = self.position;
        while let Some(b) = self.peek() {
            match b {
                b',' | b'{' | b'}' | b';' => break,
                b'"' | b'\'' => self.skip_quoted(b),
                b'[' | b'(' => self.skip_balanced(),
                _ => self.position += 1,
            }
        }
        let text = self.input[start..self.position].trim_end();
        if text.is_empty() {
            return Err(self.invalid());
        }

        let kind = if mem::take(&mut self.pending_comma) {
            StyleTokenKind::CommaSelector
        } else {
            StyleTokenKind::Selector
        };
        match self.peek() {
            Some(b',') => {
                self.position += 1;
                self.pending_comma = true;
            }
            Some(b'{') => {
                self.position += 1;
                self.field = StyleField::Property;
            }
            _ => {}
        }
        Ok(StyleToken {
            kind,
            value: text,
            offset: start,
        })
    }

    fn consume_property(&mut self) -> Result<StyleToken<'a>, StyleError> {
        let start = self.position;
        while self
            .peek()
            .is_some_and(|b| !is_whitespace(b) && !matches!(b, b':' | b';' | b',' | b'{' | b'}' | b'"' | b'\''))
        {
            self.position += 1;
        }
        let name = &self.input[start..self.position];
        if name.is_empty() {
            return Err(self.invalid());
        }

        self.skip_whitespace_and_comments();
        if self.peek() != Some(b':') {
            return Err(self.invalid());
        }
        self.position += 1;
        self.field = StyleField::Value;
        self.pending_comma = false;
        self.values = 0;
        Ok(StyleToken {
            kind: StyleTokenKind::Property,
            value: name,
            offset: start,
        })
    }

    fn consume_value(&mut self) -> StyleToken<'a> {
        let start = self.position;
        match self.peek() {
            Some(quote @ (b'"' | b'\'')) => self.skip_quoted(quote),
            _ => {
                while let Some(b) = self.peek() {
                    match b {
                        b if is_whitespace(b) => break,
                        b',' | b';' | b'{' | b'}' => break,
                        b'(' => self.skip_balanced(),
                        b'"' | b'\'' => self.skip_quoted(b),
                        _ => self.position += 1,
                    }
                }
            }
        }

        let kind = if mem::take(&mut self.pending_comma) {
            StyleTokenKind::CommaValue
        } else {
            StyleTokenKind::Value
        };
        self.values += 1;
        StyleToken {
            kind,
            value: &self.input[start..self.position],
            offset: start,
        }
    }

    /// Skip a quoted string including both quotes; `\` escapes the next byte.
    fn skip_quoted(&mut self, quote: u8) {
        self.position += 1;
        while let Some(b) = self.peek() {
            self.position += 1;
            match b {
                b'\\' if self.position < self.input.len() => self.position += 1,
                b if b == quote => return,
                _ => {}
            }
        }
    }

    /// Skip a `(...)` or `[...]` group, nested groups and strings included.
    fn skip_balanced(&mut self) {
        let mut depth = 0usize;
        while let Some(b) = self.peek() {
            match b {
                b'(' | b'[' => {
                    depth += 1;
                    self.position += 1;
                }
                b')' | b']' => {
                    self.position += 1;
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return;
                    }
                }
                b'"' | b'\'' => self.skip_quoted(b),
                _ => self.position += 1,
            }
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.peek().is_some_and(is_whitespace) {
                self.position += 1;
            }
            if !self.input[self.position..].starts_with("/*") {
                return;
            }
            self.position = self.input[self.position + 2..]
                .find("*/")
                .map_or(self.input.len(), |end| self.position + 2 + end + 2);
        }
    }

    fn invalid(&mut self) -> StyleError {
        self.failed = true;
        StyleError::InvalidSeparator {
            offset: self.position,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.position).copied()
    }
}

impl<'a> Iterator for StyleTokenizer<'a> {
    type Item = Result<StyleToken<'a>, StyleError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

const fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0C')
}
