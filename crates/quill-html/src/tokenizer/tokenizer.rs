use quill_common::scan::{case_name_substring, is_space};
use strum_macros::Display;

use super::token::{SyntaxError, SyntaxErrorKind, Token, TokenKind};

/// Where the tokenizer is relative to the tag structure.
///
/// The state survives between calls so the token loop can resume in the
/// middle of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TagState {
    /// Between tags: the next token is body text, a tag name or a comment.
    Outside,
    /// After a tag name or attribute value: expecting an attribute name,
    /// `>` or `/>`.
    InTag,
    /// After an attribute name: `=` and a value may follow.
    AfterAttributeName,
    /// A lexical error was returned; nothing more is produced.
    Failed,
}

/// Verbatim body of an opaque element, see [`MarkupTokenizer::read_raw_body`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBody<'a> {
    /// The body text, up to but not including the closing tag.
    pub text: &'a str,
    /// Whether the closing tag was found before the end of input.
    pub terminated: bool,
}

/// Pull tokenizer over borrowed HTML-like markup.
///
/// The input is never copied. A NUL byte ends it, so a buffer with a NUL
/// followed by garbage tokenizes exactly like the buffer cut at the NUL.
///
/// Tokenization is forgiving: names are loose (`[A-Za-z0-9_:.-]`), values may
/// be unquoted, attributes may have no value, and whitespace is allowed
/// around `=`. Only constructs that cannot be read at all are errors.
#[derive(Debug, Clone)]
pub struct MarkupTokenizer<'a> {
    /// The input being tokenized, cut at the first NUL.
    pub(super) input: &'a str,
    /// Current byte position in the input.
    pub(super) position: usize,
    /// Resume point inside the tag structure.
    pub(super) state: TagState,
    /// The most recently produced token.
    pub(super) last: Option<Token<'a>>,
}

impl<'a> MarkupTokenizer<'a> {
    /// Create a tokenizer over `input`.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        let mut tokenizer = Self {
            input: "",
            position: 0,
            state: TagState::Outside,
            last: None,
        };
        tokenizer.reset(input);
        tokenizer
    }

    /// Restart on new input.
    pub fn reset(&mut self, input: &'a str) {
        self.input = input.find('\0').map_or(input, |nul| &input[..nul]);
        self.position = 0;
        self.state = TagState::Outside;
        self.last = None;
    }

    /// The input as seen by the tokenizer (cut at the first NUL).
    #[must_use]
    pub const fn input(&self) -> &'a str {
        self.input
    }

    /// Current byte position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Current tag sub-state.
    #[must_use]
    pub const fn state(&self) -> TagState {
        self.state
    }

    /// Text of the last token, or `""` before the first one.
    #[must_use]
    pub fn value(&self) -> &'a str {
        self.last.map_or("", |token| token.value)
    }

    /// Byte offset of the last token.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.last.map_or(0, |token| token.offset)
    }

    /// Produce the next token.
    ///
    /// Returns `Ok(None)` at the end of input, and after an error.
    ///
    /// # Errors
    ///
    /// Returns a [`SyntaxError`] when the markup cannot be read; the
    /// tokenizer produces nothing further afterwards.
    pub fn next_token(&mut self) -> Result<Option<Token<'a>>, SyntaxError> {
        let token = loop {
            match self.state {
                TagState::Failed => return Ok(None),
                TagState::Outside => {
                    if self.at_end() {
                        return Ok(None);
                    }
                    break self.consume_outside()?;
                }
                TagState::InTag => {
                    self.skip_whitespace();
                    break self.consume_in_tag()?;
                }
                TagState::AfterAttributeName => {
                    self.skip_whitespace();
                    match self.peek() {
                        None => return Err(self.fail(SyntaxErrorKind::EofInTag, self.position)),
                        Some(b'=') => {
                            self.position += 1;
                            self.skip_whitespace();
                            break self.consume_attribute_value()?;
                        }
                        Some(_) => self.switch_to(TagState::InTag),
                    }
                }
            }
        };
        self.last = Some(token);
        Ok(Some(token))
    }

    /// Body text, a tag name or a comment-like construct.
    fn consume_outside(&mut self) -> Result<Token<'a>, SyntaxError> {
        if self.peek() != Some(b'<') {
            let start = self.position;
            self.position = self.find_from(start, "<").unwrap_or(self.input.len());
            return Ok(self.emit(TokenKind::Body, start, self.position));
        }

        if self.next_few_characters_are("<!--") {
            return self.consume_delimited(TokenKind::Comment, 4, "-->");
        }
        if self.next_few_characters_are("<![CDATA[") {
            return self.consume_delimited(TokenKind::Cdata, 9, "]]>");
        }
        if self.next_few_characters_are("<?") {
            return self.consume_delimited(TokenKind::QuestionComment, 2, "?>");
        }
        if self.next_few_characters_are("<!") {
            return self.consume_delimited(TokenKind::UnknownComment, 2, ">");
        }

        let start = self.position + 1;
        let name_start = start + usize::from(self.peek_at(1) == Some(b'/'));
        if !self.peek_at(name_start - self.position).is_some_and(is_name_start) {
            return Err(self.fail(SyntaxErrorKind::BadTagName, name_start));
        }
        self.position = name_start;
        self.consume_name();
        self.switch_to(TagState::InTag);
        Ok(self.emit(TokenKind::TagName, start, self.position))
    }

    /// `<!--`, `<![CDATA[`, `<?` and `<!` constructs: everything between
    /// the opener and `close`.
    fn consume_delimited(
        &mut self,
        kind: TokenKind,
        opener: usize,
        close: &str,
    ) -> Result<Token<'a>, SyntaxError> {
        let start = self.position + opener;
        let Some(end) = self.find_from(start, close) else {
            return Err(self.fail(SyntaxErrorKind::EofInComment, self.position));
        };
        self.position = end + close.len();
        Ok(self.emit(kind, start, end))
    }

    /// An attribute name, `>` or `/>`.
    fn consume_in_tag(&mut self) -> Result<Token<'a>, SyntaxError> {
        let start = self.position;
        match self.peek() {
            None => Err(self.fail(SyntaxErrorKind::EofInTag, start)),
            Some(b'>') => {
                self.position += 1;
                self.switch_to(TagState::Outside);
                Ok(self.emit(TokenKind::EndTag, start, self.position))
            }
            Some(b'/') if self.peek_at(1) == Some(b'>') => {
                self.position += 2;
                self.switch_to(TagState::Outside);
                Ok(self.emit(TokenKind::EndSelfClosedTag, start, self.position))
            }
            Some(b) if is_name_start(b) => {
                self.consume_name();
                self.switch_to(TagState::AfterAttributeName);
                Ok(self.emit(TokenKind::AttributeName, start, self.position))
            }
            Some(_) => Err(self.fail(SyntaxErrorKind::BadAttributeName, start)),
        }
    }

    /// The value after `=`: quoted (quotes kept) or up to whitespace or `>`.
    fn consume_attribute_value(&mut self) -> Result<Token<'a>, SyntaxError> {
        let start = self.position;
        match self.peek() {
            None => Err(self.fail(SyntaxErrorKind::EofInTag, start)),
            Some(b'>') => Err(self.fail(SyntaxErrorKind::BadAttributeValue, start)),
            Some(quote @ (b'"' | b'\'')) => {
                let close = if quote == b'"' { "\"" } else { "'" };
                let Some(end) = self.find_from(start + 1, close) else {
                    return Err(self.fail(SyntaxErrorKind::EofInTag, start));
                };
                self.position = end + 1;
                self.switch_to(TagState::InTag);
                Ok(self.emit(TokenKind::AttributeValue, start, self.position))
            }
            Some(_) => {
                while self.peek().is_some_and(|b| b != b'>' && !is_space(b)) {
                    self.position += 1;
                }
                self.switch_to(TagState::InTag);
                Ok(self.emit(TokenKind::AttributeValue, start, self.position))
            }
        }
    }

    /// Read the body of an opaque element (`script`, `pre`, ...) verbatim.
    ///
    /// Call right after the `>` of the opening tag. Scans up to, not
    /// including, the first case-insensitive `</tag_name` that is followed by
    /// a non-name byte, and leaves the tokenizer positioned on it so the
    /// closing tag is the next token. Without a closing tag the rest of the
    /// input is returned and `terminated` is `false`.
    pub fn read_raw_body(&mut self, tag_name: &str) -> RawBody<'a> {
        let start = self.position;
        let mut from = start;
        while let Some(at) = self.find_from(from, "</") {
            if case_name_substring(&self.input[at + 2..], tag_name) > 0 {
                self.position = at;
                return RawBody {
                    text: &self.input[start..at],
                    terminated: true,
                };
            }
            from = at + 2;
        }
        self.position = self.input.len();
        RawBody {
            text: &self.input[start..],
            terminated: false,
        }
    }
}

impl<'a> Iterator for MarkupTokenizer<'a> {
    type Item = Result<Token<'a>, SyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

/// Whether `b` may start a tag or attribute name.
pub(super) const fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || matches!(b, b'_' | b':')
}
