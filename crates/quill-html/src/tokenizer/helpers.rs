//! Helper methods for the markup tokenizer.
//!
//! This module contains the small building blocks the token loop is made of:
//! - State transitions
//! - Input lookahead and scanning
//! - Token and error emission

use quill_common::scan::{is_name_char, is_space};

use super::token::{SyntaxError, SyntaxErrorKind, Token, TokenKind};
use super::tokenizer::{MarkupTokenizer, TagState};

// =============================================================================
// State Transition Helpers
// =============================================================================

impl MarkupTokenizer<'_> {
    /// Transition to a new tag sub-state.
    pub(super) const fn switch_to(&mut self, new_state: TagState) {
        self.state = new_state;
    }

    /// Enter the failed state and build the error to return.
    pub(super) const fn fail(&mut self, kind: SyntaxErrorKind, offset: usize) -> SyntaxError {
        self.state = TagState::Failed;
        SyntaxError { kind, offset }
    }
}

// =============================================================================
// Input Helpers
// =============================================================================

impl MarkupTokenizer<'_> {
    /// Byte at the current position.
    pub(super) fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    /// Byte `offset` bytes past the current position.
    pub(super) fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.as_bytes().get(self.position + offset).copied()
    }

    /// Whether the whole input was consumed.
    pub(super) const fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Whether the input continues with exactly `target`.
    pub(super) fn next_few_characters_are(&self, target: &str) -> bool {
        self.input.as_bytes()[self.position..].starts_with(target.as_bytes())
    }

    /// Byte offset of the first `needle` at or after `from`.
    pub(super) fn find_from(&self, from: usize, needle: &str) -> Option<usize> {
        self.input
            .get(from..)
            .and_then(|rest| rest.find(needle))
            .map(|at| from + at)
    }

    /// Skip whitespace at the current position.
    pub(super) fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(is_space) {
            self.position += 1;
        }
    }

    /// Advance over a run of name bytes.
    pub(super) fn consume_name(&mut self) {
        while self.peek().is_some_and(is_name_char) {
            self.position += 1;
        }
    }
}

// =============================================================================
// Emission Helpers
// =============================================================================

impl<'a> MarkupTokenizer<'a> {
    /// Build a token covering `input[start..end]`.
    pub(super) fn emit(&self, kind: TokenKind, start: usize, end: usize) -> Token<'a> {
        Token {
            kind,
            value: &self.input[start..end],
            offset: start,
        }
    }
}
