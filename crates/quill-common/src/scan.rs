//! Number and word scanning helpers shared by the tokenizers and by
//! attribute interpretation.
//!
//! Every scanner returns how many bytes it consumed so the caller can advance
//! its own cursor. Scanners that produce a value return `None` on total failure
//! and never partially update anything.

use std::ops::{BitOr, BitOrAssign};

/// Integer format policy for [`int_value`].
///
/// The base part (`DECIMAL`, `OCTAL`, `HEX`) forces a radix. The prefix flags
/// can be OR-ed together and only apply when no radix is forced: they switch
/// to octal or hexadecimal when the matching prefix is present and fall back
/// to decimal otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntFormat(u16);

impl IntFormat {
    /// Always decimal: `"010"` is ten.
    pub const DECIMAL: Self = Self(0);
    /// Always octal: `"10"` is eight.
    pub const OCTAL: Self = Self(8);
    /// Always hexadecimal: `"10"` is sixteen. A `0x` prefix is tolerated.
    pub const HEX: Self = Self(16);
    /// Octal when there is a leading `0` (`"010"` is eight, `"10"` is ten).
    pub const LEADING_ZERO: Self = Self(0x100);
    /// Hexadecimal when there is a leading `#` (colors).
    pub const HASH: Self = Self(0x200);
    /// Hexadecimal when there is a leading `0x` or `0X`.
    pub const LEADING_0X: Self = Self(0x400);
    /// Hexadecimal when there is a leading `x` or `X` (`&#x41;`).
    pub const LEADING_X: Self = Self(0x800);
    /// Every prefix interpretation; plain digits are decimal.
    pub const ALL: Self = Self(0x100 | 0x200 | 0x400 | 0x800);

    /// Raw bit representation.
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Whether every prefix flag of `other` is set in `self`.
    #[must_use]
    pub const fn allows(self, other: Self) -> bool {
        other.0 & 0xFF00 != 0 && self.0 & other.0 == other.0
    }

    const fn forced_radix(self) -> Option<u32> {
        match self.0 & 0xFF {
            8 => Some(8),
            16 => Some(16),
            _ => None,
        }
    }
}

impl Default for IntFormat {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for IntFormat {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for IntFormat {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Sign reported by [`signed_int_value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// A leading `-`.
    Minus,
    /// No sign character.
    Unsigned,
    /// A leading `+`.
    Plus,
}

impl Sign {
    /// `-1`, `0` or `1`.
    #[must_use]
    pub const fn signum(self) -> i64 {
        match self {
            Self::Minus => -1,
            Self::Unsigned => 0,
            Self::Plus => 1,
        }
    }

    /// Apply the sign to an absolute value (unsigned counts as positive).
    #[must_use]
    pub const fn apply(self, value: i64) -> i64 {
        match self {
            Self::Minus => -value,
            Self::Unsigned | Self::Plus => value,
        }
    }
}

/// Whether `b` may appear inside a tag or attribute name.
#[must_use]
pub const fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.')
}

/// Whether `b` is ASCII whitespace as far as markup is concerned.
#[must_use]
pub const fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0C')
}

/// Read an integer according to `format`.
///
/// Returns the value and the number of bytes consumed, prefix included.
/// Scanning stops at the first byte that is not a digit of the chosen radix.
/// Returns `None` when no digit could be read or the value overflows.
#[must_use]
pub fn int_value(src: &str, format: IntFormat) -> Option<(i64, usize)> {
    let bytes = src.as_bytes();
    let (radix, start) = match format.forced_radix() {
        Some(16) if has_0x_prefix(bytes) => (16, 2),
        Some(radix) => (radix, 0),
        None => detect_radix(bytes, format),
    };

    let mut value: i64 = 0;
    let mut consumed = start;
    for &b in &bytes[start..] {
        let Some(digit) = char::from(b).to_digit(radix) else {
            break;
        };
        value = value
            .checked_mul(i64::from(radix))?
            .checked_add(i64::from(digit))?;
        consumed += 1;
    }

    (consumed > start).then_some((value, consumed))
}

fn has_0x_prefix(bytes: &[u8]) -> bool {
    bytes.len() > 2 && bytes[0] == b'0' && matches!(bytes[1], b'x' | b'X') && bytes[2].is_ascii_hexdigit()
}

fn detect_radix(bytes: &[u8], format: IntFormat) -> (u32, usize) {
    let hex_at = |i: usize| bytes.get(i).is_some_and(u8::is_ascii_hexdigit);
    match bytes.first() {
        Some(b'#') if format.allows(IntFormat::HASH) && hex_at(1) => (16, 1),
        Some(b'x' | b'X') if format.allows(IntFormat::LEADING_X) && hex_at(1) => (16, 1),
        Some(b'0') if format.allows(IntFormat::LEADING_0X) && has_0x_prefix(bytes) => (16, 2),
        Some(b'0')
            if format.allows(IntFormat::LEADING_ZERO)
                && bytes.get(1).is_some_and(|b| (b'0'..=b'7').contains(b)) =>
        {
            (8, 1)
        }
        _ => (10, 0),
    }
}

/// Read an optionally signed decimal integer.
///
/// Returns the absolute value, the sign and the number of bytes consumed.
#[must_use]
pub fn signed_int_value(src: &str) -> Option<(i64, Sign, usize)> {
    let (sign, skip) = match src.as_bytes().first() {
        Some(b'-') => (Sign::Minus, 1),
        Some(b'+') => (Sign::Plus, 1),
        _ => (Sign::Unsigned, 0),
    };
    let (value, consumed) = int_value(&src[skip..], IntFormat::DECIMAL)?;
    Some((value, sign, skip + consumed))
}

/// Read a decimal floating point number.
///
/// Unlike C's `strtod` this never depends on the locale: `.` is always the
/// decimal point. Accepts an optional sign, an optional fraction and an
/// optional exponent.
#[must_use]
pub fn float_value(src: &str) -> Option<(f64, usize)> {
    let bytes = src.as_bytes();
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - end - 1;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(end + 1 + sign);
        if exp_end > end + 1 + sign {
            end = exp_end;
        }
    }

    src[..end].parse::<f64>().ok().map(|value| (value, end))
}

/// Returns `to.len()` if `src` starts with `to`, otherwise 0.
#[must_use]
pub fn substring(src: &str, to: &str) -> usize {
    if !to.is_empty() && src.as_bytes().starts_with(to.as_bytes()) {
        to.len()
    } else {
        0
    }
}

/// Like [`substring`] but ASCII case-insensitive.
#[must_use]
pub fn case_substring(src: &str, to: &str) -> usize {
    let (src, to) = (src.as_bytes(), to.as_bytes());
    if !to.is_empty() && src.len() >= to.len() && src[..to.len()].eq_ignore_ascii_case(to) {
        to.len()
    } else {
        0
    }
}

/// Like [`substring`] but only matches a complete name: the match must be
/// followed by the end of `src` or by a byte that cannot continue a name
/// (whitespace, `>`, `=`, `/`, ...).
#[must_use]
pub fn name_substring(src: &str, to: &str) -> usize {
    name_terminated(src, substring(src, to))
}

/// Like [`name_substring`] but ASCII case-insensitive.
#[must_use]
pub fn case_name_substring(src: &str, to: &str) -> usize {
    name_terminated(src, case_substring(src, to))
}

fn name_terminated(src: &str, matched: usize) -> usize {
    match src.as_bytes().get(matched) {
        _ if matched == 0 => 0,
        Some(&b) if is_name_char(b) => 0,
        _ => matched,
    }
}

/// If `word` is the first word of `src` (after optional whitespace),
/// returns the number of bytes consumed including that whitespace.
///
/// The word must be followed by the end of input or a non-alphanumeric byte.
#[must_use]
pub fn first_word_equal(src: &str, word: &str) -> usize {
    first_word_with(src, word, substring)
}

/// Like [`first_word_equal`] but ASCII case-insensitive.
#[must_use]
pub fn case_first_word_equal(src: &str, word: &str) -> usize {
    first_word_with(src, word, case_substring)
}

fn first_word_with(src: &str, word: &str, matcher: fn(&str, &str) -> usize) -> usize {
    let skip = spaces(src);
    let rest = &src[skip..];
    let matched = matcher(rest, word);
    if matched == 0 {
        return 0;
    }
    match rest.as_bytes().get(matched) {
        Some(b) if b.is_ascii_alphanumeric() => 0,
        _ => skip + matched,
    }
}

/// Split off the first whitespace-delimited word.
///
/// Leading whitespace is skipped. Returns the word and the remainder that
/// starts right after it, so a non-empty remainder means more may follow.
#[must_use]
pub fn get_word(src: &str) -> (&str, &str) {
    let rest = &src[spaces(src)..];
    let end = rest.bytes().position(is_space).unwrap_or(rest.len());
    rest.split_at(end)
}

/// Number of leading whitespace bytes.
#[must_use]
pub fn spaces(src: &str) -> usize {
    src.bytes().take_while(|&b| is_space(b)).count()
}
