//! Integration tests for the scanning helpers.

use quill_common::scan::{
    IntFormat, Sign, case_first_word_equal, case_name_substring, case_substring, first_word_equal,
    float_value, get_word, int_value, is_name_char, name_substring, signed_int_value, spaces,
    substring,
};
use quickcheck_macros::quickcheck;

#[test]
fn test_decimal_int() {
    assert_eq!(int_value("123abc", IntFormat::DECIMAL), Some((123, 3)));
    assert_eq!(int_value("010", IntFormat::DECIMAL), Some((10, 3)));
    assert_eq!(int_value("abc", IntFormat::DECIMAL), None);
    assert_eq!(int_value("", IntFormat::ALL), None);
}

#[test]
fn test_forced_radix() {
    assert_eq!(int_value("10", IntFormat::OCTAL), Some((8, 2)));
    assert_eq!(int_value("19", IntFormat::OCTAL), Some((1, 1)));
    assert_eq!(int_value("ff", IntFormat::HEX), Some((255, 2)));
    assert_eq!(int_value("0x1F", IntFormat::HEX), Some((31, 4)));
}

#[test]
fn test_prefix_detection() {
    assert_eq!(int_value("#ff8000", IntFormat::HASH), Some((0xFF_8000, 7)));
    assert_eq!(int_value("x41;", IntFormat::LEADING_X), Some((0x41, 3)));
    assert_eq!(int_value("X41;", IntFormat::LEADING_X), Some((0x41, 3)));
    assert_eq!(int_value("0x41", IntFormat::LEADING_0X), Some((0x41, 4)));
    assert_eq!(int_value("017", IntFormat::LEADING_ZERO), Some((15, 3)));
    assert_eq!(int_value("17", IntFormat::LEADING_ZERO), Some((17, 2)));
}

#[test]
fn test_prefix_not_allowed_falls_back_to_decimal() {
    assert_eq!(int_value("#ff", IntFormat::LEADING_X), None);
    assert_eq!(int_value("0x41", IntFormat::DECIMAL), Some((0, 1)));
    assert_eq!(int_value("017", IntFormat::HASH), Some((17, 3)));
}

#[test]
fn test_combined_formats() {
    let format = IntFormat::HASH | IntFormat::LEADING_X;
    assert_eq!(int_value("#10", format), Some((16, 3)));
    assert_eq!(int_value("x10", format), Some((16, 3)));
    assert_eq!(int_value("10", format), Some((10, 2)));
    assert_eq!(IntFormat::default(), IntFormat::ALL);
}

#[test]
fn test_overflow_is_failure() {
    assert_eq!(int_value("99999999999999999999999", IntFormat::DECIMAL), None);
}

#[test]
fn test_signed_int() {
    assert_eq!(signed_int_value("-12px"), Some((12, Sign::Minus, 3)));
    assert_eq!(signed_int_value("+3"), Some((3, Sign::Plus, 2)));
    assert_eq!(signed_int_value("7"), Some((7, Sign::Unsigned, 1)));
    assert_eq!(signed_int_value("-"), None);
    assert_eq!(Sign::Minus.apply(5), -5);
    assert_eq!(Sign::Unsigned.signum(), 0);
}

#[test]
fn test_float() {
    assert_eq!(float_value("1.5em"), Some((1.5, 3)));
    assert_eq!(float_value("-.25"), Some((-0.25, 4)));
    assert_eq!(float_value("2e3x"), Some((2000.0, 3)));
    assert_eq!(float_value("3.e"), Some((3.0, 2)));
    assert_eq!(float_value("."), None);
    assert_eq!(float_value("e5"), None);
}

#[test]
fn test_substrings() {
    assert_eq!(substring("href=x", "href"), 4);
    assert_eq!(substring("HREF=x", "href"), 0);
    assert_eq!(case_substring("HREF=x", "href"), 4);
    assert_eq!(case_substring("hr", "href"), 0);
    assert_eq!(substring("abc", ""), 0);
}

#[test]
fn test_name_substrings() {
    assert_eq!(name_substring("img src", "img"), 3);
    assert_eq!(name_substring("imgx", "img"), 0);
    assert_eq!(name_substring("img", "img"), 3);
    assert_eq!(case_name_substring("IMG>", "img"), 3);
    assert!(is_name_char(b':'));
    assert!(!is_name_char(b'>'));
}

#[test]
fn test_first_word() {
    assert_eq!(first_word_equal("  solid 1px", "solid"), 7);
    assert_eq!(first_word_equal("solidly", "solid"), 0);
    assert_eq!(first_word_equal("solid-x", "solid"), 5);
    assert_eq!(case_first_word_equal("\tNONE", "none"), 5);
}

#[test]
fn test_get_word_and_spaces() {
    assert_eq!(get_word("  one two"), ("one", " two"));
    assert_eq!(get_word("last"), ("last", ""));
    assert_eq!(get_word("   "), ("", ""));
    assert_eq!(spaces(" \t\nx"), 3);
}

#[quickcheck]
fn prop_decimal_roundtrip(n: u32) -> bool {
    let text = n.to_string();
    int_value(&text, IntFormat::DECIMAL) == Some((i64::from(n), text.len()))
}
