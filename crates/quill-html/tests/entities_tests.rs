//! Integration tests for the entity table and translation.

use quill_common::pair_table::Entry;
use quill_html::tokenizer::entities::{Decoded, EntityTable, default_table};
use quickcheck_macros::quickcheck;

#[test]
fn test_find_common_entities() {
    let table = default_table();
    assert_eq!(table.find("amp;"), Some(("&", 4)));
    assert_eq!(table.find("lt; rest"), Some(("<", 3)));
    assert_eq!(table.find("nbsp;"), Some(("\u{00A0}", 5)));
    assert_eq!(table.find("eacute;"), Some(("\u{00E9}", 7)));
    assert_eq!(table.find("qqq;"), None);
}

#[test]
fn test_semicolon_form_wins_over_legacy() {
    let table = default_table();
    assert_eq!(table.find("notin;"), Some(("\u{2209}", 6)));
    assert_eq!(table.find("not;"), Some(("\u{00AC}", 4)));
    assert_eq!(table.find("notit"), Some(("\u{00AC}", 3)));
    assert_eq!(table.find("amp"), Some(("&", 3)));
}

#[test]
fn test_numeric_references() {
    let table = default_table();
    assert_eq!(table.decode_reference("&#65;"), Some((Decoded::Char('A'), 5)));
    assert_eq!(table.decode_reference("&#x41;"), Some((Decoded::Char('A'), 6)));
    assert_eq!(table.decode_reference("&#X41;"), Some((Decoded::Char('A'), 6)));
    assert_eq!(table.translate_copy("&#65;&#x41;"), "AA");
}

#[test]
fn test_invalid_numeric_references_stay_literal() {
    let table = default_table();
    assert_eq!(table.decode_reference("&#65"), None);
    assert_eq!(table.decode_reference("&#xD800;"), None);
    assert_eq!(table.decode_reference("&#0;"), None);
    assert_eq!(table.decode_reference("&#99999999999;"), None);
    assert_eq!(table.translate_copy("a &#; b & c"), "a &#; b & c");
}

#[test]
fn test_translate_borrows_when_nothing_to_do() {
    let mut buffer = String::from("untouched");
    let src = "plain text";
    let out = default_table().translate(src, &mut buffer);
    assert!(std::ptr::eq(out, src));
    assert_eq!(buffer, "untouched");
}

#[test]
fn test_translate_reuses_buffer() {
    let mut buffer = String::with_capacity(64);
    let out = default_table().translate("fish &amp; chips", &mut buffer).to_string();
    assert_eq!(out, "fish & chips");
    assert_eq!(default_table().translate("&lt;b&gt;", &mut buffer), "<b>");
}

#[test]
fn test_translate_copy_reserves_slack() {
    let out = default_table().translate_copy("abc");
    assert_eq!(out, "abc");
    assert!(out.capacity() >= 4);
}

#[test]
fn test_translate_in_place() {
    let mut buf = b"a &lt; b &amp;&amp; &#233;t&eacute; &bogus;".to_vec();
    let len = default_table().translate_in_place(&mut buf);
    assert_eq!(len, buf.len());
    assert_eq!(String::from_utf8(buf).ok().as_deref(), Some("a < b && \u{e9}t\u{e9} &bogus;"));
}

#[test]
fn test_in_place_leaves_growing_entries_literal() {
    let mut table = EntityTable::new();
    table.add("x;", "a much longer replacement");
    table.add("y;", "Y");
    let mut buf = b"&x; &y;".to_vec();
    let _ = table.translate_in_place(&mut buf);
    assert_eq!(buf, b"&x; Y");
    assert_eq!(table.translate_copy("&x;"), "a much longer replacement");
}

#[test]
fn test_custom_table_overrides() {
    static EXTRA: [Entry<'static, &'static str>; 2] =
        [Entry::new("smile;", ":)"), Entry::new("amp;", "and")];
    let mut table = EntityTable::from_static(&EXTRA);
    assert_eq!(table.translate_copy("&smile; &amp; &lt;"), ":) and &lt;");
    assert_eq!(table.replace("smile;", ":D"), Some(":)"));
    table.add("lt;", "<");
    assert_eq!(table.translate_copy("&smile;&lt;"), ":D<");
    assert!(!table.table().is_borrowed());
}

#[quickcheck]
fn prop_text_without_ampersand_is_unchanged(text: String) -> bool {
    let text = text.replace('&', "");
    let mut buffer = String::new();
    default_table().translate(&text, &mut buffer) == text
        && default_table().translate_copy(&text) == text
}

#[quickcheck]
fn prop_in_place_never_grows(text: String) -> bool {
    let mut buf = text.clone().into_bytes();
    let len = default_table().translate_in_place(&mut buf);
    len == buf.len() && len <= text.len() && String::from_utf8(buf).is_ok()
}
