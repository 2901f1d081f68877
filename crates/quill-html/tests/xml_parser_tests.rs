//! Integration tests for the strict XML flavour of the tree builder.

use quill_dom::{NodeId, Tree};
use quill_html::parser::builder::{CommentKind, StructureErrorKind};
use quill_html::parser::xml::texts;
use quill_html::{ParseError, XmlNode, XmlParser, friendly_error, parse_xml};

/// Helper returning the element names of a tree in document order
fn element_names(tree: &Tree<XmlNode>) -> Vec<&str> {
    tree.walk()
        .filter_map(|(id, _)| tree.data(id).and_then(XmlNode::name))
        .collect()
}

/// Helper returning the structural error kind of a failed parse
fn structure_kind(error: Option<&ParseError>) -> Option<StructureErrorKind> {
    match error {
        Some(ParseError::Structure(error)) => Some(error.kind),
        _ => None,
    }
}

#[test]
fn test_self_closed_element() {
    let parsed = parse_xml(r#"<x a="1"/>"#);
    assert!(parsed.is_ok());
    let tree = &parsed.tree;
    assert_eq!(tree.len(), 2);
    let element = tree.children(NodeId::ROOT)[0];
    assert!(tree.children(element).is_empty());
    assert_eq!(tree.data(element).and_then(|node| node.attribute("a")), Some("1"));
}

#[test]
fn test_nested_elements_and_text() {
    let parsed = parse_xml("<a><b>t</b><c/></a>");
    assert!(parsed.is_ok());
    assert_eq!(element_names(&parsed.tree), vec!["a", "b", "c"]);
    assert_eq!(texts(&parsed.tree), vec!["t"]);
    let a = parsed.tree.children(NodeId::ROOT)[0];
    assert_eq!(parsed.tree.children(a).len(), 2);
}

#[test]
fn test_text_is_decoded_and_cdata_kept() {
    let parsed = parse_xml("<r>a &amp; b <![CDATA[<raw>&amp;]]></r>");
    assert!(parsed.is_ok());
    assert_eq!(texts(&parsed.tree), vec!["a & b ", "<raw>&amp;"]);
}

#[test]
fn test_whitespace_only_text_is_dropped() {
    let parsed = parse_xml("<r>\n  <s/>\n</r>\n");
    assert!(parsed.is_ok());
    assert_eq!(parsed.tree.len(), 3);
}

#[test]
fn test_attributes_keep_order_and_decode() {
    let parsed = parse_xml(r#"<input disabled name='q' title="a &lt; b"/>"#);
    assert!(parsed.is_ok());
    let id = parsed.tree.children(NodeId::ROOT)[0];
    let Some(XmlNode::Element { attrs, .. }) = parsed.tree.data(id) else {
        panic!("expected an element");
    };
    assert_eq!(
        attrs,
        &vec![
            ("disabled".to_string(), None),
            ("name".to_string(), Some("q".to_string())),
            ("title".to_string(), Some("a < b".to_string())),
        ]
    );
}

#[test]
fn test_mismatched_closing_tag() {
    let parsed = parse_xml("<div><p>text</div>");
    assert_eq!(structure_kind(parsed.error.as_ref()), Some(StructureErrorKind::BadClosingTagName));
    assert_eq!(parsed.error.as_ref().map(ParseError::code), Some(2));
    assert_eq!(element_names(&parsed.tree), vec!["div", "p"]);
}

#[test]
fn test_names_are_case_sensitive() {
    let parsed = parse_xml("<A></a>");
    assert_eq!(structure_kind(parsed.error.as_ref()), Some(StructureErrorKind::BadClosingTagName));
}

#[test]
fn test_unclosed_tag_keeps_partial_tree() {
    let parsed = parse_xml("<a><b></b>");
    let Some(ParseError::Structure(error)) = &parsed.error else {
        panic!("expected a structure error");
    };
    assert_eq!(error.kind, StructureErrorKind::UnclosedTag);
    assert_eq!(error.tag, "a");
    assert_eq!(element_names(&parsed.tree), vec!["a", "b"]);
}

#[test]
fn test_closing_tag_with_nothing_open() {
    let parsed = parse_xml("text</a>");
    assert_eq!(structure_kind(parsed.error.as_ref()), Some(StructureErrorKind::BadClosingTag));
    assert_eq!(parsed.error.map(|error| error.code()), Some(1));
}

#[test]
fn test_comments_discarded_by_default() {
    let parsed = parse_xml("<!-- x --><?y?><!DOCTYPE z>");
    assert!(parsed.is_ok());
    assert_eq!(parsed.tree.len(), 1);
}

#[test]
fn test_keep_comments() {
    let parsed = XmlParser::new()
        .keep_comments(true)
        .parse("<!-- x --><?y?><!DOCTYPE z>");
    assert!(parsed.is_ok());
    let kinds: Vec<_> = parsed
        .tree
        .walk()
        .filter_map(|(id, _)| match parsed.tree.data(id) {
            Some(XmlNode::Comment { kind, text }) => Some((*kind, text.as_str())),
            _ => None,
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            (CommentKind::Comment, " x "),
            (CommentKind::Question, "y"),
            (CommentKind::Declaration, "DOCTYPE z"),
        ]
    );
}

#[test]
fn test_nesting_limit() {
    let mut parser = XmlParser::new().with_max_depth(2);
    assert!(parser.parse("<a><b></b></a>").is_ok());
    let parsed = parser.parse("<a><b><c></c></b></a>");
    assert_eq!(structure_kind(parsed.error.as_ref()), Some(StructureErrorKind::NestingTooDeep));
    assert_eq!(parsed.error.map(|error| error.code()), Some(255));
}

#[test]
fn test_syntax_error_is_reported() {
    let parsed = parse_xml("<a x=></a>");
    let Some(ParseError::Syntax(error)) = &parsed.error else {
        panic!("expected a syntax error");
    };
    assert_eq!(error.code(), -3);
    assert_eq!(element_names(&parsed.tree), vec!["a"]);
}

#[test]
fn test_parser_is_reusable() {
    let mut parser = XmlParser::default();
    assert!(parser.parse("<a>").error.is_some());
    let parsed = parser.parse("<b/>");
    assert!(parsed.is_ok());
    assert_eq!(element_names(&parsed.tree), vec!["b"]);
}

#[test]
fn test_into_result() {
    assert!(parse_xml("<a/>").into_result().is_ok());
    let error = parse_xml("</a>").into_result().err();
    assert_eq!(error.map(|error| error.to_string()), Some("Bad closing tag <a> at byte 1".to_string()));
}

#[test]
fn test_friendly_error() {
    assert_eq!(friendly_error(0), "No error");
    assert_eq!(friendly_error(1), "Bad closing tag");
    assert_eq!(friendly_error(2), "Bad closing tag name");
    assert_eq!(friendly_error(3), "Unclosed tag");
    assert_eq!(friendly_error(4), "Unfinished tag");
    assert_eq!(friendly_error(255), "Nesting too deep");
    assert_eq!(friendly_error(-4), "End of input in tag");
    assert_eq!(friendly_error(42), "Unknown error");
}

#[test]
fn test_error_codes_match_friendly_messages() {
    for src in ["</a>", "<a><b></a>", "<a>", "<1>", "<a", "<!-- x"] {
        let Some(error) = parse_xml(src).error else {
            panic!("expected an error for {src:?}");
        };
        assert_ne!(friendly_error(error.code()), "Unknown error");
    }
}
