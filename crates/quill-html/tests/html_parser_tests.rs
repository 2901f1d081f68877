//! Integration tests for the forgiving HTML flavour of the tree builder.

use std::cell::RefCell;

use quill_common::image::{ImageHint, LoadedImage};
use quill_dom::{NodeId, Tree};
use quill_html::object::{
    Align, AttrFlags, Color, HtmlTag, Length, TagKind, TagTable, default_tag_table,
};
use quill_html::parser::builder::{CommentKind, StructureErrorKind, dump_tree};
use quill_html::{
    EntityTable, HtmlNode, HtmlParser, ParseError, Word, WordKind, logical_words, parse_html,
};

/// Helper returning the tags of a tree in document order
fn tags(tree: &Tree<HtmlNode>) -> Vec<&HtmlTag> {
    tree.walk()
        .filter_map(|(id, _)| tree.data(id).and_then(HtmlNode::as_tag))
        .collect()
}

/// Helper returning the first tag of the given kind
fn find_tag(tree: &Tree<HtmlNode>, kind: TagKind) -> Option<&HtmlTag> {
    tags(tree).into_iter().find(|tag| tag.kind == kind)
}

/// Helper returning the word fragments of a tree in document order
fn words(tree: &Tree<HtmlNode>) -> Vec<&Word> {
    tree.walk()
        .filter_map(|(id, _)| tree.data(id).and_then(HtmlNode::as_word))
        .collect()
}

/// Helper returning the kinds of the children of `id`
fn child_kinds(tree: &Tree<HtmlNode>, id: NodeId) -> Vec<TagKind> {
    tree.children(id)
        .iter()
        .filter_map(|&child| tree.data(child).and_then(HtmlNode::as_tag))
        .map(|tag| tag.kind)
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
fn test_mismatched_closing_tag_closes_paragraph() {
    let parsed = parse_html("<div><p>text</div>");
    assert!(parsed.is_ok());
    let div = parsed.tree.children(NodeId::ROOT)[0];
    assert_eq!(child_kinds(&parsed.tree, div), vec![TagKind::P]);
    assert_eq!(logical_words(&parsed.tree), vec!["text"]);
}

#[test]
fn test_inline_tags_join_fragments() {
    let parsed = parse_html("a<b>c</b>d");
    assert!(parsed.is_ok());
    let fragments = words(&parsed.tree);
    assert_eq!(fragments.len(), 3);
    assert!(fragments[0].continues.is_some());
    assert!(fragments[1].continues.is_some());
    assert!(fragments[2].continues.is_none());
    assert!(fragments.iter().all(|word| !word.space_after));
    assert_eq!(logical_words(&parsed.tree), vec!["acd"]);
}

#[test]
fn test_block_tags_separate_words() {
    let parsed = parse_html("a<div>c</div>d");
    assert!(parsed.is_ok());
    let fragments = words(&parsed.tree);
    assert_eq!(fragments.len(), 3);
    assert!(fragments.iter().all(|word| word.continues.is_none()));
    assert!(fragments[0].space_after);
    assert!(fragments[1].space_after);
    assert!(!fragments[2].space_after);
    assert_eq!(logical_words(&parsed.tree), vec!["a", "c", "d"]);
}

#[test]
fn test_whitespace_splits_words() {
    let parsed = parse_html("one  two\n<i>three</i> four");
    let fragments = words(&parsed.tree);
    let texts: Vec<_> = fragments.iter().map(|word| word.text.as_str()).collect();
    assert_eq!(texts, vec!["one", "two", "three", "four"]);
    assert!(fragments[0].space_after);
    assert!(fragments[1].space_after);
    assert!(fragments[2].space_after);
    assert_eq!(logical_words(&parsed.tree), vec!["one", "two", "three", "four"]);
}

#[test]
fn test_entities_in_body_text() {
    let parsed = parse_html("caf&eacute; &lt;b&gt; &#65;&#x42;");
    assert_eq!(logical_words(&parsed.tree), vec!["caf\u{e9}", "<b>", "AB"]);
}

#[test]
fn test_list_items_close_each_other() {
    let parsed = parse_html("<ul><li>one<li>two</ul>");
    assert!(parsed.is_ok());
    let ul = parsed.tree.children(NodeId::ROOT)[0];
    assert_eq!(child_kinds(&parsed.tree, ul), vec![TagKind::Li, TagKind::Li]);
}

#[test]
fn test_table_cells_and_rows_close_implicitly() {
    let parsed = parse_html("<table><tr><td>a<td>b<tr><th>c</table>");
    assert!(parsed.is_ok());
    let table = parsed.tree.children(NodeId::ROOT)[0];
    assert_eq!(child_kinds(&parsed.tree, table), vec![TagKind::Tr, TagKind::Tr]);
    let first_row = parsed.tree.children(table)[0];
    assert_eq!(child_kinds(&parsed.tree, first_row), vec![TagKind::Td, TagKind::Td]);
    assert_eq!(logical_words(&parsed.tree), vec!["a", "b", "c"]);
}

#[test]
fn test_definition_lists() {
    let parsed = parse_html("<dl><dt>term<dd>one<dt>next<dd>two</dl>");
    assert!(parsed.is_ok());
    let dl = parsed.tree.children(NodeId::ROOT)[0];
    assert_eq!(
        child_kinds(&parsed.tree, dl),
        vec![TagKind::Dt, TagKind::Dd, TagKind::Dt, TagKind::Dd]
    );
}

#[test]
fn test_paragraph_closed_by_block() {
    let parsed = parse_html("<p>one<p>two<div>three</div>");
    assert!(parsed.is_ok());
    assert_eq!(
        child_kinds(&parsed.tree, NodeId::ROOT),
        vec![TagKind::P, TagKind::P, TagKind::Div]
    );
}

#[test]
fn test_dangling_paragraph_end_is_ignored() {
    let parsed = parse_html("text</p>more<b>x</p></b>");
    assert!(parsed.is_ok());
    assert_eq!(logical_words(&parsed.tree), vec!["textmorex"]);
}

#[test]
fn test_paragraph_end_closes_inline_tags() {
    let parsed = parse_html("<div><p>a <b>b</p>c</div>");
    assert!(parsed.is_ok());
    let div = parsed.tree.children(NodeId::ROOT)[0];
    assert_eq!(child_kinds(&parsed.tree, div), vec![TagKind::P]);
    let last = parsed.tree.children(div)[1];
    let word = parsed.tree.data(last).and_then(HtmlNode::as_word);
    assert_eq!(word.map(|word| word.text.as_str()), Some("c"));
    assert_eq!(logical_words(&parsed.tree), vec!["a", "b", "c"]);

    let parsed = parse_html("<p>x <b>y</p>");
    assert!(parsed.is_ok());
    assert_eq!(logical_words(&parsed.tree), vec!["x", "y"]);
}

#[test]
fn test_unrecoverable_structure_errors() {
    let parsed = parse_html("<b><i>x</b>");
    assert_eq!(structure_kind(parsed.error.as_ref()), Some(StructureErrorKind::BadClosingTagName));

    let parsed = parse_html("text</div>");
    assert_eq!(structure_kind(parsed.error.as_ref()), Some(StructureErrorKind::BadClosingTag));

    let parsed = parse_html("<b>bold");
    let Some(ParseError::Structure(error)) = &parsed.error else {
        panic!("expected a structure error");
    };
    assert_eq!(error.kind, StructureErrorKind::UnclosedTag);
    assert_eq!(error.tag, "b");
}

#[test]
fn test_document_tags_may_stay_open() {
    let parsed = parse_html("<html><head><title>t</title></head><body><p>text");
    assert!(parsed.is_ok());
    assert!(find_tag(&parsed.tree, TagKind::Body).is_some());
}

#[test]
fn test_names_are_case_insensitive() {
    let parsed = parse_html("<DIV><B>x</b></Div>");
    assert!(parsed.is_ok());
    let kinds: Vec<_> = tags(&parsed.tree).iter().map(|tag| tag.kind).collect();
    assert_eq!(kinds, vec![TagKind::Div, TagKind::B]);
    assert_eq!(tags(&parsed.tree)[0].name, "div");
}

#[test]
fn test_void_tags_reset_words() {
    let parsed = parse_html("a<img src=x.png>b<br>c");
    assert!(parsed.is_ok());
    let fragments = words(&parsed.tree);
    assert_eq!(fragments.len(), 3);
    assert!(fragments[0].continues.is_none());
    assert!(!fragments[0].space_after);
    assert!(fragments[1].space_after);
    assert_eq!(logical_words(&parsed.tree), vec!["a", "b", "c"]);
    assert!(tags(&parsed.tree).iter().all(|tag| tag.info().void));
    assert_eq!(parsed.tree.children(NodeId::ROOT).len(), 5);
}

#[test]
fn test_pre_keeps_lines() {
    let parsed = parse_html("<pre>\n  first &amp; line\n\tsecond <b>\n</pre>after");
    assert!(parsed.is_ok());
    let fragments = words(&parsed.tree);
    let lines: Vec<_> = fragments
        .iter()
        .filter(|word| word.kind == WordKind::Line)
        .map(|word| (word.text.as_str(), word.space_after))
        .collect();
    assert_eq!(lines, vec![("  first & line", true), ("\tsecond <b>", false)]);
    assert_eq!(fragments.last().map(|word| word.text.as_str()), Some("after"));
}

#[test]
fn test_script_body_is_raw() {
    let parsed = parse_html("<script>if (a<b) { x(\"</b>\"); }</SCRIPT>after");
    assert!(parsed.is_ok());
    let fragments = words(&parsed.tree);
    assert_eq!(fragments[0].kind, WordKind::Raw);
    assert_eq!(fragments[0].text, "if (a<b) { x(\"</b>\"); }");
    assert_eq!(logical_words(&parsed.tree), vec!["if (a<b) { x(\"</b>\"); }", "after"]);
}

#[test]
fn test_unfinished_raw_body() {
    let parsed = parse_html("<script>never closed");
    assert_eq!(structure_kind(parsed.error.as_ref()), Some(StructureErrorKind::UnfinishedTag));
    assert_eq!(parsed.error.as_ref().map(ParseError::code), Some(4));
    let Some(ParseError::Structure(error)) = &parsed.error else {
        panic!("expected a structure error");
    };
    assert_eq!(error.offset, 20);
    assert_eq!(words(&parsed.tree)[0].text, "never closed");
}

#[test]
fn test_cdata_word() {
    let parsed = parse_html("<div><![CDATA[a < b]]></div>");
    assert!(parsed.is_ok());
    let fragments = words(&parsed.tree);
    assert_eq!(fragments[0].kind, WordKind::Cdata);
    assert_eq!(fragments[0].text, "a < b");
}

#[test]
fn test_comments() {
    let src = "<!-- note -->text<!DOCTYPE html>";
    assert_eq!(parse_html(src).tree.len(), 2);

    let parsed = HtmlParser::new().with_comments(true).parse(src);
    let comments: Vec<_> = parsed
        .tree
        .walk()
        .filter_map(|(id, _)| match parsed.tree.data(id) {
            Some(HtmlNode::Comment(comment)) => Some((comment.kind, comment.text.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(
        comments,
        vec![
            (CommentKind::Comment, " note ".to_string()),
            (CommentKind::Declaration, "DOCTYPE html".to_string()),
        ]
    );
}

#[test]
fn test_presentation_attributes() {
    let parsed = parse_html(concat!(
        "<table width=50% border=1 bgcolor=\"#0f0\" cellpadding='4'>",
        "<tr><td nowrap align=CENTER valign=top colspan=2 height=20px>",
        "<font color=red size=+1 face=\"Times\">x</font>",
        "</table>",
    ));
    assert!(parsed.is_ok());
    let tree = &parsed.tree;

    let table = find_tag(tree, TagKind::Table).map(|tag| &tag.attributes);
    assert_eq!(table.and_then(|a| a.width), Some(Length::Percent(50)));
    assert_eq!(table.and_then(|a| a.border), Some(1));
    assert_eq!(table.and_then(|a| a.bgcolor), Some(Color::rgb(0, 0xff, 0)));
    assert_eq!(table.and_then(|a| a.cellpadding), Some(4));
    assert_eq!(table.and_then(|a| a.width).map(|w| w.resolve(300)), Some(150));

    let td = find_tag(tree, TagKind::Td).map(|tag| &tag.attributes);
    assert!(td.is_some_and(|a| a.flags.contains(AttrFlags::NOWRAP)));
    assert_eq!(td.and_then(|a| a.align), Some(Align::Center));
    assert_eq!(td.and_then(|a| a.valign), Some(Align::Top));
    assert_eq!(td.and_then(|a| a.colspan), Some(2));
    assert_eq!(td.and_then(|a| a.height), Some(Length::Pixels(20)));

    let font = find_tag(tree, TagKind::Font).map(|tag| &tag.attributes);
    assert_eq!(font.and_then(|a| a.color), Some(Color(0xff_0000)));
    assert_eq!(font.and_then(|a| a.size).map(|size| size.resolve(3)), Some(4));
    assert_eq!(font.and_then(|a| a.face.as_deref()), Some("Times"));
}

#[test]
fn test_length_resolution_saturates() {
    assert_eq!(Length::parse("50%").map(|w| w.resolve(300)), Some(150));
    assert_eq!(Length::Pixels(20).resolve(300), 20);
    assert_eq!(Length::Percent(u32::MAX).resolve(u32::MAX), u32::MAX);
}

#[test]
fn test_attribute_values_are_decoded() {
    let parsed = parse_html("<a href=\"?a=1&amp;b=2\" title='x &quot;y&quot;'>link</a>");
    let a = find_tag(&parsed.tree, TagKind::A).map(|tag| &tag.attributes);
    assert_eq!(a.and_then(|a| a.href.as_deref()), Some("?a=1&b=2"));
    assert_eq!(a.and_then(|a| a.title.as_deref()), Some("x \"y\""));
}

#[test]
fn test_style_attribute() {
    let parsed = parse_html("<div style=\"color: red; margin: 0 auto\">x</div>");
    let div = find_tag(&parsed.tree, TagKind::Div);
    let color = div.and_then(|tag| tag.attributes.style_value("color"));
    assert_eq!(color.map(|d| d.values.clone()), Some(vec!["red".to_string()]));
    let margin = div.and_then(|tag| tag.attributes.style_value("MARGIN"));
    assert_eq!(margin.map(|d| d.values.len()), Some(2));
}

#[test]
fn test_unknown_tags_keep_their_name() {
    let parsed = parse_html("<blink>x</BLINK>");
    assert!(parsed.is_ok());
    let tag = tags(&parsed.tree)[0];
    assert_eq!(tag.kind, TagKind::Unknown);
    assert_eq!(tag.name, "blink");
}

#[test]
fn test_custom_tag_table() {
    let mut table: TagTable<'_> = default_tag_table().clone();
    table.add("blink", TagKind::B);
    table.add("section", TagKind::Div);
    let parsed = HtmlParser::new()
        .with_tag_table(&table)
        .parse("a<section>b<blink>c</blink></section>");
    assert!(parsed.is_ok());
    let kinds: Vec<_> = tags(&parsed.tree).iter().map(|tag| tag.kind).collect();
    assert_eq!(kinds, vec![TagKind::Div, TagKind::B]);
    assert_eq!(tags(&parsed.tree)[0].name, "section");
    assert_eq!(logical_words(&parsed.tree), vec!["a", "bc"]);
}

#[test]
fn test_custom_entity_table() {
    let mut entities = EntityTable::new();
    entities.add("hearts;", "<3");
    let parsed = HtmlParser::new()
        .with_entity_table(&entities)
        .parse("I&hearts;it &amp;");
    assert_eq!(logical_words(&parsed.tree), vec!["I<3it", "&amp;"]);
}

#[test]
fn test_image_creator_receives_resolved_references() {
    let seen = RefCell::new(Vec::new());
    let mut parser = HtmlParser::new().with_image_creator(|url, hint| {
        seen.borrow_mut().push((url.to_string(), hint));
        Some(LoadedImage::sized(16, 8))
    });
    parser.set_filename("docs/page.html");
    assert_eq!(parser.filename(), Some("docs/page.html"));
    assert_eq!(parser.directory(), Some("docs"));

    let parsed = parser.parse(concat!(
        "<body background=bg.gif><img src=\"img/a.png\"><img alt=none>",
        "<input type=IMAGE src=go.png><input type=text src=no.png></body>",
    ));
    assert!(parsed.is_ok());
    assert_eq!(
        *seen.borrow(),
        vec![
            ("docs/img/a.png".to_string(), ImageHint::Inline),
            ("docs/go.png".to_string(), ImageHint::Inline),
            ("docs/bg.gif".to_string(), ImageHint::Background),
        ]
    );
    let image = find_tag(&parsed.tree, TagKind::Img).and_then(|tag| tag.image.as_ref());
    assert_eq!(image.map(|image| (image.width(), image.height())), Some((16, 8)));
    assert!(dump_tree(&parsed.tree).contains("[image 16x8]"));
}

#[test]
fn test_base_href_overrides_directory() {
    let seen = RefCell::new(Vec::new());
    let mut parser = HtmlParser::new().with_image_creator(|url, _| {
        seen.borrow_mut().push(url.to_string());
        None
    });
    parser.set_filename("local/page.html");
    let parsed = parser.parse(concat!(
        "<base href=\"http://example.com/site/index.html\">",
        "<img src=\"../logo.png\"><img src=\"/abs.png\"><img src=\"data:x\">",
    ));
    assert!(parsed.is_ok());
    assert_eq!(parser.base(), Some("http://example.com/site/index.html"));
    assert_eq!(parser.resolve("a/b.png"), "http://example.com/site/a/b.png");
    assert_eq!(
        *seen.borrow(),
        vec!["http://example.com/logo.png", "/abs.png", "data:x"]
    );
    assert!(find_tag(&parsed.tree, TagKind::Img).is_some_and(|tag| tag.image.is_none()));
}

#[test]
fn test_title_text() {
    let mut parser = HtmlParser::new();
    let parsed = parser.parse("<head><title>Hello  &amp;\nwelcome</title></head>");
    assert!(parsed.is_ok());
    assert_eq!(parser.title(), Some("Hello & welcome"));
}

#[test]
fn test_reset_and_reuse() {
    let mut parser = HtmlParser::new();
    let first = parser.parse("<title>One</title><b>open");
    assert!(first.error.is_some());
    assert_eq!(parser.title(), Some("One"));

    let second = parser.parse("<p>two");
    assert!(second.is_ok());
    assert_eq!(parser.title(), None);
    assert_eq!(logical_words(&second.tree), vec!["two"]);

    let _ = parser.parse("<base href=\"http://a/b/\"><title>Three</title>");
    parser.reset();
    assert_eq!(parser.base(), None);
    assert_eq!(parser.title(), None);
}

#[test]
fn test_nesting_limit() {
    let deep = "<div>".repeat(8);
    let parsed = HtmlParser::new().with_max_depth(4).parse(&deep);
    assert_eq!(structure_kind(parsed.error.as_ref()), Some(StructureErrorKind::NestingTooDeep));
    assert_eq!(tags(&parsed.tree).len(), 5);
}

#[test]
fn test_dump_tree_indents_by_depth() {
    let parsed = parse_html("<div>a <b>b</b></div>");
    assert_eq!(dump_tree(&parsed.tree), "<div>\n  \"a\" \u{00B7}\n  <b>\n    \"b\" \u{00B7}\n");
}
