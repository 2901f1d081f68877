//! Integration tests for the style parser.

use quill_css::{Declaration, Property, parse_declarations, parse_inline, parse_stylesheet};

/// Helper collecting `(property, values, commas)` from `parse_inline`
fn collect(src: &str) -> Vec<(String, Vec<String>, Vec<bool>)> {
    let mut property = Property::new();
    let mut out = Vec::new();
    let _ = parse_inline(src, &mut property, |p| {
        out.push((
            p.name().to_string(),
            p.values().iter().map(|v| (*v).to_string()).collect(),
            p.commas().to_vec(),
        ));
    });
    out
}

#[test]
fn test_parse_inline_groups_values() {
    let props = collect("margin: 0 auto; font-family: a, b");
    assert_eq!(props.len(), 2);
    assert_eq!(props[0].0, "margin");
    assert_eq!(props[0].1, vec!["0", "auto"]);
    assert_eq!(props[0].2, vec![false, false]);
    assert_eq!(props[1].0, "font-family");
    assert_eq!(props[1].1, vec!["a", "b"]);
    assert_eq!(props[1].2, vec![false, true]);
}

#[test]
fn test_parse_inline_property_without_value() {
    let props = collect("color:; width: 1px");
    assert_eq!(props.len(), 2);
    assert!(props[0].1.is_empty());
}

#[test]
fn test_parse_inline_reports_partial_on_error() {
    let mut property = Property::new();
    let mut names = Vec::new();
    let result = parse_inline("a: 1; b: 2,, 3", &mut property, |p| names.push(p.name()));
    assert!(result.is_err());
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn test_capacity_drops_excess_values() {
    let mut property = Property::with_capacity(2);
    let mut seen = Vec::new();
    parse_inline("margin: 1 2 3 4", &mut property, |p| seen.push(p.len())).unwrap();
    assert_eq!(seen, vec![2]);
    assert_eq!(property.capacity(), 2);
    assert_eq!(property.values(), &["1", "2"]);
}

#[test]
fn test_parse_declarations_important() {
    let decls = parse_declarations("COLOR: red !important; width: 5px!IMPORTANT; x: y").unwrap();
    assert_eq!(decls.len(), 3);
    assert_eq!(decls[0].name, "color");
    assert_eq!(decls[0].values, vec!["red"]);
    assert!(decls[0].important);
    assert_eq!(decls[1].values, vec!["5px"]);
    assert!(decls[1].important);
    assert!(!decls[2].important);
}

#[test]
fn test_declaration_helpers() {
    let decls = parse_declarations("font-family: 'Times New Roman', serif").unwrap();
    let decl: &Declaration = &decls[0];
    assert_eq!(decl.first_value(), Some("Times New Roman"));
    assert_eq!(decl.value_text(), "'Times New Roman', serif");
}

#[test]
fn test_parse_declarations_error() {
    assert!(parse_declarations("color red").is_err());
}

#[test]
fn test_parse_stylesheet() {
    let sheet = parse_stylesheet("h1, h2 { color: red; margin: 0 } p {} em { font-style: italic }").unwrap();
    assert_eq!(sheet.rules.len(), 3);
    assert_eq!(sheet.rules[0].selectors, vec!["h1", "h2"]);
    assert_eq!(sheet.rules[0].declarations.len(), 2);
    assert_eq!(sheet.rules[1].selectors, vec!["p"]);
    assert!(sheet.rules[1].declarations.is_empty());
    assert_eq!(sheet.rules[2].declarations[0].name, "font-style");
}

#[test]
fn test_parse_empty_stylesheet() {
    assert!(parse_stylesheet("  /* nothing */ ").unwrap().rules.is_empty());
}
