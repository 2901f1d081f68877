//! quill command-line front end
//!
//! Parses a document with the HTML or XML flavour and prints the resulting
//! tree, optionally as JSON or preceded by the raw token stream. Exits with
//! a non-zero status when the parse reports an error; the partial tree is
//! still printed.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;
use owo_colors::OwoColorize;
use quill_common::warning::warning_count;
use quill_css::{Declaration, parse_declarations, parse_stylesheet};
use quill_dom::{NodeId, Tree};
use quill_html::object::TagAttributes;
use quill_html::parser::DEFAULT_MAX_DEPTH;
use quill_html::{
    HtmlNode, HtmlParser, MarkupTokenizer, ParseError, XmlNode, XmlParser, friendly_error,
};
use serde::Serialize;

/// quill: forgiving markup tokenizer and tree builder
#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the HTML tree of a file
    quill page.html

    # Parse inline markup and show the tokens
    quill --tokens --html 'a<b>c</b>d'

    # Strict XML flavour, as JSON
    quill --xml --json feed.xml

    # Parse a style attribute or a stylesheet
    quill --style 'color: red; margin: 0 auto'
    quill --style 'h1, h2 { color: navy }'
"#)]
struct Cli {
    /// Path to the document
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Parse markup given on the command line instead of a file
    #[arg(long, value_name = "MARKUP")]
    html: Option<String>,

    /// Use the strict XML flavour
    #[arg(long)]
    xml: bool,

    /// Print the tree as JSON
    #[arg(short, long)]
    json: bool,

    /// Print the token stream before the tree
    #[arg(short, long)]
    tokens: bool,

    /// Keep comments, processing instructions and declarations
    #[arg(short, long)]
    comments: bool,

    /// Maximum nesting depth
    #[arg(long, value_name = "DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Parse style declarations, or a stylesheet when braces are present
    #[arg(long, value_name = "STYLE")]
    style: Option<String>,
}

/// A tree node as written by `--json`.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonNode {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attributes: Vec<JsonAttribute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    space_after: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    continues: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<(u32, u32)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<JsonNode>,
}

#[derive(Serialize, Debug)]
struct JsonAttribute {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

impl JsonNode {
    const fn new(kind: &'static str) -> Self {
        Self {
            kind,
            tag_name: None,
            attributes: Vec::new(),
            content: None,
            space_after: false,
            continues: false,
            image: None,
            children: Vec::new(),
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if let Some(style) = &cli.style {
        print_style(style)?;
        if cli.path.is_none() && cli.html.is_none() {
            return Ok(ExitCode::SUCCESS);
        }
    }

    let source = load_source(&cli)?;
    if cli.tokens {
        print_tokens(&source);
    }

    let error = if cli.xml {
        let parsed = XmlParser::new()
            .keep_comments(cli.comments)
            .with_max_depth(cli.max_depth)
            .parse(&source);
        if cli.json {
            print_json(&xml_to_json(&parsed.tree, NodeId::ROOT))?;
        } else {
            print_xml(&parsed.tree);
        }
        parsed.error
    } else {
        let mut parser = HtmlParser::new()
            .with_comments(cli.comments)
            .with_max_depth(cli.max_depth);
        if let Some(path) = &cli.path {
            parser.set_filename(&path.to_string_lossy());
        }
        let parsed = parser.parse(&source);
        if cli.json {
            print_json(&html_to_json(&parsed.tree, NodeId::ROOT))?;
        } else {
            if let Some(title) = parser.title() {
                println!("{} {}", "title:".bold(), title);
            }
            print_html(&parsed.tree);
        }
        parsed.error
    };

    let warnings = warning_count();
    if warnings > 0 && !cli.json {
        eprintln!("{}", format!("{warnings} recovered problem(s)").dimmed());
    }
    Ok(report(error.as_ref()))
}

/// Read the document from `--html` or the file argument.
fn load_source(cli: &Cli) -> Result<String> {
    if let Some(markup) = &cli.html {
        Ok(markup.clone())
    } else if let Some(path) = &cli.path {
        fs::read_to_string(path).with_context(|| format!("Error reading '{}'", path.display()))
    } else {
        bail!("No input: pass a FILE or --html (see --help)")
    }
}

fn report(error: Option<&ParseError>) -> ExitCode {
    match error {
        None => ExitCode::SUCCESS,
        Some(error) => {
            eprintln!(
                "{} {error} ({}, code {})",
                "error:".red().bold(),
                friendly_error(error.code()),
                error.code()
            );
            ExitCode::FAILURE
        }
    }
}

// ===========================================================================
// Text output
// ===========================================================================

fn print_tokens(source: &str) {
    println!("{}", "=== Tokens ===".bold());
    for (i, item) in MarkupTokenizer::new(source).enumerate() {
        match item {
            Ok(token) => println!(
                "  {i:3}: {:<18} {:?} @{}",
                token.kind.to_string().yellow(),
                token.value,
                token.offset
            ),
            Err(error) => println!("  {i:3}: {}", error.to_string().red()),
        }
    }
    println!();
}

fn print_html(tree: &Tree<HtmlNode>) {
    println!("{}", "#document".bold());
    for (id, depth) in tree.walk() {
        let Some(node) = tree.data(id) else {
            continue;
        };
        let indent = "  ".repeat(depth + 1);
        match node {
            HtmlNode::Document => {}
            HtmlNode::Tag(tag) => {
                let line = match &tag.attributes.id {
                    Some(id) => format!("<{} id=\"{id}\">", tag.name),
                    None => format!("<{}>", tag.name),
                };
                print!("{indent}{}", line.cyan());
                if let Some(image) = &tag.image {
                    print!(" {}", format!("[image {}x{}]", image.width(), image.height()).magenta());
                }
                println!();
            }
            HtmlNode::Word(_) => println!("{indent}{}", node.to_string().green()),
            HtmlNode::Comment(_) => println!("{indent}{}", node.to_string().dimmed()),
        }
    }
}

fn print_xml(tree: &Tree<XmlNode>) {
    for (id, depth) in tree.walk() {
        let Some(node) = tree.data(id) else {
            continue;
        };
        let indent = "  ".repeat(depth);
        match node {
            XmlNode::Document => {}
            XmlNode::Element { .. } => println!("{indent}{}", node.to_string().cyan()),
            XmlNode::Text(_) => println!("{indent}{}", node.to_string().green()),
            XmlNode::Comment { .. } => println!("{indent}{}", node.to_string().dimmed()),
        }
    }
}

fn print_style(style: &str) -> Result<()> {
    if style.contains('{') {
        let stylesheet = parse_stylesheet(style).context("Error parsing stylesheet")?;
        println!("{}", format!("=== Rules ({}) ===", stylesheet.rules.len()).bold());
        for rule in &stylesheet.rules {
            println!("{} {{", rule.selectors.join(", ").cyan());
            for declaration in &rule.declarations {
                print_declaration("  ", declaration);
            }
            println!("}}");
        }
    } else {
        let declarations = parse_declarations(style).context("Error parsing declarations")?;
        println!("{}", format!("=== Declarations ({}) ===", declarations.len()).bold());
        for declaration in &declarations {
            print_declaration("", declaration);
        }
    }
    println!();
    Ok(())
}

fn print_declaration(indent: &str, declaration: &Declaration) {
    let important = if declaration.important { " !important" } else { "" };
    println!(
        "{indent}{}: {}{}",
        declaration.name.yellow(),
        declaration.value_text(),
        important.red()
    );
}

// ===========================================================================
// JSON output
// ===========================================================================

fn print_json(root: &JsonNode) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(root)?);
    Ok(())
}

fn html_to_json(tree: &Tree<HtmlNode>, id: NodeId) -> JsonNode {
    let mut json = match tree.data(id) {
        None | Some(HtmlNode::Document) => JsonNode::new("document"),
        Some(HtmlNode::Tag(tag)) => JsonNode {
            tag_name: Some(tag.name.clone()),
            attributes: html_attributes(&tag.attributes),
            image: tag.image.as_ref().map(|image| (image.width(), image.height())),
            ..JsonNode::new("element")
        },
        Some(HtmlNode::Word(word)) => JsonNode {
            content: Some(word.text.clone()),
            space_after: word.space_after,
            continues: word.continues.is_some(),
            ..JsonNode::new(word.kind.into())
        },
        Some(HtmlNode::Comment(comment)) => JsonNode {
            content: Some(comment.text.clone()),
            ..JsonNode::new("comment")
        },
    };
    json.children = tree
        .children(id)
        .iter()
        .map(|&child| html_to_json(tree, child))
        .collect();
    json
}

/// The attributes of a tag that were understood, rendered back to text.
fn html_attributes(attributes: &TagAttributes) -> Vec<JsonAttribute> {
    let mut out = Vec::new();
    let mut push = |name: &str, value: Option<String>| {
        if let Some(value) = value {
            out.push(JsonAttribute {
                name: name.to_string(),
                value: Some(value),
            });
        }
    };
    push("id", attributes.id.clone());
    push("class", attributes.class.clone());
    push("href", attributes.href.clone());
    push("src", attributes.src.clone());
    push("alt", attributes.alt.clone());
    push("title", attributes.title.clone());
    push("align", attributes.align.map(|align| align.to_string()));
    push("color", attributes.color.map(|color| color.to_string()));
    push("bgcolor", attributes.bgcolor.map(|color| color.to_string()));
    push("border", attributes.border.map(|border| border.to_string()));
    if !attributes.style.is_empty() {
        let style = attributes
            .style
            .iter()
            .map(|declaration| format!("{}: {}", declaration.name, declaration.value_text()))
            .collect::<Vec<_>>()
            .join("; ");
        push("style", Some(style));
    }
    out
}

fn xml_to_json(tree: &Tree<XmlNode>, id: NodeId) -> JsonNode {
    let mut json = match tree.data(id) {
        None | Some(XmlNode::Document) => JsonNode::new("document"),
        Some(XmlNode::Element { name, attrs }) => JsonNode {
            tag_name: Some(name.clone()),
            attributes: attrs
                .iter()
                .map(|(name, value)| JsonAttribute {
                    name: name.clone(),
                    value: value.clone(),
                })
                .collect(),
            ..JsonNode::new("element")
        },
        Some(XmlNode::Text(text)) => JsonNode {
            content: Some(text.clone()),
            ..JsonNode::new("text")
        },
        Some(XmlNode::Comment { kind, text }) => JsonNode {
            content: Some(text.clone()),
            ..JsonNode::new((*kind).into())
        },
    };
    json.children = tree
        .children(id)
        .iter()
        .map(|&child| xml_to_json(tree, child))
        .collect();
    json
}
