//! Style parser module.

/// Property grouping and owned declaration/rule parsing.
#[allow(clippy::module_inception)]
pub mod parser;

pub use parser::{
    Declaration, Property, Rule, Stylesheet, parse_declarations, parse_inline, parse_stylesheet,
};
