//! Common utilities for the quill markup engine.
//!
//! This crate provides shared infrastructure used by all quill components:
//! - **Warning System** - deduplicated colored diagnostics for recovered problems
//! - **Pair Table** - newest-first name → value lookup (entities, tags, colors)
//! - **Scanning** - number and word scanners used by tokenizers and attributes
//! - **URL** - resolution of document-relative references
//! - **Image** - handles returned by the caller's image creator

pub mod image;
pub mod pair_table;
pub mod scan;
pub mod url;
pub mod warning;

pub use image::{ImageHint, LoadedImage};
pub use pair_table::{Entry, PairTable};
