//! Owned HTML tree for glosa.
//!
//! This crate is the HTML side of the bilingual merge tool: it turns bytes
//! into a navigable, mutable element tree and turns the tree back into HTML
//! text. Parsing rides on `html5ever`, so real-world markup with unclosed
//! tags and other defects is auto-corrected the way browsers do it.
//!
//! # Modules
//!
//! - [`tree`] — [`Document`], [`Element`], and [`Node`] with the mutation API
//! - [`parse`] — lenient document and fragment parsing
//! - [`serialize`] — compact HTML output
//! - [`error`] — [`DomError`]

pub mod error;
pub mod parse;
pub mod serialize;
pub mod tree;

pub use error::{DomError, DomResult};
pub use parse::{parse_document, parse_fragment};
pub use serialize::{document_to_html, element_to_html};
pub use tree::{Document, Element, Node};
