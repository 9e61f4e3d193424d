//! Lenient HTML parsing via html5ever, converted into the owned tree.
//!
//! html5ever applies browser-grade error recovery, so malformed markup is
//! corrected rather than rejected; the only hard failure is the byte source.

use std::io::Cursor;

use html5ever::tendril::TendrilSink;
use html5ever::{local_name, namespace_url, ns, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use tracing::debug;

use crate::error::DomResult;
use crate::tree::{Document, Element, Node};

/// Parse UTF-8 bytes into a [`Document`].
pub fn parse_document(bytes: &[u8]) -> DomResult<Document> {
    debug!(len = bytes.len(), "parsing document");
    let mut cursor = Cursor::new(bytes);
    let dom = html5ever::parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .read_from(&mut cursor)?;

    let mut document = Document::default();
    for child in dom.document.children.borrow().iter() {
        if let NodeData::Doctype { name, .. } = &child.data {
            document.doctype = Some(name.to_string());
        } else if let Some(node) = convert(child) {
            document.children.push(node);
        }
    }
    Ok(document)
}

/// Parse a string as a body-context fragment and return the resulting nodes.
pub fn parse_fragment(html: &str) -> Vec<Node> {
    let dom = html5ever::parse_fragment(
        RcDom::default(),
        ParseOpts::default(),
        QualName::new(None, ns!(html), local_name!("body")),
        Vec::new(),
    )
    .one(html);

    // html5ever wraps fragment output in a synthetic <html> element.
    let children = dom.document.children.borrow();
    let Some(root) = children
        .iter()
        .find(|h| matches!(h.data, NodeData::Element { .. }))
    else {
        return Vec::new();
    };
    let nodes = root.children.borrow();
    nodes.iter().filter_map(convert).collect()
}

fn convert(handle: &Handle) -> Option<Node> {
    match &handle.data {
        NodeData::Element { name, attrs, .. } => {
            let mut el = Element::new(name.local.as_ref());
            for attr in attrs.borrow().iter() {
                el.set_attr(attr.name.local.as_ref(), &attr.value);
            }
            for child in handle.children.borrow().iter() {
                if let Some(node) = convert(child) {
                    el.children.push(node);
                }
            }
            Some(Node::Element(el))
        }
        NodeData::Text { contents } => Some(Node::Text(contents.borrow().to_string())),
        NodeData::Comment { contents } => Some(Node::Comment(contents.to_string())),
        // Doctype is handled at the document level; processing instructions
        // and the document node itself have no place in the owned tree.
        _ => None,
    }
}
