//! Compact HTML serialization for the owned tree.
//!
//! Output is written exactly as the tree stands: no pretty-printing, no
//! attribute reordering. Void elements render self-closed (`<br/>`).

use crate::tree::{Document, Element, Node};

/// Tags that never have content and take no closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta",
    "param", "source", "track", "wbr",
];

/// Tags whose text content is raw and must not be entity-escaped.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Serialize a full document, emitting the doctype when present.
pub fn document_to_html(doc: &Document) -> String {
    let mut out = String::new();
    if let Some(name) = &doc.doctype {
        out.push_str("<!DOCTYPE ");
        out.push_str(name);
        out.push_str(">\n");
    }
    for child in &doc.children {
        write_node(child, false, &mut out);
    }
    out
}

/// Serialize an element, tag included.
pub fn element_to_html(el: &Element) -> String {
    let mut out = String::new();
    write_element(el, &mut out);
    out
}

/// Serialize an element's children only.
pub fn inner_html(el: &Element) -> String {
    let mut out = String::new();
    let raw = RAW_TEXT_ELEMENTS.contains(&el.tag());
    for child in &el.children {
        write_node(child, raw, &mut out);
    }
    out
}

fn write_node(node: &Node, raw_text: bool, out: &mut String) {
    match node {
        Node::Element(el) => write_element(el, out),
        Node::Text(text) => {
            if raw_text {
                out.push_str(text);
            } else {
                escape_text(text, out);
            }
        }
        Node::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
    }
}

fn write_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(el.tag());
    for (name, value) in el.attrs() {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_attr(value, out);
        out.push('"');
    }
    if VOID_ELEMENTS.contains(&el.tag()) && el.children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    let raw = RAW_TEXT_ELEMENTS.contains(&el.tag());
    for child in &el.children {
        write_node(child, raw, out);
    }
    out.push_str("</");
    out.push_str(el.tag());
    out.push('>');
}

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
