//! The owned HTML tree: documents, elements, and their mutation API.
//!
//! Every node is owned exclusively by its parent. There are no parent
//! pointers and no shared references; mutation happens top-down through
//! `&mut` access.

use crate::error::DomResult;
use crate::parse;
use crate::serialize;

/// A single node in a parsed HTML tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

impl Node {
    /// The node's name: the tag for elements, `#text` or `#comment` otherwise.
    pub fn name(&self) -> &str {
        match self {
            Node::Element(el) => el.tag(),
            Node::Text(_) => "#text",
            Node::Comment(_) => "#comment",
        }
    }

    /// Borrow this node as an element, if it is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Mutably borrow this node as an element, if it is one.
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }
}

/// An element node: lowercase tag name, attributes in document order,
/// and ordered children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    /// Ordered child nodes, elements and text interleaved.
    pub children: Vec<Node>,
}

impl Element {
    /// Create an empty element. The tag is stored lowercase.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// The element's lowercase tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Look up an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing any existing value for the same name.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
    }

    /// Iterate over `(name, value)` attribute pairs in document order.
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate over child elements only, skipping text and comments.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Returns `true` if at least one child is an element.
    pub fn has_element_children(&self) -> bool {
        self.children.iter().any(|n| matches!(n, Node::Element(_)))
    }

    /// The first child element, if any.
    pub fn first_element_child(&self) -> Option<&Element> {
        self.children.iter().find_map(Node::as_element)
    }

    /// Mutable access to the first child element, if any.
    pub fn first_element_child_mut(&mut self) -> Option<&mut Element> {
        self.children.iter_mut().find_map(Node::as_element_mut)
    }

    /// The name of the first child node (`#text` for a leading text node),
    /// or `None` for a childless element.
    pub fn first_child_name(&self) -> Option<&str> {
        self.children.first().map(Node::name)
    }

    /// Descendant text content, whitespace-normalized: runs of whitespace
    /// collapse to single spaces and the ends are trimmed.
    pub fn text(&self) -> String {
        let mut raw = String::new();
        collect_text(self, &mut raw);
        let mut out = String::with_capacity(raw.len());
        for word in raw.split_whitespace() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(word);
        }
        out
    }

    /// Serialize the element's children to HTML.
    pub fn inner_html(&self) -> String {
        serialize::inner_html(self)
    }

    /// Serialize the element itself, tag included.
    pub fn outer_html(&self) -> String {
        serialize::element_to_html(self)
    }

    /// Replace all children with the result of parsing `html` as a fragment.
    pub fn set_inner_html(&mut self, html: &str) {
        self.children = parse::parse_fragment(html);
    }

    /// Parse `html` as a fragment and append the resulting nodes as new
    /// trailing children.
    pub fn append_html(&mut self, html: &str) {
        self.children.extend(parse::parse_fragment(html));
    }

    /// Append a literal text node.
    pub fn append_text(&mut self, text: &str) {
        self.children.push(Node::Text(text.to_string()));
    }

    /// Create an empty element of the given tag, append it as the last
    /// child, and return a mutable reference to it.
    pub fn append_element(&mut self, tag: &str) -> &mut Element {
        self.children.push(Node::Element(Element::new(tag)));
        match self.children.last_mut() {
            Some(Node::Element(el)) => el,
            _ => unreachable!("just pushed an element"),
        }
    }

    /// Depth-first search for the first descendant (or self) with the given
    /// tag name.
    pub fn select_first(&self, tag: &str) -> Option<&Element> {
        if self.tag == tag {
            return Some(self);
        }
        for child in &self.children {
            if let Node::Element(el) = child {
                if let Some(found) = el.select_first(tag) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Mutable variant of [`select_first`](Self::select_first).
    pub fn select_first_mut(&mut self, tag: &str) -> Option<&mut Element> {
        if self.tag == tag {
            return Some(self);
        }
        for child in &mut self.children {
            if let Node::Element(el) = child {
                if let Some(found) = el.select_first_mut(tag) {
                    return Some(found);
                }
            }
        }
        None
    }
}

fn collect_text(el: &Element, out: &mut String) {
    for child in &el.children {
        match child {
            Node::Text(text) => out.push_str(text),
            Node::Element(inner) => collect_text(inner, out),
            Node::Comment(_) => {}
        }
    }
}

/// A parsed HTML document: optional doctype name plus top-level children.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    /// The doctype name (`html` for `<!DOCTYPE html>`), if one was present.
    pub doctype: Option<String>,
    /// Top-level nodes; for well-formed input this is the `<html>` element
    /// plus any surrounding comments.
    pub children: Vec<Node>,
}

impl Document {
    /// Parse UTF-8 bytes into a document. Parsing is lenient: malformed
    /// markup is auto-corrected the way browsers do, never rejected.
    pub fn parse(bytes: &[u8]) -> DomResult<Self> {
        parse::parse_document(bytes)
    }

    /// Iterate over top-level child elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Depth-first search across the whole document for the first element
    /// with the given tag name.
    pub fn select_first(&self, tag: &str) -> Option<&Element> {
        self.child_elements().find_map(|el| el.select_first(tag))
    }

    /// Serialize the full document, doctype included.
    pub fn to_html(&self) -> String {
        serialize::document_to_html(self)
    }
}
