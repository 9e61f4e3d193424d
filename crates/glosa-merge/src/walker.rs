//! Lockstep descent over two structurally-parallel trees.
//!
//! The walker pairs element-children by index, recursing wherever the
//! policy table marks the target's tag as structural and dispatching to a
//! leaf policy everywhere else. The source tree is never mutated.

use glosa_dom::{Document, Element, Node};
use tracing::{debug, trace};

use crate::error::{MergeError, MergeResult};
use crate::leaf;
use crate::path::NodePath;
use crate::policy::{Policy, PolicyTable};

/// Walks a source/target document pair and applies merge policies to the
/// target. Cheap to construct; holds only the dispatch table.
#[derive(Clone, Debug, Default)]
pub struct Merger {
    table: PolicyTable,
}

impl Merger {
    /// A merger with the canonical policy table.
    pub fn new() -> Self {
        Self::default()
    }

    /// A merger with a caller-supplied policy table.
    pub fn with_table(table: PolicyTable) -> Self {
        Self { table }
    }

    /// Merge the source document into the target document in place.
    ///
    /// Both trees must have identical element shape; a child-count mismatch
    /// at any depth aborts with the offending node path. Merging is not
    /// idempotent: running it twice appends the source content twice, since
    /// the equality short-circuits no longer hold after the first pass.
    pub fn merge_documents(&self, source: &Document, target: &mut Document) -> MergeResult<()> {
        let mut path = NodePath::root();
        self.merge_children(&source.children, &mut target.children, &mut path)
    }

    /// Merge two top-level node sequences. Exposed for callers that hold
    /// bare fragments rather than full documents.
    pub fn merge_nodes(&self, source: &[Node], target: &mut Vec<Node>) -> MergeResult<()> {
        let mut path = NodePath::root();
        self.merge_children(source, target, &mut path)
    }

    fn merge_children(
        &self,
        source: &[Node],
        target: &mut Vec<Node>,
        path: &mut NodePath,
    ) -> MergeResult<()> {
        let source_elements: Vec<&Element> = source.iter().filter_map(Node::as_element).collect();
        let target_indices: Vec<usize> = target
            .iter()
            .enumerate()
            .filter(|(_, node)| matches!(node, Node::Element(_)))
            .map(|(i, _)| i)
            .collect();

        if source_elements.len() != target_indices.len() {
            return Err(MergeError::ChildCountMismatch {
                path: path.to_string(),
                source: source_elements.len(),
                target: target_indices.len(),
            });
        }

        // Heading copies append to this parent's child list, after the loop
        // so pairing indices stay stable.
        let mut siblings: Vec<Node> = Vec::new();
        for (position, (source_el, &target_idx)) in
            source_elements.iter().zip(&target_indices).enumerate()
        {
            let target_el = match target[target_idx].as_element_mut() {
                Some(el) => el,
                None => continue,
            };
            let tag = target_el.tag().to_string();
            path.push(&tag, position);
            self.merge_node(source_el, target_el, &mut siblings, path)?;
            path.pop();
        }
        target.extend(siblings);
        Ok(())
    }

    fn merge_node(
        &self,
        source: &Element,
        target: &mut Element,
        siblings: &mut Vec<Node>,
        path: &mut NodePath,
    ) -> MergeResult<()> {
        let tag = target.tag().to_string();
        // Structural descent assumes identical shape; the source tag is not
        // re-checked.
        if self.table.is_structural(&tag) && target.has_element_children() {
            trace!(node = %path, "descending");
            return self.merge_children(&source.children, &mut target.children, path);
        }

        let policy = self.table.policy_for(&tag, target.attr("class"));
        debug!(node = %path, ?policy, "leaf merge");
        match policy {
            Policy::Paragraph => leaf::merge_paragraph(source, target, path),
            Policy::BoldText => {
                let source_bold = source.select_first("b").ok_or_else(|| {
                    MergeError::MissingChild {
                        path: path.to_string(),
                        what: "bold element in source",
                    }
                })?;
                let target_bold = target.select_first_mut("b").ok_or_else(|| {
                    MergeError::MissingChild {
                        path: path.to_string(),
                        what: "bold element in target",
                    }
                })?;
                leaf::merge_text(source_bold, target_bold);
                Ok(())
            }
            Policy::Heading => {
                leaf::merge_heading(source, &tag, siblings);
                Ok(())
            }
            Policy::Text => {
                leaf::merge_text(source, target);
                Ok(())
            }
            Policy::Contents => leaf::merge_contents(source, target, path),
            Policy::Skip => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{PolicyTable, TagRule};
    use glosa_dom::Document;

    fn merge_pair(source: &str, target: &str) -> Document {
        let source_doc = Document::parse(source.as_bytes()).unwrap();
        let mut target_doc = Document::parse(target.as_bytes()).unwrap();
        Merger::new()
            .merge_documents(&source_doc, &mut target_doc)
            .unwrap();
        target_doc
    }

    fn merge_body(source: &str, target: &str) -> String {
        let doc = merge_pair(source, target);
        doc.select_first("body").unwrap().inner_html()
    }

    #[test]
    fn identical_documents_come_back_unchanged() {
        assert_eq!(merge_body("<p>Hello</p>", "<p>Hello</p>"), "<p>Hello</p>");
    }

    #[test]
    fn paragraphs_interleave_with_break() {
        assert_eq!(
            merge_body("<p>Hello</p>", "<p>Hola</p>"),
            "<p>Hola<br/>Hello</p>"
        );
    }

    #[test]
    fn titles_concatenate_inline() {
        let doc = merge_pair(
            "<html><head><title>Title</title></head><body></body></html>",
            "<html><head><title>Título</title></head><body></body></html>",
        );
        let title = doc.select_first("title").unwrap();
        assert_eq!(title.inner_html(), "Título - Title");
    }

    #[test]
    fn empty_title_stays_empty() {
        let doc = merge_pair(
            "<html><head><title>Title</title></head><body></body></html>",
            "<html><head><title></title></head><body></body></html>",
        );
        let title = doc.select_first("title").unwrap();
        assert_eq!(title.inner_html(), "");
    }

    #[test]
    fn heading_copy_lands_at_end_of_parent() {
        assert_eq!(
            merge_body(
                r#"<div><h1 id="x">Title</h1></div>"#,
                r#"<div><h1 id="x">Título</h1></div>"#,
            ),
            r#"<div><h1 id="x">Título</h1><h3 id="x">Title</h3></div>"#
        );
    }

    #[test]
    fn two_headings_append_in_document_order() {
        assert_eq!(
            merge_body(
                "<div><h1>One</h1><h2>Two</h2></div>",
                "<div><h1>Uno</h1><h2>Dos</h2></div>",
            ),
            "<div><h1>Uno</h1><h2>Dos</h2><h3>One</h3><h4>Two</h4></div>"
        );
    }

    #[test]
    fn toc_entries_gain_the_source_label() {
        assert_eq!(
            merge_body(
                r#"<span class="section"><a>3.2. Overview of Widgets</a></span>"#,
                r#"<span class="section"><a>3.2. Resumen</a></span>"#,
            ),
            r#"<span class="section"><a>3.2. Resumen - Overview of Widgets</a></span>"#
        );
    }

    #[test]
    fn plain_spans_fall_back_to_paragraph_merge() {
        assert_eq!(
            merge_body(
                r#"<span class="note">Hello</span>"#,
                r#"<span class="note">Hola</span>"#,
            ),
            r#"<span class="note">Hola<br/>Hello</span>"#
        );
    }

    #[test]
    fn titled_paragraph_merges_only_the_bold_pair() {
        assert_eq!(
            merge_body(
                r#"<p class="title"><b>Title</b></p>"#,
                r#"<p class="title"><b>Título</b></p>"#,
            ),
            r#"<p class="title"><b>Título - Title</b></p>"#
        );
    }

    #[test]
    fn titled_paragraph_without_bold_is_an_error() {
        let source_doc = Document::parse(br#"<p class="title">Title</p>"#).unwrap();
        let mut target_doc = Document::parse(r#"<p class="title">Título</p>"#.as_bytes()).unwrap();
        let err = Merger::new()
            .merge_documents(&source_doc, &mut target_doc)
            .unwrap_err();
        assert!(matches!(err, MergeError::MissingChild { .. }));
    }

    #[test]
    fn list_items_merge_as_paragraphs() {
        assert_eq!(
            merge_body(
                "<ul><li>Hello</li><li>World</li></ul>",
                "<ul><li>Hola</li><li>Mundo</li></ul>",
            ),
            "<ul><li>Hola<br/>Hello</li><li>Mundo<br/>World</li></ul>"
        );
    }

    #[test]
    fn table_cells_are_left_untouched() {
        assert_eq!(
            merge_body(
                "<table><tbody><tr><td>Hello</td></tr></tbody></table>",
                "<table><tbody><tr><td>Hola</td></tr></tbody></table>",
            ),
            "<table><tbody><tr><td>Hola</td></tr></tbody></table>"
        );
    }

    #[test]
    fn definition_terms_merge_as_paragraphs() {
        assert_eq!(
            merge_body(
                "<dl><dt>Hello</dt><dd><p>Body</p></dd></dl>",
                "<dl><dt>Hola</dt><dd><p>Cuerpo</p></dd></dl>",
            ),
            "<dl><dt>Hola<br/>Hello</dt><dd><p>Cuerpo<br/>Body</p></dd></dl>"
        );
    }

    #[test]
    fn whitespace_text_nodes_do_not_disturb_pairing() {
        assert_eq!(
            merge_body(
                "<div>\n  <p>Hello</p>\n</div>",
                "<div><p>Hola</p></div>",
            ),
            "<div><p>Hola<br/>Hello</p></div>"
        );
    }

    #[test]
    fn child_count_mismatch_names_the_node() {
        let source_doc = Document::parse(b"<div><p>a</p><p>b</p></div>").unwrap();
        let mut target_doc = Document::parse(b"<div><p>a</p><p>b</p><p>c</p></div>").unwrap();
        let err = Merger::new()
            .merge_documents(&source_doc, &mut target_doc)
            .unwrap_err();
        match err {
            MergeError::ChildCountMismatch { path, source, target } => {
                assert_eq!(source, 2);
                assert_eq!(target, 3);
                assert!(path.contains("div"), "path was {path}");
            }
            other => panic!("expected ChildCountMismatch, got {other:?}"),
        }
    }

    #[test]
    fn merge_is_not_idempotent() {
        let source_doc = Document::parse(b"<p>Hello</p>").unwrap();
        let mut target_doc = Document::parse(b"<p>Hola</p>").unwrap();
        let merger = Merger::new();
        merger.merge_documents(&source_doc, &mut target_doc).unwrap();
        merger.merge_documents(&source_doc, &mut target_doc).unwrap();
        let body = target_doc.select_first("body").unwrap();
        assert_eq!(body.inner_html(), "<p>Hola<br/>Hello<br/>Hello</p>");
    }

    #[test]
    fn bare_fragments_merge_without_a_document() {
        let source = glosa_dom::parse_fragment("<p>Hello</p>");
        let mut target = glosa_dom::parse_fragment("<p>Hola</p>");
        Merger::new().merge_nodes(&source, &mut target).unwrap();
        assert_eq!(
            target[0].as_element().unwrap().outer_html(),
            "<p>Hola<br/>Hello</p>"
        );
    }

    #[test]
    fn custom_table_changes_dispatch() {
        let mut table = PolicyTable::default();
        table.set_rule("td", TagRule::Fixed(crate::policy::Policy::Paragraph));
        let source_doc =
            Document::parse(b"<table><tbody><tr><td>Hello</td></tr></tbody></table>").unwrap();
        let mut target_doc =
            Document::parse(b"<table><tbody><tr><td>Hola</td></tr></tbody></table>").unwrap();
        Merger::with_table(table)
            .merge_documents(&source_doc, &mut target_doc)
            .unwrap();
        let td = target_doc.select_first("td").unwrap();
        assert_eq!(td.inner_html(), "Hola<br/>Hello");
    }
}
