//! Leaf merge policies, applied where structural descent stops.
//!
//! Every policy is a pure function of (source element, target element) whose
//! only effect is mutation of the target side. The heading policy is the one
//! exception in shape: it builds a new sibling for the walker to append to
//! the target's parent.

use std::sync::LazyLock;

use glosa_dom::{Element, Node};
use regex::Regex;

use crate::error::{MergeError, MergeResult};
use crate::path::NodePath;

/// Chapter/section numbering prefix: one or more `digits.` groups, then the
/// label text. Group 2 captures the label.
static NUMBERING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.)+(.*)").expect("numbering pattern is valid"));

fn missing(path: &NodePath, what: &'static str) -> MergeError {
    MergeError::MissingChild {
        path: path.to_string(),
        what,
    }
}

/// Append the source's inner HTML to the target block.
///
/// Identical content (ASCII-case-insensitive) is left alone. A `<br/>` is
/// inserted first unless both sides already open with a `<p>` child, which
/// is assumed to provide its own block separation. When both sides open
/// with an `<img>`, the pair is handed to [`merge_image`] instead.
pub fn merge_paragraph(
    source: &Element,
    target: &mut Element,
    path: &NodePath,
) -> MergeResult<()> {
    let source_html = source.inner_html();
    if target.inner_html().eq_ignore_ascii_case(&source_html) {
        return Ok(());
    }

    let target_first = target
        .first_child_name()
        .ok_or_else(|| missing(path, "first child node in target"))?
        .to_string();
    let source_first = source
        .first_child_name()
        .ok_or_else(|| missing(path, "first child node in source"))?
        .to_string();

    if target_first == "img" && source_first == "img" {
        let source_img = source
            .first_element_child()
            .ok_or_else(|| missing(path, "leading image in source"))?;
        let target_img = target
            .first_element_child_mut()
            .ok_or_else(|| missing(path, "leading image in target"))?;
        merge_image(source_img, target_img);
        return Ok(());
    }

    if !(target_first == "p" && source_first == "p") {
        target.append_html("<br/>");
    }
    target.append_html(&source_html);
    Ok(())
}

/// Append a demoted copy of the source heading.
///
/// `h1` becomes `h3`, `h2` becomes `h4`, and so on; levels 8 and 9 demote
/// past the standard range to `h10`/`h11` and are passed through unchanged.
/// The copy keeps every source attribute and the source's inner HTML, and is
/// pushed onto `siblings` for the walker to append to the target's parent.
pub fn merge_heading(source: &Element, tag: &str, siblings: &mut Vec<Node>) {
    let Some(level) = tag.strip_prefix('h').and_then(|d| d.parse::<u32>().ok()) else {
        return;
    };
    let mut demoted = Element::new(format!("h{}", level + 2));
    for (name, value) in source.attrs() {
        demoted.set_attr(name, value);
    }
    demoted.children = source.children.clone();
    siblings.push(Node::Element(demoted));
}

/// Inline concatenation for single-line elements: append `" - "` plus the
/// source's inner HTML. A target with empty (whitespace-only) text is left
/// alone, since there is nothing to compare against.
pub fn merge_text(source: &Element, target: &mut Element) {
    if target.text().is_empty() {
        return;
    }
    target.append_text(" - ");
    target.append_html(&source.inner_html());
}

/// Table-of-contents entries: the numbering prefix is already correct in the
/// target, so only the source's label portion is appended, as plain text, to
/// the target's first child element.
pub fn merge_contents(
    source: &Element,
    target: &mut Element,
    path: &NodePath,
) -> MergeResult<()> {
    if target.inner_html().eq_ignore_ascii_case(&source.inner_html()) {
        return Ok(());
    }
    let source_text = source.text();
    let Some(captures) = NUMBERING.captures(&source_text) else {
        return Ok(());
    };
    let label = captures.get(2).map_or("", |m| m.as_str());
    let entry = target
        .first_element_child_mut()
        .ok_or_else(|| missing(path, "first child element in target"))?;
    entry.append_text(&format!(" -{label}"));
    Ok(())
}

/// Record the original image's `alt` text alongside the translated one:
/// if the two values differ (ASCII-case-insensitive), the target's `alt`
/// becomes `"<target alt> - <source alt>"`.
pub fn merge_image(source: &Element, target: &mut Element) {
    let source_alt = source.attr("alt").unwrap_or("").to_string();
    let target_alt = target.attr("alt").unwrap_or("").to_string();
    if !target_alt.eq_ignore_ascii_case(&source_alt) {
        target.set_attr("alt", &format!("{target_alt} - {source_alt}"));
    }
}
