//! The dispatch table: which tags recurse into children and which take a
//! leaf merge policy.
//!
//! The table is plain data rather than a chain of tag-name comparisons, so
//! alternative policy sets can be constructed and tested independently of
//! the walker.

use std::collections::{HashMap, HashSet};

/// Leaf merge policies, applied where structural descent stops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Policy {
    /// Append the source's inner HTML after the target's content, with a
    /// `<br/>` separator unless both sides already start with a `<p>`.
    Paragraph,
    /// Merge only the first `<b>` descendant pair, inline.
    BoldText,
    /// Append a demoted copy of the source heading after the target.
    Heading,
    /// Inline `" - "` concatenation for single-line elements.
    Text,
    /// Append the label portion of a numbered table-of-contents entry.
    Contents,
    /// Leave the target untouched.
    Skip,
}

/// A single class-attribute case within a [`TagRule::ByClass`] rule.
#[derive(Clone, Debug)]
pub struct ClassCase {
    pub value: String,
    pub case_sensitive: bool,
    pub policy: Policy,
}

impl ClassCase {
    pub fn new(value: &str, case_sensitive: bool, policy: Policy) -> Self {
        Self {
            value: value.to_string(),
            case_sensitive,
            policy,
        }
    }

    fn matches(&self, class: &str) -> bool {
        if self.case_sensitive {
            class == self.value
        } else {
            class.eq_ignore_ascii_case(&self.value)
        }
    }
}

/// How a tag resolves to a leaf policy: directly, or by inspecting the
/// element's `class` attribute.
#[derive(Clone, Debug)]
pub enum TagRule {
    Fixed(Policy),
    ByClass {
        cases: Vec<ClassCase>,
        fallback: Policy,
    },
}

/// Process-wide dispatch configuration: the structural tag set plus the
/// per-tag leaf rules. Read-only once built.
#[derive(Clone, Debug)]
pub struct PolicyTable {
    structural: HashSet<String>,
    leaf: HashMap<String, TagRule>,
}

/// Tags the default table descends into instead of merging as a leaf.
const STRUCTURAL_TAGS: &[&str] = &[
    "html", "div", "head", "body", "table", "thead", "tbody", "tr", "title",
    "a", "dl", "dt", "dd", "ul",
];

impl PolicyTable {
    /// An empty table: nothing recurses, every tag is skipped.
    pub fn empty() -> Self {
        Self {
            structural: HashSet::new(),
            leaf: HashMap::new(),
        }
    }

    /// Mark a tag as structural: the walker recurses into its children
    /// rather than applying a leaf policy.
    pub fn add_structural(&mut self, tag: &str) -> &mut Self {
        self.structural.insert(tag.to_ascii_lowercase());
        self
    }

    /// Remove a tag from the structural set.
    pub fn remove_structural(&mut self, tag: &str) -> &mut Self {
        self.structural.remove(&tag.to_ascii_lowercase());
        self
    }

    /// Install a leaf rule for a tag, replacing any existing one.
    pub fn set_rule(&mut self, tag: &str, rule: TagRule) -> &mut Self {
        self.leaf.insert(tag.to_ascii_lowercase(), rule);
        self
    }

    /// Returns `true` if the walker should descend into this tag.
    pub fn is_structural(&self, tag: &str) -> bool {
        self.structural.contains(tag)
    }

    /// Resolve the leaf policy for a tag and its `class` attribute.
    /// Unlisted tags resolve to [`Policy::Skip`].
    pub fn policy_for(&self, tag: &str, class: Option<&str>) -> Policy {
        match self.leaf.get(tag) {
            None => Policy::Skip,
            Some(TagRule::Fixed(policy)) => *policy,
            Some(TagRule::ByClass { cases, fallback }) => {
                let class = class.unwrap_or("");
                cases
                    .iter()
                    .find(|case| case.matches(class))
                    .map(|case| case.policy)
                    .unwrap_or(*fallback)
            }
        }
    }
}

impl Default for PolicyTable {
    /// The canonical table. Table cells (`td`) appear in neither the
    /// structural set nor the leaf rules and are left untouched.
    fn default() -> Self {
        let mut table = Self::empty();
        for tag in STRUCTURAL_TAGS {
            table.add_structural(tag);
        }

        // The "title" class comparison is case-sensitive; the rest of the
        // table folds case.
        table.set_rule(
            "p",
            TagRule::ByClass {
                cases: vec![ClassCase::new("title", true, Policy::BoldText)],
                fallback: Policy::Paragraph,
            },
        );
        for level in 1..=9 {
            table.set_rule(&format!("h{level}"), TagRule::Fixed(Policy::Heading));
        }
        table.set_rule("title", TagRule::Fixed(Policy::Text));
        table.set_rule("dt", TagRule::Fixed(Policy::Paragraph));
        table.set_rule("li", TagRule::Fixed(Policy::Paragraph));
        table.set_rule(
            "span",
            TagRule::ByClass {
                cases: vec![
                    ClassCase::new("chapter", false, Policy::Contents),
                    ClassCase::new("section", false, Policy::Contents),
                ],
                fallback: Policy::Paragraph,
            },
        );
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_structural_set_excludes_td() {
        let table = PolicyTable::default();
        for tag in ["html", "div", "body", "tr", "dl", "ul"] {
            assert!(table.is_structural(tag), "{tag} should be structural");
        }
        assert!(!table.is_structural("td"));
        assert!(!table.is_structural("p"));
    }

    #[test]
    fn plain_paragraph_resolves_to_paragraph() {
        let table = PolicyTable::default();
        assert_eq!(table.policy_for("p", None), Policy::Paragraph);
        assert_eq!(table.policy_for("p", Some("note")), Policy::Paragraph);
    }

    #[test]
    fn titled_paragraph_class_is_case_sensitive() {
        let table = PolicyTable::default();
        assert_eq!(table.policy_for("p", Some("title")), Policy::BoldText);
        assert_eq!(table.policy_for("p", Some("Title")), Policy::Paragraph);
    }

    #[test]
    fn span_classes_fold_case() {
        let table = PolicyTable::default();
        assert_eq!(table.policy_for("span", Some("chapter")), Policy::Contents);
        assert_eq!(table.policy_for("span", Some("SECTION")), Policy::Contents);
        assert_eq!(table.policy_for("span", Some("footnote")), Policy::Paragraph);
        assert_eq!(table.policy_for("span", None), Policy::Paragraph);
    }

    #[test]
    fn all_nine_heading_levels_are_listed() {
        let table = PolicyTable::default();
        for level in 1..=9 {
            assert_eq!(table.policy_for(&format!("h{level}"), None), Policy::Heading);
        }
        assert_eq!(table.policy_for("h10", None), Policy::Skip);
    }

    #[test]
    fn unlisted_tags_skip() {
        let table = PolicyTable::default();
        assert_eq!(table.policy_for("td", None), Policy::Skip);
        assert_eq!(table.policy_for("blockquote", None), Policy::Skip);
    }

    #[test]
    fn custom_tables_can_reinstate_td() {
        let mut table = PolicyTable::default();
        table.set_rule("td", TagRule::Fixed(Policy::Paragraph));
        assert_eq!(table.policy_for("td", None), Policy::Paragraph);
    }
}
