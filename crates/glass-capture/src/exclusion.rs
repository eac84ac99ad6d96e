//! Which parts of the document never end up in the background capture.
//!
//! The render canvas must not capture itself, and hosts can flag any subtree
//! with the ignore attribute. An element is skipped when it, or any ancestor,
//! matches.

use glass_config::CaptureConfig;

/// View of a document node as seen by a capture backend.
pub trait CaptureNode: Sized {
    fn tag_name(&self) -> &str;
    fn has_attribute(&self, name: &str) -> bool;
    fn parent(&self) -> Option<Self>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionRules {
    attribute: String,
    tags: Vec<String>,
}

impl Default for ExclusionRules {
    fn default() -> Self {
        Self::from_config(&CaptureConfig::default())
    }
}

impl ExclusionRules {
    pub fn new(attribute: impl Into<String>, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            attribute: attribute.into(),
            tags: tags
                .into_iter()
                .map(|t| {
                    let t: String = t.into();
                    t.to_ascii_lowercase()
                })
                .collect(),
        }
    }

    pub fn from_config(cfg: &CaptureConfig) -> Self {
        Self::new(cfg.ignore_attribute.clone(), cfg.ignore_tags.iter().cloned())
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// The node itself is flagged, regardless of its ancestors.
    pub fn matches<N: CaptureNode>(&self, node: &N) -> bool {
        node.has_attribute(&self.attribute)
            || self.tags.iter().any(|t| node.tag_name().eq_ignore_ascii_case(t))
    }

    /// The node or one of its ancestors is flagged.
    pub fn excludes<N: CaptureNode>(&self, node: N) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if self.matches(&n) {
                return true;
            }
            cur = n.parent();
        }
        false
    }

    /// Style sheet hiding every excluded subtree, for backends that rasterize a live page.
    pub fn stylesheet(&self) -> String {
        let mut selectors = vec![format!("[{0}]", self.attribute), format!("[{0}] *", self.attribute)];
        for tag in &self.tags {
            selectors.push(tag.clone());
            selectors.push(format!("{tag} *"));
        }
        format!("{} {{ visibility: hidden !important; }}", selectors.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Elem {
        tag: &'static str,
        attrs: &'static [&'static str],
        parent: Option<usize>,
    }

    #[derive(Clone, Copy)]
    struct Node<'a> {
        tree: &'a [Elem],
        idx: usize,
    }

    impl CaptureNode for Node<'_> {
        fn tag_name(&self) -> &str {
            self.tree[self.idx].tag
        }
        fn has_attribute(&self, name: &str) -> bool {
            self.tree[self.idx].attrs.contains(&name)
        }
        fn parent(&self) -> Option<Self> {
            self.tree[self.idx].parent.map(|idx| Node { tree: self.tree, idx })
        }
    }

    const TREE: &[Elem] = &[
        Elem { tag: "HTML", attrs: &[], parent: None },
        Elem { tag: "DIV", attrs: &["glass-ignore"], parent: Some(0) },
        Elem { tag: "SPAN", attrs: &[], parent: Some(1) },
        Elem { tag: "CANVAS", attrs: &[], parent: Some(0) },
        Elem { tag: "P", attrs: &[], parent: Some(0) },
    ];

    fn node(idx: usize) -> Node<'static> {
        Node { tree: TREE, idx }
    }

    #[test]
    fn flagged_subtrees_are_excluded_transitively() {
        let rules = ExclusionRules::default();
        assert!(!rules.excludes(node(0)));
        assert!(rules.excludes(node(1)));
        assert!(rules.excludes(node(2)));
        assert!(!rules.matches(&node(2)));
        assert!(rules.excludes(node(3)));
        assert!(!rules.excludes(node(4)));
    }

    #[test]
    fn stylesheet_covers_attribute_and_tags() {
        let css = ExclusionRules::default().stylesheet();
        assert_eq!(
            css,
            "[glass-ignore], [glass-ignore] *, canvas, canvas * { visibility: hidden !important; }"
        );
    }
}
