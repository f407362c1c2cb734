//! `tag[attribute=value]` selectors for the well-known singleton elements.

use std::fmt;

use markup5ever_rcdom::Handle;

use crate::dom;

/// Matches elements by tag name and one attribute value.
///
/// Tag and attribute names compare case-insensitively; the attribute value
/// is trimmed and compared case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadSelector {
    /// Tag name.
    pub tag: &'static str,
    /// Attribute name.
    pub attribute: &'static str,
    /// Expected attribute value.
    pub value: &'static str,
}

/// Singleton elements replaced in place during a merge, in evaluation order.
pub const SINGLETON_SELECTORS: [HeadSelector; 4] = [
    HeadSelector::new("meta", "http-equiv", "Content-Type"),
    HeadSelector::new("meta", "http-equiv", "X-UA-Compatible"),
    HeadSelector::new("link", "rel", "shortcut icon"),
    HeadSelector::new("link", "rel", "icon"),
];

impl HeadSelector {
    /// Creates a selector.
    #[must_use]
    pub const fn new(tag: &'static str, attribute: &'static str, value: &'static str) -> Self {
        Self {
            tag,
            attribute,
            value,
        }
    }

    /// True when `node` is a matching element.
    #[must_use]
    pub fn matches(&self, node: &Handle) -> bool {
        let tag_matches =
            dom::element_name(node).is_some_and(|name| name.eq_ignore_ascii_case(self.tag));
        tag_matches
            && dom::attribute(node, self.attribute)
                .is_some_and(|v| v.trim().eq_ignore_ascii_case(self.value))
    }

    /// Matching descendants of `root`, in document order.
    #[must_use]
    pub fn select(&self, root: &Handle) -> Vec<Handle> {
        dom::descendants(root)
            .into_iter()
            .filter(|n| self.matches(n))
            .collect()
    }
}

impl fmt::Display for HeadSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}={}]", self.tag, self.attribute, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selectors_render_in_fixed_order() {
        let rendered: Vec<String> = SINGLETON_SELECTORS.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "meta[http-equiv=Content-Type]",
                "meta[http-equiv=X-UA-Compatible]",
                "link[rel=shortcut icon]",
                "link[rel=icon]",
            ]
        );
    }

    #[test]
    fn value_match_is_trimmed_and_case_insensitive() {
        let selector = SINGLETON_SELECTORS[1];
        let meta = dom::create_element(
            "META",
            &[("HTTP-EQUIV".into(), " x-ua-compatible ".into())],
        );
        assert!(selector.matches(&meta));

        let other = dom::create_element("meta", &[("name".into(), "X-UA-Compatible".into())]);
        assert!(!selector.matches(&other));
    }

    #[test]
    fn icon_does_not_match_shortcut_icon() {
        let shortcut = dom::create_element("link", &[("rel".into(), "shortcut icon".into())]);
        assert!(SINGLETON_SELECTORS[2].matches(&shortcut));
        assert!(!SINGLETON_SELECTORS[3].matches(&shortcut));
    }
}
