//! Positional selectors for finding a virtual element in a live DOM
//!
//! Only sibling positions are guaranteed to line up between the virtual tree
//! and the rendered document, so every step uses the `*` wildcard instead of
//! a tag name.

use crate::node::{ElementRef, Node};

/// CSS selector for an index path: `*:nth-child(i1) > *:nth-child(i2) > ...`
///
/// `nth-child` is 1-based, index paths are 0-based. An empty path yields an
/// empty selector.
pub fn selector_for(path: &[usize]) -> String {
    path.iter()
        .map(|index| format!("*:nth-child({})", index + 1))
        .collect::<Vec<_>>()
        .join(" > ")
}

/// XPath counterpart of [`selector_for`]: `/*[i1]/*[i2]/...`
pub fn xpath_for(path: &[usize]) -> String {
    let parts: Vec<String> = path.iter().map(|index| format!("*[{}]", index + 1)).collect();
    format!("/{}", parts.join("/"))
}

impl ElementRef<'_> {
    /// CSS selector locating the corresponding element in the actual DOM.
    ///
    /// The selector is relative to the parent of the tree's roots. If the
    /// virtual tree is rendered inside some container `div`, the live
    /// element is `container.querySelector(el.selector())`.
    ///
    /// `:nth-child` counts element siblings only, while index paths count
    /// text and comments too. The selector finds the element only when no
    /// text or comment precedes it, or any of its ancestors, among siblings.
    pub fn selector(&self) -> String {
        selector_for(self.index_path())
    }

    /// Positional XPath relative to the parent of the tree's roots.
    ///
    /// `*[n]` is positional over element siblings, like `:nth-child`, so it
    /// always names the same element as [`ElementRef::selector`] and shares
    /// its limit: text or comments before an element on the path shift the
    /// live position away from the index path.
    pub fn xpath(&self) -> String {
        xpath_for(self.index_path())
    }
}
