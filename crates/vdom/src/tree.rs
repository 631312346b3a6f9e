//! Arena-backed virtual tree
//!
//! ## Memory Layout
//!
//! ```text
//! Tree: Vec<NodeData>          source: Arc<str>
//!       [Node0][Node1][Node2]...        ↑ shared by every sliced element
//!        ↑ 4-byte NodeId, parent links are ids too
//! ```
//!
//! The tree owns every node; an element's `children` are ids of nodes it
//! owns, a node's `parent` is an id that confers no ownership. Nothing is
//! mutable once `TreeBuilder::finish` hands the tree out.

use ahash::AHashMap;
use htmlize::unescape;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::sync::Arc;

use crate::error::{DomError, Result};
use crate::node::{Children, ElementRef, Node, NodeRef};
use crate::types::{NodeData, NodeId};

/// An immutable, in-memory representation of a parsed document
#[derive(Debug, Clone)]
pub struct Tree {
    /// All nodes stored in document order
    nodes: Vec<NodeData>,

    /// Top-level nodes, in document order
    roots: SmallVec<[NodeId; 4]>,

    /// Original markup the element offsets point into
    source: Arc<str>,

    /// `id` attribute value → first element carrying it
    ids: AHashMap<String, NodeId>,
}

impl Tree {
    pub(crate) fn from_parts(
        nodes: Vec<NodeData>,
        roots: SmallVec<[NodeId; 4]>,
        source: Arc<str>,
        ids: AHashMap<String, NodeId>,
    ) -> Self {
        Self {
            nodes,
            roots,
            source,
            ids,
        }
    }

    /// The raw source the tree was built from (empty for literal trees)
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The whole document source with entities decoded.
    ///
    /// This decodes the stored source as-is; it never re-serializes the
    /// node structure.
    pub fn html(&self) -> Cow<'_, str> {
        unescape(&*self.source)
    }

    /// Concatenated html of every root node.
    ///
    /// Unlike [`Tree::html`] this walks the nodes, so it also renders trees
    /// built from literals.
    pub fn outer_html(&self) -> String {
        self.roots().map(|root| root.html()).collect()
    }

    /// Root nodes in document order
    pub fn roots(&self) -> Children<'_> {
        Children::new(self, &self.roots)
    }

    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Total number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get node by ID
    pub fn get(&self, node_id: NodeId) -> Result<NodeRef<'_>> {
        if (node_id as usize) < self.nodes.len() {
            Ok(NodeRef::new(self, node_id))
        } else {
            Err(DomError::NodeNotFound(node_id))
        }
    }

    /// Get element by ID, `None` if the id is unknown or not an element
    pub fn element(&self, node_id: NodeId) -> Option<ElementRef<'_>> {
        self.get(node_id).ok()?.as_element()
    }

    /// Ids handed out by the builder are always in range.
    pub(crate) fn data(&self, node_id: NodeId) -> &NodeData {
        &self.nodes[node_id as usize]
    }

    /// Resolve an index path back to its node.
    ///
    /// Inverse of [`Node::index_path`]: `tree.node_at(n.index_path())` is `n`.
    pub fn node_at(&self, path: &[usize]) -> Option<NodeRef<'_>> {
        let (&first, rest) = path.split_first()?;
        let mut node_id = *self.roots.get(first)?;
        for &index in rest {
            node_id = *self.data(node_id).children().get(index)?;
        }
        Some(NodeRef::new(self, node_id))
    }

    /// Every node, depth-first in document order
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants::new(self, &self.roots)
    }

    /// Find nodes matching predicate
    pub fn find<F>(&self, predicate: F) -> Vec<NodeRef<'_>>
    where
        F: Fn(&NodeRef<'_>) -> bool,
    {
        self.descendants().filter(|node| predicate(node)).collect()
    }

    /// Find all elements by tag name (ASCII case-insensitive)
    pub fn elements_by_name(&self, name: &str) -> Vec<ElementRef<'_>> {
        self.descendants()
            .filter_map(|node| node.as_element())
            .filter(|el| el.name().eq_ignore_ascii_case(name))
            .collect()
    }

    /// Find the first element whose `id` attribute equals `id`.
    ///
    /// Served from the index built by the builder; falls back to a scan when
    /// the index was disabled.
    pub fn element_by_id(&self, id: &str) -> Option<ElementRef<'_>> {
        if let Some(&node_id) = self.ids.get(id) {
            return self.element(node_id);
        }
        if !self.ids.is_empty() {
            return None;
        }
        self.descendants()
            .filter_map(|node| node.as_element())
            .find(|el| el.attr("id") == Some(id))
    }
}

/// Depth-first, pre-order iterator (explicit stack, no recursion)
pub struct Descendants<'t> {
    tree: &'t Tree,
    stack: Vec<NodeId>,
}

impl<'t> Descendants<'t> {
    pub(crate) fn new(tree: &'t Tree, start: &[NodeId]) -> Self {
        // Reversed so the first sibling is popped first
        Self {
            tree,
            stack: start.iter().rev().copied().collect(),
        }
    }
}

impl<'t> Iterator for Descendants<'t> {
    type Item = NodeRef<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let node_id = self.stack.pop()?;
        let children = self.tree.data(node_id).children();
        self.stack.extend(children.iter().rev());
        Some(NodeRef::new(self.tree, node_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TreeBuilder;
    use crate::types::Attribute;

    fn sample() -> Tree {
        // <ul id="list"><li>a</li><li>b</li></ul><p/>
        let source = r#"<ul id="list"><li>a</li><li>b</li></ul><p/>"#;
        let mut builder = TreeBuilder::new(source);
        builder
            .open_element("ul", vec![Attribute::new("id", "list")], 0, 14)
            .unwrap();
        builder.open_element("li", vec![], 14, 18).unwrap();
        builder.text("a").unwrap();
        builder.close_element(19, 24).unwrap();
        builder.open_element("li", vec![], 24, 28).unwrap();
        builder.text("b").unwrap();
        builder.close_element(29, 34).unwrap();
        builder.close_element(34, 39).unwrap();
        builder.auto_closed_element("p", vec![]).unwrap();
        builder.finish().unwrap()
    }

    #[test]
    fn test_tree_basic() {
        let tree = sample();

        assert_eq!(tree.len(), 6);
        assert_eq!(tree.root_count(), 2);
        assert!(!tree.is_empty());

        let ul = tree.get(0).unwrap().as_element().unwrap();
        assert_eq!(ul.name(), "ul");
        assert!(matches!(tree.get(42), Err(DomError::NodeNotFound(42))));
    }

    #[test]
    fn test_descendants_document_order() {
        let tree = sample();

        let visited: Vec<String> = tree
            .descendants()
            .map(|node| match node {
                NodeRef::Element(el) => el.name().to_string(),
                NodeRef::Text(text) => format!("#{}", text.value()),
                NodeRef::Comment(_) => "#comment".to_string(),
            })
            .collect();

        assert_eq!(visited, vec!["ul", "li", "#a", "li", "#b", "p"]);
    }

    #[test]
    fn test_node_at_inverts_index_path() {
        let tree = sample();

        for node in tree.descendants() {
            let found = tree.node_at(node.index_path()).unwrap();
            assert_eq!(found, node);
        }
        assert!(tree.node_at(&[]).is_none());
        assert!(tree.node_at(&[0, 5]).is_none());
        assert!(tree.node_at(&[3]).is_none());
    }

    #[test]
    fn test_lookups() {
        let tree = sample();

        assert_eq!(tree.elements_by_name("LI").len(), 2);
        assert_eq!(tree.element_by_id("list").unwrap().name(), "ul");
        assert!(tree.element_by_id("missing").is_none());
        assert_eq!(tree.find(|node| node.as_text().is_some()).len(), 2);
    }

    #[test]
    fn test_tree_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Tree>();
    }
}
