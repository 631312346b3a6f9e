//! Node handles and HTML reconstruction
//!
//! A handle is a `Copy` borrow of the tree plus a node id. Every variant
//! answers the same four questions (see [`Node`]); only elements carry
//! names, attributes and source spans.

use htmlize::unescape;
use std::borrow::Cow;
use std::fmt;

use crate::tree::{Descendants, Tree};
use crate::types::{Attribute, Content, ElementData, Markup, NodeData, NodeId, NodeKind};

/// Capabilities shared by every node variant
pub trait Node<'t> {
    /// The owning element, or `None` for a root
    fn parent(&self) -> Option<ElementRef<'t>>;

    /// Owned child nodes in document order; empty for text and comments
    fn children(&self) -> Children<'t>;

    /// Markup of this node and its subtree, with entities decoded
    fn html(&self) -> Cow<'t, str>;

    /// Zero-based child positions from a root to this node.
    ///
    /// If this node is the second child of its parent, and the parent is
    /// the first root, the path is `[0, 1]`.
    fn index_path(&self) -> &'t [usize];
}

/// Any node of a [`Tree`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'t> {
    Element(ElementRef<'t>),
    Text(TextRef<'t>),
    Comment(CommentRef<'t>),
}

impl<'t> NodeRef<'t> {
    pub(crate) fn new(tree: &'t Tree, id: NodeId) -> Self {
        let node = tree.data(id);
        match &node.content {
            Content::Element(el) => NodeRef::Element(ElementRef { tree, id, node, el }),
            Content::Text(value) => NodeRef::Text(TextRef { tree, id, node, value }),
            Content::Comment(value) => NodeRef::Comment(CommentRef { tree, id, node, value }),
        }
    }

    pub fn id(&self) -> NodeId {
        match self {
            NodeRef::Element(el) => el.id,
            NodeRef::Text(text) => text.id,
            NodeRef::Comment(comment) => comment.id,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Element(_) => NodeKind::Element,
            NodeRef::Text(_) => NodeKind::Text,
            NodeRef::Comment(_) => NodeKind::Comment,
        }
    }

    pub fn as_element(&self) -> Option<ElementRef<'t>> {
        match self {
            NodeRef::Element(el) => Some(*el),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<TextRef<'t>> {
        match self {
            NodeRef::Text(text) => Some(*text),
            _ => None,
        }
    }

    pub fn as_comment(&self) -> Option<CommentRef<'t>> {
        match self {
            NodeRef::Comment(comment) => Some(*comment),
            _ => None,
        }
    }

    fn data(&self) -> &'t NodeData {
        match self {
            NodeRef::Element(el) => el.node,
            NodeRef::Text(text) => text.node,
            NodeRef::Comment(comment) => comment.node,
        }
    }

    fn tree(&self) -> &'t Tree {
        match self {
            NodeRef::Element(el) => el.tree,
            NodeRef::Text(text) => text.tree,
            NodeRef::Comment(comment) => comment.tree,
        }
    }
}

impl<'t> Node<'t> for NodeRef<'t> {
    fn parent(&self) -> Option<ElementRef<'t>> {
        parent_of(self.tree(), self.data())
    }

    fn children(&self) -> Children<'t> {
        Children::new(self.tree(), self.data().children())
    }

    fn html(&self) -> Cow<'t, str> {
        match self {
            NodeRef::Element(el) => el.html(),
            NodeRef::Text(text) => text.html(),
            NodeRef::Comment(comment) => comment.html(),
        }
    }

    fn index_path(&self) -> &'t [usize] {
        &self.data().index
    }
}

fn parent_of<'t>(tree: &'t Tree, node: &NodeData) -> Option<ElementRef<'t>> {
    tree.element(node.parent?)
}

/// An xml/html element, e.g. `<div></div>`
#[derive(Clone, Copy)]
pub struct ElementRef<'t> {
    tree: &'t Tree,
    id: NodeId,
    node: &'t NodeData,
    el: &'t ElementData,
}

impl<'t> ElementRef<'t> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Tag name without `<`, `>` or `/`
    pub fn name(&self) -> &'t str {
        &self.el.name
    }

    /// Attributes in document order, duplicates preserved
    pub fn attrs(&self) -> &'t [Attribute] {
        &self.el.attrs
    }

    /// Value of the first attribute called `name`
    pub fn attr(&self, name: &str) -> Option<&'t str> {
        self.el
            .attrs
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    pub fn markup(&self) -> &'t Markup {
        &self.el.markup
    }

    pub fn is_auto_closed(&self) -> bool {
        self.el.markup == Markup::AutoClosed
    }

    /// Decoded markup between the open and close tags.
    ///
    /// So for `<ul><li>one</li><li>two</li></ul>` this is
    /// `<li>one</li><li>two</li>`. Auto-closed elements have no interior
    /// and return `None`.
    pub fn inner_html(&self) -> Option<Cow<'t, str>> {
        match &self.el.markup {
            Markup::AutoClosed => None,
            Markup::Sliced { inner, .. } => Some(unescape(&self.tree.source()[inner.clone()])),
            Markup::Detached => Some(Cow::Owned(self.children_html())),
        }
    }

    /// Concatenated text of every descendant text node
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        for node in self.descendants() {
            if let NodeRef::Text(t) = node {
                text.push_str(t.value());
            }
        }
        text
    }

    /// All nodes below this element, depth-first in document order
    pub fn descendants(&self) -> Descendants<'t> {
        Descendants::new(self.tree, &self.el.children)
    }

    /// `<name a="1" b="2">`, attributes in original order
    fn open_tag(&self) -> String {
        let mut output = String::with_capacity(self.el.name.len() + 2);
        output.push('<');
        output.push_str(&self.el.name);
        for attr in &self.el.attrs {
            output.push_str(&format!(" {}=\"{}\"", attr.name, attr.value));
        }
        output.push('>');
        output
    }

    fn children_html(&self) -> String {
        self.children().map(|child| child.html()).collect()
    }
}

impl<'t> Node<'t> for ElementRef<'t> {
    fn parent(&self) -> Option<ElementRef<'t>> {
        parent_of(self.tree, self.node)
    }

    fn children(&self) -> Children<'t> {
        Children::new(self.tree, &self.el.children)
    }

    fn html(&self) -> Cow<'t, str> {
        match &self.el.markup {
            // Nothing to slice, rebuild the open tag
            Markup::AutoClosed => Cow::Owned(self.open_tag()),
            Markup::Sliced { outer, .. } => unescape(&self.tree.source()[outer.clone()]),
            Markup::Detached => {
                let mut output = self.open_tag();
                output.push_str(&self.children_html());
                output.push_str("</");
                output.push_str(&self.el.name);
                output.push('>');
                Cow::Owned(output)
            }
        }
    }

    fn index_path(&self) -> &'t [usize] {
        &self.node.index
    }
}

/// Text between tags, already decoded
#[derive(Clone, Copy)]
pub struct TextRef<'t> {
    tree: &'t Tree,
    id: NodeId,
    node: &'t NodeData,
    value: &'t str,
}

impl<'t> TextRef<'t> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn value(&self) -> &'t str {
        self.value
    }
}

impl<'t> Node<'t> for TextRef<'t> {
    fn parent(&self) -> Option<ElementRef<'t>> {
        parent_of(self.tree, self.node)
    }

    fn children(&self) -> Children<'t> {
        Children::empty(self.tree)
    }

    fn html(&self) -> Cow<'t, str> {
        Cow::Borrowed(self.value)
    }

    fn index_path(&self) -> &'t [usize] {
        &self.node.index
    }
}

/// A comment of the form `<!-- value -->`; `value` excludes the markers
#[derive(Clone, Copy)]
pub struct CommentRef<'t> {
    tree: &'t Tree,
    id: NodeId,
    node: &'t NodeData,
    value: &'t str,
}

impl<'t> CommentRef<'t> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn value(&self) -> &'t str {
        self.value
    }
}

impl<'t> Node<'t> for CommentRef<'t> {
    fn parent(&self) -> Option<ElementRef<'t>> {
        parent_of(self.tree, self.node)
    }

    fn children(&self) -> Children<'t> {
        Children::empty(self.tree)
    }

    fn html(&self) -> Cow<'t, str> {
        Cow::Owned(format!("<!--{}-->", self.value))
    }

    fn index_path(&self) -> &'t [usize] {
        &self.node.index
    }
}

// Handles are equal when they point at the same node of the same tree.
macro_rules! handle_identity {
    ($($handle:ident => $label:literal),* $(,)?) => {$(
        impl PartialEq for $handle<'_> {
            fn eq(&self, other: &Self) -> bool {
                std::ptr::eq(self.tree, other.tree) && self.id == other.id
            }
        }

        impl Eq for $handle<'_> {}

        impl fmt::Debug for $handle<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct($label)
                    .field("id", &self.id)
                    .field("index", &self.node.index)
                    .finish()
            }
        }
    )*};
}

handle_identity! {
    ElementRef => "ElementRef",
    TextRef => "TextRef",
    CommentRef => "CommentRef",
}

/// Iterator over sibling nodes
#[derive(Clone)]
pub struct Children<'t> {
    tree: &'t Tree,
    ids: std::slice::Iter<'t, NodeId>,
}

impl<'t> Children<'t> {
    pub(crate) fn new(tree: &'t Tree, ids: &'t [NodeId]) -> Self {
        Self {
            tree,
            ids: ids.iter(),
        }
    }

    fn empty(tree: &'t Tree) -> Self {
        Self::new(tree, &[])
    }
}

impl<'t> Iterator for Children<'t> {
    type Item = NodeRef<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        self.ids.next().map(|&id| NodeRef::new(self.tree, id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.ids.next_back().map(|&id| NodeRef::new(self.tree, id))
    }
}

impl ExactSizeIterator for Children<'_> {}
