//! Structural comparison of virtual trees
//!
//! Comparison checks node variants, element names, attributes (in order),
//! text and comment values, and child counts. It never looks at parent
//! links, index paths or source offsets: expected trees are written as
//! literals that have no parents or source, and must still compare equal to
//! a parsed tree with the same structure.
//!
//! The first difference found wins; the walk stops there.

use smallvec::SmallVec;
use std::fmt;
use thiserror::Error;

use crate::node::{CommentRef, ElementRef, Node, NodeRef, TextRef};
use crate::tree::Tree;
use crate::types::{Attribute, IndexPath, NodeKind};

/// What differed, with both observed values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MismatchKind {
    #[error("tree had {left} roots but other had {right}")]
    RootCount { left: usize, right: usize },

    #[error("node has type {left} but other node has type {right}")]
    Kind { left: NodeKind, right: NodeKind },

    #[error("element name was {left} but other name was {right}")]
    Name { left: String, right: String },

    #[error("element has {left} attrs but other has {right} attrs")]
    AttrCount { left: usize, right: usize },

    #[error("attrs[{index}] was {left} but other attrs[{index}] was {right}")]
    Attr {
        index: usize,
        left: Attribute,
        right: Attribute,
    },

    #[error("text value was {left:?} but other value was {right:?}")]
    Text { left: String, right: String },

    #[error("comment value was {left:?} but other value was {right:?}")]
    Comment { left: String, right: String },

    #[error("node has {left} children but other has {right} children")]
    ChildCount { left: usize, right: usize },
}

/// A failed comparison: where and what
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// Index path of the left-hand node; empty for tree-level mismatches
    pub path: IndexPath,
    pub kind: MismatchKind,
}

impl Mismatch {
    fn at(node: &NodeRef<'_>, kind: MismatchKind) -> Self {
        Self {
            path: SmallVec::from_slice(node.index_path()),
            kind,
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "node {:?}: {}", self.path.as_slice(), self.kind)
        }
    }
}

impl std::error::Error for Mismatch {}

impl Tree {
    /// Compare this tree against `other`, root by root.
    ///
    /// Fails straight away if the root counts differ. Parent links are never
    /// compared, so a tree built from literals can be checked against a
    /// parsed one.
    pub fn compare(&self, other: &Tree) -> Result<(), Mismatch> {
        if self.root_count() != other.root_count() {
            let mismatch = Mismatch {
                path: IndexPath::new(),
                kind: MismatchKind::RootCount {
                    left: self.root_count(),
                    right: other.root_count(),
                },
            };
            tracing::debug!("tree comparison failed: {}", mismatch);
            return Err(mismatch);
        }

        for (root, other_root) in self.roots().zip(other.roots()) {
            compare_nodes(root, other_root)?;
        }

        Ok(())
    }

    /// `true` when [`Tree::compare`] finds no difference
    pub fn matches(&self, other: &Tree) -> bool {
        self.compare(other).is_ok()
    }
}

/// Compare `node` and `other` together with their subtrees.
///
/// Never checks the parent of either node or of any descendant. The walk is
/// depth-first in document order and reports the first difference: a node's
/// own fields and child count are checked before any of its children.
pub fn compare_nodes(node: NodeRef<'_>, other: NodeRef<'_>) -> Result<(), Mismatch> {
    let mut stack = vec![(node, other)];

    while let Some((node, other)) = stack.pop() {
        if let Err(kind) = compare_fields(&node, &other) {
            let mismatch = Mismatch::at(&node, kind);
            tracing::debug!("node comparison failed: {}", mismatch);
            return Err(mismatch);
        }

        let children = node.children();
        let other_children = other.children();
        if children.len() != other_children.len() {
            let mismatch = Mismatch::at(
                &node,
                MismatchKind::ChildCount {
                    left: children.len(),
                    right: other_children.len(),
                },
            );
            tracing::debug!("node comparison failed: {}", mismatch);
            return Err(mismatch);
        }

        // Reversed so the first child pair is popped first
        stack.extend(children.zip(other_children).rev());
    }

    Ok(())
}

/// Non-recursive comparison of the variant-specific fields
fn compare_fields(node: &NodeRef<'_>, other: &NodeRef<'_>) -> Result<(), MismatchKind> {
    match (node, other) {
        (NodeRef::Element(el), NodeRef::Element(other_el)) => el.compare_fields(other_el),
        (NodeRef::Text(text), NodeRef::Text(other_text)) => text.compare_fields(other_text),
        (NodeRef::Comment(comment), NodeRef::Comment(other_comment)) => {
            comment.compare_fields(other_comment)
        }
        _ => Err(MismatchKind::Kind {
            left: node.kind(),
            right: other.kind(),
        }),
    }
}

impl ElementRef<'_> {
    /// Compare name and attributes (count, then each pair in order).
    ///
    /// Children are not visited; see [`compare_nodes`] for subtrees.
    pub fn compare_fields(&self, other: &ElementRef<'_>) -> Result<(), MismatchKind> {
        if self.name() != other.name() {
            return Err(MismatchKind::Name {
                left: self.name().to_string(),
                right: other.name().to_string(),
            });
        }

        let attrs = self.attrs();
        let other_attrs = other.attrs();
        if attrs.len() != other_attrs.len() {
            return Err(MismatchKind::AttrCount {
                left: attrs.len(),
                right: other_attrs.len(),
            });
        }

        for (index, (attr, other_attr)) in attrs.iter().zip(other_attrs).enumerate() {
            if attr != other_attr {
                return Err(MismatchKind::Attr {
                    index,
                    left: attr.clone(),
                    right: other_attr.clone(),
                });
            }
        }

        Ok(())
    }
}

impl TextRef<'_> {
    pub fn compare_fields(&self, other: &TextRef<'_>) -> Result<(), MismatchKind> {
        if self.value() != other.value() {
            return Err(MismatchKind::Text {
                left: self.value().to_string(),
                right: other.value().to_string(),
            });
        }
        Ok(())
    }
}

impl CommentRef<'_> {
    pub fn compare_fields(&self, other: &CommentRef<'_>) -> Result<(), MismatchKind> {
        if self.value() != other.value() {
            return Err(MismatchKind::Comment {
                left: self.value().to_string(),
                right: other.value().to_string(),
            });
        }
        Ok(())
    }
}

/// Asserts that two trees are structurally equal, see [`Tree::compare`].
///
/// ```ignore
/// vdom::assert_tree_eq!(expected, parsed);
/// ```
#[macro_export]
macro_rules! assert_tree_eq {
    ($left:expr, $right:expr $(,)?) => {{
        match (&$left, &$right) {
            (left_tree, right_tree) => {
                if let Err(mismatch) = $crate::Tree::compare(left_tree, right_tree) {
                    panic!(
                        "\n\
                        trees differ: {}\n\n\
                        left html:\n\
                        {}\n\n\
                        right html:\n\
                        {}\n",
                        mismatch,
                        left_tree.outer_html(),
                        right_tree.outer_html()
                    );
                }
            }
        }
    }};
}

/// Asserts that two trees are not structurally equal.
#[macro_export]
macro_rules! assert_tree_ne {
    ($left:expr, $right:expr $(,)?) => {{
        match (&$left, &$right) {
            (left_tree, right_tree) => {
                if $crate::Tree::compare(left_tree, right_tree).is_ok() {
                    panic!(
                        "\n\
                        trees were equal but expected to be different:\n\n\
                        html:\n\
                        {}\n",
                        left_tree.outer_html()
                    );
                }
            }
        }
    }};
}
