//! Core type definitions
//!
//! Key design principles:
//! 1. Use u32 for node ids (index into the tree's arena, never a pointer)
//! 2. Use SmallVec for short sequences (children, index paths)
//! 3. Parent links are ids: navigation goes both ways, ownership only down

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::ops::Range;

/// Node identifier (index into the tree arena)
pub type NodeId = u32;

/// Root-relative path of zero-based child positions.
///
/// A root at position `i` has the path `[i]`, its third child `[i, 2]`, and
/// so on. Documents rarely nest deeper than eight levels.
pub type IndexPath = SmallVec<[usize; 8]>;

/// An xml/html attribute, e.g. `href="/"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=\"{}\"", self.name, self.value)
    }
}

/// The closed set of node variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Element,
    Text,
    Comment,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Element => "Element",
            NodeKind::Text => "Text",
            NodeKind::Comment => "Comment",
        };
        f.write_str(name)
    }
}

/// Where an element's markup comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    /// Byte ranges into the tree's source. `outer` spans the open tag through
    /// the close tag, `inner` the content strictly between them.
    Sliced {
        outer: Range<usize>,
        inner: Range<usize>,
    },
    /// No close tag and no content in the source (void or self-closing).
    AutoClosed,
    /// Built from a literal; there is no source to slice.
    Detached,
}

/// Arena record for one node
#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) parent: Option<NodeId>,
    pub(crate) index: IndexPath,
    pub(crate) content: Content,
}

#[derive(Debug, Clone)]
pub(crate) enum Content {
    Element(ElementData),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
pub(crate) struct ElementData {
    pub(crate) name: String,
    pub(crate) attrs: Vec<Attribute>,
    pub(crate) children: SmallVec<[NodeId; 4]>, // most elements have <4 children
    pub(crate) markup: Markup,
}

impl NodeData {
    pub(crate) fn children(&self) -> &[NodeId] {
        match &self.content {
            Content::Element(el) => &el.children,
            Content::Text(_) | Content::Comment(_) => &[],
        }
    }
}
