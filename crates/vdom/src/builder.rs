//! Tree Builder - the construction interface a markup parser drives
//!
//! The parser reports what it scans, in document order:
//!
//! ```text
//! <div class="a">hi<br></div>
//! open_element("div", [class=a], 0, 15)
//!                 text("hi")
//!                   auto_closed_element("br", [])
//!                        close_element(21, 27)
//! ```
//!
//! Parent links and index paths are assigned here from sibling order, so a
//! parser cannot hand out paths that disagree with the structure. Offsets
//! are checked against the source before they are stored.

use ahash::AHashMap;
use smallvec::{smallvec, SmallVec};
use std::sync::Arc;

use crate::error::{DomError, Result};
use crate::tree::Tree;
use crate::types::{Attribute, Content, ElementData, IndexPath, Markup, NodeData, NodeId};

/// Configuration for tree construction
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    /// Deepest allowed nesting (length of the longest index path)
    pub max_depth: usize,
    /// Arena pre-allocation hint
    pub capacity: usize,
    /// Build the `id` attribute index used by `Tree::element_by_id`
    pub index_ids: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            max_depth: 512,
            capacity: 256,
            index_ids: true,
        }
    }
}

/// An element whose close tag has not been seen yet
#[derive(Debug)]
struct OpenElement {
    id: NodeId,
    /// `(outer_start, inner_start)`, `None` for detached elements
    starts: Option<(usize, usize)>,
}

/// Builder extent captured by [`TreeBuilder::checkpoint`]
#[derive(Debug, Clone, Copy)]
pub(crate) struct Checkpoint {
    nodes: usize,
    roots: usize,
    open: usize,
    /// Child count of the innermost open element
    children: usize,
}

/// Incrementally builds a [`Tree`]; nothing is visible until `finish`
#[derive(Debug)]
pub struct TreeBuilder {
    config: BuilderConfig,
    source: Arc<str>,
    nodes: Vec<NodeData>,
    roots: SmallVec<[NodeId; 4]>,
    open: Vec<OpenElement>,
}

impl TreeBuilder {
    /// Create a builder over `source` with default config
    pub fn new(source: impl Into<Arc<str>>) -> Self {
        Self::with_config(source, BuilderConfig::default())
    }

    pub fn with_config(source: impl Into<Arc<str>>, config: BuilderConfig) -> Self {
        Self {
            nodes: Vec::with_capacity(config.capacity),
            config,
            source: source.into(),
            roots: SmallVec::new(),
            open: Vec::new(),
        }
    }

    /// Start an element whose open tag spans `outer_start..inner_start`.
    ///
    /// Following nodes become its children until `close_element`.
    pub fn open_element(
        &mut self,
        name: impl Into<String>,
        attrs: Vec<Attribute>,
        outer_start: usize,
        inner_start: usize,
    ) -> Result<NodeId> {
        let name = name.into();
        self.check_offset(outer_start)?;
        self.check_offset(inner_start)?;
        if outer_start > inner_start {
            return Err(DomError::InvalidSpan {
                name,
                outer_start,
                inner_start,
                inner_end: inner_start,
                outer_end: inner_start,
            });
        }

        tracing::trace!("open <{}> at {}", name, outer_start);
        let id = self.push_element(name, attrs, Markup::Detached)?;
        self.open.push(OpenElement {
            id,
            starts: Some((outer_start, inner_start)),
        });
        Ok(id)
    }

    /// Close the innermost open element; its close tag spans
    /// `inner_end..outer_end`.
    pub fn close_element(&mut self, inner_end: usize, outer_end: usize) -> Result<NodeId> {
        self.check_offset(inner_end)?;
        self.check_offset(outer_end)?;

        let open = self.open.last().ok_or(DomError::NoOpenElement)?;
        let id = open.id;
        let markup = match open.starts {
            Some((outer_start, inner_start)) => {
                if inner_start > inner_end || inner_end > outer_end {
                    return Err(DomError::InvalidSpan {
                        name: self.element_name(id).to_string(),
                        outer_start,
                        inner_start,
                        inner_end,
                        outer_end,
                    });
                }
                Markup::Sliced {
                    outer: outer_start..outer_end,
                    inner: inner_start..inner_end,
                }
            }
            None => return Err(DomError::DetachedClose(self.element_name(id).to_string())),
        };

        self.open.pop();
        if let Content::Element(el) = &mut self.nodes[id as usize].content {
            el.markup = markup;
        }
        tracing::trace!("close <{}> at {}", self.element_name(id), outer_end);
        Ok(id)
    }

    /// Add an element with no close tag and no content (void or self-closing)
    pub fn auto_closed_element(
        &mut self,
        name: impl Into<String>,
        attrs: Vec<Attribute>,
    ) -> Result<NodeId> {
        let name = name.into();
        tracing::trace!("auto-closed <{}>", name);
        self.push_element(name, attrs, Markup::AutoClosed)
    }

    /// Add a text node; `value` is already decoded
    pub fn text(&mut self, value: impl Into<String>) -> Result<NodeId> {
        self.push_node(Content::Text(value.into()))
    }

    /// Add a comment; `value` excludes the `<!--` and `-->` markers
    pub fn comment(&mut self, value: impl Into<String>) -> Result<NodeId> {
        self.push_node(Content::Comment(value.into()))
    }

    /// Open an element with no source backing (used for literals)
    pub(crate) fn open_detached(
        &mut self,
        name: impl Into<String>,
        attrs: Vec<Attribute>,
    ) -> Result<NodeId> {
        let id = self.push_element(name.into(), attrs, Markup::Detached)?;
        self.open.push(OpenElement { id, starts: None });
        Ok(id)
    }

    pub(crate) fn close_detached(&mut self) -> Result<NodeId> {
        let open = self.open.pop().ok_or(DomError::NoOpenElement)?;
        Ok(open.id)
    }

    /// Record the builder's extent so a failed subtree can be undone
    pub(crate) fn checkpoint(&self) -> Checkpoint {
        let children = self
            .open
            .last()
            .map_or(0, |open| self.nodes[open.id as usize].children().len());
        Checkpoint {
            nodes: self.nodes.len(),
            roots: self.roots.len(),
            open: self.open.len(),
            children,
        }
    }

    /// Drop everything added since `checkpoint`, including open elements
    pub(crate) fn rollback(&mut self, checkpoint: Checkpoint) {
        self.open.truncate(checkpoint.open);
        if let Some(open) = self.open.last() {
            if let Content::Element(el) = &mut self.nodes[open.id as usize].content {
                el.children.truncate(checkpoint.children);
            }
        }
        self.roots.truncate(checkpoint.roots);
        self.nodes.truncate(checkpoint.nodes);
        tracing::trace!("rolled back to {} nodes", checkpoint.nodes);
    }

    /// Finish construction. Fails if any element is still open.
    pub fn finish(self) -> Result<Tree> {
        if let Some(innermost) = self.open.last() {
            return Err(DomError::UnclosedElements {
                count: self.open.len(),
                innermost: self.element_name(innermost.id).to_string(),
            });
        }

        let mut ids = AHashMap::new();
        if self.config.index_ids {
            for (index, node) in self.nodes.iter().enumerate() {
                if let Content::Element(el) = &node.content {
                    if let Some(attr) = el.attrs.iter().find(|attr| attr.name == "id") {
                        ids.entry(attr.value.clone()).or_insert(index as NodeId);
                    }
                }
            }
        }

        tracing::debug!(
            "built tree: {} nodes, {} roots, {} source bytes",
            self.nodes.len(),
            self.roots.len(),
            self.source.len()
        );
        Ok(Tree::from_parts(self.nodes, self.roots, self.source, ids))
    }

    fn push_element(
        &mut self,
        name: String,
        attrs: Vec<Attribute>,
        markup: Markup,
    ) -> Result<NodeId> {
        self.push_node(Content::Element(ElementData {
            name,
            attrs,
            children: SmallVec::new(),
            markup,
        }))
    }

    /// Append a node under the innermost open element (or as a root)
    fn push_node(&mut self, content: Content) -> Result<NodeId> {
        let depth = self.open.len() + 1;
        if depth > self.config.max_depth {
            return Err(DomError::MaxDepthExceeded {
                current: depth,
                max: self.config.max_depth,
            });
        }

        let id = self.nodes.len() as NodeId;
        let (parent, index): (Option<NodeId>, IndexPath) = match self.open.last().map(|o| o.id) {
            Some(parent_id) => {
                let parent = &mut self.nodes[parent_id as usize];
                let mut index = parent.index.clone();
                let Content::Element(el) = &mut parent.content else {
                    return Err(DomError::NodeNotFound(parent_id));
                };
                index.push(el.children.len());
                el.children.push(id);
                (Some(parent_id), index)
            }
            None => {
                let index = smallvec![self.roots.len()];
                self.roots.push(id);
                (None, index)
            }
        };

        self.nodes.push(NodeData {
            parent,
            index,
            content,
        });
        Ok(id)
    }

    fn check_offset(&self, offset: usize) -> Result<()> {
        if offset > self.source.len() {
            return Err(DomError::OffsetOutOfBounds {
                offset,
                len: self.source.len(),
            });
        }
        if !self.source.is_char_boundary(offset) {
            return Err(DomError::NotCharBoundary(offset));
        }
        Ok(())
    }

    fn element_name(&self, id: NodeId) -> &str {
        match &self.nodes[id as usize].content {
            Content::Element(el) => &el.name,
            Content::Text(_) | Content::Comment(_) => "",
        }
    }
}
