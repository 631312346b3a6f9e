//! Error types for tree construction
//!
//! Flat hierarchy. Comparison mismatches are not errors, see `compare::Mismatch`.

use thiserror::Error;

use crate::types::NodeId;

pub type Result<T> = std::result::Result<T, DomError>;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Offset {offset} is outside the source ({len} bytes)")]
    OffsetOutOfBounds { offset: usize, len: usize },

    #[error("Invalid span for <{name}>: {outer_start}..{outer_end} must contain {inner_start}..{inner_end}")]
    InvalidSpan {
        name: String,
        outer_start: usize,
        inner_start: usize,
        inner_end: usize,
        outer_end: usize,
    },

    #[error("Offset {0} does not fall on a UTF-8 character boundary")]
    NotCharBoundary(usize),

    #[error("close_element called with no open element")]
    NoOpenElement,

    #[error("close_element cannot close <{0}>, it was opened by a literal")]
    DetachedClose(String),

    #[error("{count} element(s) left open, innermost <{innermost}>")]
    UnclosedElements { count: usize, innermost: String },

    #[error("Maximum nesting depth exceeded: {current} > {max}")]
    MaxDepthExceeded { current: usize, max: usize },

    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),
}
