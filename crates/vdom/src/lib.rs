//! Virtual DOM trees for tests and automation
//!
//! A read-only, in-memory model of a parsed HTML/XML document that can:
//!
//! - reconstruct the original markup of any node or subtree,
//! - address any node by its path of child indices from the roots,
//! - derive a positional CSS selector for the matching node in a live DOM,
//! - compare an expected tree (written as a literal) with a parsed one and
//!   report the first difference.
//!
//! ## Core Design
//!
//! ```text
//! parser events → TreeBuilder → Tree (arena + Arc<str> source) → NodeRef<'t>
//!                                  ↑                                 ↓
//!                 Literal ─────────┘                 html / index_path / selector
//!                                                    Tree::compare → Mismatch
//! ```
//!
//! Nodes never own their parents: parent links are arena ids, children are
//! owned by the tree, and nothing changes once the tree is built.

pub mod builder;
pub mod compare;
pub mod error;
pub mod literal;
pub mod node;
pub mod selector;
pub mod tree;
pub mod types;

pub use builder::{BuilderConfig, TreeBuilder};
pub use compare::{compare_nodes, Mismatch, MismatchKind};
pub use error::{DomError, Result};
pub use literal::Literal;
pub use node::{Children, CommentRef, ElementRef, Node, NodeRef, TextRef};
pub use selector::{selector_for, xpath_for};
pub use tree::{Descendants, Tree};
pub use types::*;
