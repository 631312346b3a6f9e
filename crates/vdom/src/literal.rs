//! Literal trees for writing expected documents in tests
//!
//! ```ignore
//! let expected = Tree::from_literals([
//!     Literal::element("ul")
//!         .attr("id", "list")
//!         .child(Literal::element("li").child(Literal::text("one"))),
//! ])?;
//! vdom::assert_tree_eq!(expected, parsed);
//! ```
//!
//! Literals carry no parent links and no source; comparison ignores both.
//! The same shape round-trips through JSON so expected trees can live in
//! fixture files:
//!
//! ```json
//! [{"type": "element", "name": "ul", "attrs": [{"name": "id", "value": "list"}],
//!   "children": [{"type": "text", "value": "one"}]}]
//! ```

use serde::{Deserialize, Serialize};

use crate::builder::TreeBuilder;
use crate::error::Result;
use crate::node::{Node, NodeRef};
use crate::tree::Tree;
use crate::types::{Attribute, NodeId};

/// An owned node description, buildable inline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Literal {
    Element {
        name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        attrs: Vec<Attribute>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<Literal>,
    },
    Text {
        value: String,
    },
    Comment {
        value: String,
    },
}

impl Literal {
    pub fn element(name: impl Into<String>) -> Self {
        Literal::Element {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Literal::Text {
            value: value.into(),
        }
    }

    pub fn comment(value: impl Into<String>) -> Self {
        Literal::Comment {
            value: value.into(),
        }
    }

    /// Append an attribute. No-op on text and comments.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Literal::Element { attrs, .. } = &mut self {
            attrs.push(Attribute::new(name, value));
        }
        self
    }

    /// Append a child. No-op on text and comments.
    pub fn child(mut self, child: Literal) -> Self {
        if let Literal::Element { children, .. } = &mut self {
            children.push(child);
        }
        self
    }

    /// Append several children. No-op on text and comments.
    pub fn children<I>(mut self, new_children: I) -> Self
    where
        I: IntoIterator<Item = Literal>,
    {
        if let Literal::Element { children, .. } = &mut self {
            children.extend(new_children);
        }
        self
    }
}

impl TreeBuilder {
    /// Append a literal subtree at the current position.
    ///
    /// Its elements are detached: their html is rebuilt from the nodes
    /// rather than sliced from the source. On error nothing of the subtree
    /// is kept and the builder is left as it was before the call.
    pub fn literal(&mut self, literal: &Literal) -> Result<NodeId> {
        let checkpoint = self.checkpoint();
        let result = self.push_literal(literal);
        if result.is_err() {
            self.rollback(checkpoint);
        }
        result
    }

    fn push_literal(&mut self, literal: &Literal) -> Result<NodeId> {
        match literal {
            Literal::Element {
                name,
                attrs,
                children,
            } => {
                let id = self.open_detached(name.clone(), attrs.clone())?;
                for child in children {
                    self.push_literal(child)?;
                }
                self.close_detached()?;
                Ok(id)
            }
            Literal::Text { value } => self.text(value.clone()),
            Literal::Comment { value } => self.comment(value.clone()),
        }
    }
}

impl NodeRef<'_> {
    /// Snapshot this node and its subtree
    pub fn to_literal(&self) -> Literal {
        match self {
            NodeRef::Element(el) => Literal::Element {
                name: el.name().to_string(),
                attrs: el.attrs().to_vec(),
                children: el.children().map(|child| child.to_literal()).collect(),
            },
            NodeRef::Text(text) => Literal::text(text.value()),
            NodeRef::Comment(comment) => Literal::comment(comment.value()),
        }
    }
}

impl Tree {
    /// Build a tree from literal roots; the tree has an empty source.
    pub fn from_literals<I>(roots: I) -> Result<Tree>
    where
        I: IntoIterator<Item = Literal>,
    {
        let mut builder = TreeBuilder::new("");
        for root in roots {
            builder.literal(&root)?;
        }
        builder.finish()
    }

    /// Build a tree from a JSON array of literals
    pub fn from_json(json: &str) -> Result<Tree> {
        let roots: Vec<Literal> = serde_json::from_str(json)?;
        Self::from_literals(roots)
    }

    /// Snapshot every root as a literal
    pub fn to_literals(&self) -> Vec<Literal> {
        self.roots().map(|root| root.to_literal()).collect()
    }

    /// Snapshot the tree as a pretty-printed JSON array of literals
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_literals())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::BuilderConfig;
    use crate::error::DomError;
    use crate::types::Markup;

    #[test]
    fn test_literal_tree_structure() {
        let tree = Tree::from_literals([
            Literal::element("ul")
                .attr("id", "list")
                .children([Literal::element("li"), Literal::element("li")]),
            Literal::comment("end"),
        ])
        .unwrap();

        assert_eq!(tree.root_count(), 2);
        assert_eq!(tree.source(), "");

        let second = tree.node_at(&[0, 1]).unwrap().as_element().unwrap();
        assert_eq!(second.name(), "li");
        assert_eq!(second.parent().unwrap().name(), "ul");
        assert_eq!(second.markup(), &Markup::Detached);
        assert_eq!(second.selector(), "*:nth-child(1) > *:nth-child(2)");
    }

    #[test]
    fn test_detached_html_is_rebuilt() {
        let tree = Tree::from_literals([Literal::element("p")
            .attr("class", "x")
            .child(Literal::text("a"))
            .child(Literal::element("b").child(Literal::text("c")))
            .child(Literal::comment("d"))])
        .unwrap();

        let p = tree.roots().next().unwrap().as_element().unwrap();
        assert_eq!(p.html(), r#"<p class="x">a<b>c</b><!--d--></p>"#);
        assert_eq!(p.inner_html().unwrap(), "a<b>c</b><!--d-->");
        assert_eq!(tree.outer_html(), r#"<p class="x">a<b>c</b><!--d--></p>"#);
        assert_eq!(tree.html(), "");
    }

    #[test]
    fn test_builders_ignore_non_elements() {
        let text = Literal::text("x").attr("id", "y").child(Literal::text("z"));
        assert_eq!(text, Literal::text("x"));
    }

    #[test]
    fn test_from_json_fixture() {
        let fixture = serde_json::json!([
            {
                "type": "element",
                "name": "div",
                "attrs": [{"name": "id", "value": "main"}],
                "children": [
                    {"type": "text", "value": "hi"},
                    {"type": "comment", "value": " c "}
                ]
            },
            {"type": "element", "name": "br"}
        ]);

        let tree = Tree::from_json(&fixture.to_string()).unwrap();
        let expected = Tree::from_literals([
            Literal::element("div")
                .attr("id", "main")
                .child(Literal::text("hi"))
                .child(Literal::comment(" c ")),
            Literal::element("br"),
        ])
        .unwrap();

        assert_eq!(tree.compare(&expected), Ok(()));
        assert_eq!(tree.element_by_id("main").unwrap().name(), "div");
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = Tree::from_json(r#"[{"type": "element"}]"#).unwrap_err();
        assert!(matches!(err, DomError::ParseError(_)));
    }

    fn too_deep() -> Literal {
        Literal::element("a").child(Literal::element("b").child(Literal::element("c")))
    }

    #[test]
    fn test_failed_literal_leaves_builder_untouched() {
        let config = BuilderConfig {
            max_depth: 2,
            ..Default::default()
        };
        let mut builder = TreeBuilder::with_config("<p></p>", config);
        let p = builder.open_element("p", vec![], 0, 3).unwrap();

        let err = builder.literal(&too_deep()).unwrap_err();
        assert!(matches!(
            err,
            DomError::MaxDepthExceeded { current: 3, max: 2 }
        ));

        // The parser's own element is still the innermost one
        assert_eq!(builder.close_element(3, 7).unwrap(), p);
        let tree = builder.finish().unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.element(p).unwrap().children().len(), 0);
        assert_eq!(tree.html(), "<p></p>");
    }

    #[test]
    fn test_failed_root_literal_is_dropped() {
        let config = BuilderConfig {
            max_depth: 2,
            ..Default::default()
        };
        let mut builder = TreeBuilder::with_config("", config);
        builder.literal(&Literal::comment("kept")).unwrap();
        assert!(builder.literal(&too_deep()).is_err());

        let tree = builder.finish().unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root_count(), 1);
        assert_eq!(tree.outer_html(), "<!--kept-->");
    }

    #[test]
    fn test_snapshot_round_trip() {
        let source = "<p>x</p>";
        let mut builder = TreeBuilder::new(source);
        builder.open_element("p", vec![], 0, 3).unwrap();
        builder.text("x").unwrap();
        builder.close_element(4, 8).unwrap();
        let parsed = builder.finish().unwrap();

        let json = parsed.to_json().unwrap();
        let restored = Tree::from_json(&json).unwrap();

        assert_eq!(parsed.to_literals(), restored.to_literals());
        assert!(parsed.matches(&restored));
        assert_eq!(restored.outer_html(), source);
    }
}
