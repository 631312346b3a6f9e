use vdom::{assert_tree_eq, assert_tree_ne, Attribute, Literal, MismatchKind, Node, Tree, TreeBuilder};

/// Mimics what a parser reports for
/// `<div class="card"><p>Tom &amp; Jerry</p><img src="a.png" alt="x"><!-- end --></div>`
fn parsed_card() -> Tree {
    let source = r#"<div class="card"><p>Tom &amp; Jerry</p><img src="a.png" alt="x"><!-- end --></div>"#;
    let mut builder = TreeBuilder::new(source);
    builder
        .open_element("div", vec![Attribute::new("class", "card")], 0, 18)
        .unwrap();
    builder.open_element("p", vec![], 18, 21).unwrap();
    builder.text("Tom & Jerry").unwrap();
    builder.close_element(36, 40).unwrap();
    builder
        .auto_closed_element(
            "img",
            vec![Attribute::new("src", "a.png"), Attribute::new("alt", "x")],
        )
        .unwrap();
    builder.comment(" end ").unwrap();
    builder.close_element(77, 83).unwrap();
    builder.finish().unwrap()
}

fn expected_card() -> Tree {
    Tree::from_literals([Literal::element("div")
        .attr("class", "card")
        .child(Literal::element("p").child(Literal::text("Tom & Jerry")))
        .child(Literal::element("img").attr("src", "a.png").attr("alt", "x"))
        .child(Literal::comment(" end "))])
    .unwrap()
}

#[test]
fn parsed_tree_matches_expected_literal() {
    let parsed = parsed_card();
    let expected = expected_card();

    assert_tree_eq!(expected, parsed);
    assert_tree_eq!(parsed, parsed);
}

#[test]
fn html_reconstruction() {
    let tree = parsed_card();

    assert_eq!(
        tree.html(),
        r#"<div class="card"><p>Tom & Jerry</p><img src="a.png" alt="x"><!-- end --></div>"#
    );

    let p = tree.node_at(&[0, 0]).unwrap().as_element().unwrap();
    assert_eq!(p.html(), "<p>Tom & Jerry</p>");

    let img = tree.node_at(&[0, 1]).unwrap().as_element().unwrap();
    assert_eq!(img.html(), r#"<img src="a.png" alt="x">"#);
    assert!(img.inner_html().is_none());

    let comment = tree.node_at(&[0, 2]).unwrap();
    assert_eq!(comment.html(), "<!-- end -->");
}

#[test]
fn selectors_follow_index_paths() {
    let tree = parsed_card();

    let selectors: Vec<String> = tree
        .descendants()
        .filter_map(|node| node.as_element())
        .map(|el| el.selector())
        .collect();

    assert_eq!(
        selectors,
        vec![
            "*:nth-child(1)",
            "*:nth-child(1) > *:nth-child(1)",
            "*:nth-child(1) > *:nth-child(2)",
        ]
    );
}

#[test]
fn extra_child_is_reported_on_parent() {
    let one = Tree::from_literals([Literal::element("div")
        .child(Literal::element("p").child(Literal::text("hi")))])
    .unwrap();
    let two = Tree::from_literals([Literal::element("div")
        .child(Literal::element("p").child(Literal::text("hi")))
        .child(Literal::element("p").child(Literal::text("bye")))])
    .unwrap();

    let mismatch = one.compare(&two).unwrap_err();
    assert_eq!(mismatch.kind, MismatchKind::ChildCount { left: 1, right: 2 });
    assert!(mismatch.to_string().contains("1 children but other has 2"));
    assert_tree_ne!(one, two);
}

#[test]
fn every_single_field_change_is_detected() {
    let base = expected_card();
    let card = |name: &str, text: &str, img: Literal, comment: &str| {
        Literal::element(name)
            .attr("class", "card")
            .child(Literal::element("p").child(Literal::text(text)))
            .child(img)
            .child(Literal::comment(comment))
    };
    let img = || Literal::element("img");
    let cases = [
        (
            card("section", "Tom & Jerry", img().attr("src", "a.png").attr("alt", "x"), " end "),
            vec![0],
            MismatchKind::Name {
                left: "div".to_string(),
                right: "section".to_string(),
            },
            "name was section but other name was div",
        ),
        (
            card("div", "Tom and Jerry", img().attr("src", "a.png").attr("alt", "x"), " end "),
            vec![0, 0, 0],
            MismatchKind::Text {
                left: "Tom & Jerry".to_string(),
                right: "Tom and Jerry".to_string(),
            },
            r#"text value was "Tom and Jerry" but other value was "Tom & Jerry""#,
        ),
        (
            card("div", "Tom & Jerry", img().attr("alt", "x").attr("src", "a.png"), " end "),
            vec![0, 1],
            MismatchKind::Attr {
                index: 0,
                left: Attribute::new("src", "a.png"),
                right: Attribute::new("alt", "x"),
            },
            r#"attrs[0] was alt="x" but other attrs[0] was src="a.png""#,
        ),
        (
            card("div", "Tom & Jerry", img().attr("src", "b.png").attr("alt", "x"), " end "),
            vec![0, 1],
            MismatchKind::Attr {
                index: 0,
                left: Attribute::new("src", "a.png"),
                right: Attribute::new("src", "b.png"),
            },
            r#"attrs[0] was src="b.png" but other attrs[0] was src="a.png""#,
        ),
        (
            card("div", "Tom & Jerry", img().attr("src", "a.png").attr("alt", "x"), " fin "),
            vec![0, 2],
            MismatchKind::Comment {
                left: " end ".to_string(),
                right: " fin ".to_string(),
            },
            r#"comment value was " fin " but other value was " end ""#,
        ),
    ];

    for (variant, path, kind, reversed) in cases {
        let changed = Tree::from_literals([variant]).unwrap();

        let mismatch = base.compare(&changed).unwrap_err();
        assert_eq!(mismatch.path.as_slice(), path.as_slice());
        assert_eq!(mismatch.kind, kind);

        let mismatch = changed.compare(&base).unwrap_err();
        assert_eq!(mismatch.path.as_slice(), path.as_slice());
        assert!(
            mismatch.to_string().contains(reversed),
            "{mismatch} should mention {reversed}"
        );
    }
}

#[test]
fn trees_are_readable_from_many_threads() {
    let tree = parsed_card();
    let expected = expected_card();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                assert!(tree.matches(&expected));
                assert_eq!(tree.element_by_id("nope"), None);
                assert_eq!(tree.elements_by_name("img").len(), 1);
            });
        }
    });
}
