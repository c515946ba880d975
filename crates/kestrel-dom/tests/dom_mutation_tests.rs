//! Tests for tree mutation and queries: append_child, insert_before,
//! remove_child, text_content and element lookups.

use kestrel_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeType};

/// Helper to create an element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::new(tag, AttributesMap::new())))
}

fn alloc_text(tree: &mut DomTree, text: &str) -> NodeId {
    tree.alloc(NodeType::Text(text.to_string()))
}

/// Check that every child's sibling links agree with its position.
fn assert_links_consistent(tree: &DomTree, parent: NodeId) {
    let children = tree.children(parent);
    for (i, &child) in children.iter().enumerate() {
        assert_eq!(tree.parent(child), Some(parent));
        let expected_prev = i.checked_sub(1).map(|j| children[j]);
        let expected_next = children.get(i + 1).copied();
        assert_eq!(tree.prev_sibling(child), expected_prev, "prev of child {i}");
        assert_eq!(tree.next_sibling(child), expected_next, "next of child {i}");
    }
}

// ========== remove_child ==========

#[test]
fn test_remove_child_single_child() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let child = alloc_element(&mut tree, "p");
    tree.append_child(parent, child);
    assert_eq!(tree.children(parent).len(), 1);

    tree.remove_child(parent, child);

    assert!(tree.children(parent).is_empty());
    assert_eq!(tree.parent(child), None);
    assert_eq!(tree.prev_sibling(child), None);
    assert_eq!(tree.next_sibling(child), None);
}

#[test]
fn test_remove_child_middle_of_three() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "ul");
    tree.append_child(NodeId::ROOT, parent);

    let a = alloc_element(&mut tree, "li");
    let b = alloc_element(&mut tree, "li");
    let c = alloc_element(&mut tree, "li");
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append_child(parent, c);

    tree.remove_child(parent, b);

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
    assert_links_consistent(&tree, parent);
}

#[test]
fn test_remove_child_wrong_parent_is_noop() {
    let mut tree = DomTree::new();
    let div = alloc_element(&mut tree, "div");
    let span = alloc_element(&mut tree, "span");
    tree.append_child(NodeId::ROOT, div);
    tree.append_child(NodeId::ROOT, span);

    tree.remove_child(div, span);

    assert_eq!(tree.children(NodeId::ROOT), &[div, span]);
    assert_eq!(tree.parent(span), Some(NodeId::ROOT));
}

#[test]
fn test_removed_node_keeps_subtree() {
    let mut tree = DomTree::new();
    let div = alloc_element(&mut tree, "div");
    let text = alloc_text(&mut tree, "kept");
    tree.append_child(NodeId::ROOT, div);
    tree.append_child(div, text);

    tree.remove_child(NodeId::ROOT, div);

    assert_eq!(tree.children(div), &[text]);
    assert_eq!(tree.text_content(div), "kept");
    assert!(tree.children(NodeId::ROOT).is_empty());
}

// ========== insert_before ==========

#[test]
fn test_insert_before_first() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    let b = alloc_element(&mut tree, "b");
    let a = alloc_element(&mut tree, "a");
    tree.append_child(NodeId::ROOT, parent);
    tree.append_child(parent, b);

    tree.insert_before(parent, a, b);

    assert_eq!(tree.children(parent), &[a, b]);
    assert_eq!(tree.first_child(parent), Some(a));
    assert_eq!(tree.prev_sibling(a), None);
    assert_links_consistent(&tree, parent);
}

#[test]
fn test_insert_before_middle() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    let c = alloc_element(&mut tree, "c");
    tree.append_child(NodeId::ROOT, parent);
    tree.append_child(parent, a);
    tree.append_child(parent, c);

    tree.insert_before(parent, b, c);

    assert_eq!(tree.children(parent), &[a, b, c]);
    assert_links_consistent(&tree, parent);
}

#[test]
fn test_insert_before_unknown_reference_appends() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    let a = alloc_element(&mut tree, "a");
    let stranger = alloc_element(&mut tree, "x");
    let b = alloc_element(&mut tree, "b");
    tree.append_child(NodeId::ROOT, parent);
    tree.append_child(parent, a);

    tree.insert_before(parent, b, stranger);

    assert_eq!(tree.children(parent), &[a, b]);
    assert_eq!(tree.last_child(parent), Some(b));
    assert_links_consistent(&tree, parent);
}

#[test]
fn test_append_child_moves_attached_node() {
    let mut tree = DomTree::new();
    let first = alloc_element(&mut tree, "section");
    let second = alloc_element(&mut tree, "aside");
    let moved = alloc_element(&mut tree, "p");
    tree.append_child(NodeId::ROOT, first);
    tree.append_child(NodeId::ROOT, second);
    tree.append_child(first, moved);

    tree.append_child(second, moved);

    assert!(tree.children(first).is_empty());
    assert_eq!(tree.children(second), &[moved]);
    assert_eq!(tree.parent(moved), Some(second));
    assert_links_consistent(&tree, NodeId::ROOT);
}

// ========== traversal and queries ==========

fn sample_tree() -> (DomTree, NodeId, NodeId) {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    tree.append_child(NodeId::ROOT, html);

    let mut attrs = AttributesMap::new();
    let _ = attrs.insert("id".to_string(), "main".to_string());
    let _ = attrs.insert("class".to_string(), "wide  dark".to_string());
    let div = tree.alloc(NodeType::Element(ElementData::new("div", attrs)));
    tree.append_child(html, div);

    let hello = alloc_text(&mut tree, "Hello, ");
    tree.append_child(div, hello);
    let b = alloc_element(&mut tree, "B");
    tree.append_child(div, b);
    let world = alloc_text(&mut tree, "world");
    tree.append_child(b, world);
    let comment = tree.alloc(NodeType::Comment("ignored".to_string()));
    tree.append_child(div, comment);

    (tree, html, div)
}

#[test]
fn test_text_content_skips_comments() {
    let (tree, html, div) = sample_tree();
    assert_eq!(tree.text_content(div), "Hello, world");
    assert_eq!(tree.text_content(html), "Hello, world");
}

#[test]
fn test_elements_by_tag_name_is_case_insensitive() {
    let (tree, _, div) = sample_tree();
    let found = tree.elements_by_tag_name(NodeId::ROOT, "b");
    assert_eq!(found.len(), 1);
    assert_eq!(tree.parent(found[0]), Some(div));
}

#[test]
fn test_element_by_id_and_classes() {
    let (tree, _, div) = sample_tree();
    assert_eq!(tree.element_by_id(NodeId::ROOT, "main"), Some(div));
    assert_eq!(tree.element_by_id(NodeId::ROOT, "missing"), None);

    let el = tree.as_element(div).expect("div should be an element");
    let classes = el.classes();
    assert!(classes.contains("wide"));
    assert!(classes.contains("dark"));
    assert_eq!(classes.len(), 2);
}

#[test]
fn test_descendants_are_in_document_order() {
    let (tree, html, _) = sample_tree();
    let tags: Vec<String> = tree
        .descendants(NodeId::ROOT)
        .filter_map(|id| tree.as_element(id).map(|el| el.tag_name.clone()))
        .collect();
    assert_eq!(tags, ["html", "div", "B"]);
    assert_eq!(tree.document_element(), Some(html));
}

#[test]
fn test_ancestors_and_preceding_siblings() {
    let (tree, html, div) = sample_tree();
    let b = tree.elements_by_tag_name(div, "b")[0];

    let ancestors: Vec<NodeId> = tree.ancestors(b).collect();
    assert_eq!(ancestors, vec![div, html, NodeId::ROOT]);
    assert!(tree.is_descendant_of(b, html));
    assert!(!tree.is_descendant_of(html, b));

    let preceding: Vec<NodeId> = tree.preceding_siblings(b).collect();
    assert_eq!(preceding.len(), 1);
    assert_eq!(tree.as_text(preceding[0]), Some("Hello, "));
}

#[test]
fn test_find_all_with_predicate() {
    let (tree, _, div) = sample_tree();
    let with_id = tree.find_all(NodeId::ROOT, |t, id| {
        t.as_element(id).is_some_and(|el| el.id().is_some())
    });
    assert_eq!(with_id, vec![div]);
}
