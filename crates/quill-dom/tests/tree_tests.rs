//! Tests for tree construction, traversal and release.

use std::cell::Cell;
use std::rc::Rc;

use quill_dom::{NodeId, Tree};

/// Helper to build `root -> [a -> [a1, a2], b]` and return the ids.
fn sample() -> (Tree<&'static str>, [NodeId; 4]) {
    let mut tree = Tree::new("root");
    let a = tree.append(NodeId::ROOT, "a");
    let a1 = tree.append(a, "a1");
    let a2 = tree.append(a, "a2");
    let b = tree.append(NodeId::ROOT, "b");
    (tree, [a, a1, a2, b])
}

// ========== append ==========

#[test]
fn test_new_tree_has_only_root() {
    let tree = Tree::new(());
    assert_eq!(tree.len(), 1);
    assert!(!tree.is_empty());
    assert_eq!(tree.root(), NodeId::ROOT);
    assert!(tree.children(NodeId::ROOT).is_empty());
}

#[test]
fn test_append_links_siblings() {
    let (tree, [a, a1, a2, b]) = sample();
    assert_eq!(tree.children(NodeId::ROOT), &[a, b]);
    assert_eq!(tree.children(a), &[a1, a2]);
    assert_eq!(tree.next_sibling(a1), Some(a2));
    assert_eq!(tree.prev_sibling(a2), Some(a1));
    assert_eq!(tree.next_sibling(a2), None);
    assert_eq!(tree.prev_sibling(a), None);
    assert_eq!(tree.first_child(a), Some(a1));
    assert_eq!(tree.last_child(a), Some(a2));
    assert_eq!(tree.parent(a1), Some(a));
    assert_eq!(tree.parent(NodeId::ROOT), None);
}

#[test]
fn test_alloc_is_detached_until_appended() {
    let mut tree = Tree::new(0);
    let id = tree.alloc(1);
    assert_eq!(tree.parent(id), None);
    assert!(tree.children(NodeId::ROOT).is_empty());
    tree.append_child(NodeId::ROOT, id);
    assert_eq!(tree.parent(id), Some(NodeId::ROOT));
}

#[test]
fn test_data_access() {
    let (mut tree, [a, ..]) = sample();
    assert_eq!(tree.data(a), Some(&"a"));
    if let Some(data) = tree.data_mut(a) {
        *data = "renamed";
    }
    assert_eq!(tree.data(a), Some(&"renamed"));
    assert_eq!(tree.data(NodeId(99)), None);
    assert!(tree.children(NodeId(99)).is_empty());
}

// ========== traversal ==========

#[test]
fn test_ancestors_and_descendants() {
    let (tree, [a, a1, _, b]) = sample();
    let ancestors: Vec<NodeId> = tree.ancestors(a1).collect();
    assert_eq!(ancestors, vec![a, NodeId::ROOT]);
    assert!(tree.is_descendant_of(a1, a));
    assert!(!tree.is_descendant_of(a1, b));
}

#[test]
fn test_following_siblings() {
    let (tree, [a, _, _, b]) = sample();
    let following: Vec<NodeId> = tree.following_siblings(a).collect();
    assert_eq!(following, vec![b]);
}

#[test]
fn test_walk_is_preorder_with_depth() {
    let (tree, _) = sample();
    let walked: Vec<(&str, usize)> = tree
        .walk()
        .filter_map(|(id, depth)| tree.data(id).map(|d| (*d, depth)))
        .collect();
    assert_eq!(walked, vec![("a", 0), ("a1", 1), ("a2", 1), ("b", 0)]);
}

#[test]
fn test_walk_from_subtree() {
    let (tree, [a, a1, a2, _]) = sample();
    let walked: Vec<NodeId> = tree.walk_from(a).map(|(id, _)| id).collect();
    assert_eq!(walked, vec![a1, a2]);
}

#[test]
fn test_into_data_keeps_allocation_order() {
    let (tree, _) = sample();
    assert_eq!(tree.into_data(), vec!["root", "a", "a1", "a2", "b"]);
}

// ========== release ==========

/// Payload that counts how often it is dropped.
struct Counted(Rc<Cell<usize>>);

impl Drop for Counted {
    fn drop(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

#[test]
fn test_drop_releases_every_node_once() {
    let drops = Rc::new(Cell::new(0));
    {
        let mut tree = Tree::new(Counted(Rc::clone(&drops)));
        let mut parent = NodeId::ROOT;
        for i in 0..50 {
            let id = tree.append(parent, Counted(Rc::clone(&drops)));
            if i % 3 == 0 {
                parent = id;
            }
        }
        // a detached node is released with the rest
        let _ = tree.alloc(Counted(Rc::clone(&drops)));
        assert_eq!(drops.get(), 0);
    }
    assert_eq!(drops.get(), 52);
}
