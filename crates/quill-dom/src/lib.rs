//! Arena tree used by the quill tree builders.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues. Nodes are
//! only ever appended; the whole tree is released at once when it is dropped,
//! so every payload is dropped exactly once.
//!
//! The payload type is generic: the HTML and XML flavours each bring their own
//! node enum.

/// A type-safe index into a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// One arena slot: a payload plus its structural links.
#[derive(Debug, Clone)]
pub struct Node<T> {
    /// Node payload.
    pub data: T,

    /// Parent node; `None` for the root and for allocated-but-detached nodes.
    pub parent: Option<NodeId>,

    /// Children in document order.
    pub children: Vec<NodeId>,

    /// The node immediately following this one under the same parent.
    pub next_sibling: Option<NodeId>,

    /// The node immediately preceding this one under the same parent.
    pub prev_sibling: Option<NodeId>,
}

impl<T> Node<T> {
    const fn detached(data: T) -> Self {
        Self {
            data,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        }
    }
}

/// Arena-based tree with O(1) node access and traversal.
///
/// This structure stores all nodes in a contiguous vector, using indices
/// for all relationships:
/// - O(1) access to any node by `NodeId`
/// - O(1) parent/sibling traversal
/// - O(1) append after the current last child
#[derive(Debug, Clone)]
pub struct Tree<T> {
    /// All nodes in the tree, indexed by `NodeId`.
    /// The root node is always at index 0 (`NodeId::ROOT`).
    nodes: Vec<Node<T>>,
}

impl<T> Tree<T> {
    /// Create a tree holding just the root node.
    #[must_use]
    pub fn new(root: T) -> Self {
        Self {
            nodes: vec![Node::detached(root)],
        }
    }

    /// Get the root node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        self.nodes.get_mut(id.0)
    }

    /// Get the payload of a node.
    #[must_use]
    pub fn data(&self, id: NodeId) -> Option<&T> {
        self.get(id).map(|n| &n.data)
    }

    /// Get a mutable reference to the payload of a node.
    pub fn data_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.get_mut(id).map(|n| &mut n.data)
    }

    /// Get the number of nodes in the tree, the root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a tree has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, data: T) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::detached(data));
        id
    }

    /// Appends `child` as the last child of `parent`, updating all relationships.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let prev_last_child = self.nodes[parent.0].children.last().copied();

        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);

        if let Some(prev_id) = prev_last_child {
            self.nodes[prev_id.0].next_sibling = Some(child);
            self.nodes[child.0].prev_sibling = Some(prev_id);
        }
    }

    /// Allocate `data` and append it under `parent` in one step.
    pub fn append(&mut self, parent: NodeId, data: T) -> NodeId {
        let id = self.alloc(data);
        self.append_child(parent, id);
        id
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Get the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.first().copied())
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.last().copied())
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// Check if `descendant` is a descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_, T> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over the siblings following a node.
    #[must_use]
    pub fn following_siblings(&self, id: NodeId) -> SiblingIterator<'_, T> {
        SiblingIterator {
            tree: self,
            current: self.next_sibling(id),
        }
    }

    /// Pre-order walk over every node below the root.
    ///
    /// Yields `(id, depth)` where the root's children have depth 0.
    #[must_use]
    pub fn walk(&self) -> Walk<'_, T> {
        self.walk_from(NodeId::ROOT)
    }

    /// Pre-order walk over the descendants of `start` (excluding `start`).
    #[must_use]
    pub fn walk_from(&self, start: NodeId) -> Walk<'_, T> {
        Walk {
            tree: self,
            stack: self
                .children(start)
                .iter()
                .rev()
                .map(|&id| (id, 0))
                .collect(),
        }
    }

    /// Consume the tree, returning the payloads in allocation order.
    #[must_use]
    pub fn into_data(self) -> Vec<T> {
        self.nodes.into_iter().map(|n| n.data).collect()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a, T> {
    tree: &'a Tree<T>,
    current: Option<NodeId>,
}

impl<T> Iterator for AncestorIterator<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Iterator over the following siblings of a node.
pub struct SiblingIterator<'a, T> {
    tree: &'a Tree<T>,
    current: Option<NodeId>,
}

impl<T> Iterator for SiblingIterator<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.next_sibling(id);
        Some(id)
    }
}

/// Depth-first pre-order walk, see [`Tree::walk`].
pub struct Walk<'a, T> {
    tree: &'a Tree<T>,
    stack: Vec<(NodeId, usize)>,
}

impl<T> Iterator for Walk<'_, T> {
    type Item = (NodeId, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().map(|&child| (child, depth + 1)));
        Some((id, depth))
    }
}
