use generational_arena::{Arena, Index};
use std::fmt;
use tracing::{debug, instrument};

/// Integer key stored in every node.
pub type Key = i64;

/// Tree node in the arena-based search tree.
///
/// Children are handles into the owning [`BstArena`]; there is no parent link.
#[derive(Debug, Clone)]
pub struct BstNode {
    key: Key,
    left: Option<Index>,
    right: Option<Index>,
}

impl BstNode {
    fn new(key: Key) -> Self {
        Self {
            key,
            left: None,
            right: None,
        }
    }

    pub fn key(&self) -> Key {
        self.key
    }

    pub fn left(&self) -> Option<Index> {
        self.left
    }

    pub fn right(&self) -> Option<Index> {
        self.right
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

impl fmt::Display for BstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}

/// Unbalanced binary search tree stored in a generational arena.
///
/// Nodes are never removed, so every handle the tree hands out stays live for
/// the lifetime of the tree. Keys equal to an existing key are routed right.
#[derive(Debug)]
pub struct BstArena {
    /// Arena storage for all tree nodes
    arena: Arena<BstNode>,
    /// Index of the root node, None for empty trees
    root: Option<Index>,
}

impl Default for BstArena {
    fn default() -> Self {
        Self::new()
    }
}

impl BstArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Inserts `key` as a new leaf and returns its handle.
    ///
    /// Descends left while `key < current`, right otherwise, so duplicates
    /// end up in the right subtree of their first equal ancestor.
    #[instrument(level = "trace", skip(self))]
    pub fn insert(&mut self, key: Key) -> Index {
        let Some(mut current) = self.root else {
            let idx = self.arena.insert(BstNode::new(key));
            self.root = Some(idx);
            return idx;
        };

        loop {
            let node = &self.arena[current];
            let next = if key < node.key { node.left } else { node.right };
            match next {
                Some(child) => current = child,
                None => break,
            }
        }

        let idx = self.arena.insert(BstNode::new(key));
        let parent = &mut self.arena[current];
        if key < parent.key {
            parent.left = Some(idx);
        } else {
            parent.right = Some(idx);
        }
        debug!(key, parent = parent.key, "inserted");
        idx
    }

    #[instrument(level = "trace", skip(self))]
    pub fn node(&self, idx: Index) -> Option<&BstNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Locates the node holding `key` by BST descent.
    #[instrument(level = "trace", skip(self))]
    pub fn find(&self, key: Key) -> Option<Index> {
        let mut current = self.root;
        while let Some(idx) = current {
            let node = &self.arena[idx];
            if node.key == key {
                return Some(idx);
            }
            current = if key < node.key { node.left } else { node.right };
        }
        None
    }

    pub fn contains(&self, key: Key) -> bool {
        self.find(key).is_some()
    }

    /// Lazy in-order iterator; each call starts a fresh walk from the root.
    pub fn iter(&self) -> impl Iterator<Item = (Index, &BstNode)> + '_ {
        self.iter_with_depth().map(|(idx, node, _)| (idx, node))
    }

    /// In-order iterator that also reports each node's depth (root = 0).
    pub fn iter_with_depth(&self) -> InOrderIterator<'_> {
        InOrderIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Node handles in ascending key order.
    #[instrument(level = "debug", skip(self))]
    pub fn traverse(&self) -> Vec<Index> {
        self.iter().map(|(idx, _)| idx).collect()
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> Vec<Key> {
        self.iter().map(|(_, node)| node.key).collect()
    }

    /// Number of levels in the tree; 0 for an empty tree.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.iter_with_depth()
            .map(|(_, _, depth)| depth + 1)
            .max()
            .unwrap_or(0)
    }

    /// Keys of all nodes without children, in ascending order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_keys(&self) -> Vec<Key> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(_, node)| node.key)
            .collect()
    }
}

impl FromIterator<Key> for BstArena {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        let mut tree = BstArena::new();
        for key in iter {
            tree.insert(key);
        }
        tree
    }
}

/// Explicit-stack in-order walk: left subtree, node, right subtree.
pub struct InOrderIterator<'a> {
    tree: &'a BstArena,
    stack: Vec<(Index, usize)>,
    current: Option<(Index, usize)>,
}

impl<'a> InOrderIterator<'a> {
    fn new(tree: &'a BstArena) -> Self {
        Self {
            tree,
            stack: Vec::new(),
            current: tree.root().map(|root| (root, 0)),
        }
    }
}

impl<'a> Iterator for InOrderIterator<'a> {
    type Item = (Index, &'a BstNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((idx, depth)) = self.current {
            self.stack.push((idx, depth));
            self.current = self.tree.arena[idx].left.map(|left| (left, depth + 1));
        }

        let (idx, depth) = self.stack.pop()?;
        let node = &self.tree.arena[idx];
        self.current = node.right.map(|right| (right, depth + 1));
        Some((idx, node, depth))
    }
}

/// Explicit-stack post-order walk: left subtree, right subtree, node.
pub struct PostOrderIterator<'a> {
    tree: &'a BstArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a BstArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push((root, false));
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a BstNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            let node = &self.tree.arena[current_idx];
            if visited {
                return Some((current_idx, node));
            }
            self.stack.push((current_idx, true));
            // right pushed first so the left subtree is emitted first
            if let Some(right) = node.right {
                self.stack.push((right, false));
            }
            if let Some(left) = node.left {
                self.stack.push((left, false));
            }
        }
        None
    }
}
