//! Root-to-node paths and common-ancestor queries.

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::{BstArena, Key};
use crate::domain::error::{DomainError, DomainResult};

impl BstArena {
    /// Handles from the root down to the node holding `key`, both inclusive.
    ///
    /// Branches with the same comparison as [`BstArena::insert`], so for
    /// duplicate keys the path ends at the shallowest match.
    #[instrument(level = "debug", skip(self))]
    pub fn node_path(&self, key: Key) -> DomainResult<Vec<Index>> {
        let mut current = self.root().ok_or(DomainError::EmptyTree)?;
        let mut path = Vec::new();

        loop {
            path.push(current);
            let node = self
                .node(current)
                .ok_or_else(|| DomainError::InvariantViolation(format!("dangling handle {current:?}")))?;
            if node.key() == key {
                return Ok(path);
            }
            let next = if key < node.key() {
                node.left()
            } else {
                node.right()
            };
            current = next.ok_or(DomainError::NotFound(key))?;
        }
    }

    /// Path to a node given by handle.
    ///
    /// Equal keys keep descending right, so a duplicate stored below its
    /// first match is still reached. Fails when the handle does not name a
    /// node of this tree, e.g. a handle taken from another tree.
    #[instrument(level = "debug", skip(self))]
    pub fn path_to_node(&self, idx: Index) -> DomainResult<Vec<Index>> {
        let foreign = || DomainError::InvariantViolation(format!("{idx:?} is not a node of this tree"));
        let key = self.node(idx).map(|node| node.key()).ok_or_else(foreign)?;
        let mut current = self.root().ok_or(DomainError::EmptyTree)?;
        let mut path = Vec::new();

        loop {
            path.push(current);
            if current == idx {
                return Ok(path);
            }
            let node = self.node(current).ok_or_else(foreign)?;
            let next = if key < node.key() {
                node.left()
            } else {
                node.right()
            };
            current = next.ok_or_else(foreign)?;
        }
    }

    /// Deepest node lying on both root paths of `a` and `b`.
    ///
    /// The paths are compared pairwise from the root; the last equal entry
    /// is the answer. For `a == b` this is the node itself.
    #[instrument(level = "debug", skip(self))]
    pub fn first_common_ancestor(&self, a: Key, b: Key) -> DomainResult<Index> {
        let path_a = self.node_path(a)?;
        let path_b = self.node_path(b)?;
        let ancestor = common_prefix_end(&path_a, &path_b).ok_or_else(|| {
            DomainError::InvariantViolation(format!("paths to {a} and {b} share no root"))
        })?;
        debug!(a, b, depth = path_a.iter().position(|i| *i == ancestor), "common ancestor found");
        Ok(ancestor)
    }

    /// Nodes visited when walking from `a` up to the common ancestor and
    /// down again to `b`. Both endpoints are included, the ancestor once.
    #[instrument(level = "debug", skip(self))]
    pub fn route(&self, a: Key, b: Key) -> DomainResult<Vec<Index>> {
        let path_a = self.node_path(a)?;
        let path_b = self.node_path(b)?;
        let shared = path_a
            .iter()
            .zip(path_b.iter())
            .take_while(|(x, y)| x == y)
            .count();
        if shared == 0 {
            return Err(DomainError::InvariantViolation(format!(
                "paths to {a} and {b} share no root"
            )));
        }

        let mut route: Vec<Index> = path_a[shared - 1..].iter().rev().copied().collect();
        route.extend_from_slice(&path_b[shared..]);
        Ok(route)
    }
}

/// Last element of the common prefix of two root paths.
fn common_prefix_end(path_a: &[Index], path_b: &[Index]) -> Option<Index> {
    path_a
        .iter()
        .zip(path_b.iter())
        .take_while(|(x, y)| x == y)
        .last()
        .map(|(x, _)| *x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_of(keys: &[Key]) -> BstArena {
        keys.iter().copied().collect()
    }

    fn keys_of(tree: &BstArena, path: &[Index]) -> Vec<Key> {
        path.iter()
            .map(|idx| tree.node(*idx).unwrap().key())
            .collect()
    }

    #[test]
    fn given_tree_when_getting_path_then_runs_root_to_target() {
        let tree = tree_of(&[60, 45, 70]);
        let path = tree.node_path(70).unwrap();
        assert_eq!(keys_of(&tree, &path), vec![60, 70]);
    }

    #[test]
    fn given_root_key_when_getting_path_then_path_is_root_only() {
        let tree = tree_of(&[60, 45, 70]);
        let path = tree.node_path(60).unwrap();
        assert_eq!(keys_of(&tree, &path), vec![60]);
    }

    #[test]
    fn given_missing_key_when_getting_path_then_not_found() {
        let tree = tree_of(&[60, 45, 70]);
        assert_eq!(tree.node_path(99), Err(DomainError::NotFound(99)));
    }

    #[test]
    fn given_empty_tree_when_getting_path_then_empty_tree_error() {
        let tree = BstArena::new();
        assert_eq!(tree.node_path(1), Err(DomainError::EmptyTree));
        assert_eq!(tree.first_common_ancestor(1, 2), Err(DomainError::EmptyTree));
    }

    #[test]
    fn given_nodes_in_different_subtrees_when_finding_ancestor_then_returns_root() {
        let tree = tree_of(&[60, 45, 70, 46, 75]);
        let lca = tree.first_common_ancestor(46, 75).unwrap();
        assert_eq!(tree.node(lca).unwrap().key(), 60);
    }

    #[test]
    fn given_nodes_in_same_subtree_when_finding_ancestor_then_returns_deepest_shared() {
        let tree = tree_of(&[60, 45, 70, 46, 75, 47, 80, 48, 76, 85, 49, 77, 84]);
        let lca = tree.first_common_ancestor(77, 84).unwrap();
        assert_eq!(tree.node(lca).unwrap().key(), 80);
    }

    #[test]
    fn given_ancestor_and_descendant_when_finding_ancestor_then_returns_ancestor() {
        let tree = tree_of(&[60, 45, 70, 46, 75]);
        let lca = tree.first_common_ancestor(45, 46).unwrap();
        assert_eq!(tree.node(lca).unwrap().key(), 45);
    }

    #[test]
    fn given_same_key_twice_when_finding_ancestor_then_returns_node_itself() {
        let tree = tree_of(&[60, 45, 70]);
        let lca = tree.first_common_ancestor(70, 70).unwrap();
        assert_eq!(tree.node(lca).unwrap().key(), 70);
    }

    #[test]
    fn given_missing_key_when_finding_ancestor_then_not_found() {
        let tree = tree_of(&[60, 45, 70]);
        assert_eq!(tree.first_common_ancestor(45, 99), Err(DomainError::NotFound(99)));
    }

    #[test]
    fn given_two_nodes_when_routing_then_climbs_to_ancestor_and_descends() {
        let tree = tree_of(&[60, 45, 70, 46, 75]);
        let route = tree.route(46, 75).unwrap();
        assert_eq!(keys_of(&tree, &route), vec![46, 45, 60, 70, 75]);
    }

    #[test]
    fn given_descendant_when_routing_from_ancestor_then_route_is_downward_path() {
        let tree = tree_of(&[60, 45, 70, 46, 75]);
        let route = tree.route(60, 46).unwrap();
        assert_eq!(keys_of(&tree, &route), vec![60, 45, 46]);
    }

    #[test]
    fn given_duplicate_node_handle_when_getting_path_then_reaches_deeper_copy() {
        let mut tree = BstArena::new();
        tree.insert(60);
        tree.insert(45);
        let dup = tree.insert(60);

        let path = tree.path_to_node(dup).unwrap();
        assert_eq!(path.last(), Some(&dup));
        assert_eq!(keys_of(&tree, &path), vec![60, 60]);
    }

    #[test]
    fn given_foreign_handle_when_getting_path_then_invariant_violation() {
        let tree = tree_of(&[60]);
        let mut other = BstArena::new();
        other.insert(1);
        let foreign = other.insert(2);

        assert!(matches!(
            tree.path_to_node(foreign),
            Err(DomainError::InvariantViolation(_))
        ));
    }
}
