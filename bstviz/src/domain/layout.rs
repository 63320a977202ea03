//! Tidy-tree grid layout.
//!
//! Every node gets a column equal to its in-order rank and a row equal to its
//! depth (Knuth's layout). A second pass shifts all columns so the root sits at
//! column 0; nodes left of the root get negative columns.
//!
//! Adjacent columns do not imply a parent/child relation. Renderers must
//! connect nodes through [`Layout::edges`] instead of inferring adjacency from
//! coordinates.

use std::collections::HashMap;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::{BstArena, Key};

/// Grid coordinate of one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub index: Index,
    pub key: Key,
    /// Column, relative to the root
    pub x: i64,
    /// Depth, root = 0
    pub y: usize,
}

/// Extent of a layout on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i64,
    pub max_x: i64,
    pub max_y: usize,
}

impl Bounds {
    pub fn columns(&self) -> usize {
        (self.max_x - self.min_x + 1) as usize
    }

    pub fn rows(&self) -> usize {
        self.max_y + 1
    }
}

/// Immutable snapshot of node positions, in in-order sequence.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    positions: Vec<Position>,
    by_index: HashMap<Index, usize>,
}

impl Layout {
    /// Assigns positions to every node of `tree` and centers them on the root.
    ///
    /// The tree is walked once; the layout must be recomputed after any insert.
    #[instrument(level = "debug", skip(tree))]
    pub fn assign(tree: &BstArena) -> Self {
        let mut positions: Vec<Position> = tree
            .iter_with_depth()
            .zip(0_i64..)
            .map(|((index, node, depth), column)| Position {
                index,
                key: node.key(),
                x: column,
                y: depth,
            })
            .collect();

        let by_index: HashMap<Index, usize> = positions
            .iter()
            .enumerate()
            .map(|(slot, pos)| (pos.index, slot))
            .collect();

        if let Some(root_x) = tree
            .root()
            .and_then(|root| by_index.get(&root))
            .map(|&slot| positions[slot].x)
        {
            for pos in &mut positions {
                pos.x -= root_x;
            }
            debug!(root_x, nodes = positions.len(), "layout centered on root");
        }

        Self {
            positions,
            by_index,
        }
    }

    pub fn get(&self, idx: Index) -> Option<&Position> {
        self.by_index.get(&idx).map(|&slot| &self.positions[slot])
    }

    /// Position of the first node (in-order) holding `key`.
    pub fn position_of(&self, key: Key) -> Option<&Position> {
        self.positions.iter().find(|pos| pos.key == key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Position> {
        self.positions.iter()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Parent/child coordinate pairs, parents in in-order sequence and the
    /// left child before the right.
    #[instrument(level = "trace", skip(self, tree))]
    pub fn edges(&self, tree: &BstArena) -> Vec<(Position, Position)> {
        let mut edges = Vec::new();
        for parent in &self.positions {
            let Some(node) = tree.node(parent.index) else {
                continue;
            };
            for child in [node.left(), node.right()].into_iter().flatten() {
                if let Some(child) = self.get(child) {
                    edges.push((*parent, *child));
                }
            }
        }
        edges
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let min_x = self.positions.iter().map(|pos| pos.x).min()?;
        let max_x = self.positions.iter().map(|pos| pos.x).max()?;
        let max_y = self.positions.iter().map(|pos| pos.y).max()?;
        Some(Bounds {
            min_x,
            max_x,
            max_y,
        })
    }
}

impl<'a> IntoIterator for &'a Layout {
    type Item = &'a Position;
    type IntoIter = std::slice::Iter<'a, Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_of(keys: &[Key]) -> BstArena {
        keys.iter().copied().collect()
    }

    fn coords(layout: &Layout, key: Key) -> (i64, usize) {
        let pos = layout.position_of(key).unwrap();
        (pos.x, pos.y)
    }

    #[test]
    fn given_three_nodes_when_assigning_then_root_centered() {
        let tree = tree_of(&[60, 45, 70]);
        let layout = Layout::assign(&tree);

        assert_eq!(coords(&layout, 60), (0, 0));
        assert_eq!(coords(&layout, 45), (-1, 1));
        assert_eq!(coords(&layout, 70), (1, 1));
    }

    #[test]
    fn given_deep_left_subtree_when_assigning_then_columns_follow_rank() {
        let tree = tree_of(&[60, 45, 70, 46, 75]);
        let layout = Layout::assign(&tree);

        assert_eq!(coords(&layout, 45), (-2, 1));
        assert_eq!(coords(&layout, 46), (-1, 2));
        assert_eq!(coords(&layout, 60), (0, 0));
        assert_eq!(coords(&layout, 70), (1, 1));
        assert_eq!(coords(&layout, 75), (2, 2));
    }

    #[test]
    fn given_empty_tree_when_assigning_then_layout_empty() {
        let layout = Layout::assign(&BstArena::new());
        assert!(layout.is_empty());
        assert!(layout.bounds().is_none());
    }

    #[test]
    fn given_tree_when_listing_edges_then_pairs_parents_with_children() {
        let tree = tree_of(&[60, 45, 70, 46]);
        let layout = Layout::assign(&tree);
        let edges: Vec<(Key, Key)> = layout
            .edges(&tree)
            .iter()
            .map(|(p, c)| (p.key, c.key))
            .collect();

        assert_eq!(edges, vec![(45, 46), (60, 45), (60, 70)]);
    }

    #[test]
    fn given_tree_when_measuring_bounds_then_spans_all_columns() {
        let tree = tree_of(&[60, 45, 70, 46, 75]);
        let bounds = Layout::assign(&tree).bounds().unwrap();

        assert_eq!(bounds.min_x, -2);
        assert_eq!(bounds.max_x, 2);
        assert_eq!(bounds.max_y, 2);
        assert_eq!(bounds.columns(), 5);
        assert_eq!(bounds.rows(), 3);
    }
}
