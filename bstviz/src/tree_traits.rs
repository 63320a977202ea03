//! Conversion of search trees into printable `termtree` trees.

use std::collections::HashMap;

use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::BstArena;

/// Placeholder printed for a missing sibling, so left and right stay apart.
pub const EMPTY_SLOT: &str = "·";

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

// Built bottom-up from the post-order walk; no recursion over tree depth.
impl TreeNodeConvert for BstArena {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        let mut built: HashMap<Index, Tree<String>> = HashMap::new();

        for (idx, node) in self.iter_postorder() {
            let mut tree = Tree::new(node.key().to_string());
            if !node.is_leaf() {
                for child in [node.left(), node.right()] {
                    let leaf = child
                        .and_then(|c| built.remove(&c))
                        .unwrap_or_else(|| Tree::new(EMPTY_SLOT.to_string()));
                    tree.push(leaf);
                }
            }
            built.insert(idx, tree);
        }

        self.root()
            .and_then(|root| built.remove(&root))
            .unwrap_or_else(|| Tree::new("Empty tree".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_tree_when_converting_then_children_listed_left_then_right() {
        let tree: BstArena = [60, 45, 70, 46].into_iter().collect();
        let rendered = tree.to_tree_string().to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "60");
        assert!(lines[1].ends_with("45"));
        assert!(lines[2].ends_with(EMPTY_SLOT));
        assert!(lines[3].ends_with("46"));
        assert!(lines[4].ends_with("70"));
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn given_empty_tree_when_converting_then_placeholder_root() {
        let rendered = BstArena::new().to_tree_string().to_string();
        assert_eq!(rendered.trim_end(), "Empty tree");
    }
}
