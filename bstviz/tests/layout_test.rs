//! Integration tests for the root-centered grid layout

use bstviz::domain::{Key, Layout, TreeBuilder};
use rstest::rstest;

#[rstest]
#[case(60, 0, 0)]
#[case(45, -1, 1)]
#[case(70, 1, 1)]
fn given_three_nodes_when_laying_out_then_root_at_origin(
    #[case] key: Key,
    #[case] x: i64,
    #[case] y: usize,
) {
    let tree = TreeBuilder::new().build_from_keys(&[60, 45, 70]);
    let pos = *Layout::assign(&tree).position_of(key).unwrap();
    assert_eq!((pos.x, pos.y), (x, y));
}

#[test]
fn given_random_trees_when_laying_out_then_root_centered_and_columns_unique() {
    let builder = TreeBuilder::new();
    for seed in 0..10 {
        let tree = builder.build_from_keys(&builder.random_keys(30, Some(seed)));
        let layout = Layout::assign(&tree);
        let root = tree.root().unwrap();

        assert_eq!(layout.get(root).unwrap().x, 0);
        assert_eq!(layout.get(root).unwrap().y, 0);
        assert_eq!(layout.len(), tree.len());

        // in-order rank: columns strictly increase along the layout
        let columns: Vec<i64> = layout.iter().map(|pos| pos.x).collect();
        assert!(columns.windows(2).all(|w| w[0] + 1 == w[1]));
    }
}

#[test]
fn given_same_tree_when_laying_out_twice_then_identical() {
    let builder = TreeBuilder::new();
    let tree = builder.build_from_keys(&builder.random_keys(25, Some(3)));

    let first: Vec<_> = Layout::assign(&tree).iter().copied().collect();
    let second: Vec<_> = Layout::assign(&tree).iter().copied().collect();
    assert_eq!(first, second);
}

#[test]
fn given_layout_when_listing_edges_then_children_one_row_below() {
    let tree = TreeBuilder::new().build_from_keys(&[60, 45, 70, 46, 75, 47, 80, 48]);
    let layout = Layout::assign(&tree);
    let edges = layout.edges(&tree);

    assert_eq!(edges.len(), tree.len() - 1);
    for (parent, child) in edges {
        assert_eq!(child.y, parent.y + 1);
        if child.key < parent.key {
            assert!(child.x < parent.x);
        } else {
            assert!(child.x > parent.x);
        }
    }
}

#[test]
fn given_smaller_key_inserted_when_laying_out_again_then_left_side_grows() {
    let builder = TreeBuilder::new();
    let before = Layout::assign(&builder.build_from_keys(&[60, 45, 70]));
    let after = Layout::assign(&builder.build_from_keys(&[60, 45, 70, 40]));

    assert_eq!(before.position_of(45).unwrap().x, -1);
    assert_eq!(after.position_of(45).unwrap().x, -1);
    assert_eq!(after.position_of(40).unwrap().x, -2);
    assert_eq!(after.bounds().unwrap().columns(), 4);
}
