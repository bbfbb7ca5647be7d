//! Parent-before-child ordering for forests read from the legacy store.
//!
//! Legacy trees may contain dangling parents, self-references or cycles.
//! The sorter never alters data: unplaceable nodes are appended in input
//! order and reported so the caller can warn.

use std::collections::HashSet;

use crate::types::LegacyId;

/// A node in a parent-linked forest. A parent id of `0` means "no parent".
pub trait TreeNode {
    fn node_id(&self) -> LegacyId;
    fn parent_id(&self) -> LegacyId;
}

/// Result of [`parent_first_order`]. Both vectors hold indices into the
/// input slice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopoOrder {
    /// Every input index exactly once; placed nodes first, then unplaced.
    pub order: Vec<usize>,
    /// Indices that could not be placed after a parent (cycles).
    pub unplaced: Vec<usize>,
}

/// Order `nodes` so that each node's parent precedes it.
///
/// Roots are nodes whose parent is `0` or absent from the input. Remaining
/// nodes are promoted pass by pass once their parent is placed; the number
/// of passes is bounded by the input size.
pub fn parent_first_order<T: TreeNode>(nodes: &[T]) -> TopoOrder {
    let present: HashSet<LegacyId> = nodes.iter().map(TreeNode::node_id).collect();
    let mut placed_ids: HashSet<LegacyId> = HashSet::with_capacity(nodes.len());
    let mut placed = vec![false; nodes.len()];
    let mut order = Vec::with_capacity(nodes.len());

    for (idx, node) in nodes.iter().enumerate() {
        let parent = node.parent_id();
        if parent == 0 || !present.contains(&parent) {
            placed[idx] = true;
            placed_ids.insert(node.node_id());
            order.push(idx);
        }
    }

    for _ in 0..nodes.len() {
        if order.len() == nodes.len() {
            break;
        }
        let mut progressed = false;
        for (idx, node) in nodes.iter().enumerate() {
            if placed[idx] || !placed_ids.contains(&node.parent_id()) {
                continue;
            }
            placed[idx] = true;
            placed_ids.insert(node.node_id());
            order.push(idx);
            progressed = true;
        }
        if !progressed {
            break;
        }
    }

    let unplaced: Vec<usize> = (0..nodes.len()).filter(|&idx| !placed[idx]).collect();
    order.extend(unplaced.iter().copied());

    TopoOrder { order, unplaced }
}
