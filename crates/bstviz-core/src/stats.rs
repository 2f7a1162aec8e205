#![forbid(unsafe_code)]

//! Aggregate tree statistics.

use crate::node::{Link, height};

/// Height, node count, and leaf count of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreeStats {
    /// Longest root-to-leaf path in nodes; 0 for an empty tree.
    pub height: usize,
    /// Total number of nodes.
    pub count: usize,
    /// Nodes with no children.
    pub leaves: usize,
}

impl TreeStats {
    /// Compute stats for the tree rooted at `root`.
    #[must_use]
    pub fn of(root: &Link) -> Self {
        Self {
            height: height(root),
            count: count_nodes(root),
            leaves: count_leaves(root),
        }
    }
}

/// Number of nodes in a subtree.
#[must_use]
pub fn count_nodes(link: &Link) -> usize {
    match link {
        Some(node) => 1 + count_nodes(&node.left) + count_nodes(&node.right),
        None => 0,
    }
}

/// Number of leaves in a subtree.
#[must_use]
pub fn count_leaves(link: &Link) -> usize {
    match link {
        Some(node) if node.is_leaf() => 1,
        Some(node) => count_leaves(&node.left) + count_leaves(&node.right),
        None => 0,
    }
}
