//! Bulk rebalance: rebuild the tree from its sorted keys.

use crate::event::Operation;
use crate::geometry::Point;
use crate::node::{Key, Link, Node};

use super::{Op, TreeEngine};

impl TreeEngine {
    /// Rebuild the tree as a perfectly balanced one with the same in-order
    /// sequence. Not animated; nodes glide from the anchor to their new
    /// places.
    pub fn balance(&self) {
        self.begin(Operation::Balance).balance();
    }
}

impl Op<'_> {
    fn balance(&self) {
        {
            let mut state = self.tree();
            let keys = state.in_order_keys();
            state.root = build(&keys, self.config.layout.anchor);
        }
        self.refresh();
    }
}

/// Each sorted range is rooted at its lower middle.
fn build(keys: &[Key], at: Point) -> Link {
    if keys.is_empty() {
        return None;
    }
    let mid = (keys.len() - 1) / 2;
    let mut node = Node::boxed(keys[mid], at);
    node.left = build(&keys[..mid], at);
    node.right = build(&keys[mid + 1..], at);
    Some(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Discipline, EngineConfig};

    fn engine_with(discipline: Discipline, keys: &[Key]) -> TreeEngine {
        let engine = TreeEngine::new(EngineConfig {
            discipline,
            ..EngineConfig::instant()
        });
        for &key in keys {
            engine.insert(key);
        }
        engine
    }

    #[test]
    fn chain_becomes_complete_tree() {
        let engine = engine_with(Discipline::Bst, &[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(engine.lock_tree().stats().height, 7);
        engine.balance();
        let state = engine.lock_tree();
        assert_eq!(state.root_key(), Some(4));
        assert_eq!(state.stats().height, 3);
        assert_eq!(state.in_order_keys(), (1..=7).collect::<Vec<_>>());
        assert_eq!(engine.board().snapshot().stats.height, 3);
    }

    #[test]
    fn even_ranges_take_lower_middle() {
        assert_eq!(build(&[1, 2, 3, 4], Point::default()).unwrap().key, 2);
        assert_eq!(build(&[1, 2], Point::default()).unwrap().key, 1);
    }

    #[test]
    fn rebuilt_nodes_start_at_anchor() {
        let engine = engine_with(Discipline::Bst, &[1, 2, 3]);
        engine.balance();
        let anchor = engine.config().layout.anchor;
        let mut all_at_anchor = true;
        engine
            .lock_tree()
            .walk(|node, _| all_at_anchor &= node.position.current == anchor);
        assert!(all_at_anchor);
    }

    #[test]
    fn empty_tree_stays_empty() {
        let engine = engine_with(Discipline::Avl, &[]);
        engine.balance();
        assert!(engine.lock_tree().is_empty());
    }
}
