//! Insertion: drop animation, then link under the current discipline.

use std::cmp::Ordering;

use crate::error::{Result, parse_key};
use crate::event::Operation;
use crate::gate::PauseOutcome;
use crate::geometry::Point;
use crate::node::{self, Key, Node, Position, Side};

use super::rotation::case_after_insert;
use super::{Discipline, Op, TreeEngine, TreeState};

impl TreeEngine {
    /// Drop `key` into the tree and link it.
    ///
    /// Returns `false` when the key was rejected as a duplicate (AVL only;
    /// plain BST routes equal keys right).
    pub fn insert(&self, key: Key) -> bool {
        self.begin(Operation::Insert(key)).insert(key)
    }

    /// Parse `input` and insert it. Malformed input is rejected before any
    /// animation starts and leaves the tree untouched.
    pub fn insert_input(&self, input: &str) -> Result<bool> {
        let key = parse_key(input)?;
        Ok(self.insert(key))
    }
}

impl Op<'_> {
    pub(super) fn insert(&self, key: Key) -> bool {
        self.drop_in(key);

        let discipline = self.tree().discipline;
        let inserted = match discipline {
            Discipline::Bst => {
                let mut state = self.tree();
                link_leaf(&mut state, key, self.config.layout.anchor);
                true
            }
            Discipline::Avl => self.insert_balanced(&mut Vec::new(), key),
        };

        if inserted {
            tracing::debug!(key, %discipline, "inserted");
        } else {
            tracing::debug!(key, "duplicate key ignored");
        }
        self.refresh();
        inserted
    }

    /// Animate a detached node falling toward the attach point.
    ///
    /// In auto mode each frame is one timed pause. A manual advance lands
    /// the node at once: the whole drop counts as a single step.
    fn drop_in(&self, key: Key) {
        let drop = self.config.drop;
        {
            let mut state = self.tree();
            let target = state
                .root
                .as_deref()
                .map_or(self.config.layout.anchor, |n| n.position.current);
            let mut pending = Node::new(key, Point::new(target.x, drop.start_y));
            pending.position.target = target;
            state.pending = Some(pending);
        }

        if drop.smoothing > 0.0 {
            loop {
                let done = self
                    .tree()
                    .pending
                    .as_ref()
                    .is_none_or(|p| landed(&p.position, drop.epsilon));
                if done {
                    break;
                }
                if self.pause(self.config.timings.frame) == PauseOutcome::Advanced {
                    break;
                }
                if let Some(pending) = self.tree().pending.as_mut() {
                    pending.position.approach(drop.smoothing);
                }
            }
        }

        self.tree().pending = None;
    }

    /// AVL insertion at the subtree addressed by `path`. Balance is checked
    /// at every ancestor on the way back up.
    fn insert_balanced(&self, path: &mut Vec<Side>, key: Key) -> bool {
        let side = {
            let mut state = self.tree();
            let spawn = spawn_point(&state, path, self.config.layout.anchor);
            let slot = node::slot_mut(&mut state.root, path);
            match slot.as_deref() {
                None => {
                    *slot = Some(Node::boxed(key, spawn));
                    return true;
                }
                Some(node) => match key.cmp(&node.key) {
                    Ordering::Less => Side::Left,
                    Ordering::Greater => Side::Right,
                    Ordering::Equal => return false,
                },
            }
        };

        path.push(side);
        let inserted = self.insert_balanced(path, key);
        path.pop();

        if inserted {
            let case = case_after_insert(&self.tree().root, path, key);
            if let Some(case) = case {
                self.rebalance(path, case);
            }
        }
        inserted
    }
}

/// Plain BST insertion: descend by comparison, equal keys go right.
fn link_leaf(state: &mut TreeState, key: Key, anchor: Point) {
    let mut spawn = anchor;
    let mut slot = &mut state.root;
    while let Some(node) = slot {
        spawn = node.position.current;
        slot = if key < node.key {
            &mut node.left
        } else {
            &mut node.right
        };
    }
    *slot = Some(Node::boxed(key, spawn));
}

/// New nodes appear where their parent currently is, or at the anchor for
/// the first node.
fn spawn_point(state: &TreeState, path: &[Side], anchor: Point) -> Point {
    match path.split_last() {
        Some((_, parent)) => state
            .node_at(parent)
            .map_or(anchor, |node| node.position.current),
        None => anchor,
    }
}

fn landed(position: &Position, epsilon: f64) -> bool {
    (position.current.y - position.target.y).abs() <= epsilon
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use crate::event::{EngineEvent, EventSink};
    use crate::gate::StepGate;

    fn engine(discipline: Discipline) -> TreeEngine {
        TreeEngine::new(EngineConfig {
            discipline,
            ..EngineConfig::instant()
        })
    }

    #[test]
    fn first_insert_becomes_root_at_anchor() {
        let engine = engine(Discipline::Bst);
        assert!(engine.insert(7));
        let state = engine.lock_tree();
        let root = state.node_at(&[]).unwrap();
        assert_eq!(root.key, 7);
        assert_eq!(root.position.target, engine.config().layout.anchor);
        assert!(state.pending().is_none());
    }

    #[test]
    fn bst_routes_duplicates_right() {
        let engine = engine(Discipline::Bst);
        for key in [5, 5, 5] {
            assert!(engine.insert(key));
        }
        let state = engine.lock_tree();
        assert_eq!(state.in_order_keys(), vec![5, 5, 5]);
        assert_eq!(state.node_at(&[Side::Right, Side::Right]).unwrap().key, 5);
    }

    #[test]
    fn avl_rejects_duplicates() {
        let engine = engine(Discipline::Avl);
        assert!(engine.insert(5));
        assert!(!engine.insert(5));
        assert_eq!(engine.lock_tree().in_order_keys(), vec![5]);
    }

    #[test]
    fn new_node_spawns_at_parent_position() {
        let engine = engine(Discipline::Bst);
        engine.insert(10);
        let parent_at = engine.lock_tree().node_at(&[]).unwrap().position.current;
        engine.insert(4);
        let child = engine.lock_tree().node_at(&[Side::Left]).unwrap().position;
        assert_eq!(child.current, parent_at);
        assert_ne!(child.target, parent_at);
    }

    #[test]
    fn malformed_input_leaves_tree_untouched() {
        let (events, rx) = EventSink::channel();
        let engine = TreeEngine::with_parts(EngineConfig::instant(), StepGate::default(), events);
        assert!(engine.insert_input("twelve").is_err());
        assert!(engine.lock_tree().is_empty());
        assert!(rx.try_recv().is_err(), "no operation should have started");
        assert_eq!(engine.insert_input(" 12 "), Ok(true));
        assert!(rx.try_iter().any(|e| e == EngineEvent::OperationFinished(Operation::Insert(12))));
    }

    #[test]
    fn stats_refresh_after_insert() {
        let engine = engine(Discipline::Bst);
        for key in [5, 3, 8, 1] {
            engine.insert(key);
        }
        let stats = engine.board().snapshot().stats;
        assert_eq!((stats.height, stats.count, stats.leaves), (3, 4, 2));
    }

    #[test]
    fn landing_uses_vertical_distance() {
        let position = Position {
            current: Point::new(300.0, 57.0),
            target: Point::new(0.0, 60.0),
        };
        assert!(landed(&position, 5.0));
        assert!(!landed(&Position { current: Point::new(0.0, -50.0), ..position }, 5.0));
    }
}
