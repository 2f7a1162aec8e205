//! AVL rotations and the announcement protocol around them.
//!
//! A rotation is never silent: the pivot is marked as imbalanced, the
//! layout is refreshed so the imbalance is visible, a message naming the
//! rotation and pivot is published, and the engine pauses for the
//! (longer) rotation duration. Only then are the mark and message cleared
//! and the links rewritten.

use std::fmt;

use crate::event::EngineEvent;
use crate::node::{self, Highlight, Key, Side};

use super::Op;

/// Which way the subtree turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationDirection {
    /// The right child rises.
    Left,
    /// The left child rises.
    Right,
}

/// Which of the four imbalance shapes triggered the rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationCase {
    /// Left-left: single right rotation.
    LeftLeft,
    /// Right-right: single left rotation.
    RightRight,
    /// Left-right: left on the left child, then right on the node.
    LeftRight,
    /// Right-left: right on the right child, then left on the node.
    RightLeft,
}

/// One announced rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rotation {
    /// Direction of this single rotation.
    pub direction: RotationDirection,
    /// Imbalance case it belongs to.
    pub case: RotationCase,
}

impl Rotation {
    const fn new(direction: RotationDirection, case: RotationCase) -> Self {
        Self { direction, case }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            RotationDirection::Left => "Left",
            RotationDirection::Right => "Right",
        };
        match self.case {
            RotationCase::LeftLeft | RotationCase::RightRight => {
                write!(f, "{direction} Rotation")
            }
            RotationCase::LeftRight => write!(f, "{direction} Rotation (LR)"),
            RotationCase::RightLeft => write!(f, "{direction} Rotation (RL)"),
        }
    }
}

/// Classify an imbalance using the key that was just inserted.
pub(super) fn case_after_insert(root: &node::Link, path: &[Side], key: Key) -> Option<RotationCase> {
    let node = node::node_at(root, path)?;
    let balance = node.balance_factor();
    if balance > 1 {
        let left = node.left.as_deref()?;
        if key < left.key {
            return Some(RotationCase::LeftLeft);
        }
        if key > left.key {
            return Some(RotationCase::LeftRight);
        }
    } else if balance < -1 {
        let right = node.right.as_deref()?;
        if key > right.key {
            return Some(RotationCase::RightRight);
        }
        if key < right.key {
            return Some(RotationCase::RightLeft);
        }
    }
    None
}

/// Classify an imbalance from the node's and its taller child's balance
/// factors. Used after deletion, where there is no inserted key.
pub(super) fn case_after_delete(root: &node::Link, path: &[Side]) -> Option<RotationCase> {
    let node = node::node_at(root, path)?;
    let balance = node.balance_factor();
    if balance > 1 {
        if node::balance_factor(&node.left) >= 0 {
            Some(RotationCase::LeftLeft)
        } else {
            Some(RotationCase::LeftRight)
        }
    } else if balance < -1 {
        if node::balance_factor(&node.right) <= 0 {
            Some(RotationCase::RightRight)
        } else {
            Some(RotationCase::RightLeft)
        }
    } else {
        None
    }
}

impl Op<'_> {
    /// Restore balance at `path` for the given imbalance shape.
    pub(super) fn rebalance(&self, path: &[Side], case: RotationCase) {
        use RotationDirection::{Left, Right};

        match case {
            RotationCase::LeftLeft => self.rotate_at(path, Rotation::new(Right, case)),
            RotationCase::RightRight => self.rotate_at(path, Rotation::new(Left, case)),
            RotationCase::LeftRight => {
                let mut child = path.to_vec();
                child.push(Side::Left);
                self.rotate_at(&child, Rotation::new(Left, case));
                self.rotate_at(path, Rotation::new(Right, case));
            }
            RotationCase::RightLeft => {
                let mut child = path.to_vec();
                child.push(Side::Right);
                self.rotate_at(&child, Rotation::new(Right, case));
                self.rotate_at(path, Rotation::new(Left, case));
            }
        }
    }

    /// Announce, pause, then perform one rotation with the node at `path`
    /// as pivot.
    fn rotate_at(&self, path: &[Side], rotation: Rotation) {
        let pivot = {
            let mut state = self.tree();
            let Some(node) = node::node_at_mut(&mut state.root, path) else {
                return;
            };
            node.annotation.highlight = Some(Highlight::Imbalance);
            let key = node.key;
            self.relayout(&mut state);
            key
        };

        let message = format!("Performing {rotation} on Node {pivot}");
        tracing::info!(%rotation, pivot, depth = path.len(), "{message}");
        self.engine
            .board
            .update(|r| r.rotation_message = Some(message));
        self.engine
            .events
            .emit(EngineEvent::RotationStarted { rotation, pivot });

        self.pause(self.config.timings.rotation);

        {
            let mut state = self.tree();
            if let Some(node) = node::node_at_mut(&mut state.root, path) {
                node.annotation.highlight = None;
            }
            let slot = node::slot_mut(&mut state.root, path);
            match rotation.direction {
                RotationDirection::Left => node::rotate_left(slot),
                RotationDirection::Right => node::rotate_right(slot),
            }
        }
        self.engine.board.update(|r| r.rotation_message = None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Discipline, EngineConfig, TreeEngine};
    use tracing_test::traced_test;

    fn avl() -> TreeEngine {
        TreeEngine::new(EngineConfig {
            discipline: Discipline::Avl,
            ..EngineConfig::instant()
        })
    }

    #[test]
    fn single_rotations_have_plain_names() {
        let rotation = Rotation::new(RotationDirection::Right, RotationCase::LeftLeft);
        assert_eq!(rotation.to_string(), "Right Rotation");
    }

    #[test]
    fn double_rotations_name_their_case() {
        let first = Rotation::new(RotationDirection::Left, RotationCase::LeftRight);
        let second = Rotation::new(RotationDirection::Left, RotationCase::RightLeft);
        assert_eq!(first.to_string(), "Left Rotation (LR)");
        assert_eq!(second.to_string(), "Left Rotation (RL)");
    }

    #[test]
    fn insert_cases_follow_inserted_key() {
        let engine = avl();
        engine.insert(3);
        engine.insert(1);
        let state = engine.lock_tree();
        assert_eq!(case_after_insert(state.root(), &[], 2), None);
    }

    #[test]
    fn right_left_case_rotates_twice() {
        let (events, rx) = crate::event::EventSink::channel();
        let engine = TreeEngine::with_parts(
            EngineConfig {
                discipline: Discipline::Avl,
                ..EngineConfig::instant()
            },
            crate::gate::StepGate::default(),
            events,
        );
        for key in [1, 3, 2] {
            engine.insert(key);
        }
        let rotations: Vec<_> = rx
            .try_iter()
            .filter_map(|e| match e {
                EngineEvent::RotationStarted { rotation, pivot } => Some((rotation.to_string(), pivot)),
                _ => None,
            })
            .collect();
        assert_eq!(
            rotations,
            vec![
                ("Right Rotation (RL)".to_string(), 3),
                ("Left Rotation (RL)".to_string(), 1),
            ]
        );
        assert_eq!(engine.lock_tree().root_key(), Some(2));
    }

    #[test]
    fn imbalance_mark_and_message_are_cleared() {
        let engine = avl();
        for key in [3, 2, 1] {
            engine.insert(key);
        }
        assert_eq!(engine.lock_tree().annotated_count(), 0);
        assert_eq!(engine.board().snapshot().rotation_message, None);
    }

    #[test]
    #[traced_test]
    fn rotation_is_logged_with_pivot() {
        let engine = avl();
        for key in [1, 2, 3] {
            engine.insert(key);
        }
        assert!(logs_contain("Performing Left Rotation on Node 1"));
    }
}
