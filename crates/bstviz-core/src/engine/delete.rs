//! Deletion, with AVL rebalancing on the way back up.

use std::cmp::Ordering;

use crate::error::{Result, parse_key};
use crate::event::Operation;
use crate::node::{self, Key, Link, Side};

use super::rotation::case_after_delete;
use super::{Discipline, Op, TreeEngine};

/// What one level of AVL deletion did to the node at its path.
enum Step {
    /// Keep looking on this side.
    Descend(Side),
    /// The node had at most one child and was replaced by it.
    Spliced,
    /// The node took its successor's key; the successor must now be
    /// removed from the right subtree.
    Replaced(Key),
}

impl TreeEngine {
    /// Remove `key`. Returns `false` (and changes nothing) when the key is
    /// absent.
    pub fn delete(&self, key: Key) -> bool {
        self.begin(Operation::Delete(key)).delete(key)
    }

    /// Parse `input` and delete it.
    pub fn delete_input(&self, input: &str) -> Result<bool> {
        let key = parse_key(input)?;
        Ok(self.delete(key))
    }
}

impl Op<'_> {
    fn delete(&self, key: Key) -> bool {
        let discipline = self.tree().discipline;
        let removed = match discipline {
            Discipline::Bst => remove(&mut self.tree().root, key),
            Discipline::Avl => self.delete_balanced(&mut Vec::new(), key),
        };

        if removed {
            tracing::debug!(key, %discipline, "deleted");
            self.refresh();
        } else {
            tracing::debug!(key, "delete of absent key ignored");
        }
        removed
    }

    fn delete_balanced(&self, path: &mut Vec<Side>, key: Key) -> bool {
        let step = {
            let mut state = self.tree();
            let slot = node::slot_mut(&mut state.root, path);
            let Some(node) = slot.as_deref_mut() else {
                return false;
            };
            match key.cmp(&node.key) {
                Ordering::Less => Step::Descend(Side::Left),
                Ordering::Greater => Step::Descend(Side::Right),
                Ordering::Equal => match successor(node) {
                    Some(successor) => {
                        node.key = successor;
                        Step::Replaced(successor)
                    }
                    None => {
                        let child = node.left.take().or_else(|| node.right.take());
                        *slot = child;
                        Step::Spliced
                    }
                },
            }
        };

        let removed = match step {
            Step::Spliced => return true,
            Step::Descend(side) => {
                path.push(side);
                let removed = self.delete_balanced(path, key);
                path.pop();
                removed
            }
            Step::Replaced(successor) => {
                path.push(Side::Right);
                let removed = self.delete_balanced(path, successor);
                path.pop();
                removed
            }
        };

        if removed {
            let case = case_after_delete(&self.tree().root, path);
            if let Some(case) = case {
                self.rebalance(path, case);
            }
        }
        removed
    }
}

/// In-order successor of a node with two children.
fn successor(node: &node::Node) -> Option<Key> {
    match (&node.left, node.right.as_deref()) {
        (Some(_), Some(right)) => Some(node::min_key(right)),
        _ => None,
    }
}

/// Plain BST deletion. No pauses: the structure changes in one step.
fn remove(link: &mut Link, key: Key) -> bool {
    let Some(node) = link.as_deref_mut() else {
        return false;
    };
    match key.cmp(&node.key) {
        Ordering::Less => remove(&mut node.left, key),
        Ordering::Greater => remove(&mut node.right, key),
        Ordering::Equal => match successor(node) {
            Some(successor) => {
                node.key = successor;
                remove(&mut node.right, successor)
            }
            None => {
                let child = node.left.take().or_else(|| node.right.take());
                *link = child;
                true
            }
        },
    }
}
