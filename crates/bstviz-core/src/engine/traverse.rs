//! Animated depth-first traversals.

use crate::event::{EngineEvent, Operation};
use crate::node::{self, Highlight, Key, Side};
use crate::status::TraversalOutput;

use super::{Op, TraversalOrder, TreeEngine};

impl TreeEngine {
    /// Visit every node in `order`, publishing each key to the output
    /// panel as it is visited. Returns the visited keys.
    pub fn traverse(&self, order: TraversalOrder) -> Vec<Key> {
        self.begin(Operation::Traverse(order)).traverse(order)
    }
}

impl Op<'_> {
    fn traverse(&self, order: TraversalOrder) -> Vec<Key> {
        self.clear_annotations();
        self.engine
            .board
            .update(|r| r.output = Some(TraversalOutput::new(order)));

        let mut keys = Vec::new();
        self.visit_subtree(&mut Vec::new(), order, &mut keys);

        self.pause(self.config.timings.hold);
        self.clear_annotations();
        tracing::debug!(order = order.label(), ?keys, "traversal finished");
        keys
    }

    fn visit_subtree(&self, path: &mut Vec<Side>, order: TraversalOrder, keys: &mut Vec<Key>) {
        if self.tree().node_at(path).is_none() {
            return;
        }

        if order == TraversalOrder::PreOrder {
            self.visit(path, order, keys);
        }
        path.push(Side::Left);
        self.visit_subtree(path, order, keys);
        path.pop();
        if order == TraversalOrder::InOrder {
            self.visit(path, order, keys);
        }
        path.push(Side::Right);
        self.visit_subtree(path, order, keys);
        path.pop();
        if order == TraversalOrder::PostOrder {
            self.visit(path, order, keys);
        }
    }

    fn visit(&self, path: &[Side], order: TraversalOrder, keys: &mut Vec<Key>) {
        let key = {
            let mut state = self.tree();
            let Some(node) = node::node_at_mut(&mut state.root, path) else {
                return;
            };
            node.annotation.highlight = Some(Highlight::Traversal);
            node.annotation.marker = Some(order.marker());
            node.key
        };

        keys.push(key);
        self.engine.board.update(|r| {
            r.output
                .get_or_insert_with(|| TraversalOutput::new(order))
                .keys
                .push(key);
        });
        self.engine
            .events
            .emit(EngineEvent::NodeVisited { order, key });
        tracing::trace!(key, "visit");

        self.pause(self.config.timings.visit);

        if let Some(node) = node::node_at_mut(&mut self.tree().root, path) {
            node.annotation.marker = None;
        }
    }
}
