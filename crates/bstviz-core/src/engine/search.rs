//! Animated root-to-leaf search.

use std::cmp::Ordering;

use crate::error::{Result, parse_key};
use crate::event::{EngineEvent, Operation};
use crate::node::{self, Highlight, Key, Side};

use super::{Op, SearchOutcome, TreeEngine};

impl TreeEngine {
    /// Walk toward `key`, highlighting every compared node.
    ///
    /// On a hit the found node keeps its highlight. On a miss every
    /// highlight is cleared and [`EngineEvent::NotFound`] is emitted.
    pub fn search(&self, key: Key) -> SearchOutcome {
        self.begin(Operation::Search(key)).search(key)
    }

    /// Parse `input` and search for it.
    pub fn search_input(&self, input: &str) -> Result<SearchOutcome> {
        let key = parse_key(input)?;
        Ok(self.search(key))
    }
}

impl Op<'_> {
    fn search(&self, key: Key) -> SearchOutcome {
        self.clear_annotations();
        self.engine.board.update(|r| r.last_search = None);

        let mut path = Vec::new();
        loop {
            let ordering = {
                let mut state = self.tree();
                let Some(node) = node::node_at_mut(&mut state.root, &path) else {
                    break;
                };
                node.annotation.highlight = Some(Highlight::SearchPath);
                key.cmp(&node.key)
            };
            tracing::trace!(key, depth = path.len(), "compare");
            self.pause(self.config.timings.search);

            let side = match ordering {
                Ordering::Equal => return self.finish_search(key, SearchOutcome::Found),
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
            };
            if let Some(node) = node::node_at_mut(&mut self.tree().root, &path) {
                node.annotation.highlight = None;
            }
            path.push(side);
        }

        self.engine.events.emit(EngineEvent::NotFound(key));
        self.clear_annotations();
        self.finish_search(key, SearchOutcome::NotFound)
    }

    fn finish_search(&self, key: Key, outcome: SearchOutcome) -> SearchOutcome {
        tracing::debug!(key, ?outcome, "search finished");
        self.engine
            .board
            .update(|r| r.last_search = Some((key, outcome)));
        outcome
    }
}
