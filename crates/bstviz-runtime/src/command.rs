#![forbid(unsafe_code)]

//! Engine commands as data, and what they produced.

use bstviz_core::{Discipline, Key, LayoutConfig, SearchOutcome, TraversalOrder, TreeEngine};

/// One queued engine operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Insert(Key),
    Delete(Key),
    Search(Key),
    Traverse(TraversalOrder),
    Balance,
    Clear,
    SetDiscipline(Discipline),
    /// Clear, then insert these keys in order.
    Fill(Vec<Key>),
    SetLayout(LayoutConfig),
}

/// Result of running a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// `false` when an AVL duplicate was ignored.
    Inserted(bool),
    /// `false` when the key was absent.
    Deleted(bool),
    Searched(SearchOutcome),
    Traversed(Vec<Key>),
    Done,
}

impl Command {
    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Insert(_) => "insert",
            Self::Delete(_) => "delete",
            Self::Search(_) => "search",
            Self::Traverse(_) => "traverse",
            Self::Balance => "balance",
            Self::Clear => "clear",
            Self::SetDiscipline(_) => "set_discipline",
            Self::Fill(_) => "fill",
            Self::SetLayout(_) => "set_layout",
        }
    }

    /// Run on the calling thread. Blocks through every pause.
    pub fn apply(self, engine: &TreeEngine) -> Outcome {
        match self {
            Self::Insert(key) => Outcome::Inserted(engine.insert(key)),
            Self::Delete(key) => Outcome::Deleted(engine.delete(key)),
            Self::Search(key) => Outcome::Searched(engine.search(key)),
            Self::Traverse(order) => Outcome::Traversed(engine.traverse(order)),
            Self::Balance => {
                engine.balance();
                Outcome::Done
            }
            Self::Clear => {
                engine.clear();
                Outcome::Done
            }
            Self::SetDiscipline(discipline) => {
                engine.set_discipline(discipline);
                Outcome::Done
            }
            Self::Fill(keys) => {
                engine.fill(&keys);
                Outcome::Done
            }
            Self::SetLayout(layout) => {
                engine.set_layout(layout);
                Outcome::Done
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bstviz_core::EngineConfig;

    #[test]
    fn apply_maps_each_operation_to_its_outcome() {
        let engine = TreeEngine::new(EngineConfig::instant());
        assert_eq!(Command::Insert(4).apply(&engine), Outcome::Inserted(true));
        assert_eq!(Command::Insert(2).apply(&engine), Outcome::Inserted(true));
        assert_eq!(
            Command::Search(2).apply(&engine),
            Outcome::Searched(SearchOutcome::Found)
        );
        assert_eq!(
            Command::Traverse(TraversalOrder::PostOrder).apply(&engine),
            Outcome::Traversed(vec![2, 4])
        );
        assert_eq!(Command::Delete(9).apply(&engine), Outcome::Deleted(false));
        assert_eq!(Command::Clear.apply(&engine), Outcome::Done);
        assert!(engine.lock_tree().is_empty());
    }

    #[test]
    fn fill_replaces_tree() {
        let engine = TreeEngine::new(EngineConfig::instant());
        Command::Insert(50).apply(&engine);
        Command::Fill(vec![3, 1, 2]).apply(&engine);
        assert_eq!(engine.lock_tree().in_order_keys(), vec![1, 2, 3]);
    }
}
