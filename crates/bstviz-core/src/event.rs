#![forbid(unsafe_code)]

//! Discrete notifications from the engine to a controller.
//!
//! Events are fire-and-forget: the engine never blocks on a slow or absent
//! receiver. A dropped receiver silently disables delivery.

use std::sync::mpsc;

use crate::engine::{Discipline, Rotation, TraversalOrder};
use crate::node::Key;
use crate::stats::TreeStats;

/// The operation an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Insert(Key),
    Delete(Key),
    Search(Key),
    Traverse(TraversalOrder),
    Balance,
    Clear,
    SetDiscipline(Discipline),
    Relayout,
    Fill(usize),
}

/// Something the controller may want to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// An operation acquired the engine.
    OperationStarted(Operation),
    /// An operation completed and released the engine.
    OperationFinished(Operation),
    /// The step gate is parked in manual mode waiting for an advance.
    StepReady,
    /// A rotation is announced and about to happen.
    RotationStarted { rotation: Rotation, pivot: Key },
    /// A traversal appended `key` to its output.
    NodeVisited { order: TraversalOrder, key: Key },
    /// A search walked off the tree.
    NotFound(Key),
    /// Aggregate stats were recomputed.
    StatsChanged(TreeStats),
}

/// Cloneable sending half for [`EngineEvent`]s.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    sender: Option<mpsc::Sender<EngineEvent>>,
}

impl EventSink {
    /// A sink that drops everything.
    #[must_use]
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Create a sink and the receiver that observes it.
    #[must_use]
    pub fn channel() -> (Self, mpsc::Receiver<EngineEvent>) {
        let (sender, receiver) = mpsc::channel();
        (
            Self {
                sender: Some(sender),
            },
            receiver,
        )
    }

    /// Deliver an event, ignoring a disconnected receiver.
    pub fn emit(&self, event: EngineEvent) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(event);
        }
    }
}
