#![forbid(unsafe_code)]

//! Status board: the controller-facing readout, read every frame.
//!
//! The readout (stats, traversal output, rotation message, last search
//! result) changes a handful of times per operation but is read on every
//! rendered frame. It lives in an [`ArcSwap`], so readers never contend
//! with the engine's tree lock and never observe a torn update.
//!
//! There is a single writer (the engine). Updates clone the current
//! readout, edit the clone, and swap it in.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::engine::{Discipline, SearchOutcome, TraversalOrder};
use crate::node::Key;
use crate::stats::TreeStats;

/// Keys emitted so far by the current (or last) traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalOutput {
    /// Which traversal produced the keys.
    pub order: TraversalOrder,
    /// Keys in visitation order.
    pub keys: Vec<Key>,
}

impl TraversalOutput {
    /// An empty output for `order`.
    #[must_use]
    pub fn new(order: TraversalOrder) -> Self {
        Self {
            order,
            keys: Vec::new(),
        }
    }
}

impl fmt::Display for TraversalOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.order.label())?;
        for key in &self.keys {
            write!(f, "{key}\u{279d}")?;
        }
        Ok(())
    }
}

/// Everything a controller displays besides the tree itself.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Readout {
    /// Current discipline.
    pub discipline: Discipline,
    /// Stats as of the last structural change.
    pub stats: TreeStats,
    /// Output panel contents; `None` when hidden.
    pub output: Option<TraversalOutput>,
    /// Rotation announcement shown while a rotation is pending.
    pub rotation_message: Option<String>,
    /// Key and outcome of the most recent search.
    pub last_search: Option<(Key, SearchOutcome)>,
}

/// Read-optimized holder of the current [`Readout`].
pub struct StatusBoard {
    inner: ArcSwap<Readout>,
}

impl StatusBoard {
    /// A board showing an empty readout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: ArcSwap::from_pointee(Readout::default()),
        }
    }

    /// The current readout. Wait-free.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Readout> {
        self.inner.load_full()
    }

    /// Edit the readout and publish the result.
    pub fn update(&self, edit: impl FnOnce(&mut Readout)) {
        let mut next = Readout::clone(&self.inner.load());
        edit(&mut next);
        self.inner.store(Arc::new(next));
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StatusBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StatusBoard").field(&self.snapshot()).finish()
    }
}
