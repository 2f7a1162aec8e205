#![forbid(unsafe_code)]

//! Tree engine: BST/AVL algorithms interleaved with step-gate pauses.
//!
//! # Execution model
//!
//! Every operation runs to completion on the caller's thread. Visually
//! significant sub-steps (a comparison, a rotation, a visited node, a frame
//! of the insertion drop) call [`StepGate::pause`], which blocks that thread
//! until the step is over. Recursion stays ordinary recursion: a parked
//! thread is a suspended call stack that resumes exactly where it stopped.
//!
//! # Locking
//!
//! - The operation lock (which also guards [`EngineConfig`]) serializes
//!   operations. Two callers never interleave.
//! - The tree lock ([`SharedTree`]) is held only between pauses, never
//!   across one. Renderers lock it once per frame and always see
//!   consistent structure.
//! - Algorithms address nodes by [`Side`] paths from the root, so no borrow
//!   outlives a lock guard.
//!
//! Lock order is operation lock, then tree lock. The gate's own lock is
//! never taken while the tree lock is held.

mod balance;
mod delete;
mod insert;
mod rotation;
mod search;
mod traverse;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use web_time::Duration;

use crate::event::{EngineEvent, EventSink, Operation};
use crate::gate::{DEFAULT_STEP, PauseOutcome, StepGate, StepMode};
use crate::layout::{self, LayoutConfig};
use crate::node::{self, Key, Link, Node, Side};
use crate::stats::TreeStats;
use crate::status::StatusBoard;

pub use rotation::{Rotation, RotationCase, RotationDirection};

/// Structural invariant set enforced by the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Discipline {
    /// Plain binary search tree; equal keys go right.
    #[default]
    Bst,
    /// Height-balanced AVL tree; duplicates are rejected.
    Avl,
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bst => "BST",
            Self::Avl => "AVL",
        })
    }
}

/// Depth-first traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalOrder {
    /// Visit, left, right.
    PreOrder,
    /// Left, visit, right.
    InOrder,
    /// Left, right, visit.
    PostOrder,
}

impl TraversalOrder {
    /// Output panel label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PreOrder => "PreOrder:",
            Self::InOrder => "InOrder:",
            Self::PostOrder => "PostOrder:",
        }
    }

    /// Marker drawn on the visited node.
    #[must_use]
    pub const fn marker(self) -> node::TraversalMarker {
        match self {
            Self::PreOrder => node::TraversalMarker::Pre,
            Self::InOrder => node::TraversalMarker::In,
            Self::PostOrder => node::TraversalMarker::Post,
        }
    }
}

/// Result of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchOutcome {
    /// The key is in the tree; its node stays highlighted.
    Found,
    /// The search walked off the tree.
    NotFound,
}

/// Pause durations for each kind of step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTimings {
    /// One frame of the insertion drop.
    pub frame: Duration,
    /// One comparison during search.
    pub search: Duration,
    /// One traversal visit.
    pub visit: Duration,
    /// Hold after a traversal finishes, before highlights clear.
    pub hold: Duration,
    /// Rotation announcement.
    pub rotation: Duration,
    /// Gap between inserts during a fill.
    pub fill_gap: Duration,
}

impl StepTimings {
    /// All pauses zero-length. Manual mode still parks.
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            frame: Duration::ZERO,
            search: Duration::ZERO,
            visit: Duration::ZERO,
            hold: Duration::ZERO,
            rotation: Duration::ZERO,
            fill_gap: Duration::ZERO,
        }
    }
}

impl Default for StepTimings {
    fn default() -> Self {
        Self {
            frame: Duration::from_millis(16),
            search: DEFAULT_STEP,
            visit: Duration::from_millis(800),
            hold: Duration::from_millis(1000),
            rotation: Duration::from_millis(1500),
            fill_gap: Duration::from_millis(200),
        }
    }
}

/// Insertion drop animation parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropConfig {
    /// Vertical start of the falling node (above the canvas when negative).
    pub start_y: f64,
    /// Fraction of the remaining distance covered per frame.
    pub smoothing: f64,
    /// Distance at which the node counts as landed.
    pub epsilon: f64,
}

impl Default for DropConfig {
    fn default() -> Self {
        Self {
            start_y: -50.0,
            smoothing: 0.1,
            epsilon: 5.0,
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineConfig {
    /// Discipline the engine starts with.
    pub discipline: Discipline,
    /// Pause durations.
    pub timings: StepTimings,
    /// Layout parameters.
    pub layout: LayoutConfig,
    /// Drop animation parameters.
    pub drop: DropConfig,
}

impl EngineConfig {
    /// Defaults with zero-length pauses.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            timings: StepTimings::instant(),
            ..Self::default()
        }
    }
}

/// Tree structure plus the in-flight insertion node.
#[derive(Debug, Clone, Default)]
pub struct TreeState {
    root: Link,
    pending: Option<Node>,
    discipline: Discipline,
}

/// The tree as shared between the engine and renderers.
pub type SharedTree = Arc<Mutex<TreeState>>;

impl TreeState {
    /// An empty tree under `discipline`.
    #[must_use]
    pub fn new(discipline: Discipline) -> Self {
        Self {
            root: None,
            pending: None,
            discipline,
        }
    }

    /// Root link.
    #[must_use]
    pub fn root(&self) -> &Link {
        &self.root
    }

    /// The node currently dropping into place, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&Node> {
        self.pending.as_ref()
    }

    /// Current discipline.
    #[must_use]
    pub fn discipline(&self) -> Discipline {
        self.discipline
    }

    /// Whether the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height, node count, and leaf count.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        TreeStats::of(&self.root)
    }

    /// Keys in in-order sequence.
    #[must_use]
    pub fn in_order_keys(&self) -> Vec<Key> {
        node::in_order_keys(&self.root)
    }

    /// Key at the root.
    #[must_use]
    pub fn root_key(&self) -> Option<Key> {
        self.root.as_ref().map(|node| node.key)
    }

    /// Node at `path` from the root.
    #[must_use]
    pub fn node_at(&self, path: &[Side]) -> Option<&Node> {
        node::node_at(&self.root, path)
    }

    /// Visit every node in pre-order with its depth.
    pub fn walk<'a>(&'a self, mut f: impl FnMut(&'a Node, usize)) {
        node::walk(&self.root, 0, &mut f);
    }

    /// Number of nodes carrying a highlight or marker.
    #[must_use]
    pub fn annotated_count(&self) -> usize {
        let mut count = 0;
        self.walk(|node, _| {
            if !node.annotation.is_clear() {
                count += 1;
            }
        });
        count
    }

    /// Renderer write-back: ease every linked node one frame toward its
    /// target. The pending node is driven by the engine and left alone.
    pub fn advance_frame(&mut self, smoothing: f64) {
        node::walk_mut(&mut self.root, 0, &mut |node, _| {
            node.position.approach(smoothing);
        });
    }

    fn clear_annotations(&mut self) {
        node::walk_mut(&mut self.root, 0, &mut |node, _| {
            node.annotation = node::Annotation::default();
        });
    }
}

/// The animated BST/AVL engine.
pub struct TreeEngine {
    tree: SharedTree,
    gate: StepGate,
    board: Arc<StatusBoard>,
    events: EventSink,
    config: Mutex<EngineConfig>,
}

impl fmt::Debug for TreeEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeEngine")
            .field("gate", &self.gate)
            .field("board", &self.board)
            .finish_non_exhaustive()
    }
}

impl TreeEngine {
    /// An engine with its own auto-mode gate and no event delivery.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_parts(config, StepGate::default(), EventSink::disconnected())
    }

    /// An engine pausing through `gate` and reporting to `events`.
    ///
    /// The gate is rebound to `events`, so parked steps show up as
    /// [`EngineEvent::StepReady`] on the same channel as everything else.
    #[must_use]
    pub fn with_parts(config: EngineConfig, gate: StepGate, events: EventSink) -> Self {
        gate.bind_events(events.clone());
        let board = StatusBoard::new();
        board.update(|r| r.discipline = config.discipline);
        Self {
            tree: Arc::new(Mutex::new(TreeState::new(config.discipline))),
            gate,
            board: Arc::new(board),
            events,
            config: Mutex::new(config),
        }
    }

    /// Shared handle to the tree, for renderers.
    #[must_use]
    pub fn tree(&self) -> SharedTree {
        Arc::clone(&self.tree)
    }

    /// Lock the tree for reading. Blocks only while the engine mutates
    /// between steps.
    pub fn lock_tree(&self) -> MutexGuard<'_, TreeState> {
        self.tree.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The step gate this engine pauses on.
    #[must_use]
    pub fn gate(&self) -> &StepGate {
        &self.gate
    }

    /// Shared handle to the status board.
    #[must_use]
    pub fn board(&self) -> Arc<StatusBoard> {
        Arc::clone(&self.board)
    }

    /// Current configuration. Waits for a running operation to finish.
    #[must_use]
    pub fn config(&self) -> EngineConfig {
        *self.config.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Switch between timed and manually advanced steps. Takes effect
    /// immediately, including on a parked step.
    pub fn set_step_mode(&self, mode: StepMode) {
        self.gate.set_mode(mode);
    }

    /// Release a parked manual step. No-op in auto mode.
    pub fn advance_step(&self) -> bool {
        self.gate.advance()
    }

    /// Traverse in pre-order.
    pub fn pre_order(&self) -> Vec<Key> {
        self.traverse(TraversalOrder::PreOrder)
    }

    /// Traverse in in-order.
    pub fn in_order(&self) -> Vec<Key> {
        self.traverse(TraversalOrder::InOrder)
    }

    /// Traverse in post-order.
    pub fn post_order(&self) -> Vec<Key> {
        self.traverse(TraversalOrder::PostOrder)
    }

    /// Remove every node and hide the output panel.
    pub fn clear(&self) {
        self.begin(Operation::Clear).clear();
    }

    /// Switch discipline. The tree is cleared: its shape guarantees do not
    /// carry over.
    pub fn set_discipline(&self, discipline: Discipline) {
        let op = self.begin(Operation::SetDiscipline(discipline));
        op.engine.lock_tree().discipline = discipline;
        op.engine.board.update(|r| r.discipline = discipline);
        op.clear();
    }

    /// Replace the layout parameters and recompute targets.
    pub fn set_layout(&self, layout: LayoutConfig) {
        let mut op = self.begin(Operation::Relayout);
        op.config.layout = layout;
        op.refresh();
    }

    /// Clear the tree, then insert `keys` one after another with a short
    /// pause between them.
    pub fn fill(&self, keys: &[Key]) {
        let op = self.begin(Operation::Fill(keys.len()));
        op.clear();
        for &key in keys {
            op.insert(key);
            op.pause(op.config.timings.fill_gap);
        }
    }

    fn begin(&self, operation: Operation) -> Op<'_> {
        let config = self.config.lock().unwrap_or_else(|e| e.into_inner());
        let span = tracing::debug_span!("operation", ?operation).entered();
        tracing::debug!("operation started");
        self.events.emit(EngineEvent::OperationStarted(operation));
        Op {
            engine: self,
            config,
            operation,
            _span: span,
        }
    }
}

/// Exclusive access to the engine for the duration of one operation.
struct Op<'e> {
    engine: &'e TreeEngine,
    config: MutexGuard<'e, EngineConfig>,
    operation: Operation,
    _span: tracing::span::EnteredSpan,
}

impl Op<'_> {
    fn tree(&self) -> MutexGuard<'_, TreeState> {
        self.engine.lock_tree()
    }

    fn pause(&self, duration: Duration) -> PauseOutcome {
        self.engine.gate.pause(duration)
    }

    fn relayout(&self, state: &mut TreeState) {
        layout::apply(&mut state.root, &self.config.layout);
    }

    fn clear_annotations(&self) {
        self.tree().clear_annotations();
    }

    /// Recompute layout and stats once, after a structural change.
    fn refresh(&self) {
        let stats = {
            let mut state = self.tree();
            self.relayout(&mut state);
            state.stats()
        };
        self.engine.board.update(|r| r.stats = stats);
        self.engine.events.emit(EngineEvent::StatsChanged(stats));
        tracing::debug!(
            height = stats.height,
            count = stats.count,
            leaves = stats.leaves,
            "stats refreshed"
        );
    }

    fn clear(&self) {
        {
            let mut state = self.tree();
            state.root = None;
            state.pending = None;
        }
        self.engine.board.update(|r| {
            r.output = None;
            r.rotation_message = None;
            r.last_search = None;
        });
        self.refresh();
    }
}

impl Drop for Op<'_> {
    fn drop(&mut self) {
        tracing::debug!("operation finished");
        self.engine
            .events
            .emit(EngineEvent::OperationFinished(self.operation));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn engine() -> TreeEngine {
        TreeEngine::new(EngineConfig::instant())
    }

    #[test]
    fn new_engine_is_empty() {
        let engine = engine();
        assert!(engine.lock_tree().is_empty());
        assert_eq!(engine.board().snapshot().stats, TreeStats::default());
    }

    #[test]
    fn clear_empties_tree_and_hides_output() {
        let engine = engine();
        for key in [5, 3, 8] {
            engine.insert(key);
        }
        engine.in_order();
        assert!(engine.board().snapshot().output.is_some());

        engine.clear();
        assert!(engine.lock_tree().is_empty());
        let readout = engine.board().snapshot();
        assert!(readout.output.is_none());
        assert_eq!(readout.stats, TreeStats::default());
    }

    #[test]
    fn switching_discipline_clears_tree() {
        let engine = engine();
        engine.insert(1);
        engine.insert(2);
        engine.set_discipline(Discipline::Avl);
        let state = engine.lock_tree();
        assert!(state.is_empty());
        assert_eq!(state.discipline(), Discipline::Avl);
        assert_eq!(engine.board().snapshot().discipline, Discipline::Avl);
    }

    #[test]
    fn set_layout_moves_targets() {
        let engine = engine();
        engine.insert(10);
        engine.set_layout(LayoutConfig::for_viewport(400.0));
        let state = engine.lock_tree();
        assert_eq!(
            state.node_at(&[]).unwrap().position.target,
            Point::new(200.0, 60.0)
        );
    }

    #[test]
    fn advance_frame_eases_current_positions() {
        let engine = engine();
        engine.insert(10);
        engine.insert(5);
        let tree = engine.tree();
        let mut state = tree.lock().unwrap();
        let before = state.node_at(&[Side::Left]).unwrap().position;
        state.advance_frame(0.5);
        let after = state.node_at(&[Side::Left]).unwrap().position;
        assert_eq!(after.current, before.current.lerp(before.target, 0.5));
    }

    #[test]
    fn fill_replaces_contents() {
        let engine = engine();
        engine.insert(99);
        engine.fill(&[4, 2, 6]);
        assert_eq!(engine.lock_tree().in_order_keys(), vec![2, 4, 6]);
        assert_eq!(engine.board().snapshot().stats.count, 3);
    }

    #[test]
    fn operations_emit_start_and_finish() {
        let (events, rx) = EventSink::channel();
        let engine = TreeEngine::with_parts(EngineConfig::instant(), StepGate::default(), events);
        engine.clear();
        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            events.first(),
            Some(&EngineEvent::OperationStarted(Operation::Clear))
        );
        assert_eq!(
            events.last(),
            Some(&EngineEvent::OperationFinished(Operation::Clear))
        );
    }
}
