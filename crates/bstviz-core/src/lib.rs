#![forbid(unsafe_code)]

//! bstviz core
//!
//! The animated binary search tree engine behind the bstviz trainer.
//!
//! # Key Components
//!
//! - [`TreeEngine`] - BST/AVL algorithms that pause at every visible step
//! - [`StepGate`] - Timed or manually advanced suspension point
//! - [`StatusBoard`] - Lock-free readout (stats, traversal output, rotation text)
//! - [`EventSink`] - Discrete engine notifications over a channel
//! - [`layout`] - Target positions from tree shape
//!
//! # How it fits together
//!
//! A controller calls engine operations on a worker thread. The engine
//! mutates the shared tree between pauses; a renderer locks the tree once
//! per frame, draws it, and eases current positions toward their targets.
//!
//! ```
//! use bstviz_core::{Discipline, EngineConfig, TreeEngine};
//!
//! let engine = TreeEngine::new(EngineConfig {
//!     discipline: Discipline::Avl,
//!     ..EngineConfig::instant()
//! });
//! for key in [1, 2, 3] {
//!     engine.insert(key);
//! }
//! assert_eq!(engine.lock_tree().root_key(), Some(2));
//! assert_eq!(engine.in_order(), vec![1, 2, 3]);
//! ```

pub mod engine;
pub mod error;
pub mod event;
pub mod gate;
pub mod geometry;
pub mod layout;
pub mod node;
pub mod stats;
pub mod status;

pub use engine::{
    Discipline, DropConfig, EngineConfig, Rotation, RotationCase, RotationDirection,
    SearchOutcome, SharedTree, StepTimings, TraversalOrder, TreeEngine, TreeState,
};
pub use error::{EngineError, Result, parse_key};
pub use event::{EngineEvent, EventSink, Operation};
pub use gate::{PauseOutcome, StepGate, StepMode};
pub use geometry::Point;
pub use layout::LayoutConfig;
pub use node::{Annotation, Highlight, Key, Link, Node, Side, TraversalMarker};
pub use stats::TreeStats;
pub use status::{Readout, StatusBoard, TraversalOutput};
