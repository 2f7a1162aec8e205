#![forbid(unsafe_code)]

//! Layout calculator: target positions from tree shape.
//!
//! The root sits at a fixed anchor. Each level down moves by `row_height`
//! vertically, and a child is offset from its parent horizontally by the
//! level's gap: `initial_gap` for the root's children, halved at each
//! further level. Deep levels get compressed but sibling subtrees never
//! overlap.
//!
//! Only [`Position::target`](crate::node::Position::target) is written here.
//! Easing `current` toward `target` is the renderer's job.

use crate::geometry::Point;
use crate::node::Link;

/// Viewport width assumed when none is configured.
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 1280.0;
/// Distance from the top edge to the root.
pub const DEFAULT_ANCHOR_Y: f64 = 60.0;
/// Vertical distance between depth levels.
pub const DEFAULT_ROW_HEIGHT: f64 = 80.0;

/// Layout parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Where the root is placed.
    pub anchor: Point,
    /// Horizontal parent-to-child offset at depth 1.
    pub initial_gap: f64,
    /// Vertical distance per depth level.
    pub row_height: f64,
}

impl LayoutConfig {
    /// Defaults derived from a viewport width: root centered, first gap a
    /// quarter of the width.
    #[must_use]
    pub fn for_viewport(width: f64) -> Self {
        Self {
            anchor: Point::new(width / 2.0, DEFAULT_ANCHOR_Y),
            initial_gap: width / 4.0,
            row_height: DEFAULT_ROW_HEIGHT,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::for_viewport(DEFAULT_VIEWPORT_WIDTH)
    }
}

/// Assign target positions to every node under `root`.
pub fn apply(root: &mut Link, config: &LayoutConfig) {
    place(root, config.anchor, config.initial_gap, config.row_height);
}

fn place(link: &mut Link, at: Point, gap: f64, row_height: f64) {
    let Some(node) = link.as_deref_mut() else {
        return;
    };
    node.position.target = at;
    place(&mut node.left, at.offset(-gap, row_height), gap / 2.0, row_height);
    place(&mut node.right, at.offset(gap, row_height), gap / 2.0, row_height);
}
