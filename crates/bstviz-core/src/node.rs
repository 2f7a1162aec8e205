#![forbid(unsafe_code)]

//! Tree nodes: keys, owned child links, display positions, and annotations.
//!
//! A [`Node`] owns its children exclusively through [`Link`]s. There is no
//! parent pointer: every algorithm walks top-down, and the engine addresses
//! a node by the [`Side`] path leading to it from the root. Rotations move
//! boxes between links and never copy subtrees.

use crate::geometry::Point;

/// Scalar key stored in the tree.
pub type Key = i64;

/// An owned, optional child.
pub type Link = Option<Box<Node>>;

/// Which child link to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The left (smaller keys) child.
    Left,
    /// The right (larger keys) child.
    Right,
}

/// Highlight state shown on a node. At most one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Highlight {
    /// Node lies on the current search path.
    SearchPath,
    /// Node is being (or has been) visited by a traversal.
    Traversal,
    /// Node is the pivot of an upcoming rotation.
    Imbalance,
}

/// Directional marker drawn next to a node while a traversal visits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalMarker {
    /// Pre-order visit (arrow from the left).
    Pre,
    /// In-order visit (arrow from below).
    In,
    /// Post-order visit (arrow from the right).
    Post,
}

/// Transient visual state with no structural meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Annotation {
    /// Active highlight, if any.
    pub highlight: Option<Highlight>,
    /// Active traversal marker, if any.
    pub marker: Option<TraversalMarker>,
}

impl Annotation {
    /// Whether neither a highlight nor a marker is set.
    #[inline]
    pub const fn is_clear(&self) -> bool {
        self.highlight.is_none() && self.marker.is_none()
    }
}

/// Where a node is drawn now and where the layout wants it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    /// Position the renderer last drew.
    pub current: Point,
    /// Position assigned by the layout calculator.
    pub target: Point,
}

impl Position {
    /// A position at rest at `at`.
    #[inline]
    pub const fn at(at: Point) -> Self {
        Self {
            current: at,
            target: at,
        }
    }

    /// Advance `current` one frame toward `target`.
    #[inline]
    pub fn approach(&mut self, smoothing: f64) {
        self.current = self.current.lerp(self.target, smoothing);
    }
}

/// A tree element.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// The stored key.
    pub key: Key,
    /// Left child (keys smaller than `key`).
    pub left: Link,
    /// Right child (keys larger than `key`; equal keys under plain BST).
    pub right: Link,
    /// Display position.
    pub position: Position,
    /// Transient highlight/marker.
    pub annotation: Annotation,
}

impl Node {
    /// Create a leaf at rest at `at`.
    #[must_use]
    pub fn new(key: Key, at: Point) -> Self {
        Self {
            key,
            left: None,
            right: None,
            position: Position::at(at),
            annotation: Annotation::default(),
        }
    }

    /// Create a boxed leaf, ready to be linked.
    #[must_use]
    pub fn boxed(key: Key, at: Point) -> Box<Self> {
        Box::new(Self::new(key, at))
    }

    /// Borrow one child link.
    #[inline]
    pub fn child(&self, side: Side) -> &Link {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Mutably borrow one child link.
    #[inline]
    pub fn child_mut(&mut self, side: Side) -> &mut Link {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Whether the node has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// `height(left) - height(right)`.
    #[must_use]
    pub fn balance_factor(&self) -> i64 {
        height(&self.left) as i64 - height(&self.right) as i64
    }
}

/// Height of a subtree; an absent subtree has height 0.
#[must_use]
pub fn height(link: &Link) -> usize {
    match link {
        Some(node) => 1 + height(&node.left).max(height(&node.right)),
        None => 0,
    }
}

/// Balance factor of a subtree root; 0 for an absent subtree.
#[must_use]
pub fn balance_factor(link: &Link) -> i64 {
    link.as_deref().map_or(0, Node::balance_factor)
}

/// Follow `path` from `link` and return the link it ends at.
///
/// Stops early at an absent link.
pub fn slot_mut<'a>(link: &'a mut Link, path: &[Side]) -> &'a mut Link {
    match path.split_first() {
        Some((side, rest)) => match link {
            Some(node) => slot_mut(node.child_mut(*side), rest),
            empty @ None => empty,
        },
        None => link,
    }
}

/// Shared-borrow variant of [`slot_mut`], returning the node at the path.
#[must_use]
pub fn node_at<'a>(link: &'a Link, path: &[Side]) -> Option<&'a Node> {
    let mut node = link.as_deref()?;
    for side in path {
        node = node.child(*side).as_deref()?;
    }
    Some(node)
}

/// Mutable variant of [`node_at`].
pub fn node_at_mut<'a>(link: &'a mut Link, path: &[Side]) -> Option<&'a mut Node> {
    slot_mut(link, path).as_deref_mut()
}

/// Smallest key in a subtree.
#[must_use]
pub fn min_key(node: &Node) -> Key {
    let mut node = node;
    while let Some(left) = node.left.as_deref() {
        node = left;
    }
    node.key
}

/// Rotate the subtree at `link` to the right: its left child becomes the
/// new subtree root. No-op when there is no left child.
pub fn rotate_right(link: &mut Link) {
    let Some(mut pivot) = link.take() else {
        return;
    };
    let Some(mut new_root) = pivot.left.take() else {
        *link = Some(pivot);
        return;
    };
    pivot.left = new_root.right.take();
    new_root.right = Some(pivot);
    *link = Some(new_root);
}

/// Rotate the subtree at `link` to the left: its right child becomes the
/// new subtree root. No-op when there is no right child.
pub fn rotate_left(link: &mut Link) {
    let Some(mut pivot) = link.take() else {
        return;
    };
    let Some(mut new_root) = pivot.right.take() else {
        *link = Some(pivot);
        return;
    };
    pivot.right = new_root.left.take();
    new_root.left = Some(pivot);
    *link = Some(new_root);
}

/// Visit every node in pre-order with its depth (root depth 0).
pub fn walk<'a>(link: &'a Link, depth: usize, f: &mut impl FnMut(&'a Node, usize)) {
    if let Some(node) = link.as_deref() {
        f(node, depth);
        walk(&node.left, depth + 1, f);
        walk(&node.right, depth + 1, f);
    }
}

/// Mutable variant of [`walk`].
pub fn walk_mut(link: &mut Link, depth: usize, f: &mut impl FnMut(&mut Node, usize)) {
    if let Some(node) = link.as_deref_mut() {
        f(node, depth);
        walk_mut(&mut node.left, depth + 1, f);
        walk_mut(&mut node.right, depth + 1, f);
    }
}

/// Keys in in-order sequence.
#[must_use]
pub fn in_order_keys(link: &Link) -> Vec<Key> {
    fn collect(link: &Link, out: &mut Vec<Key>) {
        if let Some(node) = link.as_deref() {
            collect(&node.left, out);
            out.push(node.key);
            collect(&node.right, out);
        }
    }
    let mut out = Vec::new();
    collect(link, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(key: Key) -> Link {
        Some(Node::boxed(key, Point::default()))
    }

    fn branch(key: Key, left: Link, right: Link) -> Link {
        let mut node = Node::boxed(key, Point::default());
        node.left = left;
        node.right = right;
        Some(node)
    }

    #[test]
    fn height_of_absent_is_zero() {
        assert_eq!(height(&None), 0);
        assert_eq!(height(&leaf(1)), 1);
    }

    #[test]
    fn balance_factor_counts_left_minus_right() {
        let tree = branch(3, branch(2, leaf(1), None), None);
        assert_eq!(balance_factor(&tree), 2);
        assert_eq!(balance_factor(&None), 0);
    }

    #[test]
    fn rotate_right_promotes_left_child() {
        let mut tree = branch(3, branch(2, leaf(1), None), None);
        rotate_right(&mut tree);
        let root = tree.as_deref().unwrap();
        assert_eq!(root.key, 2);
        assert_eq!(root.left.as_ref().unwrap().key, 1);
        assert_eq!(root.right.as_ref().unwrap().key, 3);
        assert_eq!(in_order_keys(&tree), vec![1, 2, 3]);
    }

    #[test]
    fn rotate_left_keeps_inner_subtree() {
        let mut tree = branch(1, leaf(0), branch(3, leaf(2), leaf(4)));
        rotate_left(&mut tree);
        assert_eq!(tree.as_ref().unwrap().key, 3);
        let old_root = tree.as_ref().unwrap().left.as_ref().unwrap();
        assert_eq!(old_root.key, 1);
        assert_eq!(old_root.right.as_ref().unwrap().key, 2);
        assert_eq!(in_order_keys(&tree), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn rotation_without_child_is_noop() {
        let mut tree = leaf(7);
        rotate_left(&mut tree);
        rotate_right(&mut tree);
        assert_eq!(tree.as_ref().unwrap().key, 7);
    }

    #[test]
    fn slot_mut_follows_path() {
        let mut tree = branch(5, branch(3, leaf(1), leaf(4)), leaf(8));
        let slot = slot_mut(&mut tree, &[Side::Left, Side::Right]);
        assert_eq!(slot.as_ref().unwrap().key, 4);
        let past_leaf = slot_mut(&mut tree, &[Side::Right, Side::Left, Side::Left]);
        assert!(past_leaf.is_none());
    }

    #[test]
    fn node_at_and_min_key() {
        let tree = branch(5, branch(3, leaf(1), leaf(4)), leaf(8));
        assert_eq!(node_at(&tree, &[]).unwrap().key, 5);
        assert_eq!(node_at(&tree, &[Side::Left, Side::Left]).unwrap().key, 1);
        assert!(node_at(&tree, &[Side::Right, Side::Right]).is_none());
        assert_eq!(min_key(tree.as_deref().unwrap()), 1);
    }

    #[test]
    fn walk_reports_depths_in_pre_order() {
        let tree = branch(5, branch(3, leaf(1), None), leaf(8));
        let mut seen = Vec::new();
        walk(&tree, 0, &mut |node, depth| seen.push((node.key, depth)));
        assert_eq!(seen, vec![(5, 0), (3, 1), (1, 2), (8, 1)]);
    }

    #[test]
    fn approach_converges() {
        let mut pos = Position {
            current: Point::new(0.0, -50.0),
            target: Point::new(0.0, 60.0),
        };
        for _ in 0..100 {
            pos.approach(0.1);
        }
        assert!((pos.current.y - 60.0).abs() < 0.01);
    }
}
