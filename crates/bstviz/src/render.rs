//! Text renderer.
//!
//! Trees are drawn sideways: the root at the left margin, right subtrees
//! above their parent and left subtrees below, one level of indent per
//! depth. Tilt your head left to see the usual picture.
//!
//! ```text
//!         9
//!     8
//!         7
//! 5*
//!     3
//! ```

use std::fmt::Write as _;

use bstviz_core::{
    Annotation, Highlight, Link, Readout, SearchOutcome, TraversalMarker, TreeState,
};

const INDENT: usize = 4;

/// Marks appended to a key for its annotation.
#[must_use]
pub fn marks(annotation: &Annotation) -> String {
    let mut marks = String::new();
    match annotation.highlight {
        Some(Highlight::SearchPath) => marks.push('*'),
        Some(Highlight::Traversal) => marks.push('+'),
        Some(Highlight::Imbalance) => marks.push('!'),
        None => {}
    }
    match annotation.marker {
        Some(TraversalMarker::Pre) => marks.push_str(" <pre>"),
        Some(TraversalMarker::In) => marks.push_str(" <in>"),
        Some(TraversalMarker::Post) => marks.push_str(" <post>"),
        None => {}
    }
    marks
}

/// Draw the tree, plus the node still dropping into place if there is one.
#[must_use]
pub fn render_tree(state: &TreeState) -> String {
    let mut out = String::new();
    if let Some(pending) = state.pending() {
        let _ = writeln!(out, "(dropping {})", pending.key);
    }
    if state.is_empty() {
        out.push_str("(empty)\n");
    } else {
        draw(state.root(), 0, &mut out);
    }
    out
}

fn draw(link: &Link, depth: usize, out: &mut String) {
    let Some(node) = link.as_deref() else {
        return;
    };
    draw(&node.right, depth + 1, out);
    let _ = writeln!(
        out,
        "{:indent$}{}{}",
        "",
        node.key,
        marks(&node.annotation),
        indent = depth * INDENT
    );
    draw(&node.left, depth + 1, out);
}

/// One line of stats followed by whatever else the readout shows.
#[must_use]
pub fn render_readout(readout: &Readout) -> String {
    let stats = readout.stats;
    let mut out = format!(
        "Mode: {} | Height: {} | Nodes: {} | Leaves: {}\n",
        readout.discipline, stats.height, stats.count, stats.leaves
    );
    if let Some(message) = &readout.rotation_message {
        let _ = writeln!(out, "{message}");
    }
    if let Some(output) = &readout.output {
        let _ = writeln!(out, "{output}");
    }
    if let Some((key, outcome)) = readout.last_search {
        let verdict = match outcome {
            SearchOutcome::Found => "found",
            SearchOutcome::NotFound => "not found",
        };
        let _ = writeln!(out, "Search {key}: {verdict}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bstviz_core::{Discipline, EngineConfig, TraversalOrder, TraversalOutput, TreeEngine};

    fn engine_with(keys: &[i64]) -> TreeEngine {
        let engine = TreeEngine::new(EngineConfig::instant());
        for &key in keys {
            engine.insert(key);
        }
        engine
    }

    #[test]
    fn draws_sideways_with_right_on_top() {
        let engine = engine_with(&[5, 3, 8]);
        assert_eq!(render_tree(&engine.lock_tree()), "    8\n5\n    3\n");
    }

    #[test]
    fn empty_tree_says_so() {
        assert_eq!(render_tree(&TreeState::new(Discipline::Bst)), "(empty)\n");
    }

    #[test]
    fn found_node_is_marked() {
        let engine = engine_with(&[5, 3, 8]);
        engine.search(3);
        assert_eq!(render_tree(&engine.lock_tree()), "    8\n5\n    3*\n");
    }

    #[test]
    fn marks_combine_highlight_and_marker() {
        let annotation = Annotation {
            highlight: Some(Highlight::Traversal),
            marker: Some(TraversalMarker::Post),
        };
        assert_eq!(marks(&annotation), "+ <post>");
        assert_eq!(marks(&Annotation::default()), "");
    }

    #[test]
    fn readout_lists_stats_output_and_search() {
        let readout = Readout {
            discipline: Discipline::Avl,
            output: Some(TraversalOutput {
                order: TraversalOrder::InOrder,
                keys: vec![1, 2],
            }),
            last_search: Some((7, SearchOutcome::NotFound)),
            ..Readout::default()
        };
        assert_eq!(
            render_readout(&readout),
            "Mode: AVL | Height: 0 | Nodes: 0 | Leaves: 0\nInOrder: 1\u{279d}2\u{279d}\nSearch 7: not found\n"
        );
    }
}
