#![no_main]

use arbitrary::Arbitrary;
use bstviz_core::node::Link;
use bstviz_core::{Discipline, DropConfig, EngineConfig, TraversalOrder, TreeEngine};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Insert(i8),
    Delete(i8),
    Search(i8),
    Traverse(u8),
    Balance,
    Clear,
    Toggle,
}

fn check_order(link: &Link, low: Option<i64>, high: Option<i64>, avl: bool) -> usize {
    let Some(node) = link.as_deref() else {
        return 0;
    };
    if let Some(low) = low {
        assert!(node.key >= low, "key {} below bound {low}", node.key);
    }
    if let Some(high) = high {
        assert!(node.key < high, "key {} not below bound {high}", node.key);
    }
    let left = check_order(&node.left, low, Some(node.key), avl);
    let right = check_order(&node.right, Some(node.key), high, avl);
    if avl {
        assert!(left.abs_diff(right) <= 1, "AVL balance violated at {}", node.key);
    }
    1 + left.max(right)
}

fuzz_target!(|ops: Vec<Op>| {
    if ops.len() > 256 {
        return;
    }
    let engine = TreeEngine::new(EngineConfig {
        drop: DropConfig {
            smoothing: 0.0,
            ..DropConfig::default()
        },
        ..EngineConfig::instant()
    });

    for op in ops {
        match op {
            Op::Insert(key) => {
                engine.insert(i64::from(key));
            }
            Op::Delete(key) => {
                engine.delete(i64::from(key));
            }
            Op::Search(key) => {
                engine.search(i64::from(key));
            }
            Op::Traverse(order) => {
                let order = match order % 3 {
                    0 => TraversalOrder::PreOrder,
                    1 => TraversalOrder::InOrder,
                    _ => TraversalOrder::PostOrder,
                };
                let keys = engine.traverse(order);
                assert_eq!(keys.len(), engine.lock_tree().stats().count);
            }
            Op::Balance => engine.balance(),
            Op::Clear => engine.clear(),
            Op::Toggle => {
                let next = match engine.lock_tree().discipline() {
                    Discipline::Bst => Discipline::Avl,
                    Discipline::Avl => Discipline::Bst,
                };
                engine.set_discipline(next);
            }
        }

        let state = engine.lock_tree();
        // Plain BST keeps equal keys on the right; balance may not.
        if state.discipline() == Discipline::Avl {
            let height = check_order(state.root(), None, None, true);
            assert_eq!(height, state.stats().height);
        }
        let keys = state.in_order_keys();
        assert!(keys.windows(2).all(|w| w[0] <= w[1]), "in-order not sorted");
        assert_eq!(engine.board().snapshot().stats, state.stats());
    }
});
