#![forbid(unsafe_code)]

//! Manual step mode: the engine parks on a worker thread and resumes one
//! step per advance.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use bstviz_core::{
    Discipline, EngineConfig, EngineEvent, EventSink, Highlight, SearchOutcome, Side, StepGate,
    StepMode, StepTimings, TreeEngine,
};

const PATIENCE: Duration = Duration::from_secs(5);

fn manual_engine(discipline: Discipline, keys: &[i64]) -> Arc<TreeEngine> {
    let engine = TreeEngine::with_parts(
        EngineConfig {
            discipline,
            ..EngineConfig::instant()
        },
        StepGate::new(StepMode::Auto),
        EventSink::disconnected(),
    );
    for &key in keys {
        engine.insert(key);
    }
    engine.set_step_mode(StepMode::Manual);
    Arc::new(engine)
}

#[test]
fn each_advance_resumes_exactly_one_search_step() {
    let engine = manual_engine(Discipline::Bst, &[5, 3, 1]);
    let worker = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || engine.search(1))
    };

    let gate = engine.gate().clone();
    for depth in 0..3 {
        assert!(gate.wait_until_awaiting(PATIENCE), "step {depth} never parked");
        {
            let state = engine.lock_tree();
            let path = vec![Side::Left; depth];
            let node = state.node_at(&path).unwrap();
            assert_eq!(node.annotation.highlight, Some(Highlight::SearchPath));
            assert_eq!(state.annotated_count(), 1);
        }
        assert!(engine.advance_step());
    }

    assert_eq!(worker.join().unwrap(), SearchOutcome::Found);
    assert!(!engine.advance_step());
}

#[test]
fn switching_to_auto_finishes_without_advance() {
    let engine = manual_engine(Discipline::Bst, &[2, 1, 3]);
    let worker = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || engine.in_order())
    };

    assert!(engine.gate().wait_until_awaiting(PATIENCE));
    engine.set_step_mode(StepMode::Auto);
    assert_eq!(worker.join().unwrap(), vec![1, 2, 3]);
}

#[test]
fn rotation_announcement_is_visible_while_parked() {
    let (events, rx) = EventSink::channel();
    let engine = Arc::new(TreeEngine::with_parts(
        EngineConfig {
            discipline: Discipline::Avl,
            drop: bstviz_core::DropConfig {
                smoothing: 0.0,
                ..Default::default()
            },
            ..EngineConfig::instant()
        },
        StepGate::new(StepMode::Auto),
        events,
    ));
    engine.insert(1);
    engine.insert(2);
    engine.set_step_mode(StepMode::Manual);

    let worker = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || engine.insert(3))
    };

    assert!(engine.gate().wait_until_awaiting(PATIENCE));
    assert_eq!(
        engine.board().snapshot().rotation_message.as_deref(),
        Some("Performing Left Rotation on Node 1")
    );
    assert_eq!(
        engine.lock_tree().node_at(&[]).unwrap().annotation.highlight,
        Some(Highlight::Imbalance)
    );
    assert!(rx.try_iter().any(|e| e == EngineEvent::StepReady));

    engine.advance_step();
    assert!(worker.join().unwrap());
    assert_eq!(engine.board().snapshot().rotation_message, None);
    assert_eq!(engine.lock_tree().root_key(), Some(2));
}

/// Advance every parked step until `worker` finishes; returns how many
/// advances it took.
fn advance_until_done<T>(engine: &TreeEngine, worker: &thread::JoinHandle<T>) -> usize {
    let deadline = Instant::now() + PATIENCE;
    let mut advances = 0;
    while !worker.is_finished() {
        assert!(Instant::now() < deadline, "operation never finished");
        if engine.gate().wait_until_awaiting(Duration::from_millis(20)) && engine.advance_step() {
            advances += 1;
        }
    }
    advances
}

#[test]
fn one_advance_lands_a_dropping_node() {
    for discipline in [Discipline::Bst, Discipline::Avl] {
        let engine = manual_engine(discipline, &[]);
        assert!(engine.config().drop.smoothing > 0.0);
        let worker = {
            let engine = Arc::clone(&engine);
            thread::spawn(move || engine.insert(7))
        };

        assert!(engine.gate().wait_until_awaiting(PATIENCE));
        assert_eq!(engine.lock_tree().pending().map(|p| p.key), Some(7));
        assert_eq!(advance_until_done(&engine, &worker), 1, "{discipline}");
        assert!(worker.join().unwrap());

        let state = engine.lock_tree();
        assert!(state.pending().is_none());
        assert_eq!(state.root_key(), Some(7));
    }
}

#[test]
fn switching_to_manual_mid_pause_parks_the_next_step() {
    let engine = Arc::new(TreeEngine::new(EngineConfig {
        timings: StepTimings {
            search: Duration::from_millis(500),
            ..StepTimings::instant()
        },
        ..EngineConfig::instant()
    }));
    for key in [5, 3, 1] {
        engine.insert(key);
    }
    let worker = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || engine.search(1))
    };

    // First comparison is sleeping in auto mode.
    let deadline = Instant::now() + PATIENCE;
    while engine.lock_tree().annotated_count() == 0 {
        assert!(Instant::now() < deadline, "search never started");
        thread::sleep(Duration::from_millis(1));
    }
    engine.set_step_mode(StepMode::Manual);

    assert!(engine.gate().wait_until_awaiting(PATIENCE));
    let parked_at = highlighted_depth(&engine).expect("parked step is highlighted");
    assert!(parked_at >= 1, "the auto pause in progress must run out first");

    assert!(engine.advance_step());
    if parked_at < 2 {
        assert!(engine.gate().wait_until_awaiting(PATIENCE));
        assert_eq!(highlighted_depth(&engine), Some(parked_at + 1));
        assert!(engine.advance_step());
    }
    assert_eq!(worker.join().unwrap(), SearchOutcome::Found);
}

fn highlighted_depth(engine: &TreeEngine) -> Option<usize> {
    let mut found = None;
    engine.lock_tree().walk(|node, depth| {
        if node.annotation.highlight == Some(Highlight::SearchPath) {
            found = Some(depth);
        }
    });
    found
}
