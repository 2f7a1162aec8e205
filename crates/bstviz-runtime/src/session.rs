#![forbid(unsafe_code)]

//! Session: the engine on its own worker thread.
//!
//! Commands are queued over a channel and run one at a time on the worker,
//! which is where every step pause blocks. The controller thread stays
//! free to advance steps, flip the step mode, and read the tree and the
//! status board while an operation is parked.
//!
//! # Shutdown
//!
//! [`Session::shutdown`] switches the gate to auto (releasing a parked
//! step), skips any still-queued commands, and joins the worker. Dropping
//! a session does the same without joining.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use bstviz_core::{
    EventSink, Key, SharedTree, StatusBoard, StepGate, StepMode, TreeEngine,
};
use web_time::Duration;

use crate::command::{Command, Outcome};
use crate::config::TrainerConfig;
use crate::error::{Result, RuntimeError};
use crate::fill;

struct Job {
    command: Command,
    reply: mpsc::Sender<Outcome>,
}

/// Pending result of a submitted command.
#[derive(Debug)]
pub struct Ticket {
    reply: mpsc::Receiver<Outcome>,
}

impl Ticket {
    /// Block until the command has run.
    pub fn wait(self) -> Result<Outcome> {
        self.reply.recv().map_err(|_| RuntimeError::SessionClosed)
    }

    /// The outcome, if the command has already run.
    pub fn try_outcome(&self) -> Option<Outcome> {
        self.reply.try_recv().ok()
    }

    /// Block up to `timeout` for the outcome.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Outcome> {
        self.reply.recv_timeout(timeout).ok()
    }
}

/// A running engine with a command queue.
pub struct Session {
    engine: Arc<TreeEngine>,
    jobs: Option<mpsc::Sender<Job>>,
    worker: Option<thread::JoinHandle<()>>,
    queued: Arc<AtomicUsize>,
    closing: Arc<AtomicBool>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("engine", &self.engine)
            .field("queued", &self.queued.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Build an engine from `config` and start its worker.
    pub fn start(config: &TrainerConfig, events: EventSink) -> Self {
        let gate = StepGate::new(config.step_mode());
        let engine = TreeEngine::with_parts(config.engine_config(), gate, events);
        Self::with_engine(engine)
    }

    /// Start a worker around an existing engine.
    pub fn with_engine(engine: TreeEngine) -> Self {
        let engine = Arc::new(engine);
        let (jobs, rx) = mpsc::channel::<Job>();
        let queued = Arc::new(AtomicUsize::new(0));
        let closing = Arc::new(AtomicBool::new(false));

        let worker = {
            let engine = Arc::clone(&engine);
            let queued = Arc::clone(&queued);
            let closing = Arc::clone(&closing);
            thread::spawn(move || {
                tracing::debug!("session worker started");
                for job in rx {
                    if closing.load(Ordering::Acquire) {
                        tracing::debug!(command = job.command.name(), "skipped at shutdown");
                        queued.fetch_sub(1, Ordering::AcqRel);
                        continue;
                    }
                    let name = job.command.name();
                    let outcome = job.command.apply(&engine);
                    tracing::trace!(command = name, ?outcome, "command finished");
                    // A reply means the command has left the queue.
                    queued.fetch_sub(1, Ordering::AcqRel);
                    let _ = job.reply.send(outcome);
                }
                tracing::debug!("session worker stopped");
            })
        };

        Self {
            engine,
            jobs: Some(jobs),
            worker: Some(worker),
            queued,
            closing,
        }
    }

    /// Queue `command` behind any others and return immediately.
    pub fn submit(&self, command: Command) -> Result<Ticket> {
        let jobs = self.jobs.as_ref().ok_or(RuntimeError::SessionClosed)?;
        let (reply, rx) = mpsc::channel();
        self.queued.fetch_add(1, Ordering::AcqRel);
        if jobs.send(Job { command, reply }).is_err() {
            self.queued.fetch_sub(1, Ordering::AcqRel);
            return Err(RuntimeError::SessionClosed);
        }
        Ok(Ticket { reply: rx })
    }

    /// Queue `command` and wait for it. In manual mode this only returns
    /// once another thread has advanced every step.
    pub fn run(&self, command: Command) -> Result<Outcome> {
        self.submit(command)?.wait()
    }

    /// Queue a fill with `count` random keys. Returns the keys and the
    /// ticket for the fill.
    pub fn random_fill(&self, count: usize, seed: Option<u64>) -> Result<(Vec<Key>, Ticket)> {
        let keys = fill::random_keys(count, seed);
        tracing::debug!(count, ?seed, "random fill");
        let ticket = self.submit(Command::Fill(keys.clone()))?;
        Ok((keys, ticket))
    }

    /// Release a parked manual step. Bypasses the queue.
    pub fn advance(&self) -> bool {
        self.engine.advance_step()
    }

    /// Switch step mode immediately, including on a parked step.
    pub fn set_step_mode(&self, mode: StepMode) {
        self.engine.set_step_mode(mode);
    }

    #[must_use]
    pub fn step_mode(&self) -> StepMode {
        self.engine.gate().mode()
    }

    /// Whether the worker is parked on a manual step.
    #[must_use]
    pub fn is_awaiting(&self) -> bool {
        self.engine.gate().is_awaiting()
    }

    /// Block until the worker parks on a manual step, or `timeout` passes.
    pub fn wait_until_awaiting(&self, timeout: Duration) -> bool {
        self.engine.gate().wait_until_awaiting(timeout)
    }

    /// Commands submitted and not yet finished.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queued.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn engine(&self) -> &TreeEngine {
        &self.engine
    }

    /// Shared tree handle for a renderer.
    #[must_use]
    pub fn tree(&self) -> SharedTree {
        self.engine.tree()
    }

    /// Shared status board handle for a renderer.
    #[must_use]
    pub fn board(&self) -> Arc<StatusBoard> {
        self.engine.board()
    }

    /// Stop accepting work, release any parked step, skip queued commands,
    /// and wait for the worker to exit.
    pub fn shutdown(mut self) {
        self.close();
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            tracing::warn!("session worker panicked");
        }
    }

    fn close(&mut self) {
        self.closing.store(true, Ordering::Release);
        self.engine.set_step_mode(StepMode::Auto);
        self.jobs = None;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
        // Don't join in drop to avoid blocking
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bstviz_core::{Discipline, SearchOutcome, TraversalOrder};

    const PATIENCE: Duration = Duration::from_secs(5);

    fn instant_session() -> Session {
        Session::start(&TrainerConfig::instant(), EventSink::disconnected())
    }

    #[test]
    fn commands_run_in_submission_order() {
        let session = instant_session();
        let tickets: Vec<_> = [5, 3, 8]
            .into_iter()
            .map(|key| session.submit(Command::Insert(key)).unwrap())
            .collect();
        for ticket in tickets {
            assert_eq!(ticket.wait().unwrap(), Outcome::Inserted(true));
        }
        assert_eq!(
            session.run(Command::Traverse(TraversalOrder::PreOrder)).unwrap(),
            Outcome::Traversed(vec![5, 3, 8])
        );
        assert_eq!(session.queued(), 0);
    }

    #[test]
    fn answered_commands_have_left_the_queue() {
        let session = instant_session();
        let tickets: Vec<_> = (1..=20)
            .map(|key| session.submit(Command::Insert(key)).unwrap())
            .collect();
        let total = tickets.len();
        for (done, ticket) in tickets.into_iter().enumerate() {
            ticket.wait().unwrap();
            assert!(session.queued() < total - done, "answered command still counted");
        }
        assert_eq!(session.queued(), 0);
    }

    #[test]
    fn manual_steps_are_driven_from_controller_thread() {
        let session = instant_session();
        session.run(Command::Insert(2)).unwrap();
        session.run(Command::Insert(1)).unwrap();
        session.set_step_mode(StepMode::Manual);

        let ticket = session.submit(Command::Search(1)).unwrap();
        for _ in 0..2 {
            assert!(session.wait_until_awaiting(PATIENCE));
            assert!(ticket.try_outcome().is_none());
            assert!(session.advance());
        }
        assert_eq!(
            ticket.wait_timeout(PATIENCE),
            Some(Outcome::Searched(SearchOutcome::Found))
        );
        assert!(!session.is_awaiting());
    }

    #[test]
    fn random_fill_with_seed_is_reproducible() {
        let session = instant_session();
        session.run(Command::SetDiscipline(Discipline::Avl)).unwrap();
        let (keys, ticket) = session.random_fill(15, Some(42)).unwrap();
        ticket.wait().unwrap();

        let mut expected = keys.clone();
        expected.sort_unstable();
        expected.dedup();
        assert_eq!(session.engine().lock_tree().in_order_keys(), expected);
        assert_eq!(keys, fill::random_keys(15, Some(42)));
    }

    #[test]
    fn shutdown_releases_parked_step() {
        let session = instant_session();
        session.run(Command::Insert(1)).unwrap();
        session.set_step_mode(StepMode::Manual);
        let ticket = session.submit(Command::Search(1)).unwrap();
        assert!(session.wait_until_awaiting(PATIENCE));
        let queued = session.submit(Command::Clear).unwrap();

        session.shutdown();
        assert_eq!(ticket.wait().unwrap(), Outcome::Searched(SearchOutcome::Found));
        assert!(matches!(queued.wait(), Err(RuntimeError::SessionClosed)));
    }
}
