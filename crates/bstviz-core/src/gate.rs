// SPDX-License-Identifier: Apache-2.0
//! Step gate: the suspension point between animation steps.
//!
//! [`StepGate::pause`] blocks the calling thread for one step. In
//! [`StepMode::Auto`] the step lasts the requested duration. In
//! [`StepMode::Manual`] the duration is ignored and the call parks until a
//! controller calls [`StepGate::advance`].
//!
//! # Invariants
//!
//! 1. At most one pause is outstanding; the engine serializes operations.
//! 2. `advance()` with nothing parked is a no-op. Permits are never banked.
//! 3. Switching a parked gate to auto releases it immediately.
//!
//! # Example
//!
//! ```
//! use bstviz_core::gate::{PauseOutcome, StepGate, StepMode};
//! use std::time::Duration;
//!
//! let gate = StepGate::new(StepMode::Manual);
//! let controller = gate.clone();
//!
//! let worker = std::thread::spawn(move || gate.pause(Duration::from_secs(60)));
//! assert!(controller.wait_until_awaiting(Duration::from_secs(5)));
//! assert!(controller.advance());
//! assert_eq!(worker.join().unwrap(), PauseOutcome::Advanced);
//! ```

#![forbid(unsafe_code)]

use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use web_time::{Duration, Instant};

use crate::event::{EngineEvent, EventSink};

/// Step length used when a caller has no better duration.
pub const DEFAULT_STEP: Duration = Duration::from_millis(500);

/// How pauses are released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepMode {
    /// Each pause lasts its duration hint.
    #[default]
    Auto,
    /// Each pause waits for an explicit advance.
    Manual,
}

/// Why a pause returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseOutcome {
    /// The auto-mode duration elapsed.
    Elapsed,
    /// A controller advanced a manual step.
    Advanced,
    /// The gate was switched to auto while parked.
    ModeSwitched,
}

/// A cloneable handle to shared step-gate state.
#[derive(Clone)]
pub struct StepGate {
    inner: Arc<GateInner>,
}

struct GateInner {
    state: Mutex<GateState>,
    cvar: Condvar,
}

struct GateState {
    mode: StepMode,
    /// Receives [`EngineEvent::StepReady`] when a pause parks.
    events: EventSink,
    /// A manual pause is parked.
    awaiting: bool,
    /// Set by the controller to release the parked pause.
    release: Option<PauseOutcome>,
}

impl std::fmt::Debug for StepGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("StepGate")
            .field("mode", &state.mode)
            .field("awaiting", &state.awaiting)
            .finish()
    }
}

impl StepGate {
    /// Create a gate in `mode` with no event delivery.
    #[must_use]
    pub fn new(mode: StepMode) -> Self {
        Self::with_events(mode, EventSink::disconnected())
    }

    /// Create a gate that reports [`EngineEvent::StepReady`] to `events`.
    #[must_use]
    pub fn with_events(mode: StepMode, events: EventSink) -> Self {
        Self {
            inner: Arc::new(GateInner {
                state: Mutex::new(GateState {
                    mode,
                    events,
                    awaiting: false,
                    release: None,
                }),
                cvar: Condvar::new(),
            }),
        }
    }

    /// Report parked pauses to `events` from now on, replacing the sink
    /// given at construction. Shared by every clone of this gate.
    pub fn bind_events(&self, events: EventSink) {
        self.lock().events = events;
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> StepMode {
        self.lock().mode
    }

    /// Whether a manual pause is parked and not yet released.
    #[must_use]
    pub fn is_awaiting(&self) -> bool {
        let state = self.lock();
        state.awaiting && state.release.is_none()
    }

    /// Suspend the caller for one step.
    pub fn pause(&self, hint: Duration) -> PauseOutcome {
        let mut state = self.lock();
        if state.mode == StepMode::Auto {
            return self.sleep(state, hint);
        }

        debug_assert!(!state.awaiting, "only one pause may be outstanding");
        state.awaiting = true;
        state.release = None;
        self.inner.cvar.notify_all();
        state.events.emit(EngineEvent::StepReady);
        tracing::trace!("step gate parked");

        loop {
            if let Some(outcome) = state.release.take() {
                state.awaiting = false;
                tracing::trace!(?outcome, "step gate released");
                return outcome;
            }
            state = self
                .inner
                .cvar
                .wait(state)
                .unwrap_or_else(|e| e.into_inner());
        }
    }

    fn sleep(&self, mut state: MutexGuard<'_, GateState>, duration: Duration) -> PauseOutcome {
        if duration.is_zero() {
            return PauseOutcome::Elapsed;
        }
        let start = Instant::now();
        loop {
            let elapsed = start.elapsed();
            if elapsed >= duration {
                return PauseOutcome::Elapsed;
            }
            let (guard, _) = self
                .inner
                .cvar
                .wait_timeout(state, duration - elapsed)
                .unwrap_or_else(|e| e.into_inner());
            state = guard;
        }
    }

    /// Release a parked manual pause. Returns `false` if nothing was parked.
    pub fn advance(&self) -> bool {
        let mut state = self.lock();
        if !state.awaiting || state.release.is_some() {
            return false;
        }
        state.release = Some(PauseOutcome::Advanced);
        self.inner.cvar.notify_all();
        true
    }

    /// Switch modes. Switching to auto releases a parked pause.
    pub fn set_mode(&self, mode: StepMode) {
        let mut state = self.lock();
        if state.mode == mode {
            return;
        }
        tracing::debug!(from = ?state.mode, to = ?mode, "step mode changed");
        state.mode = mode;
        if mode == StepMode::Auto && state.awaiting && state.release.is_none() {
            state.release = Some(PauseOutcome::ModeSwitched);
            self.inner.cvar.notify_all();
        }
    }

    /// Block until a manual pause is parked, or `timeout` passes.
    ///
    /// Returns `true` if a pause is parked.
    pub fn wait_until_awaiting(&self, timeout: Duration) -> bool {
        let start = Instant::now();
        let mut state = self.lock();
        loop {
            if state.awaiting && state.release.is_none() {
                return true;
            }
            let elapsed = start.elapsed();
            if elapsed >= timeout {
                return false;
            }
            let (guard, _) = self
                .inner
                .cvar
                .wait_timeout(state, timeout - elapsed)
                .unwrap_or_else(|e| e.into_inner());
            state = guard;
        }
    }
}

impl Default for StepGate {
    fn default() -> Self {
        Self::new(StepMode::Auto)
    }
}
