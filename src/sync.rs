//! Completion primitives backing task-tree synchronization.
//!
//! A [`Latch`] is the one-shot completion signal of a task node; a [`Gate`]
//! counts a set of latches down and fires a continuation when the last one
//! arrives. Workers are never blocked on either: dependents subscribe a gate
//! and the thread that signals the final latch runs the continuation.
//!
//! Compiled against `loom` primitives when the `loom` feature is enabled so
//! the protocol can be model checked.

use core::mem;
use std::sync::Arc;

#[cfg(feature = "loom")]
mod imp {
    pub(crate) use loom::sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Condvar, Mutex, MutexGuard,
    };

    pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap()
    }
}

#[cfg(not(feature = "loom"))]
mod imp {
    pub(crate) use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    pub(crate) use parking_lot::{Condvar, Mutex, MutexGuard};

    pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock()
    }
}

use imp::{lock, AtomicBool, AtomicUsize, Condvar, Mutex, Ordering};

enum LatchState {
    /// Not yet signaled; holds the gates to notify on completion.
    Open(Vec<Arc<Gate>>),
    Done,
}

/// A monotonic one-shot completion signal.
///
/// Once set, a latch stays set and can be observed any number of times,
/// either by blocking in [`Latch::wait`] or by subscribing a [`Gate`] that
/// is notified exactly once.
pub struct Latch {
    done: AtomicBool,
    state: Mutex<LatchState>,
    waiters: Condvar,
}

impl Latch {
    /// Creates an unset latch.
    pub fn new() -> Self {
        Self {
            done: AtomicBool::new(false),
            state: Mutex::new(LatchState::Open(Vec::new())),
            waiters: Condvar::new(),
        }
    }

    /// Whether the latch has been signaled. An observed `true` acquires all
    /// writes that happened before the corresponding [`Latch::set`].
    #[inline]
    pub fn is_set(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Signals the latch, wakes blocked waiters and notifies subscribed
    /// gates. Signaling an already-set latch is a no-op.
    pub fn set(&self) {
        let previous = {
            let mut state = lock(&self.state);
            let previous = mem::replace(&mut *state, LatchState::Done);
            self.done.store(true, Ordering::Release);
            self.waiters.notify_all();
            previous
        };
        if let LatchState::Open(gates) = previous {
            for gate in gates {
                gate.arrive();
            }
        }
    }

    /// Registers `gate` to receive one arrival when the latch is set. A gate
    /// subscribed to an already-set latch arrives immediately.
    pub fn subscribe(&self, gate: Arc<Gate>) {
        if self.is_set() {
            gate.arrive();
            return;
        }
        {
            let mut state = lock(&self.state);
            if let LatchState::Open(gates) = &mut *state {
                gates.push(gate);
                return;
            }
        }
        // Lost the race against `set`; the gate was not recorded.
        gate.arrive();
    }

    /// Blocks the calling thread until the latch is set. Idempotent; intended
    /// for threads outside the worker pool.
    pub fn wait(&self) {
        if self.is_set() {
            return;
        }
        #[cfg(not(feature = "loom"))]
        {
            let mut state = lock(&self.state);
            while matches!(*state, LatchState::Open(_)) {
                self.waiters.wait(&mut state);
            }
        }
        #[cfg(feature = "loom")]
        {
            let mut state = lock(&self.state);
            while matches!(*state, LatchState::Open(_)) {
                state = self.waiters.wait(state).unwrap();
            }
        }
    }
}

impl Default for Latch {
    fn default() -> Self {
        Self::new()
    }
}

type GateAction = Box<dyn FnOnce() + Send>;

/// A countdown over a set of [`Latch`]es.
///
/// Created with the number of expected arrivals and an action; the arrival
/// that brings the count to zero runs the action. The AcqRel decrement makes
/// every write published by an earlier arrival visible to the action.
pub struct Gate {
    remaining: AtomicUsize,
    action: Mutex<Option<GateAction>>,
}

impl Gate {
    /// Creates a gate expecting `count` arrivals. `count` must be non-zero.
    pub fn new(count: usize, action: impl FnOnce() + Send + 'static) -> Arc<Self> {
        debug_assert!(count > 0, "Gate::new: empty countdown");
        Arc::new(Self {
            remaining: AtomicUsize::new(count),
            action: Mutex::new(Some(Box::new(action))),
        })
    }

    /// Records one arrival; the final arrival runs the action.
    pub fn arrive(&self) {
        if self.remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
            let action = lock(&self.action).take();
            if let Some(action) = action {
                action();
            }
        }
    }
}
