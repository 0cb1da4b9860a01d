//! The public loop surface: `pfor`, `pfor_with` and the [`LoopRef`] handle.
//!
//! A parallel loop returns immediately with a [`LoopRef`]; execution runs
//! asynchronously on the engine. The reference is the scoped acquisition of
//! the loop's computation: `wait` blocks until the whole tree has finished,
//! and dropping the last reference waits implicitly, so control never leaves
//! a loop's tasks behind.

use crate::{
    dependency::Dependency,
    engine,
    range::{Point, Range},
    scheduler::{self, Body},
    task::{Complete, TaskNode},
};
use core::{
    any::Any,
    sync::atomic::{AtomicBool, Ordering},
};
use std::sync::{Arc, OnceLock};
use thiserror::Error;

/// A loop body panicked.
///
/// Captured per iteration point; the first failure in leaf-completion order
/// is surfaced by [`LoopRef::wait`]. Remaining iterations still run.
#[derive(Debug, Clone, Error)]
#[error("loop body panicked at {point}: {reason}")]
pub struct BodyFailure {
    point: String,
    reason: String,
}

impl BodyFailure {
    pub(crate) fn from_panic<P: Point>(point: &P, payload: &(dyn Any + Send)) -> Self {
        let reason = if let Some(text) = payload.downcast_ref::<&str>() {
            (*text).to_owned()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "opaque panic payload".to_owned()
        };
        Self {
            point: format!("{point:?}"),
            reason,
        }
    }

    /// The iteration point whose body failed, in diagnostic form.
    pub fn point(&self) -> &str {
        &self.point
    }

    /// The panic message, when one was carried.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Shared state of one loop: the tree root plus the joined failure slot.
pub(crate) struct LoopCore<P: Point> {
    root: Arc<TaskNode<P>>,
    failure: OnceLock<BodyFailure>,
    observed: AtomicBool,
}

impl<P: Point> LoopCore<P> {
    pub(crate) fn new(root: Arc<TaskNode<P>>) -> Self {
        Self {
            root,
            failure: OnceLock::new(),
            observed: AtomicBool::new(false),
        }
    }

    pub(crate) fn root(&self) -> &Arc<TaskNode<P>> {
        &self.root
    }

    /// Records the first body failure; later ones are dropped.
    pub(crate) fn record_failure(&self, failure: BodyFailure) {
        tracing::error!(%failure, "loop body panicked");
        let _ = self.failure.set(failure);
    }
}

impl<P: Point> Drop for LoopCore<P> {
    fn drop(&mut self) {
        if !self.root.latch.is_set() {
            tracing::trace!(range = %self.root.range, "implicit wait on dropped loop reference");
            self.root.latch.wait();
        }
        if !self.observed.load(Ordering::Relaxed) {
            if let Some(failure) = self.failure.get() {
                tracing::error!(%failure, "loop failure was never observed through wait()");
            }
        }
    }
}

/// Handle to a running (or finished) parallel loop.
///
/// Cheap to clone; all clones share the same completion. Dependency
/// constructors ([`crate::dependency::one_on_one`],
/// [`crate::dependency::neighborhood_sync`]) borrow a reference to narrow
/// their constraints against this loop's task tree. Dropping the last clone
/// waits for the loop to finish.
pub struct LoopRef<P: Point> {
    core: Arc<LoopCore<P>>,
}

impl<P: Point> Clone for LoopRef<P> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<P: Point> LoopRef<P> {
    pub(crate) fn from_core(core: Arc<LoopCore<P>>) -> Self {
        Self { core }
    }

    pub(crate) fn root(&self) -> &Arc<TaskNode<P>> {
        self.core.root()
    }

    pub(crate) fn completion(&self) -> Arc<dyn Complete> {
        Arc::clone(self.core.root()) as Arc<dyn Complete>
    }

    /// The iteration range of this loop.
    pub fn range(&self) -> Range<P> {
        self.core.root().range
    }

    /// Blocks until every leaf of the loop tree has completed.
    ///
    /// Idempotent: waiting again returns immediately with the same result.
    ///
    /// # Errors
    /// The first [`BodyFailure`] recorded by a leaf, if any body panicked.
    pub fn wait(&self) -> Result<(), BodyFailure> {
        self.core.root().latch.wait();
        self.core.observed.store(true, Ordering::Relaxed);
        match self.core.failure.get() {
            Some(failure) => Err(failure.clone()),
            None => Ok(()),
        }
    }
}

/// Runs `body` for every point of `[from, to)` in parallel.
///
/// Returns immediately; use the returned [`LoopRef`] to wait or to build a
/// dependency for a subsequent loop. Dropping the reference waits.
pub fn pfor<P, F>(from: P, to: P, body: F) -> LoopRef<P>
where
    P: Point,
    F: Fn(P) + Send + Sync + 'static,
{
    pfor_with(from, to, Dependency::none(), body)
}

/// Runs `body` for every point of `[from, to)` in parallel, honoring `dep`
/// against a prior loop.
///
/// Iterations constrained by the dependency start only after the prior
/// loop's corresponding fragments complete; unconstrained iterations start
/// immediately.
pub fn pfor_with<P, F>(from: P, to: P, dep: Dependency<P>, body: F) -> LoopRef<P>
where
    P: Point,
    F: Fn(P) + Send + Sync + 'static,
{
    let body: Body<P> = Arc::new(body);
    scheduler::schedule(engine::global(), Range::new(from, to), body, &dep)
}
