//! Parallel-for runtime with structured dependency synchronization.
//!
//! This crate executes an indexed body over a multi-dimensional half-open
//! range by recursively subdividing the range into a binary tree of tasks.
//! Successive loops can declare fine-grained happens-before constraints on
//! individual iteration points (or their immediate neighborhoods) of a prior
//! loop; the constraints are resolved against the prior loop's task tree, so
//! a dependent iteration waits only for the fragments whose ranges it
//! actually touches instead of the whole loop at a barrier.
//!
//! Key modules:
//! - `range`: points ([`range::Point`]) and iteration ranges
//!   ([`range::Range`]) with deterministic splitting, intersection, and the
//!   grow/shrink neighborhood algebra.
//! - `dependency`: the [`dependency::one_on_one`] and
//!   [`dependency::neighborhood_sync`] constraints and their resolution to a
//!   covering set of prior task nodes.
//! - `loops`: [`loops::pfor`]/[`loops::pfor_with`] and the [`loops::LoopRef`]
//!   handle with idempotent `wait` and implicit wait-on-drop.
//! - `scope`: structured regions whose loops may borrow caller data,
//!   including in-place parallel iteration over slices.
//! - `engine`: the adapter to the worker pool, configured once per process
//!   via [`engine::init`] and [`config::Config`].
//!
//! Quick start:
//! 1. Start a loop with `pfor(0, n, body)`; keep the returned reference.
//! 2. Chain a second loop with
//!    `pfor_with(0, n, neighborhood_sync(&first), body)`.
//! 3. Call `wait()` on the last reference (or just drop it) to join the
//!    whole chain.
//!
//! Iterations of chained loops start as soon as their own predecessors have
//! finished, which lets the tail of one loop overlap the head of the next
//! while preserving every declared happens-before relation.

/// Tunables for the process-global task engine.
pub mod config;
/// Happens-before constraints between successive loops and their resolution
/// against a prior loop's task tree.
pub mod dependency;
/// The adapter to the external worker pool.
pub mod engine;
/// The public loop surface: `pfor`, `pfor_with`, and loop references.
pub mod loops;
/// Points, axes, and multi-dimensional half-open iteration ranges.
pub mod range;
/// Structured regions for loops over borrowed data.
pub mod scope;

/// Completion primitives (exposed for `loom` model checking only).
#[cfg(feature = "loom")]
pub mod sync;
#[cfg(not(feature = "loom"))]
mod sync;

mod scheduler;
mod task;
