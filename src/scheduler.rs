//! The recursive loop scheduler.
//!
//! `schedule` materializes the task tree for a range, then activates it:
//! every inner node listens on its two children, and every leaf listens on
//! the covering set of prior-loop nodes its dependency resolves to. Leaves
//! whose predecessors have all completed are spawned onto the engine; the
//! rest are spawned by the gate arrival of their last predecessor. Workers
//! therefore never block on a dependency, and an undersized pool cannot
//! deadlock.

use crate::{
    dependency::Dependency,
    engine::Engine,
    loops::{BodyFailure, LoopCore, LoopRef},
    range::{Point, Range},
    sync::Gate,
    task::TaskNode,
};
use std::{
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

/// Loop bodies are shared by every leaf job of the tree.
pub(crate) type Body<P> = Arc<dyn Fn(P) + Send + Sync>;

pub(crate) fn schedule<P: Point>(
    engine: &'static Engine,
    range: Range<P>,
    body: Body<P>,
    dep: &Dependency<P>,
) -> LoopRef<P> {
    tracing::trace!(range = %range, "scheduling parallel loop");
    let root = TaskNode::build(range, engine.grain());
    let core = Arc::new(LoopCore::new(root));
    activate(engine, core.root(), &body, dep, &core);
    LoopRef::from_core(core)
}

fn activate<P: Point>(
    engine: &'static Engine,
    node: &Arc<TaskNode<P>>,
    body: &Body<P>,
    dep: &Dependency<P>,
    core: &Arc<LoopCore<P>>,
) {
    match &node.children {
        Some((left, right)) => {
            // Completion flows bottom-up: the child that signals second sets
            // this node's latch. Arm before activating the children so their
            // latches cannot be set first.
            let gate = Gate::new(2, {
                let node = Arc::clone(node);
                move || node.latch.set()
            });
            left.latch.subscribe(Arc::clone(&gate));
            right.latch.subscribe(gate);
            activate(engine, left, body, dep, core);
            activate(engine, right, body, dep, core);
        }
        None => {
            let predecessors = dep.resolve(&node.range);
            let job = leaf_job(Arc::clone(node), Arc::clone(body), Arc::clone(core));
            if predecessors.is_empty() {
                engine.spawn(job);
            } else {
                let gate = Gate::new(predecessors.len(), move || engine.spawn(job));
                for predecessor in &predecessors {
                    predecessor.latch.subscribe(Arc::clone(&gate));
                }
            }
        }
    }
}

fn leaf_job<P: Point>(
    node: Arc<TaskNode<P>>,
    body: Body<P>,
    core: Arc<LoopCore<P>>,
) -> impl FnOnce() + Send + 'static {
    move || {
        node.range.for_each(|point| {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| body(point)));
            if let Err(payload) = outcome {
                core.record_failure(BodyFailure::from_panic(&point, &*payload));
            }
        });
        // Scoped loops rely on every body clone being gone once the root
        // latch observes completion; release ours before signaling.
        drop(body);
        node.latch.set();
    }
}
