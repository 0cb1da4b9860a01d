//! Happens-before constraints between successive parallel loops.
//!
//! A [`Dependency`] binds the current loop to the task tree of a prior loop.
//! When the scheduler reaches a leaf it asks the dependency for the set of
//! prior nodes whose completion the leaf must observe; the set is computed by
//! descending the prior tree and pruning on range intersection, so a leaf
//! awaits a small covering antichain instead of the whole prior loop.

use crate::{
    loops::LoopRef,
    range::{Point, Range},
    task::TaskNode,
};
use smallvec::SmallVec;
use std::sync::Arc;

/// Covering node sets are almost always tiny (a leaf plus at most one
/// neighbor per side), so they live inline.
pub(crate) type Predecessors<P> = SmallVec<[Arc<TaskNode<P>>; 4]>;

enum Kind<P: Point> {
    NoSync,
    OneOnOne(Arc<TaskNode<P>>),
    Neighborhood(Arc<TaskNode<P>>),
}

/// How the sub-tasks of a loop synchronize on a previous loop.
///
/// Obtained from [`one_on_one`] or [`neighborhood_sync`]; the default is no
/// synchronization. The point type parameter ties a dependency to loops over
/// the same iteration space, so mixing dimensionalities is a compile error.
pub struct Dependency<P: Point> {
    kind: Kind<P>,
}

impl<P: Point> Dependency<P> {
    /// No constraint: iterations of the new loop may run immediately.
    pub fn none() -> Self {
        Self { kind: Kind::NoSync }
    }

    /// The covering set of prior nodes a leaf over `leaf_range` must await.
    pub(crate) fn resolve(&self, leaf_range: &Range<P>) -> Predecessors<P> {
        let mut covering = Predecessors::new();
        match &self.kind {
            Kind::NoSync => {}
            Kind::OneOnOne(prev) => {
                collect(prev, &leaf_range.intersect(&prev.range), &mut covering);
            }
            Kind::Neighborhood(prev) => {
                // Widen the query by one in every dimension; `grow` already
                // clamps it into the prior loop's range.
                collect(prev, &leaf_range.grow(&prev.range, 1), &mut covering);
            }
        }
        covering
    }
}

impl<P: Point> Default for Dependency<P> {
    fn default() -> Self {
        Self::none()
    }
}

/// Requires every point `p` of the new loop that also lies in `prev`'s range
/// to run after the body for `p` in `prev`. Points outside the intersection
/// are unconstrained.
pub fn one_on_one<P: Point>(prev: &LoopRef<P>) -> Dependency<P> {
    Dependency {
        kind: Kind::OneOnOne(prev.root().clone()),
    }
}

/// Requires every point `p` of the new loop to run after the bodies of all
/// points of `prev` within Chebyshev distance 1 of `p` (the 3^D-point
/// neighborhood, clamped to `prev`'s range).
pub fn neighborhood_sync<P: Point>(prev: &LoopRef<P>) -> Dependency<P> {
    Dependency {
        kind: Kind::Neighborhood(prev.root().clone()),
    }
}

/// Descends `node`, pruning subtrees disjoint from `query` and stopping at
/// nodes fully covered by it. Awaiting a covered node suffices for its whole
/// subtree because a node's latch is set only after all descendants signal.
fn collect<P: Point>(
    node: &Arc<TaskNode<P>>,
    query: &Range<P>,
    covering: &mut Predecessors<P>,
) {
    if query.is_empty() || node.range.intersect(query).is_empty() {
        return;
    }
    if query.covers(&node.range) {
        covering.push(node.clone());
        return;
    }
    match &node.children {
        Some((left, right)) => {
            collect(left, query, covering);
            collect(right, query, covering);
        }
        // A leaf that straddles the query boundary is awaited whole.
        None => covering.push(node.clone()),
    }
}
