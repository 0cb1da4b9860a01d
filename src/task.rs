use crate::{
    range::{Point, Range},
    sync::Latch,
};
use std::sync::Arc;

/// A node of a loop's task tree.
///
/// Each node is responsible for a sub-range of the iteration space; inner
/// nodes own their two halves, leaves own a range at or below the grain.
/// The tree is built completely before any task runs and is immutable
/// afterwards, so dependency descent from later loops reads it lock-free;
/// only the latches change state.
pub(crate) struct TaskNode<P: Point> {
    pub(crate) range: Range<P>,
    pub(crate) children: Option<(Arc<TaskNode<P>>, Arc<TaskNode<P>>)>,
    /// Signaled once every point of `range` has executed.
    pub(crate) latch: Latch,
}

impl<P: Point> TaskNode<P> {
    /// Recursively subdivides `range` down to `grain` and materializes the
    /// node tree.
    pub(crate) fn build(range: Range<P>, grain: u64) -> Arc<Self> {
        if range.volume() <= grain.max(1) {
            return Arc::new(Self {
                range,
                children: None,
                latch: Latch::new(),
            });
        }
        let (left, right) = range.split();
        debug_assert!(
            !left.is_empty() && !right.is_empty(),
            "TaskNode::build: degenerate split of {range}"
        );
        Arc::new(Self {
            range,
            children: Some((Self::build(left, grain), Self::build(right, grain))),
            latch: Latch::new(),
        })
    }
}

/// Type-erased completion handle; lets a scope await loops over any point
/// type through one pending list.
pub(crate) trait Complete: Send + Sync {
    fn await_done(&self);
}

impl<P: Point> Complete for TaskNode<P> {
    fn await_done(&self) {
        self.latch.wait();
    }
}
