//! Structured regions for loops over borrowed data.
//!
//! [`scope`] opens a region whose loops may capture references to the
//! caller's data, including the in-place container loop
//! [`Scope::pfor_slice`]. The region guarantees, even on unwind, that every
//! loop created inside it has terminated before `scope` returns, so the
//! borrows can never outlive the tasks using them.

use crate::{
    dependency::Dependency,
    engine,
    loops::LoopRef,
    range::{Point, Range},
    scheduler::{self, Body},
    task::Complete,
};
use core::{marker::PhantomData, mem};
use parking_lot::Mutex;
use std::sync::Arc;

/// Opens a structured region and passes its handle to `f`.
///
/// Loops started through the handle may borrow from the environment of the
/// `scope` call. The call returns only after all of them have completed,
/// whether or not their [`LoopRef`]s were waited on, and also when `f`
/// unwinds.
pub fn scope<'env, R>(f: impl FnOnce(&Scope<'env>) -> R) -> R {
    let scope = Scope {
        pending: Mutex::new(Vec::new()),
        _env: PhantomData,
    };
    // The guard drains the pending list even if `f` panics; borrows handed
    // to loop bodies stay valid until then.
    let guard = ScopeGuard { scope: &scope };
    let result = f(&scope);
    drop(guard);
    result
}

/// Handle to a structured region; see [`scope`].
pub struct Scope<'env> {
    pending: Mutex<Vec<Arc<dyn Complete>>>,
    /// Invariant over `'env` so inference cannot shorten the borrows loops
    /// are allowed to capture.
    _env: PhantomData<*mut &'env ()>,
}

struct ScopeGuard<'scope, 'env> {
    scope: &'scope Scope<'env>,
}

impl Drop for ScopeGuard<'_, '_> {
    fn drop(&mut self) {
        loop {
            let next = self.scope.pending.lock().pop();
            match next {
                Some(loop_completion) => loop_completion.await_done(),
                None => break,
            }
        }
    }
}

impl<'env> Scope<'env> {
    /// Like [`crate::loops::pfor`], but the body may borrow from the
    /// environment of the enclosing [`scope`] call.
    pub fn pfor<P, F>(&self, from: P, to: P, body: F) -> LoopRef<P>
    where
        P: Point,
        F: Fn(P) + Send + Sync + 'env,
    {
        self.pfor_with(from, to, Dependency::none(), body)
    }

    /// Like [`crate::loops::pfor_with`], but the body may borrow from the
    /// environment of the enclosing [`scope`] call.
    pub fn pfor_with<P, F>(&self, from: P, to: P, dep: Dependency<P>, body: F) -> LoopRef<P>
    where
        P: Point,
        F: Fn(P) + Send + Sync + 'env,
    {
        let body: Arc<dyn Fn(P) + Send + Sync + 'env> = Arc::new(body);
        // SAFETY: lifetime erasure. Every clone of `body` is dropped by its
        // leaf job before the leaf latch is signaled, the root latch is
        // signaled last, and the guard in `scope` waits on every root before
        // the region (and with it `'env`) ends. No clone can therefore
        // survive past the borrows it captures.
        let body: Body<P> = unsafe {
            mem::transmute::<Arc<dyn Fn(P) + Send + Sync + 'env>, Arc<dyn Fn(P) + Send + Sync>>(
                body,
            )
        };
        let loop_ref = scheduler::schedule(engine::global(), Range::new(from, to), body, &dep);
        self.pending.lock().push(loop_ref.completion());
        loop_ref
    }

    /// Runs `body` on every element of `data` in parallel, in place.
    ///
    /// Internally iterates `[0, data.len())` and hands each task a mutable
    /// reference to its element. The slice stays mutably borrowed for the
    /// rest of the region.
    pub fn pfor_slice<T, F>(&self, data: &'env mut [T], body: F) -> LoopRef<usize>
    where
        T: Send + 'env,
        F: Fn(&mut T) + Send + Sync + 'env,
    {
        self.pfor_slice_with(data, Dependency::none(), body)
    }

    /// [`Scope::pfor_slice`] with a dependency on a prior loop over element
    /// indices.
    ///
    /// Element access is disjoint because every index is visited exactly
    /// once; the runtime makes no safety claim beyond that if bodies reach
    /// into shared state of their own.
    pub fn pfor_slice_with<T, F>(
        &self,
        data: &'env mut [T],
        dep: Dependency<usize>,
        body: F,
    ) -> LoopRef<usize>
    where
        T: Send + 'env,
        F: Fn(&mut T) + Send + Sync + 'env,
    {
        let elements = SlicePtr {
            ptr: data.as_mut_ptr(),
            len: data.len(),
        };
        self.pfor_with(0usize, elements.len, dep, move |index| {
            let elements = elements;
            debug_assert!(index < elements.len);
            // SAFETY: `index` is in bounds and visited exactly once per loop
            // (coverage invariant), so the mutable references handed out are
            // disjoint; the slice borrow outlives the region.
            body(unsafe { &mut *elements.ptr.add(index) })
        })
    }
}

/// Raw view of a slice that individual iteration points index disjointly.
struct SlicePtr<T> {
    ptr: *mut T,
    len: usize,
}

impl<T> Clone for SlicePtr<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SlicePtr<T> {}

// SAFETY: the pointer is dereferenced at a given index by exactly one task,
// which receives `&mut T`; sending that access across threads needs T: Send.
unsafe impl<T: Send> Send for SlicePtr<T> {}
unsafe impl<T: Send> Sync for SlicePtr<T> {}
