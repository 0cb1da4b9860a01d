use core::fmt;
use num_traits::{NumCast, PrimInt, ToPrimitive};

/// A scalar coordinate type usable as one axis of an iteration space.
///
/// Implemented for every primitive integer. Coordinates are manipulated
/// internally as `i64`; axis values outside that range saturate.
pub trait Axis:
    PrimInt + fmt::Display + fmt::Debug + Send + Sync + 'static
{
}

impl<T> Axis for T where T: PrimInt + fmt::Display + fmt::Debug + Send + Sync + 'static {}

/// A coordinate in the iteration space: a single [`Axis`] scalar (one
/// dimension) or a fixed-length array of scalars (`[A; D]`).
///
/// The dimension count is part of the type, so loops over points of
/// different dimensionality cannot be wired together by mistake.
pub trait Point: Copy + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Number of dimensions of the iteration space.
    const DIM: usize;

    /// The coordinate along `dim`, widened to `i64`.
    fn coord(&self, dim: usize) -> i64;

    /// This point with the coordinate along `dim` replaced by `value`,
    /// saturating at the axis type's bounds.
    fn with_coord(self, dim: usize, value: i64) -> Self;

    /// Serializes the point in its diagnostic form: a bare scalar for one
    /// dimension, `[c0,c1,…]` otherwise.
    fn write_to(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

#[inline]
fn saturating_cast<A: Axis>(value: i64) -> A {
    NumCast::from(value).unwrap_or_else(|| {
        if value < 0 {
            A::min_value()
        } else {
            A::max_value()
        }
    })
}

macro_rules! impl_scalar_point {
    ($($ty:ty),* $(,)?) => {$(
        impl Point for $ty {
            const DIM: usize = 1;

            #[inline]
            fn coord(&self, dim: usize) -> i64 {
                debug_assert_eq!(dim, 0);
                self.to_i64().unwrap_or(i64::MAX)
            }

            #[inline]
            fn with_coord(self, dim: usize, value: i64) -> Self {
                debug_assert_eq!(dim, 0);
                saturating_cast(value)
            }

            fn write_to(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{self}")
            }
        }
    )*};
}

impl_scalar_point!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl<A: Axis, const D: usize> Point for [A; D] {
    const DIM: usize = D;

    #[inline]
    fn coord(&self, dim: usize) -> i64 {
        self[dim].to_i64().unwrap_or(i64::MAX)
    }

    #[inline]
    fn with_coord(mut self, dim: usize, value: i64) -> Self {
        self[dim] = saturating_cast(value);
        self
    }

    fn write_to(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (dim, coord) in self.iter().enumerate() {
            if dim > 0 {
                f.write_str(",")?;
            }
            write!(f, "{coord}")?;
        }
        f.write_str("]")
    }
}

/// A half-open multi-dimensional interval `[from, to)` of [`Point`]s.
///
/// Ranges are immutable values; every operation returns a new range. A range
/// with any zero-width dimension is empty. Construction normalizes inverted
/// dimensions (`to < from`) to empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range<P: Point> {
    from: P,
    to: P,
}

impl<P: Point> Range<P> {
    /// Creates the range `[from, to)`. Dimensions where `to < from` collapse
    /// to `[from, from)` along that dimension, producing an empty range.
    pub fn new(from: P, to: P) -> Self {
        let mut to = to;
        for dim in 0..P::DIM {
            if to.coord(dim) < from.coord(dim) {
                to = to.with_coord(dim, from.coord(dim));
            }
        }
        Self { from, to }
    }

    /// The inclusive lower corner.
    #[inline]
    pub fn from(&self) -> P {
        self.from
    }

    /// The exclusive upper corner.
    #[inline]
    pub fn to(&self) -> P {
        self.to
    }

    /// Width along `dim`.
    #[inline]
    fn width(&self, dim: usize) -> u64 {
        (self.to.coord(dim) - self.from.coord(dim)).max(0) as u64
    }

    /// Number of points in the range: the product of per-dimension widths.
    pub fn volume(&self) -> u64 {
        let mut volume = 1u64;
        for dim in 0..P::DIM {
            volume = volume.saturating_mul(self.width(dim));
        }
        volume
    }

    /// Whether the range contains no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        (0..P::DIM).any(|dim| self.width(dim) == 0)
    }

    /// Bisects the range at the floor midpoint of its widest dimension,
    /// breaking width ties toward the lowest dimension index. The left half
    /// owns the lower indices.
    ///
    /// The choice is deterministic, which keeps the task trees of successive
    /// loops congruent and makes covering-antichain pruning sound. Splitting
    /// a dimension of width 1 yields an empty half; callers must not recurse
    /// into empty halves.
    pub fn split(&self) -> (Self, Self) {
        let mut dim = 0;
        for candidate in 1..P::DIM {
            if self.width(candidate) > self.width(dim) {
                dim = candidate;
            }
        }
        let mid = self.from.coord(dim) + (self.width(dim) / 2) as i64;
        let left = Self {
            from: self.from,
            to: self.to.with_coord(dim, mid),
        };
        let right = Self {
            from: self.from.with_coord(dim, mid),
            to: self.to,
        };
        (left, right)
    }

    /// Component-wise intersection; empty if the ranges are disjoint along
    /// any dimension.
    pub fn intersect(&self, other: &Self) -> Self {
        let mut from = self.from;
        let mut to = self.to;
        for dim in 0..P::DIM {
            from = from.with_coord(dim, self.from.coord(dim).max(other.from.coord(dim)));
            to = to.with_coord(dim, self.to.coord(dim).min(other.to.coord(dim)));
        }
        Self::new(from, to)
    }

    /// Expands the range by `steps` on each side of every dimension, clamped
    /// to `limit`. Repeated application saturates at `limit`, and
    /// `grow(limit, k)` equals `k` applications of `grow(limit, 1)`.
    pub fn grow(&self, limit: &Self, steps: u32) -> Self {
        let steps = <i64 as From<u32>>::from(steps);
        let mut from = self.from;
        let mut to = self.to;
        for dim in 0..P::DIM {
            from = from.with_coord(
                dim,
                (self.from.coord(dim) - steps).max(limit.from.coord(dim)),
            );
            to = to.with_coord(dim, (self.to.coord(dim) + steps).min(limit.to.coord(dim)));
        }
        Self::new(from, to)
    }

    /// Contracts the range by `steps` on each side of every dimension. A
    /// dimension that would invert collapses to the eroded lower bound, so
    /// repeated shrinking keeps walking that bound upward: `[2,3)` shrinks to
    /// `[3,3)`, then to `[4,4)`. `shrink(k)` equals `k` applications of
    /// `shrink(1)`.
    pub fn shrink(&self, steps: u32) -> Self {
        let steps = <i64 as From<u32>>::from(steps);
        let mut from = self.from;
        let mut to = self.to;
        for dim in 0..P::DIM {
            let lower = self.from.coord(dim) + steps;
            from = from.with_coord(dim, lower);
            to = to.with_coord(dim, (self.to.coord(dim) - steps).max(lower));
        }
        Self { from, to }
    }

    /// Whether `point` lies inside the range.
    pub fn contains(&self, point: &P) -> bool {
        (0..P::DIM).all(|dim| {
            let c = point.coord(dim);
            self.from.coord(dim) <= c && c < self.to.coord(dim)
        })
    }

    /// Whether every point of `other` lies inside `self`. Empty ranges are
    /// covered by everything.
    pub fn covers(&self, other: &Self) -> bool {
        other.is_empty()
            || (0..P::DIM).all(|dim| {
                self.from.coord(dim) <= other.from.coord(dim)
                    && other.to.coord(dim) <= self.to.coord(dim)
            })
    }

    /// Invokes `body` for every point of the range in lexicographic order,
    /// dimension 0 slowest.
    pub fn for_each(&self, mut body: impl FnMut(P)) {
        if self.is_empty() {
            return;
        }
        let mut cursor = self.from;
        'points: loop {
            body(cursor);
            // Odometer increment: bump the last dimension, carrying into
            // earlier ones until one stays below its upper bound.
            let mut dim = P::DIM;
            loop {
                if dim == 0 {
                    break 'points;
                }
                dim -= 1;
                let next = cursor.coord(dim) + 1;
                if next < self.to.coord(dim) {
                    cursor = cursor.with_coord(dim, next);
                    break;
                }
                cursor = cursor.with_coord(dim, self.from.coord(dim));
            }
        }
    }
}

impl<P: Point> fmt::Display for Range<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        self.from.write_to(f)?;
        f.write_str(",")?;
        self.to.write_to(f)?;
        f.write_str(")")
    }
}
