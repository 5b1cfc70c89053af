//! Accumulator records for location-tracking reducers

use std::fmt;

/// Index capability required by location-tracking reducers.
///
/// `min_unset()` is the value a location field holds before any real index
/// has joined a minimum-index accumulation (the highest representable
/// index, so any real index wins); `max_unset()` is its counterpart for
/// maximum-index accumulation. These double as the tie-break sentinels of
/// the order-dependent reducers.
pub trait LocIndex: Copy + PartialEq + PartialOrd + Send + Sync + fmt::Debug + 'static {
    fn min_unset() -> Self;
    fn max_unset() -> Self;
    fn index_min(a: Self, b: Self) -> Self;
    fn index_max(a: Self, b: Self) -> Self;
}

macro_rules! loc_index {
    ($($t:ty),* $(,)?) => {$(
        impl LocIndex for $t {
            fn min_unset() -> Self {
                <$t>::MAX
            }

            fn max_unset() -> Self {
                <$t>::MIN
            }

            fn index_min(a: Self, b: Self) -> Self {
                a.min(b)
            }

            fn index_max(a: Self, b: Self) -> Self {
                a.max(b)
            }
        }
    )*};
}

loc_index!(i32, i64, isize, u32, u64, usize);

/// A value paired with the index it was found at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValLoc<T, I> {
    pub val: T,
    pub loc: I,
}

impl<T, I> ValLoc<T, I> {
    pub const fn new(val: T, loc: I) -> Self {
        Self { val, loc }
    }
}

impl<T: fmt::Display, I: fmt::Display> fmt::Display for ValLoc<T, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.val, self.loc)
    }
}

/// Smallest and largest value seen, tracked together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMax<T> {
    pub min_val: T,
    pub max_val: T,
}

impl<T> MinMax<T> {
    pub const fn new(min_val: T, max_val: T) -> Self {
        Self { min_val, max_val }
    }
}

/// Smallest and largest value seen, each with its index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMaxLoc<T, I> {
    pub min_val: T,
    pub max_val: T,
    pub min_loc: I,
    pub max_loc: I,
}

impl<T, I> MinMaxLoc<T, I> {
    pub const fn new(min_val: T, min_loc: I, max_val: T, max_loc: I) -> Self {
        Self {
            min_val,
            max_val,
            min_loc,
            max_loc,
        }
    }
}

/// Partition evidence: the highest index seen satisfying a predicate and
/// the lowest index seen failing it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionBounds<I> {
    pub max_loc_true: I,
    pub min_loc_false: I,
}

impl<I> PartitionBounds<I> {
    pub const fn new(max_loc_true: I, min_loc_false: I) -> Self {
        Self {
            max_loc_true,
            min_loc_false,
        }
    }
}

impl<I: LocIndex> PartitionBounds<I> {
    /// True when every satisfying index precedes every failing index.
    ///
    /// Holds vacuously when either side is still unset. Signed index
    /// types keep both unset markers outside the valid range; with an
    /// unsigned index the `max_loc_true` marker is index zero itself, so
    /// an all-false input reports not-partitioned.
    pub fn is_partitioned(&self) -> bool {
        self.max_loc_true < self.min_loc_false
    }
}

// ============================================================================
// Tests
// ============================================================================
