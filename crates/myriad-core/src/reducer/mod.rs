//! Reduction operator strategies and destination binding
//!
//! A reduction is described by two independent pieces:
//!
//! - a [`ReduceOp`]: the identity element plus the binary join, carried as a
//!   value so comparator-bearing operators can hold state
//! - a destination: either a caller scalar (`&mut V`) or a shared
//!   [`ResultView`] handle
//!
//! [`BoundReducer`] ties the two together and is what `parallel_reduce`
//! accepts when the plain-sum default is not wanted. Construction goes
//! through the factory functions at the bottom of this module:
//!
//! ```
//! use myriad_core::reducer;
//!
//! let mut smallest = 0i64;
//! let bound = reducer::min(&mut smallest);
//! assert!(bound.references_scalar());
//! ```
//!
//! Operator families:
//!
//! - [`ops`]: scalar arithmetic, logical, and bitwise joins
//! - [`loc`]: location-tracking joins with their tie-break contracts
//! - [`records`]: the plain-data accumulator types those joins run over

pub mod loc;
pub mod ops;
pub mod records;

use crate::view::ResultView;

pub use loc::{
    FirstLocOp, IsPartitionedOp, LastLocOp, MaxFirstLocByOp, MaxFirstLocOp, MaxLocOp,
    MinFirstLocByOp, MinFirstLocOp, MinLocOp, MinMaxFirstLastLocByOp, MinMaxFirstLastLocOp,
    MinMaxLocOp, MinMaxOp, PartitionPointOp,
};
pub use ops::{ArraySumOp, BAndOp, BOrOp, LAndOp, LOrOp, MaxOp, MinOp, ProdOp, SumOp};
pub use records::{LocIndex, MinMax, MinMaxLoc, PartitionBounds, ValLoc};

// ============================================================================
// Core traits
// ============================================================================

/// Marker for types a reduction can accumulate into. Blanket-implemented;
/// plain-data value types qualify automatically.
pub trait ReduceValue: Copy + Send + Sync + 'static {}

impl<T: Copy + Send + Sync + 'static> ReduceValue for T {}

/// An associative reduction operator: the identity element plus the binary
/// join over [`Self::Value`].
///
/// Operators are carried by value through a dispatch, so implementations
/// must be cheap to clone. The fixed operators are zero-sized; the
/// comparator-bearing ones clone their comparator.
pub trait ReduceOp: Clone + Send + Sync + 'static {
    /// Accumulator type the join runs over.
    type Value: ReduceValue;

    /// The element that leaves any value unchanged under [`join`].
    ///
    /// [`join`]: ReduceOp::join
    fn identity(&self) -> Self::Value;

    /// Folds `src` into `dest`.
    fn join(&self, dest: &mut Self::Value, src: &Self::Value);

    /// Resets `value` to the identity in place.
    fn init(&self, value: &mut Self::Value) {
        *value = self.identity();
    }
}

// ============================================================================
// Destination binding
// ============================================================================

/// Where a bound reduction delivers its result.
pub enum ReduceDest<'t, V> {
    /// Caller-owned scalar, written after the dispatch completes. Reading
    /// it requires the dispatch to fence first.
    Scalar(&'t mut V),
    /// Shared handle the caller polls on its own schedule. No implicit
    /// fence is issued.
    View(ResultView<V>),
}

impl<'t, V> From<&'t mut V> for ReduceDest<'t, V> {
    fn from(slot: &'t mut V) -> Self {
        ReduceDest::Scalar(slot)
    }
}

impl<V> From<ResultView<V>> for ReduceDest<'_, V> {
    fn from(view: ResultView<V>) -> Self {
        ReduceDest::View(view)
    }
}

impl<V> From<&ResultView<V>> for ReduceDest<'_, V> {
    fn from(view: &ResultView<V>) -> Self {
        ReduceDest::View(view.clone())
    }
}

/// A reduction operator bound to its destination.
///
/// This is the argument shape `parallel_reduce` accepts for every
/// non-default reduction. Build one with the factory functions in this
/// module, or with [`custom`] for a hand-written operator.
pub struct BoundReducer<'t, Op: ReduceOp> {
    op: Op,
    dest: ReduceDest<'t, Op::Value>,
}

impl<'t, Op: ReduceOp> BoundReducer<'t, Op> {
    pub fn new(op: Op, dest: impl Into<ReduceDest<'t, Op::Value>>) -> Self {
        Self {
            op,
            dest: dest.into(),
        }
    }

    /// Borrows the operator strategy.
    pub fn op(&self) -> &Op {
        &self.op
    }

    /// True when the destination is a caller scalar, which forces the
    /// dispatch to fence before returning.
    pub fn references_scalar(&self) -> bool {
        matches!(self.dest, ReduceDest::Scalar(_))
    }

    /// The shared result handle, when the destination is view-backed.
    pub fn view(&self) -> Option<ResultView<Op::Value>> {
        match &self.dest {
            ReduceDest::Scalar(_) => None,
            ReduceDest::View(view) => Some(view.clone()),
        }
    }

    pub(crate) fn into_dest(self) -> ReduceDest<'t, Op::Value> {
        self.dest
    }
}

// ============================================================================
// Factory functions
// ============================================================================

/// Binds a hand-written [`ReduceOp`] to a destination.
pub fn custom<'t, Op>(
    op: Op,
    dest: impl Into<ReduceDest<'t, Op::Value>>,
) -> BoundReducer<'t, Op>
where
    Op: ReduceOp,
{
    BoundReducer::new(op, dest)
}

macro_rules! unit_factory {
    ($(#[$meta:meta])* $fn_name:ident, $op:ident) => {
        $(#[$meta])*
        pub fn $fn_name<'t, V>(
            dest: impl Into<ReduceDest<'t, V>>,
        ) -> BoundReducer<'t, ops::$op<V>>
        where
            ops::$op<V>: ReduceOp<Value = V>,
        {
            BoundReducer::new(ops::$op::new(), dest)
        }
    };
}

unit_factory!(
    /// Sum of all contributions.
    sum, SumOp
);
unit_factory!(
    /// Product of all contributions.
    prod, ProdOp
);
unit_factory!(
    /// Smallest contribution.
    min, MinOp
);
unit_factory!(
    /// Largest contribution.
    max, MaxOp
);
unit_factory!(
    /// Logical AND over contributions.
    land, LAndOp
);
unit_factory!(
    /// Logical OR over contributions.
    lor, LOrOp
);
unit_factory!(
    /// Bitwise AND over contributions.
    band, BAndOp
);
unit_factory!(
    /// Bitwise OR over contributions.
    bor, BOrOp
);

/// Elementwise sum over fixed-size array accumulators.
pub fn array_sum<'t, T, const N: usize>(
    dest: impl Into<ReduceDest<'t, [T; N]>>,
) -> BoundReducer<'t, ArraySumOp<T, N>>
where
    ArraySumOp<T, N>: ReduceOp<Value = [T; N]>,
{
    BoundReducer::new(ArraySumOp::new(), dest)
}

macro_rules! val_loc_factory {
    ($(#[$meta:meta])* $fn_name:ident, $op:ident) => {
        $(#[$meta])*
        pub fn $fn_name<'t, T, I>(
            dest: impl Into<ReduceDest<'t, ValLoc<T, I>>>,
        ) -> BoundReducer<'t, loc::$op<T, I>>
        where
            loc::$op<T, I>: ReduceOp<Value = ValLoc<T, I>>,
        {
            BoundReducer::new(loc::$op::new(), dest)
        }
    };
}

val_loc_factory!(
    /// Smallest value with an index; tie location is join-order dependent.
    min_loc, MinLocOp
);
val_loc_factory!(
    /// Largest value with an index; tie location is join-order dependent.
    max_loc, MaxLocOp
);
val_loc_factory!(
    /// Largest value with the lowest index holding it.
    max_first_loc, MaxFirstLocOp
);
val_loc_factory!(
    /// Smallest value with the lowest index holding it.
    min_first_loc, MinFirstLocOp
);

/// Smallest and largest contribution, without locations.
pub fn min_max<'t, T>(dest: impl Into<ReduceDest<'t, MinMax<T>>>) -> BoundReducer<'t, MinMaxOp<T>>
where
    MinMaxOp<T>: ReduceOp<Value = MinMax<T>>,
{
    BoundReducer::new(MinMaxOp::new(), dest)
}

/// Smallest and largest contribution, each with an index; tie locations
/// are join-order dependent.
pub fn min_max_loc<'t, T, I>(
    dest: impl Into<ReduceDest<'t, MinMaxLoc<T, I>>>,
) -> BoundReducer<'t, MinMaxLocOp<T, I>>
where
    MinMaxLocOp<T, I>: ReduceOp<Value = MinMaxLoc<T, I>>,
{
    BoundReducer::new(MinMaxLocOp::new(), dest)
}

/// Smallest value with its first index and largest value with its last
/// index.
pub fn min_max_first_last_loc<'t, T, I>(
    dest: impl Into<ReduceDest<'t, MinMaxLoc<T, I>>>,
) -> BoundReducer<'t, MinMaxFirstLastLocOp<T, I>>
where
    MinMaxFirstLastLocOp<T, I>: ReduceOp<Value = MinMaxLoc<T, I>>,
{
    BoundReducer::new(MinMaxFirstLastLocOp::new(), dest)
}

/// [`max_first_loc`] ordered by a caller-supplied `comp(a, b)` meaning
/// "a ordered before b".
pub fn max_first_loc_by<'t, T, I, C>(
    comp: C,
    dest: impl Into<ReduceDest<'t, ValLoc<T, I>>>,
) -> BoundReducer<'t, MaxFirstLocByOp<T, I, C>>
where
    MaxFirstLocByOp<T, I, C>: ReduceOp<Value = ValLoc<T, I>>,
{
    BoundReducer::new(MaxFirstLocByOp::new(comp), dest)
}

/// [`min_first_loc`] ordered by a caller-supplied comparator.
pub fn min_first_loc_by<'t, T, I, C>(
    comp: C,
    dest: impl Into<ReduceDest<'t, ValLoc<T, I>>>,
) -> BoundReducer<'t, MinFirstLocByOp<T, I, C>>
where
    MinFirstLocByOp<T, I, C>: ReduceOp<Value = ValLoc<T, I>>,
{
    BoundReducer::new(MinFirstLocByOp::new(comp), dest)
}

/// [`min_max_first_last_loc`] ordered by a caller-supplied comparator.
pub fn min_max_first_last_loc_by<'t, T, I, C>(
    comp: C,
    dest: impl Into<ReduceDest<'t, MinMaxLoc<T, I>>>,
) -> BoundReducer<'t, MinMaxFirstLastLocByOp<T, I, C>>
where
    MinMaxFirstLastLocByOp<T, I, C>: ReduceOp<Value = MinMaxLoc<T, I>>,
{
    BoundReducer::new(MinMaxFirstLastLocByOp::new(comp), dest)
}

macro_rules! index_factory {
    ($(#[$meta:meta])* $fn_name:ident, $op:ident, $value:ty) => {
        $(#[$meta])*
        pub fn $fn_name<'t, I>(
            dest: impl Into<ReduceDest<'t, $value>>,
        ) -> BoundReducer<'t, loc::$op<I>>
        where
            loc::$op<I>: ReduceOp<Value = $value>,
        {
            BoundReducer::new(loc::$op::new(), dest)
        }
    };
}

index_factory!(
    /// Lowest contributed index; the functor contributes indices where its
    /// predicate holds.
    first_loc, FirstLocOp, I
);
index_factory!(
    /// Highest contributed index.
    last_loc, LastLocOp, I
);
index_factory!(
    /// Evidence that all predicate-true indices precede all false ones.
    is_partitioned, IsPartitionedOp, PartitionBounds<I>
);
index_factory!(
    /// Lowest index where the predicate fails.
    partition_point, PartitionPointOp, I
);

// ============================================================================
// Tests
// ============================================================================
