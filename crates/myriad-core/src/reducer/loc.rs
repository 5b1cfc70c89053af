//! Location-tracking operator strategies
//!
//! Two tie-break families live here, and the distinction is contractual:
//!
//! - **MinLoc / MaxLoc / MinMaxLoc** keep the location already held on an
//!   exact value tie, unless that location is still the unset sentinel.
//!   Which location survives therefore depends on the order partials are
//!   joined; only the value is guaranteed.
//! - **MaxFirstLoc / MinFirstLoc / MinMaxFirstLastLoc** (and their `By`
//!   comparator variants) canonicalize on ties (lowest index for "first"
//!   sides, highest index for the "last" side) and so report the same
//!   location under any join order.

use std::fmt;
use std::marker::PhantomData;

use crate::identity::MinMaxIdentity;
use crate::reducer::records::{LocIndex, MinMax, MinMaxLoc, PartitionBounds, ValLoc};
use crate::reducer::{ReduceOp, ReduceValue};

// ============================================================================
// Order-dependent variants
// ============================================================================

/// Smallest value and the index it was found at.
#[derive(Debug, Clone, Copy)]
pub struct MinLocOp<T, I>(PhantomData<(T, I)>);

/// Largest value and the index it was found at.
#[derive(Debug, Clone, Copy)]
pub struct MaxLocOp<T, I>(PhantomData<(T, I)>);

/// Smallest and largest value, tracked together without locations.
#[derive(Debug, Clone, Copy)]
pub struct MinMaxOp<T>(PhantomData<T>);

/// Smallest and largest value, each with an index.
#[derive(Debug, Clone, Copy)]
pub struct MinMaxLocOp<T, I>(PhantomData<(T, I)>);

macro_rules! unit_ctor {
    ($name:ident<$($p:ident),+>) => {
        impl<$($p),+> $name<$($p),+> {
            pub const fn new() -> Self {
                Self(PhantomData)
            }
        }

        impl<$($p),+> Default for $name<$($p),+> {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

unit_ctor!(MinLocOp<T, I>);
unit_ctor!(MaxLocOp<T, I>);
unit_ctor!(MinMaxOp<T>);
unit_ctor!(MinMaxLocOp<T, I>);

impl<T, I> ReduceOp for MinLocOp<T, I>
where
    T: ReduceValue + MinMaxIdentity + PartialOrd,
    I: LocIndex,
{
    type Value = ValLoc<T, I>;

    fn identity(&self) -> ValLoc<T, I> {
        ValLoc::new(T::min_identity(), I::min_unset())
    }

    fn join(&self, dest: &mut ValLoc<T, I>, src: &ValLoc<T, I>) {
        if src.val < dest.val {
            *dest = *src;
        } else if src.val == dest.val && dest.loc == I::min_unset() {
            dest.loc = src.loc;
        }
    }
}

impl<T, I> ReduceOp for MaxLocOp<T, I>
where
    T: ReduceValue + MinMaxIdentity + PartialOrd,
    I: LocIndex,
{
    type Value = ValLoc<T, I>;

    fn identity(&self) -> ValLoc<T, I> {
        ValLoc::new(T::max_identity(), I::min_unset())
    }

    fn join(&self, dest: &mut ValLoc<T, I>, src: &ValLoc<T, I>) {
        if src.val > dest.val {
            *dest = *src;
        } else if src.val == dest.val && dest.loc == I::min_unset() {
            dest.loc = src.loc;
        }
    }
}

impl<T> ReduceOp for MinMaxOp<T>
where
    T: ReduceValue + MinMaxIdentity + PartialOrd,
{
    type Value = MinMax<T>;

    fn identity(&self) -> MinMax<T> {
        MinMax::new(T::min_identity(), T::max_identity())
    }

    fn join(&self, dest: &mut MinMax<T>, src: &MinMax<T>) {
        if src.min_val < dest.min_val {
            dest.min_val = src.min_val;
        }
        if src.max_val > dest.max_val {
            dest.max_val = src.max_val;
        }
    }
}

impl<T, I> ReduceOp for MinMaxLocOp<T, I>
where
    T: ReduceValue + MinMaxIdentity + PartialOrd,
    I: LocIndex,
{
    type Value = MinMaxLoc<T, I>;

    fn identity(&self) -> MinMaxLoc<T, I> {
        MinMaxLoc::new(
            T::min_identity(),
            I::min_unset(),
            T::max_identity(),
            I::min_unset(),
        )
    }

    fn join(&self, dest: &mut MinMaxLoc<T, I>, src: &MinMaxLoc<T, I>) {
        if src.min_val < dest.min_val {
            dest.min_val = src.min_val;
            dest.min_loc = src.min_loc;
        } else if src.min_val == dest.min_val && dest.min_loc == I::min_unset() {
            dest.min_loc = src.min_loc;
        }
        if src.max_val > dest.max_val {
            dest.max_val = src.max_val;
            dest.max_loc = src.max_loc;
        } else if src.max_val == dest.max_val && dest.max_loc == I::min_unset() {
            dest.max_loc = src.max_loc;
        }
    }
}

// ============================================================================
// Canonical (order-independent) variants
// ============================================================================

/// Largest value with the first (lowest) index holding it.
#[derive(Debug, Clone, Copy)]
pub struct MaxFirstLocOp<T, I>(PhantomData<(T, I)>);

/// Smallest value with the first (lowest) index holding it.
#[derive(Debug, Clone, Copy)]
pub struct MinFirstLocOp<T, I>(PhantomData<(T, I)>);

/// Smallest value with its first index and largest value with its last
/// index, tracked together.
#[derive(Debug, Clone, Copy)]
pub struct MinMaxFirstLastLocOp<T, I>(PhantomData<(T, I)>);

unit_ctor!(MaxFirstLocOp<T, I>);
unit_ctor!(MinFirstLocOp<T, I>);
unit_ctor!(MinMaxFirstLastLocOp<T, I>);

impl<T, I> ReduceOp for MaxFirstLocOp<T, I>
where
    T: ReduceValue + MinMaxIdentity + PartialOrd,
    I: LocIndex,
{
    type Value = ValLoc<T, I>;

    fn identity(&self) -> ValLoc<T, I> {
        ValLoc::new(T::max_identity(), I::min_unset())
    }

    fn join(&self, dest: &mut ValLoc<T, I>, src: &ValLoc<T, I>) {
        if dest.val < src.val {
            *dest = *src;
        } else if !(src.val < dest.val) {
            dest.loc = I::index_min(src.loc, dest.loc);
        }
    }
}

impl<T, I> ReduceOp for MinFirstLocOp<T, I>
where
    T: ReduceValue + MinMaxIdentity + PartialOrd,
    I: LocIndex,
{
    type Value = ValLoc<T, I>;

    fn identity(&self) -> ValLoc<T, I> {
        ValLoc::new(T::min_identity(), I::min_unset())
    }

    fn join(&self, dest: &mut ValLoc<T, I>, src: &ValLoc<T, I>) {
        if src.val < dest.val {
            *dest = *src;
        } else if !(dest.val < src.val) {
            dest.loc = I::index_min(src.loc, dest.loc);
        }
    }
}

impl<T, I> ReduceOp for MinMaxFirstLastLocOp<T, I>
where
    T: ReduceValue + MinMaxIdentity + PartialOrd,
    I: LocIndex,
{
    type Value = MinMaxLoc<T, I>;

    fn identity(&self) -> MinMaxLoc<T, I> {
        MinMaxLoc::new(
            T::min_identity(),
            I::min_unset(),
            T::max_identity(),
            I::max_unset(),
        )
    }

    fn join(&self, dest: &mut MinMaxLoc<T, I>, src: &MinMaxLoc<T, I>) {
        if src.min_val < dest.min_val {
            dest.min_val = src.min_val;
            dest.min_loc = src.min_loc;
        } else if !(dest.min_val < src.min_val) {
            dest.min_loc = I::index_min(src.min_loc, dest.min_loc);
        }
        if dest.max_val < src.max_val {
            dest.max_val = src.max_val;
            dest.max_loc = src.max_loc;
        } else if !(src.max_val < dest.max_val) {
            dest.max_loc = I::index_max(src.max_loc, dest.max_loc);
        }
    }
}

// ============================================================================
// Custom-comparator variants
// ============================================================================

/// [`MaxFirstLocOp`] ordering by a caller-supplied `comp(a, b)` meaning
/// "a ordered before b". The comparator is owned by value and lives for
/// one dispatch.
#[derive(Clone)]
pub struct MaxFirstLocByOp<T, I, C> {
    comp: C,
    _marker: PhantomData<(T, I)>,
}

/// [`MinFirstLocOp`] with a caller-supplied ordering.
#[derive(Clone)]
pub struct MinFirstLocByOp<T, I, C> {
    comp: C,
    _marker: PhantomData<(T, I)>,
}

/// [`MinMaxFirstLastLocOp`] with a caller-supplied ordering.
#[derive(Clone)]
pub struct MinMaxFirstLastLocByOp<T, I, C> {
    comp: C,
    _marker: PhantomData<(T, I)>,
}

macro_rules! by_ctor {
    ($name:ident) => {
        impl<T, I, C> $name<T, I, C> {
            pub fn new(comp: C) -> Self {
                Self {
                    comp,
                    _marker: PhantomData,
                }
            }
        }

        impl<T, I, C> fmt::Debug for $name<T, I, C> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(stringify!($name))
            }
        }
    };
}

by_ctor!(MaxFirstLocByOp);
by_ctor!(MinFirstLocByOp);
by_ctor!(MinMaxFirstLastLocByOp);

impl<T, I, C> ReduceOp for MaxFirstLocByOp<T, I, C>
where
    T: ReduceValue + MinMaxIdentity,
    I: LocIndex,
    C: Fn(&T, &T) -> bool + Clone + Send + Sync + 'static,
{
    type Value = ValLoc<T, I>;

    fn identity(&self) -> ValLoc<T, I> {
        ValLoc::new(T::max_identity(), I::min_unset())
    }

    fn join(&self, dest: &mut ValLoc<T, I>, src: &ValLoc<T, I>) {
        if (self.comp)(&dest.val, &src.val) {
            *dest = *src;
        } else if !(self.comp)(&src.val, &dest.val) {
            dest.loc = I::index_min(src.loc, dest.loc);
        }
    }
}

impl<T, I, C> ReduceOp for MinFirstLocByOp<T, I, C>
where
    T: ReduceValue + MinMaxIdentity,
    I: LocIndex,
    C: Fn(&T, &T) -> bool + Clone + Send + Sync + 'static,
{
    type Value = ValLoc<T, I>;

    fn identity(&self) -> ValLoc<T, I> {
        ValLoc::new(T::min_identity(), I::min_unset())
    }

    fn join(&self, dest: &mut ValLoc<T, I>, src: &ValLoc<T, I>) {
        if (self.comp)(&src.val, &dest.val) {
            *dest = *src;
        } else if !(self.comp)(&dest.val, &src.val) {
            dest.loc = I::index_min(src.loc, dest.loc);
        }
    }
}

impl<T, I, C> ReduceOp for MinMaxFirstLastLocByOp<T, I, C>
where
    T: ReduceValue + MinMaxIdentity,
    I: LocIndex,
    C: Fn(&T, &T) -> bool + Clone + Send + Sync + 'static,
{
    type Value = MinMaxLoc<T, I>;

    fn identity(&self) -> MinMaxLoc<T, I> {
        MinMaxLoc::new(
            T::min_identity(),
            I::min_unset(),
            T::max_identity(),
            I::max_unset(),
        )
    }

    fn join(&self, dest: &mut MinMaxLoc<T, I>, src: &MinMaxLoc<T, I>) {
        if (self.comp)(&src.min_val, &dest.min_val) {
            dest.min_val = src.min_val;
            dest.min_loc = src.min_loc;
        } else if !(self.comp)(&dest.min_val, &src.min_val) {
            dest.min_loc = I::index_min(src.min_loc, dest.min_loc);
        }
        if (self.comp)(&dest.max_val, &src.max_val) {
            dest.max_val = src.max_val;
            dest.max_loc = src.max_loc;
        } else if !(self.comp)(&src.max_val, &dest.max_val) {
            dest.max_loc = I::index_max(src.max_loc, dest.max_loc);
        }
    }
}

// ============================================================================
// Index-only variants
// ============================================================================

/// Lowest index satisfying an external predicate; the functor contributes
/// indices, the join keeps the minimum.
#[derive(Debug, Clone, Copy)]
pub struct FirstLocOp<I>(PhantomData<I>);

/// Highest index satisfying an external predicate.
#[derive(Debug, Clone, Copy)]
pub struct LastLocOp<I>(PhantomData<I>);

/// Partition evidence accumulator backing `is_partitioned`.
#[derive(Debug, Clone, Copy)]
pub struct IsPartitionedOp<I>(PhantomData<I>);

/// Lowest index failing the predicate; backs `partition_point`.
#[derive(Debug, Clone, Copy)]
pub struct PartitionPointOp<I>(PhantomData<I>);

unit_ctor!(FirstLocOp<I>);
unit_ctor!(LastLocOp<I>);
unit_ctor!(IsPartitionedOp<I>);
unit_ctor!(PartitionPointOp<I>);

impl<I: LocIndex> ReduceOp for FirstLocOp<I> {
    type Value = I;

    fn identity(&self) -> I {
        I::min_unset()
    }

    fn join(&self, dest: &mut I, src: &I) {
        *dest = I::index_min(*src, *dest);
    }
}

impl<I: LocIndex> ReduceOp for LastLocOp<I> {
    type Value = I;

    fn identity(&self) -> I {
        I::max_unset()
    }

    fn join(&self, dest: &mut I, src: &I) {
        *dest = I::index_max(*src, *dest);
    }
}

impl<I: LocIndex> ReduceOp for IsPartitionedOp<I> {
    type Value = PartitionBounds<I>;

    fn identity(&self) -> PartitionBounds<I> {
        PartitionBounds::new(I::max_unset(), I::min_unset())
    }

    fn join(&self, dest: &mut PartitionBounds<I>, src: &PartitionBounds<I>) {
        dest.max_loc_true = I::index_max(src.max_loc_true, dest.max_loc_true);
        dest.min_loc_false = I::index_min(src.min_loc_false, dest.min_loc_false);
    }
}

impl<I: LocIndex> ReduceOp for PartitionPointOp<I> {
    type Value = I;

    fn identity(&self) -> I {
        I::min_unset()
    }

    fn join(&self, dest: &mut I, src: &I) {
        *dest = I::index_min(*src, *dest);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_loc_tie_keeps_existing_location() {
        let op = MinLocOp::<i32, usize>::new();
        let mut dest = ValLoc::new(4, 9usize);
        op.join(&mut dest, &ValLoc::new(4, 2));
        assert_eq!(dest, ValLoc::new(4, 9));
    }

    #[test]
    fn test_min_loc_tie_fills_unset_sentinel() {
        let op = MinLocOp::<i32, usize>::new();
        let mut dest = ValLoc::new(4, usize::min_unset());
        op.join(&mut dest, &ValLoc::new(4, 2));
        assert_eq!(dest, ValLoc::new(4, 2));
    }

    #[test]
    fn test_max_loc_improvement_replaces_both_fields() {
        let op = MaxLocOp::<i32, usize>::new();
        let mut dest = op.identity();
        op.join(&mut dest, &ValLoc::new(5, 3));
        op.join(&mut dest, &ValLoc::new(9, 7));
        op.join(&mut dest, &ValLoc::new(6, 1));
        assert_eq!(dest, ValLoc::new(9, 7));
    }

    #[test]
    fn test_max_first_loc_tie_is_order_independent() {
        let op = MaxFirstLocOp::<i32, usize>::new();
        let a = ValLoc::new(7, 1usize);
        let b = ValLoc::new(7, 4usize);

        let mut ab = a;
        op.join(&mut ab, &b);
        let mut ba = b;
        op.join(&mut ba, &a);
        assert_eq!(ab, ValLoc::new(7, 1));
        assert_eq!(ba, ValLoc::new(7, 1));
    }

    #[test]
    fn test_min_max_first_last_loc_takes_first_min_last_max() {
        let op = MinMaxFirstLastLocOp::<i32, usize>::new();
        // Pieces of [5, 1, 9] and [1, 9, 3].
        let left = MinMaxLoc::new(1, 1usize, 9, 2usize);
        let right = MinMaxLoc::new(1, 3usize, 9, 4usize);

        let mut lr = left;
        op.join(&mut lr, &right);
        let mut rl = right;
        op.join(&mut rl, &left);
        assert_eq!(lr, MinMaxLoc::new(1, 1, 9, 4));
        assert_eq!(rl, MinMaxLoc::new(1, 1, 9, 4));
    }

    #[test]
    fn test_custom_comparator_matches_fixed_on_less_than() {
        let fixed = MaxFirstLocOp::<i32, usize>::new();
        let by = MaxFirstLocByOp::<i32, usize, _>::new(|a: &i32, b: &i32| a < b);

        let partials = [
            ValLoc::new(3, 0usize),
            ValLoc::new(7, 1),
            ValLoc::new(7, 4),
            ValLoc::new(2, 3),
        ];
        let mut want = fixed.identity();
        let mut got = by.identity();
        for p in &partials {
            fixed.join(&mut want, p);
            by.join(&mut got, p);
        }
        assert_eq!(want, got);
    }

    #[test]
    fn test_first_and_last_loc() {
        let first = FirstLocOp::<usize>::new();
        let mut lo = first.identity();
        for i in [9usize, 3, 11] {
            first.join(&mut lo, &i);
        }
        assert_eq!(lo, 3);

        let last = LastLocOp::<usize>::new();
        let mut hi = last.identity();
        for i in [9usize, 3, 11] {
            last.join(&mut hi, &i);
        }
        assert_eq!(hi, 11);
    }

    #[test]
    fn test_partition_ops() {
        let op = IsPartitionedOp::<usize>::new();
        let mut acc = op.identity();
        // true at 0 and 1, false at 2 and 3.
        op.join(&mut acc, &PartitionBounds::new(1, usize::min_unset()));
        op.join(&mut acc, &PartitionBounds::new(usize::max_unset(), 2));
        assert!(acc.is_partitioned());

        let pp = PartitionPointOp::<usize>::new();
        let mut point = pp.identity();
        pp.join(&mut point, &5);
        pp.join(&mut point, &2);
        assert_eq!(point, 2);
    }
}
