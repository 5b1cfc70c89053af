//! Scalar operator strategies
//!
//! Each strategy is a zero-sized type carrying one operator's join and
//! identity. Stateful strategies (custom comparators) live in
//! [`super::loc`].

use std::marker::PhantomData;
use std::ops::{AddAssign, BitAndAssign, BitOrAssign, MulAssign};

use crate::identity::{
    BitwiseIdentity, LogicalIdentity, MinMaxIdentity, ProdIdentity, SumIdentity,
};
use crate::reducer::{ReduceOp, ReduceValue};

macro_rules! unit_op {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name<T>(PhantomData<T>);

        impl<T> $name<T> {
            pub const fn new() -> Self {
                Self(PhantomData)
            }
        }

        impl<T> Default for $name<T> {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

unit_op!(
    /// Additive reduction.
    SumOp
);
unit_op!(
    /// Multiplicative reduction.
    ProdOp
);
unit_op!(
    /// Smallest-value reduction.
    MinOp
);
unit_op!(
    /// Largest-value reduction.
    MaxOp
);
unit_op!(
    /// Logical-and reduction with canonical 0/1 results.
    LAndOp
);
unit_op!(
    /// Logical-or reduction with canonical 0/1 results.
    LOrOp
);
unit_op!(
    /// Bitwise-and reduction.
    BAndOp
);
unit_op!(
    /// Bitwise-or reduction.
    BOrOp
);

impl<T> ReduceOp for SumOp<T>
where
    T: ReduceValue + SumIdentity + AddAssign,
{
    type Value = T;

    fn identity(&self) -> T {
        T::sum_identity()
    }

    fn join(&self, dest: &mut T, src: &T) {
        *dest += *src;
    }
}

impl<T> ReduceOp for ProdOp<T>
where
    T: ReduceValue + ProdIdentity + MulAssign,
{
    type Value = T;

    fn identity(&self) -> T {
        T::prod_identity()
    }

    fn join(&self, dest: &mut T, src: &T) {
        *dest *= *src;
    }
}

impl<T> ReduceOp for MinOp<T>
where
    T: ReduceValue + MinMaxIdentity + PartialOrd,
{
    type Value = T;

    fn identity(&self) -> T {
        T::min_identity()
    }

    fn join(&self, dest: &mut T, src: &T) {
        if *src < *dest {
            *dest = *src;
        }
    }
}

impl<T> ReduceOp for MaxOp<T>
where
    T: ReduceValue + MinMaxIdentity + PartialOrd,
{
    type Value = T;

    fn identity(&self) -> T {
        T::max_identity()
    }

    fn join(&self, dest: &mut T, src: &T) {
        if *src > *dest {
            *dest = *src;
        }
    }
}

impl<T> ReduceOp for LAndOp<T>
where
    T: ReduceValue + LogicalIdentity,
{
    type Value = T;

    fn identity(&self) -> T {
        T::land_identity()
    }

    fn join(&self, dest: &mut T, src: &T) {
        *dest = T::from_predicate(dest.as_predicate() && src.as_predicate());
    }
}

impl<T> ReduceOp for LOrOp<T>
where
    T: ReduceValue + LogicalIdentity,
{
    type Value = T;

    fn identity(&self) -> T {
        T::lor_identity()
    }

    fn join(&self, dest: &mut T, src: &T) {
        *dest = T::from_predicate(dest.as_predicate() || src.as_predicate());
    }
}

impl<T> ReduceOp for BAndOp<T>
where
    T: ReduceValue + BitwiseIdentity + BitAndAssign,
{
    type Value = T;

    fn identity(&self) -> T {
        T::band_identity()
    }

    fn join(&self, dest: &mut T, src: &T) {
        *dest &= *src;
    }
}

impl<T> ReduceOp for BOrOp<T>
where
    T: ReduceValue + BitwiseIdentity + BitOrAssign,
{
    type Value = T;

    fn identity(&self) -> T {
        T::bor_identity()
    }

    fn join(&self, dest: &mut T, src: &T) {
        *dest |= *src;
    }
}

/// Elementwise additive reduction over fixed-size array accumulators.
///
/// Array return targets deduce this strategy; `AddAssign` does not exist
/// for arrays, so the scalar [`SumOp`] cannot cover them.
#[derive(Debug, Clone, Copy)]
pub struct ArraySumOp<T, const N: usize>(PhantomData<T>);

impl<T, const N: usize> ArraySumOp<T, N> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T, const N: usize> Default for ArraySumOp<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> ReduceOp for ArraySumOp<T, N>
where
    T: ReduceValue + SumIdentity + AddAssign,
{
    type Value = [T; N];

    fn identity(&self) -> [T; N] {
        [T::sum_identity(); N]
    }

    fn join(&self, dest: &mut [T; N], src: &[T; N]) {
        for (d, s) in dest.iter_mut().zip(src.iter()) {
            *d += *s;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
