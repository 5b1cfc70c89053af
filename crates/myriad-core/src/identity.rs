//! Reduction identity elements
//!
//! Every reduction starts its accumulators from the operator's neutral
//! element. The tables here are deliberately explicit per type: asking for
//! an operator a type does not support is a missing trait bound, rejected
//! at compile time rather than answered wrongly at runtime.
//!
//! Identity direction follows the reduction, not the operator name: the
//! identity *for a max reduction* is the lowest value the type can hold
//! (nothing compares below it), and the identity for a min reduction is
//! the highest.

use half::{bf16, f16};

/// Additive identity.
pub trait SumIdentity {
    fn sum_identity() -> Self;
}

/// Multiplicative identity.
pub trait ProdIdentity {
    fn prod_identity() -> Self;
}

/// Identities for min and max reductions.
pub trait MinMaxIdentity {
    /// Highest representable value; identity for a min reduction.
    fn min_identity() -> Self;
    /// Lowest representable value; identity for a max reduction.
    fn max_identity() -> Self;
}

/// Identities and truthiness for logical and/or reductions.
///
/// Joins produce `from_predicate(..)`, so integer accumulators come out
/// as exactly 0 or 1 no matter what nonzero values went in.
pub trait LogicalIdentity: Sized {
    fn land_identity() -> Self;
    fn lor_identity() -> Self;
    fn as_predicate(&self) -> bool;
    fn from_predicate(value: bool) -> Self;
}

/// Identities for bitwise and/or reductions.
pub trait BitwiseIdentity {
    /// All bits set; identity for bitwise and.
    fn band_identity() -> Self;
    /// No bits set; identity for bitwise or.
    fn bor_identity() -> Self;
}

// ============================================================================
// Primitive integers
// ============================================================================

macro_rules! integer_identities {
    ($($t:ty),* $(,)?) => {$(
        impl SumIdentity for $t {
            fn sum_identity() -> Self {
                0
            }
        }

        impl ProdIdentity for $t {
            fn prod_identity() -> Self {
                1
            }
        }

        impl MinMaxIdentity for $t {
            fn min_identity() -> Self {
                <$t>::MAX
            }

            fn max_identity() -> Self {
                <$t>::MIN
            }
        }

        impl LogicalIdentity for $t {
            fn land_identity() -> Self {
                1
            }

            fn lor_identity() -> Self {
                0
            }

            fn as_predicate(&self) -> bool {
                *self != 0
            }

            fn from_predicate(value: bool) -> Self {
                value as $t
            }
        }

        impl BitwiseIdentity for $t {
            fn band_identity() -> Self {
                !0
            }

            fn bor_identity() -> Self {
                0
            }
        }
    )*};
}

integer_identities!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

// ============================================================================
// Native floats
// ============================================================================

macro_rules! float_identities {
    ($($t:ty),* $(,)?) => {$(
        impl SumIdentity for $t {
            fn sum_identity() -> Self {
                0.0
            }
        }

        impl ProdIdentity for $t {
            fn prod_identity() -> Self {
                1.0
            }
        }

        impl MinMaxIdentity for $t {
            fn min_identity() -> Self {
                <$t>::MAX
            }

            fn max_identity() -> Self {
                <$t>::MIN
            }
        }
    )*};
}

float_identities!(f32, f64);

// ============================================================================
// Reduced-precision floats
// ============================================================================

// Expressed through the type's own constants; ordinary float literals do
// not coerce to these types.
macro_rules! half_identities {
    ($($t:ty),* $(,)?) => {$(
        impl SumIdentity for $t {
            fn sum_identity() -> Self {
                <$t>::ZERO
            }
        }

        impl ProdIdentity for $t {
            fn prod_identity() -> Self {
                <$t>::ONE
            }
        }

        impl MinMaxIdentity for $t {
            fn min_identity() -> Self {
                <$t>::INFINITY
            }

            fn max_identity() -> Self {
                <$t>::NEG_INFINITY
            }
        }
    )*};
}

half_identities!(f16, bf16);

// ============================================================================
// bool
// ============================================================================

impl LogicalIdentity for bool {
    fn land_identity() -> Self {
        true
    }

    fn lor_identity() -> Self {
        false
    }

    fn as_predicate(&self) -> bool {
        *self
    }

    fn from_predicate(value: bool) -> Self {
        value
    }
}

impl BitwiseIdentity for bool {
    fn band_identity() -> Self {
        true
    }

    fn bor_identity() -> Self {
        false
    }
}

// ============================================================================
// Fixed-size arrays (elementwise accumulators)
// ============================================================================

impl<T: SumIdentity + Copy, const N: usize> SumIdentity for [T; N] {
    fn sum_identity() -> Self {
        [T::sum_identity(); N]
    }
}

impl<T: ProdIdentity + Copy, const N: usize> ProdIdentity for [T; N] {
    fn prod_identity() -> Self {
        [T::prod_identity(); N]
    }
}

// ============================================================================
// Tests
// ============================================================================
