//! Return-target classification for `parallel_reduce`
//!
//! The final argument of `parallel_reduce` decides three things at once:
//! which operator runs when none was named, where the result lands, and
//! whether the dispatch must fence before returning. Each accepted shape
//! carries those answers through [`ReduceTarget`]:
//!
//! | target                  | operator        | fence before return      |
//! |-------------------------|-----------------|--------------------------|
//! | `&mut` scalar           | sum             | yes                      |
//! | `&mut [T; N]`           | elementwise sum | yes                      |
//! | [`ResultView`] handle   | sum             | no, caller fences        |
//! | [`BoundReducer`]        | the bound one   | only if scalar-backed    |

use half::{bf16, f16};

use crate::reducer::{ArraySumOp, BoundReducer, ReduceDest, ReduceOp, ReduceValue, SumOp};
use crate::view::ResultView;

/// Which of the accepted target shapes a value is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Scalar,
    Array,
    View,
    Reducer,
}

impl TargetKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            TargetKind::Scalar => "scalar",
            TargetKind::Array => "array",
            TargetKind::View => "view",
            TargetKind::Reducer => "reducer",
        }
    }
}

/// A value that can receive the result of `parallel_reduce`.
///
/// The dispatch calls [`prepare`] to obtain the operator and the slot the
/// final value is committed into, fences the space when [`needs_fence`]
/// says so, then calls [`finish`] to deliver the slot contents to the
/// caller-visible destination.
///
/// Immutable borrows are deliberately not targets; the result has to land
/// somewhere writable:
///
/// ```compile_fail
/// use myriad_core::parallel_reduce;
///
/// let total = 0i64;
/// parallel_reduce(10usize, |i, acc: &mut i64| *acc += i as i64, &total);
/// ```
///
/// [`prepare`]: ReduceTarget::prepare
/// [`needs_fence`]: ReduceTarget::needs_fence
/// [`finish`]: ReduceTarget::finish
pub trait ReduceTarget: Sized {
    /// Accumulator type delivered to this target.
    type Value: ReduceValue;
    /// Operator the dispatch runs.
    type Op: ReduceOp<Value = Self::Value>;

    fn kind(&self) -> TargetKind;

    /// Whether the dispatch must wait for completion before returning.
    fn needs_fence(&self) -> bool;

    /// The operator plus the slot the dispatch commits into.
    fn prepare(&self) -> (Self::Op, ResultView<Self::Value>);

    /// Delivers the committed slot contents to the destination. Runs after
    /// the fence, if one was required.
    fn finish(self, view: &ResultView<Self::Value>);
}

// ============================================================================
// Scalar targets
// ============================================================================

macro_rules! scalar_target {
    ($($t:ty),* $(,)?) => {$(
        impl ReduceTarget for &mut $t {
            type Value = $t;
            type Op = SumOp<$t>;

            fn kind(&self) -> TargetKind {
                TargetKind::Scalar
            }

            fn needs_fence(&self) -> bool {
                true
            }

            fn prepare(&self) -> (SumOp<$t>, ResultView<$t>) {
                let op = SumOp::new();
                let view = ResultView::new(op.identity());
                (op, view)
            }

            fn finish(self, view: &ResultView<$t>) {
                *self = view.get();
            }
        }
    )*};
}

scalar_target!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, f16, bf16);

// ============================================================================
// Array target
// ============================================================================

impl<T, const N: usize> ReduceTarget for &mut [T; N]
where
    T: ReduceValue,
    ArraySumOp<T, N>: ReduceOp<Value = [T; N]>,
{
    type Value = [T; N];
    type Op = ArraySumOp<T, N>;

    fn kind(&self) -> TargetKind {
        TargetKind::Array
    }

    fn needs_fence(&self) -> bool {
        true
    }

    fn prepare(&self) -> (ArraySumOp<T, N>, ResultView<[T; N]>) {
        let op = ArraySumOp::new();
        let view = ResultView::new(op.identity());
        (op, view)
    }

    fn finish(self, view: &ResultView<[T; N]>) {
        *self = view.get();
    }
}

// ============================================================================
// View targets
// ============================================================================

impl<T> ReduceTarget for ResultView<T>
where
    T: ReduceValue,
    SumOp<T>: ReduceOp<Value = T>,
{
    type Value = T;
    type Op = SumOp<T>;

    fn kind(&self) -> TargetKind {
        TargetKind::View
    }

    fn needs_fence(&self) -> bool {
        false
    }

    fn prepare(&self) -> (SumOp<T>, ResultView<T>) {
        (SumOp::new(), self.clone())
    }

    fn finish(self, _view: &ResultView<T>) {}
}

impl<T> ReduceTarget for &ResultView<T>
where
    T: ReduceValue,
    SumOp<T>: ReduceOp<Value = T>,
{
    type Value = T;
    type Op = SumOp<T>;

    fn kind(&self) -> TargetKind {
        TargetKind::View
    }

    fn needs_fence(&self) -> bool {
        false
    }

    fn prepare(&self) -> (SumOp<T>, ResultView<T>) {
        (SumOp::new(), (*self).clone())
    }

    fn finish(self, _view: &ResultView<T>) {}
}

// ============================================================================
// Bound reducer target
// ============================================================================

impl<Op: ReduceOp> ReduceTarget for BoundReducer<'_, Op> {
    type Value = Op::Value;
    type Op = Op;

    fn kind(&self) -> TargetKind {
        TargetKind::Reducer
    }

    fn needs_fence(&self) -> bool {
        self.references_scalar()
    }

    fn prepare(&self) -> (Op, ResultView<Op::Value>) {
        let op = self.op().clone();
        let view = match self.view() {
            Some(view) => view,
            None => ResultView::new(op.identity()),
        };
        (op, view)
    }

    fn finish(self, view: &ResultView<Op::Value>) {
        if let ReduceDest::Scalar(slot) = self.into_dest() {
            *slot = view.get();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
