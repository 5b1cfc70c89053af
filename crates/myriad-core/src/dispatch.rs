//! Pattern entry points
//!
//! `parallel_for`, `parallel_reduce`, and `parallel_scan` lower the user's
//! functor (plus operator, for reductions) into the backend kernel shapes
//! and hand them to the policy's execution space. The pipeline is the same
//! for every pattern:
//!
//! 1. promote the policy argument, resolve the chunk size
//! 2. wrap functor and operator into one kernel object
//! 3. submit to the space, which may return before the work runs
//! 4. fence and deliver the result when the target requires it
//!
//! Only step 4 varies, and it is driven entirely by the
//! [`ReduceTarget`] classification of the final argument.

use std::ops::Range;

use myriad_backends::{ExecutionSpace, RangeKernel, ReduceKernel, ScanKernel};

use crate::combine::CombinedFunctorReducer;
use crate::functor::{ForFunctor, ReduceFunctor, ScanFunctor};
use crate::instrument;
use crate::policy::IntoRangePolicy;
use crate::reducer::{ReduceDest, ReduceOp, ReduceValue, SumOp};
use crate::target::ReduceTarget;
use crate::view::ResultView;

// ============================================================================
// Kernel adapters
// ============================================================================

struct ForBody<F> {
    functor: F,
}

impl<F: ForFunctor> RangeKernel for ForBody<F> {
    fn run(&self, piece: Range<usize>) {
        for i in piece {
            self.functor.apply(i);
        }
    }
}

struct ReduceBody<F, Op: ReduceOp> {
    combined: CombinedFunctorReducer<F, Op>,
}

impl<F, Op> ReduceKernel for ReduceBody<F, Op>
where
    Op: ReduceOp,
    F: ReduceFunctor<Op::Value>,
{
    type Acc = Op::Value;

    fn init(&self) -> Op::Value {
        self.combined.reducer().identity()
    }

    fn fold(&self, piece: Range<usize>, acc: &mut Op::Value) {
        for i in piece {
            self.combined.functor().apply(i, acc);
        }
    }

    fn join(&self, dest: &mut Op::Value, src: Op::Value) {
        self.combined.reducer().join(dest, &src);
    }
}

struct ScanBody<F, Op: ReduceOp> {
    combined: CombinedFunctorReducer<F, Op>,
}

impl<F, Op> ScanKernel for ScanBody<F, Op>
where
    Op: ReduceOp,
    F: ScanFunctor<Op::Value>,
{
    type Acc = Op::Value;

    fn init(&self) -> Op::Value {
        self.combined.reducer().identity()
    }

    fn scan(&self, piece: Range<usize>, acc: &mut Op::Value, is_final: bool) {
        for i in piece {
            self.combined.functor().apply(i, acc, is_final);
        }
    }

    fn join(&self, dest: &mut Op::Value, src: Op::Value) {
        self.combined.reducer().join(dest, &src);
    }
}

// ============================================================================
// parallel_for
// ============================================================================

/// Runs `functor` once per index in the policy's range.
///
/// Returns as soon as the space has accepted the work; on an asynchronous
/// space, call `fence` before observing side effects.
pub fn parallel_for<P, F>(policy: P, functor: F)
where
    P: IntoRangePolicy,
    F: ForFunctor,
{
    parallel_for_labeled("parallel_for", policy, functor);
}

/// [`parallel_for`] with a label carried into telemetry.
pub fn parallel_for_labeled<P, F>(label: &str, policy: P, functor: F)
where
    P: IntoRangePolicy,
    F: ForFunctor,
{
    let policy = policy.into_range_policy();
    let chunk = instrument::resolve_chunk(&policy);
    let started = instrument::dispatch_begin("parallel_for", label, &policy, chunk);

    policy
        .space()
        .execute_for(policy.begin()..policy.end(), chunk, ForBody { functor });

    instrument::dispatch_launched("parallel_for", label, policy.len(), started);
}

// ============================================================================
// parallel_reduce
// ============================================================================

/// Folds per-index contributions into `target`.
///
/// The target decides the operator and the completion behavior: plain
/// `&mut` values imply a sum and block until the result is written, a
/// [`ResultView`] implies a sum the caller polls after fencing, and a
/// bound reducer brings its own operator:
///
/// ```
/// use myriad_core::parallel_reduce;
///
/// let data = [3.0f64, 1.0, 4.0, 1.0, 5.0];
/// let mut sum_sq = 0.0f64;
/// parallel_reduce(
///     data.len(),
///     move |i, acc: &mut f64| *acc += data[i] * data[i],
///     &mut sum_sq,
/// );
/// assert_eq!(sum_sq, 52.0);
/// ```
///
/// ```
/// use myriad_core::reducer::{self, ValLoc};
/// use myriad_core::parallel_reduce;
///
/// let data = [3, 7, 7, 2, 7];
/// let mut best = ValLoc::new(0, 0usize);
/// parallel_reduce(
///     data.len(),
///     move |i, acc: &mut ValLoc<i32, usize>| {
///         if acc.val < data[i] {
///             *acc = ValLoc::new(data[i], i);
///         }
///     },
///     reducer::max_first_loc(&mut best),
/// );
/// assert_eq!((best.val, best.loc), (7, 1));
/// ```
pub fn parallel_reduce<P, F, T>(policy: P, functor: F, target: T)
where
    P: IntoRangePolicy,
    T: ReduceTarget,
    F: ReduceFunctor<T::Value>,
{
    parallel_reduce_labeled("parallel_reduce", policy, functor, target);
}

/// [`parallel_reduce`] with a label carried into telemetry.
pub fn parallel_reduce_labeled<P, F, T>(label: &str, policy: P, functor: F, target: T)
where
    P: IntoRangePolicy,
    T: ReduceTarget,
    F: ReduceFunctor<T::Value>,
{
    let policy = policy.into_range_policy();
    let chunk = instrument::resolve_chunk(&policy);
    let started = instrument::dispatch_begin("parallel_reduce", label, &policy, chunk);

    let (op, view) = target.prepare();
    let committed = view.clone();
    policy.space().execute_reduce(
        policy.begin()..policy.end(),
        chunk,
        ReduceBody {
            combined: CombinedFunctorReducer::new(functor, op),
        },
        move |acc| committed.set(acc),
    );

    instrument::dispatch_launched("parallel_reduce", label, policy.len(), started);

    if target.needs_fence() {
        policy
            .space()
            .fence(&instrument::value_fence_label("parallel_reduce", label));
    }
    target.finish(&view);
}

// ============================================================================
// parallel_scan
// ============================================================================

/// Runs an inclusive-or-exclusive prefix pass over the policy's range.
///
/// The functor sees the running prefix in `acc` and must add its own
/// contribution; whether it records `acc` before or after that addition
/// decides exclusive versus inclusive. Output may only be produced when
/// `is_final` is true:
///
/// ```
/// use myriad_core::parallel_scan;
/// use parking_lot::Mutex;
/// use std::sync::Arc;
///
/// let data = [2i64, 3, 5];
/// let out = Arc::new(Mutex::new(vec![0i64; 3]));
/// let sink = Arc::clone(&out);
/// parallel_scan(data.len(), move |i, acc: &mut i64, is_final| {
///     if is_final {
///         sink.lock()[i] = *acc;
///     }
///     *acc += data[i];
/// });
/// assert_eq!(*out.lock(), vec![0, 2, 5]);
/// ```
pub fn parallel_scan<P, F, V>(policy: P, functor: F)
where
    P: IntoRangePolicy,
    F: ScanFunctor<V>,
    V: ReduceValue,
    SumOp<V>: ReduceOp<Value = V>,
{
    parallel_scan_labeled("parallel_scan", policy, functor);
}

/// [`parallel_scan`] with a label carried into telemetry.
pub fn parallel_scan_labeled<P, F, V>(label: &str, policy: P, functor: F)
where
    P: IntoRangePolicy,
    F: ScanFunctor<V>,
    V: ReduceValue,
    SumOp<V>: ReduceOp<Value = V>,
{
    let policy = policy.into_range_policy();
    let chunk = instrument::resolve_chunk(&policy);
    let started = instrument::dispatch_begin("parallel_scan", label, &policy, chunk);

    policy.space().execute_scan(
        policy.begin()..policy.end(),
        chunk,
        ScanBody {
            combined: CombinedFunctorReducer::new(functor, SumOp::new()),
        },
        |_total| {},
    );

    instrument::dispatch_launched("parallel_scan", label, policy.len(), started);
}

/// [`parallel_scan`] that also delivers the grand total, to a `&mut`
/// scalar (blocking) or a [`ResultView`] (caller fences):
///
/// ```
/// use myriad_core::{parallel_scan_total, ResultView};
///
/// let data = [1u64, 2, 3, 4];
/// let total = ResultView::new(0u64);
/// parallel_scan_total(
///     data.len(),
///     move |i, acc: &mut u64, _is_final| *acc += data[i],
///     &total,
/// );
/// // The serial space completes synchronously; fence first elsewhere.
/// assert_eq!(total.get(), 10);
/// ```
pub fn parallel_scan_total<'t, P, F, V>(
    policy: P,
    functor: F,
    total: impl Into<ReduceDest<'t, V>>,
) where
    P: IntoRangePolicy,
    F: ScanFunctor<V>,
    V: ReduceValue,
    SumOp<V>: ReduceOp<Value = V>,
{
    parallel_scan_total_labeled("parallel_scan", policy, functor, total);
}

/// [`parallel_scan_total`] with a label carried into telemetry.
pub fn parallel_scan_total_labeled<'t, P, F, V>(
    label: &str,
    policy: P,
    functor: F,
    total: impl Into<ReduceDest<'t, V>>,
) where
    P: IntoRangePolicy,
    F: ScanFunctor<V>,
    V: ReduceValue,
    SumOp<V>: ReduceOp<Value = V>,
{
    let policy = policy.into_range_policy();
    let chunk = instrument::resolve_chunk(&policy);
    let started = instrument::dispatch_begin("parallel_scan", label, &policy, chunk);

    let op = SumOp::new();
    let dest = total.into();
    let (view, blocking) = match &dest {
        ReduceDest::Scalar(_) => (ResultView::new(op.identity()), true),
        ReduceDest::View(view) => (view.clone(), false),
    };

    let committed = view.clone();
    policy.space().execute_scan(
        policy.begin()..policy.end(),
        chunk,
        ScanBody {
            combined: CombinedFunctorReducer::new(functor, op),
        },
        move |total| committed.set(total),
    );

    instrument::dispatch_launched("parallel_scan", label, policy.len(), started);

    if blocking {
        policy
            .space()
            .fence(&instrument::value_fence_label("parallel_scan", label));
    }
    if let ReduceDest::Scalar(slot) = dest {
        *slot = view.get();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::RangePolicy;
    use crate::reducer;
    use myriad_backends::Serial;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_parallel_for_covers_the_range_once() {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        parallel_for(2..7, move |i| {
            seen.fetch_add(i, Ordering::Relaxed);
        });
        assert_eq!(hits.load(Ordering::Relaxed), 2 + 3 + 4 + 5 + 6);
    }

    #[test]
    fn test_scalar_sum_overwrites_prior_contents() {
        let mut total = 1000i64;
        parallel_reduce(10usize, |i, acc: &mut i64| *acc += i as i64, &mut total);
        assert_eq!(total, 45);
    }

    #[test]
    fn test_empty_range_delivers_the_identity() {
        let mut product = 7i32;
        parallel_reduce(
            0usize,
            |_i, _acc: &mut i32| unreachable!("no indices to visit"),
            reducer::prod(&mut product),
        );
        assert_eq!(product, 1);
    }

    #[test]
    fn test_reducer_target_with_explicit_policy_and_chunk() {
        let data: Vec<i32> = vec![9, -4, 6, -4, 2];
        let mut smallest = 0i32;
        parallel_reduce_labeled(
            "smallest_entry",
            RangePolicy::new(Serial::new(), 0, data.len()).with_chunk_size(2),
            move |i, acc: &mut i32| {
                if data[i] < *acc {
                    *acc = data[i];
                }
            },
            reducer::min(&mut smallest),
        );
        assert_eq!(smallest, -4);
    }

    #[test]
    fn test_scan_total_matches_sequential_sum() {
        let data: Vec<u64> = (1..=20).collect();
        let mut total = 0u64;
        parallel_scan_total(
            data.len(),
            move |i, acc: &mut u64, _is_final| *acc += data[i],
            &mut total,
        );
        assert_eq!(total, 210);
    }

    #[test]
    fn test_view_target_is_committed_synchronously_on_serial() {
        let result = ResultView::new(0usize);
        parallel_reduce(6usize, |_i, acc: &mut usize| *acc += 1, &result);
        assert_eq!(result.get(), 6);
    }

    #[test]
    fn test_scan_total_into_a_view_skips_the_blocking_path() {
        let data: Vec<u32> = (0..16).collect();
        let total = ResultView::new(0u32);
        parallel_scan_total(
            data.len(),
            move |i, acc: &mut u32, _is_final| *acc += data[i],
            &total,
        );
        assert_eq!(total.get(), 120);
    }
}
