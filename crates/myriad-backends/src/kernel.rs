//! Backend-neutral kernel contracts
//!
//! A dispatch in `myriad-core` lowers the user's functor (and, for
//! reductions, the operator strategy) into one of the kernel shapes below
//! before handing it to an execution space. Spaces never see functor or
//! reducer types; these traits are the entire seam between dispatch and
//! execution.
//!
//! All kernels receive half-open index ranges ("pieces") of the overall
//! iteration span. A space may run pieces in any order and on any worker.

use std::ops::Range;

/// A for-style kernel: run the body over one contiguous piece.
pub trait RangeKernel: Send + Sync + 'static {
    /// Run the body for every index in `piece`.
    fn run(&self, piece: Range<usize>);
}

/// A reduction kernel: fold pieces into accumulators and join accumulators.
///
/// `init` must produce the operator's identity and `join` must be
/// associative; a space may fold pieces in any order and join partial
/// results in any grouping.
pub trait ReduceKernel: Send + Sync + 'static {
    /// Accumulator carried per worker and joined across workers.
    type Acc: Send + 'static;

    /// The operator's identity element.
    fn init(&self) -> Self::Acc;

    /// Fold every index in `piece` into `acc`.
    fn fold(&self, piece: Range<usize>, acc: &mut Self::Acc);

    /// Combine a finished partial result into `dest`.
    fn join(&self, dest: &mut Self::Acc, src: Self::Acc);
}

/// A scan kernel: a reduction whose body observes the running prefix.
///
/// Spaces call `scan` with `is_final = false` to learn per-piece totals,
/// then once more with `is_final = true` and `acc` seeded with the piece's
/// exclusive offset. Synchronous single-piece execution may skip straight
/// to the final pass. `Acc` is `Clone` because offsets are replayed.
pub trait ScanKernel: Send + Sync + 'static {
    /// Accumulator carried through the scan.
    type Acc: Clone + Send + 'static;

    /// The combine operator's identity element.
    fn init(&self) -> Self::Acc;

    /// Run the body over `piece`, threading the running prefix through
    /// `acc`. Output must only be produced when `is_final` is true.
    fn scan(&self, piece: Range<usize>, acc: &mut Self::Acc, is_final: bool);

    /// Combine a piece total into `dest` (used to build piece offsets).
    fn join(&self, dest: &mut Self::Acc, src: Self::Acc);
}
