//! Synchronous single-threaded execution space

use std::ops::Range;

use crate::chunk;
use crate::kernel::{RangeKernel, ReduceKernel, ScanKernel};
use crate::space::ExecutionSpace;

/// Runs every kernel inline on the calling thread, piece by piece in
/// ascending order.
///
/// All work is complete when `execute_*` returns, so `fence` never has
/// anything to wait for. Pieces are still cut with the shared chunk math:
/// a reduction folds one partial per piece and joins partials in piece
/// order, which makes Serial the reference for order-dependent reducers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Serial;

impl Serial {
    /// Create a serial space. Free; `Serial` carries no state.
    pub const fn new() -> Self {
        Serial
    }
}

impl ExecutionSpace for Serial {
    fn name(&self) -> &'static str {
        "Serial"
    }

    fn concurrency(&self) -> usize {
        1
    }

    fn fence(&self, _label: &str) {}

    fn execute_for<K: RangeKernel>(&self, span: Range<usize>, chunk: usize, kernel: K) {
        for p in 0..chunk::piece_count(span.len(), chunk) {
            kernel.run(chunk::piece_span(&span, chunk, p));
        }
    }

    fn execute_reduce<K: ReduceKernel>(
        &self,
        span: Range<usize>,
        chunk: usize,
        kernel: K,
        commit: impl FnOnce(K::Acc) + Send + 'static,
    ) {
        let mut total = kernel.init();
        for p in 0..chunk::piece_count(span.len(), chunk) {
            let mut partial = kernel.init();
            kernel.fold(chunk::piece_span(&span, chunk, p), &mut partial);
            kernel.join(&mut total, partial);
        }
        commit(total);
    }

    fn execute_scan<K: ScanKernel>(
        &self,
        span: Range<usize>,
        chunk: usize,
        kernel: K,
        commit: impl FnOnce(K::Acc) + Send + 'static,
    ) {
        // One final pass; the accumulator threads the prefix across pieces.
        let mut acc = kernel.init();
        for p in 0..chunk::piece_count(span.len(), chunk) {
            kernel.scan(chunk::piece_span(&span, chunk, p), &mut acc, true);
        }
        commit(acc);
    }
}

// ============================================================================
// Tests
// ============================================================================
