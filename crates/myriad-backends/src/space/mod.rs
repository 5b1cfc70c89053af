//! Execution spaces
//!
//! An execution space is an explicit handle to a place where dispatched
//! work runs. Spaces are values with an ordinary lifecycle: construct one,
//! clone handles to share it, drop the last handle to tear it down. There
//! is no ambient global space: anything that needs one receives it through
//! a policy or as an argument.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                myriad-core dispatch                  │
//! │   (policy + functor + reducer → kernel + commit)     │
//! └──────────────────────────┬───────────────────────────┘
//!                            │ execute_for / execute_reduce / execute_scan
//!                            ▼
//! ┌──────────────────────────────────────────────────────┐
//! │                   ExecutionSpace                     │
//! │      name · concurrency · fence · execute_*          │
//! └───────────┬──────────────────────────┬───────────────┘
//!             ▼                          ▼
//!       ┌──────────┐              ┌─────────────┐
//!       │  Serial  │              │   Threads   │
//!       │ (inline) │              │ (queue+pool)│
//!       └──────────┘              └─────────────┘
//! ```
//!
//! # Completion model
//!
//! `execute_*` may return before the submitted work finishes. The only way
//! to observe completion is [`ExecutionSpace::fence`], which blocks until
//! everything previously submitted to that space instance has run to
//! completion (including each job's `commit` callback). `Serial` happens
//! to finish everything inline, which is a legal special case of the same
//! contract.

use std::ops::Range;

use crate::kernel::{RangeKernel, ReduceKernel, ScanKernel};

mod serial;
mod threads;

pub use serial::Serial;
pub use threads::Threads;

/// Space used when a dispatch is handed a bare element count instead of a
/// policy. `Serial` is the one space that needs no setup and carries no
/// shared state, so count promotion stays a pure function of its
/// arguments.
pub type DefaultExecutionSpace = Serial;

/// A place where dispatched work runs.
///
/// Implementations decide how pieces map onto workers; callers only rely
/// on the piece boundaries (see [`crate::chunk`]) and the completion
/// model described at the module level.
///
/// # Example
///
/// ```rust
/// use myriad_backends::{ExecutionSpace, Serial};
///
/// let space = Serial::new();
/// assert_eq!(space.concurrency(), 1);
/// space.fence("nothing outstanding");
/// ```
pub trait ExecutionSpace: Clone + Send + Sync + 'static {
    /// Short space name, used in fence labels and telemetry fields.
    fn name(&self) -> &'static str;

    /// Number of workers that can make progress at once.
    fn concurrency(&self) -> usize;

    /// Block until all work previously submitted to this space instance
    /// has completed. The label is carried into telemetry only.
    fn fence(&self, label: &str);

    /// Run a for-style kernel over `span` in pieces of `chunk` indices.
    fn execute_for<K: RangeKernel>(&self, span: Range<usize>, chunk: usize, kernel: K);

    /// Run a reduction kernel over `span`, then hand the fully joined
    /// accumulator to `commit`. `commit` runs before the submitted work
    /// counts as complete for fencing purposes.
    fn execute_reduce<K: ReduceKernel>(
        &self,
        span: Range<usize>,
        chunk: usize,
        kernel: K,
        commit: impl FnOnce(K::Acc) + Send + 'static,
    );

    /// Run a scan kernel over `span` (two passes when more than one piece
    /// is involved), then hand the grand total to `commit`.
    fn execute_scan<K: ScanKernel>(
        &self,
        span: Range<usize>,
        chunk: usize,
        kernel: K,
        commit: impl FnOnce(K::Acc) + Send + 'static,
    );
}
