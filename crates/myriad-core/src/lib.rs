//! # myriad-core - Parallel Patterns and Reductions
//!
//! Portable `parallel_for` / `parallel_reduce` / `parallel_scan` dispatch
//! over the execution spaces provided by myriad-backends.
//!
//! ## Architecture
//!
//! A dispatch pairs three independent choices and lowers them onto one
//! backend kernel:
//!
//! - **Policy**: which index range, which execution space, what chunking
//!   ([`RangePolicy`], with bare `usize` / `Range<usize>` promotion)
//! - **Body**: the per-index functor, a closure or a named struct
//!   ([`ForFunctor`], [`ReduceFunctor`], [`ScanFunctor`])
//! - **Target**: where a reduction's result lands, which also fixes the
//!   operator and the completion behavior ([`ReduceTarget`])
//!
//! Execution is asynchronous by contract: entry points return once the
//! space has accepted the work. Targets that hand the result back through
//! a plain value fence internally; [`ResultView`] targets leave fencing to
//! the caller.
//!
//! ## Reduction targets
//!
//! | final argument          | operator        | blocks until complete |
//! |-------------------------|-----------------|-----------------------|
//! | `&mut` scalar           | sum             | yes                   |
//! | `&mut [T; N]`           | elementwise sum | yes                   |
//! | [`ResultView`]          | sum             | no                    |
//! | [`reducer`] factory     | the named one   | scalar-backed only    |
//!
//! ## Example
//!
//! ```
//! use myriad_core::reducer::{self, ValLoc};
//! use myriad_core::{parallel_reduce_labeled, RangePolicy, Threads};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), myriad_core::SpaceError> {
//! let space = Threads::with_concurrency(4)?;
//! let data: Arc<Vec<f64>> = Arc::new((0..1024).map(|i| (i as f64).sin()).collect());
//!
//! let samples = Arc::clone(&data);
//! let mut peak = ValLoc::new(0.0f64, 0usize);
//! parallel_reduce_labeled(
//!     "peak_sample",
//!     RangePolicy::new(space, 0, data.len()),
//!     move |i, acc: &mut ValLoc<f64, usize>| {
//!         if acc.val < samples[i] {
//!             *acc = ValLoc::new(samples[i], i);
//!         }
//!     },
//!     reducer::max_first_loc(&mut peak),
//! );
//! // Scalar-backed reducer target: the dispatch fenced before returning.
//! assert!(peak.val > 0.99 && peak.loc < 1024);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`reducer`] - Operator strategies, factories, and accumulator records
//! - [`identity`] - Per-type identity elements the operators build on
//! - [`policy`] - Range policies and promotion
//! - [`target`] - Return-target classification
//! - [`view`] - Shared result handles

pub mod combine;
pub mod dispatch;
pub mod functor;
pub mod identity;
mod instrument;
pub mod policy;
pub mod reducer;
pub mod target;
pub mod view;

// Re-export primary types
pub use combine::CombinedFunctorReducer;
pub use dispatch::{
    parallel_for, parallel_for_labeled, parallel_reduce, parallel_reduce_labeled, parallel_scan,
    parallel_scan_labeled, parallel_scan_total, parallel_scan_total_labeled,
};
pub use functor::{ForFunctor, ReduceFunctor, ScanFunctor};
pub use policy::{IntoRangePolicy, RangePolicy};
pub use reducer::{BoundReducer, ReduceDest, ReduceOp, ReduceValue};
pub use target::{ReduceTarget, TargetKind};
pub use view::ResultView;

// Execution spaces live in myriad-backends; re-exported so typical users
// depend on one crate.
pub use myriad_backends::{DefaultExecutionSpace, ExecutionSpace, Serial, SpaceError, Threads};
