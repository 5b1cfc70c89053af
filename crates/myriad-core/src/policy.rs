//! Iteration range and execution-space selection
//!
//! A [`RangePolicy`] names the half-open index span a dispatch covers, the
//! space it runs on, and optionally a chunk size. Bare `usize` and
//! `Range<usize>` arguments promote to a policy over the default space, so
//! the short forms stay short:
//!
//! ```
//! use myriad_core::{parallel_for, RangePolicy, Serial};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let hits = Arc::new(AtomicUsize::new(0));
//! let seen = Arc::clone(&hits);
//! parallel_for(4usize, move |_| {
//!     seen.fetch_add(1, Ordering::Relaxed);
//! });
//! assert_eq!(hits.load(Ordering::Relaxed), 4);
//!
//! let policy = RangePolicy::new(Serial::new(), 2, 10).with_chunk_size(4);
//! assert_eq!(policy.len(), 8);
//! ```

use std::ops::Range;

use myriad_backends::{DefaultExecutionSpace, ExecutionSpace};

/// Half-open index range `[begin, end)` bound to an execution space.
#[derive(Debug, Clone)]
pub struct RangePolicy<S: ExecutionSpace = DefaultExecutionSpace> {
    space: S,
    begin: usize,
    end: usize,
    chunk_size: Option<usize>,
}

impl<S: ExecutionSpace> RangePolicy<S> {
    /// Builds a policy over `[begin, end)`.
    ///
    /// # Panics
    ///
    /// Panics if `begin > end`. An empty range (`begin == end`) is valid
    /// and dispatches no work.
    pub fn new(space: S, begin: usize, end: usize) -> Self {
        assert!(
            begin <= end,
            "range policy bounds are inverted: {begin}..{end}"
        );
        Self {
            space,
            begin,
            end,
            chunk_size: None,
        }
    }

    /// Overrides the per-piece index count. Without this, dispatch picks a
    /// chunk size from the range length and the space concurrency.
    ///
    /// # Panics
    ///
    /// Panics if `chunk` is zero.
    pub fn with_chunk_size(mut self, chunk: usize) -> Self {
        assert!(chunk > 0, "chunk size must be nonzero");
        self.chunk_size = Some(chunk);
        self
    }

    pub fn space(&self) -> &S {
        &self.space
    }

    pub fn begin(&self) -> usize {
        self.begin
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    pub fn chunk_size(&self) -> Option<usize> {
        self.chunk_size
    }
}

/// Argument shapes `parallel_for` and friends accept in policy position.
pub trait IntoRangePolicy {
    type Space: ExecutionSpace;

    fn into_range_policy(self) -> RangePolicy<Self::Space>;
}

impl<S: ExecutionSpace> IntoRangePolicy for RangePolicy<S> {
    type Space = S;

    fn into_range_policy(self) -> RangePolicy<S> {
        self
    }
}

/// `n` promotes to `[0, n)` on the default space.
impl IntoRangePolicy for usize {
    type Space = DefaultExecutionSpace;

    fn into_range_policy(self) -> RangePolicy<DefaultExecutionSpace> {
        RangePolicy::new(DefaultExecutionSpace::new(), 0, self)
    }
}

/// `a..b` promotes to `[a, b)` on the default space.
impl IntoRangePolicy for Range<usize> {
    type Space = DefaultExecutionSpace;

    fn into_range_policy(self) -> RangePolicy<DefaultExecutionSpace> {
        RangePolicy::new(DefaultExecutionSpace::new(), self.start, self.end)
    }
}
