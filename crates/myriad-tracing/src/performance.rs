//! Performance-focused tracing utilities
//!
//! This module provides utilities for performance instrumentation with
//! automatic timing and threshold filtering.
//!
//! ## Example
//!
//! ```rust
//! use myriad_tracing::performance::{record_throughput, PerformanceSpan};
//!
//! // Create a performance span with threshold filtering
//! let span = PerformanceSpan::new("my_dispatch", Some(100));
//! // ... do work ...
//! drop(span); // Logs only if duration > 100μs
//!
//! // Record a dispatch throughput event
//! record_throughput("parallel_reduce", 1024, 100);
//! ```

use std::time::Instant;

use tracing::Level;

/// RAII guard that measures span duration and conditionally logs based on threshold.
///
/// The span is automatically timed when created and logged when dropped, but only
/// if the duration exceeds the optional threshold.
///
/// # Example
///
/// ```rust
/// use myriad_tracing::performance::PerformanceSpan;
///
/// {
///     let _span = PerformanceSpan::new("expensive_operation", Some(1000));
///     // ... operation code ...
/// } // Span logged only if duration > 1000μs
/// ```
pub struct PerformanceSpan {
    _span_name: String,
    threshold_us: Option<u64>,
    start_time: Instant,
    span: tracing::Span,
}

impl PerformanceSpan {
    /// Create a new performance span with optional threshold filtering.
    ///
    /// # Arguments
    ///
    /// * `span_name` - Name of the operation being measured
    /// * `threshold_us` - Minimum duration in microseconds to log (None = always log)
    pub fn new(span_name: impl Into<String>, threshold_us: Option<u64>) -> Self {
        let span_name = span_name.into();
        let span = tracing::debug_span!("perf", name = %span_name);
        let start_time = Instant::now();

        Self {
            _span_name: span_name,
            threshold_us,
            start_time,
            span,
        }
    }

    /// Create a new performance span at the specified tracing level.
    pub fn with_level(level: Level, span_name: impl Into<String>, threshold_us: Option<u64>) -> Self {
        let span_name = span_name.into();
        let span = match level {
            Level::TRACE => tracing::trace_span!("perf", name = %span_name),
            Level::DEBUG => tracing::debug_span!("perf", name = %span_name),
            Level::INFO => tracing::info_span!("perf", name = %span_name),
            Level::WARN => tracing::warn_span!("perf", name = %span_name),
            Level::ERROR => tracing::error_span!("perf", name = %span_name),
        };
        let start_time = Instant::now();

        Self {
            _span_name: span_name,
            threshold_us,
            start_time,
            span,
        }
    }

    /// Get the elapsed time since span creation.
    pub fn elapsed_us(&self) -> u64 {
        self.start_time.elapsed().as_micros() as u64
    }

    /// Enter this span's context.
    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for PerformanceSpan {
    fn drop(&mut self) {
        let elapsed_us = self.elapsed_us();

        // Only log if threshold is None or duration exceeds threshold
        if self.threshold_us.is_none_or(|t| elapsed_us >= t) {
            let _entered = self.span.enter();
            tracing::debug!(
                duration_us = elapsed_us,
                duration_ms = elapsed_us as f64 / 1000.0,
                "performance_span_complete"
            );
        }
    }
}

/// Record an operation throughput event.
///
/// Emits a tracing event for operations with element count, duration, and throughput.
///
/// # Arguments
///
/// * `operation` - Name of the operation
/// * `elements` - Number of elements processed
/// * `duration_us` - Operation time in microseconds
///
/// # Example
///
/// ```rust
/// use myriad_tracing::performance::record_throughput;
///
/// record_throughput("parallel_for", 1024, 100);
/// ```
pub fn record_throughput(operation: &str, elements: usize, duration_us: u64) {
    let elements_per_sec = if duration_us > 0 {
        (elements as f64 / duration_us as f64) * 1_000_000.0
    } else {
        0.0
    };

    tracing::debug!(
        event = "throughput",
        operation = operation,
        elements = elements,
        duration_us = duration_us,
        duration_ms = duration_us as f64 / 1000.0,
        elements_per_sec = elements_per_sec,
        melems_per_sec = elements_per_sec / 1_000_000.0,
        "operation_throughput"
    );
}

/// Record a fence wait with standard format.
///
/// Emits a tracing event describing how long a caller blocked waiting for
/// an execution space to drain.
///
/// # Arguments
///
/// * `space` - Name of the execution space that was fenced
/// * `label` - Caller-supplied fence label
/// * `duration_us` - Time spent blocked in microseconds
///
/// # Example
///
/// ```rust
/// use myriad_tracing::performance::record_fence;
///
/// record_fence("threads", "end_of_timestep", 420);
/// ```
pub fn record_fence(space: &str, label: &str, duration_us: u64) {
    tracing::debug!(
        event = "fence",
        space = space,
        label = label,
        duration_us = duration_us,
        duration_ms = duration_us as f64 / 1000.0,
        "fence_complete"
    );
}
