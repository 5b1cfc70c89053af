//! Structured events around pattern dispatch
//!
//! Every entry point emits a `dispatch_begin` event with the resolved
//! geometry and a `dispatch_launched` event once the work has been handed
//! to the space. On a synchronous space the launch duration is the work
//! duration; on an asynchronous one it is submission cost only, and
//! completion shows up in the space's own fence events.

use std::time::Instant;

use myriad_backends::{chunk, ExecutionSpace};

use crate::policy::RangePolicy;

/// Chunk size for a dispatch: the policy override, or one derived from the
/// range length and the space's concurrency.
pub(crate) fn resolve_chunk<S: ExecutionSpace>(policy: &RangePolicy<S>) -> usize {
    policy
        .chunk_size()
        .unwrap_or_else(|| chunk::auto_chunk(policy.len(), policy.space().concurrency()))
}

pub(crate) fn dispatch_begin<S: ExecutionSpace>(
    operation: &'static str,
    label: &str,
    policy: &RangePolicy<S>,
    chunk: usize,
) -> Instant {
    tracing::debug!(
        operation = operation,
        label = label,
        space = policy.space().name(),
        begin = policy.begin(),
        end = policy.end(),
        chunk = chunk,
        pieces = chunk::piece_count(policy.len(), chunk),
        "dispatch_begin"
    );
    Instant::now()
}

pub(crate) fn dispatch_launched(
    operation: &'static str,
    label: &str,
    elements: usize,
    started: Instant,
) {
    let duration_us = started.elapsed().as_micros() as u64;
    let elements_per_sec = if duration_us == 0 {
        0.0
    } else {
        elements as f64 * 1_000_000.0 / duration_us as f64
    };
    tracing::debug!(
        operation = operation,
        label = label,
        elements = elements,
        duration_us = duration_us,
        duration_ms = duration_us as f64 / 1000.0,
        elements_per_sec = elements_per_sec,
        "dispatch_launched"
    );
}

/// Fence reason string recorded when a dispatch must block because its
/// result lands in a plain value.
pub(crate) fn value_fence_label(operation: &'static str, label: &str) -> String {
    format!("myriad: {operation} ({label}): result is a value, not a view")
}
