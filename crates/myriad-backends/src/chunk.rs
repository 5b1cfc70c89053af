//! Piece math shared by all execution spaces
//!
//! A dispatch span `[begin, end)` is cut into pieces of at most `chunk`
//! consecutive indices. Piece `k` covers `[begin + k*chunk, ...)`; the last
//! piece may be short. The same math runs on every space so a given span
//! and chunk size always produce the same piece boundaries.

use std::ops::Range;

/// Number of pieces a span of `len` indices splits into.
///
/// Zero-length spans produce zero pieces. `chunk` must be nonzero.
pub fn piece_count(len: usize, chunk: usize) -> usize {
    debug_assert!(chunk > 0, "chunk size must be nonzero");
    len.div_ceil(chunk)
}

/// Half-open index range of piece `index` within `span`.
pub fn piece_span(span: &Range<usize>, chunk: usize, index: usize) -> Range<usize> {
    let begin = span.start + index * chunk;
    // Saturate: begin + chunk can pass usize::MAX on the last piece.
    let end = span.end.min(begin.saturating_add(chunk));
    begin..end
}

/// Chunk size chosen when the caller leaves it unset: a few pieces per
/// worker, with a floor of one index per piece.
pub fn auto_chunk(len: usize, concurrency: usize) -> usize {
    const PIECES_PER_WORKER: usize = 4;
    let pieces = concurrency.max(1) * PIECES_PER_WORKER;
    len.div_ceil(pieces).max(1)
}

// ============================================================================
// Tests
// ============================================================================
