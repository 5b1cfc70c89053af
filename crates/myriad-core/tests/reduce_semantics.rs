//! Integration tests for reduction semantics across targets and spaces
//!
//! These tests pin the observable contract of `parallel_reduce`: which
//! value each operator family produces, which location survives a tie, and
//! that none of it changes with the piece count or the execution space.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use myriad_core::reducer::{self, MinMax, MinMaxLoc, PartitionBounds, ValLoc};
use myriad_core::{
    parallel_for, parallel_reduce, parallel_reduce_labeled, parallel_scan, parallel_scan_total,
    ExecutionSpace, RangePolicy, ResultView, Serial, SpaceError, Threads,
};

// ============================================================================
// Canonical location reducers
// ============================================================================

#[test]
fn test_max_first_loc_reports_lowest_index_at_every_piece_count() {
    let data = Arc::new(vec![3i32, 7, 7, 2, 7]);

    // Chunk sizes forcing 1, 2, 3, and 5 pieces over 5 elements.
    for chunk in [5usize, 3, 2, 1] {
        let samples = Arc::clone(&data);
        let mut best = ValLoc::new(0i32, 0usize);
        parallel_reduce(
            RangePolicy::new(Serial::new(), 0, data.len()).with_chunk_size(chunk),
            move |i, acc: &mut ValLoc<i32, usize>| {
                if acc.val < samples[i] {
                    *acc = ValLoc::new(samples[i], i);
                }
            },
            reducer::max_first_loc(&mut best),
        );
        assert_eq!((best.val, best.loc), (7, 1), "chunk size {chunk}");
    }
}

#[test]
fn test_max_first_loc_is_stable_under_threads() -> Result<(), SpaceError> {
    let space = Threads::with_concurrency(3)?;
    let data = Arc::new(vec![3i32, 7, 7, 2, 7]);

    for chunk in [5usize, 2, 1] {
        let samples = Arc::clone(&data);
        let mut best = ValLoc::new(0i32, 0usize);
        parallel_reduce(
            RangePolicy::new(space.clone(), 0, data.len()).with_chunk_size(chunk),
            move |i, acc: &mut ValLoc<i32, usize>| {
                if acc.val < samples[i] {
                    *acc = ValLoc::new(samples[i], i);
                }
            },
            reducer::max_first_loc(&mut best),
        );
        assert_eq!((best.val, best.loc), (7, 1), "chunk size {chunk}");
    }
    Ok(())
}

#[test]
fn test_min_max_first_last_loc_takes_first_min_and_last_max() {
    let data = Arc::new(vec![5i64, 1, 9, 1, 9, 3]);

    for chunk in [6usize, 4, 2, 1] {
        let samples = Arc::clone(&data);
        let mut extrema = MinMaxLoc::new(0i64, 0usize, 0i64, 0usize);
        parallel_reduce(
            RangePolicy::new(Serial::new(), 0, data.len()).with_chunk_size(chunk),
            move |i, acc: &mut MinMaxLoc<i64, usize>| {
                let v = samples[i];
                if v < acc.min_val {
                    acc.min_val = v;
                    acc.min_loc = i;
                }
                // >= keeps the latest in-piece occurrence of the max.
                if v >= acc.max_val {
                    acc.max_val = v;
                    acc.max_loc = i;
                }
            },
            reducer::min_max_first_last_loc(&mut extrema),
        );
        assert_eq!(
            (extrema.min_val, extrema.min_loc, extrema.max_val, extrema.max_loc),
            (1, 1, 9, 4),
            "chunk size {chunk}"
        );
    }
}

#[test]
fn test_min_first_loc_on_threads_with_duplicates() -> Result<(), SpaceError> {
    let space = Threads::with_concurrency(4)?;
    let data = Arc::new(vec![6u32, 2, 8, 2, 9, 2]);
    let samples = Arc::clone(&data);

    let mut lowest = ValLoc::new(0u32, 0usize);
    parallel_reduce(
        RangePolicy::new(space, 0, data.len()).with_chunk_size(1),
        move |i, acc: &mut ValLoc<u32, usize>| {
            if samples[i] < acc.val {
                *acc = ValLoc::new(samples[i], i);
            }
        },
        reducer::min_first_loc(&mut lowest),
    );
    assert_eq!((lowest.val, lowest.loc), (2, 1));
    Ok(())
}

#[test]
fn test_custom_comparator_matches_fixed_ordering() {
    let data = Arc::new(vec![12i32, -7, 30, 30, -7, 18]);

    let samples = Arc::clone(&data);
    let mut fixed = ValLoc::new(0i32, 0usize);
    parallel_reduce(
        RangePolicy::new(Serial::new(), 0, data.len()).with_chunk_size(2),
        move |i, acc: &mut ValLoc<i32, usize>| {
            if acc.val < samples[i] {
                *acc = ValLoc::new(samples[i], i);
            }
        },
        reducer::max_first_loc(&mut fixed),
    );

    let samples = Arc::clone(&data);
    let mut by_comp = ValLoc::new(0i32, 0usize);
    parallel_reduce(
        RangePolicy::new(Serial::new(), 0, data.len()).with_chunk_size(2),
        move |i, acc: &mut ValLoc<i32, usize>| {
            if acc.val < samples[i] {
                *acc = ValLoc::new(samples[i], i);
            }
        },
        reducer::max_first_loc_by(|a: &i32, b: &i32| a < b, &mut by_comp),
    );

    assert_eq!((fixed.val, fixed.loc), (30, 2));
    assert_eq!((by_comp.val, by_comp.loc), (30, 2));
}

// ============================================================================
// Order-dependent location reducers
// ============================================================================

#[test]
fn test_min_loc_value_is_exact_and_location_is_a_real_occurrence() {
    let data = Arc::new(vec![4i32, 1, 7, 1]);
    let samples = Arc::clone(&data);

    let mut lowest = ValLoc::new(0i32, 0usize);
    parallel_reduce(
        RangePolicy::new(Serial::new(), 0, data.len()).with_chunk_size(2),
        move |i, acc: &mut ValLoc<i32, usize>| {
            if samples[i] < acc.val {
                *acc = ValLoc::new(samples[i], i);
            }
        },
        reducer::min_loc(&mut lowest),
    );

    // The serial space joins pieces in order, so the earlier piece's tie
    // location survives.
    assert_eq!(lowest.val, 1);
    assert_eq!(lowest.loc, 1);
}

#[test]
fn test_min_max_tracks_both_extremes() {
    let data = Arc::new(vec![-3i64, 11, 0, -8, 5]);
    let samples = Arc::clone(&data);

    let mut extremes = MinMax::new(0i64, 0i64);
    parallel_reduce(
        RangePolicy::new(Serial::new(), 0, data.len()).with_chunk_size(2),
        move |i, acc: &mut MinMax<i64>| {
            let v = samples[i];
            if v < acc.min_val {
                acc.min_val = v;
            }
            if v > acc.max_val {
                acc.max_val = v;
            }
        },
        reducer::min_max(&mut extremes),
    );
    assert_eq!((extremes.min_val, extremes.max_val), (-8, 11));
}

// ============================================================================
// Arithmetic, logical, bitwise
// ============================================================================

#[test]
fn test_sum_and_prod_against_closed_forms() {
    let mut total = 0u64;
    parallel_reduce(101usize, |i, acc: &mut u64| *acc += i as u64, &mut total);
    assert_eq!(total, 5050);

    let mut factorial = 0u64;
    parallel_reduce(
        RangePolicy::new(Serial::new(), 1, 11).with_chunk_size(3),
        |i, acc: &mut u64| *acc *= i as u64,
        reducer::prod(&mut factorial),
    );
    assert_eq!(factorial, 3_628_800);
}

#[test]
fn test_min_and_max_reducers() {
    let data = Arc::new(vec![0.5f64, -2.25, 8.0, 3.5]);

    let samples = Arc::clone(&data);
    let mut smallest = 0.0f64;
    parallel_reduce(
        data.len(),
        move |i, acc: &mut f64| {
            if samples[i] < *acc {
                *acc = samples[i];
            }
        },
        reducer::min(&mut smallest),
    );
    assert_eq!(smallest, -2.25);

    let samples = Arc::clone(&data);
    let mut largest = 0.0f64;
    parallel_reduce(
        data.len(),
        move |i, acc: &mut f64| {
            if samples[i] > *acc {
                *acc = samples[i];
            }
        },
        reducer::max(&mut largest),
    );
    assert_eq!(largest, 8.0);
}

#[test]
fn test_logical_and_or_over_integer_predicates() {
    let evens = Arc::new(vec![2i32, 4, 6, 8]);
    let samples = Arc::clone(&evens);
    let mut all_even = 0i32;
    parallel_reduce(
        evens.len(),
        move |i, acc: &mut i32| {
            *acc = i32::from(*acc != 0 && samples[i] % 2 == 0);
        },
        reducer::land(&mut all_even),
    );
    assert_eq!(all_even, 1);

    let mixed = Arc::new(vec![1i32, 3, 4, 5]);
    let samples = Arc::clone(&mixed);
    let mut any_even = 0i32;
    parallel_reduce(
        mixed.len(),
        move |i, acc: &mut i32| {
            *acc = i32::from(*acc != 0 || samples[i] % 2 == 0);
        },
        reducer::lor(&mut any_even),
    );
    assert_eq!(any_even, 1);
}

#[test]
fn test_bitwise_and_or_reducers() {
    let masks = Arc::new(vec![0xFF0Fu32, 0x0FFF, 0xFFFF]);

    let samples = Arc::clone(&masks);
    let mut common = 0u32;
    parallel_reduce(
        masks.len(),
        move |i, acc: &mut u32| *acc &= samples[i],
        reducer::band(&mut common),
    );
    assert_eq!(common, 0x0F0F);

    let samples = Arc::clone(&masks);
    let mut seen = 0u32;
    parallel_reduce(
        masks.len(),
        move |i, acc: &mut u32| *acc |= samples[i],
        reducer::bor(&mut seen),
    );
    assert_eq!(seen, 0xFFFF);
}

#[test]
fn test_array_sum_builds_a_histogram() {
    let mut buckets = [0u32; 4];
    parallel_reduce(
        RangePolicy::new(Serial::new(), 0, 100).with_chunk_size(9),
        |i, acc: &mut [u32; 4]| acc[i % 4] += 1,
        &mut buckets,
    );
    assert_eq!(buckets, [25, 25, 25, 25]);
}

// ============================================================================
// Index-only reducers
// ============================================================================

#[test]
fn test_first_loc_and_last_loc_over_a_predicate() {
    let data = Arc::new(vec![1i32, 8, 3, 8, 5]);

    let samples = Arc::clone(&data);
    let mut first = 0usize;
    parallel_reduce(
        RangePolicy::new(Serial::new(), 0, data.len()).with_chunk_size(2),
        move |i, acc: &mut usize| {
            if samples[i] == 8 {
                *acc = (*acc).min(i);
            }
        },
        reducer::first_loc(&mut first),
    );
    assert_eq!(first, 1);

    let samples = Arc::clone(&data);
    let mut last = 0usize;
    parallel_reduce(
        RangePolicy::new(Serial::new(), 0, data.len()).with_chunk_size(2),
        move |i, acc: &mut usize| {
            if samples[i] == 8 {
                *acc = (*acc).max(i);
            }
        },
        reducer::last_loc(&mut last),
    );
    assert_eq!(last, 3);
}

#[test]
fn test_first_loc_without_a_match_leaves_the_sentinel() {
    let mut first = 0usize;
    parallel_reduce(
        8usize,
        |_i, _acc: &mut usize| {},
        reducer::first_loc(&mut first),
    );
    // No contribution: the caller sees the unset sentinel.
    assert_eq!(first, usize::MAX);
}

#[test]
fn test_is_partitioned_and_partition_point() {
    let partitioned = Arc::new(vec![2i32, 4, 6, 1, 3]);
    let samples = Arc::clone(&partitioned);
    let verdict = ResultView::new(PartitionBounds::new(0usize, usize::MAX));
    parallel_reduce(
        RangePolicy::new(Serial::new(), 0, partitioned.len()).with_chunk_size(2),
        move |i, acc: &mut PartitionBounds<usize>| {
            if samples[i] % 2 == 0 {
                acc.max_loc_true = acc.max_loc_true.max(i);
            } else {
                acc.min_loc_false = acc.min_loc_false.min(i);
            }
        },
        reducer::is_partitioned(&verdict),
    );
    assert!(verdict.get().is_partitioned());

    let samples = Arc::clone(&partitioned);
    let mut point = 0usize;
    parallel_reduce(
        RangePolicy::new(Serial::new(), 0, partitioned.len()).with_chunk_size(2),
        move |i, acc: &mut usize| {
            if samples[i] % 2 != 0 {
                *acc = (*acc).min(i);
            }
        },
        reducer::partition_point(&mut point),
    );
    assert_eq!(point, 3);

    let unpartitioned = Arc::new(vec![1i32, 2, 1, 2]);
    let samples = Arc::clone(&unpartitioned);
    let verdict = ResultView::new(PartitionBounds::new(0usize, usize::MAX));
    parallel_reduce(
        unpartitioned.len(),
        move |i, acc: &mut PartitionBounds<usize>| {
            if samples[i] % 2 == 0 {
                acc.max_loc_true = acc.max_loc_true.max(i);
            } else {
                acc.min_loc_false = acc.min_loc_false.min(i);
            }
        },
        reducer::is_partitioned(&verdict),
    );
    assert!(!verdict.get().is_partitioned());
}

// ============================================================================
// Targets, spaces, and edge cases
// ============================================================================

#[test]
fn test_view_target_on_threads_after_explicit_fence() -> Result<(), SpaceError> {
    let space = Threads::with_concurrency(2)?;
    let result = ResultView::new(0u64);

    parallel_reduce_labeled(
        "square_sum",
        RangePolicy::new(space.clone(), 0, 1000).with_chunk_size(64),
        |i, acc: &mut u64| *acc += (i * i) as u64,
        &result,
    );
    space.fence("observe square_sum");

    let expected: u64 = (0..1000u64).map(|i| i * i).sum();
    assert_eq!(result.get(), expected);
    Ok(())
}

#[test]
fn test_view_backed_reducer_on_threads() -> Result<(), SpaceError> {
    let space = Threads::with_concurrency(2)?;
    let data = Arc::new((0..512).map(|i| (i * 7) % 101).collect::<Vec<i64>>());
    let samples = Arc::clone(&data);

    let peak = ResultView::new(ValLoc::new(0i64, 0usize));
    parallel_reduce(
        RangePolicy::new(space.clone(), 0, data.len()).with_chunk_size(32),
        move |i, acc: &mut ValLoc<i64, usize>| {
            if acc.val < samples[i] {
                *acc = ValLoc::new(samples[i], i);
            }
        },
        reducer::max_first_loc(&peak),
    );
    space.fence("observe peak");

    let got = peak.get();
    let want_val = *data.iter().max().unwrap();
    let want_loc = data.iter().position(|v| *v == want_val).unwrap();
    assert_eq!((got.val, got.loc), (want_val, want_loc));
    Ok(())
}

#[test]
fn test_empty_range_yields_identities() {
    let mut total = 123i64;
    parallel_reduce(0usize, |_i, _acc: &mut i64| {}, &mut total);
    assert_eq!(total, 0);

    let mut smallest = -5i32;
    parallel_reduce(
        RangePolicy::new(Serial::new(), 3, 3),
        |_i, _acc: &mut i32| {},
        reducer::min(&mut smallest),
    );
    assert_eq!(smallest, i32::MAX);
}

#[test]
fn test_offset_range_visits_only_its_indices() {
    let mut total = 0usize;
    parallel_reduce(
        RangePolicy::new(Serial::new(), 10, 20),
        |i, acc: &mut usize| *acc += i,
        &mut total,
    );
    assert_eq!(total, (10..20).sum::<usize>());
}

#[test]
fn test_range_ending_at_usize_max_visits_every_index() {
    let mut count = 0usize;
    parallel_reduce(
        RangePolicy::new(Serial::new(), usize::MAX - 10, usize::MAX).with_chunk_size(4),
        |_i, acc: &mut usize| *acc += 1,
        &mut count,
    );
    assert_eq!(count, 10);
}

// ============================================================================
// parallel_for and parallel_scan
// ============================================================================

#[test]
fn test_parallel_for_on_threads_visits_every_index_once() -> Result<(), SpaceError> {
    let space = Threads::with_concurrency(4)?;
    let counters: Arc<Vec<AtomicUsize>> =
        Arc::new((0..200).map(|_| AtomicUsize::new(0)).collect());

    let cells = Arc::clone(&counters);
    parallel_for(
        RangePolicy::new(space.clone(), 0, counters.len()).with_chunk_size(16),
        move |i: usize| {
            cells[i].fetch_add(1, Ordering::Relaxed);
        },
    );
    space.fence("end of fill");

    assert!(counters.iter().all(|c| c.load(Ordering::Relaxed) == 1));
    Ok(())
}

#[test]
fn test_scan_matches_sequential_prefix_on_threads() -> Result<(), SpaceError> {
    let space = Threads::with_concurrency(3)?;
    let data = Arc::new((0..400).map(|i| (i % 13) as i64).collect::<Vec<i64>>());

    let out = Arc::new(parking_lot::Mutex::new(vec![0i64; data.len()]));
    let samples = Arc::clone(&data);
    let sink = Arc::clone(&out);
    parallel_scan(
        RangePolicy::new(space.clone(), 0, data.len()).with_chunk_size(32),
        move |i, acc: &mut i64, is_final| {
            if is_final {
                sink.lock()[i] = *acc;
            }
            *acc += samples[i];
        },
    );
    space.fence("end of scan");

    let mut expected = vec![0i64; data.len()];
    let mut running = 0i64;
    for (i, v) in data.iter().enumerate() {
        expected[i] = running;
        running += v;
    }
    assert_eq!(*out.lock(), expected);
    Ok(())
}

#[test]
fn test_scan_total_blocks_for_scalar_targets() -> Result<(), SpaceError> {
    let space = Threads::with_concurrency(2)?;
    let data = Arc::new((1..=64u64).collect::<Vec<u64>>());
    let samples = Arc::clone(&data);

    let mut total = 0u64;
    parallel_scan_total(
        RangePolicy::new(space, 0, data.len()).with_chunk_size(7),
        move |i, acc: &mut u64, _is_final| *acc += samples[i],
        &mut total,
    );
    // Scalar destination: readable immediately, no explicit fence.
    assert_eq!(total, 64 * 65 / 2);
    Ok(())
}
