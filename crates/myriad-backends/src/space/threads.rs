//! Host thread-pool execution space with asynchronous submission
//!
//! # Architecture
//!
//! ```text
//! caller ──execute_*──▶ submission queue ──▶ submit worker (1 thread)
//!                            │                     │ runs jobs FIFO
//!        fence: wait until   │                     ▼
//!        queue empty and ◀───┘              rayon ThreadPool
//!        nothing in flight                  (piece-level parallelism)
//! ```
//!
//! `execute_*` enqueues a job and returns immediately; the submit worker
//! runs jobs one at a time in submission order, farming pieces out to the
//! rayon pool inside each job. `fence` blocks the caller until the queue
//! is drained and the in-flight job (if any) has finished, including its
//! `commit` callback. Dropping the last handle shuts the worker down after
//! draining whatever was already queued.

use std::collections::VecDeque;
use std::ops::Range;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use myriad_tracing::perf_span;
use parking_lot::{Condvar, Mutex};
use rayon::prelude::*;

use crate::chunk;
use crate::error::{Result, SpaceError};
use crate::kernel::{RangeKernel, ReduceKernel, ScanKernel};
use crate::space::ExecutionSpace;

type Job = Box<dyn FnOnce() + Send + 'static>;

struct QueueState {
    jobs: VecDeque<Job>,
    in_flight: usize,
    shutdown: bool,
}

struct Shared {
    state: Mutex<QueueState>,
    job_ready: Condvar,
    idle: Condvar,
    pool: rayon::ThreadPool,
}

/// Joins the submit worker when the last space handle is dropped.
struct SubmitWorker {
    handle: Mutex<Option<JoinHandle<()>>>,
    shared: Arc<Shared>,
}

impl Drop for SubmitWorker {
    fn drop(&mut self) {
        {
            let mut state = self.shared.state.lock();
            state.shutdown = true;
        }
        self.shared.job_ready.notify_all();
        if let Some(handle) = self.handle.lock().take() {
            let _ = handle.join();
        }
    }
}

/// Asynchronous host execution space.
///
/// Cloning produces another handle to the same queue and pool. The space
/// shuts down when the last handle is dropped.
///
/// # Example
///
/// ```rust,no_run
/// use myriad_backends::{ExecutionSpace, Threads};
///
/// let space = Threads::new()?;
/// assert!(space.concurrency() >= 1);
/// space.fence("settle");
/// # Ok::<(), myriad_backends::SpaceError>(())
/// ```
#[derive(Clone)]
pub struct Threads {
    shared: Arc<Shared>,
    // Never read; held so the last handle's drop joins the submit thread.
    #[allow(dead_code)]
    worker: Arc<SubmitWorker>,
}

impl Threads {
    /// Create a space sized to the host's available parallelism.
    pub fn new() -> Result<Self> {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::with_concurrency(workers)
    }

    /// Create a space with exactly `workers` pool threads.
    pub fn with_concurrency(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(SpaceError::InvalidConcurrency { requested: 0 });
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("myriad-worker-{i}"))
            .build()
            .map_err(SpaceError::pool_build)?;
        let shared = Arc::new(Shared {
            state: Mutex::new(QueueState {
                jobs: VecDeque::new(),
                in_flight: 0,
                shutdown: false,
            }),
            job_ready: Condvar::new(),
            idle: Condvar::new(),
            pool,
        });
        let worker_shared = Arc::clone(&shared);
        let handle = std::thread::Builder::new()
            .name("myriad-submit".into())
            .spawn(move || submit_loop(worker_shared))
            .map_err(SpaceError::submit_thread_spawn)?;
        tracing::debug!(workers, "threads space created");
        Ok(Self {
            worker: Arc::new(SubmitWorker {
                handle: Mutex::new(Some(handle)),
                shared: Arc::clone(&shared),
            }),
            shared,
        })
    }

    fn submit(&self, job: Job) {
        {
            let mut state = self.shared.state.lock();
            state.jobs.push_back(job);
        }
        self.shared.job_ready.notify_one();
    }
}

fn submit_loop(shared: Arc<Shared>) {
    loop {
        let job = {
            let mut state = shared.state.lock();
            loop {
                if let Some(job) = state.jobs.pop_front() {
                    state.in_flight += 1;
                    break Some(job);
                }
                // Queued jobs drain before shutdown takes effect.
                if state.shutdown {
                    break None;
                }
                shared.job_ready.wait(&mut state);
            }
        };
        let Some(job) = job else {
            return;
        };
        job();
        let mut state = shared.state.lock();
        state.in_flight -= 1;
        if state.in_flight == 0 && state.jobs.is_empty() {
            shared.idle.notify_all();
        }
    }
}

impl ExecutionSpace for Threads {
    fn name(&self) -> &'static str {
        "Threads"
    }

    fn concurrency(&self) -> usize {
        self.shared.pool.current_num_threads()
    }

    fn fence(&self, label: &str) {
        let start = Instant::now();
        let mut state = self.shared.state.lock();
        while state.in_flight > 0 || !state.jobs.is_empty() {
            self.shared.idle.wait(&mut state);
        }
        drop(state);
        tracing::trace!(
            space = self.name(),
            label,
            duration_us = start.elapsed().as_micros() as u64,
            "fence_complete"
        );
    }

    fn execute_for<K: RangeKernel>(&self, span: Range<usize>, chunk: usize, kernel: K) {
        let shared = Arc::clone(&self.shared);
        self.submit(Box::new(move || {
            let pieces = chunk::piece_count(span.len(), chunk);
            let _span = perf_span!("threads_for", pieces = pieces as u64);
            shared.pool.install(|| {
                (0..pieces).into_par_iter().for_each(|p| {
                    kernel.run(chunk::piece_span(&span, chunk, p));
                });
            });
        }));
    }

    fn execute_reduce<K: ReduceKernel>(
        &self,
        span: Range<usize>,
        chunk: usize,
        kernel: K,
        commit: impl FnOnce(K::Acc) + Send + 'static,
    ) {
        let shared = Arc::clone(&self.shared);
        self.submit(Box::new(move || {
            let pieces = chunk::piece_count(span.len(), chunk);
            let _span = perf_span!("threads_reduce", pieces = pieces as u64);
            let total = shared.pool.install(|| {
                (0..pieces)
                    .into_par_iter()
                    .map(|p| {
                        let mut acc = kernel.init();
                        kernel.fold(chunk::piece_span(&span, chunk, p), &mut acc);
                        acc
                    })
                    .reduce(
                        || kernel.init(),
                        |mut dest, src| {
                            kernel.join(&mut dest, src);
                            dest
                        },
                    )
            });
            commit(total);
        }));
    }

    fn execute_scan<K: ScanKernel>(
        &self,
        span: Range<usize>,
        chunk: usize,
        kernel: K,
        commit: impl FnOnce(K::Acc) + Send + 'static,
    ) {
        let shared = Arc::clone(&self.shared);
        self.submit(Box::new(move || {
            let pieces = chunk::piece_count(span.len(), chunk);
            let _span = perf_span!("threads_scan", pieces = pieces as u64);
            if pieces <= 1 {
                let mut acc = kernel.init();
                if pieces == 1 {
                    kernel.scan(chunk::piece_span(&span, chunk, 0), &mut acc, true);
                }
                commit(acc);
                return;
            }
            // Pass 1: per-piece totals without output.
            let partials: Vec<K::Acc> = shared.pool.install(|| {
                (0..pieces)
                    .into_par_iter()
                    .map(|p| {
                        let mut acc = kernel.init();
                        kernel.scan(chunk::piece_span(&span, chunk, p), &mut acc, false);
                        acc
                    })
                    .collect()
            });
            // Exclusive piece offsets, joined in piece order.
            let mut offsets = Vec::with_capacity(pieces);
            let mut running = kernel.init();
            for partial in partials {
                offsets.push(running.clone());
                kernel.join(&mut running, partial);
            }
            // Pass 2: replay with offsets, output enabled.
            shared.pool.install(|| {
                offsets.into_par_iter().enumerate().for_each(|(p, mut acc)| {
                    kernel.scan(chunk::piece_span(&span, chunk, p), &mut acc, true);
                });
            });
            commit(running);
        }));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
    use std::time::Duration;

    struct SumKernel;

    impl ReduceKernel for SumKernel {
        type Acc = u64;

        fn init(&self) -> u64 {
            0
        }

        fn fold(&self, piece: Range<usize>, acc: &mut u64) {
            for i in piece {
                *acc += i as u64;
            }
        }

        fn join(&self, dest: &mut u64, src: u64) {
            *dest += src;
        }
    }

    struct SlowSumKernel {
        delay: Duration,
    }

    impl ReduceKernel for SlowSumKernel {
        type Acc = u64;

        fn init(&self) -> u64 {
            0
        }

        fn fold(&self, piece: Range<usize>, acc: &mut u64) {
            std::thread::sleep(self.delay);
            for i in piece {
                *acc += i as u64;
            }
        }

        fn join(&self, dest: &mut u64, src: u64) {
            *dest += src;
        }
    }

    struct CountKernel {
        hits: Arc<AtomicUsize>,
    }

    impl RangeKernel for CountKernel {
        fn run(&self, piece: Range<usize>) {
            self.hits.fetch_add(piece.len(), Ordering::Relaxed);
        }
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        assert!(matches!(
            Threads::with_concurrency(0),
            Err(SpaceError::InvalidConcurrency { requested: 0 })
        ));
    }

    #[test]
    fn test_concurrency_matches_request() {
        let space = Threads::with_concurrency(3).unwrap();
        assert_eq!(space.concurrency(), 3);
    }

    #[test]
    fn test_reduce_visible_after_fence() {
        let space = Threads::with_concurrency(4).unwrap();
        let result = Arc::new(AtomicU64::new(u64::MAX));
        let sink = result.clone();
        space.execute_reduce(0..1000, 64, SumKernel, move |acc| {
            sink.store(acc, Ordering::SeqCst);
        });
        space.fence("test");
        assert_eq!(result.load(Ordering::SeqCst), 499_500);
    }

    #[test]
    fn test_execute_returns_before_work_completes() {
        let space = Threads::with_concurrency(2).unwrap();
        let result = Arc::new(AtomicU64::new(0));
        let sink = result.clone();
        let start = Instant::now();
        space.execute_reduce(
            0..8,
            2,
            SlowSumKernel {
                delay: Duration::from_millis(100),
            },
            move |acc| {
                sink.store(acc, Ordering::SeqCst);
            },
        );
        let launch = start.elapsed();
        assert!(launch < Duration::from_millis(50), "launch took {launch:?}");
        space.fence("test");
        assert_eq!(result.load(Ordering::SeqCst), 28);
    }

    #[test]
    fn test_jobs_run_in_submission_order() {
        let space = Threads::with_concurrency(2).unwrap();
        let log = Arc::new(Mutex::new(Vec::new()));
        for tag in 0..8u64 {
            let sink = log.clone();
            space.execute_reduce(0..1, 1, SumKernel, move |_| {
                sink.lock().push(tag);
            });
        }
        space.fence("test");
        assert_eq!(*log.lock(), (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_drop_drains_queue() {
        let result = Arc::new(AtomicU64::new(0));
        {
            let space = Threads::with_concurrency(2).unwrap();
            let sink = result.clone();
            space.execute_reduce(0..100, 16, SumKernel, move |acc| {
                sink.store(acc, Ordering::SeqCst);
            });
        }
        // Drop joined the submit worker, so the queued job has finished.
        assert_eq!(result.load(Ordering::SeqCst), 4950);
    }

    #[test]
    fn test_for_covers_span() {
        let space = Threads::with_concurrency(4).unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        space.execute_for(0..4096, 128, CountKernel { hits: hits.clone() });
        space.fence("test");
        assert_eq!(hits.load(Ordering::Relaxed), 4096);
    }

    #[test]
    fn test_fence_with_nothing_outstanding() {
        let space = Threads::with_concurrency(1).unwrap();
        space.fence("idle");
        space.fence("idle again");
    }
}
