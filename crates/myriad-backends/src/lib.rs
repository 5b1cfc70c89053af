//! Execution spaces for myriad parallel dispatch
//!
//! This crate provides:
//! - **Kernel Contracts**: backend-neutral job shapes ([`RangeKernel`],
//!   [`ReduceKernel`], [`ScanKernel`])
//! - **ExecutionSpace Trait**: pluggable execution interface with an
//!   asynchronous completion model and named fences
//! - **Serial Space**: synchronous reference implementation
//! - **Threads Space**: asynchronous submission queue over a rayon pool
//! - **Chunk Math**: shared piece boundaries so every space cuts a span
//!   identically
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │            dispatch layer (myriad-core)             │
//! └──────────────────────────┬──────────────────────────┘
//!                            │ kernels + commit
//!                            ▼
//! ┌─────────────────────────────────────────────────────┐
//! │                  ExecutionSpace                     │
//! │   execute_for · execute_reduce · execute_scan       │
//! │            fence(label) · concurrency()             │
//! └─────────────┬─────────────────────┬─────────────────┘
//!               ▼                     ▼
//!          ┌─────────┐          ┌──────────┐
//!          │ Serial  │          │ Threads  │
//!          └─────────┘          └──────────┘
//! ```
//!
//! Accelerator spaces plug in by implementing [`ExecutionSpace`]; nothing
//! in the dispatch layer names a concrete space.
//!
//! # Usage
//!
//! ```rust
//! use std::ops::Range;
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use std::sync::Arc;
//! use myriad_backends::{ExecutionSpace, ReduceKernel, Serial};
//!
//! struct SumSquares;
//!
//! impl ReduceKernel for SumSquares {
//!     type Acc = u64;
//!
//!     fn init(&self) -> u64 {
//!         0
//!     }
//!
//!     fn fold(&self, piece: Range<usize>, acc: &mut u64) {
//!         for i in piece {
//!             *acc += (i * i) as u64;
//!         }
//!     }
//!
//!     fn join(&self, dest: &mut u64, src: u64) {
//!         *dest += src;
//!     }
//! }
//!
//! let space = Serial::new();
//! let result = Arc::new(AtomicU64::new(0));
//! let sink = result.clone();
//! space.execute_reduce(0..10, 4, SumSquares, move |acc| {
//!     sink.store(acc, Ordering::Relaxed);
//! });
//! space.fence("read result");
//! assert_eq!(result.load(Ordering::Relaxed), 285);
//! ```

pub mod chunk;
pub mod error;
pub mod kernel;
pub mod space;

pub use error::{Result, SpaceError};
pub use kernel::{RangeKernel, ReduceKernel, ScanKernel};
pub use space::{DefaultExecutionSpace, ExecutionSpace, Serial, Threads};
