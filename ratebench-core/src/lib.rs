#![warn(missing_docs)]
//! RateBench Core - Suite Engine
//!
//! This crate provides everything needed to measure a suite of tests and
//! classify the results against a baseline:
//! - `Outcome` severity scale and its aggregation
//! - `Stat` formatting of rates, margins and deltas
//! - `WrappedTest` for once-only setup and pooled test data
//! - `Sampler` interface with a wall-clock `TimedSampler`
//! - `Suite` engine and `SuiteDef` registration

mod bencher;
mod outcome;
mod registry;
mod sampler;
mod stat;
mod suite;
mod wrapper;

pub use bencher::{
    Bencher, BenchmarkResult, DEFAULT_SAMPLE_COUNT, MIN_SAMPLE_COUNT, run_benchmark_loop,
};
pub use outcome::Outcome;
pub use registry::{REGISTRY_ANCHOR, SuiteDef, registered_suites};
pub use sampler::{Cycle, Sampler, SamplerConfig, TimedSampler};
pub use stat::{
    Stat, format_bytes, format_expectation_variance, format_hz, format_margin, format_millis,
};
pub use suite::{
    BeforeFuture, BoxError, Suite, SuiteConfig, SuiteError, SuiteResult, SuiteState, TestResult,
    classify,
};
pub use wrapper::{DATA_SAMPLE_SIZE, Phase, TestOptions, TestRoutine, WrappedTest};

// Re-exported for the `#[suite]` attribute expansion
#[doc(hidden)]
pub use inventory;
