#![warn(missing_docs)]
//! # RateBench
//!
//! Throughput regression testing for Rust against recorded baselines.
//!
//! RateBench measures how many times per second each test runs and compares
//! the rate with the one recorded for the same machine:
//! - **Baseline Profiles**: expected rates per suite and test, stored as JSON with the machine description
//! - **Thresholds**: a test warns below `warn_threshold` and fails below `fail_threshold` of its expected rate
//! - **Test Hooks**: once-only setup and pooled, pre-generated input data kept out of the timed region
//! - **Async Setup**: suite-level `before` callbacks awaited before anything is measured
//! - **Reporters**: terminal summary, JUnit XML and JSON, all fed as each suite completes
//!
//! ## Quick Start
//!
//! ```ignore
//! use ratebench::prelude::*;
//!
//! #[suite(name = "Vec.push")]
//! fn vec_push(suite: &mut Suite) -> Result<(), SuiteError> {
//!     suite.add("push 1k", || {
//!         let mut v = Vec::new();
//!         for i in 0..1000 {
//!             v.push(std::hint::black_box(i));
//!         }
//!     })
//! }
//!
//! fn main() -> std::process::ExitCode {
//!     ratebench::run()
//! }
//! ```
//!
//! ## Pooled Test Data
//!
//! ```ignore
//! #[suite]
//! fn sorting(suite: &mut Suite) -> Result<(), SuiteError> {
//!     let options = TestOptions::new().generate_data(|| random_vec(512));
//!     suite.add_with("sort 512", |data: Option<&Vec<u32>>| {
//!         let mut v = data.cloned().unwrap_or_default();
//!         v.sort();
//!     }, options)
//! }
//! ```
//!
//! ## Recording a Baseline
//!
//! ```sh
//! cargo bench -- --profile-out bench/profile.json
//! cargo bench -- --profile bench/profile.json --reporters cli,junit
//! ```

// Re-export core types
pub use ratebench_core::{
    BeforeFuture, BoxError, Cycle, DATA_SAMPLE_SIZE, Outcome, Phase, Sampler, SamplerConfig, Stat,
    Suite, SuiteConfig, SuiteDef, SuiteError, SuiteResult, SuiteState, TestOptions, TestResult,
    TimedSampler, WrappedTest, classify, format_bytes, format_expectation_variance, format_hz,
    format_margin, format_millis, registered_suites,
};

// Re-export macros
pub use ratebench_macros::suite;

// Re-export reporting and baseline types
pub use ratebench_report::{
    CliReporter, JsonReporter, JunitReporter, MachineInfo, Profile, ProfileError, ProfileSuite,
    ReportContext, Reporter, ReporterKind, ReporterOptions, create_reporter,
};

// Re-export the orchestrator
pub use ratebench_cli::{
    BenchConfig, Benchmark, BenchmarkError, BenchmarkSettings, ExitCodes, compile_filters,
};

/// Internal re-exports for macro use
#[doc(hidden)]
pub mod internal {
    pub use ratebench_core::inventory;
    pub use ratebench_core::{Suite, SuiteDef, SuiteError};
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Outcome, Suite, SuiteError, TestOptions, suite};
}

/// Run the RateBench CLI harness.
///
/// Call this from your benchmark binary's `main()`:
/// ```ignore
/// fn main() -> std::process::ExitCode {
///     ratebench::run()
/// }
/// ```
pub use ratebench_cli::run;
