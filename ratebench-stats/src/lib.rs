#![warn(missing_docs)]
//! Ratebench Statistical Engine
//!
//! Turns the raw timing samples collected by a sampler into the numbers a
//! regression harness compares against its baseline:
//! - Mean time per operation and the derived rate (operations per second)
//! - Standard error and the 95% margin of error from a Student-t table
//! - Relative margin of error as a percentage of the mean
//! - Outlier cleaning via the IQR method

mod outliers;
mod percentiles;
mod summary;
mod tdist;

pub use outliers::{OutlierAnalysis, OutlierMethod, detect_outliers};
pub use percentiles::{compute_median, compute_percentile};
pub use summary::{SampleStatistics, StatsError, compute_summary};
pub use tdist::{T_INFINITY, critical_value};

/// Nanoseconds in one second, used to turn ns/op into ops/sec
pub const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Convert a mean duration per operation (in nanoseconds) into a rate.
///
/// Returns 0.0 for non-positive or non-finite durations so a broken
/// measurement never turns into an infinite rate.
pub fn ops_per_sec(mean_ns: f64) -> f64 {
    if mean_ns.is_finite() && mean_ns > 0.0 {
        NANOS_PER_SEC / mean_ns
    } else {
        0.0
    }
}
