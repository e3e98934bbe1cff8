//! Sample Statistics
//!
//! Each sample is the mean time per operation (in nanoseconds) over one
//! batch of calls. Central tendency and dispersion come from the cleaned
//! samples; `sample_count` counts every sample that was collected.

use crate::outliers::{OutlierMethod, detect_outliers};
use crate::percentiles::compute_median;
use crate::tdist::critical_value;
use thiserror::Error;

/// Errors produced while summarizing samples
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// Nothing was measured
    #[error("no samples to summarize")]
    Empty,
    /// A sample was NaN or infinite
    #[error("sample {index} is not finite: {value}")]
    NonFinite {
        /// Position of the offending sample
        index: usize,
        /// The offending value
        value: f64,
    },
}

/// Summary of one test's timing samples
#[derive(Debug, Clone, PartialEq)]
pub struct SampleStatistics {
    /// Mean nanoseconds per operation (cleaned samples)
    pub mean: f64,
    /// Median nanoseconds per operation (cleaned samples)
    pub median: f64,
    /// Sample variance (n - 1 denominator)
    pub variance: f64,
    /// Sample standard deviation
    pub std_dev: f64,
    /// Standard error of the mean
    pub sem: f64,
    /// Margin of error at 95% confidence, in nanoseconds
    pub moe: f64,
    /// Margin of error relative to the mean, in percent
    pub rme: f64,
    /// Fastest sample
    pub min: f64,
    /// Slowest sample
    pub max: f64,
    /// Every collected sample, outliers included
    pub sample_count: usize,
    /// Samples rejected by outlier cleaning
    pub outlier_count: usize,
}

impl SampleStatistics {
    /// Operations per second implied by the mean
    pub fn ops_per_sec(&self) -> f64 {
        crate::ops_per_sec(self.mean)
    }
}

/// Summarize samples after applying the given outlier method.
pub fn compute_summary(
    samples: &[f64],
    outlier_method: OutlierMethod,
) -> Result<SampleStatistics, StatsError> {
    if samples.is_empty() {
        return Err(StatsError::Empty);
    }
    if let Some((index, &value)) = samples.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(StatsError::NonFinite { index, value });
    }

    let analysis = detect_outliers(samples, outlier_method);
    let cleaned = &analysis.cleaned_samples;
    let n = cleaned.len();

    let mean = cleaned.iter().sum::<f64>() / n as f64;
    let variance = if n < 2 {
        0.0
    } else {
        cleaned.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
    };
    let std_dev = variance.sqrt();
    let sem = std_dev / (n as f64).sqrt();
    let moe = sem * critical_value(n - 1);
    let rme = if mean > 0.0 { moe / mean * 100.0 } else { 0.0 };

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Ok(SampleStatistics {
        mean,
        median: compute_median(cleaned),
        variance,
        std_dev,
        sem,
        moe,
        rme,
        min,
        max,
        sample_count: samples.len(),
        outlier_count: analysis.outlier_count(),
    })
}
