//! Sampler interface
//!
//! The suite engine only needs a rate, a relative margin of error and a
//! sample count per test. Anything that can produce those can drive a suite.

use crate::bencher::{Bencher, DEFAULT_SAMPLE_COUNT, MIN_SAMPLE_COUNT, run_benchmark_loop};
use ratebench_stats::{OutlierMethod, compute_summary};
use std::time::Duration;

/// One completed measurement of a single test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cycle {
    /// Operations per second
    pub hz: f64,
    /// Relative margin of error, in percent
    pub rme: f64,
    /// Number of samples the rate was computed from
    pub samples: usize,
    /// Wall time spent measuring
    pub elapsed: Duration,
}

impl Cycle {
    /// A cycle that produced no usable measurement
    pub fn empty(elapsed: Duration) -> Self {
        Self {
            hz: 0.0,
            rme: 0.0,
            samples: 0,
            elapsed,
        }
    }
}

/// Measures zero-argument routines
pub trait Sampler {
    /// Call `routine` repeatedly and report its rate.
    fn measure(&mut self, name: &str, routine: &mut dyn FnMut()) -> Cycle;
}

impl<S: Sampler + ?Sized> Sampler for &mut S {
    fn measure(&mut self, name: &str, routine: &mut dyn FnMut()) -> Cycle {
        (**self).measure(name, routine)
    }
}

impl<S: Sampler + ?Sized> Sampler for Box<S> {
    fn measure(&mut self, name: &str, routine: &mut dyn FnMut()) -> Cycle {
        (**self).measure(name, routine)
    }
}

/// Timing budget for [`TimedSampler`]
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerConfig {
    /// Time spent calling the routine before anything is recorded
    pub warmup_time: Duration,
    /// Time budget for recorded batches
    pub measurement_time: Duration,
    /// Stop once this many samples exist
    pub target_samples: usize,
    /// Never stop with fewer samples than this
    pub min_samples: usize,
    /// Outlier cleaning applied before the mean is taken
    pub outlier_method: OutlierMethod,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            warmup_time: Duration::from_secs(1),
            measurement_time: Duration::from_secs(5),
            target_samples: DEFAULT_SAMPLE_COUNT,
            min_samples: MIN_SAMPLE_COUNT,
            outlier_method: OutlierMethod::default(),
        }
    }
}

/// Wall-clock sampler built on [`Bencher`]
#[derive(Debug, Clone, Default)]
pub struct TimedSampler {
    config: SamplerConfig,
}

impl TimedSampler {
    /// Create a sampler with the given budget
    pub fn new(config: SamplerConfig) -> Self {
        Self { config }
    }

    /// The sampler's budget
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }
}

impl Sampler for TimedSampler {
    fn measure(&mut self, name: &str, routine: &mut dyn FnMut()) -> Cycle {
        let config = &self.config;
        let result = run_benchmark_loop(
            Bencher::new(config.target_samples),
            routine,
            config.warmup_time,
            config.measurement_time,
            config.min_samples,
        );

        match compute_summary(&result.samples, config.outlier_method) {
            Ok(stats) => {
                tracing::trace!(
                    test = name,
                    mean_ns = stats.mean,
                    outliers = stats.outlier_count,
                    iterations = result.iterations,
                    "sampled"
                );
                Cycle {
                    hz: stats.ops_per_sec(),
                    rme: stats.rme,
                    samples: stats.sample_count,
                    elapsed: result.elapsed,
                }
            }
            Err(error) => {
                tracing::warn!(test = name, %error, "no usable samples");
                Cycle::empty(result.elapsed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config() -> SamplerConfig {
        SamplerConfig {
            warmup_time: Duration::ZERO,
            measurement_time: Duration::ZERO,
            target_samples: 10,
            min_samples: 10,
            outlier_method: OutlierMethod::default(),
        }
    }

    #[test]
    fn test_timed_sampler_reports_rate() {
        let mut sampler = TimedSampler::new(quick_config());
        let mut routine = || {
            std::hint::black_box((0..100u64).sum::<u64>());
        };

        let cycle = sampler.measure("sum", &mut routine);
        assert_eq!(cycle.samples, 10);
        assert!(cycle.hz > 0.0);
        assert!(cycle.rme >= 0.0);
    }

    #[test]
    fn test_sampler_through_trait_object() {
        let mut sampler: Box<dyn Sampler> = Box::new(TimedSampler::new(quick_config()));
        let mut calls = 0u32;
        let mut routine = || calls += 1;

        let cycle = sampler.measure("count", &mut routine);
        assert_eq!(cycle.samples, 10);
        assert!(calls >= 11);
    }

    #[test]
    fn test_default_budget() {
        let config = SamplerConfig::default();
        assert_eq!(config.warmup_time, Duration::from_secs(1));
        assert_eq!(config.measurement_time, Duration::from_secs(5));
        assert_eq!(config.target_samples, 100);
        assert_eq!(config.min_samples, 10);
    }
}
