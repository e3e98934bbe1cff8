//! Bencher - batched timing of one routine
//!
//! Criterion-style batched sampling: a warmup phase times single calls to
//! estimate the cost of one call, then the measurement phase times whole
//! batches and records the mean time per call of each batch as a sample.

use std::time::{Duration, Instant};

/// Default number of samples to collect
pub const DEFAULT_SAMPLE_COUNT: usize = 100;

/// Minimum samples required for a usable margin of error
pub const MIN_SAMPLE_COUNT: usize = 10;

/// Result of one timing loop
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    /// Mean nanoseconds per call, one entry per batch
    pub samples: Vec<f64>,
    /// Calls made during measurement (warmup excluded)
    pub iterations: u64,
    /// Time spent inside measured batches
    pub elapsed: Duration,
}

/// Iteration control for a single routine
pub struct Bencher {
    samples: Vec<f64>,
    target_samples: usize,
    iters_per_sample: u64,

    is_warmup: bool,
    warmup_times: Vec<u64>,

    measured_iterations: u64,
    measured_time: Duration,
}

impl Bencher {
    /// Create a Bencher that stops recording after `target_samples` batches
    pub fn new(target_samples: usize) -> Self {
        let target_samples = target_samples.max(1);
        Self {
            samples: Vec::with_capacity(target_samples),
            target_samples,
            iters_per_sample: 1,
            is_warmup: true,
            warmup_times: Vec::with_capacity(1000),
            measured_iterations: 0,
            measured_time: Duration::ZERO,
        }
    }

    /// Estimated nanoseconds per call, from warmup timings
    pub fn estimated_iter_time_ns(&self) -> Option<u64> {
        if self.warmup_times.is_empty() {
            return None;
        }
        let sum: u64 = self.warmup_times.iter().sum();
        Some(sum / self.warmup_times.len() as u64)
    }

    /// Leave warmup and size the batches so `target_samples` batches fill
    /// roughly `measurement_time`.
    pub fn start_measurement(&mut self, measurement_time: Duration) {
        self.is_warmup = false;

        let measurement_ns = measurement_time.as_nanos().min(u64::MAX as u128) as u64;
        self.iters_per_sample = match self.estimated_iter_time_ns() {
            Some(iter_time) => {
                let time_per_sample = measurement_ns / self.target_samples as u64;
                (time_per_sample / iter_time.max(1)).max(1)
            }
            None => 1,
        };

        self.warmup_times.clear();
        self.warmup_times.shrink_to_fit();
    }

    /// Calls per measured batch
    pub fn iters_per_sample(&self) -> u64 {
        self.iters_per_sample
    }

    /// Run `routine` once (warmup) or for one batch (measurement).
    #[inline]
    pub fn iter(&mut self, routine: &mut dyn FnMut()) {
        if self.is_warmup {
            let start = Instant::now();
            routine();
            let elapsed = start.elapsed().as_nanos().min(u64::MAX as u128) as u64;
            self.warmup_times.push(elapsed);
            return;
        }

        let batch = self.iters_per_sample;
        let start = Instant::now();
        for _ in 0..batch {
            routine();
        }
        let elapsed = start.elapsed();

        self.measured_iterations += batch;
        self.measured_time += elapsed;

        if self.samples.len() < self.target_samples {
            // A batch faster than the clock resolution still counts as 1ns.
            let total_ns = elapsed.as_nanos().max(1) as f64;
            self.samples.push(total_ns / batch as f64);
        }
    }

    /// Whether the target sample count has been reached
    pub fn has_enough_samples(&self) -> bool {
        self.samples.len() >= self.target_samples
    }

    /// Samples collected so far
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Target sample count
    pub fn target_samples(&self) -> usize {
        self.target_samples
    }

    /// Finalize and return results
    pub fn finish(self) -> BenchmarkResult {
        BenchmarkResult {
            samples: self.samples,
            iterations: self.measured_iterations,
            elapsed: self.measured_time,
        }
    }
}

/// Run the full loop: warmup → measurement → finish
///
/// Warmup always makes at least one call so the batch size can be
/// estimated. Measurement stops once the target sample count is reached or
/// `measurement_time` has passed, but never before `min_samples` samples
/// exist (capped at the target).
pub fn run_benchmark_loop(
    mut bencher: Bencher,
    routine: &mut dyn FnMut(),
    warmup_time: Duration,
    measurement_time: Duration,
    min_samples: usize,
) -> BenchmarkResult {
    let warmup_start = Instant::now();
    loop {
        bencher.iter(routine);
        if warmup_start.elapsed() >= warmup_time {
            break;
        }
    }

    bencher.start_measurement(measurement_time);

    let min_samples = min_samples.min(bencher.target_samples());
    let measure_start = Instant::now();
    loop {
        let min_samples_met = bencher.sample_count() >= min_samples;
        let time_limit_reached = measure_start.elapsed() >= measurement_time;

        if (bencher.has_enough_samples() || time_limit_reached) && min_samples_met {
            break;
        }

        bencher.iter(routine);
    }

    bencher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn busy_work() -> u64 {
        let mut sum = 0u64;
        for i in 0..1000 {
            sum = std::hint::black_box(sum + i);
        }
        sum
    }

    #[test]
    fn test_warmup_records_no_samples() {
        let mut bencher = Bencher::new(DEFAULT_SAMPLE_COUNT);
        let mut routine = || {
            busy_work();
        };

        for _ in 0..5 {
            bencher.iter(&mut routine);
        }

        assert_eq!(bencher.sample_count(), 0);
        assert_eq!(bencher.warmup_times.len(), 5);
        assert!(bencher.estimated_iter_time_ns().is_some());
    }

    #[test]
    fn test_sample_batching() {
        let mut bencher = Bencher::new(10);
        bencher.is_warmup = false;
        bencher.iters_per_sample = 5;

        let mut calls = 0u64;
        let mut routine = || calls += 1;
        for _ in 0..12 {
            bencher.iter(&mut routine);
        }

        let result = bencher.finish();
        assert_eq!(result.samples.len(), 10);
        assert_eq!(result.iterations, 60);
        assert_eq!(calls, 60);
        assert!(result.samples.iter().all(|s| *s > 0.0));
    }

    #[test]
    fn test_batch_size_from_estimate() {
        let mut bencher = Bencher::new(10);
        bencher.warmup_times = vec![100, 100];
        bencher.start_measurement(Duration::from_micros(10));

        // 10_000ns / 10 samples / 100ns per call
        assert_eq!(bencher.iters_per_sample(), 10);
    }

    #[test]
    fn test_run_loop_respects_min_samples() {
        let mut calls = 0u64;
        let mut routine = || calls += 1;
        let result = run_benchmark_loop(
            Bencher::new(10),
            &mut routine,
            Duration::ZERO,
            Duration::ZERO,
            10,
        );

        assert_eq!(result.samples.len(), 10);
        // one warmup call, then ten single-call batches
        assert_eq!(result.iterations, 10);
        assert_eq!(calls, 11);
    }

    #[test]
    fn test_run_loop_caps_min_samples_at_target() {
        let mut routine = || {
            busy_work();
        };
        let result = run_benchmark_loop(
            Bencher::new(3),
            &mut routine,
            Duration::ZERO,
            Duration::ZERO,
            50,
        );

        assert_eq!(result.samples.len(), 3);
    }
}
