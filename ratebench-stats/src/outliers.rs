//! Outlier Detection
//!
//! Scheduler hiccups and page faults produce a handful of very slow timing
//! samples. They are dropped before the mean is computed so a single stall
//! does not drag a test's rate below its warn threshold. The sample count
//! reported to the user still includes them.

use crate::percentiles::compute_percentile;

/// Method for outlier detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutlierMethod {
    /// Tukey fences: outliers lie outside [Q1 - k*IQR, Q3 + k*IQR]
    Iqr {
        /// Fence multiplier (1.5 is the usual choice)
        multiplier: f64,
    },
    /// Keep every sample
    None,
}

impl Default for OutlierMethod {
    fn default() -> Self {
        OutlierMethod::Iqr { multiplier: 1.5 }
    }
}

/// Result of outlier analysis
#[derive(Debug, Clone)]
pub struct OutlierAnalysis {
    /// Samples inside the fences, in their original order
    pub cleaned_samples: Vec<f64>,
    /// Indices of rejected samples
    pub outlier_indices: Vec<usize>,
    /// Lower fence
    pub lower_bound: f64,
    /// Upper fence
    pub upper_bound: f64,
}

impl OutlierAnalysis {
    /// Number of rejected samples
    pub fn outlier_count(&self) -> usize {
        self.outlier_indices.len()
    }
}

/// Split samples into kept and rejected sets.
///
/// If the fences would reject every sample (possible with pathological
/// input) the original samples are kept instead.
pub fn detect_outliers(samples: &[f64], method: OutlierMethod) -> OutlierAnalysis {
    let keep_all = || OutlierAnalysis {
        cleaned_samples: samples.to_vec(),
        outlier_indices: Vec::new(),
        lower_bound: f64::NEG_INFINITY,
        upper_bound: f64::INFINITY,
    };

    let multiplier = match method {
        OutlierMethod::None => return keep_all(),
        OutlierMethod::Iqr { multiplier } => multiplier,
    };
    if samples.len() < 4 {
        return keep_all();
    }

    let q1 = compute_percentile(samples, 25.0);
    let q3 = compute_percentile(samples, 75.0);
    let iqr = q3 - q1;
    let lower_bound = q1 - multiplier * iqr;
    let upper_bound = q3 + multiplier * iqr;

    let mut cleaned = Vec::with_capacity(samples.len());
    let mut outlier_indices = Vec::new();
    for (i, &sample) in samples.iter().enumerate() {
        if sample < lower_bound || sample > upper_bound {
            outlier_indices.push(i);
        } else {
            cleaned.push(sample);
        }
    }

    if cleaned.is_empty() {
        return keep_all();
    }

    OutlierAnalysis {
        cleaned_samples: cleaned,
        outlier_indices,
        lower_bound,
        upper_bound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_outliers() {
        let samples = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = detect_outliers(&samples, OutlierMethod::default());

        assert_eq!(result.outlier_count(), 0);
        assert_eq!(result.cleaned_samples, samples);
    }

    #[test]
    fn test_slow_stall_removed() {
        let samples = vec![10.0, 11.0, 10.5, 10.2, 9.8, 10.1, 500.0];
        let result = detect_outliers(&samples, OutlierMethod::default());

        assert_eq!(result.outlier_indices, vec![6]);
        assert_eq!(result.cleaned_samples.len(), 6);
        assert!(result.upper_bound < 500.0);
    }

    #[test]
    fn test_none_keeps_everything() {
        let samples = vec![1.0, 2.0, 100.0, 3.0, 2.0];
        let result = detect_outliers(&samples, OutlierMethod::None);

        assert_eq!(result.outlier_count(), 0);
        assert_eq!(result.cleaned_samples.len(), 5);
    }

    #[test]
    fn test_tiny_input_is_untouched() {
        let samples = vec![1.0, 100.0];
        let result = detect_outliers(&samples, OutlierMethod::default());

        assert_eq!(result.cleaned_samples, samples);
    }
}
