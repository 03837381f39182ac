// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Statistics over raw nanosecond samples.
//!
//! Pure functions: arithmetic mean, population standard deviation, and
//! single-pass outlier trimming. Bounds are estimated once over the untrimmed
//! input and never re-estimated, so output is fully determined by the input
//! and the threshold.

/// Arithmetic mean of the samples, `0.0` for an empty slice.
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Population standard deviation (divides by `n`, not `n - 1`).
pub fn std_deviation(samples: &[f64], mean: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let variance = samples
        .iter()
        .map(|&x| {
            let diff = x - mean;
            diff * diff
        })
        .sum::<f64>()
        / samples.len() as f64;
    variance.sqrt()
}

/// Outcome of a trimming pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Trimmed {
    /// Samples inside the bounds, in original order.
    pub retained: Vec<f64>,
    /// Lower bound (inclusive).
    pub lower_bound: f64,
    /// Upper bound (inclusive).
    pub upper_bound: f64,
}

impl Trimmed {
    /// Number of retained samples.
    pub fn len(&self) -> usize {
        self.retained.len()
    }

    /// True when every sample was rejected.
    pub fn is_empty(&self) -> bool {
        self.retained.is_empty()
    }
}

/// Keep every sample inside `[mean - threshold·σ, mean + threshold·σ]`.
///
/// Mean and σ are computed over the whole input exactly once. When all
/// samples are equal the bounds collapse onto that shared value, so such
/// input is always retained in full.
pub fn trim(samples: &[f64], threshold: f64) -> Trimmed {
    if samples.is_empty() {
        return Trimmed {
            retained: Vec::new(),
            lower_bound: 0.0,
            upper_bound: 0.0,
        };
    }

    let (min, max) = samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        });

    // Zero spread: the mean may carry rounding error, the shared value does not.
    let (lower_bound, upper_bound) = if min == max {
        (min, max)
    } else {
        let center = mean(samples);
        let half_width = threshold * std_deviation(samples, center);
        (center - half_width, center + half_width)
    };

    let retained = samples
        .iter()
        .copied()
        .filter(|&x| x >= lower_bound && x <= upper_bound)
        .collect();

    Trimmed {
        retained,
        lower_bound,
        upper_bound,
    }
}

/// Average and standard deviation of already-trimmed samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub average: f64,
    pub std_deviation: f64,
}

/// Summarize retained samples. `None` when nothing was retained.
pub fn summarize(retained: &[f64]) -> Option<Summary> {
    if retained.is_empty() {
        return None;
    }
    let average = mean(retained);
    Some(Summary {
        average,
        std_deviation: std_deviation(retained, average),
    })
}
