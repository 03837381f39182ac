// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Newtype wrappers for validated request inputs.
//!
//! Every type validates its invariants at creation time, so a request that
//! reaches the dispatcher is already known to be measurable.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HardValidationError;

/// Upper bound on trials per parameter point.
pub const MAX_TRIALS: u32 = 100_000;

/// Trials per parameter point when none are requested.
pub const DEFAULT_TRIALS: u32 = 100;

/// Outlier threshold when none is requested.
pub const DEFAULT_OUTLIER_THRESHOLD: f64 = 3.0;

/// Execution backend a benchmark runs on.
///
/// The serialized form is the exact string written to `programming_language`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Backend {
    /// Measured inside the harness process.
    #[serde(rename = "Rust")]
    Rust,
    /// Native C measurement library.
    #[serde(rename = "C")]
    C,
    /// Native C++ measurement library.
    #[serde(rename = "C++")]
    Cpp,
}

impl Backend {
    /// All known backends, in routing order.
    pub const ALL: [Backend; 3] = [Backend::Rust, Backend::C, Backend::Cpp];

    /// Identifier used in records and file names.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rust => "Rust",
            Self::C => "C",
            Self::Cpp => "C++",
        }
    }

    /// Whether this backend is reached through the native call boundary.
    pub const fn is_native(&self) -> bool {
        !matches!(self, Self::Rust)
    }

    /// Parse a backend identifier (case-insensitive).
    pub fn parse(name: &str) -> Result<Self, HardValidationError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "rust" => Ok(Self::Rust),
            "c" => Ok(Self::C),
            "c++" | "cpp" => Ok(Self::Cpp),
            _ => Err(HardValidationError::UnknownBackend {
                name: name.to_string(),
            }),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Backend {
    type Err = HardValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Validated number of trials per parameter point (1..=MAX_TRIALS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TrialCount(u32);

impl TrialCount {
    /// Create a new TrialCount with bounds validation.
    pub fn new(trials: u32) -> Result<Self, HardValidationError> {
        if !(1..=MAX_TRIALS).contains(&trials) {
            return Err(HardValidationError::InvalidFieldValue {
                field: "trials",
                value: trials.to_string(),
                reason: format!("Must be between 1 and {}", MAX_TRIALS),
            });
        }
        Ok(Self(trials))
    }

    /// Get the inner value.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for TrialCount {
    fn default() -> Self {
        Self(DEFAULT_TRIALS)
    }
}

impl fmt::Display for TrialCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for TrialCount {
    type Error = HardValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TrialCount> for u32 {
    fn from(trials: TrialCount) -> Self {
        trials.0
    }
}

/// Validated outlier threshold, in population standard deviations.
///
/// Any non-negative real number is accepted, including `+inf` (keep every
/// sample). NaN and negative values are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct OutlierThreshold(f64);

impl OutlierThreshold {
    /// Create a new OutlierThreshold with validation.
    pub fn new(threshold: f64) -> Result<Self, HardValidationError> {
        if threshold.is_nan() || threshold < 0.0 {
            return Err(HardValidationError::InvalidFieldValue {
                field: "outlier_threshold",
                value: threshold.to_string(),
                reason: "Must be a non-negative number".to_string(),
            });
        }
        Ok(Self(threshold))
    }

    /// Get the inner value.
    pub fn get(&self) -> f64 {
        self.0
    }
}

impl Default for OutlierThreshold {
    fn default() -> Self {
        Self(DEFAULT_OUTLIER_THRESHOLD)
    }
}

impl fmt::Display for OutlierThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<f64> for OutlierThreshold {
    type Error = HardValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OutlierThreshold> for f64 {
    fn from(threshold: OutlierThreshold) -> Self {
        threshold.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parse() {
        assert_eq!(Backend::parse("rust").unwrap(), Backend::Rust);
        assert_eq!(Backend::parse("C").unwrap(), Backend::C);
        assert_eq!(Backend::parse("c++").unwrap(), Backend::Cpp);
        assert_eq!(Backend::parse("CPP").unwrap(), Backend::Cpp);
        assert!(Backend::parse("java").is_err());
        assert!(Backend::parse("").is_err());
    }

    #[test]
    fn test_backend_serialized_name() {
        assert_eq!(serde_json::to_string(&Backend::Cpp).unwrap(), "\"C++\"");
        assert_eq!(Backend::Cpp.to_string(), "C++");
        assert!(!Backend::Rust.is_native());
        assert!(Backend::C.is_native());
    }

    #[test]
    fn test_trial_count_bounds() {
        assert!(TrialCount::new(0).is_err());
        assert!(TrialCount::new(1).is_ok());
        assert!(TrialCount::new(MAX_TRIALS).is_ok());
        assert!(TrialCount::new(MAX_TRIALS + 1).is_err());
        assert_eq!(TrialCount::default().get(), DEFAULT_TRIALS);
    }

    #[test]
    fn test_outlier_threshold_validation() {
        assert!(OutlierThreshold::new(f64::NAN).is_err());
        assert!(OutlierThreshold::new(-0.5).is_err());
        assert_eq!(OutlierThreshold::new(2.5).unwrap().get(), 2.5);
        assert!(OutlierThreshold::new(0.0).is_ok());
        assert!(OutlierThreshold::new(f64::INFINITY).is_ok());
    }
}
