// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! The durable outcome of one sweep point.
//!
//! Serializes to the flat per-run schema:
//!
//! ```json
//! {
//!     "array_size": 1000,
//!     "number_of_tests": 100,
//!     "passed_tests": 97,
//!     "outlier_threshold": 3.0,
//!     "programming_language": "Rust",
//!     "process_measured": "Static Memory Access",
//!     "average_time": 0.61,
//!     "std_deviation": 0.04
//! }
//! ```
//!
//! JSON has no infinity, so an unbounded threshold is written as the string
//! `"inf"` and read back from it.

use serde::{Deserialize, Serialize};

use crate::catalog::{BenchmarkKind, Parameter, SweepPoint};
use crate::stats::Summary;
use crate::types::Backend;

/// One measured sweep point for one backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    /// Either `array_size` or `iterations`, never both.
    #[serde(flatten)]
    pub parameter: Parameter,
    /// Trials requested.
    #[serde(rename = "number_of_tests")]
    pub trials_requested: u32,
    /// Trials retained after failures were dropped and outliers trimmed.
    #[serde(rename = "passed_tests")]
    pub trials_retained: u32,
    #[serde(with = "threshold")]
    pub outlier_threshold: f64,
    #[serde(rename = "programming_language")]
    pub backend: Backend,
    #[serde(rename = "process_measured")]
    pub kind: BenchmarkKind,
    /// Mean of retained samples, in nanoseconds.
    pub average_time: f64,
    /// Population standard deviation of retained samples, in nanoseconds.
    pub std_deviation: f64,
}

impl BenchmarkRecord {
    /// Build a record from a reduced sample set.
    pub fn new(
        backend: Backend,
        point: SweepPoint,
        trials_requested: u32,
        trials_retained: u32,
        outlier_threshold: f64,
        summary: Summary,
    ) -> Self {
        debug_assert!(trials_retained <= trials_requested);
        Self {
            parameter: point.parameter,
            trials_requested,
            trials_retained,
            outlier_threshold,
            backend,
            kind: point.kind,
            average_time: summary.average,
            std_deviation: summary.std_deviation,
        }
    }

    /// The sweep point this record measured.
    pub fn point(&self) -> SweepPoint {
        SweepPoint {
            kind: self.kind,
            parameter: self.parameter,
        }
    }
}

mod threshold {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    const UNBOUNDED: &str = "inf";

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if *value == f64::INFINITY {
            serializer.serialize_str(UNBOUNDED)
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Text(text)
                if text.eq_ignore_ascii_case(UNBOUNDED)
                    || text.eq_ignore_ascii_case("infinity") =>
            {
                Ok(f64::INFINITY)
            }
            Repr::Text(text) => Err(D::Error::custom(format!(
                "invalid outlier_threshold {:?}, expected a number or \"{}\"",
                text, UNBOUNDED
            ))),
        }
    }
}
