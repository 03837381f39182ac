// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Fixed benchmark catalog.
//!
//! Seven measurable operations in two parameter families. The order of
//! [`BenchmarkKind::ALL`] is the catalog order: it drives "all kinds" runs,
//! the combined output file, and the kind selector indices (1..=7).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::HardValidationError;

/// Array sizes swept by the memory benchmarks.
pub const ARRAY_SIZES: [u64; 8] = [
    1, 10, 100, 1_000, 10_000, 100_000, 1_000_000, 10_000_000,
];

/// Iteration counts swept by the thread benchmarks.
pub const ITERATION_COUNTS: [u64; 5] = [2, 10, 100, 1_000, 10_000];

/// Largest array size in the catalog.
pub const MAX_ARRAY_SIZE: u64 = ARRAY_SIZES[ARRAY_SIZES.len() - 1];

/// One measurable operation.
///
/// The serialized form is the display name written to `process_measured`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BenchmarkKind {
    #[serde(rename = "Static Memory Access")]
    StaticAccess,
    #[serde(rename = "Dynamic Memory Access")]
    DynamicAccess,
    #[serde(rename = "Memory Allocation")]
    Allocation,
    #[serde(rename = "Memory Deallocation")]
    Deallocation,
    #[serde(rename = "Thread Creation")]
    ThreadCreation,
    #[serde(rename = "Context Switch")]
    ContextSwitch,
    #[serde(rename = "Thread Migration")]
    ThreadMigration,
}

impl BenchmarkKind {
    /// Number of kinds in the catalog.
    pub const COUNT: usize = 7;

    /// Every kind, in catalog order.
    pub const ALL: [BenchmarkKind; Self::COUNT] = [
        BenchmarkKind::StaticAccess,
        BenchmarkKind::DynamicAccess,
        BenchmarkKind::Allocation,
        BenchmarkKind::Deallocation,
        BenchmarkKind::ThreadCreation,
        BenchmarkKind::ContextSwitch,
        BenchmarkKind::ThreadMigration,
    ];

    /// Zero-based position in catalog order.
    pub const fn position(&self) -> usize {
        match self {
            Self::StaticAccess => 0,
            Self::DynamicAccess => 1,
            Self::Allocation => 2,
            Self::Deallocation => 3,
            Self::ThreadCreation => 4,
            Self::ContextSwitch => 5,
            Self::ThreadMigration => 6,
        }
    }

    /// Selector index (1..=7). Index 0 is reserved for "all kinds".
    pub const fn index(&self) -> u32 {
        self.position() as u32 + 1
    }

    /// Look up a kind by selector index.
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            1..=7 => Some(Self::ALL[index as usize - 1]),
            _ => None,
        }
    }

    /// Human-readable name, as persisted in `process_measured`.
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::StaticAccess => "Static Memory Access",
            Self::DynamicAccess => "Dynamic Memory Access",
            Self::Allocation => "Memory Allocation",
            Self::Deallocation => "Memory Deallocation",
            Self::ThreadCreation => "Thread Creation",
            Self::ContextSwitch => "Context Switch",
            Self::ThreadMigration => "Thread Migration",
        }
    }

    /// File-name fragment used for the per-category result file.
    pub const fn file_stem(&self) -> &'static str {
        match self {
            Self::StaticAccess => "static_access",
            Self::DynamicAccess => "dynamic_access",
            Self::Allocation => "allocation",
            Self::Deallocation => "deallocation",
            Self::ThreadCreation => "thread_creation",
            Self::ContextSwitch => "context_switch",
            Self::ThreadMigration => "thread_migration",
        }
    }

    /// Which parameter family this kind is swept over.
    pub const fn family(&self) -> ParameterFamily {
        match self {
            Self::StaticAccess | Self::DynamicAccess | Self::Allocation | Self::Deallocation => {
                ParameterFamily::ArraySize
            }
            Self::ThreadCreation | Self::ContextSwitch | Self::ThreadMigration => {
                ParameterFamily::Iterations
            }
        }
    }

    /// Every parameter point of this kind's sweep, in ascending order.
    pub fn sweep(self) -> impl Iterator<Item = SweepPoint> {
        self.family()
            .values()
            .iter()
            .map(move |&value| SweepPoint {
                kind: self,
                parameter: self.family().parameter(value),
            })
    }
}

impl fmt::Display for BenchmarkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// The two parameter families of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterFamily {
    ArraySize,
    Iterations,
}

impl ParameterFamily {
    /// Sweep values of this family.
    pub const fn values(&self) -> &'static [u64] {
        match self {
            Self::ArraySize => &ARRAY_SIZES,
            Self::Iterations => &ITERATION_COUNTS,
        }
    }

    /// Wrap a raw value as a parameter of this family.
    pub const fn parameter(&self, value: u64) -> Parameter {
        match self {
            Self::ArraySize => Parameter::ArraySize(value),
            Self::Iterations => Parameter::Iterations(value),
        }
    }

    /// Field name used in the persisted schema.
    pub const fn field_name(&self) -> &'static str {
        match self {
            Self::ArraySize => "array_size",
            Self::Iterations => "iterations",
        }
    }
}

/// Sweep parameter. Exactly one of array size or iteration count exists per
/// point, so the persisted `array_size`/`iterations` fields can never both
/// appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    ArraySize(u64),
    Iterations(u64),
}

impl Parameter {
    /// Raw value regardless of family.
    pub const fn value(&self) -> u64 {
        match self {
            Self::ArraySize(v) | Self::Iterations(v) => *v,
        }
    }

    /// Family this parameter belongs to.
    pub const fn family(&self) -> ParameterFamily {
        match self {
            Self::ArraySize(_) => ParameterFamily::ArraySize,
            Self::Iterations(_) => ParameterFamily::Iterations,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.family().field_name(), self.value())
    }
}

/// One (kind, parameter) pair measured independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SweepPoint {
    pub kind: BenchmarkKind,
    pub parameter: Parameter,
}

/// Request-level kind selector: index 0 means every kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindSelector {
    All,
    Single(BenchmarkKind),
}

impl KindSelector {
    /// Parse a selector index (0 = all, 1..=7 = one kind in catalog order).
    pub fn from_index(index: u32) -> Result<Self, HardValidationError> {
        if index == 0 {
            return Ok(Self::All);
        }
        BenchmarkKind::from_index(index)
            .map(Self::Single)
            .ok_or(HardValidationError::UnknownBenchmarkKind { index })
    }

    /// Kinds covered by this selector, in catalog order.
    pub fn kinds(&self) -> Vec<BenchmarkKind> {
        match self {
            Self::All => BenchmarkKind::ALL.to_vec(),
            Self::Single(kind) => vec![*kind],
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}
