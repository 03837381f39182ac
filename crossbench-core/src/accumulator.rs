// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Per-category, append-only record collections.
//!
//! One ordered sequence per benchmark kind, spanning every backend measured
//! during a run. Records are never deduplicated or reordered; callers that
//! need "latest per key" filter on their side.

use crate::catalog::BenchmarkKind;
use crate::record::BenchmarkRecord;
use crate::types::Backend;

/// Append-only accumulator of emitted records.
///
/// Owned by a single `RunContext` and mutated only by the dispatcher thread.
#[derive(Debug, Default, Clone)]
pub struct ResultAccumulator {
    categories: [Vec<BenchmarkRecord>; BenchmarkKind::COUNT],
}

impl ResultAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to the category of its kind and return that category.
    pub fn append(&mut self, record: BenchmarkRecord) -> &[BenchmarkRecord] {
        let category = &mut self.categories[record.kind.position()];
        category.push(record);
        category
    }

    /// All records of one category, in append order.
    pub fn category(&self, kind: BenchmarkKind) -> &[BenchmarkRecord] {
        &self.categories[kind.position()]
    }

    /// Records of one category produced by one backend.
    pub fn records_for(&self, kind: BenchmarkKind, backend: Backend) -> Vec<&BenchmarkRecord> {
        self.category(kind)
            .iter()
            .filter(|record| record.backend == backend)
            .collect()
    }

    /// Every record across all categories, categories in catalog order.
    pub fn combine_all(&self) -> Vec<&BenchmarkRecord> {
        BenchmarkKind::ALL
            .iter()
            .flat_map(|kind| self.category(*kind))
            .collect()
    }

    /// Combined view restricted to one backend.
    pub fn combine_for(&self, backend: Backend) -> Vec<&BenchmarkRecord> {
        self.combine_all()
            .into_iter()
            .filter(|record| record.backend == backend)
            .collect()
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.categories.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
