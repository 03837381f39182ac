// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Per-invocation run state.
//!
//! A `RunContext` owns everything a run mutates: the accumulated records and
//! the optional file sink. Nothing is process-wide, so two contexts never
//! see each other's records.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::accumulator::ResultAccumulator;
use crate::catalog::BenchmarkKind;
use crate::error::SinkError;
use crate::record::BenchmarkRecord;
use crate::sink::JsonSink;
use crate::types::Backend;

/// State threaded through one or more dispatcher runs.
#[derive(Debug)]
pub struct RunContext {
    accumulator: ResultAccumulator,
    sink: Option<JsonSink>,
    started_at: DateTime<Utc>,
}

impl RunContext {
    /// Context that persists every category change through `sink`.
    pub fn new(sink: JsonSink) -> Self {
        Self {
            accumulator: ResultAccumulator::new(),
            sink: Some(sink),
            started_at: Utc::now(),
        }
    }

    /// Context that keeps records in memory only.
    pub fn in_memory() -> Self {
        Self {
            accumulator: ResultAccumulator::new(),
            sink: None,
            started_at: Utc::now(),
        }
    }

    pub fn accumulator(&self) -> &ResultAccumulator {
        &self.accumulator
    }

    pub fn sink(&self) -> Option<&JsonSink> {
        self.sink.as_ref()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Append `record` and rewrite its backend's category file.
    ///
    /// The record stays in the accumulator even when the write fails.
    pub fn record(&mut self, record: BenchmarkRecord) -> Result<Option<PathBuf>, SinkError> {
        let backend = record.backend;
        let kind = record.kind;
        let category = self.accumulator.append(record);

        let Some(sink) = &self.sink else {
            return Ok(None);
        };
        let for_backend: Vec<&BenchmarkRecord> = category
            .iter()
            .filter(|r| r.backend == backend)
            .collect();
        sink.write_category(backend, kind, &for_backend).map(Some)
    }

    /// Rewrite the combined file of `backend` from every accumulated category.
    pub fn write_combined(&self, backend: Backend) -> Result<Option<PathBuf>, SinkError> {
        let Some(sink) = &self.sink else {
            return Ok(None);
        };
        let records = self.accumulator.combine_for(backend);
        sink.write_combined(backend, &records).map(Some)
    }

    /// Records of one category for one backend.
    pub fn records_for(&self, kind: BenchmarkKind, backend: Backend) -> Vec<&BenchmarkRecord> {
        self.accumulator.records_for(kind, backend)
    }
}
