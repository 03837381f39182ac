// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! JSON result files.
//!
//! Layout under the output directory:
//!
//! ```text
//! <Backend>_measurements/<Backend>_<kind>.json   one category, rewritten in full
//! <Backend>_measurements/<Backend>_results.json  every category, catalog order
//! ```
//!
//! Every write goes to a temporary file in the target directory and is then
//! renamed over the target, so readers only ever see a complete array.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tempfile::NamedTempFile;

use crate::catalog::BenchmarkKind;
use crate::error::SinkError;
use crate::record::BenchmarkRecord;
use crate::types::Backend;

const INDENT: &[u8] = b"    ";

/// Writes record arrays to the on-disk layout.
#[derive(Debug, Clone)]
pub struct JsonSink {
    output_dir: PathBuf,
}

impl JsonSink {
    /// Create a sink rooted at `output_dir`, creating the directory if needed.
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self, SinkError> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Directory holding every file of one backend.
    pub fn backend_dir(&self, backend: Backend) -> PathBuf {
        self.output_dir.join(format!("{}_measurements", backend))
    }

    /// Per-category file of one backend.
    pub fn category_path(&self, backend: Backend, kind: BenchmarkKind) -> PathBuf {
        self.backend_dir(backend)
            .join(format!("{}_{}.json", backend, kind.file_stem()))
    }

    /// Combined file of one backend.
    pub fn combined_path(&self, backend: Backend) -> PathBuf {
        self.backend_dir(backend)
            .join(format!("{}_results.json", backend))
    }

    /// Replace the category file of `backend`/`kind` with `records`.
    pub fn write_category(
        &self,
        backend: Backend,
        kind: BenchmarkKind,
        records: &[&BenchmarkRecord],
    ) -> Result<PathBuf, SinkError> {
        let path = self.category_path(backend, kind);
        write_atomic(&path, records)?;
        tracing::debug!(
            backend = %backend,
            kind = %kind,
            records = records.len(),
            path = %path.display(),
            "Category file written"
        );
        Ok(path)
    }

    /// Replace the combined file of `backend` with `records`.
    pub fn write_combined(
        &self,
        backend: Backend,
        records: &[&BenchmarkRecord],
    ) -> Result<PathBuf, SinkError> {
        let path = self.combined_path(backend);
        write_atomic(&path, records)?;
        tracing::debug!(
            backend = %backend,
            records = records.len(),
            path = %path.display(),
            "Combined file written"
        );
        Ok(path)
    }

    /// Read a record array back from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Vec<BenchmarkRecord>, SinkError> {
        let file = File::open(path)?;
        let records = serde_json::from_reader(BufReader::new(file))?;
        Ok(records)
    }
}

fn write_atomic(path: &Path, records: &[&BenchmarkRecord]) -> Result<(), SinkError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let mut staged = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(staged.as_file_mut());
        let mut serializer =
            Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(INDENT));
        records.serialize(&mut serializer)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }

    staged.persist(path).map_err(|e| SinkError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}
