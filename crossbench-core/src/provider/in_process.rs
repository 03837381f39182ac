// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! The Rust backend: every kind runs inside the harness process.

use crate::catalog::MAX_ARRAY_SIZE;
use crate::error::TrialError;
use crate::types::Backend;
use crate::workload::{memory, migration, threads, StaticRegion};

use super::BenchmarkProvider;

/// In-process provider.
///
/// Owns the long-lived static region, so the region is sized once for the
/// whole catalog and outlives every static-access trial.
pub struct InProcessProvider {
    region: StaticRegion,
}

impl InProcessProvider {
    pub fn new() -> Self {
        Self::with_capacity(MAX_ARRAY_SIZE as usize)
    }

    /// Provider whose static region holds `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        tracing::debug!(capacity, "Allocating static region");
        Self {
            region: StaticRegion::new(capacity),
        }
    }
}

impl Default for InProcessProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn array_len(array_size: u64) -> Result<usize, TrialError> {
    usize::try_from(array_size).map_err(|_| TrialError::ParameterOutOfRange { value: array_size })
}

impl BenchmarkProvider for InProcessProvider {
    fn backend(&self) -> Backend {
        Backend::Rust
    }

    fn static_access(&mut self, array_size: u64) -> Result<f64, TrialError> {
        self.region.access(array_len(array_size)?)
    }

    fn dynamic_access(&mut self, array_size: u64) -> Result<f64, TrialError> {
        memory::dynamic_access(array_len(array_size)?)
    }

    fn allocation(&mut self, array_size: u64) -> Result<f64, TrialError> {
        memory::allocation(array_len(array_size)?)
    }

    fn deallocation(&mut self, array_size: u64) -> Result<f64, TrialError> {
        memory::deallocation(array_len(array_size)?)
    }

    fn thread_creation(&mut self, iterations: u64) -> Result<f64, TrialError> {
        threads::thread_creation(iterations)
    }

    fn context_switch(&mut self, iterations: u64) -> Result<f64, TrialError> {
        threads::context_switch(iterations)
    }

    fn thread_migration(&mut self, iterations: u64) -> Result<f64, TrialError> {
        migration::thread_migration(iterations)
    }
}
