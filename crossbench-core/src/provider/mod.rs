// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Backend capability interface.
//!
//! Every backend exposes one measurement per catalog kind. The dispatcher is
//! polymorphic over [`BenchmarkProvider`] and only ever routes through
//! [`BenchmarkProvider::measure`].

pub mod in_process;
pub mod native;

pub use in_process::InProcessProvider;
pub use native::NativeProvider;

use crate::catalog::{BenchmarkKind, SweepPoint};
use crate::config::NativeConfig;
use crate::error::{InitError, TrialError};
use crate::types::Backend;

/// One execution backend able to run every catalog kind.
///
/// Size-swept methods return nanoseconds per element; iteration-swept
/// methods return nanoseconds per iteration, already averaged inside the
/// provider.
pub trait BenchmarkProvider {
    /// Backend identifier written to every record this provider produces.
    fn backend(&self) -> Backend;

    fn static_access(&mut self, array_size: u64) -> Result<f64, TrialError>;
    fn dynamic_access(&mut self, array_size: u64) -> Result<f64, TrialError>;
    fn allocation(&mut self, array_size: u64) -> Result<f64, TrialError>;
    fn deallocation(&mut self, array_size: u64) -> Result<f64, TrialError>;
    fn thread_creation(&mut self, iterations: u64) -> Result<f64, TrialError>;
    fn context_switch(&mut self, iterations: u64) -> Result<f64, TrialError>;
    fn thread_migration(&mut self, iterations: u64) -> Result<f64, TrialError>;

    /// Run one trial of one sweep point.
    fn measure(&mut self, point: SweepPoint) -> Result<f64, TrialError> {
        let value = point.parameter.value();
        match point.kind {
            BenchmarkKind::StaticAccess => self.static_access(value),
            BenchmarkKind::DynamicAccess => self.dynamic_access(value),
            BenchmarkKind::Allocation => self.allocation(value),
            BenchmarkKind::Deallocation => self.deallocation(value),
            BenchmarkKind::ThreadCreation => self.thread_creation(value),
            BenchmarkKind::ContextSwitch => self.context_switch(value),
            BenchmarkKind::ThreadMigration => self.thread_migration(value),
        }
    }
}

/// Bring up the provider for `backend`.
///
/// Native backends load their library here, so a missing library or symbol
/// is reported before anything is measured.
pub fn initialize(
    backend: Backend,
    native: &NativeConfig,
) -> Result<Box<dyn BenchmarkProvider>, InitError> {
    let provider: Box<dyn BenchmarkProvider> = match backend {
        Backend::Rust => Box::new(InProcessProvider::new()),
        Backend::C => Box::new(NativeProvider::load(backend, &native.c_library)?),
        Backend::Cpp => Box::new(NativeProvider::load(backend, &native.cpp_library)?),
    };

    tracing::info!(backend = %backend, "Provider initialized");
    Ok(provider)
}
