//! Crossbench Core Library
//!
//! Measures low-level runtime costs (memory access, allocation, thread
//! creation, context switching, thread migration) on several backends and
//! reduces them into a uniform record set. Provides the statistics engine,
//! the fixed benchmark catalog, the provider interface, the dispatcher,
//! and the JSON result sink.

pub mod accumulator;
pub mod catalog;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod provider;
pub mod record;
pub mod sink;
pub mod stats;
pub mod timing;
pub mod types;
pub mod workload;

// Re-export commonly used types
pub use accumulator::ResultAccumulator;
pub use catalog::{BenchmarkKind, KindSelector, Parameter, ParameterFamily, SweepPoint};
pub use config::{Config, ConfigLoader, NativeConfig, RunSettings};
pub use context::RunContext;
pub use dispatcher::{run_request, BenchmarkRequest, Dispatcher, RunSummary};
pub use error::{
    CrossbenchError, CrossbenchResult, HardValidationError, InitError, SinkError, TrialError,
};
pub use provider::{initialize, BenchmarkProvider};
pub use record::BenchmarkRecord;
pub use sink::JsonSink;
pub use types::{Backend, OutlierThreshold, TrialCount};
