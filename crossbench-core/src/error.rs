// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Custom error types for crossbench.
//!
//! Every failure is an explicit enum variant, scoped to the smallest unit it
//! affects: a request, a provider, a single trial, or a single file write.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type. Anything surfacing here fails the whole request
/// before a single sample is taken.
#[derive(Debug, Error)]
pub enum CrossbenchError {
    // =========================================================================
    // Configuration Errors - Fail-Fast, Nothing Measured
    // =========================================================================
    #[error("Hard validation error: {0}")]
    HardValidation(#[from] HardValidationError),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    // =========================================================================
    // Provider Initialization
    // =========================================================================
    #[error("Provider initialization failed: {0}")]
    Init(#[from] InitError),

    // =========================================================================
    // System Errors
    // =========================================================================
    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Invalid request or configuration input.
#[derive(Debug, Error)]
pub enum HardValidationError {
    #[error("Unknown backend: '{name}' (expected one of: Rust, C, C++)")]
    UnknownBackend { name: String },

    #[error("Unknown benchmark kind selector: {index} (expected 0..=7)")]
    UnknownBenchmarkKind { index: u32 },

    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Request targets backend {requested} but the provider serves {provider}")]
    BackendMismatch {
        requested: &'static str,
        provider: &'static str,
    },
}

/// Failure to bring a provider up. Recoverable: the caller decides whether
/// to try another backend.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("Failed to load native library {path}: {reason}")]
    LibraryLoad { path: PathBuf, reason: String },

    #[error("Native library {path} does not export symbol '{symbol}'")]
    MissingSymbol { path: PathBuf, symbol: &'static str },

    #[error("Invalid native library path {path}: {reason}")]
    InvalidPath { path: PathBuf, reason: String },
}

/// Failure of a single trial. The dispatcher drops the sample and carries on.
#[derive(Debug, Error)]
pub enum TrialError {
    #[error("Wait interrupted: {reason}")]
    Interrupted { reason: &'static str },

    #[error("Failed to spawn {worker} thread: {source}")]
    Spawn {
        worker: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Worker thread '{worker}' panicked")]
    WorkerPanicked { worker: &'static str },

    #[error("Failed to set CPU affinity to CPU {cpu}: {source}")]
    Affinity {
        cpu: usize,
        #[source]
        source: nix::Error,
    },

    #[error("No CPU available for migration: {reason}")]
    NoCpuAvailable { reason: String },

    #[error("Native routine '{symbol}' reported failure (returned {value})")]
    Native { symbol: &'static str, value: f64 },

    #[error("Parameter {value} is out of range for the native call boundary")]
    ParameterOutOfRange { value: u64 },

    #[error("Parameter must be non-zero")]
    ZeroParameter,
}

/// Failure to persist records. Logged, never rolled back into the accumulator.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Result file IO failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize records: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to replace {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using CrossbenchError.
pub type CrossbenchResult<T> = Result<T, CrossbenchError>;
