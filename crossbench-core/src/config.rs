// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! YAML configuration parser with strict validation.
//!
//! Every field has a default, so an empty document is a valid configuration.
//! Any invalid field results in a HardValidationError before anything runs.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CrossbenchError, CrossbenchResult, HardValidationError};
use crate::types::{OutlierThreshold, TrialCount, DEFAULT_OUTLIER_THRESHOLD, DEFAULT_TRIALS};

/// Upper bound on explicit warm-up trials per parameter point.
pub const MAX_WARMUP_TRIALS: u32 = 10_000;

/// Raw run settings as parsed from YAML (before validation).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRunConfig {
    #[serde(default = "default_output_dir")]
    output_dir: String,
    #[serde(default = "default_trials")]
    trials: u32,
    #[serde(default = "default_outlier_threshold")]
    outlier_threshold: f64,
    #[serde(default)]
    warmup_trials: u32,
}

fn default_output_dir() -> String {
    "measurements".to_string()
}

fn default_trials() -> u32 {
    DEFAULT_TRIALS
}

fn default_outlier_threshold() -> f64 {
    DEFAULT_OUTLIER_THRESHOLD
}

impl Default for RawRunConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            trials: default_trials(),
            outlier_threshold: default_outlier_threshold(),
            warmup_trials: 0,
        }
    }
}

/// Raw native library locations.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawNativeConfig {
    #[serde(default = "default_c_library")]
    c_library: String,
    #[serde(default = "default_cpp_library")]
    cpp_library: String,
}

fn default_c_library() -> String {
    "libcrossbench_c.so".to_string()
}

fn default_cpp_library() -> String {
    "libcrossbench_cpp.so".to_string()
}

impl Default for RawNativeConfig {
    fn default() -> Self {
        Self {
            c_library: default_c_library(),
            cpp_library: default_cpp_library(),
        }
    }
}

/// Raw root configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    run: RawRunConfig,
    #[serde(default)]
    native: RawNativeConfig,
}

/// Validated run settings.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Root of the per-backend measurement directories.
    pub output_dir: PathBuf,
    pub trials: TrialCount,
    pub outlier_threshold: OutlierThreshold,
    /// Untimed-in-output trials run before each parameter point.
    pub warmup_trials: u32,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(default_output_dir()),
            trials: TrialCount::default(),
            outlier_threshold: OutlierThreshold::default(),
            warmup_trials: 0,
        }
    }
}

/// Validated native library locations.
///
/// Bare file names are resolved by the dynamic loader's search path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeConfig {
    pub c_library: PathBuf,
    pub cpp_library: PathBuf,
}

impl Default for NativeConfig {
    fn default() -> Self {
        Self {
            c_library: PathBuf::from(default_c_library()),
            cpp_library: PathBuf::from(default_cpp_library()),
        }
    }
}

/// Complete validated configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub run: RunSettings,
    pub native: NativeConfig,
}

/// Configuration loader with strict validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> CrossbenchResult<Config> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(CrossbenchError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CrossbenchError::Io {
            context: "reading config file",
            source: e,
        })?;

        Self::load_string(&content)
    }

    /// Load and validate configuration from a YAML string.
    pub fn load_string(content: &str) -> CrossbenchResult<Config> {
        if content.trim().is_empty() {
            return Self::validate(RawConfig::default());
        }

        let raw: RawConfig =
            serde_yaml::from_str(content).map_err(|e| CrossbenchError::ConfigParse {
                message: format!("YAML parse error: {}", e),
            })?;

        Self::validate(raw)
    }

    fn validate(raw: RawConfig) -> CrossbenchResult<Config> {
        Ok(Config {
            run: Self::validate_run(raw.run)?,
            native: Self::validate_native(raw.native)?,
        })
    }

    fn validate_run(raw: RawRunConfig) -> CrossbenchResult<RunSettings> {
        if raw.output_dir.trim().is_empty() {
            return Err(HardValidationError::InvalidFieldValue {
                field: "output_dir",
                value: raw.output_dir,
                reason: "Output directory cannot be empty".to_string(),
            }
            .into());
        }

        let trials = TrialCount::new(raw.trials)?;
        let outlier_threshold = OutlierThreshold::new(raw.outlier_threshold)?;

        if raw.warmup_trials > MAX_WARMUP_TRIALS {
            return Err(HardValidationError::InvalidFieldValue {
                field: "warmup_trials",
                value: raw.warmup_trials.to_string(),
                reason: format!("Must not exceed {}", MAX_WARMUP_TRIALS),
            }
            .into());
        }

        Ok(RunSettings {
            output_dir: PathBuf::from(raw.output_dir),
            trials,
            outlier_threshold,
            warmup_trials: raw.warmup_trials,
        })
    }

    fn validate_native(raw: RawNativeConfig) -> CrossbenchResult<NativeConfig> {
        for (field, value) in [("c_library", &raw.c_library), ("cpp_library", &raw.cpp_library)] {
            if value.trim().is_empty() {
                return Err(HardValidationError::InvalidFieldValue {
                    field,
                    value: value.clone(),
                    reason: "Library path cannot be empty".to_string(),
                }
                .into());
            }
        }

        Ok(NativeConfig {
            c_library: PathBuf::from(raw.c_library),
            cpp_library: PathBuf::from(raw.cpp_library),
        })
    }
}
