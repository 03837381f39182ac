// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Host description logged at the start of every run.

use serde::Serialize;
use sysinfo::System;

/// Machine the measurements were taken on.
#[derive(Debug, Clone, Serialize)]
pub struct HostInfo {
    /// Operating system name
    pub os: String,
    /// OS version
    pub os_version: String,
    /// Kernel version (Linux)
    pub kernel_version: Option<String>,
    /// CPU model name
    pub cpu_model: String,
    /// Number of logical CPUs
    pub cpu_cores: usize,
    /// Total system memory in bytes
    pub memory_bytes: u64,
    pub hostname: String,
}

impl HostInfo {
    /// Collect current host information.
    pub fn collect() -> Self {
        let sys = System::new_all();

        Self {
            os: System::name().unwrap_or_else(|| "Unknown".to_string()),
            os_version: System::os_version().unwrap_or_else(|| "Unknown".to_string()),
            kernel_version: System::kernel_version(),
            cpu_model: sys
                .cpus()
                .first()
                .map(|cpu| cpu.brand().trim().to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
            cpu_cores: sys.cpus().len(),
            memory_bytes: sys.total_memory(),
            hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
        }
    }

    /// Emit one structured log line describing the host.
    pub fn log(&self) {
        tracing::info!(
            os = %self.os,
            os_version = %self.os_version,
            kernel = self.kernel_version.as_deref().unwrap_or("unknown"),
            cpu = %self.cpu_model,
            cores = self.cpu_cores,
            memory_mib = self.memory_bytes / (1024 * 1024),
            "Host"
        );
    }
}
