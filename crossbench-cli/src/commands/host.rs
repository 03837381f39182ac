// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `crossbench host` command - Show host information.

use crate::format::format_bytes;
use crate::host::HostInfo;

pub fn execute(json: bool) -> anyhow::Result<()> {
    let info = HostInfo::collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Host:    {}", info.hostname);
    println!("OS:      {} {}", info.os, info.os_version);
    println!(
        "Kernel:  {}",
        info.kernel_version.as_deref().unwrap_or("unknown")
    );
    println!("CPU:     {} ({} logical)", info.cpu_model, info.cpu_cores);
    println!("Memory:  {}", format_bytes(info.memory_bytes));
    Ok(())
}
