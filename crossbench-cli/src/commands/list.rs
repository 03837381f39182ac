// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `crossbench list` command - Show the benchmark catalog.

use crossbench_core::{Backend, BenchmarkKind};

pub fn execute() -> anyhow::Result<()> {
    println!("╔═══════╦═══════════════════════╦════════════╦════════════════════════════════════════╗");
    println!("║ Index ║ Kind                  ║ Sweep      ║ Values                                 ║");
    println!("╠═══════╬═══════════════════════╬════════════╬════════════════════════════════════════╣");
    println!("║ {:<5} ║ {:<21} ║ {:<10} ║ {:<38} ║", 0, "(all kinds)", "-", "-");

    for kind in BenchmarkKind::ALL {
        let family = kind.family();
        let values = family
            .values()
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");

        println!(
            "║ {:<5} ║ {:<21} ║ {:<10} ║ {:<38} ║",
            kind.index(),
            kind.display_name(),
            family.field_name(),
            values
        );
    }

    println!("╚═══════╩═══════════════════════╩════════════╩════════════════════════════════════════╝");
    println!();

    let backends = Backend::ALL
        .iter()
        .map(|b| {
            if b.is_native() {
                format!("{} (native library)", b)
            } else {
                format!("{} (in-process)", b)
            }
        })
        .collect::<Vec<_>>();
    println!("Backends: {}", backends.join(", "));

    Ok(())
}
