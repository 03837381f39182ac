// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `crossbench validate` command - Validate configuration file.

use std::path::Path;

use crossbench_core::ConfigLoader;

pub fn execute(file: &Path) -> anyhow::Result<()> {
    tracing::info!(file = %file.display(), "Validating configuration");

    match ConfigLoader::load_file(file) {
        Ok(config) => {
            println!("✓ Configuration is valid");
            println!();
            println!("Run Settings:");
            println!("  Output Directory:  {}", config.run.output_dir.display());
            println!("  Trials:            {}", config.run.trials);
            println!("  Outlier Threshold: {}", config.run.outlier_threshold);
            println!("  Warm-up Trials:    {}", config.run.warmup_trials);
            println!();
            println!("Native Libraries:");
            println!("  C:   {}", config.native.c_library.display());
            println!("  C++: {}", config.native.cpp_library.display());
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed:");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}
