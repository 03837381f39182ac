// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `crossbench run` command - Dispatch one benchmark request.

use std::path::PathBuf;

use anyhow::Context;
use crossbench_core::{run_request, BenchmarkRecord, BenchmarkRequest, Config, JsonSink, RunContext};

use crate::format::format_ns;
use crate::host::HostInfo;

/// Raw `run` arguments; unset overrides fall back to the configuration.
pub struct RunArgs {
    pub backend: String,
    pub kind: u32,
    pub trials: Option<u32>,
    pub threshold: Option<f64>,
    pub output: Option<PathBuf>,
}

pub fn execute(config: &Config, args: RunArgs) -> anyhow::Result<()> {
    let request = BenchmarkRequest::parse(
        &args.backend,
        args.kind,
        args.trials.unwrap_or(config.run.trials.get()),
        args.threshold.unwrap_or(config.run.outlier_threshold.get()),
    )
    .context("invalid benchmark request")?;

    let output_dir = args.output.unwrap_or_else(|| config.run.output_dir.clone());
    let sink = JsonSink::new(&output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    HostInfo::collect().log();

    let mut ctx = RunContext::new(sink);
    let summary = run_request(config, &mut ctx, &request)?;

    let elapsed = chrono::Utc::now() - ctx.started_at();
    tracing::info!(
        backend = %request.backend,
        records = summary.records_emitted,
        skipped = summary.points_skipped,
        failed_trials = summary.trials_failed,
        sink_failures = summary.sink_failures,
        elapsed_s = elapsed.num_seconds(),
        "Run complete"
    );

    print_records(&ctx.accumulator().combine_for(request.backend));
    println!();
    println!(
        "Records: {}  Skipped points: {}  Failed trials: {}  Write failures: {}",
        summary.records_emitted,
        summary.points_skipped,
        summary.trials_failed,
        summary.sink_failures
    );
    println!("Results: {}", output_dir.display());

    if summary.sink_failures > 0 {
        anyhow::bail!("{} result file(s) could not be written", summary.sink_failures);
    }
    Ok(())
}

fn print_records(records: &[&BenchmarkRecord]) {
    if records.is_empty() {
        println!("No records were produced.");
        return;
    }

    println!("╔═══════════════════════╦════════════════════╦══════════╦══════════════╦══════════════╗");
    println!("║ Kind                  ║ Parameter          ║ Passed   ║ Average      ║ Std dev      ║");
    println!("╠═══════════════════════╬════════════════════╬══════════╬══════════════╬══════════════╣");

    for record in records {
        println!(
            "║ {:<21} ║ {:<18} ║ {:>3}/{:<4} ║ {:>12} ║ {:>12} ║",
            record.kind.display_name(),
            record.parameter.to_string(),
            record.trials_retained,
            record.trials_requested,
            format_ns(record.average_time),
            format_ns(record.std_deviation),
        );
    }

    println!("╚═══════════════════════╩════════════════════╩══════════╩══════════════╩══════════════╝");
}
