// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! End-to-end integration tests for crossbench.
//!
//! These tests drive the dispatcher with scripted providers and check what
//! lands in the accumulator and on disk.

use crossbench_core::catalog::{ARRAY_SIZES, ITERATION_COUNTS};
use crossbench_core::provider::InProcessProvider;
use crossbench_core::{
    run_request, Backend, BenchmarkKind, BenchmarkProvider, BenchmarkRequest, Config,
    ConfigLoader, CrossbenchError, Dispatcher, JsonSink, Parameter, RunContext, TrialError,
};
use tempfile::TempDir;

type Script = Box<dyn FnMut(BenchmarkKind, u64) -> Result<f64, TrialError>>;

/// Provider whose every answer comes from a closure.
struct ScriptedProvider {
    backend: Backend,
    script: Script,
}

impl ScriptedProvider {
    fn boxed(
        backend: Backend,
        script: impl FnMut(BenchmarkKind, u64) -> Result<f64, TrialError> + 'static,
    ) -> Box<dyn BenchmarkProvider> {
        Box::new(Self {
            backend,
            script: Box::new(script),
        })
    }
}

impl BenchmarkProvider for ScriptedProvider {
    fn backend(&self) -> Backend {
        self.backend
    }
    fn static_access(&mut self, v: u64) -> Result<f64, TrialError> {
        (self.script)(BenchmarkKind::StaticAccess, v)
    }
    fn dynamic_access(&mut self, v: u64) -> Result<f64, TrialError> {
        (self.script)(BenchmarkKind::DynamicAccess, v)
    }
    fn allocation(&mut self, v: u64) -> Result<f64, TrialError> {
        (self.script)(BenchmarkKind::Allocation, v)
    }
    fn deallocation(&mut self, v: u64) -> Result<f64, TrialError> {
        (self.script)(BenchmarkKind::Deallocation, v)
    }
    fn thread_creation(&mut self, v: u64) -> Result<f64, TrialError> {
        (self.script)(BenchmarkKind::ThreadCreation, v)
    }
    fn context_switch(&mut self, v: u64) -> Result<f64, TrialError> {
        (self.script)(BenchmarkKind::ContextSwitch, v)
    }
    fn thread_migration(&mut self, v: u64) -> Result<f64, TrialError> {
        (self.script)(BenchmarkKind::ThreadMigration, v)
    }
}

fn constant(backend: Backend) -> Box<dyn BenchmarkProvider> {
    ScriptedProvider::boxed(backend, |_, v| Ok(v as f64))
}

const TOTAL_POINTS: usize = 4 * ARRAY_SIZES.len() + 3 * ITERATION_COUNTS.len();

/// Test that "all kinds" runs in catalog order with disjoint parameters
#[test]
fn test_all_kinds_dispatch_in_catalog_order() {
    let mut ctx = RunContext::in_memory();
    let mut dispatcher = Dispatcher::new(constant(Backend::Rust));
    let request = BenchmarkRequest::parse("rust", 0, 3, 3.0).unwrap();

    let summary = dispatcher.run(&mut ctx, &request).unwrap();
    assert_eq!(summary.records_emitted, TOTAL_POINTS);

    let combined = ctx.accumulator().combine_all();
    let mut kinds: Vec<BenchmarkKind> = combined.iter().map(|r| r.kind).collect();
    kinds.dedup();
    assert_eq!(kinds, BenchmarkKind::ALL.to_vec());

    for record in &combined {
        let value = serde_json::to_value(record).unwrap();
        let object = value.as_object().unwrap();
        let has_size = object.contains_key("array_size");
        let has_iterations = object.contains_key("iterations");
        assert!(has_size != has_iterations, "{:?}", object);
        match record.kind.family() {
            crossbench_core::ParameterFamily::ArraySize => assert!(has_size),
            crossbench_core::ParameterFamily::Iterations => assert!(has_iterations),
        }
    }
}

/// Test the concrete trimming case end to end
#[test]
fn test_concrete_outlier_case() {
    let cycle = [1.0, 2.0, 3.0, 100.0];
    let mut call = 0usize;
    let provider = ScriptedProvider::boxed(Backend::C, move |_, _| {
        let sample = cycle[call % cycle.len()];
        call += 1;
        Ok(sample)
    });

    let mut ctx = RunContext::in_memory();
    let request = BenchmarkRequest::parse("c", 1, 4, 1.0).unwrap();
    Dispatcher::new(provider).run(&mut ctx, &request).unwrap();

    for record in ctx.accumulator().category(BenchmarkKind::StaticAccess) {
        assert_eq!(record.trials_requested, 4);
        assert_eq!(record.trials_retained, 3);
        assert_eq!(record.average_time, 2.0);
        assert_eq!(record.outlier_threshold, 1.0);
    }
}

/// Test that an all-outlier point never produces a record, on any rerun
#[test]
fn test_all_outlier_point_is_skipped() {
    let mut flip = false;
    let provider = ScriptedProvider::boxed(Backend::Rust, move |_, v| {
        if v == 100 {
            flip = !flip;
            Ok(if flip { 1.0 } else { 3.0 })
        } else {
            Ok(5.0)
        }
    });

    let mut ctx = RunContext::in_memory();
    let mut dispatcher = Dispatcher::new(provider);
    let request = BenchmarkRequest::parse("rust", 2, 6, 0.0).unwrap();

    let first = dispatcher.run(&mut ctx, &request).unwrap();
    assert_eq!(first.points_skipped, 1);
    assert_eq!(first.records_emitted, ARRAY_SIZES.len() - 1);

    let second = dispatcher.run(&mut ctx, &request).unwrap();
    assert_eq!(second.points_skipped, 1);

    let category = ctx.accumulator().category(BenchmarkKind::DynamicAccess);
    assert_eq!(category.len(), 2 * (ARRAY_SIZES.len() - 1));
    assert!(category
        .iter()
        .all(|r| r.parameter != Parameter::ArraySize(100)));
}

/// Test that failed trials reduce passed_tests without aborting the sweep
#[test]
fn test_trial_failures_reduce_passed_tests() {
    let mut call = 0u32;
    let provider = ScriptedProvider::boxed(Backend::Cpp, move |_, v| {
        call += 1;
        if call % 4 == 0 {
            Err(TrialError::Interrupted { reason: "scripted" })
        } else {
            Ok(v as f64)
        }
    });

    let mut ctx = RunContext::in_memory();
    let request = BenchmarkRequest::parse("cpp", 6, 8, 3.0).unwrap();
    let summary = Dispatcher::new(provider).run(&mut ctx, &request).unwrap();

    assert_eq!(summary.trials_failed, 2 * ITERATION_COUNTS.len());
    let category = ctx.accumulator().category(BenchmarkKind::ContextSwitch);
    assert_eq!(category.len(), ITERATION_COUNTS.len());
    for record in category {
        assert_eq!(record.trials_requested, 8);
        assert_eq!(record.trials_retained, 6);
        assert_eq!(record.std_deviation, 0.0);
    }
}

/// Test per-category and combined files after a full run
#[test]
fn test_result_files_written() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let sink = JsonSink::new(temp_dir.path()).unwrap();
    let mut ctx = RunContext::new(sink.clone());
    let mut dispatcher = Dispatcher::new(constant(Backend::C));
    let request = BenchmarkRequest::parse("c", 0, 2, 3.0).unwrap();

    let summary = dispatcher.run(&mut ctx, &request).unwrap();
    assert_eq!(summary.sink_failures, 0);

    for kind in BenchmarkKind::ALL {
        let path = sink.category_path(Backend::C, kind);
        let loaded = JsonSink::load(&path).expect("category file missing");
        let expected: Vec<_> = ctx
            .records_for(kind, Backend::C)
            .into_iter()
            .cloned()
            .collect();
        assert_eq!(loaded, expected, "{}", kind);
    }

    let combined = JsonSink::load(sink.combined_path(Backend::C)).unwrap();
    assert_eq!(combined.len(), TOTAL_POINTS);
    assert_eq!(combined[0].kind, BenchmarkKind::StaticAccess);
    assert_eq!(combined[TOTAL_POINTS - 1].kind, BenchmarkKind::ThreadMigration);
}

/// Test that a single-kind run leaves the combined file alone
#[test]
fn test_single_kind_does_not_write_combined() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let sink = JsonSink::new(temp_dir.path()).unwrap();
    let mut ctx = RunContext::new(sink.clone());
    let request = BenchmarkRequest::parse("rust", 4, 2, 3.0).unwrap();

    Dispatcher::new(constant(Backend::Rust))
        .run(&mut ctx, &request)
        .unwrap();

    assert!(sink
        .category_path(Backend::Rust, BenchmarkKind::Deallocation)
        .exists());
    assert!(!sink.combined_path(Backend::Rust).exists());
}

/// Test that a failed write keeps the records in memory
#[test]
fn test_sink_failure_does_not_roll_back() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let sink = JsonSink::new(temp_dir.path()).unwrap();
    // A regular file where the backend directory should be.
    std::fs::write(sink.backend_dir(Backend::Rust), b"not a directory").unwrap();

    let mut ctx = RunContext::new(sink);
    let request = BenchmarkRequest::parse("rust", 1, 2, 3.0).unwrap();
    let summary = Dispatcher::new(constant(Backend::Rust))
        .run(&mut ctx, &request)
        .unwrap();

    assert_eq!(summary.records_emitted, ARRAY_SIZES.len());
    assert_eq!(summary.sink_failures, ARRAY_SIZES.len());
    assert_eq!(
        ctx.accumulator().category(BenchmarkKind::StaticAccess).len(),
        ARRAY_SIZES.len()
    );
}

/// Test that a missing native library fails the request cleanly
#[test]
fn test_native_initialize_failure() {
    let config = ConfigLoader::load_string(
        "native:\n  c_library: /nonexistent/libcrossbench_c.so\n",
    )
    .unwrap();
    let mut ctx = RunContext::in_memory();
    let request = BenchmarkRequest::parse("c", 0, 5, 3.0).unwrap();

    let err = run_request(&config, &mut ctx, &request).unwrap_err();
    assert!(matches!(err, CrossbenchError::Init(_)));
    assert!(err.to_string().contains("libcrossbench_c.so"));
    assert!(ctx.accumulator().is_empty());
}

/// Test configuration loading from disk
#[test]
fn test_config_loading_from_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("crossbench.yaml");
    std::fs::write(
        &config_path,
        r#"
run:
  output_dir: results
  trials: 7
  outlier_threshold: 1.5
native:
  cpp_library: ./libcrossbench_cpp.so
"#,
    )
    .expect("Failed to write config");

    let config = ConfigLoader::load_file(&config_path).expect("Failed to load config");
    assert_eq!(config.run.trials.get(), 7);
    assert_eq!(config.run.outlier_threshold.get(), 1.5);
    assert_eq!(config.native.c_library, Config::default().native.c_library);
}

/// Test the in-process backend end to end on the context-switch sweep
#[test]
fn test_in_process_context_switch_sweep() {
    let mut ctx = RunContext::in_memory();
    let mut dispatcher = Dispatcher::new(Box::new(InProcessProvider::with_capacity(16)));
    let request = BenchmarkRequest::parse("rust", 6, 2, f64::INFINITY).unwrap();

    let summary = dispatcher.run(&mut ctx, &request).unwrap();
    assert_eq!(summary.trials_failed, 0);
    assert_eq!(summary.records_emitted, ITERATION_COUNTS.len());
    for record in ctx.accumulator().category(BenchmarkKind::ContextSwitch) {
        assert_eq!(record.trials_retained, 2);
        assert!(record.average_time > 0.0);
    }
}

/// Test that an unbounded threshold is written to disk and read back intact
#[test]
fn test_infinite_threshold_result_file_reloads() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let sink = JsonSink::new(temp_dir.path()).unwrap();
    let mut ctx = RunContext::new(sink.clone());
    let mut dispatcher = Dispatcher::new(Box::new(InProcessProvider::with_capacity(16)));
    let request = BenchmarkRequest::parse("rust", 5, 2, f64::INFINITY).unwrap();

    let summary = dispatcher.run(&mut ctx, &request).unwrap();
    assert_eq!(summary.sink_failures, 0);
    assert_eq!(summary.records_emitted, ITERATION_COUNTS.len());

    let path = sink.category_path(Backend::Rust, BenchmarkKind::ThreadCreation);
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"outlier_threshold\": \"inf\""));
    assert!(!raw.contains("null"));

    let loaded = JsonSink::load(&path).expect("category file should reload");
    assert_eq!(loaded.len(), ITERATION_COUNTS.len());
    for record in &loaded {
        assert_eq!(record.outlier_threshold, f64::INFINITY);
        assert_eq!(record.trials_retained, 2);
    }
}
