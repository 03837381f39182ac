// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Sweep execution.
//!
//! The dispatcher runs one kind, one parameter point, one trial at a time on
//! the calling thread. For every point it collects the requested number of
//! samples, trims them once and emits at most one record.

use crate::catalog::{BenchmarkKind, KindSelector, SweepPoint};
use crate::config::Config;
use crate::context::RunContext;
use crate::error::{CrossbenchResult, HardValidationError};
use crate::provider::{self, BenchmarkProvider};
use crate::record::BenchmarkRecord;
use crate::stats;
use crate::types::{Backend, OutlierThreshold, TrialCount};

/// Validated input of one dispatcher run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchmarkRequest {
    pub backend: Backend,
    pub kinds: KindSelector,
    pub trials: TrialCount,
    pub threshold: OutlierThreshold,
}

impl BenchmarkRequest {
    pub fn new(
        backend: Backend,
        kinds: KindSelector,
        trials: TrialCount,
        threshold: OutlierThreshold,
    ) -> Self {
        Self {
            backend,
            kinds,
            trials,
            threshold,
        }
    }

    /// Validate raw request inputs. `kind_index` 0 selects every kind.
    pub fn parse(
        backend: &str,
        kind_index: u32,
        trials: u32,
        threshold: f64,
    ) -> Result<Self, HardValidationError> {
        Ok(Self {
            backend: Backend::parse(backend)?,
            kinds: KindSelector::from_index(kind_index)?,
            trials: TrialCount::new(trials)?,
            threshold: OutlierThreshold::new(threshold)?,
        })
    }
}

/// Counters describing what one run produced.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Records appended to the accumulator.
    pub records_emitted: usize,
    /// Points where no sample survived (failures or trimming).
    pub points_skipped: usize,
    /// Individual trials dropped because the provider call failed.
    pub trials_failed: usize,
    /// Result files that could not be written.
    pub sink_failures: usize,
}

impl RunSummary {
    fn merge(&mut self, other: RunSummary) {
        self.records_emitted += other.records_emitted;
        self.points_skipped += other.points_skipped;
        self.trials_failed += other.trials_failed;
        self.sink_failures += other.sink_failures;
    }
}

/// Routes requests to one provider and folds results into a [`RunContext`].
pub struct Dispatcher {
    provider: Box<dyn BenchmarkProvider>,
    warmup_trials: u32,
}

impl Dispatcher {
    pub fn new(provider: Box<dyn BenchmarkProvider>) -> Self {
        Self {
            provider,
            warmup_trials: 0,
        }
    }

    /// Run `trials` discarded trials before sampling each point.
    pub fn with_warmup(mut self, trials: u32) -> Self {
        self.warmup_trials = trials;
        self
    }

    pub fn backend(&self) -> Backend {
        self.provider.backend()
    }

    /// Execute `request` against this dispatcher's provider.
    ///
    /// Only a backend mismatch fails the call. Trial failures, empty trims
    /// and file errors are counted in the returned summary.
    pub fn run(
        &mut self,
        ctx: &mut RunContext,
        request: &BenchmarkRequest,
    ) -> CrossbenchResult<RunSummary> {
        let backend = self.provider.backend();
        if request.backend != backend {
            return Err(HardValidationError::BackendMismatch {
                requested: request.backend.as_str(),
                provider: backend.as_str(),
            }
            .into());
        }

        tracing::info!(
            backend = %backend,
            kinds = ?request.kinds,
            trials = request.trials.get(),
            threshold = request.threshold.get(),
            warmup = self.warmup_trials,
            "Starting benchmark run"
        );

        let mut summary = RunSummary::default();
        for kind in request.kinds.kinds() {
            let kind_summary = self.run_kind(ctx, request, kind);
            tracing::info!(
                backend = %backend,
                kind = %kind,
                records = kind_summary.records_emitted,
                skipped = kind_summary.points_skipped,
                "Kind complete"
            );
            summary.merge(kind_summary);
        }

        if request.kinds.is_all() {
            match ctx.write_combined(backend) {
                Ok(Some(path)) => {
                    tracing::info!(backend = %backend, path = %path.display(), "Combined results written")
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(backend = %backend, error = %e, "Failed to write combined results");
                    summary.sink_failures += 1;
                }
            }
        }

        Ok(summary)
    }

    fn run_kind(
        &mut self,
        ctx: &mut RunContext,
        request: &BenchmarkRequest,
        kind: BenchmarkKind,
    ) -> RunSummary {
        let mut summary = RunSummary::default();
        for point in kind.sweep() {
            self.run_point(ctx, request, point, &mut summary);
        }
        summary
    }

    fn run_point(
        &mut self,
        ctx: &mut RunContext,
        request: &BenchmarkRequest,
        point: SweepPoint,
        summary: &mut RunSummary,
    ) {
        let backend = self.provider.backend();
        let trials = request.trials.get();
        let threshold = request.threshold.get();

        self.warm_up(point);
        let (samples, failed) = self.collect_samples(point, trials);
        summary.trials_failed += failed;
        if failed > 0 {
            tracing::warn!(
                backend = %backend,
                kind = %point.kind,
                parameter = %point.parameter,
                failed,
                trials,
                "Trials failed and were dropped"
            );
        }

        let trimmed = stats::trim(&samples, threshold);
        let Some(reduced) = stats::summarize(&trimmed.retained) else {
            tracing::warn!(
                backend = %backend,
                kind = %point.kind,
                parameter = %point.parameter,
                collected = samples.len(),
                lower_bound = trimmed.lower_bound,
                upper_bound = trimmed.upper_bound,
                "No samples retained, skipping point"
            );
            summary.points_skipped += 1;
            return;
        };

        let record = BenchmarkRecord::new(
            backend,
            point,
            trials,
            trimmed.len() as u32,
            threshold,
            reduced,
        );
        tracing::info!(
            backend = %backend,
            kind = %point.kind,
            parameter = %point.parameter,
            passed = record.trials_retained,
            trials,
            average_ns = record.average_time,
            std_deviation_ns = record.std_deviation,
            "Point measured"
        );
        summary.records_emitted += 1;

        if let Err(e) = ctx.record(record) {
            tracing::error!(
                backend = %backend,
                kind = %point.kind,
                error = %e,
                "Failed to write category results"
            );
            summary.sink_failures += 1;
        }
    }

    fn warm_up(&mut self, point: SweepPoint) {
        for _ in 0..self.warmup_trials {
            if let Err(e) = self.provider.measure(point) {
                tracing::debug!(kind = %point.kind, parameter = %point.parameter, error = %e, "Warm-up trial failed");
            }
        }
    }

    /// Run `trials` independent trials; failed trials are dropped.
    fn collect_samples(&mut self, point: SweepPoint, trials: u32) -> (Vec<f64>, usize) {
        let mut samples = Vec::with_capacity(trials as usize);
        let mut failed = 0;
        for trial in 0..trials {
            match self.provider.measure(point) {
                Ok(nanos) => samples.push(nanos),
                Err(e) => {
                    tracing::debug!(
                        kind = %point.kind,
                        parameter = %point.parameter,
                        trial,
                        error = %e,
                        "Trial failed"
                    );
                    failed += 1;
                }
            }
        }
        (samples, failed)
    }
}

/// Initialize the provider for `request.backend` and dispatch `request`.
pub fn run_request(
    config: &Config,
    ctx: &mut RunContext,
    request: &BenchmarkRequest,
) -> CrossbenchResult<RunSummary> {
    let provider = provider::initialize(request.backend, &config.native)?;
    Dispatcher::new(provider)
        .with_warmup(config.run.warmup_trials)
        .run(ctx, request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CrossbenchError, TrialError};

    /// Returns the parameter value as the sample, or fails every trial.
    struct Echo {
        backend: Backend,
        fail: bool,
        calls: usize,
    }

    impl Echo {
        fn new(backend: Backend) -> Self {
            Self {
                backend,
                fail: false,
                calls: 0,
            }
        }

        fn answer(&mut self, value: u64) -> Result<f64, TrialError> {
            self.calls += 1;
            if self.fail {
                return Err(TrialError::Interrupted { reason: "scripted" });
            }
            Ok(value as f64)
        }
    }

    impl BenchmarkProvider for Echo {
        fn backend(&self) -> Backend {
            self.backend
        }
        fn static_access(&mut self, v: u64) -> Result<f64, TrialError> {
            self.answer(v)
        }
        fn dynamic_access(&mut self, v: u64) -> Result<f64, TrialError> {
            self.answer(v)
        }
        fn allocation(&mut self, v: u64) -> Result<f64, TrialError> {
            self.answer(v)
        }
        fn deallocation(&mut self, v: u64) -> Result<f64, TrialError> {
            self.answer(v)
        }
        fn thread_creation(&mut self, v: u64) -> Result<f64, TrialError> {
            self.answer(v)
        }
        fn context_switch(&mut self, v: u64) -> Result<f64, TrialError> {
            self.answer(v)
        }
        fn thread_migration(&mut self, v: u64) -> Result<f64, TrialError> {
            self.answer(v)
        }
    }

    #[test]
    fn test_parse_request() {
        let request = BenchmarkRequest::parse("c++", 6, 50, 2.0).unwrap();
        assert_eq!(request.backend, Backend::Cpp);
        assert_eq!(request.kinds, KindSelector::Single(BenchmarkKind::ContextSwitch));
        assert_eq!(request.trials.get(), 50);

        assert!(BenchmarkRequest::parse("java", 0, 10, 1.0).is_err());
        assert!(BenchmarkRequest::parse("rust", 8, 10, 1.0).is_err());
        assert!(BenchmarkRequest::parse("rust", 0, 0, 1.0).is_err());
        assert!(BenchmarkRequest::parse("rust", 0, 10, f64::NAN).is_err());
    }

    #[test]
    fn test_single_kind_sweeps_every_point() {
        let mut ctx = RunContext::in_memory();
        let mut dispatcher = Dispatcher::new(Box::new(Echo::new(Backend::Rust)));
        let request = BenchmarkRequest::parse("rust", 3, 4, 1.0).unwrap();

        let summary = dispatcher.run(&mut ctx, &request).unwrap();
        assert_eq!(summary.records_emitted, 8);
        assert_eq!(summary.points_skipped, 0);

        let records = ctx.accumulator().category(BenchmarkKind::Allocation);
        let sizes: Vec<u64> = records.iter().map(|r| r.parameter.value()).collect();
        assert_eq!(sizes, crate::catalog::ARRAY_SIZES.to_vec());
        assert!(records.iter().all(|r| r.trials_requested == 4 && r.trials_retained == 4));
        assert_eq!(records[3].average_time, 1_000.0);
    }

    #[test]
    fn test_warmup_trials_are_discarded() {
        let mut ctx = RunContext::in_memory();
        let mut dispatcher = Dispatcher::new(Box::new(Echo::new(Backend::Rust))).with_warmup(2);
        let request = BenchmarkRequest::parse("rust", 5, 3, 1.0).unwrap();

        dispatcher.run(&mut ctx, &request).unwrap();
        let records = ctx.accumulator().category(BenchmarkKind::ThreadCreation);
        assert_eq!(records.len(), 5);
        assert!(records.iter().all(|r| r.trials_requested == 3));
    }

    #[test]
    fn test_failing_provider_emits_nothing() {
        let mut ctx = RunContext::in_memory();
        let mut echo = Echo::new(Backend::C);
        echo.fail = true;
        let mut dispatcher = Dispatcher::new(Box::new(echo));
        let request = BenchmarkRequest::parse("c", 6, 5, 3.0).unwrap();

        let summary = dispatcher.run(&mut ctx, &request).unwrap();
        assert_eq!(summary.records_emitted, 0);
        assert_eq!(summary.points_skipped, 5);
        assert_eq!(summary.trials_failed, 25);
        assert!(ctx.accumulator().is_empty());
    }

    #[test]
    fn test_backend_mismatch_is_rejected() {
        let mut ctx = RunContext::in_memory();
        let mut dispatcher = Dispatcher::new(Box::new(Echo::new(Backend::Rust)));
        let request = BenchmarkRequest::parse("c", 0, 5, 3.0).unwrap();

        let result = dispatcher.run(&mut ctx, &request);
        assert!(matches!(
            result,
            Err(CrossbenchError::HardValidation(
                HardValidationError::BackendMismatch { .. }
            ))
        ));
        assert!(ctx.accumulator().is_empty());
    }

    #[test]
    fn test_run_request_fails_before_measuring() {
        let mut config = Config::default();
        config.native.c_library = "/nonexistent/libcrossbench_c.so".into();
        let mut ctx = RunContext::in_memory();
        let request = BenchmarkRequest::parse("c", 0, 5, 3.0).unwrap();

        let result = run_request(&config, &mut ctx, &request);
        assert!(matches!(result, Err(CrossbenchError::Init(_))));
        assert!(ctx.accumulator().is_empty());
    }
}
