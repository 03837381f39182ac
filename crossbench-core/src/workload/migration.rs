// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Thread migration via CPU affinity flips.
//!
//! A worker thread parks for the duration of the trial while the calling
//! thread moves it back and forth between two allowed CPUs.

use std::sync::mpsc;
use std::thread;

use nix::sched::{sched_getaffinity, sched_setaffinity, CpuSet};
use nix::unistd::{gettid, Pid};

use crate::error::TrialError;
use crate::timing::Timer;
use crate::workload::threads::trivial_workload;

const MIGRATION_WORKER: &str = "migration-worker";

/// CPUs the calling thread may run on, ascending.
pub fn allowed_cpus() -> Result<Vec<usize>, TrialError> {
    let set = sched_getaffinity(Pid::from_raw(0)).map_err(|e| TrialError::NoCpuAvailable {
        reason: format!("sched_getaffinity failed: {}", e),
    })?;

    let cpus: Vec<usize> = (0..CpuSet::count())
        .filter(|&cpu| set.is_set(cpu).unwrap_or(false))
        .collect();

    if cpus.is_empty() {
        return Err(TrialError::NoCpuAvailable {
            reason: "affinity mask is empty".to_string(),
        });
    }
    Ok(cpus)
}

/// The pair of CPUs a trial alternates between. With a single allowed CPU
/// both slots hold it.
fn migration_targets(allowed: &[usize]) -> Option<[usize; 2]> {
    let first = *allowed.first()?;
    let second = allowed.get(1).copied().unwrap_or(first);
    Some([first, second])
}

/// Pin one thread to one CPU.
fn pin_thread(tid: Pid, cpu: usize) -> Result<(), TrialError> {
    let mut cpuset = CpuSet::new();
    cpuset
        .set(cpu)
        .map_err(|source| TrialError::Affinity { cpu, source })?;
    sched_setaffinity(tid, &cpuset).map_err(|source| TrialError::Affinity { cpu, source })
}

/// Target for the `i`-th timed move. The worker starts on `targets[0]`, so
/// the first move goes to `targets[1]`.
fn target_for(targets: [usize; 2], i: u64) -> usize {
    targets[((i + 1) % 2) as usize]
}

fn flip_affinity(tid: Pid, targets: [usize; 2], iterations: u64) -> Result<f64, TrialError> {
    pin_thread(tid, targets[0])?;

    let timer = Timer::start();
    for i in 0..iterations {
        pin_thread(tid, target_for(targets, i))?;
    }
    Ok(timer.stop_per(iterations))
}

/// Time `iterations` affinity changes of a live worker thread; nanoseconds
/// per change.
pub fn thread_migration(iterations: u64) -> Result<f64, TrialError> {
    if iterations == 0 {
        return Err(TrialError::ZeroParameter);
    }

    let allowed = allowed_cpus()?;
    let targets = migration_targets(&allowed).ok_or_else(|| TrialError::NoCpuAvailable {
        reason: "affinity mask is empty".to_string(),
    })?;
    if targets[0] == targets[1] {
        tracing::debug!(cpu = targets[0], "Single allowed CPU, migration re-pins in place");
    }

    let (tid_tx, tid_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel::<()>();

    let worker = thread::Builder::new()
        .name(MIGRATION_WORKER.to_string())
        .spawn(move || {
            if tid_tx.send(gettid()).is_err() {
                return 0;
            }
            // Parked until the release sender drops.
            let _ = release_rx.recv();
            trivial_workload()
        })
        .map_err(|source| TrialError::Spawn {
            worker: MIGRATION_WORKER,
            source,
        })?;

    let outcome = tid_rx
        .recv()
        .map_err(|_| TrialError::Interrupted {
            reason: "migration worker exited before reporting its thread id",
        })
        .and_then(|tid| flip_affinity(tid, targets, iterations));

    drop(release_tx);
    let joined = worker.join().map_err(|_| TrialError::WorkerPanicked {
        worker: MIGRATION_WORKER,
    });

    let per_migration = outcome?;
    joined?;
    Ok(per_migration)
}
