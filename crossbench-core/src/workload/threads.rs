// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Iteration-swept thread workloads: creation cost and context switching.
//!
//! The context-switch measurement is a two-party ping-pong. A single mutex
//! guards the turn flag; each side has its own condition variable. A side
//! that does not hold the turn waits on its own condvar and re-checks the
//! predicate after every wake. On taking the turn it flips the flag, signals
//! the peer's condvar while still holding the lock, and only then releases.

use std::hint::black_box;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::error::TrialError;
use crate::timing::{measure, Timer};

const CREATION_WORKER: &str = "creation-worker";

/// Bounded no-op body run by every created thread.
pub(crate) fn trivial_workload() -> u64 {
    (0..1000u64).fold(0, |acc, x| acc + black_box(x))
}

/// Spawn and join `iterations` threads; nanoseconds per spawn+join pair.
pub fn thread_creation(iterations: u64) -> Result<f64, TrialError> {
    if iterations == 0 {
        return Err(TrialError::ZeroParameter);
    }

    let timer = Timer::start();
    for _ in 0..iterations {
        let handle = thread::Builder::new()
            .spawn(trivial_workload)
            .map_err(|source| TrialError::Spawn {
                worker: CREATION_WORKER,
                source,
            })?;
        let sum = handle.join().map_err(|_| TrialError::WorkerPanicked {
            worker: CREATION_WORKER,
        })?;
        black_box(sum);
    }
    Ok(timer.stop_per(iterations))
}

/// One of the two ping-pong participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }

    fn worker_name(self) -> &'static str {
        match self {
            Self::First => "switch-first",
            Self::Second => "switch-second",
        }
    }
}

#[derive(Debug)]
struct TurnState {
    first_holds_turn: bool,
    handoffs: u64,
    abandoned: bool,
}

impl TurnState {
    fn holder(&self) -> Side {
        if self.first_holds_turn {
            Side::First
        } else {
            Side::Second
        }
    }
}

/// Shared state of one ping-pong exchange.
#[derive(Debug)]
pub struct PingPong {
    state: Mutex<TurnState>,
    first_turn: Condvar,
    second_turn: Condvar,
}

impl PingPong {
    /// New exchange; the first side holds the turn.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(TurnState {
                first_holds_turn: true,
                handoffs: 0,
                abandoned: false,
            }),
            first_turn: Condvar::new(),
            second_turn: Condvar::new(),
        }
    }

    fn condvar(&self, side: Side) -> &Condvar {
        match side {
            Side::First => &self.first_turn,
            Side::Second => &self.second_turn,
        }
    }

    /// Take `rounds` turns as `side`, handing the turn over after each one.
    pub fn play(&self, side: Side, rounds: u64) -> Result<(), TrialError> {
        for _ in 0..rounds {
            let mut state = self.state.lock().map_err(|_| TrialError::Interrupted {
                reason: "turn lock poisoned",
            })?;

            while !state.abandoned && state.holder() != side {
                state = self
                    .condvar(side)
                    .wait(state)
                    .map_err(|_| TrialError::Interrupted {
                        reason: "turn wait poisoned",
                    })?;
            }
            if state.abandoned {
                return Err(TrialError::Interrupted {
                    reason: "peer abandoned the exchange",
                });
            }

            state.first_holds_turn = !state.first_holds_turn;
            state.handoffs += 1;
            // Signal before the guard drops so the peer cannot miss the wake.
            self.condvar(side.other()).notify_one();
            drop(state);
        }
        Ok(())
    }

    /// Mark the exchange abandoned and wake both sides.
    pub fn abandon(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.abandoned = true;
        self.first_turn.notify_all();
        self.second_turn.notify_all();
    }

    /// Total handoffs performed so far.
    pub fn handoffs(&self) -> u64 {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .handoffs
    }
}

impl Default for PingPong {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of one ping-pong trial.
#[derive(Debug, Clone, Copy)]
pub struct ContextSwitchRun {
    /// Requested switches.
    pub iterations: u64,
    /// Handoffs actually performed (`2 * (iterations / 2)`).
    pub handoffs: u64,
    /// Spawn of both workers through both joins.
    pub elapsed: Duration,
}

impl ContextSwitchRun {
    /// Elapsed time divided by the requested switch count.
    pub fn per_switch_nanos(&self) -> f64 {
        self.elapsed.as_nanos() as f64 / self.iterations.max(1) as f64
    }
}

/// Run one ping-pong exchange of `iterations` switches.
///
/// Each side takes `iterations / 2` turns. Both workers are joined before
/// the elapsed time is read, on success and on failure alike.
pub fn run_ping_pong(iterations: u64) -> Result<ContextSwitchRun, TrialError> {
    if iterations == 0 {
        return Err(TrialError::ZeroParameter);
    }
    let rounds = iterations / 2;
    let exchange = Arc::new(PingPong::new());

    let (outcome, elapsed) = measure(|| {
        let first = spawn_player(&exchange, Side::First, rounds)?;
        let second = match spawn_player(&exchange, Side::Second, rounds) {
            Ok(handle) => handle,
            Err(e) => {
                exchange.abandon();
                let _ = first.join();
                return Err(e);
            }
        };
        let first_result = join_player(first, Side::First);
        let second_result = join_player(second, Side::Second);
        first_result.and(second_result)
    });
    outcome?;

    Ok(ContextSwitchRun {
        iterations,
        handoffs: exchange.handoffs(),
        elapsed,
    })
}

/// Nanoseconds per context switch for one trial.
pub fn context_switch(iterations: u64) -> Result<f64, TrialError> {
    run_ping_pong(iterations).map(|run| run.per_switch_nanos())
}

fn spawn_player(
    exchange: &Arc<PingPong>,
    side: Side,
    rounds: u64,
) -> Result<JoinHandle<Result<(), TrialError>>, TrialError> {
    let exchange = Arc::clone(exchange);
    thread::Builder::new()
        .name(side.worker_name().to_string())
        .spawn(move || {
            let result = exchange.play(side, rounds);
            if result.is_err() {
                exchange.abandon();
            }
            result
        })
        .map_err(|source| TrialError::Spawn {
            worker: side.worker_name(),
            source,
        })
}

fn join_player(
    handle: JoinHandle<Result<(), TrialError>>,
    side: Side,
) -> Result<(), TrialError> {
    handle.join().map_err(|_| TrialError::WorkerPanicked {
        worker: side.worker_name(),
    })?
}
