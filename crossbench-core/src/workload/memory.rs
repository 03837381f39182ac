// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Size-swept memory workloads.
//!
//! Each function builds its buffer outside the timed window and returns the
//! timed cost in nanoseconds per element.

use std::hint::black_box;

use crate::error::TrialError;
use crate::timing::Timer;

/// Long-lived region shared by every static-access trial.
///
/// Allocated once for the largest array size in the catalog; trials only
/// repopulate and read a prefix of it.
pub struct StaticRegion {
    slots: Box<[i32]>,
}

impl StaticRegion {
    /// Create a zeroed region with room for `capacity` elements.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![0; capacity].into_boxed_slice(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Populate the first `array_size` slots and time a sequential read-sum.
    pub fn access(&mut self, array_size: usize) -> Result<f64, TrialError> {
        ensure_non_zero(array_size)?;
        if array_size > self.slots.len() {
            return Err(TrialError::ParameterOutOfRange {
                value: array_size as u64,
            });
        }

        let slots = &mut self.slots[..array_size];
        populate(slots);

        let timer = Timer::start();
        black_box(sequential_sum(slots));
        Ok(timer.stop_per(array_size as u64))
    }
}

/// Allocate and populate a fresh heap buffer, then time a sequential read-sum.
pub fn dynamic_access(array_size: usize) -> Result<f64, TrialError> {
    ensure_non_zero(array_size)?;
    let mut buffer = vec![0i32; array_size];
    populate(&mut buffer);

    let timer = Timer::start();
    black_box(sequential_sum(&buffer));
    Ok(timer.stop_per(array_size as u64))
}

/// Time the construction of `array_size` individually boxed elements.
///
/// The pointer table is reserved up front so only element allocation is
/// inside the window.
pub fn allocation(array_size: usize) -> Result<f64, TrialError> {
    ensure_non_zero(array_size)?;
    let mut chunks: Vec<Box<i32>> = Vec::with_capacity(array_size);

    let timer = Timer::start();
    for i in 0..array_size {
        chunks.push(Box::new(black_box(i as i32)));
    }
    let per_element = timer.stop_per(array_size as u64);

    black_box(&chunks);
    drop(chunks);
    Ok(per_element)
}

/// Time releasing `array_size` boxed elements plus the reclaim trigger.
pub fn deallocation(array_size: usize) -> Result<f64, TrialError> {
    ensure_non_zero(array_size)?;
    let mut chunks: Vec<Box<i32>> = (0..array_size).map(|i| Box::new(i as i32)).collect();
    black_box(&chunks);

    let timer = Timer::start();
    chunks.clear();
    reclaim();
    let per_element = timer.stop_per(array_size as u64);

    drop(chunks);
    Ok(per_element)
}

/// Hand freed memory back to the system so that reclaim cost lands in the
/// timed window, as it does for collector-backed runtimes.
#[cfg(all(target_os = "linux", target_env = "gnu"))]
fn reclaim() {
    // SAFETY: malloc_trim only walks allocator-internal free lists.
    unsafe {
        libc::malloc_trim(0);
    }
}

#[cfg(not(all(target_os = "linux", target_env = "gnu")))]
fn reclaim() {}

fn populate(slots: &mut [i32]) {
    for (i, slot) in slots.iter_mut().enumerate() {
        *slot = i as i32;
    }
}

fn sequential_sum(slots: &[i32]) -> i64 {
    black_box(slots).iter().map(|&x| x as i64).sum()
}

fn ensure_non_zero(array_size: usize) -> Result<(), TrialError> {
    if array_size == 0 {
        return Err(TrialError::ZeroParameter);
    }
    Ok(())
}
