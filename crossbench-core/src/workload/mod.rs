// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! In-process workloads measured by the Rust backend.

pub mod memory;
pub mod migration;
pub mod threads;

pub use memory::StaticRegion;
pub use threads::{ContextSwitchRun, PingPong, Side};
