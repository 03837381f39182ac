// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Human-readable durations for terminal output.

/// Format a nanosecond quantity with the largest unit that keeps it >= 1.
pub fn format_ns(nanos: f64) -> String {
    if !nanos.is_finite() {
        return nanos.to_string();
    }
    if nanos >= 1_000_000_000.0 {
        format!("{:.2} s", nanos / 1_000_000_000.0)
    } else if nanos >= 1_000_000.0 {
        format!("{:.2} ms", nanos / 1_000_000.0)
    } else if nanos >= 1_000.0 {
        format!("{:.2} µs", nanos / 1_000.0)
    } else {
        format!("{:.2} ns", nanos)
    }
}

/// Format a byte count in MiB/GiB.
pub fn format_bytes(bytes: u64) -> String {
    const MIB: f64 = 1024.0 * 1024.0;
    const GIB: f64 = MIB * 1024.0;
    let bytes = bytes as f64;
    if bytes >= GIB {
        format!("{:.1} GiB", bytes / GIB)
    } else {
        format!("{:.1} MiB", bytes / MIB)
    }
}
