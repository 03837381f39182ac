// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Native backends reached through a shared-library call boundary.
//!
//! Each measurement library exports one `double crossbench_<kind>(int32_t)`
//! entry point per catalog kind. All seven are resolved when the library is
//! loaded; nothing is looked up lazily.

use std::ffi::{c_void, CStr, CString};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;

use crate::catalog::BenchmarkKind;
use crate::error::{InitError, TrialError};
use crate::types::Backend;

use super::BenchmarkProvider;

/// Exported entry points, in catalog order.
pub const SYMBOLS: [&str; BenchmarkKind::COUNT] = [
    "crossbench_static_access",
    "crossbench_dynamic_access",
    "crossbench_allocation",
    "crossbench_deallocation",
    "crossbench_thread_creation",
    "crossbench_context_switch",
    "crossbench_thread_migration",
];

type EntryPoint = unsafe extern "C" fn(i32) -> f64;

/// An open `dlopen` handle. Closed on drop.
struct NativeLibrary {
    path: PathBuf,
    handle: NonNull<c_void>,
}

impl NativeLibrary {
    fn open(path: &Path) -> Result<Self, InitError> {
        if path.as_os_str().is_empty() {
            return Err(InitError::InvalidPath {
                path: path.to_path_buf(),
                reason: "path is empty".to_string(),
            });
        }
        let c_path =
            CString::new(path.as_os_str().as_bytes()).map_err(|e| InitError::InvalidPath {
                path: path.to_path_buf(),
                reason: format!("contains an interior NUL byte: {}", e),
            })?;

        // SAFETY: c_path is a valid NUL-terminated string; flags are valid dlopen flags.
        let raw = unsafe { libc::dlopen(c_path.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL) };

        let handle = NonNull::new(raw).ok_or_else(|| InitError::LibraryLoad {
            path: path.to_path_buf(),
            reason: last_dl_error(),
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            handle,
        })
    }

    fn entry_point(&self, symbol: &'static str) -> Result<EntryPoint, InitError> {
        let missing = || InitError::MissingSymbol {
            path: self.path.clone(),
            symbol,
        };
        let c_symbol = CString::new(symbol).map_err(|_| missing())?;

        // SAFETY: handle is a live dlopen handle owned by self; c_symbol is NUL-terminated.
        let raw = unsafe { libc::dlsym(self.handle.as_ptr(), c_symbol.as_ptr()) };
        if raw.is_null() {
            return Err(missing());
        }

        // SAFETY: measurement libraries export every entry point with the
        // `double(int32_t)` C signature; raw is a non-null function address.
        Ok(unsafe { std::mem::transmute::<*mut c_void, EntryPoint>(raw) })
    }
}

impl Drop for NativeLibrary {
    fn drop(&mut self) {
        // SAFETY: handle came from a successful dlopen and is closed exactly once.
        let result = unsafe { libc::dlclose(self.handle.as_ptr()) };
        if result != 0 {
            tracing::warn!(
                path = %self.path.display(),
                error = %last_dl_error(),
                "Failed to close native library"
            );
        }
    }
}

fn last_dl_error() -> String {
    // SAFETY: dlerror returns either NULL or a pointer to a NUL-terminated
    // thread-local message valid until the next dl* call on this thread.
    unsafe {
        let message = libc::dlerror();
        if message.is_null() {
            "unknown dynamic loader error".to_string()
        } else {
            CStr::from_ptr(message).to_string_lossy().into_owned()
        }
    }
}

/// Provider for the C and C++ backends.
pub struct NativeProvider {
    backend: Backend,
    /// Indexed by catalog position.
    entry_points: Vec<EntryPoint>,
    library: NativeLibrary,
}

impl NativeProvider {
    /// Load `path` and resolve every entry point for `backend`.
    pub fn load(backend: Backend, path: &Path) -> Result<Self, InitError> {
        let library = NativeLibrary::open(path)?;

        let entry_points = SYMBOLS
            .into_iter()
            .map(|symbol| library.entry_point(symbol))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            backend = %backend,
            path = %path.display(),
            symbols = SYMBOLS.len(),
            "Native library loaded"
        );

        Ok(Self {
            backend,
            entry_points,
            library,
        })
    }

    /// Path the library was loaded from.
    pub fn library_path(&self) -> &Path {
        &self.library.path
    }

    fn call(&self, kind: BenchmarkKind, parameter: u64) -> Result<f64, TrialError> {
        if parameter == 0 {
            return Err(TrialError::ZeroParameter);
        }
        let argument = i32::try_from(parameter)
            .map_err(|_| TrialError::ParameterOutOfRange { value: parameter })?;

        let entry = self.entry_points[kind.position()];
        // SAFETY: entry was resolved from self.library, which stays loaded
        // for as long as self exists.
        let nanos = unsafe { entry(argument) };

        if !nanos.is_finite() || nanos < 0.0 {
            return Err(TrialError::Native {
                symbol: SYMBOLS[kind.position()],
                value: nanos,
            });
        }
        Ok(nanos)
    }
}

impl BenchmarkProvider for NativeProvider {
    fn backend(&self) -> Backend {
        self.backend
    }

    fn static_access(&mut self, array_size: u64) -> Result<f64, TrialError> {
        self.call(BenchmarkKind::StaticAccess, array_size)
    }

    fn dynamic_access(&mut self, array_size: u64) -> Result<f64, TrialError> {
        self.call(BenchmarkKind::DynamicAccess, array_size)
    }

    fn allocation(&mut self, array_size: u64) -> Result<f64, TrialError> {
        self.call(BenchmarkKind::Allocation, array_size)
    }

    fn deallocation(&mut self, array_size: u64) -> Result<f64, TrialError> {
        self.call(BenchmarkKind::Deallocation, array_size)
    }

    fn thread_creation(&mut self, iterations: u64) -> Result<f64, TrialError> {
        self.call(BenchmarkKind::ThreadCreation, iterations)
    }

    fn context_switch(&mut self, iterations: u64) -> Result<f64, TrialError> {
        self.call(BenchmarkKind::ContextSwitch, iterations)
    }

    fn thread_migration(&mut self, iterations: u64) -> Result<f64, TrialError> {
        self.call(BenchmarkKind::ThreadMigration, iterations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_follow_catalog_order() {
        for kind in BenchmarkKind::ALL {
            assert_eq!(
                SYMBOLS[kind.position()],
                format!("crossbench_{}", kind.file_stem())
            );
        }
    }

    #[test]
    fn test_missing_library() {
        let result = NativeProvider::load(Backend::C, Path::new("/nonexistent/libnothing.so"));
        match result {
            Err(InitError::LibraryLoad { path, reason }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/libnothing.so"));
                assert!(!reason.is_empty());
            }
            _ => panic!("expected LibraryLoad error"),
        }
    }

    #[test]
    fn test_empty_path_rejected() {
        assert!(matches!(
            NativeProvider::load(Backend::Cpp, Path::new("")),
            Err(InitError::InvalidPath { .. })
        ));
    }

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    #[test]
    fn test_library_without_entry_points() {
        // libc is always loadable on glibc and exports none of our symbols.
        match NativeProvider::load(Backend::C, Path::new("libc.so.6")) {
            Err(InitError::MissingSymbol { symbol, .. }) => {
                assert_eq!(symbol, "crossbench_static_access");
            }
            _ => panic!("expected MissingSymbol error"),
        }
    }
}
