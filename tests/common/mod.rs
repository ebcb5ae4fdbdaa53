//! Common test utilities for integration tests
//!
//! Provides project-directory fixtures shared across test files.

use std::path::Path;
use tempfile::TempDir;

use suv_config::CONFIG_FILE_NAME;

/// Create a temporary project directory for test isolation
///
/// Returns a TempDir that will be cleaned up when dropped.
pub fn temp_project() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Write `suv.config.js` into `dir`, replacing any previous contents
pub fn write_config(dir: &Path, source: &str) {
    std::fs::write(dir.join(CONFIG_FILE_NAME), source).expect("Failed to write config file");
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
