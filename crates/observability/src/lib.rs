//! Tracing/logging setup shared by the clinic client binaries.

/// Initialize process-wide logging with defaults read from the environment.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(&tracing::LogSettings::from_env());
}

/// Tracing configuration (filters, output format).
pub mod tracing;
