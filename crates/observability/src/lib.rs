//! Tracing and logging (shared setup).

/// Initialize process-wide observability with the default JSON log format.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogFormat::default());
}

/// Initialize process-wide observability with an explicit log format.
pub fn init_with(format: LogFormat) {
    tracing::init(format);
}

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use crate::tracing::LogFormat;
