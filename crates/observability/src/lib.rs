//! Process-wide log setup for the personnel binaries.

pub mod tracing;

pub use crate::tracing::LogFormat;

/// Install the global subscriber, picking the output format from `LOG_FORMAT`.
///
/// Only the first call in a process has an effect.
pub fn init() {
    tracing::init(LogFormat::from_env());
}
