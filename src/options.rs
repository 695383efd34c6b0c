//! Bootstrap run options.
//!
//! This module provides the [`BootstrapOptions`] struct for tuning how the
//! orchestrator waits on the engine and what exit code it reports.

use std::time::Duration;

/// Configuration options for a bootstrapper run.
///
/// # Default Behavior
///
/// The default detection timeout is 30 seconds. A detection pass scans the
/// host's installer registry, which is normally quick but can stall on
/// machines with many installed products; raise the bound there.
///
/// By default every completed apply exits with code 0, leaving finer-grained
/// failure reporting to the engine (`propagate_apply_status: false`).
///
/// # Example
///
/// ```rust
/// use pcloud_bootstrapper::BootstrapOptions;
/// use std::time::Duration;
///
/// let opts = BootstrapOptions {
///     detect_timeout: Duration::from_secs(120),
///     ..Default::default()
/// };
/// assert!(!opts.propagate_apply_status);
/// ```
#[derive(Debug, Clone)]
pub struct BootstrapOptions {
    /// Maximum time to wait for the engine to report the main package
    /// after `detect()` was requested.
    ///
    /// Default: 30 seconds
    pub detect_timeout: Duration,

    /// Exit with the engine's apply status instead of 0.
    ///
    /// Default: `false`
    pub propagate_apply_status: bool,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            detect_timeout: Duration::from_secs(30),
            propagate_apply_status: false,
        }
    }
}
