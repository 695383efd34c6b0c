//! Error types for bootstrapper runs.
//!
//! Engine-reported errors never surface here: they are shown to the user and
//! the run continues. These variants cover the cases where the engine stops
//! answering, which a run cannot recover from.

use crate::PackageIdentity;
use std::time::Duration;
use thiserror::Error;

/// Windows Installer's generic "fatal error during installation" code.
pub const ERROR_INSTALL_FAILURE: i32 = 1603;

/// Errors that end a bootstrapper run early.
///
/// Each variant carries a `fix` field with an actionable suggestion.
///
/// # Example
///
/// ```rust
/// use pcloud_bootstrapper::{BootstrapError, PackageIdentity};
/// use std::time::Duration;
///
/// let error = BootstrapError::DetectionTimedOut {
///     package: PackageIdentity::main(),
///     duration: Duration::from_secs(30),
///     fix: "Restart the setup".to_string(),
/// };
/// assert_eq!(error.fix_suggestion(), "Restart the setup");
/// assert_eq!(error.exit_code(), 1603);
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BootstrapError {
    /// The engine did not report the package within the detection bound.
    #[error("Detection of {package} timed out after {duration:?}")]
    DetectionTimedOut {
        package: PackageIdentity,
        duration: Duration,
        fix: String,
    },

    /// The engine finished its detection pass without mentioning the package.
    #[error("Engine finished detection without reporting {package}")]
    PackageNotReported { package: PackageIdentity, fix: String },

    /// The engine's notification stream closed while a run was waiting on it.
    #[error("Installer engine stopped sending notifications while {waiting_for}")]
    EngineDisconnected {
        /// What the run was waiting for, e.g. "detecting".
        waiting_for: &'static str,
        fix: String,
    },
}

impl BootstrapError {
    pub fn fix_suggestion(&self) -> &str {
        match self {
            Self::DetectionTimedOut { fix, .. } => fix,
            Self::PackageNotReported { fix, .. } => fix,
            Self::EngineDisconnected { fix, .. } => fix,
        }
    }

    /// Process exit code reported to the engine for this failure.
    pub fn exit_code(&self) -> i32 {
        ERROR_INSTALL_FAILURE
    }
}
