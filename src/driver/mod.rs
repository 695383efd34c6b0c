//! Host query for the file-system driver prerequisite.
//!
//! The bundle installs the Dokan driver ahead of Personal Cloud when the
//! host has no driver, or one older than the configured minimum. This module
//! provides:
//!
//! - [`DriverStatus`]: the `(installed, version)` answer and the threshold rule
//! - [`DriverQuery`]: the seam the orchestrator queries through
//! - [`CommandDriverQuery`]: a query backed by the driver's control tool

mod parser;
mod path_finder;
mod query;

pub use query::CommandDriverQuery;

use std::future::Future;

/// What the host reports about a driver.
///
/// # Example
///
/// ```rust
/// use pcloud_bootstrapper::DriverStatus;
///
/// assert!(DriverStatus::not_installed().requires_install(0x190));
/// assert!(DriverStatus::installed(0x100).requires_install(0x190));
/// assert!(!DriverStatus::installed(0x190).requires_install(0x190));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverStatus {
    pub installed: bool,
    /// Driver version; meaningless when not installed.
    pub version: u32,
}

impl DriverStatus {
    pub fn installed(version: u32) -> Self {
        Self {
            installed: true,
            version,
        }
    }

    pub fn not_installed() -> Self {
        Self {
            installed: false,
            version: 0,
        }
    }

    /// Missing and outdated drivers are treated the same.
    pub fn requires_install(&self, min_version: u32) -> bool {
        !self.installed || self.version < min_version
    }

    /// Installed version, if any.
    pub fn found_version(&self) -> Option<u32> {
        self.installed.then_some(self.version)
    }
}

/// Host facility answering whether a named driver is installed.
pub trait DriverQuery: Send + Sync {
    fn query(&self, driver: &str) -> impl Future<Output = DriverStatus> + Send;
}

/// A fixed status answers every query with itself.
impl DriverQuery for DriverStatus {
    fn query(&self, _driver: &str) -> impl Future<Output = DriverStatus> + Send {
        std::future::ready(*self)
    }
}
