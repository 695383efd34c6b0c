//! Package identity and detection state types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Package id of the Personal Cloud MSI inside the bundle.
pub const MAIN_PACKAGE_ID: &str = "PersonalCloudPackageId";

/// Opaque identifier naming a package as known to the installer engine.
///
/// The id is fixed when the bundle is built and never changes at runtime.
///
/// # Example
///
/// ```rust
/// use pcloud_bootstrapper::PackageIdentity;
///
/// let id = PackageIdentity::main();
/// assert_eq!(id.as_str(), "PersonalCloudPackageId");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageIdentity(String);

impl PackageIdentity {
    /// Wrap an engine package id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The main application package of the bundle.
    pub fn main() -> Self {
        Self::new(MAIN_PACKAGE_ID)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PackageIdentity {
    fn default() -> Self {
        Self::main()
    }
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// State of a package as reported by the engine's detection pass.
///
/// Produced once per detection pass and read-only afterwards.
///
/// # Example
///
/// ```rust
/// use pcloud_bootstrapper::PackageState;
///
/// assert!(PackageState::Present.is_present());
/// assert!(!PackageState::Superseded.is_present());
/// assert_eq!(PackageState::default(), PackageState::Unknown);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PackageState {
    /// The engine could not determine the state.
    #[default]
    Unknown,
    /// Not installed on the host.
    Absent,
    /// Installed at the version carried by this bundle.
    Present,
    /// A newer version of the package is installed.
    Superseded,
    /// An older version is installed and this bundle would replace it.
    Obsolete,
}

impl PackageState {
    /// Whether the package is installed at the bundled version.
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present)
    }
}
