//! Progress reporting for bootstrapper runs.
//!
//! The [`BootstrapProgress`] enum represents the discrete stages a run goes
//! through. They are reported to the caller via a callback so a splash
//! window or console front end can follow along.

use crate::{LaunchAction, Locale, PackageState};

/// Progress stages during a bootstrapper run.
///
/// # Example
///
/// ```rust
/// use pcloud_bootstrapper::BootstrapProgress;
///
/// fn on_progress(progress: BootstrapProgress) {
///     match &progress {
///         BootstrapProgress::ApplyProgress { percent } => println!("{percent}%"),
///         other => println!("{}", other.description()),
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapProgress {
    /// Waiting for the engine's detection pass.
    Detecting,

    /// The main package state is known.
    Detected {
        state: PackageState,
        action: LaunchAction,
    },

    /// The language-choice dialog is open.
    AwaitingConsent,

    /// Querying the host for the prerequisite driver.
    CheckingPrerequisite {
        /// Driver name as configured.
        driver: String,
    },

    /// The driver will be installed ahead of the main package.
    PrerequisiteRequired {
        /// Version found on the host, `None` when not installed.
        found: Option<u32>,
        minimum: u32,
    },

    Planning {
        action: LaunchAction,
        locale: Locale,
    },

    Applying,

    /// Overall apply progress reported by the engine, 0 to 100.
    ApplyProgress { percent: u8 },

    /// Apply finished with the engine's status.
    Completed { status: i32 },
}

impl BootstrapProgress {
    /// Get a human-readable description of the current stage.
    ///
    /// ```rust
    /// use pcloud_bootstrapper::BootstrapProgress;
    ///
    /// assert_eq!(BootstrapProgress::Applying.description(), "Installing");
    /// ```
    pub fn description(&self) -> &'static str {
        match self {
            Self::Detecting => "Checking for an existing installation",
            Self::Detected { .. } => "Existing installation checked",
            Self::AwaitingConsent => "Waiting for language selection",
            Self::CheckingPrerequisite { .. } => "Checking driver prerequisite",
            Self::PrerequisiteRequired { .. } => "Driver will be installed",
            Self::Planning { .. } => "Preparing installation",
            Self::Applying => "Installing",
            Self::ApplyProgress { .. } => "Installing",
            Self::Completed { .. } => "Installation finished",
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptions() {
        assert_eq!(
            BootstrapProgress::Detecting.description(),
            "Checking for an existing installation"
        );
        assert_eq!(
            BootstrapProgress::PrerequisiteRequired {
                found: Some(0x100),
                minimum: 0x190
            }
            .description(),
            "Driver will be installed"
        );
        assert_eq!(
            BootstrapProgress::ApplyProgress { percent: 40 }.description(),
            BootstrapProgress::Applying.description()
        );
    }

    #[test]
    fn test_is_complete() {
        assert!(BootstrapProgress::Completed { status: 0 }.is_complete());
        assert!(BootstrapProgress::Completed { status: 1603 }.is_complete());
        assert!(!BootstrapProgress::Applying.is_complete());
        assert!(!BootstrapProgress::AwaitingConsent.is_complete());
    }
}
