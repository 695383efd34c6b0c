//! Notifications raised by the installer engine.

use crate::{PackageIdentity, PackageState};

/// Opaque handle of the window engine UI is parented to.
///
/// Zero means "no parent window".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub isize);

/// An event on the engine's notification stream.
///
/// # Example
///
/// ```rust
/// use pcloud_bootstrapper::{EngineEvent, PackageIdentity, PackageState};
///
/// let event = EngineEvent::DetectPackageComplete {
///     package_id: PackageIdentity::main(),
///     state: PackageState::Absent,
/// };
/// assert_eq!(
///     event.detected_state(&PackageIdentity::main()),
///     Some(PackageState::Absent)
/// );
/// assert!(!event.is_terminal());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Detection finished for one package.
    DetectPackageComplete {
        package_id: PackageIdentity,
        state: PackageState,
    },
    /// The whole detection pass finished.
    DetectComplete,
    PlanComplete,
    /// Overall apply progress, 0 to 100.
    Progress { percent: u8 },
    /// The engine hit an error it wants shown to the user.
    Error { message: String },
    /// Apply finished with the engine's status code (0 on success).
    ApplyComplete { status: i32 },
}

impl EngineEvent {
    /// The reported state if this event answers detection for `package`.
    pub fn detected_state(&self, package: &PackageIdentity) -> Option<PackageState> {
        match self {
            Self::DetectPackageComplete { package_id, state } if package_id == package => {
                Some(*state)
            }
            _ => None,
        }
    }

    /// Whether this event ends the apply event loop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::ApplyComplete { .. })
    }
}
