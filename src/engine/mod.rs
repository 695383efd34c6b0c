//! Boundary to the external installer engine.
//!
//! The engine owns plan/apply and the actual package installation. The
//! bootstrapper only issues requests and listens on the engine's
//! notification stream, which is delivered from threads the engine owns.

mod events;
mod scripted;

pub use events::{EngineEvent, WindowHandle};
pub use scripted::{EngineCall, ScriptedEngine};

use crate::LaunchAction;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Engine variable gating the driver package of the bundle.
pub const INSTALL_DRIVER_VARIABLE: &str = "InstallDokanDriver";

/// Value of [`INSTALL_DRIVER_VARIABLE`] that requests the driver install.
pub const AFFIRMATIVE: &str = "yes";

/// Engine variable carrying the chosen UI language as a decimal LCID.
pub const PRODUCT_LANGUAGE_VARIABLE: &str = "ProductLanguage";

/// Requests the bootstrapper issues to the installer engine.
///
/// Every request returns immediately; outcomes arrive as [`EngineEvent`]s on
/// the stream returned by [`subscribe`](InstallerEngine::subscribe). A
/// receiver only sees events sent after it subscribed, so callers subscribe
/// before issuing the request whose answer they wait on.
pub trait InstallerEngine: Send + Sync {
    /// Register an observer on the notification stream.
    fn subscribe(&self) -> broadcast::Receiver<EngineEvent>;

    /// Start a detection pass over every package of the bundle.
    fn detect(&self);

    /// Compute the actions needed for `action`.
    fn plan(&self, action: LaunchAction);

    /// Execute the plan, parenting engine UI to `window`.
    fn apply(&self, window: WindowHandle);

    /// Ask the engine to shut down with the given process exit code.
    fn quit(&self, exit_code: i32);

    /// Write a string variable into the engine's variable store.
    fn set_string_variable(&self, name: &str, value: &str);
}

impl<T: InstallerEngine + ?Sized> InstallerEngine for Arc<T> {
    fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        (**self).subscribe()
    }

    fn detect(&self) {
        (**self).detect()
    }

    fn plan(&self, action: LaunchAction) {
        (**self).plan(action)
    }

    fn apply(&self, window: WindowHandle) {
        (**self).apply(window)
    }

    fn quit(&self, exit_code: i32) {
        (**self).quit(exit_code)
    }

    fn set_string_variable(&self, name: &str, value: &str) {
        (**self).set_string_variable(name, value)
    }
}
