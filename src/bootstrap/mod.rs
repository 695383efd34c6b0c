//! Install orchestration for the setup bundle.
//!
//! [`Bootstrapper::run`] decides, once per process, whether to stop because
//! the product is already installed or the user cancelled, or to request the
//! driver prerequisite and hand the install to the engine.
//!
//! # Example
//!
//! ```rust,no_run
//! use pcloud_bootstrapper::{
//!     Bootstrapper, CommandDriverQuery, HeadlessUi, LaunchAction, ScriptedEngine,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let mut bootstrapper = Bootstrapper::new(
//!         ScriptedEngine::new(),
//!         HeadlessUi::accepting(None),
//!         CommandDriverQuery::dokan(),
//!     );
//!     match bootstrapper.run(LaunchAction::Install, |p| println!("{:?}", p)).await {
//!         Ok(outcome) => std::process::exit(outcome.exit_code),
//!         Err(e) => {
//!             eprintln!("Setup failed: {}. Fix: {}", e, e.fix_suggestion());
//!             std::process::exit(e.exit_code());
//!         }
//!     }
//! }
//! ```

mod errors;
mod orchestrator;
mod progress;

pub use errors::{BootstrapError, ERROR_INSTALL_FAILURE};
pub use orchestrator::{BootstrapOutcome, Bootstrapper, OutcomeKind};
pub use progress::BootstrapProgress;
