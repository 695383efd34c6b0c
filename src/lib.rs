//! # pcloud-bootstrapper
//!
//! Pre-flight detection and install orchestration for the Personal Cloud
//! setup bundle.
//!
//! The installer engine owns the actual installation: package detection,
//! planning, file copying, service registration. This crate is the
//! bootstrapper application the engine hosts. It decides whether an install
//! should happen at all, asks the user for a UI language, checks the Dokan
//! driver prerequisite, and drives the engine through plan and apply.
//!
//! ## Features
//!
//! - `detect_main_package()` bridges the engine's detection notification into
//!   a bounded async wait
//! - `Bootstrapper` runs the install decision sequence and the apply event loop
//! - `DriverQuery` / `CommandDriverQuery` check the driver prerequisite
//! - `ScriptedEngine` replays an engine for dry runs and tests
//!
//! ## Example
//!
//! ```rust
//! use pcloud_bootstrapper::{
//!     Bootstrapper, DriverStatus, HeadlessUi, LaunchAction, Locale, PackageIdentity,
//!     PackageState, ScriptedEngine,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let engine = ScriptedEngine::new()
//!         .with_package(PackageIdentity::main(), PackageState::Absent);
//!     let mut bootstrapper = Bootstrapper::new(
//!         engine,
//!         HeadlessUi::accepting(Some(Locale::ZhCn)),
//!         DriverStatus::installed(0x150),
//!     );
//!
//!     let outcome = bootstrapper.run(LaunchAction::Install, |_| {}).await.unwrap();
//!     assert_eq!(outcome.exit_code, 0);
//!
//!     let engine = bootstrapper.engine();
//!     assert_eq!(engine.variable("InstallDokanDriver").as_deref(), Some("yes"));
//!     assert_eq!(engine.variable("ProductLanguage").as_deref(), Some("2052"));
//! }
//! ```

mod bootstrap;
mod config;
mod detect;
mod driver;
mod engine;
mod launch_action;
mod locale;
mod options;
mod package;
mod ui;

pub use bootstrap::{
    BootstrapError, BootstrapOutcome, BootstrapProgress, Bootstrapper, OutcomeKind,
    ERROR_INSTALL_FAILURE,
};
pub use config::{ConfigError, PrerequisiteConfig, ProductConfig, DEFAULT_MIN_DRIVER_VERSION};
pub use detect::detect_main_package;
pub use driver::{CommandDriverQuery, DriverQuery, DriverStatus};
pub use engine::{
    EngineCall, EngineEvent, InstallerEngine, ScriptedEngine, WindowHandle, AFFIRMATIVE,
    INSTALL_DRIVER_VARIABLE, PRODUCT_LANGUAGE_VARIABLE,
};
pub use launch_action::LaunchAction;
pub use locale::{lcid_list, Locale};
pub use options::BootstrapOptions;
pub use package::{PackageIdentity, PackageState, MAIN_PACKAGE_ID};
pub use ui::{ConsentOutcome, HeadlessUi, UserInterface};
