//! The install orchestrator.
//!
//! This module provides [`Bootstrapper`], which runs the pre-flight decision
//! sequence once per process and hands an accepted install to the engine.

use crate::bootstrap::{BootstrapError, BootstrapProgress};
use crate::detect::detect_main_package;
use crate::driver::DriverQuery;
use crate::engine::{
    EngineEvent, InstallerEngine, AFFIRMATIVE, PRODUCT_LANGUAGE_VARIABLE,
};
use crate::ui::{ConsentOutcome, UserInterface};
use crate::{BootstrapOptions, LaunchAction, Locale, PackageState, ProductConfig};
use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use tracing::{debug, info, warn};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    /// The launch action was not `Install`; nothing was requested.
    Skipped { action: LaunchAction },
    /// The main package is already present.
    AlreadyInstalled,
    /// The user dismissed the consent dialog.
    Cancelled,
    /// Plan and apply ran; `status` is the engine's apply result.
    Applied { status: i32 },
}

/// Result of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapOutcome {
    /// Exit code handed to [`InstallerEngine::quit`].
    pub exit_code: i32,
    pub kind: OutcomeKind,
}

enum State {
    Start,
    Detect,
    Decide(PackageState),
    AlreadyInstalled,
    PromptUser,
    CheckPrerequisite(Locale),
    Configure(Locale),
    PlanApply(Locale),
    RunLoop,
    Exit(OutcomeKind),
}

impl State {
    fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Detect => "detect",
            Self::Decide(_) => "decide",
            Self::AlreadyInstalled => "already-installed",
            Self::PromptUser => "prompt-user",
            Self::CheckPrerequisite(_) => "check-prerequisite",
            Self::Configure(_) => "configure",
            Self::PlanApply(_) => "plan-apply",
            Self::RunLoop => "run-loop",
            Self::Exit(_) => "exit",
        }
    }
}

/// Drives one bootstrapper run against an installer engine.
///
/// # Consent Model
///
/// Nothing is written to the engine and plan/apply is never requested
/// unless the user confirms the language dialog. Once apply has been
/// requested there is no way back; cancelling mid-apply is the engine's job.
///
/// # Example
///
/// ```rust
/// use pcloud_bootstrapper::{
///     Bootstrapper, DriverStatus, HeadlessUi, LaunchAction, OutcomeKind, PackageIdentity,
///     PackageState, ScriptedEngine,
/// };
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let engine = ScriptedEngine::new()
///         .with_package(PackageIdentity::main(), PackageState::Absent);
///     let mut bootstrapper =
///         Bootstrapper::new(engine, HeadlessUi::accepting(None), DriverStatus::installed(0x190));
///
///     let outcome = bootstrapper
///         .run(LaunchAction::Install, |progress| println!("{}", progress.description()))
///         .await
///         .unwrap();
///     assert_eq!(outcome.kind, OutcomeKind::Applied { status: 0 });
///     assert_eq!(outcome.exit_code, 0);
/// }
/// ```
pub struct Bootstrapper<E, U, Q> {
    engine: E,
    ui: U,
    driver: Q,
    product: ProductConfig,
    options: BootstrapOptions,
}

impl<E, U, Q> Bootstrapper<E, U, Q>
where
    E: InstallerEngine,
    U: UserInterface,
    Q: DriverQuery,
{
    /// A bootstrapper for the default Personal Cloud product.
    pub fn new(engine: E, ui: U, driver: Q) -> Self {
        Self {
            engine,
            ui,
            driver,
            product: ProductConfig::default(),
            options: BootstrapOptions::default(),
        }
    }

    pub fn with_product(mut self, product: ProductConfig) -> Self {
        self.product = product;
        self
    }

    pub fn with_options(mut self, options: BootstrapOptions) -> Self {
        self.options = options;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    /// Run the decision sequence for `action` and quit the engine.
    ///
    /// Detection is performed for every action. Error notifications the
    /// engine raises at any point of the run are shown through
    /// [`UserInterface::show_error`]. The engine's `quit` is
    /// called exactly once with the returned exit code, or with the error's
    /// exit code when the engine stopped answering.
    pub async fn run<F>(
        &mut self,
        action: LaunchAction,
        on_progress: F,
    ) -> Result<BootstrapOutcome, BootstrapError>
    where
        F: Fn(BootstrapProgress) + Send + Sync,
    {
        info!(%action, package = %self.product.main_package, "bootstrapper run started");

        let result = self.drive(action, &on_progress).await;
        let exit_code = match &result {
            Ok(outcome) => outcome.exit_code,
            Err(e) => {
                warn!(error = %e, "bootstrapper run failed");
                e.exit_code()
            }
        };

        info!(exit_code, "quitting engine");
        self.engine.quit(exit_code);
        result
    }

    async fn drive<F>(
        &mut self,
        action: LaunchAction,
        on_progress: &F,
    ) -> Result<BootstrapOutcome, BootstrapError>
    where
        F: Fn(BootstrapProgress) + Send + Sync,
    {
        // Held for the whole run so engine errors are seen in every state.
        let mut events = self.engine.subscribe();
        let mut state = State::Start;
        loop {
            debug!(state = state.name(), "orchestrator step");
            state = match state {
                State::Start => State::Detect,

                State::Detect => {
                    on_progress(BootstrapProgress::Detecting);
                    let detected = detect_main_package(
                        &self.engine,
                        &self.product.main_package,
                        self.options.detect_timeout,
                    )
                    .await;
                    self.show_pending_errors(&mut events);
                    let detected = detected?;
                    on_progress(BootstrapProgress::Detected {
                        state: detected,
                        action,
                    });
                    State::Decide(detected)
                }

                State::Decide(detected) => {
                    if !action.is_install() {
                        info!(%action, %detected, "nothing to do for this action");
                        State::Exit(OutcomeKind::Skipped { action })
                    } else if detected.is_present() {
                        State::AlreadyInstalled
                    } else {
                        State::PromptUser
                    }
                }

                State::AlreadyInstalled => {
                    info!(product = %self.product.product_name, "already installed");
                    self.ui.show_notice(&self.product.already_installed_notice());
                    State::Exit(OutcomeKind::AlreadyInstalled)
                }

                State::PromptUser => {
                    on_progress(BootstrapProgress::AwaitingConsent);
                    let default = self.product.default_locale();
                    match self
                        .ui
                        .choose_language(&self.product.supported_locales, default)
                    {
                        ConsentOutcome::Confirmed(locale) => {
                            State::CheckPrerequisite(self.supported_or_default(locale))
                        }
                        ConsentOutcome::Dismissed => {
                            info!("user cancelled setup");
                            State::Exit(OutcomeKind::Cancelled)
                        }
                    }
                }

                State::CheckPrerequisite(locale) => {
                    let prerequisite = &self.product.prerequisite;
                    on_progress(BootstrapProgress::CheckingPrerequisite {
                        driver: prerequisite.driver_name.clone(),
                    });

                    let status = self.driver.query(&prerequisite.driver_name).await;
                    if status.requires_install(prerequisite.min_version) {
                        info!(
                            driver = %prerequisite.driver_name,
                            found = ?status.found_version(),
                            minimum = prerequisite.min_version,
                            "requesting driver install"
                        );
                        on_progress(BootstrapProgress::PrerequisiteRequired {
                            found: status.found_version(),
                            minimum: prerequisite.min_version,
                        });
                        self.engine
                            .set_string_variable(&prerequisite.variable, AFFIRMATIVE);
                    }
                    State::Configure(locale)
                }

                State::Configure(locale) => {
                    let lcid = locale.lcid();
                    debug!(locale = locale.tag(), lcid, "setting product language");
                    self.engine
                        .set_string_variable(PRODUCT_LANGUAGE_VARIABLE, &lcid.to_string());
                    State::PlanApply(locale)
                }

                State::PlanApply(locale) => {
                    on_progress(BootstrapProgress::Planning { action, locale });
                    self.engine.plan(action);

                    on_progress(BootstrapProgress::Applying);
                    self.engine.apply(self.ui.window_handle());
                    State::RunLoop
                }

                State::RunLoop => {
                    let status = self.pump_events(&mut events, on_progress).await?;
                    State::Exit(OutcomeKind::Applied { status })
                }

                State::Exit(kind) => {
                    self.show_pending_errors(&mut events);
                    return Ok(BootstrapOutcome {
                        exit_code: self.exit_code_for(kind),
                        kind,
                    });
                }
            };
        }
    }

    /// Process engine notifications until apply completes.
    async fn pump_events<F>(
        &mut self,
        events: &mut broadcast::Receiver<EngineEvent>,
        on_progress: &F,
    ) -> Result<i32, BootstrapError>
    where
        F: Fn(BootstrapProgress) + Send + Sync,
    {
        loop {
            match events.recv().await {
                Ok(event) if event.is_terminal() => {
                    if let EngineEvent::ApplyComplete { status } = event {
                        info!(status, "apply complete");
                        on_progress(BootstrapProgress::Completed { status });
                        return Ok(status);
                    }
                }
                Ok(EngineEvent::Error { message }) => self.show_engine_error(&message),
                Ok(EngineEvent::Progress { percent }) => {
                    on_progress(BootstrapProgress::ApplyProgress { percent });
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event loop fell behind the engine");
                }
                Err(RecvError::Closed) => {
                    return Err(BootstrapError::EngineDisconnected {
                        waiting_for: "applying",
                        fix: "The installer engine stopped before finishing. \
                              Check the setup log and run the setup again."
                            .to_string(),
                    });
                }
            }
        }
    }

    /// Show error notifications already queued, without waiting for more.
    fn show_pending_errors(&mut self, events: &mut broadcast::Receiver<EngineEvent>) {
        loop {
            match events.try_recv() {
                Ok(EngineEvent::Error { message }) => self.show_engine_error(&message),
                Ok(_) => {}
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "error watcher fell behind the engine");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return,
            }
        }
    }

    fn show_engine_error(&mut self, message: &str) {
        warn!(%message, "engine reported an error");
        self.ui.show_error(message);
    }

    fn supported_or_default(&self, locale: Locale) -> Locale {
        if self.product.supported_locales.contains(&locale) {
            locale
        } else {
            let default = self.product.default_locale();
            warn!(%locale, %default, "dialog returned an unsupported locale");
            default
        }
    }

    fn exit_code_for(&self, kind: OutcomeKind) -> i32 {
        match kind {
            OutcomeKind::Applied { status } if self.options.propagate_apply_status => status,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineCall, ScriptedEngine, INSTALL_DRIVER_VARIABLE};
    use crate::ui::HeadlessUi;
    use crate::{DriverStatus, PackageIdentity};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn absent_engine() -> ScriptedEngine {
        ScriptedEngine::new().with_package(PackageIdentity::main(), PackageState::Absent)
    }

    #[tokio::test]
    async fn test_variables_set_before_plan() {
        let mut bootstrapper = Bootstrapper::new(
            absent_engine(),
            HeadlessUi::accepting(Some(Locale::ZhCn)),
            DriverStatus::installed(0x100),
        );
        bootstrapper.run(LaunchAction::Install, |_| {}).await.unwrap();

        let calls = bootstrapper.engine().calls();
        let index_of = |wanted: fn(&EngineCall) -> bool| calls.iter().position(wanted).unwrap();
        let driver_flag = index_of(|c| {
            matches!(c, EngineCall::SetVariable { name, .. } if name == INSTALL_DRIVER_VARIABLE)
        });
        let language = index_of(|c| {
            matches!(c, EngineCall::SetVariable { name, .. } if name == PRODUCT_LANGUAGE_VARIABLE)
        });
        let plan = index_of(|c| matches!(c, EngineCall::Plan(_)));
        let apply = index_of(|c| matches!(c, EngineCall::Apply(_)));

        assert!(driver_flag < language);
        assert!(language < plan);
        assert!(plan < apply);
        assert_eq!(calls.last(), Some(&EngineCall::Quit(0)));
    }

    #[tokio::test]
    async fn test_apply_status_hidden_by_default() {
        let engine = absent_engine().with_apply_status(1603);
        let mut bootstrapper =
            Bootstrapper::new(engine, HeadlessUi::accepting(None), DriverStatus::installed(0x190));

        let outcome = bootstrapper.run(LaunchAction::Install, |_| {}).await.unwrap();
        assert_eq!(outcome.kind, OutcomeKind::Applied { status: 1603 });
        assert_eq!(outcome.exit_code, 0);
        assert_eq!(bootstrapper.engine().quit_codes(), vec![0]);
    }

    #[tokio::test]
    async fn test_apply_status_propagated_when_enabled() {
        let engine = absent_engine().with_apply_status(1603);
        let mut bootstrapper =
            Bootstrapper::new(engine, HeadlessUi::accepting(None), DriverStatus::installed(0x190))
                .with_options(BootstrapOptions {
                    propagate_apply_status: true,
                    ..Default::default()
                });

        let outcome = bootstrapper.run(LaunchAction::Install, |_| {}).await.unwrap();
        assert_eq!(outcome.exit_code, 1603);
        assert_eq!(bootstrapper.engine().quit_codes(), vec![1603]);
    }

    #[tokio::test]
    async fn test_detection_timeout_quits_with_failure() {
        let engine = absent_engine().unresponsive();
        let mut bootstrapper =
            Bootstrapper::new(engine, HeadlessUi::accepting(None), DriverStatus::not_installed())
                .with_options(BootstrapOptions {
                    detect_timeout: Duration::from_millis(50),
                    ..Default::default()
                });

        let result = bootstrapper.run(LaunchAction::Install, |_| {}).await;
        assert!(matches!(result, Err(BootstrapError::DetectionTimedOut { .. })));

        let engine = bootstrapper.engine();
        assert_eq!(engine.quit_codes(), vec![1603]);
        assert!(engine.plan_calls().is_empty());
        assert!(engine.variables().is_empty());
    }

    #[tokio::test]
    async fn test_stream_closed_during_detection() {
        let engine = absent_engine().disconnecting_on_detect();
        let mut bootstrapper =
            Bootstrapper::new(engine, HeadlessUi::accepting(None), DriverStatus::not_installed());

        let result = bootstrapper.run(LaunchAction::Install, |_| {}).await;
        match result {
            Err(BootstrapError::EngineDisconnected { waiting_for, .. }) => {
                assert_eq!(waiting_for, "detecting");
            }
            other => panic!("Expected disconnect, got {:?}", other),
        }

        let engine = bootstrapper.engine();
        assert_eq!(engine.quit_codes(), vec![1603]);
        assert!(engine.plan_calls().is_empty());
    }

    #[tokio::test]
    async fn test_stream_closed_during_apply() {
        let engine = absent_engine().disconnecting_on_apply();
        let mut bootstrapper =
            Bootstrapper::new(engine, HeadlessUi::accepting(None), DriverStatus::installed(0x190));

        let result = bootstrapper.run(LaunchAction::Install, |_| {}).await;
        match result {
            Err(BootstrapError::EngineDisconnected { waiting_for, .. }) => {
                assert_eq!(waiting_for, "applying");
            }
            other => panic!("Expected disconnect, got {:?}", other),
        }

        let engine = bootstrapper.engine();
        assert_eq!(engine.apply_count(), 1);
        assert_eq!(engine.quit_codes(), vec![1603]);
    }

    #[tokio::test]
    async fn test_custom_product_config() {
        let product = ProductConfig::from_toml_str(
            r#"
            main_package = "CloudLite"
            supported_locales = ["zh-CN", "en-US"]

            [prerequisite]
            variable = "InstallDriver"
            min_version = 0x200
            "#,
        )
        .unwrap();
        let engine =
            ScriptedEngine::new().with_package(PackageIdentity::new("CloudLite"), PackageState::Absent);
        let mut bootstrapper =
            Bootstrapper::new(engine, HeadlessUi::accepting(None), DriverStatus::installed(0x190))
                .with_product(product);

        bootstrapper.run(LaunchAction::Install, |_| {}).await.unwrap();

        let engine = bootstrapper.engine();
        assert_eq!(engine.variable("InstallDriver").as_deref(), Some("yes"));
        assert_eq!(engine.variable(INSTALL_DRIVER_VARIABLE), None);
        // Default locale is the first configured one.
        assert_eq!(engine.variable(PRODUCT_LANGUAGE_VARIABLE).as_deref(), Some("2052"));
    }

    #[tokio::test]
    async fn test_progress_stages_order() {
        let stages = Arc::new(Mutex::new(Vec::new()));
        let stages_clone = stages.clone();

        let mut bootstrapper = Bootstrapper::new(
            absent_engine(),
            HeadlessUi::accepting(None),
            DriverStatus::not_installed(),
        );
        bootstrapper
            .run(LaunchAction::Install, move |progress| {
                let name = match &progress {
                    BootstrapProgress::Detecting => "Detecting",
                    BootstrapProgress::Detected { .. } => "Detected",
                    BootstrapProgress::AwaitingConsent => "AwaitingConsent",
                    BootstrapProgress::CheckingPrerequisite { .. } => "CheckingPrerequisite",
                    BootstrapProgress::PrerequisiteRequired { .. } => "PrerequisiteRequired",
                    BootstrapProgress::Planning { .. } => "Planning",
                    BootstrapProgress::Applying => "Applying",
                    BootstrapProgress::ApplyProgress { .. } => return,
                    BootstrapProgress::Completed { .. } => "Completed",
                };
                stages_clone.lock().unwrap().push(name);
            })
            .await
            .unwrap();

        assert_eq!(
            *stages.lock().unwrap(),
            vec![
                "Detecting",
                "Detected",
                "AwaitingConsent",
                "CheckingPrerequisite",
                "PrerequisiteRequired",
                "Planning",
                "Applying",
                "Completed",
            ]
        );
    }
}
