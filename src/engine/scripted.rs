//! In-memory engine that replays a scripted detection and apply.
//!
//! [`ScriptedEngine`] answers requests the way the real engine does: from
//! its own threads, through the broadcast notification stream. It records
//! every request and variable write so a run can be inspected afterwards,
//! which makes it suitable for dry runs and for tests.

use super::{EngineEvent, InstallerEngine, WindowHandle};
use crate::{LaunchAction, PackageIdentity, PackageState};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;
use tokio::sync::broadcast;
use tracing::debug;

const EVENT_CAPACITY: usize = 64;

/// Request on which the engine closes its stream without answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shutdown {
    Detect,
    Apply,
}

/// A request received by the [`ScriptedEngine`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Detect,
    Plan(LaunchAction),
    Apply(WindowHandle),
    Quit(i32),
    SetVariable { name: String, value: String },
}

/// Scripted stand-in for the installer engine.
///
/// # Example
///
/// ```rust
/// use pcloud_bootstrapper::{EngineCall, InstallerEngine, PackageIdentity, PackageState, ScriptedEngine};
///
/// let engine = ScriptedEngine::new()
///     .with_package(PackageIdentity::main(), PackageState::Absent)
///     .with_apply_status(0);
///
/// engine.set_string_variable("ProductLanguage", "2052");
/// assert_eq!(engine.variable("ProductLanguage").as_deref(), Some("2052"));
/// assert_eq!(engine.calls().len(), 1);
/// ```
#[derive(Debug)]
pub struct ScriptedEngine {
    /// `None` once the engine has shut its notification stream.
    events: Mutex<Option<broadcast::Sender<EngineEvent>>>,
    packages: Vec<(PackageIdentity, PackageState)>,
    detection_errors: Vec<String>,
    answers_detection: bool,
    shutdown_at: Option<Shutdown>,
    apply_errors: Vec<String>,
    apply_status: i32,
    calls: Mutex<Vec<EngineCall>>,
    variables: Mutex<BTreeMap<String, String>>,
}

impl Default for ScriptedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedEngine {
    /// An engine whose bundle reports no packages and whose apply succeeds.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            events: Mutex::new(Some(events)),
            packages: Vec::new(),
            detection_errors: Vec::new(),
            answers_detection: true,
            shutdown_at: None,
            apply_errors: Vec::new(),
            apply_status: 0,
            calls: Mutex::new(Vec::new()),
            variables: Mutex::new(BTreeMap::new()),
        }
    }

    /// Report `state` for `package` during detection.
    pub fn with_package(mut self, package: PackageIdentity, state: PackageState) -> Self {
        self.packages.push((package, state));
        self
    }

    /// Never answer `detect()`, as a stalled engine would.
    pub fn unresponsive(mut self) -> Self {
        self.answers_detection = false;
        self
    }

    /// Raise an error notification at the start of detection.
    pub fn with_detection_error(mut self, message: impl Into<String>) -> Self {
        self.detection_errors.push(message.into());
        self
    }

    /// Close the notification stream instead of answering `detect()`.
    pub fn disconnecting_on_detect(mut self) -> Self {
        self.shutdown_at = Some(Shutdown::Detect);
        self
    }

    /// Close the notification stream instead of answering `apply()`.
    pub fn disconnecting_on_apply(mut self) -> Self {
        self.shutdown_at = Some(Shutdown::Apply);
        self
    }

    /// Raise an error notification while applying.
    pub fn with_apply_error(mut self, message: impl Into<String>) -> Self {
        self.apply_errors.push(message.into());
        self
    }

    /// Status carried by the `ApplyComplete` notification.
    pub fn with_apply_status(mut self, status: i32) -> Self {
        self.apply_status = status;
        self
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        lock(&self.calls).clone()
    }

    pub fn variable(&self, name: &str) -> Option<String> {
        lock(&self.variables).get(name).cloned()
    }

    pub fn variables(&self) -> BTreeMap<String, String> {
        lock(&self.variables).clone()
    }

    pub fn detect_count(&self) -> usize {
        self.count(|call| matches!(call, EngineCall::Detect))
    }

    pub fn plan_calls(&self) -> Vec<LaunchAction> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                EngineCall::Plan(action) => Some(*action),
                _ => None,
            })
            .collect()
    }

    pub fn apply_count(&self) -> usize {
        self.count(|call| matches!(call, EngineCall::Apply(_)))
    }

    pub fn quit_codes(&self) -> Vec<i32> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                EngineCall::Quit(code) => Some(*code),
                _ => None,
            })
            .collect()
    }

    fn count(&self, predicate: impl Fn(&EngineCall) -> bool) -> usize {
        lock(&self.calls).iter().filter(|call| predicate(*call)).count()
    }

    /// Drop the stream's sender; receivers see `Closed` once in-flight
    /// deliveries finish.
    fn shut_down(&self) {
        debug!("scripted engine closing its notification stream");
        lock(&self.events).take();
    }

    fn record(&self, call: EngineCall) {
        debug!(?call, "scripted engine request");
        lock(&self.calls).push(call);
    }

    /// Deliver `events` from an engine-owned thread.
    fn raise(&self, events: Vec<EngineEvent>) {
        let Some(sender) = lock(&self.events).clone() else {
            return;
        };
        thread::spawn(move || {
            for event in events {
                // No subscriber is not an error for a notification stream.
                let _ = sender.send(event);
            }
        });
    }
}

impl InstallerEngine for ScriptedEngine {
    fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        match lock(&self.events).as_ref() {
            Some(sender) => sender.subscribe(),
            // A receiver whose sender is already gone reports `Closed`.
            None => broadcast::channel(1).1,
        }
    }

    fn detect(&self) {
        self.record(EngineCall::Detect);
        if self.shutdown_at == Some(Shutdown::Detect) {
            self.shut_down();
            return;
        }
        if !self.answers_detection {
            return;
        }
        let mut events: Vec<_> = self
            .detection_errors
            .iter()
            .map(|message| EngineEvent::Error {
                message: message.clone(),
            })
            .collect();
        events.extend(self.packages.iter().map(|(package_id, state)| {
            EngineEvent::DetectPackageComplete {
                package_id: package_id.clone(),
                state: *state,
            }
        }));
        events.push(EngineEvent::DetectComplete);
        self.raise(events);
    }

    fn plan(&self, action: LaunchAction) {
        self.record(EngineCall::Plan(action));
        self.raise(vec![EngineEvent::PlanComplete]);
    }

    fn apply(&self, window: WindowHandle) {
        self.record(EngineCall::Apply(window));
        if self.shutdown_at == Some(Shutdown::Apply) {
            self.shut_down();
            return;
        }
        let mut events = vec![EngineEvent::Progress { percent: 0 }];
        events.extend(
            self.apply_errors
                .iter()
                .map(|message| EngineEvent::Error {
                    message: message.clone(),
                }),
        );
        events.push(EngineEvent::Progress { percent: 100 });
        events.push(EngineEvent::ApplyComplete {
            status: self.apply_status,
        });
        self.raise(events);
    }

    fn quit(&self, exit_code: i32) {
        self.record(EngineCall::Quit(exit_code));
    }

    fn set_string_variable(&self, name: &str, value: &str) {
        self.record(EngineCall::SetVariable {
            name: name.to_string(),
            value: value.to_string(),
        });
        lock(&self.variables).insert(name.to_string(), value.to_string());
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
