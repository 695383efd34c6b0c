//! Pre-flight detection of the main package.

use crate::engine::{EngineEvent, InstallerEngine};
use crate::{BootstrapError, PackageIdentity, PackageState};
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::{debug, warn};

/// What the detection observer saw before it stopped listening.
#[derive(Debug)]
enum Answer {
    State(PackageState),
    NotReported,
    Closed,
}

/// Ask the engine whether `package` is installed, waiting at most `bound`.
///
/// # Detection Process
///
/// 1. Register an observer on the engine's notification stream
/// 2. Request the engine's detection pass (exactly once)
/// 3. The observer hands the first state reported for `package` back
///    through a one-shot channel and stops
/// 4. Wait on that channel with the given bound
///
/// The observer runs on its own task; the engine delivers notifications
/// from its own threads, so nothing here blocks the engine.
///
/// # Errors
///
/// - `DetectionTimedOut` if no answer arrives within `bound`
/// - `PackageNotReported` if the pass completes without mentioning `package`
/// - `EngineDisconnected` if the notification stream closes first
///
/// # Example
///
/// ```rust
/// use pcloud_bootstrapper::{detect_main_package, PackageIdentity, PackageState, ScriptedEngine};
/// use std::time::Duration;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let engine = ScriptedEngine::new()
///         .with_package(PackageIdentity::main(), PackageState::Present);
///     let state = detect_main_package(&engine, &PackageIdentity::main(), Duration::from_secs(5))
///         .await
///         .unwrap();
///     assert!(state.is_present());
/// }
/// ```
pub async fn detect_main_package<E>(
    engine: &E,
    package: &PackageIdentity,
    bound: Duration,
) -> Result<PackageState, BootstrapError>
where
    E: InstallerEngine + ?Sized,
{
    let mut events = engine.subscribe();
    let (answer_tx, answer_rx) = oneshot::channel();
    let watched = package.clone();

    let observer = tokio::spawn(async move {
        let answer = loop {
            match events.recv().await {
                Ok(event) => {
                    if let Some(state) = event.detected_state(&watched) {
                        break Answer::State(state);
                    }
                    if event == EngineEvent::DetectComplete {
                        break Answer::NotReported;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "detection observer fell behind the engine");
                }
                Err(RecvError::Closed) => break Answer::Closed,
            }
        };
        // The waiting side may already have given up.
        let _ = answer_tx.send(answer);
    });

    debug!(%package, "requesting detection pass");
    engine.detect();

    let outcome = timeout(bound, answer_rx).await;
    observer.abort();

    match outcome {
        Ok(Ok(Answer::State(state))) => {
            debug!(%package, %state, "package detected");
            Ok(state)
        }
        Ok(Ok(Answer::NotReported)) => Err(BootstrapError::PackageNotReported {
            package: package.clone(),
            fix: format!(
                "The setup bundle does not contain a package named {}. Rebuild the bundle.",
                package
            ),
        }),
        Ok(Ok(Answer::Closed)) | Ok(Err(_)) => Err(BootstrapError::EngineDisconnected {
            waiting_for: "detecting",
            fix: "The installer engine shut down unexpectedly. Run the setup again.".to_string(),
        }),
        Err(_) => {
            warn!(%package, ?bound, "detection did not complete in time");
            Err(BootstrapError::DetectionTimedOut {
                package: package.clone(),
                duration: bound,
                fix: "The installer engine did not finish scanning installed products. \
                      Restart the setup, or close other running installers first."
                    .to_string(),
            })
        }
    }
}
