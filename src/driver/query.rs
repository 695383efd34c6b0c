//! Driver query backed by the driver's control tool.

use super::parser::parse_driver_version;
use super::path_finder::find_executable;
use super::{DriverQuery, DriverStatus};
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Timeout for the control tool to print its version.
const QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Queries a driver by running its control tool and parsing the output.
///
/// Any failure to find, run or parse the tool reports the driver as not
/// installed, which makes the bundle (re)install it.
///
/// # Example
///
/// ```rust,no_run
/// use pcloud_bootstrapper::{CommandDriverQuery, DriverQuery};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let status = CommandDriverQuery::dokan().query("Dokan").await;
///     println!("installed={} version={:#x}", status.installed, status.version);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CommandDriverQuery {
    /// Tool name looked up on PATH and in install directories.
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Duration,
}

impl CommandDriverQuery {
    /// `dokanctl /v`, which prints the library and driver versions.
    pub fn dokan() -> Self {
        Self {
            program: "dokanctl".to_string(),
            args: vec!["/v".to_string()],
            timeout: QUERY_TIMEOUT,
        }
    }

    async fn run(&self, path: &Path) -> Option<String> {
        let mut command = Command::new(path);
        command.args(&self.args).kill_on_drop(true);

        let output = match timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!(path = %path.display(), error = %e, "failed to run driver tool");
                return None;
            }
            Err(_) => {
                warn!(path = %path.display(), timeout = ?self.timeout, "driver tool timed out");
                return None;
            }
        };

        if !output.status.success() {
            debug!(code = ?output.status.code(), "driver tool exited with failure");
            return None;
        }

        // Prefer stdout, fall back to stderr
        let out = if !output.stdout.is_empty() {
            output.stdout
        } else {
            output.stderr
        };
        Some(String::from_utf8_lossy(&out).into_owned())
    }
}

impl Default for CommandDriverQuery {
    fn default() -> Self {
        Self::dokan()
    }
}

impl DriverQuery for CommandDriverQuery {
    fn query(&self, driver: &str) -> impl Future<Output = DriverStatus> + Send {
        let driver = driver.to_string();
        async move {
            let Some(path) = find_executable(&self.program) else {
                debug!(%driver, program = %self.program, "driver tool not found");
                return DriverStatus::not_installed();
            };

            let status = self
                .run(&path)
                .await
                .and_then(|output| parse_driver_version(&output))
                .map(DriverStatus::installed)
                .unwrap_or_else(DriverStatus::not_installed);

            debug!(%driver, installed = status.installed, version = status.version, "driver queried");
            status
        }
    }
}
