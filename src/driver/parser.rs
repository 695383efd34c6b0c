//! Driver version parsing from control tool output.

use regex::Regex;
use std::sync::OnceLock;

/// Parse the driver version from the control tool's output.
///
/// Handles the formats the Dokan tools print:
///
/// - `Driver version : 400` -> 400 (preferred when present)
/// - `400` -> 400
///
/// The tool's own dotted version (`dokanctl : 2.0.6.1000`) is a library
/// version on a different scale than the driver threshold and is never
/// used. Returns `None` when no driver version can be found.
pub(crate) fn parse_driver_version(output: &str) -> Option<u32> {
    static DRIVER_LINE: OnceLock<Regex> = OnceLock::new();
    let driver_line = DRIVER_LINE.get_or_init(|| {
        Regex::new(r"(?i)driver\s+version\s*:\s*(\d+)").expect("Invalid regex pattern")
    });

    if let Some(caps) = driver_line.captures(output) {
        return caps.get(1).and_then(|m| m.as_str().parse().ok());
    }

    output.trim().parse().ok()
}
