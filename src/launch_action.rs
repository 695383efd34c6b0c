//! Launch action requested by the invoking process.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// The high-level operation requested of the bootstrapper.
///
/// Derived from the command line or registry context the engine was started
/// with. Read once at the start of a run and never mutated.
///
/// Names parse case-insensitively in kebab-case:
///
/// ```rust
/// use pcloud_bootstrapper::LaunchAction;
///
/// let action: LaunchAction = "Update-Replace".parse().unwrap();
/// assert_eq!(action, LaunchAction::UpdateReplace);
/// assert_eq!(action.to_string(), "update-replace");
/// assert!("install".parse::<LaunchAction>().unwrap().is_install());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum LaunchAction {
    Install,
    Uninstall,
    Repair,
    Modify,
    Layout,
    Update,
    UpdateReplace,
    UpdateReplaceEmbedded,
    Unknown,
}

impl LaunchAction {
    /// Only `Install` proceeds past the pre-flight decision.
    pub fn is_install(&self) -> bool {
        matches!(self, Self::Install)
    }

    /// Iterator over every launch action.
    pub fn all() -> impl Iterator<Item = Self> {
        <Self as IntoEnumIterator>::iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("repair".parse::<LaunchAction>().unwrap(), LaunchAction::Repair);
        assert_eq!("LAYOUT".parse::<LaunchAction>().unwrap(), LaunchAction::Layout);
        assert_eq!(
            "update-replace-embedded".parse::<LaunchAction>().unwrap(),
            LaunchAction::UpdateReplaceEmbedded
        );
        assert!("reinstall".parse::<LaunchAction>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for action in LaunchAction::all() {
            assert_eq!(action.to_string().parse::<LaunchAction>().unwrap(), action);
        }
    }

    #[test]
    fn test_all_iterator() {
        let all: Vec<_> = LaunchAction::all().collect();
        assert_eq!(all.len(), 9);
        assert_eq!(all.iter().filter(|a| a.is_install()).count(), 1);
    }
}
