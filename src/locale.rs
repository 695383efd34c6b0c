//! Supported UI locales for the language-choice dialog.

use serde::{Deserialize, Serialize};

/// A locale the bundle ships UI strings for.
///
/// Each locale carries its BCP-47 tag and the numeric Windows locale id
/// (LCID) that is handed to the MSI through the `ProductLanguage` variable.
///
/// # Example
///
/// ```rust
/// use pcloud_bootstrapper::Locale;
///
/// assert_eq!(Locale::ZhCn.lcid(), 2052);
/// assert_eq!(Locale::EnUs.tag(), "en-US");
/// assert_eq!("zh-cn".parse::<Locale>().unwrap(), Locale::ZhCn);
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
#[strum(ascii_case_insensitive)]
pub enum Locale {
    #[strum(serialize = "en-US")]
    #[serde(rename = "en-US")]
    EnUs,
    #[strum(serialize = "zh-CN")]
    #[serde(rename = "zh-CN")]
    ZhCn,
}

impl Locale {
    pub fn lcid(&self) -> u32 {
        match self {
            Self::EnUs => 1033,
            Self::ZhCn => 2052,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::ZhCn => "zh-CN",
        }
    }
}

/// Render the comma-separated LCID list carried in the package template.
///
/// ```rust
/// use pcloud_bootstrapper::{lcid_list, Locale};
///
/// assert_eq!(lcid_list(&[Locale::EnUs, Locale::ZhCn]), "1033,2052");
/// ```
pub fn lcid_list(locales: &[Locale]) -> String {
    locales
        .iter()
        .map(|locale| locale.lcid().to_string())
        .collect::<Vec<_>>()
        .join(",")
}
