//! Product configuration baked into the bootstrapper.
//!
//! [`ProductConfig::default()`] describes the Personal Cloud bundle. A TOML
//! file with the same shape can override any field, e.g. for a rebranded or
//! test bundle:
//!
//! ```toml
//! product_name = "Personal Cloud"
//! main_package = "PersonalCloudPackageId"
//! supported_locales = ["en-US", "zh-CN"]
//!
//! [prerequisite]
//! driver_name = "Dokan"
//! min_version = 0x190
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Locale, PackageIdentity};

/// Minimum Dokan driver version accepted without reinstalling it.
pub const DEFAULT_MIN_DRIVER_VERSION: u32 = 0x190;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadFailed(String),
    #[error("failed to parse config: {0}")]
    ParseFailed(String),
    #[error("config lists no supported locales")]
    NoLocales,
}

/// The driver prerequisite installed ahead of the main package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrerequisiteConfig {
    /// Name passed to the host driver query.
    pub driver_name: String,
    /// Versions strictly below this request a driver install.
    pub min_version: u32,
    /// Engine variable gating the driver package in the bundle.
    pub variable: String,
}

impl Default for PrerequisiteConfig {
    fn default() -> Self {
        Self {
            driver_name: "Dokan".to_string(),
            min_version: DEFAULT_MIN_DRIVER_VERSION,
            variable: crate::engine::INSTALL_DRIVER_VARIABLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductConfig {
    /// Shown in the "already installed" notice.
    pub product_name: String,
    pub main_package: PackageIdentity,
    /// Locales offered by the language dialog; the first is the default.
    pub supported_locales: Vec<Locale>,
    pub prerequisite: PrerequisiteConfig,
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            product_name: "Personal Cloud".to_string(),
            main_package: PackageIdentity::main(),
            supported_locales: vec![Locale::EnUs, Locale::ZhCn],
            prerequisite: PrerequisiteConfig::default(),
        }
    }
}

impl ProductConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: ProductConfig =
            toml::from_str(contents).map_err(|err| ConfigError::ParseFailed(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            fs::read_to_string(path).map_err(|err| ConfigError::ReadFailed(err.to_string()))?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.supported_locales.is_empty() {
            return Err(ConfigError::NoLocales);
        }
        Ok(())
    }

    /// Initial dialog selection.
    pub fn default_locale(&self) -> Locale {
        self.supported_locales
            .first()
            .copied()
            .unwrap_or(Locale::EnUs)
    }

    pub fn already_installed_notice(&self) -> String {
        format!("{} is already installed", self.product_name)
    }
}
