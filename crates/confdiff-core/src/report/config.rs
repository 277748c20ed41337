//! Report configuration (TOML).

use crate::errors::{io_error, DiffError};
use crate::visibility::ReportMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Report settings
///
/// ```toml
/// title = "Pilot vs Production"
/// mode = "always-show"
/// body_file = "report.html"
/// toc_file = "toc.html"
/// ```
///
/// Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub title: String,
    pub mode: ReportMode,
    pub body_file: String,
    pub toc_file: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "Configuration Change Report".to_string(),
            mode: ReportMode::Collapsible,
            body_file: "report.html".to_string(),
            toc_file: "toc.html".to_string(),
        }
    }
}

impl ReportConfig {
    /// Parse and validate TOML text
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for malformed TOML, unknown keys or bad file names.
    pub fn from_toml_str(text: &str) -> Result<Self, DiffError> {
        let config: ReportConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file
    ///
    /// # Errors
    ///
    /// `Io` when the file cannot be read, otherwise as [`Self::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, DiffError> {
        let text = fs::read_to_string(path).map_err(|e| io_error("read_config", e))?;
        Self::from_toml_str(&text)
    }

    pub fn with_mode(mut self, mode: ReportMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Output file names must be plain, non-empty and distinct
    ///
    /// # Errors
    ///
    /// `InvalidConfig` naming the offending setting.
    pub fn validate(&self) -> Result<(), DiffError> {
        for (key, value) in [("body_file", &self.body_file), ("toc_file", &self.toc_file)] {
            if value.is_empty() || value.contains(['/', '\\']) || value == "." || value == ".." {
                return Err(DiffError::InvalidConfig {
                    reason: format!("{} must be a plain file name, got '{}'", key, value),
                });
            }
        }
        if self.body_file == self.toc_file {
            return Err(DiffError::InvalidConfig {
                reason: "body_file and toc_file must differ".to_string(),
            });
        }
        Ok(())
    }
}
