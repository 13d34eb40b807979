//! Configuration for ticket-desk
//!
//! Settings are layered, later sources winning:
//! built-in defaults, the user config file, the project's
//! `.ticket-desk/config.yaml`, then `TICKET_DESK__<SECTION>__<KEY>`
//! environment variables.

use crate::engine::DEFAULT_WRITE_RETRIES;
use crate::error::{DeskError, Result};
use crate::storage::LockOptions;
use chrono::format::{Item, StrftimeItems};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const PROJECT_DIR_NAME: &str = ".ticket-desk";
pub const CONFIG_FILE_NAME: &str = "config.yaml";
const ENV_PREFIX: &str = "TICKET_DESK";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub project: ProjectConfig,
    pub storage: StorageConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Attempts per lifecycle operation when a write conflicts
    pub write_retries: u32,
    pub lock_retries: u32,
    pub lock_retry_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// chrono format string for timestamps in text output
    pub date_format: String,
    pub color: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "ticket-desk".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let lock = LockOptions::default();
        Self {
            write_retries: DEFAULT_WRITE_RETRIES,
            lock_retries: lock.retries,
            lock_retry_delay_ms: u64::try_from(lock.retry_delay.as_millis()).unwrap_or(20),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            date_format: "%Y-%m-%d %H:%M".to_string(),
            color: true,
        }
    }
}

impl UiConfig {
    /// Rejects a `date_format` chrono cannot render
    pub fn validate(&self) -> Result<()> {
        if is_valid_date_format(&self.date_format) {
            Ok(())
        } else {
            Err(DeskError::Config(config::ConfigError::Message(format!(
                "ui.date_format: invalid format string '{}'",
                self.date_format
            ))))
        }
    }
}

/// True when every specifier in `format` is one chrono understands
pub fn is_valid_date_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

impl StorageConfig {
    #[must_use]
    pub const fn lock_options(&self) -> LockOptions {
        LockOptions {
            retries: self.lock_retries,
            retry_delay: Duration::from_millis(self.lock_retry_delay_ms),
        }
    }
}

impl Config {
    /// Loads configuration for the project whose data directory is
    /// `project_dir`; `None` skips the project layer
    pub fn load(project_dir: Option<&Path>) -> Result<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(user_config) = Self::user_config_path() {
            builder = builder.add_source(config::File::from(user_config).required(false));
        }

        if let Some(dir) = project_dir {
            builder =
                builder.add_source(config::File::from(dir.join(CONFIG_FILE_NAME)).required(false));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.ui.validate()?;
        Ok(config)
    }

    /// Loads configuration for the project containing the current directory,
    /// or without a project layer when there is none
    pub fn load_or_default() -> Result<Self> {
        let project_dir = std::env::current_dir()
            .ok()
            .and_then(|cwd| find_project_dir(&cwd));
        Self::load(project_dir.as_deref())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Location of the per-user config file
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "ticket-desk").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

/// Walks up from `start` looking for a `.ticket-desk` directory
pub fn find_project_dir(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(PROJECT_DIR_NAME))
        .find(|candidate| candidate.is_dir())
}
