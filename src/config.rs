//! Configuration loading and management
//!
//! Handles parsing of `taskboard.toml`. Every section is optional and
//! falls back to its defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Config file name inside the platform config directory
pub const CONFIG_FILE: &str = "taskboard.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Store location
    #[serde(default)]
    pub store: StoreConfig,

    /// Identity used when nobody is signed in
    #[serde(default)]
    pub user: UserConfig,

    /// Team roster configuration
    #[serde(default)]
    pub team: TeamConfig,

    /// Task configuration
    #[serde(default)]
    pub tasks: TasksConfig,
}

/// Store-related configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding `<key>.json` documents; platform data dir when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default = "default_guest_name")]
    pub guest_name: String,

    #[serde(default = "default_guest_email")]
    pub guest_email: String,
}

fn default_guest_name() -> String {
    "Guest User".to_string()
}

fn default_guest_email() -> String {
    "guest@example.com".to_string()
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            guest_name: default_guest_name(),
            guest_email: default_guest_email(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamConfig {
    /// Write the fixture roster the first time `teamMembers` is read
    #[serde(default = "default_true")]
    pub seed_fixtures: bool,

    /// Placeholder avatar service; `?name=...&background=random` is appended
    #[serde(default = "default_avatar_base_url")]
    pub avatar_base_url: String,
}

fn default_true() -> bool {
    true
}

fn default_avatar_base_url() -> String {
    "https://ui-avatars.com/api/".to_string()
}

impl Default for TeamConfig {
    fn default() -> Self {
        Self {
            seed_fixtures: true,
            avatar_base_url: default_avatar_base_url(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Reject new tasks whose assignee or creator is not on the team
    #[serde(default)]
    pub require_known_members: bool,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, else the platform config file; defaults when
    /// the file is missing or does not validate.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path(),
        };

        match path {
            Some(path) if path.exists() => match Self::load(&path) {
                Ok(config) => config,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "ignoring invalid config");
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Store directory: explicit override, then `[store] path`, then the
    /// platform data directory.
    pub fn store_dir(&self, override_dir: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = override_dir {
            return Ok(dir.to_path_buf());
        }
        if let Some(dir) = self.store.path.as_ref() {
            return Ok(dir.clone());
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| {
                Error::InvalidConfig(
                    "no home directory found; pass --store or set store.path".to_string(),
                )
            })
    }

    fn validate(&self) -> Result<()> {
        if self.user.guest_name.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "user.guest_name cannot be empty".to_string(),
            ));
        }
        let base = self.team.avatar_base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(Error::InvalidConfig(format!(
                "team.avatar_base_url must be an http(s) URL, got '{base}'"
            )));
        }
        if let Some(path) = self.store.path.as_ref() {
            if path.as_os_str().is_empty() {
                return Err(Error::InvalidConfig(
                    "store.path cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "taskboard")
}

/// `taskboard.toml` in the platform config directory
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}
