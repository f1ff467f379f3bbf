use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tvlaunch_profiles::ProfileRegistry;

use crate::error::TvLaunchError;
use crate::normalize::Normalizer;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub playback: PlaybackConfig,
    pub players: PlayersConfig,
    pub install: InstallConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Tracing filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    pub finished_threshold: f64,
    pub default_title: String,
    pub default_playlist_title: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayersConfig {
    /// User player database merged over the embedded one.
    pub user_database: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallConfig {
    /// Appended to the host package id to form the content-reference authority.
    pub provider_suffix: String,
    pub archive_mime: String,
}

impl AppConfig {
    /// Load config: user file (if exists) replaces built-in defaults.
    pub fn load() -> Result<Self, TvLaunchError> {
        let user_path = Self::config_path();
        if user_path.exists() {
            Self::load_from(&user_path)
        } else {
            Self::defaults()
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, TvLaunchError> {
        let user_str =
            std::fs::read_to_string(path).map_err(|e| TvLaunchError::Config(e.to_string()))?;
        toml::from_str(&user_str).map_err(|e| TvLaunchError::Config(e.to_string()))
    }

    pub fn defaults() -> Result<Self, TvLaunchError> {
        toml::from_str(DEFAULT_CONFIG).map_err(|e| TvLaunchError::Config(e.to_string()))
    }

    /// Save current config to the user config file.
    pub fn save(&self) -> Result<(), TvLaunchError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), TvLaunchError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| TvLaunchError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "tvlaunch")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}

impl PlaybackConfig {
    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.finished_threshold)
    }
}

impl PlayersConfig {
    /// Embedded player database with the user database merged on top.
    pub fn load_registry(&self) -> Result<ProfileRegistry, TvLaunchError> {
        let mut registry = ProfileRegistry::embedded();
        if let Some(path) = &self.user_database {
            let user_str = std::fs::read_to_string(path).map_err(|e| {
                TvLaunchError::Config(format!("{}: {e}", path.display()))
            })?;
            let user = ProfileRegistry::from_toml(&user_str)?;
            registry.merge_user(&user);
        }
        Ok(registry)
    }
}

impl InstallConfig {
    pub fn authority_for(&self, own_package: &str) -> String {
        format!("{own_package}{}", self.provider_suffix)
    }
}
