use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Cross-platform configuration directory manager
pub struct ConfigManager;

impl ConfigManager {
    /// Get the main configuration directory path following platform conventions:
    /// - Linux: $XDG_CONFIG_HOME/autopush or ~/.config/autopush
    /// - macOS: ~/Library/Application Support/autopush
    /// - Windows: %APPDATA%\autopush
    pub fn config_dir() -> Result<PathBuf> {
        #[cfg(target_os = "linux")]
        {
            // Follow XDG Base Directory Specification
            if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
                Ok(PathBuf::from(xdg_config).join("autopush"))
            } else {
                let home = dirs::home_dir().context("Failed to get home directory")?;
                Ok(home.join(".config").join("autopush"))
            }
        }

        #[cfg(target_os = "macos")]
        {
            let home = dirs::home_dir().context("Failed to get home directory")?;
            Ok(home
                .join("Library")
                .join("Application Support")
                .join("autopush"))
        }

        #[cfg(target_os = "windows")]
        {
            Ok(dirs::config_dir()
                .context("Failed to get Windows config directory")?
                .join("autopush"))
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
        {
            let home = dirs::home_dir().context("Failed to get home directory")?;
            Ok(home.join(".autopush"))
        }
    }

    /// Get the settings file path (config.toml)
    pub fn settings_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Get the log file path
    pub fn log_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("autopush.log"))
    }

    /// Ensure the configuration directory exists
    pub fn ensure_config_dir() -> Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        std::fs::create_dir_all(&config_dir).with_context(|| {
            format!("Failed to create config directory: {}", config_dir.display())
        })?;
        Ok(config_dir)
    }
}

/// Persisted tool settings.
///
/// The displacement order controls which branch the tool moves the
/// checkout to before deleting the active branch: the first existing
/// name wins, and a fresh orphan branch is synthesized when none of
/// them exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Default integration branch the main workflow pushes to.
    #[serde(default = "default_branch")]
    pub default_branch: String,

    /// Branch names tried in order when the checkout must be displaced.
    #[serde(default = "default_displacement_order")]
    pub displacement_order: Vec<String>,
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_displacement_order() -> Vec<String> {
    vec!["main".to_string(), "master".to_string()]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_branch: default_branch(),
            displacement_order: default_displacement_order(),
        }
    }
}

impl Settings {
    /// Load settings from the config directory, falling back to
    /// defaults when no settings file exists yet.
    pub fn load() -> Result<Self> {
        let path = ConfigManager::settings_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))
    }

    /// Save settings to the config directory.
    pub fn save(&self) -> Result<()> {
        ConfigManager::ensure_config_dir()?;
        let path = ConfigManager::settings_path()?;

        let contents = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;

        Ok(())
    }
}
