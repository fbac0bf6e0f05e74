use crate::conversation::ReplyDelay;
use crate::errors::{CampusError, CampusResult};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory name under the user's config dir
pub const APP_NAME: &str = "campus-assistant";

/// Configuration for the campus assistant
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AssistantConfig {
    pub assistant_name: Option<String>,
    pub log_level: Option<String>,
    pub catalog_path: Option<PathBuf>,
    pub reply_delay_ms: Option<u64>,
    pub reply_jitter_ms: Option<u64>,
    pub show_timestamps: Option<bool>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            assistant_name: Some("Campus AI Assistant".to_string()),
            log_level: Some("warn".to_string()),
            catalog_path: None,
            reply_delay_ms: Some(1000),
            reply_jitter_ms: Some(1000),
            show_timestamps: Some(true),
        }
    }
}

impl AssistantConfig {
    /// Loads configuration from a file if it exists, otherwise returns the default config.
    /// Keys missing from the file keep their default values.
    pub fn load_from_file(path: &Path) -> CampusResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            CampusError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            CampusError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        Ok(Self::default().merge(&config))
    }

    /// Same as `load_from_file`, but a broken file only produces a warning
    pub fn load_or_default(path: &Path) -> Self {
        Self::load_from_file(path).unwrap_or_else(|e| {
            warn!("{}; using default configuration", e);
            Self::default()
        })
    }

    /// Saves configuration to a file
    pub fn save_to_file(&self, path: &Path) -> CampusResult<()> {
        let content = toml::to_string(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                CampusError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        fs::write(path, content)?;
        Ok(())
    }

    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            assistant_name: other
                .assistant_name
                .clone()
                .or_else(|| self.assistant_name.clone()),
            log_level: other.log_level.clone().or_else(|| self.log_level.clone()),
            catalog_path: other
                .catalog_path
                .clone()
                .or_else(|| self.catalog_path.clone()),
            reply_delay_ms: other.reply_delay_ms.or(self.reply_delay_ms),
            reply_jitter_ms: other.reply_jitter_ms.or(self.reply_jitter_ms),
            show_timestamps: other.show_timestamps.or(self.show_timestamps),
        }
    }

    pub fn assistant_name(&self) -> &str {
        self.assistant_name.as_deref().unwrap_or("Assistant")
    }

    pub fn show_timestamps(&self) -> bool {
        self.show_timestamps.unwrap_or(true)
    }

    pub fn reply_delay(&self) -> ReplyDelay {
        let defaults = ReplyDelay::default();
        ReplyDelay::new(
            self.reply_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.base),
            self.reply_jitter_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.jitter),
        )
    }
}

/// Helper function to get default config directory
pub fn get_default_config_dir(app_name: &str) -> CampusResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .ok_or_else(|| {
            CampusError::Config("Could not determine home directory".to_string())
        })?;

    Ok(config_dir.join(app_name))
}

/// Helper function to get default config file path
pub fn get_default_config_file(app_name: &str) -> CampusResult<PathBuf> {
    let config_dir = get_default_config_dir(app_name)?;
    Ok(config_dir.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = AssistantConfig::load_from_file(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config, AssistantConfig::default());
        assert_eq!(config.reply_delay(), ReplyDelay::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "reply_delay_ms = 0\nreply_jitter_ms = 250\nshow_timestamps = false\n")
            .unwrap();

        let config = AssistantConfig::load_from_file(&path).unwrap();
        assert_eq!(config.assistant_name(), "Campus AI Assistant");
        assert!(!config.show_timestamps());
        assert_eq!(
            config.reply_delay(),
            ReplyDelay::new(Duration::ZERO, Duration::from_millis(250))
        );
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "reply_delay_ms = \"soon\"").unwrap();

        let err = AssistantConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, CampusError::Config(_)));
        assert_eq!(AssistantConfig::load_or_default(&path), AssistantConfig::default());
    }

    #[test]
    fn test_save_creates_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = AssistantConfig {
            catalog_path: Some(PathBuf::from("/srv/campus/catalog.toml")),
            ..AssistantConfig::default()
        };

        config.save_to_file(&path).unwrap();
        assert_eq!(AssistantConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_merge_prefers_other() {
        let base = AssistantConfig::default();
        let overrides = AssistantConfig {
            assistant_name: Some("Campus Bot".to_string()),
            log_level: None,
            catalog_path: None,
            reply_delay_ms: Some(10),
            reply_jitter_ms: None,
            show_timestamps: None,
        };

        let merged = base.merge(&overrides);
        assert_eq!(merged.assistant_name(), "Campus Bot");
        assert_eq!(merged.log_level.as_deref(), Some("warn"));
        assert_eq!(merged.reply_delay_ms, Some(10));
        assert_eq!(merged.reply_jitter_ms, Some(1000));
    }
}
