use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ConfabError, Result};

/// Top-level configuration for the Confab dispatcher.
///
/// Loaded from `~/.confab/config.toml` by default. Each section corresponds
/// to a bounded context or cross-cutting concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfabConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub vault: VaultConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Default for ConfabConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            session: SessionConfig::default(),
            vault: VaultConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl ConfabConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ConfabConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfabError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Session lifecycle settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Literal text that closes a session, matched case-insensitively
    /// against the trimmed utterance.
    pub termination_keyword: String,
    /// Message sent when a conversation member joins.
    pub greeting: String,
    /// Reply sent when the answer source returns no candidates.
    pub no_answer_reply: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            termination_keyword: "finish".to_string(),
            greeting: "Hello! How are you feeling today?".to_string(),
            no_answer_reply: "Sorry, I could not find an answer to that.".to_string(),
        }
    }
}

/// Confidentiality vault settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Shared secret the record key is derived from. Rotation is out of
    /// scope; records sealed under a different secret will not open.
    pub shared_key: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            shared_key: "confab-dev-secret".to_string(),
        }
    }
}

/// Durable store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database path.
    pub db_path: String,
    /// Collection holding sealed per-turn interaction records.
    pub interactions_collection: String,
    /// Collection holding sealed per-user summary records.
    pub summaries_collection: String,
    /// Collection holding plain user profiles.
    pub profiles_collection: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: "~/.confab/records.db".to_string(),
            interactions_collection: "interactions".to_string(),
            summaries_collection: "summaries".to_string(),
            profiles_collection: "profiles".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConfabConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.session.termination_keyword, "finish");
        assert_eq!(config.storage.interactions_collection, "interactions");
        assert_eq!(config.storage.summaries_collection, "summaries");
        assert_eq!(config.storage.profiles_collection, "profiles");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = ConfabConfig::default();
        config.session.termination_keyword = "goodbye".to_string();
        config.vault.shared_key = "rotated".to_string();
        config.save(&path).unwrap();

        let loaded = ConfabConfig::load(&path).unwrap();
        assert_eq!(loaded.session.termination_keyword, "goodbye");
        assert_eq!(loaded.vault.shared_key, "rotated");
        assert_eq!(loaded.general.log_level, "info");
    }

    #[test]
    fn test_load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.toml");
        assert!(ConfabConfig::load(&path).is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.toml");
        let config = ConfabConfig::load_or_default(&path);
        assert_eq!(config.session.termination_keyword, "finish");
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[session]\ntermination_keyword = \"done\"\n").unwrap();

        let config = ConfabConfig::load(&path).unwrap();
        assert_eq!(config.session.termination_keyword, "done");
        // Untouched sections fall back to defaults.
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.storage.summaries_collection, "summaries");
    }

    #[test]
    fn test_load_or_default_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "this is not toml [[[").unwrap();

        let config = ConfabConfig::load_or_default(&path);
        assert_eq!(config.session.termination_keyword, "finish");
    }
}
