//! Configuration types for the vault + conversation session.
//!
//! Configuration is an explicit load/save boundary: it is read from a TOML
//! file once, passed by value to the components that need it, and written
//! back only when the caller asks. There is no ambient global settings state.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MurmurConfig {
    /// Hosted conversation agent settings.
    pub agent: AgentConfig,
    /// Note vault settings.
    pub vault: VaultConfig,
}

/// Hosted conversation agent configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Agent identifier, issued by the hosting platform.
    ///
    /// This is the one field that must be filled in before a session can be
    /// started; everything else has a usable default.
    pub agent_id: String,
    /// WebSocket endpoint of the hosted conversation service.
    pub endpoint: String,
    /// File name the `saveNote` client tool writes to.
    pub new_note_name: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            agent_id: String::new(),
            endpoint: "wss://api.elevenlabs.io/v1/convai/conversation".to_owned(),
            new_note_name: "New Note.md".to_owned(),
        }
    }
}

/// Note vault configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Root directory of the markdown note vault.
    pub root_dir: PathBuf,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            root_dir: default_vault_root(),
        }
    }
}

/// Returns the default vault root: `~/.murmur/notes`.
fn default_vault_root() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".murmur").join("notes")
    } else {
        PathBuf::from("/tmp").join(".murmur").join("notes")
    }
}

impl MurmurConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::MurmurError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::MurmurError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/murmur/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("murmur").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("murmur")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/murmur-config/config.toml")
        }
    }
}
