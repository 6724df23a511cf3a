//! User configuration stored as TOML.

use std::path::{Path, PathBuf};

use scout_core::EXPORT_FILE_NAME;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Backend used when nothing else is configured.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

/// Settings read from `config.toml`.
///
/// Unknown keys are ignored and missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    /// Base URL of the search backend (`http`, `https`, `ws` or `wss`).
    pub server_url: String,
    /// Where `export` writes the CSV when no path is given.
    pub export_path: PathBuf,
    /// Launch the system browser on `open`. When false the links are only
    /// printed.
    pub open_links: bool,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            export_path: PathBuf::from(EXPORT_FILE_NAME),
            open_links: true,
        }
    }
}

impl ScoutConfig {
    /// Load from the platform config directory.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load from `path`, falling back to defaults when the file is missing or
    /// cannot be parsed.
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "no config file, using defaults");
                return Self::default();
            }
        };
        toml::from_str(&content).unwrap_or_else(|err| {
            warn!(path = %path.display(), error = %err, "ignoring unreadable config file");
            Self::default()
        })
    }

    /// Save to `path`, creating its parent directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "OpportunityScout", "opportunity-scout")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Replace the server URL with a command-line or environment override.
    #[must_use]
    pub fn with_server_override(mut self, server: Option<String>) -> Self {
        if let Some(server) = server.filter(|s| !s.trim().is_empty()) {
            self.server_url = server;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: ScoutConfig = toml::from_str("open_links = false").unwrap();
        assert!(!config.open_links);
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.export_path, PathBuf::from("opportunities.csv"));
    }

    #[test]
    fn blank_override_is_ignored() {
        let config = ScoutConfig::default().with_server_override(Some("  ".into()));
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        let config = config.with_server_override(Some("https://scout.example.com".into()));
        assert_eq!(config.server_url, "https://scout.example.com");
    }
}
