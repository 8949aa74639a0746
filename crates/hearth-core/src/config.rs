use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{HearthError, Result};

/// Environment variable that overrides the configured API base URL.
pub const API_URL_ENV: &str = "HEARTH_API_URL";

/// Top-level configuration for the Hearth client.
///
/// Loaded from `~/.hearth/config.toml` by default. Each section covers one
/// subsystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HearthConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub listing: ListingConfig,
}

impl HearthConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: HearthConfig = toml::from_str(&content)?;
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
            toml::to_string_pretty(self).map_err(|e| HearthError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Resolve the API base URL.
    ///
    /// Resolution order: `HEARTH_API_URL` environment variable, then the
    /// configured `[api] base_url`. Trailing slashes are stripped so paths
    /// can be joined with a plain `/`.
    pub fn api_base_url(&self) -> String {
        let url = std::env::var(API_URL_ENV).unwrap_or_else(|_| self.api.base_url.clone());
        url.trim_end_matches('/').to_string()
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Data directory for the persisted conversation cache.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.hearth/data".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Backend API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the property search backend.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
        }
    }
}

/// All-properties listing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Results per page.
    pub page_size: u32,
    /// Quiet period after the last filter edit before a fetch fires.
    pub debounce_ms: u64,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: 12,
            debounce_ms: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    // ---- Defaults ----

    #[test]
    fn test_default_config() {
        let config = HearthConfig::default();
        assert_eq!(config.general.data_dir, "~/.hearth/data");
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.listing.page_size, 12);
        assert_eq!(config.listing.debounce_ms, 500);
    }

    // ---- Loading ----

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
data_dir = "/custom/data"
log_level = "debug"

[api]
base_url = "https://estates.example.com"
timeout_secs = 10

[listing]
page_size = 24
debounce_ms = 250
"#;
        let file = create_temp_config(content);
        let config = HearthConfig::load(file.path()).unwrap();
        assert_eq!(config.general.data_dir, "/custom/data");
        assert_eq!(config.api.base_url, "https://estates.example.com");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.listing.page_size, 24);
        assert_eq!(config.listing.debounce_ms, 250);
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let content = r#"
[api]
base_url = "http://10.0.0.5:9000"
"#;
        let file = create_temp_config(content);
        let config = HearthConfig::load(file.path()).unwrap();
        assert_eq!(config.api.base_url, "http://10.0.0.5:9000");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.listing.page_size, 12);
    }

    #[test]
    fn test_load_empty_toml_uses_all_defaults() {
        let file = create_temp_config("");
        let config = HearthConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.listing.debounce_ms, 500);
    }

    #[test]
    fn test_load_invalid_toml() {
        let file = create_temp_config("this is {{ not valid TOML");
        assert!(HearthConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = HearthConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.api.base_url, "http://localhost:8000");
    }

    // ---- Saving ----

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = HearthConfig::default();
        config.save(&path).unwrap();

        let reloaded = HearthConfig::load(&path).unwrap();
        assert_eq!(reloaded.api.base_url, config.api.base_url);
        assert_eq!(reloaded.listing.page_size, config.listing.page_size);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("dir").join("config.toml");
        HearthConfig::default().save(&path).unwrap();
        assert!(path.exists());
    }

    // ---- Base URL resolution ----

    // Process environment is shared across test threads; every test that
    // touches HEARTH_API_URL must hold this lock.
    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    #[test]
    fn test_api_base_url_from_config() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::remove_var(API_URL_ENV);
        let mut config = HearthConfig::default();
        config.api.base_url = "https://estates.example.com/".to_string();
        assert_eq!(config.api_base_url(), "https://estates.example.com");
    }

    #[test]
    fn test_api_base_url_env_override_wins() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var(API_URL_ENV, "http://10.1.2.3:7001/");
        let mut config = HearthConfig::default();
        config.api.base_url = "https://estates.example.com".to_string();
        // The env value wins and is normalized like any other base URL
        assert_eq!(config.api_base_url(), "http://10.1.2.3:7001");
        std::env::remove_var(API_URL_ENV);
    }

    #[test]
    fn test_api_base_url_strips_trailing_slash() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::remove_var(API_URL_ENV);
        let mut config = HearthConfig::default();
        config.api.base_url = "http://localhost:8000///".to_string();
        assert_eq!(config.api_base_url(), "http://localhost:8000");
    }
}
