use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default MindsDB HTTP endpoint
pub const DEFAULT_PLATFORM_URL: &str = "http://127.0.0.1:47334";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub platform: PlatformConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub training: TrainingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Upper bound on blocking training; 0 waits forever
    #[serde(default = "default_training_timeout")]
    pub timeout_secs: u64,
}

fn default_url() -> String {
    DEFAULT_PLATFORM_URL.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_csv_path() -> PathBuf {
    PathBuf::from("large_icu_patients.csv")
}

fn default_db_path() -> PathBuf {
    PathBuf::from("health_data.db")
}

fn default_poll_interval() -> u64 {
    2000
}

fn default_training_timeout() -> u64 {
    1800
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
            db_path: default_db_path(),
        }
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            timeout_secs: default_training_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from the home directory, creating a default file if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Config::default();
            config.save_to(&config_path)?;
            return Ok(config);
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let toml_string = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(path, toml_string)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .context("Could not determine home directory")?;

        Ok(home.join(".healthdiag").join("config.toml"))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.platform.request_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.training.poll_interval_ms)
    }

    /// Training timeout, `None` when disabled
    pub fn training_timeout(&self) -> Option<Duration> {
        match self.training.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.platform.url, "http://127.0.0.1:47334");
        assert_eq!(config.store.db_path, PathBuf::from("health_data.db"));
        assert_eq!(config.training_timeout(), Some(Duration::from_secs(1800)));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[platform]\nurl = \"http://mindsdb:47334\"\n").unwrap();
        assert_eq!(config.platform.url, "http://mindsdb:47334");
        assert_eq!(config.platform.request_timeout_secs, 30);
        assert_eq!(config.store.csv_path, PathBuf::from("large_icu_patients.csv"));
        assert_eq!(config.training.poll_interval_ms, 2000);
    }

    #[test]
    fn test_zero_timeout_disables_limit() {
        let mut config = Config::default();
        config.training.timeout_secs = 0;
        assert!(config.training_timeout().is_none());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.store.db_path = PathBuf::from("/tmp/store.db");
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.store.db_path, PathBuf::from("/tmp/store.db"));
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load_from(&dir.path().join("absent.toml")).is_err());
    }
}
