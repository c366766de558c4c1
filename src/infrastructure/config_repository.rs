use crate::domain::entities::AppConfig;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub struct ConfigRepository {
    config_path: PathBuf,
}

impl ConfigRepository {
    pub fn new() -> Self {
        Self {
            config_path: super::config_dir().join("config.json"),
        }
    }

    pub fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn load(&self) -> Result<AppConfig> {
        if !self.config_path.exists() {
            tracing::debug!("No config at {}, using defaults", self.config_path.display());
            return Ok(AppConfig::default());
        }

        let path = self.config_path.display();
        let content = fs::read_to_string(&self.config_path)
            .with_context(|| format!("Failed to read config file {}", path))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path))?;

        tracing::debug!("Loaded config: {:?}", config);
        Ok(config)
    }

    pub fn save(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(config)
            .context("Failed to serialize config")?;
        let path = self.config_path.display();
        fs::write(&self.config_path, content)
            .with_context(|| format!("Failed to write config file {}", path))?;

        tracing::info!("Saved config to {}", path);
        Ok(())
    }
}

impl Default for ConfigRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let repository = ConfigRepository::with_path(temp_dir.path().join("config.json"));
        assert_eq!(repository.load().unwrap(), AppConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");
        let repository = ConfigRepository::with_path(path);
        let config = AppConfig {
            total_rounds: 5,
            ..AppConfig::default()
        };
        repository.save(&config).unwrap();
        assert_eq!(repository.load().unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{ "daily_challenge_size": 3 }"#).unwrap();
        let config = ConfigRepository::with_path(path).load().unwrap();
        assert_eq!(config.daily_challenge_size, 3);
        assert_eq!(config.total_rounds, 10);
    }
}
