use crate::config::schema::LaunchConfig;
use crate::config::validate_launch_config;
use crate::core::error::{LaunchError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

const LAUNCH_CONFIG_FILE: &str = "launch.toml";

pub struct LaunchConfigManager {
    config_path: PathBuf,
}

impl LaunchConfigManager {
    pub fn new(app_dir: &Path) -> Self {
        Self {
            config_path: app_dir.join(LAUNCH_CONFIG_FILE),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn exists(&self) -> bool {
        self.config_path.exists()
    }

    /// Load launch.toml, or the built-in defaults when no file is present.
    /// The defaults reproduce the conventional layout (venv/, main.py), so
    /// an unconfigured directory launches exactly as before.
    pub async fn load_or_default(&self) -> Result<LaunchConfig> {
        if !self.exists() {
            return Ok(LaunchConfig::default());
        }

        let content = fs::read_to_string(&self.config_path).await?;
        let config: LaunchConfig = toml::from_str(&content)?;
        validate_launch_config(&config)?;
        Ok(config)
    }

    pub async fn save(&self, config: &LaunchConfig) -> Result<()> {
        validate_launch_config(config)?;
        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await?;
        Ok(())
    }

    pub async fn create(&self, config: &LaunchConfig, force: bool) -> Result<()> {
        if self.exists() && !force {
            return Err(LaunchError::Config(format!(
                "{} already exists (use --force to overwrite)",
                self.config_path.display()
            )));
        }

        self.save(config).await?;
        Ok(())
    }
}
