use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_ENTRY_POINT: &str = "main.py";
pub const DEFAULT_VENV_DIR: &str = "venv";
pub const DEFAULT_CRASH_LOG: &str = "crash_log.txt";

/// Launch settings for one application directory. Every field has a
/// default, so a missing launch.toml means the conventional layout:
/// a `venv` environment next to a `main.py` entry point.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LaunchConfig {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub python: PythonConfig,
    #[serde(default)]
    pub debug: DebugConfig,
    #[serde(default)]
    pub environment: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_entry")]
    pub entry: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PythonConfig {
    #[serde(default = "default_venv")]
    pub venv: String,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DebugConfig {
    #[serde(default = "default_crash_log")]
    pub crash_log: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: None,
            entry: default_entry(),
        }
    }
}

impl Default for PythonConfig {
    fn default() -> Self {
        Self {
            venv: default_venv(),
            version: None,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            crash_log: default_crash_log(),
        }
    }
}

impl LaunchConfig {
    /// Display name for the application: the configured name, or the
    /// application directory's own name.
    pub fn display_name(&self, app_dir: &Path) -> String {
        self.app.name.clone().unwrap_or_else(|| {
            app_dir
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("application")
                .to_string()
        })
    }
}

fn default_entry() -> String {
    DEFAULT_ENTRY_POINT.to_string()
}

fn default_venv() -> String {
    DEFAULT_VENV_DIR.to_string()
}

fn default_crash_log() -> String {
    DEFAULT_CRASH_LOG.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_parses_to_the_defaults() {
        let config: LaunchConfig = toml::from_str("").unwrap();

        assert_eq!(config.app.entry, DEFAULT_ENTRY_POINT);
        assert!(config.app.name.is_none());
        assert_eq!(config.python.venv, DEFAULT_VENV_DIR);
        assert!(config.python.version.is_none());
        assert_eq!(config.debug.crash_log, DEFAULT_CRASH_LOG);
        assert!(config.environment.is_empty());
    }

    #[test]
    fn partial_sections_keep_the_remaining_defaults() {
        let config: LaunchConfig = toml::from_str("[python]\nvenv = \".venv\"\n").unwrap();

        assert_eq!(config.python.venv, ".venv");
        assert_eq!(config.app.entry, DEFAULT_ENTRY_POINT);
        assert_eq!(config.debug.crash_log, DEFAULT_CRASH_LOG);
    }

    #[test]
    fn display_name_prefers_the_configured_name() {
        let mut config = LaunchConfig::default();
        assert_eq!(config.display_name(Path::new("/opt/asset-manager")), "asset-manager");

        config.app.name = Some("Asset Manager".to_string());
        assert_eq!(config.display_name(Path::new("/opt/asset-manager")), "Asset Manager");
    }
}
