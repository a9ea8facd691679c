use crate::config::schema::LaunchConfig;
use crate::core::error::{LaunchError, Result};
use std::path::{Component, Path};

fn validate_relative_file(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LaunchError::Config(format!("{} cannot be empty", field)));
    }

    let path = Path::new(value);
    if path.is_absolute() {
        return Err(LaunchError::Config(format!(
            "{} must be relative to the application directory",
            field
        )));
    }
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(LaunchError::Config(format!(
            "{} must not point outside the application directory",
            field
        )));
    }

    Ok(())
}

pub fn validate_launch_config(config: &LaunchConfig) -> Result<()> {
    if let Some(name) = config.app.name.as_deref() {
        if name.trim().is_empty() {
            return Err(LaunchError::Config("app.name cannot be empty".to_string()));
        }
    }

    validate_relative_file("app.entry", &config.app.entry)?;
    validate_relative_file("python.venv", &config.python.venv)?;
    validate_relative_file("debug.crash_log", &config.debug.crash_log)?;

    if let Some(version) = config.python.version.as_deref() {
        if !version.chars().any(|c| c.is_ascii_digit()) {
            return Err(LaunchError::Config(format!(
                "python.version '{}' is not a version number",
                version
            )));
        }
    }

    for key in config.environment.keys() {
        if key.trim().is_empty() {
            return Err(LaunchError::Config(
                "environment variable names cannot be empty".to_string(),
            ));
        }
        if key.contains('=') {
            return Err(LaunchError::Config(format!(
                "environment variable name '{}' must not contain '='",
                key
            )));
        }
    }

    Ok(())
}
