use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cannot determine the launcher's own location: {0}")]
    PathResolution(String),

    #[error("Cannot enter application directory: {0}")]
    DirectoryAccess(String),

    #[error("Virtual environment activation failed: {0}")]
    EnvironmentActivation(String),

    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    TomlSerialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, LaunchError>;
