pub mod project;
pub mod schema;
pub mod validation;

pub use project::LaunchConfigManager;
pub use schema::{
    AppConfig, DebugConfig, LaunchConfig, PythonConfig, DEFAULT_CRASH_LOG, DEFAULT_ENTRY_POINT,
    DEFAULT_VENV_DIR,
};
pub use validation::validate_launch_config;
