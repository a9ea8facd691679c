use crate::config::LaunchConfigManager;
use crate::core::error::Result;
use crate::core::{enter_app_dir, resolve_app_dir};
use crate::python::{AppExecutor, EnvironmentActivator, VenvActivator};

pub async fn execute(dir: Option<String>) -> Result<()> {
    let app_dir = resolve_app_dir(dir.as_deref())?;
    enter_app_dir(&app_dir)?;

    let config = LaunchConfigManager::new(&app_dir).load_or_default().await?;
    let env = VenvActivator::from_config(&config).activate(&app_dir)?;

    let executor = AppExecutor::new(app_dir, env, config);
    let exit_code = executor.spawn_shell().await?;

    std::process::exit(exit_code);
}
