use crate::config::{LaunchConfig, LaunchConfigManager};
use crate::core::error::Result;
use crate::core::resolve_app_dir;
use colored::Colorize;

pub async fn execute(
    dir: Option<String>,
    name: Option<String>,
    entry: Option<String>,
    venv: Option<String>,
    force: bool,
) -> Result<()> {
    let app_dir = resolve_app_dir(dir.as_deref())?;
    let mgr = LaunchConfigManager::new(&app_dir);

    // Check if already configured
    if mgr.exists() && !force {
        println!(
            "{} {} already exists (use {} to overwrite)",
            "ℹ".yellow().bold(),
            "launch.toml".yellow(),
            "--force".cyan()
        );
        return Ok(());
    }

    // Determine application name
    let app_name = name.unwrap_or_else(|| {
        app_dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("application")
            .to_string()
    });

    let mut config = LaunchConfig::default();
    config.app.name = Some(app_name.clone());
    if let Some(entry) = entry {
        config.app.entry = entry;
    }
    if let Some(venv) = venv {
        config.python.venv = venv;
    }

    println!(
        "{} Configuring launcher for: {}",
        "⚙".blue().bold(),
        app_name.cyan()
    );
    println!("  Entry point: {}", config.app.entry.yellow());
    println!("  Virtual environment: {}", config.python.venv.yellow());

    // Save config
    mgr.create(&config, force).await?;
    println!("{} Created {}", "✓".green().bold(), "launch.toml".yellow());

    let venv_missing = !app_dir.join(&config.python.venv).is_dir();
    let entry_missing = !app_dir.join(&config.app.entry).is_file();

    println!();
    println!("{} Launcher configured!", "✓".green().bold());
    println!();
    println!("Next steps:");
    let mut step = 1;
    if venv_missing {
        println!(
            "  {}. Create the environment: {}",
            step,
            format!("python -m venv {}", config.python.venv).cyan()
        );
        step += 1;
    }
    if entry_missing {
        println!(
            "  {}. Add the entry point: {}",
            step,
            config.app.entry.cyan()
        );
        step += 1;
    }
    println!("  {}. Launch with: {}", step, "pylaunch".cyan());

    Ok(())
}
