use crate::config::{LaunchConfig, LaunchConfigManager};
use crate::core::error::Result;
use crate::core::resolve_app_dir;
use crate::python::{AppExecutor, EnvironmentActivator, VenvActivator};
use colored::Colorize;

pub async fn execute(dir: Option<String>) -> Result<()> {
    println!("{}", "Running launcher checks...".bold());
    println!();

    let mut all_ok = true;

    // Check application directory
    print!("Checking application directory... ");
    let app_dir = match resolve_app_dir(dir.as_deref()) {
        Ok(dir) => {
            println!("{} ({})", "✓".green(), dir.display().to_string().yellow());
            dir
        }
        Err(e) => {
            println!("{}", "✗ Not accessible".red());
            println!("  {}", e);
            println!();
            println!(
                "{}",
                "Some checks failed. Please fix the issues above."
                    .yellow()
                    .bold()
            );
            return Ok(());
        }
    };

    // Check configuration
    print!("Checking launch.toml... ");
    let mgr = LaunchConfigManager::new(&app_dir);
    let config = if mgr.exists() {
        match mgr.load_or_default().await {
            Ok(config) => {
                println!("{}", "✓".green());
                config
            }
            Err(e) => {
                println!("{}", "✗ Invalid".red());
                println!("  {}", e);
                all_ok = false;
                LaunchConfig::default()
            }
        }
    } else {
        println!("{}", "○ Not present (using defaults)".yellow());
        LaunchConfig::default()
    };

    // Check virtual environment
    print!("Checking virtual environment... ");
    let env = match VenvActivator::from_config(&config).activate(&app_dir) {
        Ok(env) => {
            match env.python_version() {
                Some(version) => println!("{} (Python {})", "✓".green(), version.yellow()),
                None => println!("{}", "✓".green()),
            }
            Some(env)
        }
        Err(e) => {
            println!("{}", "✗ Not usable".red());
            println!("  {}", e);
            println!(
                "  Create it with: {}",
                format!("python -m venv {}", config.python.venv).cyan()
            );
            all_ok = false;
            None
        }
    };

    // Check entry point
    print!("Checking entry point... ");
    let entry_path = app_dir.join(&config.app.entry);
    if entry_path.is_file() {
        println!("{} ({})", "✓".green(), config.app.entry.yellow());
    } else {
        println!("{}", "✗ Not found".red());
        println!("  Expected at {}", entry_path.display());
        all_ok = false;
    }

    // Check that the interpreter actually runs
    if let Some(env) = env {
        print!("Checking interpreter... ");
        let executor = AppExecutor::new(app_dir, env, config);
        match executor
            .run_captured("python", &["--version".to_string()])
            .await
        {
            Ok(out) if out.exit_code == 0 => {
                // Older interpreters report the version on stderr
                let version = if out.stdout.trim().is_empty() {
                    out.stderr
                } else {
                    out.stdout
                };
                println!("{} ({})", "✓".green(), version.trim().yellow());
            }
            Ok(out) => {
                println!("{} Exited with code {}", "✗".red(), out.exit_code);
                all_ok = false;
            }
            Err(e) => {
                println!("{}", "✗ Failed to run".red());
                println!("  {}", e);
                all_ok = false;
            }
        }
    }

    println!();
    if all_ok {
        println!("{}", "All checks passed!".green().bold());
    } else {
        println!(
            "{}",
            "Some checks failed. Please fix the issues above."
                .yellow()
                .bold()
        );
    }

    Ok(())
}
