use clap::Parser;
use colored::Colorize;
use pylaunch::cli::{run, Cli};
use pylaunch::core::exit_codes;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    // Parse CLI
    let cli = Cli::parse();

    // Run command; an error here means a bootstrap step failed and the
    // application never started.
    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(exit_codes::BOOTSTRAP_FAILURE);
    }
}
