pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "pylaunch",
    version,
    about = "A self-locating launcher for venv-based Python applications",
    long_about = None
)]
pub struct Cli {
    /// Application directory (default: the directory containing the launcher)
    #[arg(long, global = true, value_name = "PATH")]
    pub dir: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the application (same as running with no subcommand)
    Run {
        /// Capture stderr and write a crash log if the application fails
        #[arg(long)]
        debug: bool,

        /// Arguments to pass to the entry point
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Create a launch.toml describing the application
    Init {
        /// Application name (default: the application directory's name)
        #[arg(long)]
        name: Option<String>,

        /// Entry-point file (default: main.py)
        #[arg(long)]
        entry: Option<String>,

        /// Virtual environment directory (default: venv)
        #[arg(long)]
        venv: Option<String>,

        /// Overwrite an existing launch.toml
        #[arg(long)]
        force: bool,
    },

    /// Check the application directory, environment and entry point
    Doctor,

    /// Enter the virtual environment shell
    Shell,
}

pub async fn run(cli: Cli) -> crate::core::error::Result<()> {
    match cli.command {
        None => commands::run::execute(cli.dir, false, Vec::new()).await,

        Some(Commands::Run { debug, args }) => commands::run::execute(cli.dir, debug, args).await,

        Some(Commands::Init {
            name,
            entry,
            venv,
            force,
        }) => commands::init::execute(cli.dir, name, entry, venv, force).await,

        Some(Commands::Doctor) => commands::doctor::execute(cli.dir).await,

        Some(Commands::Shell) => commands::shell::execute(cli.dir).await,
    }
}
