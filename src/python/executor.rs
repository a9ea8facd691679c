use crate::config::LaunchConfig;
use crate::core::error::{LaunchError, Result};
use crate::core::exit_codes;
use crate::python::env::ActivatedEnv;
use chrono::Utc;
use colored::Colorize;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tracing::debug;

/// Upper bound on the stderr tail kept for the crash log.
const CRASH_LOG_TAIL_LIMIT: usize = 256 * 1024;

pub struct AppExecutor {
    app_dir: PathBuf,
    env: ActivatedEnv,
    config: LaunchConfig,
}

#[derive(Debug)]
pub struct CapturedOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl AppExecutor {
    pub fn new(app_dir: PathBuf, env: ActivatedEnv, config: LaunchConfig) -> Self {
        Self {
            app_dir,
            env,
            config,
        }
    }

    pub fn app_name(&self) -> String {
        self.config.display_name(&self.app_dir)
    }

    // The interpreter, not the launcher, reports a missing entry file.
    fn entry_command(&self, args: &[String]) -> Command {
        let mut cmd = Command::new(self.env.python());
        cmd.arg(&self.config.app.entry)
            .args(args)
            .current_dir(&self.app_dir);
        self.env.apply(&mut cmd);

        // Configured entries win over the activation variables.
        for (key, value) in &self.config.environment {
            cmd.env(key, value);
        }

        cmd
    }

    /// Run the application's entry point with full stdio passthrough.
    pub async fn run(&self, args: &[String]) -> Result<i32> {
        debug!(entry = %self.config.app.entry, "launching application");

        let status = self
            .entry_command(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| {
                LaunchError::CommandFailed(format!(
                    "Failed to execute {}: {}",
                    self.config.app.entry, e
                ))
            })?;

        Ok(status.code().unwrap_or(exit_codes::NO_CHILD_STATUS))
    }

    /// Run the entry point while teeing stderr; on a non-zero exit write a
    /// crash log next to the application and keep an interactive console
    /// open so the report is not lost with the window.
    pub async fn run_debug(&self, args: &[String]) -> Result<i32> {
        debug!(entry = %self.config.app.entry, "launching application in debug mode");

        let mut cmd = self.entry_command(args);
        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| {
            LaunchError::CommandFailed(format!(
                "Failed to execute {}: {}",
                self.config.app.entry, e
            ))
        })?;

        let (tail, truncated) = match child.stderr.take() {
            Some(stderr) => tee_stderr(stderr, tokio::io::stderr()).await,
            None => (Vec::new(), false),
        };

        let status = child.wait().await.map_err(|e| {
            LaunchError::CommandFailed(format!(
                "Failed to wait for {}: {}",
                self.config.app.entry, e
            ))
        })?;
        let exit_code = status.code().unwrap_or(exit_codes::NO_CHILD_STATUS);

        if exit_code != exit_codes::OK {
            eprintln!();
            eprintln!(
                "{} {} exited with code {}",
                "✗".red().bold(),
                self.app_name(),
                exit_code
            );
            match self.write_crash_log(exit_code, &tail, truncated) {
                Ok(path) => eprintln!(
                    "  Crash details written to {}",
                    path.display().to_string().cyan()
                ),
                Err(e) => eprintln!(
                    "  {} Could not write the crash log: {}",
                    "⚠".yellow().bold(),
                    e
                ),
            }
            hold_console().await;
        }

        Ok(exit_code)
    }

    fn write_crash_log(&self, exit_code: i32, tail: &[u8], truncated: bool) -> Result<PathBuf> {
        let path = self.app_dir.join(&self.config.debug.crash_log);
        let separator = "=".repeat(60);

        let mut content = String::new();
        content.push_str(&separator);
        content.push('\n');
        content.push_str(&format!("Crash report: {}\n", self.app_name()));
        content.push_str(&format!("Time: {}\n", Utc::now().to_rfc3339()));
        content.push_str(&format!("Entry point: {}\n", self.config.app.entry));
        content.push_str(&format!("Exit code: {}\n", exit_code));
        content.push_str(&separator);
        content.push('\n');
        if truncated {
            content.push_str(&format!(
                "[stderr truncated; showing the last {} bytes]\n",
                CRASH_LOG_TAIL_LIMIT
            ));
        }
        content.push_str(&String::from_utf8_lossy(tail));
        if !content.ends_with('\n') {
            content.push('\n');
        }
        content.push_str(&separator);
        content.push('\n');

        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Run a command from the environment and capture stdout/stderr.
    pub async fn run_captured(&self, command: &str, args: &[String]) -> Result<CapturedOutput> {
        if !self.env.command_exists(command) {
            return Err(LaunchError::CommandFailed(format!(
                "'{}' not found in the virtual environment",
                command
            )));
        }

        let mut cmd = Command::new(self.env.resolve(command));
        cmd.args(args).current_dir(&self.app_dir);
        self.env.apply(&mut cmd);
        for (key, value) in &self.config.environment {
            cmd.env(key, value);
        }

        let output = cmd.output().await.map_err(|e| {
            LaunchError::CommandFailed(format!("Failed to execute {}: {}", command, e))
        })?;

        Ok(CapturedOutput {
            exit_code: output.status.code().unwrap_or(exit_codes::NO_CHILD_STATUS),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    /// Spawn an interactive shell inside the activated environment.
    pub async fn spawn_shell(&self) -> Result<i32> {
        let shell = if cfg!(windows) {
            std::env::var("COMSPEC").unwrap_or_else(|_| "cmd.exe".to_string())
        } else {
            std::env::var("SHELL").unwrap_or_else(|_| "/bin/bash".to_string())
        };

        let venv_name = self
            .env
            .venv_path()
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("venv")
            .to_string();

        println!("{} Entering virtual environment shell", "→".blue().bold());
        println!("  Type {} to leave", "exit".yellow());
        println!();

        let mut cmd = Command::new(&shell);
        cmd.env("PS1", format!("({}) $ ", venv_name)) // Custom prompt for bash/zsh
            .current_dir(&self.app_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        self.env.apply(&mut cmd);

        let status = cmd
            .status()
            .await
            .map_err(|e| LaunchError::CommandFailed(format!("Failed to spawn shell: {}", e)))?;

        Ok(status.code().unwrap_or(exit_codes::NO_CHILD_STATUS))
    }
}

/// Mirror the application's stderr to `out` while retaining a bounded tail
/// for the crash log. The application has already started by the time this
/// runs, so I/O problems on either side stop the affected half but never
/// fail the launch; the child is still waited on.
async fn tee_stderr<R, W>(reader: R, mut out: W) -> (Vec<u8>, bool)
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut tail: Vec<u8> = Vec::new();
    let mut truncated = false;
    let mut forward = true;
    let mut chunk = [0u8; 8192];

    loop {
        let n = match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                debug!(error = %e, "stopped reading application stderr");
                break;
            }
        };

        if forward {
            let forwarded = match out.write_all(&chunk[..n]).await {
                Ok(()) => out.flush().await,
                Err(e) => Err(e),
            };
            if let Err(e) = forwarded {
                debug!(error = %e, "stderr passthrough stopped; capture continues");
                forward = false;
            }
        }

        tail.extend_from_slice(&chunk[..n]);
        if tail.len() > CRASH_LOG_TAIL_LIMIT {
            let excess = tail.len() - CRASH_LOG_TAIL_LIMIT;
            tail.drain(..excess);
            truncated = true;
        }
    }

    (tail, truncated)
}

async fn hold_console() {
    if !std::io::stdin().is_terminal() {
        return;
    }

    eprintln!();
    eprint!("Press Enter to close...");
    let mut line = String::new();
    let mut reader = BufReader::new(tokio::io::stdin());
    let _ = reader.read_line(&mut line).await;
}
