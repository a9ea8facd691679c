use crate::config::LaunchConfig;
use crate::core::error::{LaunchError, Result};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const VENV_DESCRIPTOR: &str = "pyvenv.cfg";

/// Activation seam: turn an application directory into an environment
/// whose binaries shadow the system-wide ones. venv is the shipped
/// mechanism; other isolation schemes can plug in here.
pub trait EnvironmentActivator {
    fn activate(&self, app_dir: &Path) -> Result<ActivatedEnv>;
}

#[derive(Debug, Clone)]
pub struct VenvActivator {
    venv_dir: String,
    required_python: Option<String>,
}

impl VenvActivator {
    pub fn new(venv_dir: impl Into<String>) -> Self {
        Self {
            venv_dir: venv_dir.into(),
            required_python: None,
        }
    }

    pub fn from_config(config: &LaunchConfig) -> Self {
        Self {
            venv_dir: config.python.venv.clone(),
            required_python: config.python.version.clone(),
        }
    }

    pub fn with_required_python(mut self, version: Option<String>) -> Self {
        self.required_python = version;
        self
    }
}

impl EnvironmentActivator for VenvActivator {
    fn activate(&self, app_dir: &Path) -> Result<ActivatedEnv> {
        let venv_path = app_dir.join(&self.venv_dir);

        if !venv_path.is_dir() {
            return Err(LaunchError::EnvironmentActivation(format!(
                "virtual environment not found at {} (create it with 'python -m venv {}')",
                venv_path.display(),
                self.venv_dir
            )));
        }

        let descriptor = venv_path.join(VENV_DESCRIPTOR);
        if !descriptor.is_file() {
            return Err(LaunchError::EnvironmentActivation(format!(
                "{} has no {}; the directory is not a virtual environment",
                venv_path.display(),
                VENV_DESCRIPTOR
            )));
        }

        let content = std::fs::read_to_string(&descriptor).map_err(|e| {
            LaunchError::EnvironmentActivation(format!(
                "cannot read {}: {}",
                descriptor.display(),
                e
            ))
        })?;
        let python_version = recorded_version(&content);

        if let Some(required) = self.required_python.as_deref() {
            match python_version.as_deref() {
                Some(found) if !versions_compatible(required, found) => {
                    return Err(LaunchError::EnvironmentActivation(format!(
                        "virtual environment Python version mismatch: required {}, found {}",
                        required, found
                    )));
                }
                None => {
                    return Err(LaunchError::EnvironmentActivation(format!(
                        "{} records no Python version; cannot verify required {}",
                        VENV_DESCRIPTOR, required
                    )));
                }
                _ => {}
            }
        }

        let bin_dir = scripts_dir(&venv_path);
        let python = interpreter_path(&bin_dir);
        if !python.is_file() {
            return Err(LaunchError::EnvironmentActivation(format!(
                "interpreter not found at {}",
                python.display()
            )));
        }

        let path_var = prepend_search_path(&bin_dir)?;

        debug!(
            venv = %venv_path.display(),
            python_version = python_version.as_deref().unwrap_or("unknown"),
            "virtual environment activated"
        );

        Ok(ActivatedEnv {
            venv_path,
            bin_dir,
            path_var,
            python_version,
        })
    }
}

/// An activated virtual environment: resolved paths plus the environment
/// mutations a child process needs so that the venv's binaries win over
/// system-wide ones. The launcher's own environment is never touched;
/// the mutations are applied per child via [`ActivatedEnv::apply`].
#[derive(Debug, Clone)]
pub struct ActivatedEnv {
    venv_path: PathBuf,
    bin_dir: PathBuf,
    path_var: OsString,
    python_version: Option<String>,
}

impl ActivatedEnv {
    pub fn venv_path(&self) -> &Path {
        &self.venv_path
    }

    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    /// Search path for children: the venv's scripts directory followed by
    /// the inherited PATH.
    pub fn search_path(&self) -> &OsStr {
        &self.path_var
    }

    /// Python version recorded in the environment descriptor, if any.
    pub fn python_version(&self) -> Option<&str> {
        self.python_version.as_deref()
    }

    /// The environment's own interpreter.
    pub fn python(&self) -> PathBuf {
        interpreter_path(&self.bin_dir)
    }

    /// Path a command resolves to inside the environment.
    pub fn resolve(&self, command: &str) -> PathBuf {
        if cfg!(windows) {
            self.bin_dir.join(format!("{}.exe", command))
        } else {
            self.bin_dir.join(command)
        }
    }

    pub fn command_exists(&self, command: &str) -> bool {
        self.resolve(command).exists()
    }

    /// Apply the activation to a child command: VIRTUAL_ENV, the prepended
    /// search path, and no inherited PYTHONHOME.
    pub fn apply(&self, cmd: &mut tokio::process::Command) {
        cmd.env("VIRTUAL_ENV", &self.venv_path)
            .env("PATH", &self.path_var)
            .env_remove("PYTHONHOME");
    }
}

fn scripts_dir(venv_path: &Path) -> PathBuf {
    if cfg!(windows) {
        venv_path.join("Scripts")
    } else {
        venv_path.join("bin")
    }
}

fn interpreter_path(bin_dir: &Path) -> PathBuf {
    if cfg!(windows) {
        bin_dir.join("python.exe")
    } else {
        bin_dir.join("python")
    }
}

fn prepend_search_path(bin_dir: &Path) -> Result<OsString> {
    let mut paths = vec![bin_dir.to_path_buf()];
    if let Some(existing) = std::env::var_os("PATH") {
        paths.extend(std::env::split_paths(&existing));
    }

    std::env::join_paths(paths).map_err(|e| {
        LaunchError::EnvironmentActivation(format!("cannot build the search path: {}", e))
    })
}

/// Python version recorded in pyvenv.cfg: `version` in older layouts,
/// `version_info` in newer ones.
fn recorded_version(content: &str) -> Option<String> {
    for line in content.lines() {
        let line = line.trim();
        if let Some(v) = line.strip_prefix("version =") {
            return Some(v.trim().to_string());
        }
        if let Some(v) = line.strip_prefix("version_info =") {
            return Some(v.trim().to_string());
        }
    }
    None
}

fn extract_version_parts(input: &str) -> Vec<u32> {
    let mut parts: Vec<u32> = Vec::new();
    let mut buf = String::new();

    for ch in input.chars() {
        if ch.is_ascii_digit() {
            buf.push(ch);
            continue;
        }

        if !buf.is_empty() {
            if let Ok(v) = buf.parse::<u32>() {
                parts.push(v);
            }
            buf.clear();
        }
    }

    if !buf.is_empty() {
        if let Ok(v) = buf.parse::<u32>() {
            parts.push(v);
        }
    }

    parts
}

fn versions_compatible(requested: &str, found: &str) -> bool {
    let req = extract_version_parts(requested);
    let got = extract_version_parts(found);

    if req.is_empty() || got.is_empty() {
        return true;
    }

    if got.len() < req.len() {
        return false;
    }

    for i in 0..req.len() {
        if req[i] != got[i] {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn make_venv(app_dir: &Path, name: &str, descriptor: &str) -> PathBuf {
        let venv = app_dir.join(name);
        let bin = scripts_dir(&venv);
        fs::create_dir_all(&bin).unwrap();
        fs::write(venv.join(VENV_DESCRIPTOR), descriptor).unwrap();
        fs::write(interpreter_path(&bin), "").unwrap();
        venv
    }

    #[test]
    fn activation_resolves_the_venv_layout() {
        let dir = tempfile::tempdir().unwrap();
        let venv = make_venv(dir.path(), "venv", "version = 3.11.6\n");

        let env = VenvActivator::new("venv").activate(dir.path()).unwrap();

        assert_eq!(env.venv_path(), venv);
        assert_eq!(env.bin_dir(), scripts_dir(&venv));
        assert!(env.python().is_file());
        assert_eq!(env.python_version(), Some("3.11.6"));
    }

    #[test]
    fn search_path_starts_with_the_scripts_dir() {
        let dir = tempfile::tempdir().unwrap();
        make_venv(dir.path(), "venv", "version = 3.11.6\n");

        let env = VenvActivator::new("venv").activate(dir.path()).unwrap();

        let first = std::env::split_paths(env.search_path()).next().unwrap();
        assert_eq!(first, env.bin_dir());
    }

    #[test]
    fn missing_venv_fails_activation() {
        let dir = tempfile::tempdir().unwrap();

        let err = VenvActivator::new("venv").activate(dir.path()).unwrap_err();
        assert!(matches!(err, LaunchError::EnvironmentActivation(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn directory_without_descriptor_is_not_a_venv() {
        let dir = tempfile::tempdir().unwrap();
        let bin = scripts_dir(&dir.path().join("venv"));
        fs::create_dir_all(&bin).unwrap();
        fs::write(interpreter_path(&bin), "").unwrap();

        let err = VenvActivator::new("venv").activate(dir.path()).unwrap_err();
        assert!(err.to_string().contains(VENV_DESCRIPTOR));
    }

    #[test]
    fn missing_interpreter_fails_activation() {
        let dir = tempfile::tempdir().unwrap();
        let venv = dir.path().join("venv");
        fs::create_dir_all(&venv).unwrap();
        fs::write(venv.join(VENV_DESCRIPTOR), "version = 3.11.6\n").unwrap();

        let err = VenvActivator::new("venv").activate(dir.path()).unwrap_err();
        assert!(err.to_string().contains("interpreter not found"));
    }

    #[test]
    fn version_requirement_accepts_a_compatible_venv() {
        let dir = tempfile::tempdir().unwrap();
        make_venv(dir.path(), "venv", "version = 3.11.6\n");

        let env = VenvActivator::new("venv")
            .with_required_python(Some("3.11".to_string()))
            .activate(dir.path())
            .unwrap();
        assert_eq!(env.python_version(), Some("3.11.6"));
    }

    #[test]
    fn version_requirement_rejects_a_mismatched_venv() {
        let dir = tempfile::tempdir().unwrap();
        make_venv(dir.path(), "venv", "version = 3.11.6\n");

        let err = VenvActivator::new("venv")
            .with_required_python(Some("3.12".to_string()))
            .activate(dir.path())
            .unwrap_err();
        assert!(err.to_string().contains("mismatch"));
    }

    #[test]
    fn version_requirement_needs_a_recorded_version() {
        let dir = tempfile::tempdir().unwrap();
        make_venv(dir.path(), "venv", "home = /usr/bin\n");

        let err = VenvActivator::new("venv")
            .with_required_python(Some("3.11".to_string()))
            .activate(dir.path())
            .unwrap_err();
        assert!(err.to_string().contains("records no Python version"));
    }

    #[test]
    fn custom_venv_directory_names_are_honored() {
        let dir = tempfile::tempdir().unwrap();
        make_venv(dir.path(), ".venv", "version = 3.12.1\n");

        let env = VenvActivator::new(".venv").activate(dir.path()).unwrap();
        assert!(env.venv_path().ends_with(".venv"));
    }

    #[test]
    fn apply_sets_the_child_environment() {
        let dir = tempfile::tempdir().unwrap();
        make_venv(dir.path(), "venv", "version = 3.11.6\n");
        let env = VenvActivator::new("venv").activate(dir.path()).unwrap();

        let mut cmd = tokio::process::Command::new("python");
        env.apply(&mut cmd);

        let vars: Vec<_> = cmd.as_std().get_envs().collect();
        assert!(vars
            .iter()
            .any(|(k, v)| k.to_str() == Some("VIRTUAL_ENV") && v.is_some()));
        assert!(vars
            .iter()
            .any(|(k, v)| k.to_str() == Some("PATH") && v.is_some()));
        assert!(vars
            .iter()
            .any(|(k, v)| k.to_str() == Some("PYTHONHOME") && v.is_none()));
    }

    #[test]
    fn resolve_points_into_the_scripts_dir() {
        let dir = tempfile::tempdir().unwrap();
        make_venv(dir.path(), "venv", "version = 3.11.6\n");
        let env = VenvActivator::new("venv").activate(dir.path()).unwrap();

        let path = env.resolve("black");

        #[cfg(unix)]
        assert!(path.ends_with("venv/bin/black"));

        #[cfg(windows)]
        assert!(path.ends_with("venv\\Scripts\\black.exe"));

        assert!(!env.command_exists("black"));
    }

    #[test]
    fn recorded_version_reads_both_descriptor_spellings() {
        assert_eq!(
            recorded_version("home = /usr/bin\nversion = 3.11.6\n"),
            Some("3.11.6".to_string())
        );
        assert_eq!(
            recorded_version("version_info = 3.13.1\n"),
            Some("3.13.1".to_string())
        );
        assert_eq!(recorded_version("home = /usr/bin\n"), None);
    }

    #[test]
    fn version_compatibility_matches_major_minor() {
        assert!(versions_compatible("3.11", "3.11.6"));
        assert!(!versions_compatible("3.12", "3.11.6"));
        assert!(!versions_compatible("3.11", "3.10.9"));
    }

    #[test]
    fn version_compatibility_allows_patch_pin() {
        assert!(versions_compatible("3.11.6", "3.11.6"));
        assert!(!versions_compatible("3.11.6", "3.11.5"));
    }

    #[test]
    fn version_parsing_handles_suffixes() {
        assert!(versions_compatible("3.11", "3.11.6.final.0"));
    }
}
