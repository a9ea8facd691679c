use crate::core::error::{LaunchError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Directory containing the launcher binary itself, independent of the
/// caller's working directory at invocation time.
pub fn launcher_dir() -> Result<PathBuf> {
    let exe = env::current_exe().map_err(|e| {
        LaunchError::PathResolution(format!("cannot locate the launcher executable: {}", e))
    })?;
    let exe = exe.canonicalize().unwrap_or(exe);

    let dir = exe.parent().ok_or_else(|| {
        LaunchError::PathResolution(format!(
            "launcher executable has no parent directory: {}",
            exe.display()
        ))
    })?;

    Ok(dir.to_path_buf())
}

pub fn resolve_path(base_dir: &Path, configured: &str) -> PathBuf {
    let path = PathBuf::from(configured);
    if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    }
}

/// Application directory for this invocation: an explicit `--dir` override,
/// or the launcher's own directory.
pub fn resolve_app_dir(dir_override: Option<&str>) -> Result<PathBuf> {
    let dir = match dir_override {
        Some(configured) => {
            let current_dir = env::current_dir()?;
            resolve_path(&current_dir, configured)
        }
        None => launcher_dir()?,
    };

    if !dir.is_dir() {
        return Err(LaunchError::DirectoryAccess(format!(
            "{} does not exist or is not a directory",
            dir.display()
        )));
    }

    Ok(dir)
}

/// Make the application directory the process working directory. Runs
/// before activation and invocation.
pub fn enter_app_dir(app_dir: &Path) -> Result<()> {
    env::set_current_dir(app_dir)
        .map_err(|e| LaunchError::DirectoryAccess(format!("{}: {}", app_dir.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_path_joins_relative_to_base() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve_path(dir.path(), "venv");
        assert_eq!(resolved, dir.path().join("venv"));
    }

    #[test]
    fn resolve_path_keeps_absolute_paths() {
        let dir = tempfile::tempdir().unwrap();
        let absolute = dir.path().join("app");
        let resolved = resolve_path(Path::new("elsewhere"), absolute.to_str().unwrap());
        assert_eq!(resolved, absolute);
    }

    #[test]
    fn launcher_dir_is_an_absolute_directory() {
        let dir = launcher_dir().unwrap();
        assert!(dir.is_absolute());
        assert!(dir.is_dir());
    }

    #[test]
    fn app_dir_defaults_to_the_launcher_location() {
        assert_eq!(resolve_app_dir(None).unwrap(), launcher_dir().unwrap());
    }

    #[test]
    fn app_dir_override_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = resolve_app_dir(Some(missing.to_str().unwrap())).unwrap_err();
        assert!(matches!(err, LaunchError::DirectoryAccess(_)));
    }

    #[test]
    fn app_dir_override_resolves_to_the_given_directory() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve_app_dir(Some(dir.path().to_str().unwrap())).unwrap();
        assert_eq!(resolved, dir.path());
    }

    #[test]
    fn entering_a_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");

        let err = enter_app_dir(&missing).unwrap_err();
        assert!(matches!(err, LaunchError::DirectoryAccess(_)));
    }
}
