pub mod error;
pub mod exit_codes;
pub mod path;

pub use error::{LaunchError, Result};
pub use path::{enter_app_dir, launcher_dir, resolve_app_dir, resolve_path};
