//! Stable exit codes for the launcher process.

/// The launched application completed normally.
pub const OK: i32 = 0;
/// A bootstrap step failed before the application was started.
pub const BOOTSTRAP_FAILURE: i32 = 70;
/// The application terminated without reporting an exit code (e.g. killed
/// by a signal); distinct from bootstrap failures.
pub const NO_CHILD_STATUS: i32 = 1;
