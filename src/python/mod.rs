pub mod env;
pub mod executor;

pub use env::{ActivatedEnv, EnvironmentActivator, VenvActivator};
pub use executor::{AppExecutor, CapturedOutput};
