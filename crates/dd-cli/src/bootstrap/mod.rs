pub mod config;
pub mod run;
pub mod tracing;
pub mod wiring;

pub use config::{load_config, resolve_settings, EnvOverrides, RuntimeSettings};
pub use run::{run_app, RunOptions};
pub use wiring::{wire_dependencies, AppServices, WiringError};
