use std::io;
use std::path::PathBuf;

use anyhow::Context;
use dd_app::app_paths::AppPaths;
use dd_core::ports::AppDirsPort;
use dd_infra::DirsAppDirsAdapter;
use tokio::io::BufReader;
use tracing::info;

use super::config::{load_config, load_config_or_default, resolve_settings, EnvOverrides};
use super::tracing::init_tracing_subscriber;
use super::wiring::wire_dependencies;
use crate::console::{print_user_directory, Console};

/// Command line choices that reach the bootstrap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Explicit config file; it must exist when given.
    pub config_path: Option<PathBuf>,
    /// Print the user listing instead of starting the interactive session.
    pub admin: bool,
}

/// Resolve directories, configure logging, wire the use cases and drive
/// the chosen front end to completion.
pub fn run_app(options: RunOptions) -> anyhow::Result<()> {
    let dirs = DirsAppDirsAdapter::new()
        .get_app_dirs()
        .context("Failed to resolve application directories")?;
    let paths = AppPaths::from_app_dirs(&dirs);

    init_tracing_subscriber(&paths.logs_dir)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        data_dir = %dirs.app_data_root.display(),
        "starting DailyDrop"
    );

    let config = match &options.config_path {
        Some(path) => load_config(path)?,
        None => load_config_or_default(&paths.config_file)?,
    };
    let settings = resolve_settings(config, EnvOverrides::from_env(), &paths)?;
    let services = wire_dependencies(settings)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build async runtime")?;

    runtime.block_on(async move {
        if options.admin {
            return print_user_directory(&services.list_users, &mut io::stdout()).await;
        }
        let input = BufReader::new(tokio::io::stdin());
        let mut console = Console::new(services.orchestrator, input, io::stdout());
        console.run().await.context("Console I/O failed")
    })
}
