use std::path::PathBuf;

use clap::Parser;
use dd_cli::{run_app, RunOptions};

#[derive(Parser)]
#[command(name = "dailydrop")]
#[command(version)]
#[command(about = "Log in with your phone and collect today's reward")]
struct Cli {
    /// Config file to use instead of the one in the config directory
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the registered users and exit
    #[arg(long)]
    admin: bool,
}

fn main() {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let options = RunOptions {
        config_path: cli.config,
        admin: cli.admin,
    };

    if let Err(e) = run_app(options) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}
