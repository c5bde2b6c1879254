//! circleci-helper
//!
//! Command-line interface for gating builds on other CircleCI workflows and
//! reporting why they failed.

mod commands;
mod config;
mod parse;

use clap::Parser;
use colored::*;
use commands::{Commands, handle_command};
use config::Config;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "circleci-helper")]
#[command(about = "CircleCI helper binary that allows performing higher level logic", long_about = None)]
struct Cli {
    /// CircleCI API token
    #[arg(long, env = "CIRCLECI_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// Config file (default is $HOME/.circleci-helper.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// CircleCI host
    #[arg(long, env = "CIRCLECI_API_URL", global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> ExitCode {
    // stdout is reserved for command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "circleci_helper=info,circle_waiter=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match Config::load(cli.config.as_deref(), cli.token, cli.api_url) {
        Ok(config) => handle_command(cli.command, &config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(status) => status.into(),
        Err(e) => {
            eprintln!("{} {:#}", "Error running command:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
