//! Kino content build tool.
//!
//! Usage:
//!   kino check
//!   kino assign-ids
//!   kino build --target StandaloneWindows64 --only street_wheels
//!   kino inspect Build/CarParts/street_wheels.knpp

use std::io;
use std::process::ExitCode;

use clap::Parser;
use kino_cli::Cli;
use tracing::{Level, error};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str().to_lowercase()));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    match kino_cli::run(&cli, &mut io::stdout().lock()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
