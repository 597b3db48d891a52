//! Preview - interactive viewer
//!
//! Shows a delimited text file in the terminal, one screenful at a time.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use preview::app::{self, CliArgs, ViewerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    // Off by default: log lines would paint over the alternate screen
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = ViewerConfig::from(CliArgs::parse());

    match app::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Error: {}", e);
            eprintln!("preview: {}", e);
            ExitCode::FAILURE
        },
    }
}
