mod commands;
mod pipeline;

pub use pipeline::{Pipeline, PipelineOptions, ScreenshotReport};

use anyhow::Result;
use clap::Parser;

use commands::{Cli, Command};

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "screentime=debug,st_vision=debug,st_capture=debug,st_usage=debug,st_data=debug"
    } else {
        "screentime=info,st_vision=info,st_capture=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = commands::resolve_config(cli.config.as_ref())?;

    match cli.command {
        Command::Extract(args) => commands::extract(args, config).await,
        Command::Config => commands::print_config(&config),
    }
}
