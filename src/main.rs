#![warn(clippy::all, clippy::pedantic)]

use anyhow::Result;
use clap::Parser;
use plannotator::app::dispatch::resolve_config;
use plannotator::{Cli, Commands, Config};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries the hook verdict, so logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let command = cli.command.clone().unwrap_or(Commands::Hook);
    let config = resolve_config(&command, Config::load())?;
    plannotator::app::dispatch::dispatch(cli, config).await
}
