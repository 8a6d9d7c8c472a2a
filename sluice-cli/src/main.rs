//! Sluice CLI - Command-line interface
//!
//! Provides command-line access to Sluice functionality.

mod commands;

use clap::Parser;

#[derive(Parser)]
#[command(name = "sluice")]
#[command(about = "A TikTok media resolution and relay gateway")]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    commands::handle_command(cli.command).await?;

    Ok(())
}
