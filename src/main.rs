use anyhow::Result;
use clap::Parser;
use message_inbox::cli::{Cli, CliHandler, Commands};
use tracing::Level;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing for logging
    let level = if cli.debug { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let handler = CliHandler::new(&cli).await?;
    tracing::debug!("Using message service at {}", handler.config().base_url);

    let command = cli.command.clone().unwrap_or(Commands::List);
    handler.handle_command(command).await?;

    Ok(())
}
