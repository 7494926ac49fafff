use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use quill_cli::{
    cli::{Cli, Commands, ConfigCommands},
    commands,
};
use quill_config::ConfigLoader;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --log-level / -v
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.level_filter().to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // init writes the file load would otherwise read
    if let Commands::Config {
        command: Some(ConfigCommands::Init { force }),
    } = cli.command
    {
        return commands::config::init(cli.config, force);
    }

    let config = ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Publish(args) => commands::publish::execute(config, args).await?,
        Commands::Convert {
            file,
            title,
            summary,
        } => commands::convert::execute(file, title, summary).await?,
        Commands::Id { file } => commands::id::execute(config, file).await?,
        Commands::Config { .. } => commands::config::show(config, cli.config)?,
    }

    Ok(())
}
