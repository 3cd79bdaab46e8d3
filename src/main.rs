use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use matchday::cli::{commands, Cli, Commands};
use matchday::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("matchday=info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::ConfigPath => {
            println!("{}", Config::default_config_path()?.display());
        }
        Commands::Check { all } => {
            let config = Config::load(cli.config.as_deref())?.with_env()?;
            commands::check(&config, all).await?;
        }
        Commands::Run {
            interval,
            no_initial_check,
        } => {
            let config = Config::load(cli.config.as_deref())?.with_env()?;
            commands::run(config, interval.as_deref(), no_initial_check).await?;
        }
    }

    Ok(())
}
