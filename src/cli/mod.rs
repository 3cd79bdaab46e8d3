pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "matchday")]
#[command(about = "Notifies subscribers on days the arena hosts a match", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/matchday/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot: scheduler, chat commands and keepalive server
    Run {
        /// Check interval (e.g., "1h", "30m"); overrides CHECK_INTERVAL_HOURS
        #[arg(short, long)]
        interval: Option<String>,

        /// Skip the check that normally runs at startup
        #[arg(long)]
        no_initial_check: bool,
    },
    /// Fetch the events page once and print what was found
    Check {
        /// Print every event on the page, not just today's
        #[arg(long)]
        all: bool,
    },
    /// Print the default config file location
    ConfigPath,
}
