use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod format;

use cli::{Cli, Commands, ScheduleAction};
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    // When quiet mode is enabled, suppress info-level logging
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::load();
    let url = config::resolve_url(cli.url.clone(), &config);
    tracing::debug!("Using service at {url}");

    match cli.command {
        Commands::Status { output } => {
            commands::cmd_status(&url, output.format, cli.no_color).await
        }
        Commands::Toggle => commands::cmd_toggle(&url, cli.no_color).await,
        Commands::Timer { minutes, seconds } => {
            commands::cmd_timer(&url, minutes, seconds, cli.no_color).await
        }
        Commands::Schedule { action } => match action {
            ScheduleAction::Set {
                on,
                off,
                repeat,
                date,
                days,
            } => commands::cmd_schedule_set(&url, &on, &off, repeat, date.as_deref(), &days).await,
            ScheduleAction::Clear => commands::cmd_schedule_clear(&url).await,
        },
        Commands::Watch { interval } => commands::cmd_watch(&url, interval, cli.no_color).await,
    }
}
