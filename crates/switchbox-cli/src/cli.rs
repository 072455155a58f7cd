//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use switchbox_types::RecurrenceKind;

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Schedule repeat mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum RepeatArg {
    /// Fire once on a specific calendar date
    Once,
    /// Fire every day
    #[default]
    Daily,
    /// Fire on selected weekdays
    Weekly,
}

impl From<RepeatArg> for RecurrenceKind {
    fn from(arg: RepeatArg) -> Self {
        match arg {
            RepeatArg::Once => RecurrenceKind::Once,
            RepeatArg::Daily => RecurrenceKind::Daily,
            RepeatArg::Weekly => RecurrenceKind::Weekly,
        }
    }
}

/// Reusable output format arguments
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Parser)]
#[command(name = "switchbox")]
#[command(author, version, about = "CLI for the AasPas Smart Box power switch", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Base URL of the switch service, or use SWITCHBOX_URL env var
    #[arg(short, long, global = true, env = "SWITCHBOX_URL")]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the current device state
    ///
    /// Fetches the full /api/status document. The service also serves a
    /// plain-text summary at /api/status/simple for other integrations.
    Status {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Toggle the switch on or off
    Toggle,

    /// Turn the switch on for a fixed duration, then off
    Timer {
        /// Whole minutes (0-1440)
        #[arg(value_parser = clap::value_parser!(u32).range(0..=1440))]
        minutes: u32,

        /// Additional seconds (0-59)
        #[arg(value_parser = clap::value_parser!(u32).range(0..=59), default_value = "0")]
        seconds: u32,
    },

    /// Manage the clock schedule
    Schedule {
        #[command(subcommand)]
        action: ScheduleAction,
    },

    /// Follow state changes and countdown ticks until interrupted
    Watch {
        /// Seconds between status refreshes
        #[arg(short, long, default_value = "30")]
        interval: u64,
    },
}

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Submit a new schedule
    Set {
        /// Daily ON time (HH:MM, 24-hour)
        #[arg(long)]
        on: String,

        /// Daily OFF time (HH:MM, 24-hour)
        #[arg(long)]
        off: String,

        /// Repeat mode
        #[arg(long, value_enum, default_value = "daily")]
        repeat: RepeatArg,

        /// Calendar date for one-shot schedules (YYYY-MM-DD)
        #[arg(long, required_if_eq("repeat", "once"))]
        date: Option<String>,

        /// Weekdays for weekly schedules, comma-separated (e.g. mon,wed,fri)
        #[arg(long, value_delimiter = ',', required_if_eq("repeat", "weekly"))]
        days: Vec<String>,
    },

    /// Clear the active schedule
    Clear,
}
