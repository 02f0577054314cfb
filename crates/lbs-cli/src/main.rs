use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "lbs")]
#[command(about = "Private leaderboard -> webhook sync CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a saved leaderboard JSON offline and print the resulting messages
    Preview {
        /// Path to a leaderboard JSON document
        #[arg(long)]
        payload: PathBuf,

        /// Optional layout YAML (same format as LBS_LAYOUT_FILE)
        #[arg(long)]
        layout: Option<PathBuf>,

        /// Render timestamp (RFC 3339); defaults to now
        #[arg(long)]
        at: Option<String>,

        /// Print the webhook payloads as JSON instead of a summary
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Run exactly one sync cycle using the environment configuration
    Once {
        /// Contest year; overrides AOC_LEADERBOARD_YEAR
        #[arg(long)]
        year: Option<u16>,
    },

    /// Inspect or reset the persisted message ids
    State {
        #[command(subcommand)]
        cmd: StateCmd,
    },
}

#[derive(Subcommand)]
enum StateCmd {
    /// Print every key and its message ids
    Show {
        /// State file; defaults to MESSAGE_STORE_FILE or discord_messages.json
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Forget the ids tracked for one key (messages are left on the channel)
    Clear {
        #[arg(long)]
        key: String,

        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Preview {
            payload,
            layout,
            at,
            json,
        } => commands::preview::preview(&payload, layout.as_deref(), at.as_deref(), json)?,

        Commands::Once { year } => commands::once::run_once(year).await?,

        Commands::State { cmd } => match cmd {
            StateCmd::Show { file } => commands::state::show(file)?,
            StateCmd::Clear { key, file } => commands::state::clear(&key, file)?,
        },
    }

    Ok(())
}
