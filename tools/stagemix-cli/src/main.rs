//! Stagemix CLI: compute mixing layouts and replay recorded sessions.
//!
//! Usage:
//!   stagemix layout [OPTIONS]           Compute one layout for synthetic participants
//!   stagemix replay <EVENTS> [OPTIONS]  Replay a JSONL event stream through a session
//!   stagemix validate <PATH>            Validate a session config

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stagemix_layout_model::{LayoutMode, Resolution};

mod commands;

#[derive(Parser)]
#[command(
    name = "stagemix",
    about = "Composite layout engine for multi-party recordings",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a single layout and print it as JSON
    Layout {
        /// Layout mode: default|best_fit|vertical_presentation
        #[arg(short, long, default_value = "best_fit")]
        mode: LayoutMode,

        /// Number of synthetic participants (p01, p02, ...)
        #[arg(short, long, default_value = "4")]
        participants: usize,

        /// Canvas width (defaults to the configured recording width)
        #[arg(long)]
        width: Option<u32>,

        /// Canvas height (defaults to the configured recording height)
        #[arg(long)]
        height: Option<u32>,

        /// Source resolution of every participant, as WIDTHxHEIGHT
        #[arg(long, default_value = "1280x720")]
        source: Resolution,

        /// Featured participant for vertical presentation
        #[arg(long)]
        featured: Option<String>,
    },

    /// Replay a session event stream and print every recorder command
    Replay {
        /// Path to the events.jsonl file
        events: PathBuf,

        /// Session config (defaults to the configured recording defaults)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Call shutdown once the stream is exhausted
        #[arg(long)]
        shutdown: bool,
    },

    /// Validate a session config file
    Validate {
        /// Path to the session.json file
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut app_config = stagemix_common::config::AppConfig::load();
    if cli.verbose {
        app_config.logging.level = "debug".to_string();
    }
    app_config.logging.json |= cli.log_json;
    stagemix_common::logging::init_logging(&app_config.logging);

    match cli.command {
        Commands::Layout {
            mode,
            participants,
            width,
            height,
            source,
            featured,
        } => commands::layout::run(
            &app_config.recording,
            mode,
            participants,
            width,
            height,
            source,
            featured,
        ),
        Commands::Replay {
            events,
            config,
            shutdown,
        } => commands::replay::run(&app_config.recording, events, config, shutdown),
        Commands::Validate { path } => commands::validate::run(path),
    }
}
