//! Recut CLI: inspect, validate, and edit timeline projects.
//!
//! Usage:
//!   recut info <PROJECT>                        Show project information
//!   recut validate <PROJECT> [--fix]            Check timeline invariants
//!   recut split <PROJECT> --clip ID --at MS     Split a clip
//!   recut trim-start <PROJECT> --clip ID --to MS
//!   recut trim-end <PROJECT> --clip ID --to MS
//!   recut duplicate <PROJECT> --clip ID
//!   recut delete <PROJECT> --clip ID
//!   recut speed-up <PROJECT> [--clip ID]        Apply suggested speed-ups
//!   recut keystrokes <PROJECT>                  Rebuild keystroke overlays

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use recut_common::config::{AppConfig, LoggingConfig};

mod commands;

use commands::{parse_metadata_arg, SpeedUpKindArg};

#[derive(Parser)]
#[command(
    name = "recut",
    about = "Timeline editing for screen recordings",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/recut/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments shared by every command that edits a project.
#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    /// Path to the project JSON file
    pub project: PathBuf,

    /// Keyboard capture for a recording, as RECORDING_ID=PATH (JSONL)
    #[arg(long = "metadata", value_parser = parse_metadata_arg)]
    pub metadata: Vec<(String, PathBuf)>,

    /// Write the result here instead of overwriting the project
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the result without saving
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show project information
    Info {
        /// Path to the project JSON file
        project: PathBuf,

        /// Print a JSON summary
        #[arg(long)]
        json: bool,
    },

    /// Check timeline invariants
    Validate {
        #[command(flatten)]
        args: EditArgs,

        /// Heal drift, drop malformed effects, and save
        #[arg(long)]
        fix: bool,
    },

    /// Split a clip at an offset from its start
    Split {
        #[command(flatten)]
        args: EditArgs,

        #[arg(long)]
        clip: String,

        /// Offset into the clip (timeline ms)
        #[arg(long)]
        at: f64,
    },

    /// Move a clip's start (timeline ms)
    TrimStart {
        #[command(flatten)]
        args: EditArgs,

        #[arg(long)]
        clip: String,

        #[arg(long)]
        to: f64,
    },

    /// Move a clip's end (timeline ms)
    TrimEnd {
        #[command(flatten)]
        args: EditArgs,

        #[arg(long)]
        clip: String,

        #[arg(long)]
        to: f64,
    },

    /// Insert a copy of a clip right after it
    Duplicate {
        #[command(flatten)]
        args: EditArgs,

        #[arg(long)]
        clip: String,
    },

    /// Remove a clip and close the gap
    Delete {
        #[command(flatten)]
        args: EditArgs,

        #[arg(long)]
        clip: String,
    },

    /// Speed up typing and idle stretches detected from keyboard activity
    SpeedUp {
        #[command(flatten)]
        args: EditArgs,

        /// Only this clip (default: every video clip)
        #[arg(long)]
        clip: Option<String>,

        /// Kinds to apply
        #[arg(long, value_enum, value_delimiter = ',', default_value = "typing,idle")]
        kinds: Vec<SpeedUpKindArg>,
    },

    /// Rebuild keystroke overlays from keyboard captures
    Keystrokes {
        #[command(flatten)]
        args: EditArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };

    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    recut_common::logging::init_logging(&LoggingConfig {
        level,
        ..config.logging.clone()
    });
    config.validate()?;

    match cli.command {
        Commands::Info { project, json } => commands::info::run(project, json),
        Commands::Validate { args, fix } => commands::validate::run(&config, args, fix),
        Commands::Split { args, clip, at } => commands::edit::split(&config, args, clip, at),
        Commands::TrimStart { args, clip, to } => commands::edit::trim_start(&config, args, clip, to),
        Commands::TrimEnd { args, clip, to } => commands::edit::trim_end(&config, args, clip, to),
        Commands::Duplicate { args, clip } => commands::edit::duplicate(&config, args, clip),
        Commands::Delete { args, clip } => commands::edit::delete(&config, args, clip),
        Commands::SpeedUp { args, clip, kinds } => commands::speed_up::run(&config, args, clip, kinds),
        Commands::Keystrokes { args } => commands::keystrokes::run(&config, args),
    }
}
