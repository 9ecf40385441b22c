//! geomemo CLI — inspect and maintain a geometry result cache.
//!
//! Provides `geomemo list` to show stored entries, `geomemo clear` to drop
//! them all, `geomemo invalidate` to drop one, and `geomemo key` to compute
//! the key of a time-windowed query.

#![warn(missing_docs)]

mod clear;
mod invalidate;
mod key;
mod list;
mod logging;
mod project;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// geomemo — disk-backed memoization for geometry primitives.
#[derive(Parser, Debug)]
#[command(name = "geomemo", version, about = "Geometry result cache maintenance")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `geomemo.toml` configuration file or its directory.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Cache directory, overriding the configured one.
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the entries currently stored.
    List(ListArgs),
    /// Remove every entry.
    Clear,
    /// Remove the entry stored under one key.
    Invalidate {
        /// The 32-character hex key.
        key: String,
    },
    /// Print the key of a time-windowed query.
    Key(KeyArgs),
}

/// Arguments for the `geomemo list` subcommand.
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `geomemo key` subcommand.
#[derive(Parser, Debug)]
pub struct KeyArgs {
    /// Target identifier (e.g. a satellite id).
    pub identifier: String,

    /// Window start as an RFC 3339 timestamp.
    pub start: String,

    /// Window end as an RFC 3339 timestamp.
    pub end: String,

    /// Hash of the simulation configuration.
    pub config_hash: String,
}

/// Output format for `geomemo list`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
    /// Optional cache directory override.
    pub dir: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.quiet, cli.verbose);

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
        dir: cli.dir,
    };

    let result = match cli.command {
        Command::List(ref args) => list::run(args, &global),
        Command::Clear => clear::run(&global),
        Command::Invalidate { ref key } => invalidate::run(key, &global),
        Command::Key(ref args) => key::run(args),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
