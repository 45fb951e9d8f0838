//! kconfig-lint CLI tool.
//!
//! Usage:
//! ```bash
//! kconfig-lint check [OPTIONS] [PATHS]...
//! kconfig-lint check --fix --preset espidf components/
//! kconfig-lint list-rules
//! kconfig-lint init
//! ```

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use kconfig_lint_rules::Preset;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Style checker and formatter for Kconfig files
#[derive(Parser)]
#[command(name = "kconfig-lint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check Kconfig files, optionally fixing them in place
    Check(CheckArgs),

    /// List available rules
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,

        /// Preset to start from
        #[arg(long, default_value_t = Preset::Zephyr)]
        preset: Preset,
    },
}

/// Options of the `check` command.
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Files or directories to check (default: current directory)
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Style preset (overrides the config file)
    #[arg(long)]
    pub preset: Option<Preset>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Only run specific rules (comma-separated names or codes)
    #[arg(long)]
    pub rules: Option<String>,

    /// Exclude patterns (can be specified multiple times)
    #[arg(short, long)]
    pub exclude: Vec<String>,

    /// Write fixed files back to disk
    #[arg(long, visible_alias = "write")]
    pub fix: bool,

    #[command(flatten)]
    pub style: StyleOverrides,
}

/// Command-line overrides of the resolved style.
#[derive(Args, Debug, Default, Clone)]
pub struct StyleOverrides {
    /// Indent with spaces instead of tabs
    #[arg(long)]
    pub use_spaces: bool,

    /// Indentation unit width (spaces per level)
    #[arg(long, value_name = "N")]
    pub primary_indent: Option<usize>,

    /// Spaces between the `help` keyword and its text
    #[arg(long, value_name = "N")]
    pub help_indent: Option<usize>,

    /// Maximum line length
    #[arg(long, value_name = "N")]
    pub max_line_length: Option<usize>,

    /// Maximum config name length
    #[arg(long, value_name = "N")]
    pub max_option_length: Option<usize>,

    /// Require uppercase config names
    #[arg(long)]
    pub uppercase_configs: bool,

    /// Minimum length of the config name prefix
    #[arg(long, value_name = "N")]
    pub min_prefix_length: Option<usize>,

    /// Indent entries nested in menus, choices and ifs
    #[arg(long)]
    pub indent_sub_items: bool,

    /// Collapse runs of empty lines
    #[arg(long)]
    pub consolidate_empty_lines: bool,
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
    /// Annotated source snippets.
    Fancy,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check(args) => commands::check::run(&args, cli.config.as_deref()),
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(())
        }
        Commands::Init { force, preset } => commands::init::run(force, preset),
    }
}
