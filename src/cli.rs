use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "entrygen", version, about)]
pub struct Args {
    /// Path to entrygen.toml (default: ./entrygen.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Root directory resolved by the host build tool
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Target config file (overrides entrygen.svelte_config)
    #[arg(long)]
    pub svelte_config: Option<PathBuf>,

    /// Print the patched config to stdout instead of writing it
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Print a run report to stderr
    #[arg(long, value_enum, default_value_t = ReportMode::Off)]
    pub report: ReportMode,

    /// Write the report to a file instead of stderr
    #[arg(long)]
    pub report_out: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a starter entrygen.toml
    Init {
        /// Overwrite an existing file
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportMode {
    Off,
    Summary,
    Full,
}
