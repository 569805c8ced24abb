//! vtrace CLI: placed timing path analysis from the command line.
//!
//! Provides `vtrace paths` to enrich timing report paths with placement and
//! netlist data, `vtrace stats` to summarize a timing report, and
//! `vtrace point` to look a single report point up in every input.

#![warn(missing_docs)]

mod paths;
mod pipeline;
mod point;
mod stats;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// vtrace: where the critical paths of a placed FPGA design run.
#[derive(Parser, Debug)]
#[command(name = "vtrace", version, about = "Placed timing path analysis")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print progress notes while loading inputs.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a custom `vtrace.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Enrich timing paths with placement and netlist data.
    Paths(PathsArgs),
    /// Summarize a timing report.
    Stats(StatsArgs),
    /// Look one report point up in the placement and the netlist.
    Point(PointArgs),
}

/// Input overrides shared by every subcommand.
///
/// Each flag replaces the matching `vtrace.toml` value. Paths given here are
/// relative to the working directory.
#[derive(Args, Debug, Default)]
pub struct InputArgs {
    /// Directory searched for inputs that are not named.
    #[arg(long)]
    pub search_dir: Option<PathBuf>,

    /// Synthesized netlist (`.blif` / `.eblif`).
    #[arg(long)]
    pub netlist: Option<PathBuf>,

    /// Packed netlist (`.net`).
    #[arg(long)]
    pub hierarchy: Option<PathBuf>,

    /// Placement file (`.place`).
    #[arg(long)]
    pub placement: Option<PathBuf>,

    /// Timing report (`.rpt`).
    #[arg(long)]
    pub timing: Option<PathBuf>,

    /// Timing check whose report is discovered.
    #[arg(long, value_enum)]
    pub check: Option<CheckArg>,

    /// Discover the pre-packing timing report.
    #[arg(long)]
    pub pre_pack: bool,

    /// Stop reading the report after the path with this id.
    #[arg(long)]
    pub max_paths: Option<u32>,

    /// Number of fusion workers (0 picks one per core).
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

/// Arguments for the `vtrace paths` subcommand.
#[derive(Parser, Debug)]
pub struct PathsArgs {
    /// Only the path with this `#Path` id.
    #[arg(long)]
    pub id: Option<u32>,

    /// Print one JSON record per line instead of tables.
    #[arg(long)]
    pub json: bool,

    /// Input overrides.
    #[command(flatten)]
    pub inputs: InputArgs,
}

/// Arguments for the `vtrace stats` subcommand.
#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// List the endpoints of every startpoint group.
    #[arg(long)]
    pub groups: bool,

    /// Print the statistics as JSON.
    #[arg(long)]
    pub json: bool,

    /// Input overrides.
    #[command(flatten)]
    pub inputs: InputArgs,
}

/// Arguments for the `vtrace point` subcommand.
#[derive(Parser, Debug)]
pub struct PointArgs {
    /// Report point name, e.g. `u_alu.sum[3].out[0]`.
    pub name: String,

    /// Input overrides.
    #[command(flatten)]
    pub inputs: InputArgs,
}

/// Timing check selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CheckArg {
    /// Setup (max-delay) report.
    Setup,
    /// Hold (min-delay) report.
    Hold,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print progress notes.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => atty_is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Paths(ref args) => paths::run(args, &global),
        Command::Stats(ref args) => stats::run(args, &global),
        Command::Point(ref args) => point::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Rough terminal detection from the `TERM` environment variable.
fn atty_is_terminal() -> bool {
    std::env::var("TERM").is_ok()
}
