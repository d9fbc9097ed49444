use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Mauricio Bedoya",
    version,
    about = "msjgen - Validates multi-stage Desmond MD protocols and generates their .msj, .cfg and .sh job files.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to resolve stages in parallel.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate an input file and print the resolved protocol.
    Check(CheckArgs),
    /// Validate an input file and write every job file into a new working directory.
    Build(BuildArgs),
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the INI input file with [settings], [build_geometry] and [protocol].
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Print the resolved configuration as TOML.
    #[arg(long)]
    pub dump: bool,

    /// Set a [protocol] value, overriding the input file.
    /// Can be used multiple times. Example: -S stage1_temp=15
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `build` subcommand.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Path to the INI input file with [settings], [build_geometry] and [protocol].
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Override the working directory from [settings]. It must not exist yet.
    #[arg(short, long, value_name = "DIR")]
    pub workdir: Option<PathBuf>,

    /// Override the structure file from [settings].
    #[arg(short = 'f', long, value_name = "PATH")]
    pub structure: Option<PathBuf>,

    /// Total charge of the structure. Skips the Schrödinger charge query.
    #[arg(long, value_name = "INT", allow_hyphen_values = true)]
    pub charge: Option<i64>,

    /// Run the generated preparation and protocol scripts, regardless of
    /// `run_preparation` and `run_protocols`.
    #[arg(long)]
    pub run: bool,

    /// Set a [protocol] value, overriding the input file.
    /// Can be used multiple times. Example: -S additional_stages=2
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
