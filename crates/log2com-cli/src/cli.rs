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
    author = "Jackson Elowitt",
    version,
    about = "log2com - Turn optimized geometries from Gaussian logs into Gaussian input decks.",
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
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert one geometry file, or every matching file in a directory, into .com decks.
    Convert(ConvertArgs),
    /// Print the bonds inferred from a geometry file.
    Bonds(BondsArgs),
    /// Print the default configuration as TOML.
    Defaults,
}

/// Arguments for the `convert` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct ConvertArgs {
    // --- Core Arguments ---
    /// Input geometry file, or a directory of them.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Directory that receives the generated .com files.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output: PathBuf,

    /// Optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Extension of the files picked up when the input is a directory.
    #[arg(short, long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Use the last printed geometry of logs whose optimization did not converge.
    #[arg(long)]
    pub allow_unconverged: bool,

    // --- Job Overrides ---
    /// Net molecular charge.
    #[arg(long, value_name = "INT", allow_hyphen_values = true)]
    pub charge: Option<String>,

    /// Spin multiplicity.
    #[arg(short, long, visible_alias = "mul", value_name = "INT")]
    pub multiplicity: Option<String>,

    /// Job keywords, e.g. "Opt Freq".
    #[arg(long, value_name = "KEYWORDS")]
    pub job: Option<String>,

    /// Level of theory, e.g. B3LYP.
    #[arg(long, value_name = "METHOD")]
    pub theory: Option<String>,

    /// Basis set, e.g. 6-311G(2df,2p).
    #[arg(long, value_name = "BASIS")]
    pub basis: Option<String>,

    /// Shared-memory processor count (%nprocshared).
    #[arg(long, value_name = "INT")]
    pub cores: Option<String>,

    /// Memory request (%mem), e.g. 20gb.
    #[arg(long, value_name = "AMOUNT")]
    pub memory: Option<String>,

    /// Linda worker count (%nproclinda); omitted from the deck when 1.
    #[arg(long, value_name = "INT")]
    pub linda: Option<String>,

    // --- Bond Perception Overrides ---
    /// Multiplier applied to the sum of covalent radii.
    #[arg(short, long, value_name = "FLOAT")]
    pub tolerance: Option<f64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S job.theory=M06-2X
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `bonds` subcommand.
#[derive(Args, Debug, Clone)]
pub struct BondsArgs {
    /// Input geometry file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Multiplier applied to the sum of covalent radii.
    #[arg(short, long, value_name = "FLOAT")]
    pub tolerance: Option<f64>,

    /// Fail on elements without a known covalent radius instead of treating them as radius 0.
    #[arg(long)]
    pub strict: bool,

    /// Use the cell-grid neighbor search instead of checking all pairs.
    #[arg(long)]
    pub grid: bool,

    /// Use the last printed geometry of logs whose optimization did not converge.
    #[arg(long)]
    pub allow_unconverged: bool,
}
