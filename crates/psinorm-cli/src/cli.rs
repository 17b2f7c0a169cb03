//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use psinorm_cli::config::OutputFormat;
use psinorm_cli::logging::LogFormat;

#[derive(Parser)]
#[command(
    name = "psinorm",
    version,
    about = "Score neuropsychological instruments against normative tables",
    long_about = "Derive composite scores from raw test responses, map them through \
                  age- and schooling-stratified normative tables, and classify the \
                  result.\n\n\
                  Results are reference data for a clinician, not a diagnosis."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file (defaults to the platform config directory).
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Catalog file replacing the built-in normative tables.
    #[arg(long, value_name = "PATH", global = true)]
    pub catalog: Option<PathBuf>,

    /// Result output format (overrides the config file).
    #[arg(long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Log output format (overrides the config file).
    #[arg(long = "log-format", value_enum, global = true)]
    pub log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the supported instruments.
    List,

    /// Show one instrument's raw fields, scored variables and norms.
    Describe {
        /// Instrument code, e.g. `ravlt`.
        code: String,
    },

    /// Score one set of raw responses.
    Score(ScoreArgs),

    /// Replay a newline-delimited file of scoring edits and print the
    /// surviving result per subject and instrument.
    Replay {
        #[arg(value_name = "EDITS_NDJSON")]
        path: PathBuf,
    },

    /// Export or verify normative catalogs.
    #[command(subcommand)]
    Catalog(CatalogCommand),

    /// Show or initialize the config file.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Parser)]
pub struct ScoreArgs {
    /// Read a JSON scoring request instead of the flags below.
    #[arg(
        long,
        value_name = "FILE",
        conflicts_with_all = ["instrument", "age", "birth_date", "assessed_on", "stratifier", "fields", "notes"]
    )]
    pub request: Option<PathBuf>,

    /// Instrument code.
    #[arg(long, short, required_unless_present = "request")]
    pub instrument: Option<String>,

    /// Age in completed years at administration.
    #[arg(long, conflicts_with = "birth_date")]
    pub age: Option<u32>,

    /// Birth date; the age is computed against --assessed-on.
    #[arg(long, value_name = "YYYY-MM-DD", requires = "assessed_on")]
    pub birth_date: Option<jiff::civil::Date>,

    /// Date of administration.
    #[arg(long, value_name = "YYYY-MM-DD", requires = "birth_date")]
    pub assessed_on: Option<jiff::civil::Date>,

    /// Schooling level or school type, for instruments normed by one.
    #[arg(long, short)]
    pub stratifier: Option<String>,

    /// A raw response, repeatable: `-f acertos=20 -f erros=3`.
    #[arg(long = "field", short = 'f', value_name = "NAME=VALUE", value_parser = parse_field)]
    pub fields: Vec<(String, f64)>,

    /// Free text carried through to the result.
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// Print the active catalog as JSON.
    Export,

    /// Load a catalog and run every integrity check against it.
    Verify {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration.
    Show,

    /// Write a default config file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

fn parse_field(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in '{s}'"));
    }
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value for {name}: {e}"))?;
    Ok((name.to_string(), value))
}
