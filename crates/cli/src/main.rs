// votelens CLI - society-oriented referendum analysis

mod analyze;
mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use votelens_analysis::keywords::KeywordPreset;
use votelens_analysis::AnalysisError;

use exit_codes::{exit_code, EXIT_ERROR, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "votelens")]
#[command(about = "Classify Swiss referendums and rank cantons by support for society-oriented votes")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Analysis config (TOML); defaults apply when omitted
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print JSON to stdout instead of the human summary
    #[arg(long, global = true)]
    pub json: bool,

    /// Write JSON output to file
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Label every vote as society-oriented or not
    #[command(after_help = "\
Examples:
  votelens classify votes.csv
  votelens classify votes.csv --preset detailed --export labeled.csv")]
    Classify {
        /// Vote data (delimited text)
        data: PathBuf,

        /// Keyword preset, overriding the config
        #[arg(long, value_enum)]
        preset: Option<PresetArg>,

        /// Write the labeled table as CSV
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Full report: summary, canton ranking, trends and periods
    #[command(after_help = "\
Examples:
  votelens report votes.csv --config analysis.toml
  votelens report votes.csv --json --output report.json")]
    Report {
        data: PathBuf,
    },

    /// Summary counts and acceptance statistics
    Summary {
        data: PathBuf,
    },

    /// Rank cantons by mean yes-percentage on society-oriented votes
    Rank {
        data: PathBuf,

        /// Show only the first N cantons
        #[arg(long)]
        top: Option<usize>,
    },

    /// Acceptance trend of society-oriented votes over time
    #[command(after_help = "\
Examples:
  votelens trend votes.csv
  votelens trend votes.csv --window 5 --cantons zh,be,vs")]
    Trend {
        data: PathBuf,

        /// Rolling window in votes
        #[arg(long, default_value_t = 10)]
        window: usize,

        /// Minimum values per rolling window
        #[arg(long, default_value_t = 3)]
        min_periods: usize,

        /// Cantons for per-canton trend lines
        #[arg(long, value_delimiter = ',')]
        cantons: Vec<String>,
    },

    /// Acceptance per period, society-oriented against other votes
    Periods {
        data: PathBuf,

        /// Period scheme, overriding the config
        #[arg(long, value_enum)]
        scheme: Option<SchemeArg>,

        /// Width in years for the fixed scheme
        #[arg(long)]
        width: Option<u32>,
    },

    /// Search votes by title
    #[command(after_help = "\
Examples:
  votelens search votes.csv 'ehe'
  votelens search votes.csv 'Ehe für alle' --exact")]
    Search {
        data: PathBuf,

        /// Pattern (case-insensitive regex) or exact title
        term: String,

        /// Match the whole title instead of a pattern
        #[arg(long)]
        exact: bool,

        /// Title column to search, defaults to the short title
        #[arg(long)]
        column: Option<String>,
    },

    /// Canton results and statistics of a single vote
    Vote {
        data: PathBuf,
        term: String,
    },

    /// Compare 2 to 6 votes at canton level
    Compare {
        data: PathBuf,

        /// Search terms, one per vote
        #[arg(required = true, num_args = 2..)]
        terms: Vec<String>,
    },

    /// Party recommendations on society-oriented votes
    Parties {
        data: PathBuf,
    },

    /// Stratified sample for checking the classification by hand
    Sample {
        data: PathBuf,

        /// Sample size, overriding the config
        #[arg(long)]
        size: Option<usize>,

        /// Random seed, overriding the config
        #[arg(long)]
        seed: Option<u64>,

        /// Write the sample as CSV
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Validate a config file without running
    Validate {
        /// Path to the analysis TOML
        file: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PresetArg {
    Coarse,
    Detailed,
    Combined,
}

impl From<PresetArg> for KeywordPreset {
    fn from(p: PresetArg) -> Self {
        match p {
            PresetArg::Coarse => KeywordPreset::Coarse,
            PresetArg::Detailed => KeywordPreset::Detailed,
            PresetArg::Combined => KeywordPreset::Combined,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SchemeArg {
    Eras,
    Fixed,
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    // Also installs the bridge for the library's `log` records.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    match analyze::dispatch(cli.command, &cli.global) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    /// Failure outside any specific exit code range.
    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<AnalysisError> for CliError {
    fn from(err: AnalysisError) -> Self {
        let hint = match &err {
            AnalysisError::MissingColumn { .. } => {
                Some("column names are set in the [columns] section of the config".to_string())
            }
            AnalysisError::NoRegionColumns { .. } => {
                Some("check [regions] suffix in the config".to_string())
            }
            AnalysisError::VoteNotFound { .. } => {
                Some("use `votelens search` to find the exact title".to_string())
            }
            AnalysisError::InvalidPattern { .. } => {
                Some("use --exact to match a literal title".to_string())
            }
            _ => None,
        };
        Self { code: exit_code(&err), message: err.to_string(), hint }
    }
}
