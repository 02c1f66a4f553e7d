use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use iqr_calculator::{generate::Distribution, table::ColumnSelector, QuartileMethod};

/// Interquartile range calculator
#[derive(Parser)]
#[clap(version)]
pub struct Args {
    /// Numbers to analyse, separated by spaces or commas. Starts the interactive console when empty
    #[clap(allow_hyphen_values = true)]
    pub values: Vec<String>,

    /// Read the sample from a .csv, .txt or .xlsx file
    #[clap(short, long)]
    pub file: Option<PathBuf>,

    /// Column of the file: index, header name or "all"
    #[clap(short, long)]
    pub column: Option<ColumnSelector>,

    /// Quartile method
    #[clap(short, long)]
    pub method: Option<QuartileMethod>,

    /// Decimals in the report
    #[clap(short, long)]
    pub precision: Option<usize>,

    /// Analyse a random sample of this size
    #[clap(long)]
    pub random: Option<usize>,

    /// Distribution of the random sample
    #[clap(long, value_enum)]
    pub distribution: Option<DistributionKind>,

    /// Seed for the random sample
    #[clap(long)]
    pub seed: Option<u64>,

    /// Write one row per statistic
    #[clap(long)]
    pub export_csv: Option<PathBuf>,

    /// Write one row per sorted value
    #[clap(long)]
    pub export_data_csv: Option<PathBuf>,

    /// Write an Excel workbook
    #[clap(long)]
    pub export_xlsx: Option<PathBuf>,
}

impl Args {
    pub fn is_one_shot(&self) -> bool {
        !self.values.is_empty() || self.file.is_some() || self.random.is_some()
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy, ValueEnum)]
pub enum DistributionKind {
    Normal,
    Uniform,
    Exponential,
}

impl DistributionKind {
    /// Configured parameters when the kinds match, stock ones otherwise.
    pub fn with_defaults(self, configured: Distribution) -> Distribution {
        match (self, configured) {
            (DistributionKind::Normal, d @ Distribution::Normal { .. })
            | (DistributionKind::Uniform, d @ Distribution::Uniform { .. })
            | (DistributionKind::Exponential, d @ Distribution::Exponential { .. }) => d,
            (DistributionKind::Normal, _) => Distribution::default(),
            (DistributionKind::Uniform, _) => Distribution::Uniform {
                low: 0.0,
                high: 100.0,
            },
            (DistributionKind::Exponential, _) => Distribution::Exponential { scale: 5.0 },
        }
    }
}

#[derive(PartialEq, Eq, Debug, Clone, Copy, ValueEnum)]
pub enum ExportKind {
    /// One row per statistic
    Csv,
    /// One row per sorted value
    Data,
    /// Excel workbook
    Xlsx,
    /// Text report
    Txt,
}

#[derive(PartialEq, Debug, Clone)]
pub enum CliCommand {
    None,
    Compute(String),
    SetMethod(QuartileMethod),
    ListMethods,
    Random {
        count: Option<usize>,
        distribution: Option<DistributionKind>,
    },
    Export(ExportKind, PathBuf),
}

pub enum CliError {
    Parse(String),
    Exit,
}

/// Console commands
#[derive(Parser)]
struct Commands {
    #[command(subcommand)]
    command: Com,
}

#[derive(Subcommand)]
enum Com {
    /// Exit from the program
    #[clap(alias = "quit")]
    Exit,

    /// Analyse numbers (a line starting with a number does the same)
    #[clap(alias = "c")]
    Calc {
        #[clap(allow_hyphen_values = true)]
        values: Vec<String>,
    },

    /// Select the quartile method and recompute the last sample
    #[clap(alias = "m")]
    Method {
        /// exclusive-halves, inclusive-halves, linear-interpolation, rank-midpoint or percentile
        method: QuartileMethod,
    },

    /// List quartile methods
    Methods,

    /// Analyse a random sample
    #[clap(alias = "r")]
    Random {
        /// Sample size, the configured one when omitted
        count: Option<usize>,

        /// Distribution
        #[clap(short, long, value_enum)]
        distribution: Option<DistributionKind>,
    },

    /// Export the last result
    #[clap(alias = "e")]
    Export {
        /// What to write
        #[clap(value_enum)]
        kind: ExportKind,

        /// Target file
        path: PathBuf,
    },
}

fn looks_numeric(line: &str) -> bool {
    line.chars()
        .next()
        .map(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'))
        .unwrap_or(false)
}

/// Empty line repeats `last`; a line starting with a number is data.
pub fn parse_cli_command(line: &str, last: &CliCommand) -> Result<CliCommand, CliError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(last.clone());
    }
    if looks_numeric(line) {
        return Ok(CliCommand::Compute(line.to_owned()));
    }

    let Ok(mut r) = shellwords::split(line) else {
        return Err(CliError::Parse("Unbalanced quotes".to_owned()));
    };

    r.insert(0, "IQR".to_string());

    match Commands::try_parse_from(r) {
        Ok(cmd) => match cmd.command {
            Com::Exit => Err(CliError::Exit),
            Com::Calc { values } => Ok(CliCommand::Compute(values.join(" "))),
            Com::Method { method } => Ok(CliCommand::SetMethod(method)),
            Com::Methods => Ok(CliCommand::ListMethods),
            Com::Random {
                count,
                distribution,
            } => Ok(CliCommand::Random {
                count,
                distribution,
            }),
            Com::Export { kind, path } => Ok(CliCommand::Export(kind, path)),
        },
        Err(e) => Err(CliError::Parse(format!("{}", e))),
    }
}
