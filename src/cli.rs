use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use golisttests::walker::{ScanOptions, DEFAULT_MAX_FILES};

/// How test names are written to stdout.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// One name per line
    #[default]
    Plain,
    /// A single JSON array
    Json,
}

/// List the Go test names under a directory, as `go test -run` would accept them.
#[derive(Debug, Parser)]
#[command(name = "golisttests", version, about)]
pub struct Cli {
    /// Directory to scan
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Stop after `--max-files` files or `--max-execution` wall time
    #[arg(long)]
    pub limit: bool,

    /// File quota when `--limit` is set
    #[arg(long, default_value_t = DEFAULT_MAX_FILES)]
    pub max_files: usize,

    /// Time allowance when `--limit` is set (`500ms`, `2s`, `1m`)
    #[arg(long, default_value = "1s", value_parser = parse_duration)]
    pub max_execution: Duration,

    /// Skip files excluded by .gitignore and hidden files
    #[arg(long)]
    pub respect_gitignore: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,

    /// Debug logging on stderr
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            respect_gitignore: self.respect_gitignore,
        }
    }
}

/// Parse `<n>ms`, `<n>s` or `<n>m`; a bare number is seconds.
pub fn parse_duration(value: &str) -> Result<Duration, String> {
    let value = value.trim();
    let (number, unit) = match value.find(|c: char| !c.is_ascii_digit()) {
        Some(index) => value.split_at(index),
        None => (value, "s"),
    };
    let amount: u64 = number
        .parse()
        .map_err(|_| format!("invalid duration '{value}'"))?;

    match unit {
        "ms" => Ok(Duration::from_millis(amount)),
        "s" => Ok(Duration::from_secs(amount)),
        "m" => Ok(Duration::from_secs(amount.saturating_mul(60))),
        other => Err(format!(
            "invalid duration unit '{other}' in '{value}' (expected ms, s or m)"
        )),
    }
}
