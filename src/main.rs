use anyhow::Context;
use clap::Parser;
use std::io::Write;

use golisttests::walker::{list_test_names, Budget, Limited, Unlimited, WalkReport};

mod cli;

use cli::{Cli, OutputFormat};

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(error) => {
            eprintln!("golisttests error: {error:#}");
            std::process::exit(1);
        }
    }
}

/// `Ok(false)` when the walk stopped early; the partial names are still printed
fn run() -> anyhow::Result<bool> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let mut budget: Box<dyn Budget> = if cli.limit {
        Box::new(Limited::new(cli.max_files, cli.max_execution))
    } else {
        Box::new(Unlimited)
    };

    let report = list_test_names(&cli.root, &cli.scan_options(), budget.as_mut());
    print_names(&report, cli.format)?;

    match &report.error {
        Some(error) => {
            eprintln!("golisttests error: {error}");
            Ok(false)
        }
        None => Ok(true),
    }
}

fn print_names(report: &WalkReport, format: OutputFormat) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match format {
        OutputFormat::Plain => {
            for name in &report.names {
                writeln!(out, "{name}").context("failed to write to stdout")?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut out, &report.names).context("failed to write JSON")?;
            writeln!(out).context("failed to write to stdout")?;
        }
    }

    out.flush().context("failed to flush stdout")
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("GOLISTTESTS_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
