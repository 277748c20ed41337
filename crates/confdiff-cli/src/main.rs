//! confdiff CLI
//!
//! Command-line interface for Pilot vs Production change reports

use clap::{Parser, Subcommand};
use confdiff_core::logging_facility::{self, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "confdiff")]
#[command(about = "confdiff - Pilot vs Production configuration change reports", long_about = None)]
struct Cli {
    /// Human-readable debug logging on stderr
    #[arg(short, long, global = true, conflicts_with = "json_logs")]
    verbose: bool,

    /// JSON logging on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Diff every section of a bundle and write the HTML report
    Report(commands::report::ReportArgs),
    /// Print a Markdown change summary of a bundle
    Summary(commands::summary::SummaryArgs),
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        logging_facility::init(Profile::Development);
    } else if cli.json_logs {
        logging_facility::init(Profile::Production);
    }

    let result = match cli.command {
        Commands::Report(args) => commands::report::execute(args),
        Commands::Summary(args) => commands::summary::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
