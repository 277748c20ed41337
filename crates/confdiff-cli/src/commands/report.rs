//! Report command
//!
//! Usage: confdiff report <BUNDLE> [--config <FILE>] [--out-dir <DIR>] [--mode <MODE>]

use clap::Args;
use confdiff_core::report::{generate_report, ReportBundle, ReportConfig};
use confdiff_core::visibility::ReportMode;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Section bundle (JSON)
    pub bundle: PathBuf,

    /// Report configuration (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output directory for the body and TOC documents
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Row presentation: always-show or collapsible (overrides the config)
    #[arg(short, long)]
    pub mode: Option<ReportMode>,

    /// Report title (overrides the config)
    #[arg(short, long)]
    pub title: Option<String>,
}

/// Execute report command
pub fn execute(args: ReportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => ReportConfig::load(path)?,
        None => ReportConfig::default(),
    };
    if let Some(mode) = args.mode {
        config = config.with_mode(mode);
    }
    if let Some(title) = args.title {
        config = config.with_title(title);
    }

    let bundle = ReportBundle::load(&args.bundle)?;
    tracing::debug!(sections = bundle.sections.len(), "loaded bundle");

    let outcome = generate_report(bundle.into_sections(), &config, &args.out_dir)?;

    println!("Report written:");
    println!("  body: {}", outcome.body_path.display());
    println!("  toc: {}", outcome.toc_path.display());
    println!("  sections: {}", outcome.sections);
    println!(
        "  rows: +{} -{} ~{} ={}",
        outcome.summary.added,
        outcome.summary.deleted,
        outcome.summary.modified,
        outcome.summary.unchanged
    );
    for id in &outcome.dangling_jumps {
        eprintln!("warning: no bookmark for jump link '{}'", id);
    }

    Ok(())
}
