//! Summary command
//!
//! Usage: confdiff summary <BUNDLE> [--output <FILE>]

use clap::Args;
use confdiff_core::context::ReportContext;
use confdiff_core::diff::render_human_summary;
use confdiff_core::report::ReportBundle;
use confdiff_core::visibility::ReportMode;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// Section bundle (JSON)
    pub bundle: PathBuf,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute summary command
pub fn execute(args: SummaryArgs) -> Result<(), Box<dyn std::error::Error>> {
    let bundle = ReportBundle::load(&args.bundle)?;
    let mut report = ReportContext::new(ReportMode::AlwaysShow);

    let mut markdown = String::new();
    for section in bundle.into_sections() {
        let outcome = section.run(&mut report)?;
        let diffgram = report
            .section(&outcome.name)
            .ok_or_else(|| format!("section '{}' was not recorded", outcome.name))?;
        markdown.push_str(&render_human_summary(&outcome.title, diffgram));
        markdown.push('\n');
    }

    if let Some(output_path) = args.output {
        std::fs::write(&output_path, markdown)?;
        println!("✓ Summary written to {}", output_path.display());
    } else {
        print!("{}", markdown);
    }

    Ok(())
}
