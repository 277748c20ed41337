//! Report generation: configuration, output streams and assembly.
//!
//! [`generate_report`] runs every section in order and writes the body and
//! TOC documents. The first failing section aborts the run and nothing is
//! committed to the output directory.

pub mod assembler;
pub mod bundle;
pub mod config;
pub mod writer;

pub use assembler::{section_anchor, ReportAssembler, ReportOutcome};
pub use bundle::{ReportBundle, SectionSpec};
pub use config::ReportConfig;
pub use writer::{ReportWriter, WrittenReport};

use crate::context::{ReportContext, SectionContext};
use crate::errors::ExError;
use crate::{log_op_end, log_op_error, log_op_start};
use confdiff_core_types::ReportId;
use std::path::Path;

/// Run `sections` and write the report under `out_dir`
///
/// # Errors
///
/// Any section error (carrying section name and report id), or `Io` when the
/// output cannot be written.
pub fn generate_report(
    sections: Vec<SectionContext>,
    config: &ReportConfig,
    out_dir: &Path,
) -> Result<ReportOutcome, ExError> {
    let report = ReportContext::new(config.mode);
    let report_id = report.report_id().clone();
    log_op_start!(
        "generate_report",
        report_id = report_id.as_str(),
        sections = sections.len(),
        mode = config.mode.as_str()
    );
    let start = std::time::Instant::now();

    let outcome = generate_report_impl(report, sections, config, out_dir).map_err(|e| {
        let e = e.with_report_id(report_id.clone());
        log_op_error!(
            "generate_report",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            report_id = report_id.as_str()
        );
        e
    })?;

    log_op_end!(
        "generate_report",
        duration_ms = start.elapsed().as_millis() as u64,
        report_id = report_id.as_str(),
        sections = outcome.sections,
        rows_added = outcome.summary.added,
        rows_deleted = outcome.summary.deleted,
        rows_modified = outcome.summary.modified,
        rows_unchanged = outcome.summary.unchanged
    );
    Ok(outcome)
}

fn generate_report_impl(
    mut report: ReportContext,
    sections: Vec<SectionContext>,
    config: &ReportConfig,
    out_dir: &Path,
) -> Result<ReportOutcome, ExError> {
    config
        .validate()
        .map_err(|e| ExError::from(e).with_op("generate_report"))?;
    let writer = ReportWriter::create(out_dir, &config.body_file, &config.toc_file)
        .map_err(|e| ExError::from(e).with_op("open_report"))?;
    let report_id: ReportId = report.report_id().clone();
    let mut assembler = ReportAssembler::begin(writer, config, &report_id)
        .map_err(|e| ExError::from(e).with_op("write_report"))?;

    for section in sections {
        let name = section.name().to_string();
        let outcome = section.run(&mut report)?;
        assembler.add_section(&outcome).map_err(|e| {
            ExError::from(e)
                .with_op("write_report")
                .with_section(name)
        })?;
    }

    assembler
        .finish()
        .map_err(|e| ExError::from(e).with_op("commit_report"))
}
