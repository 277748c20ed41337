//! Report document assembly.
//!
//! Concatenates rendered sections into the body stream, writes a TOC whose
//! links point into the body file, and cross-checks jump links against the
//! anchors of every section once the report is complete.

use crate::context::SectionOutcome;
use crate::diff::DiffSummary;
use crate::errors::DiffError;
use crate::render::html::escape;
use crate::render::{normalize_identifier, BookmarkRegistry};
use crate::report::config::ReportConfig;
use crate::report::writer::{ReportWriter, WrittenReport};
use confdiff_core_types::ReportId;
use std::path::PathBuf;

/// Result of a committed report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOutcome {
    pub body_path: PathBuf,
    pub toc_path: PathBuf,
    pub sections: usize,
    pub summary: DiffSummary,
    /// Jump targets that no section defined
    pub dangling_jumps: Vec<String>,
}

/// Streams sections into a [`ReportWriter`]
#[derive(Debug)]
pub struct ReportAssembler {
    writer: ReportWriter,
    body_file: String,
    registry: BookmarkRegistry,
    sections: usize,
    summary: DiffSummary,
}

/// `section-` + the normalized section name
pub fn section_anchor(name: &str) -> String {
    format!(
        "section-{}",
        normalize_identifier(name).unwrap_or_else(|| "unnamed".to_string())
    )
}

impl ReportAssembler {
    /// Write the document heads of both streams
    ///
    /// # Errors
    ///
    /// `Io` on write failure.
    pub fn begin(
        mut writer: ReportWriter,
        config: &ReportConfig,
        report_id: &ReportId,
    ) -> Result<Self, DiffError> {
        let title = escape(&config.title);
        let generated = chrono::Utc::now().to_rfc3339();

        writer.write_body(&format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n\
             <body data-report-id=\"{id}\" data-mode=\"{mode}\">\n<h1>{title}</h1>\n\
             <p class=\"generated\">Generated {generated}</p>\n",
            id = escape(report_id.as_str()),
            mode = config.mode,
        ))?;
        writer.write_toc(&format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}: Contents</title>\n</head>\n\
             <body data-report-id=\"{id}\">\n<h1>{title}</h1>\n<ul class=\"toc\">\n",
            id = escape(report_id.as_str()),
        ))?;

        Ok(Self {
            writer,
            body_file: config.body_file.clone(),
            registry: BookmarkRegistry::new(),
            sections: 0,
            summary: DiffSummary::default(),
        })
    }

    /// Append one completed section to both streams
    ///
    /// # Errors
    ///
    /// `Io` on write failure.
    pub fn add_section(&mut self, outcome: &SectionOutcome) -> Result<(), DiffError> {
        let anchor = section_anchor(&outcome.name);
        let title = escape(&outcome.title);
        let s = outcome.summary;

        self.writer.write_body(&format!(
            "<section id=\"{anchor}\">\n<h2>{title}</h2>\n{html}</section>\n",
            html = outcome.rendered.html,
        ))?;

        let body_file = escape(&self.body_file);
        let mut toc = format!(
            "<li><a href=\"{body_file}#{anchor}\">{title}</a> \
             <span class=\"counts\">+{} -{} ~{}</span>",
            s.added, s.deleted, s.modified
        );
        if !outcome.rendered.toc_entries.is_empty() {
            toc.push_str("\n<ul>\n");
            for entry in &outcome.rendered.toc_entries {
                toc.push_str(&format!(
                    "<li class=\"{}\"><a href=\"{}#{}\">{}</a></li>\n",
                    entry.status,
                    body_file,
                    escape(&entry.id),
                    escape(&entry.label)
                ));
            }
            toc.push_str("</ul>\n");
        }
        toc.push_str("</li>\n");
        self.writer.write_toc(&toc)?;

        for entry in &outcome.rendered.toc_entries {
            self.registry.add_anchor(&entry.id);
        }
        for jump in &outcome.rendered.jump_targets {
            self.registry.add_jump(jump);
        }
        self.sections += 1;
        self.summary = self.summary.merge(s);
        Ok(())
    }

    /// Close both documents and commit them
    ///
    /// Jump links whose anchor never appeared are logged and reported in the
    /// outcome; they do not fail the report.
    ///
    /// # Errors
    ///
    /// `Io` on write or commit failure.
    pub fn finish(mut self) -> Result<ReportOutcome, DiffError> {
        let dangling = self.registry.dangling();
        for id in &dangling {
            tracing::warn!(target_id = id.as_str(), "jump link has no matching bookmark");
        }

        self.writer.write_body("</body>\n</html>\n")?;
        self.writer.write_toc("</ul>\n</body>\n</html>\n")?;
        let WrittenReport {
            body_path,
            toc_path,
        } = self.writer.finish()?;

        Ok(ReportOutcome {
            body_path,
            toc_path,
            sections: self.sections,
            summary: self.summary,
            dangling_jumps: dangling,
        })
    }
}
