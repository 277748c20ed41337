//! Section and report contexts.
//!
//! ## Logging Ownership
//!
//! `SectionContext::run` owns lifecycle logging for a section:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success, with per-status row counts
//! - `log_op_error!` on failure
//!
//! The stages it drives (reconcile, sort, render) log only their own details.

use crate::diff::{reconcile_with, DiffSummary, Diffgram};
use crate::errors::{DiffError, ExError};
use crate::model::Snapshot;
use crate::print_model::PrintModel;
use crate::render::{render, RenderedSection};
use crate::sort::sort;
use crate::visibility::ReportMode;
use crate::{log_op_end, log_op_error, log_op_start};
use confdiff_core_types::{ReportCorrelation, ReportId};
use std::collections::BTreeMap;

/// Inputs of one report section, consumed by [`SectionContext::run`]
#[derive(Debug, Clone)]
pub struct SectionContext {
    name: String,
    title: String,
    pilot: Snapshot,
    production: Snapshot,
    print_model: Option<PrintModel>,
}

/// A completed section
#[derive(Debug, Clone)]
pub struct SectionOutcome {
    pub name: String,
    pub title: String,
    pub rendered: RenderedSection,
    pub summary: DiffSummary,
}

impl SectionContext {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        pilot: Snapshot,
        production: Snapshot,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            pilot,
            production,
            print_model: None,
        }
    }

    /// Use `print_model` instead of the per-column defaults
    pub fn with_print_model(mut self, print_model: PrintModel) -> Self {
        self.print_model = Some(print_model);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Diff, sort and render the section, recording its Diffgram in `report`
    ///
    /// # Errors
    ///
    /// - `DuplicateSection` when `report` already holds a section of this name
    /// - `InvalidPrintModel` / `InvalidHeaderShape` for a bad print model
    /// - `ShapeMismatch` when Pilot and Production differ in shape
    ///
    /// Every error carries the section name and report id.
    pub fn run(self, report: &mut ReportContext) -> Result<SectionOutcome, ExError> {
        let correlation = report.correlation.for_section(self.name.as_str());
        let section = self.name.clone();
        let report_id = correlation.report_id.as_str();
        log_op_start!(
            "section_run",
            section = section.as_str(),
            report_id = report_id
        );
        let start = std::time::Instant::now();

        let outcome = self.run_impl(report).map_err(|e| {
            let e = e
                .with_section(section.as_str())
                .with_report_id(correlation.report_id.clone());
            log_op_error!(
                "section_run",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                section = section.as_str()
            );
            e
        })?;

        log_op_end!(
            "section_run",
            duration_ms = start.elapsed().as_millis() as u64,
            section = section.as_str(),
            report_id = report_id,
            rows_added = outcome.summary.added,
            rows_deleted = outcome.summary.deleted,
            rows_modified = outcome.summary.modified,
            rows_unchanged = outcome.summary.unchanged
        );
        Ok(outcome)
    }

    fn run_impl(self, report: &mut ReportContext) -> Result<SectionOutcome, ExError> {
        if report.contains(&self.name) {
            return Err(ExError::from(DiffError::DuplicateSection {
                section: self.name.clone(),
            })
            .with_op("section_run"));
        }

        let print_model = self
            .print_model
            .unwrap_or_else(|| PrintModel::defaults_for(&self.pilot));
        print_model
            .validate(&self.pilot)
            .map_err(|e| ExError::from(e).with_op("validate_print_model"))?;

        let diffgram = reconcile_with(
            &self.pilot,
            &self.production,
            &print_model.reconcile_options(),
        )?;
        let diffgram = sort(diffgram, &print_model);
        let rendered = render(&diffgram, &print_model, report.mode())?;
        let summary = diffgram.summary();

        report.insert(self.name.clone(), diffgram);
        Ok(SectionOutcome {
            name: self.name,
            title: self.title,
            rendered,
            summary,
        })
    }
}

/// Report-wide state: run correlation, mode, and completed Diffgrams by name
#[derive(Debug, Clone)]
pub struct ReportContext {
    correlation: ReportCorrelation,
    mode: ReportMode,
    sections: BTreeMap<String, Diffgram>,
    order: Vec<String>,
}

impl ReportContext {
    pub fn new(mode: ReportMode) -> Self {
        Self {
            correlation: ReportCorrelation::new(),
            mode,
            sections: BTreeMap::new(),
            order: Vec::new(),
        }
    }

    pub fn with_report_id(mut self, report_id: ReportId) -> Self {
        self.correlation = ReportCorrelation::with_report_id(report_id);
        self
    }

    pub fn report_id(&self) -> &ReportId {
        &self.correlation.report_id
    }

    pub fn mode(&self) -> ReportMode {
        self.mode
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    /// Diffgram of a completed section
    pub fn section(&self, name: &str) -> Option<&Diffgram> {
        self.sections.get(name)
    }

    /// Completed section names, in run order
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Totals over every completed section
    pub fn summary(&self) -> DiffSummary {
        self.sections
            .values()
            .fold(DiffSummary::default(), |acc, d| acc.merge(d.summary()))
    }

    fn insert(&mut self, name: String, diffgram: Diffgram) {
        self.order.push(name.clone());
        self.sections.insert(name, diffgram);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;
    use crate::model::{build_snapshot, Column, TableBuilder};

    fn snapshot(rows: &[(&str, i64)]) -> Snapshot {
        let mut builder = TableBuilder::new("profiles")
            .column(Column::text("Name"))
            .column(Column::integer("Step"))
            .primary_key(["Name"]);
        for (name, step) in rows {
            builder.push_row(vec![(*name).into(), (*step).into()]);
        }
        build_snapshot(vec![builder.build().unwrap()], vec![]).unwrap()
    }

    #[test]
    fn test_run_records_section() {
        let mut report = ReportContext::new(ReportMode::AlwaysShow);
        let outcome = SectionContext::new(
            "run_profiles",
            "Run Profiles",
            snapshot(&[("Full", 1)]),
            snapshot(&[("Full", 2)]),
        )
        .run(&mut report)
        .unwrap();

        assert_eq!(outcome.summary.modified, 1);
        assert!(outcome.rendered.html.contains("<table"));
        assert!(report.section("run_profiles").is_some());
        assert_eq!(report.section_names().collect::<Vec<_>>(), vec!["run_profiles"]);
    }

    #[test]
    fn test_duplicate_section_rejected() {
        let mut report = ReportContext::new(ReportMode::Collapsible);
        let s = snapshot(&[]);
        SectionContext::new("a", "A", s.clone(), s.clone())
            .run(&mut report)
            .unwrap();
        let err = SectionContext::new("a", "A", s.clone(), s)
            .run(&mut report)
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::DuplicateSection);
        assert_eq!(err.section(), Some("a"));
        assert_eq!(err.report_id(), Some(report.report_id()));
    }

    #[test]
    fn test_invalid_print_model_fails_section() {
        let mut report = ReportContext::new(ReportMode::Collapsible);
        let s = snapshot(&[("Full", 1)]);
        let mut model = PrintModel::new();
        model.hide(0, 0);
        let err = SectionContext::new("a", "A", s.clone(), s)
            .with_print_model(model)
            .run(&mut report)
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidPrintModel);
        assert!(!report.contains("a"));
    }
}
