//! Correlation types for report runs
//!
//! A report run is identified by a [`ReportId`]; every log line emitted while
//! building the report carries it so that a single run can be filtered out of
//! a shared log stream.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for one report generation run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportId(String);

impl ReportId {
    /// Generate a new ReportId using UUIDv7 (time-ordered)
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for ReportId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ReportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Correlation carried from the report into each section run
#[derive(Debug, Clone)]
pub struct ReportCorrelation {
    pub report_id: ReportId,
    pub section: Option<String>,
}

impl ReportCorrelation {
    /// Create a correlation with a fresh ReportId
    pub fn new() -> Self {
        Self {
            report_id: ReportId::new(),
            section: None,
        }
    }

    /// Create a correlation for an existing report
    pub fn with_report_id(report_id: ReportId) -> Self {
        Self {
            report_id,
            section: None,
        }
    }

    /// Narrow the correlation to one named section
    pub fn for_section(&self, section: impl Into<String>) -> Self {
        Self {
            report_id: self.report_id.clone(),
            section: Some(section.into()),
        }
    }
}

impl Default for ReportCorrelation {
    fn default() -> Self {
        Self::new()
    }
}
