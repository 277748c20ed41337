//! Pre-extracted section bundles (JSON).
//!
//! Producers extract each feature's slice of the Pilot and Production
//! configuration into tables and hand the result over as one bundle:
//!
//! ```json
//! { "sections": [ { "name": "connectors", "title": "Connectors",
//!                   "pilot": { "tables": [...], "relations": [...] },
//!                   "production": { ... },
//!                   "print_model": { "directives": [...] } } ] }
//! ```

use crate::context::SectionContext;
use crate::errors::{io_error, DiffError};
use crate::model::Snapshot;
use crate::print_model::PrintModel;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// One section's inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSpec {
    pub name: String,
    pub title: String,
    pub pilot: Snapshot,
    pub production: Snapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print_model: Option<PrintModel>,
}

impl SectionSpec {
    pub fn into_context(self) -> SectionContext {
        let context = SectionContext::new(self.name, self.title, self.pilot, self.production);
        match self.print_model {
            Some(model) => context.with_print_model(model),
            None => context,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportBundle {
    pub sections: Vec<SectionSpec>,
}

impl ReportBundle {
    /// Parse a bundle; snapshots are validated while deserializing
    ///
    /// # Errors
    ///
    /// - `Serialization` for malformed JSON or an invalid table/relation
    /// - `DuplicateSection` when two sections share a name
    pub fn from_json_str(text: &str) -> Result<Self, DiffError> {
        let bundle: ReportBundle = serde_json::from_str(text)?;
        let mut names = HashSet::new();
        for section in &bundle.sections {
            if !names.insert(section.name.as_str()) {
                return Err(DiffError::DuplicateSection {
                    section: section.name.clone(),
                });
            }
        }
        Ok(bundle)
    }

    /// # Errors
    ///
    /// `Io` when the file cannot be read, otherwise as [`Self::from_json_str`].
    pub fn load(path: &Path) -> Result<Self, DiffError> {
        let text = fs::read_to_string(path).map_err(|e| io_error("read_bundle", e))?;
        Self::from_json_str(&text)
    }

    pub fn into_sections(self) -> Vec<SectionContext> {
        self.sections
            .into_iter()
            .map(SectionSpec::into_context)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn side(rows: serde_json::Value) -> serde_json::Value {
        json!({
            "tables": [{
                "name": "connectors",
                "columns": [{"name": "Name", "type": "text"}, {"name": "Type", "type": "text"}],
                "primary_key": ["Name"],
                "rows": rows
            }]
        })
    }

    #[test]
    fn test_parse_bundle() {
        let text = json!({
            "sections": [{
                "name": "connectors",
                "title": "Connectors",
                "pilot": side(json!([["AD", "ldap"]])),
                "production": side(json!([]))
            }]
        })
        .to_string();
        let bundle = ReportBundle::from_json_str(&text).unwrap();
        assert_eq!(bundle.sections.len(), 1);
        assert_eq!(bundle.sections[0].pilot.tables()[0].rows().len(), 1);
        assert!(bundle.sections[0].print_model.is_none());
        assert_eq!(bundle.into_sections()[0].name(), "connectors");
    }

    #[test]
    fn test_duplicate_section_names_rejected() {
        let section = json!({
            "name": "a", "title": "A",
            "pilot": side(json!([])), "production": side(json!([]))
        });
        let text = json!({ "sections": [section.clone(), section] }).to_string();
        let err = ReportBundle::from_json_str(&text).unwrap_err();
        assert!(matches!(err, DiffError::DuplicateSection { .. }));
    }

    #[test]
    fn test_invalid_table_is_serialization_error() {
        let text = json!({
            "sections": [{
                "name": "a", "title": "A",
                "pilot": side(json!([["AD", "x"], ["AD", "y"]])),
                "production": side(json!([]))
            }]
        })
        .to_string();
        let err = ReportBundle::from_json_str(&text).unwrap_err();
        assert!(matches!(err, DiffError::Serialization { .. }));
    }
}
