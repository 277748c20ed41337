//! HTML rendering of a sorted Diffgram.
//!
//! [`render`] is a pure function of the Diffgram, the print model and the
//! report mode. It returns the body HTML together with the bookmark anchors
//! (as TOC entries) and jump targets it produced, so the report assembler can
//! cross-check links between sections.

pub mod bookmark;
pub mod html;
pub mod table;

pub use bookmark::{anchor_id, normalize_identifier, BookmarkRegistry, TocEntry};
pub use table::{plan_tables, TablePlan};

use crate::diff::{Diffgram, RelationIndex};
use crate::errors::{DiffError, ExError};
use crate::print_model::PrintModel;
use crate::visibility::{annotate, ReportMode};
use serde::{Deserialize, Serialize};
use table::{render_table, RenderInput};

/// Output of one rendered `<table>`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedTable {
    pub html: String,
    pub toc_entries: Vec<TocEntry>,
    pub jump_targets: Vec<String>,
}

impl RenderedTable {
    fn append(&mut self, other: RenderedTable) {
        self.html.push_str(&other.html);
        self.toc_entries.extend(other.toc_entries);
        self.jump_targets.extend(other.jump_targets);
    }
}

/// Every table of one section, concatenated
pub type RenderedSection = RenderedTable;

/// Render a Diffgram as HTML tables
///
/// # Errors
///
/// `InvalidHeaderShape` when a header shape does not fit its table or is
/// attached to a table that is rendered inside another table's chain.
pub fn render(
    diffgram: &Diffgram,
    print_model: &PrintModel,
    mode: ReportMode,
) -> Result<RenderedSection, ExError> {
    let index = RelationIndex::build(diffgram);
    let visibility = annotate(diffgram, &index, mode);
    let plans = plan_tables(diffgram);

    for shape in print_model.header_shapes() {
        if !plans.iter().any(|p| p.root() == shape.table_index) {
            let table = diffgram
                .tables()
                .get(shape.table_index)
                .map(|t| t.name.clone())
                .unwrap_or_else(|| shape.table_index.to_string());
            return Err(ExError::from(DiffError::InvalidHeaderShape {
                table,
                reason: "table is not rendered as a table root".to_string(),
            })
            .with_op("render"));
        }
    }

    let input = RenderInput {
        diffgram,
        print_model,
        index: &index,
        visibility: &visibility,
    };

    let mut section = RenderedSection::default();
    for plan in &plans {
        let rendered =
            render_table(&input, plan).map_err(|e| ExError::from(e).with_op("render"))?;
        section.append(rendered);
    }

    tracing::debug!(
        tables = plans.len(),
        anchors = section.toc_entries.len(),
        jumps = section.jump_targets.len(),
        collapsed_rows = visibility.collapsed_count(),
        mode = %mode,
        "rendered section"
    );
    Ok(section)
}
