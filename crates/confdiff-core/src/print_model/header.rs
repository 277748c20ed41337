//! Multi-row header shapes.

use crate::errors::DiffError;
use serde::{Deserialize, Serialize};

/// Largest header grid (rows × columns) accepted from input
pub const MAX_HEADER_SLOTS: usize = 4096;

fn one() -> usize {
    1
}

/// One `<th>` of a header grid
///
/// `row_index`/`column_index` address the top-left grid slot; columns count
/// visible rendered columns only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderCell {
    pub row_index: usize,
    pub column_index: usize,
    pub label: String,
    #[serde(default = "one")]
    pub row_span: usize,
    #[serde(default = "one")]
    pub col_span: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
}

impl HeaderCell {
    pub fn new(row_index: usize, column_index: usize, label: impl Into<String>) -> Self {
        Self {
            row_index,
            column_index,
            label: label.into(),
            row_span: 1,
            col_span: 1,
            width: None,
        }
    }

    pub fn with_span(mut self, row_span: usize, col_span: usize) -> Self {
        self.row_span = row_span;
        self.col_span = col_span;
        self
    }

    pub fn with_width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }
}

/// Header grid for the rendered table rooted at `table_index`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderShape {
    pub table_index: usize,
    pub cells: Vec<HeaderCell>,
}

impl HeaderShape {
    pub fn new(table_index: usize, cells: Vec<HeaderCell>) -> Self {
        Self { table_index, cells }
    }

    /// Number of header rows
    pub fn height(&self) -> usize {
        self.cells
            .iter()
            .map(|c| c.row_index.saturating_add(c.row_span))
            .max()
            .unwrap_or(0)
    }

    /// Number of grid columns
    pub fn width(&self) -> usize {
        self.cells
            .iter()
            .map(|c| c.column_index.saturating_add(c.col_span))
            .max()
            .unwrap_or(0)
    }

    /// Cells starting on header row `row`, left to right
    pub fn row(&self, row: usize) -> Vec<&HeaderCell> {
        let mut cells: Vec<_> = self.cells.iter().filter(|c| c.row_index == row).collect();
        cells.sort_by_key(|c| c.column_index);
        cells
    }

    /// Check spans, overlap and full coverage of the grid
    ///
    /// # Errors
    ///
    /// `InvalidHeaderShape` naming `table` on the first violation.
    pub fn validate_grid(&self, table: &str) -> Result<(), DiffError> {
        let invalid = |reason: String| DiffError::InvalidHeaderShape {
            table: table.to_string(),
            reason,
        };

        if self.cells.is_empty() {
            return Err(invalid("no header cells".to_string()));
        }

        for cell in &self.cells {
            if cell.row_span == 0 || cell.col_span == 0 {
                return Err(invalid(format!("cell '{}' has a zero span", cell.label)));
            }
            if cell.row_index.checked_add(cell.row_span).is_none()
                || cell.column_index.checked_add(cell.col_span).is_none()
            {
                return Err(invalid(format!("cell '{}' extends past the grid", cell.label)));
            }
        }

        let (height, width) = (self.height(), self.width());
        let slots = height
            .checked_mul(width)
            .filter(|&n| n <= MAX_HEADER_SLOTS)
            .ok_or_else(|| {
                invalid(format!(
                    "{}x{} grid exceeds {} slots",
                    height, width, MAX_HEADER_SLOTS
                ))
            })?;
        let mut grid = vec![false; slots];
        for cell in &self.cells {
            for r in cell.row_index..cell.row_index + cell.row_span {
                for c in cell.column_index..cell.column_index + cell.col_span {
                    let slot = &mut grid[r * width + c];
                    if *slot {
                        return Err(invalid(format!(
                            "cell '{}' overlaps slot ({}, {})",
                            cell.label, r, c
                        )));
                    }
                    *slot = true;
                }
            }
        }

        if let Some(gap) = grid.iter().position(|covered| !covered) {
            return Err(invalid(format!(
                "slot ({}, {}) is not covered",
                gap / width,
                gap % width
            )));
        }
        Ok(())
    }

    /// [`validate_grid`](Self::validate_grid) plus a width check against the
    /// visible column count
    ///
    /// # Errors
    ///
    /// `InvalidHeaderShape` when the grid is malformed or its width differs.
    pub fn validate(&self, table: &str, visible_columns: usize) -> Result<(), DiffError> {
        self.validate_grid(table)?;
        if self.width() != visible_columns {
            return Err(DiffError::InvalidHeaderShape {
                table: table.to_string(),
                reason: format!(
                    "header spans {} columns, table renders {}",
                    self.width(),
                    visible_columns
                ),
            });
        }
        Ok(())
    }
}
