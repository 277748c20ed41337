//! Declarative print/layout model.
//!
//! A [`PrintModel`] holds one [`PrintDirective`] per column of every diffed
//! table, plus optional [`HeaderShape`]s. It is rendering metadata, except
//! for `change_ignored`, which feeds [`ReconcileOptions`].

pub mod directive;
pub mod header;

pub use directive::PrintDirective;
pub use header::{HeaderCell, HeaderShape};

use crate::diff::ReconcileOptions;
use crate::errors::DiffError;
use crate::model::Snapshot;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintModel {
    #[serde(default)]
    directives: Vec<PrintDirective>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    header_shapes: Vec<HeaderShape>,
}

impl PrintModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// One visible, unordered directive per column of `snapshot`
    pub fn defaults_for(snapshot: &Snapshot) -> Self {
        let directives = snapshot
            .tables()
            .iter()
            .enumerate()
            .flat_map(|(t, table)| {
                (0..table.columns().len()).map(move |c| PrintDirective::new(t, c))
            })
            .collect();
        Self {
            directives,
            header_shapes: Vec::new(),
        }
    }

    pub fn directives(&self) -> &[PrintDirective] {
        &self.directives
    }

    pub fn directive(&self, table: usize, column: usize) -> Option<&PrintDirective> {
        self.directives
            .iter()
            .find(|d| d.position() == (table, column))
    }

    /// Directive for `(table, column)`, inserted with defaults if missing
    pub fn entry(&mut self, table: usize, column: usize) -> &mut PrintDirective {
        let index = match self
            .directives
            .iter()
            .position(|d| d.position() == (table, column))
        {
            Some(i) => i,
            None => {
                self.directives.push(PrintDirective::new(table, column));
                self.directives.len() - 1
            }
        };
        &mut self.directives[index]
    }

    pub fn hide(&mut self, table: usize, column: usize) -> &mut Self {
        self.entry(table, column).hidden = true;
        self
    }

    pub fn sort_by(&mut self, table: usize, column: usize, order: u32) -> &mut Self {
        self.entry(table, column).sort_order = Some(order);
        self
    }

    pub fn ignore_changes(&mut self, table: usize, column: usize) -> &mut Self {
        self.entry(table, column).change_ignored = true;
        self
    }

    /// Make `column` an anchor target keyed by the value in `identifier_column`
    pub fn bookmark(&mut self, table: usize, column: usize, identifier_column: usize) -> &mut Self {
        self.entry(table, column).bookmark_index = Some(identifier_column);
        self
    }

    /// Make `column` a link to the anchor keyed by the value in `identifier_column`
    pub fn jump_to(&mut self, table: usize, column: usize, identifier_column: usize) -> &mut Self {
        self.entry(table, column).jump_to_bookmark_index = Some(identifier_column);
        self
    }

    pub fn label(&mut self, table: usize, column: usize, label: impl Into<String>) -> &mut Self {
        self.entry(table, column).label = Some(label.into());
        self
    }

    pub fn is_hidden(&self, table: usize, column: usize) -> bool {
        self.directive(table, column).is_some_and(|d| d.hidden)
    }

    /// Columns of `table` carrying a sort order, highest priority first
    ///
    /// Equal orders keep column order.
    pub fn sort_keys(&self, table: usize) -> Vec<usize> {
        let mut keys: Vec<(u32, usize)> = self
            .directives
            .iter()
            .filter(|d| d.table_index == table)
            .filter_map(|d| d.sort_order.map(|o| (o, d.column_index)))
            .collect();
        keys.sort();
        keys.into_iter().map(|(_, c)| c).collect()
    }

    pub fn header_shapes(&self) -> &[HeaderShape] {
        &self.header_shapes
    }

    pub fn header_shape(&self, table: usize) -> Option<&HeaderShape> {
        self.header_shapes.iter().find(|s| s.table_index == table)
    }

    /// Add or replace the header shape of `shape.table_index`
    pub fn set_header_shape(&mut self, shape: HeaderShape) -> &mut Self {
        self.header_shapes
            .retain(|s| s.table_index != shape.table_index);
        self.header_shapes.push(shape);
        self
    }

    /// The `change_ignored` columns as reconciler input
    pub fn reconcile_options(&self) -> ReconcileOptions {
        self.directives
            .iter()
            .filter(|d| d.change_ignored)
            .fold(ReconcileOptions::new(), |opts, d| {
                opts.ignore(d.table_index, d.column_index)
            })
    }

    /// Check that every column of `snapshot` has exactly one in-range directive
    ///
    /// Header shapes are checked for grid consistency here; their width is
    /// checked by the renderer, which knows the flattened column count.
    ///
    /// # Errors
    ///
    /// - `InvalidPrintModel` for missing, duplicate or out-of-range directives
    /// - `InvalidHeaderShape` for a malformed header grid
    pub fn validate(&self, snapshot: &Snapshot) -> Result<(), DiffError> {
        let invalid = |reason: String| DiffError::InvalidPrintModel { reason };
        let tables = snapshot.tables();

        let mut seen = HashSet::with_capacity(self.directives.len());
        for d in &self.directives {
            let table = tables.get(d.table_index).ok_or_else(|| {
                invalid(format!("directive references table {}", d.table_index))
            })?;
            let width = table.columns().len();
            if d.column_index >= width {
                return Err(invalid(format!(
                    "directive references column {} of table {}",
                    d.column_index,
                    table.name()
                )));
            }
            for (what, target) in [
                ("bookmark", d.bookmark_index),
                ("jump", d.jump_to_bookmark_index),
            ] {
                if let Some(target) = target.filter(|&t| t >= width) {
                    return Err(invalid(format!(
                        "{} index {} is past the columns of table {}",
                        what,
                        target,
                        table.name()
                    )));
                }
            }
            if !seen.insert(d.position()) {
                return Err(invalid(format!(
                    "duplicate directive for column {} of table {}",
                    d.column_index,
                    table.name()
                )));
            }
        }

        for (t, table) in tables.iter().enumerate() {
            for c in 0..table.columns().len() {
                if !seen.contains(&(t, c)) {
                    return Err(invalid(format!(
                        "column {} of table {} has no directive",
                        table.columns()[c].name,
                        table.name()
                    )));
                }
            }
        }

        for shape in &self.header_shapes {
            let table = tables.get(shape.table_index).ok_or_else(|| {
                invalid(format!("header shape references table {}", shape.table_index))
            })?;
            shape.validate_grid(table.name())?;
        }

        Ok(())
    }
}
