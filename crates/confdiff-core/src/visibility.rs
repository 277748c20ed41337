//! Row visibility annotation.
//!
//! In [`ReportMode::Collapsible`] a render group (a root row and all of its
//! relation descendants) collapses only when no row in it has changed, so
//! merged parent cells never lose the rows beneath them.

use crate::diff::index::{child_relations, parent_relations};
use crate::diff::{Diffgram, RelationIndex};
use crate::errors::DiffError;
use serde::{Deserialize, Serialize};

/// How unchanged rows are presented
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportMode {
    /// Every row is rendered plainly
    AlwaysShow,
    /// Unchanged groups carry a client-side toggle token
    #[default]
    Collapsible,
}

impl ReportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportMode::AlwaysShow => "always-show",
            ReportMode::Collapsible => "collapsible",
        }
    }
}

impl std::fmt::Display for ReportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReportMode {
    type Err = DiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always-show" => Ok(ReportMode::AlwaysShow),
            "collapsible" => Ok(ReportMode::Collapsible),
            other => Err(DiffError::InvalidConfig {
                reason: format!(
                    "unknown report mode '{}' (expected always-show or collapsible)",
                    other
                ),
            }),
        }
    }
}

/// Render token of one row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Shown,
    Collapsible,
}

impl Visibility {
    /// CSS class token; empty for shown rows
    pub fn token(&self) -> &'static str {
        match self {
            Visibility::Shown => "",
            Visibility::Collapsible => "collapsible",
        }
    }
}

/// Visibility of every row of a Diffgram, by table and row position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowVisibility {
    tables: Vec<Vec<Visibility>>,
}

impl RowVisibility {
    pub fn get(&self, table: usize, row: usize) -> Visibility {
        self.tables
            .get(table)
            .and_then(|rows| rows.get(row))
            .copied()
            .unwrap_or(Visibility::Shown)
    }

    pub fn collapsed_count(&self) -> usize {
        self.tables
            .iter()
            .flatten()
            .filter(|v| **v == Visibility::Collapsible)
            .count()
    }
}

/// Annotate every row of `diffgram` for `mode`
pub fn annotate(diffgram: &Diffgram, index: &RelationIndex, mode: ReportMode) -> RowVisibility {
    let tables = diffgram.tables();
    if mode == ReportMode::AlwaysShow {
        return RowVisibility {
            tables: tables
                .iter()
                .map(|t| vec![Visibility::Shown; t.rows.len()])
                .collect(),
        };
    }

    // Bottom-up: does the row or anything beneath it carry a change?
    let mut subtree_changed: Vec<Vec<bool>> = tables
        .iter()
        .map(|t| t.rows.iter().map(|r| r.status.is_change()).collect())
        .collect();
    for &t in diffgram.dependency_order().iter().rev() {
        for relation in child_relations(diffgram, t) {
            let child = diffgram.resolved_relations()[relation].child;
            for row in 0..tables[t].rows.len() {
                let changed = index
                    .children(relation, row)
                    .iter()
                    .any(|&c| subtree_changed[child][c]);
                if changed {
                    subtree_changed[t][row] = true;
                }
            }
        }
    }

    // Top-down: a row belongs to its root's group.
    let mut group_changed = subtree_changed.clone();
    for &t in diffgram.dependency_order() {
        let parents = parent_relations(diffgram, t);
        if parents.is_empty() {
            continue;
        }
        for row in 0..tables[t].rows.len() {
            let mut linked = false;
            let mut changed = false;
            for &relation in &parents {
                let parent = diffgram.resolved_relations()[relation].parent;
                if let Some(p) = index.parent_of(relation, row) {
                    linked = true;
                    changed |= group_changed[parent][p];
                }
            }
            if linked {
                group_changed[t][row] = changed;
            }
        }
    }

    RowVisibility {
        tables: group_changed
            .into_iter()
            .map(|rows| {
                rows.into_iter()
                    .map(|changed| {
                        if changed {
                            Visibility::Shown
                        } else {
                            Visibility::Collapsible
                        }
                    })
                    .collect()
            })
            .collect(),
    }
}
