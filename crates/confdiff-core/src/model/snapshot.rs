//! Snapshots: tables plus the relations between them.

use crate::errors::{DiffError, Result};
use crate::model::relation::{Relation, ResolvedRelation};
use crate::model::table::Table;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// One side (Pilot or Production) of a report section
///
/// Relations are stored both as declared and resolved to indices. Tables are
/// addressed by position; `dependency_order` lists table indices with every
/// parent before its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SnapshotRepr", into = "SnapshotRepr")]
pub struct Snapshot {
    tables: Vec<Table>,
    relations: Vec<Relation>,
    resolved: Vec<ResolvedRelation>,
    dependency_order: Vec<usize>,
}

#[derive(Serialize, Deserialize)]
struct SnapshotRepr {
    tables: Vec<Table>,
    #[serde(default)]
    relations: Vec<Relation>,
}

impl TryFrom<SnapshotRepr> for Snapshot {
    type Error = DiffError;

    fn try_from(repr: SnapshotRepr) -> Result<Self> {
        build_snapshot(repr.tables, repr.relations)
    }
}

impl From<Snapshot> for SnapshotRepr {
    fn from(snapshot: Snapshot) -> Self {
        SnapshotRepr {
            tables: snapshot.tables,
            relations: snapshot.relations,
        }
    }
}

/// Assemble a snapshot, resolving and checking its relations
///
/// # Errors
///
/// - `DuplicateTable` : two tables share a name
/// - `UnknownTable` / `UnknownColumn` : a relation names something that does not exist
/// - `InvalidRelation` : arity differs, or parent columns are not the parent's primary key
/// - `RelationCycle` : relations do not form a DAG
pub fn build_snapshot(tables: Vec<Table>, relations: Vec<Relation>) -> Result<Snapshot> {
    let mut by_name: HashMap<&str, usize> = HashMap::with_capacity(tables.len());
    for (i, table) in tables.iter().enumerate() {
        if by_name.insert(table.name(), i).is_some() {
            return Err(DiffError::DuplicateTable {
                table: table.name().to_string(),
            });
        }
    }

    let resolved = relations
        .iter()
        .map(|r| resolve_relation(r, &tables, &by_name))
        .collect::<Result<Vec<_>>>()?;

    let dependency_order = dependency_order(&tables, &resolved)?;

    Ok(Snapshot {
        tables,
        relations,
        resolved,
        dependency_order,
    })
}

fn resolve_relation(
    relation: &Relation,
    tables: &[Table],
    by_name: &HashMap<&str, usize>,
) -> Result<ResolvedRelation> {
    let lookup = |name: &str| {
        by_name
            .get(name)
            .copied()
            .ok_or_else(|| DiffError::UnknownTable {
                table: name.to_string(),
            })
    };
    let parent = lookup(&relation.parent_table)?;
    let child = lookup(&relation.child_table)?;

    let invalid = |reason: &str| DiffError::InvalidRelation {
        relation: relation.name.clone(),
        reason: reason.to_string(),
    };

    if relation.parent_columns.len() != relation.child_columns.len() {
        return Err(invalid("parent and child column counts differ"));
    }

    let parent_table = &tables[parent];
    let child_table = &tables[child];

    let column_of = |table: &Table, name: &str| {
        table
            .column_index(name)
            .ok_or_else(|| DiffError::UnknownColumn {
                table: table.name().to_string(),
                column: name.to_string(),
            })
    };

    let mut pairs = Vec::with_capacity(relation.parent_columns.len());
    for (p, c) in relation
        .parent_columns
        .iter()
        .zip(relation.child_columns.iter())
    {
        pairs.push((column_of(parent_table, p)?, column_of(child_table, c)?));
    }

    let declared: HashSet<usize> = pairs.iter().map(|(p, _)| *p).collect();
    let key: HashSet<usize> = parent_table.primary_key().iter().copied().collect();
    if declared != key || pairs.len() != key.len() {
        return Err(invalid("parent columns must be the parent's primary key"));
    }

    let child_key = parent_table
        .primary_key()
        .iter()
        .map(|k| {
            pairs
                .iter()
                .find(|(p, _)| p == k)
                .map(|(_, c)| *c)
                .ok_or_else(|| invalid("parent key column not mapped"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ResolvedRelation {
        parent,
        child,
        child_key,
    })
}

/// Kahn's algorithm over the relation graph, ties broken by declaration order
fn dependency_order(tables: &[Table], relations: &[ResolvedRelation]) -> Result<Vec<usize>> {
    let mut indegree = vec![0usize; tables.len()];
    for r in relations {
        indegree[r.child] += 1;
    }

    let mut ready: VecDeque<usize> = (0..tables.len()).filter(|&i| indegree[i] == 0).collect();
    let mut order = Vec::with_capacity(tables.len());
    while let Some(table) = ready.pop_front() {
        order.push(table);
        for r in relations.iter().filter(|r| r.parent == table) {
            indegree[r.child] -= 1;
            if indegree[r.child] == 0 {
                ready.push_back(r.child);
            }
        }
    }

    if order.len() != tables.len() {
        let stuck = (0..tables.len())
            .find(|i| !order.contains(i))
            .map(|i| tables[i].name().to_string())
            .unwrap_or_default();
        return Err(DiffError::RelationCycle { table: stuck });
    }
    Ok(order)
}

impl Snapshot {
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name() == name)
    }

    pub fn table_index(&self, name: &str) -> Option<usize> {
        self.tables.iter().position(|t| t.name() == name)
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn resolved_relations(&self) -> &[ResolvedRelation] {
        &self.resolved
    }

    /// Table indices, parents before children
    pub fn dependency_order(&self) -> &[usize] {
        &self.dependency_order
    }

    /// Empty copy with the same shape (tables with no rows)
    pub fn empty_like(&self) -> Result<Snapshot> {
        let tables = self
            .tables
            .iter()
            .map(|t| {
                let key: Vec<&str> = t
                    .primary_key()
                    .iter()
                    .map(|&i| t.columns()[i].name.as_str())
                    .collect();
                Table::from_parts(t.name(), t.columns().to_vec(), &key, Vec::new())
            })
            .collect::<Result<Vec<_>>>()?;
        build_snapshot(tables, self.relations.clone())
    }
}
