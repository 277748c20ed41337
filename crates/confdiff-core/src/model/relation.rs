//! Parent→child links between tables of one snapshot.

use serde::{Deserialize, Serialize};

/// Declared relation, by table and column names
///
/// `parent_columns` must be exactly the parent table's primary key (in any
/// order); `child_columns[i]` holds the value of `parent_columns[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub name: String,
    pub parent_table: String,
    pub parent_columns: Vec<String>,
    pub child_table: String,
    pub child_columns: Vec<String>,
}

impl Relation {
    pub fn new<P, C>(
        name: impl Into<String>,
        parent_table: impl Into<String>,
        parent_columns: P,
        child_table: impl Into<String>,
        child_columns: C,
    ) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            name: name.into(),
            parent_table: parent_table.into(),
            parent_columns: parent_columns.into_iter().map(Into::into).collect(),
            child_table: child_table.into(),
            child_columns: child_columns.into_iter().map(Into::into).collect(),
        }
    }
}

/// Relation resolved to table and column indices
///
/// `child_key` is aligned with the parent's primary key order, so projecting
/// a child row onto it yields a tuple directly comparable with parent keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRelation {
    pub parent: usize,
    pub child: usize,
    pub child_key: Vec<usize>,
}
