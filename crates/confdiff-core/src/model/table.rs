//! Tables, columns and rows.
//!
//! A [`Table`] is validated once, when it is built, and is immutable
//! afterwards. Both construction paths (the [`TableBuilder`] and serde
//! deserialization) go through [`Table::from_parts`].

use crate::errors::{DiffError, Result};
use crate::model::value::{CellValue, ValueType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Column definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
}

impl Column {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, ValueType::Text)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, ValueType::Integer)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ValueType::Boolean)
    }
}

/// Ordered tuple of cells, one per column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(Vec<CellValue>);

impl Row {
    pub fn new(values: Vec<CellValue>) -> Self {
        Self(values)
    }

    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.0.get(index)
    }

    pub fn values(&self) -> &[CellValue] {
        &self.0
    }

    pub fn into_values(self) -> Vec<CellValue> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Normalized key tuple used for joins and relation lookups
///
/// Built from display strings so that `Null` and `""` collide, matching the
/// equality rule used by the reconciler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyTuple(Vec<String>);

impl KeyTuple {
    /// Project `values` onto `columns`
    pub fn project(values: &[CellValue], columns: &[usize]) -> Self {
        Self(
            columns
                .iter()
                .map(|&i| {
                    values
                        .get(i)
                        .map(|v| v.display().into_owned())
                        .unwrap_or_default()
                })
                .collect(),
        )
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }
}

impl std::fmt::Display for KeyTuple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}

/// A named, typed table with a declared primary key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableRepr", into = "TableRepr")]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    primary_key: Vec<usize>,
    rows: Vec<Row>,
}

/// Wire form of a table: key columns by name, rows as plain arrays
#[derive(Serialize, Deserialize)]
struct TableRepr {
    name: String,
    columns: Vec<Column>,
    primary_key: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<CellValue>>,
}

impl TryFrom<TableRepr> for Table {
    type Error = DiffError;

    fn try_from(repr: TableRepr) -> Result<Self> {
        let rows = repr.rows.into_iter().map(Row::new).collect();
        Table::from_parts(repr.name, repr.columns, &repr.primary_key, rows)
    }
}

impl From<Table> for TableRepr {
    fn from(table: Table) -> Self {
        let primary_key = table
            .primary_key
            .iter()
            .map(|&i| table.columns[i].name.clone())
            .collect();
        TableRepr {
            name: table.name,
            columns: table.columns,
            primary_key,
            rows: table.rows.into_iter().map(Row::into_values).collect(),
        }
    }
}

impl Table {
    /// Validate and assemble a table
    ///
    /// # Errors
    ///
    /// - `DuplicateColumn` / `EmptyPrimaryKey` / `UnknownColumn` for a bad schema
    /// - `RowArity` / `CellType` for a row that does not fit the columns
    /// - `DuplicateKey` when two rows share a primary key tuple
    pub fn from_parts<S: AsRef<str>>(
        name: impl Into<String>,
        columns: Vec<Column>,
        primary_key: &[S],
        rows: Vec<Row>,
    ) -> Result<Self> {
        let name = name.into();

        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(DiffError::DuplicateColumn {
                    table: name,
                    column: column.name.clone(),
                });
            }
        }

        if primary_key.is_empty() {
            return Err(DiffError::EmptyPrimaryKey { table: name });
        }
        let mut key_indices = Vec::with_capacity(primary_key.len());
        for key in primary_key {
            let key = key.as_ref();
            let index = columns
                .iter()
                .position(|c| c.name == key)
                .ok_or_else(|| DiffError::UnknownColumn {
                    table: name.clone(),
                    column: key.to_string(),
                })?;
            if key_indices.contains(&index) {
                return Err(DiffError::DuplicateColumn {
                    table: name,
                    column: key.to_string(),
                });
            }
            key_indices.push(index);
        }

        let mut keys = HashSet::with_capacity(rows.len());
        for row in &rows {
            if row.len() != columns.len() {
                return Err(DiffError::RowArity {
                    table: name,
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
            for (column, value) in columns.iter().zip(row.values()) {
                if !value.fits(column.value_type) {
                    return Err(DiffError::CellType {
                        table: name,
                        column: column.name.clone(),
                        expected: column.value_type.to_string(),
                        actual: value
                            .value_type()
                            .map(|t| t.to_string())
                            .unwrap_or_else(|| "null".to_string()),
                    });
                }
            }
            let key = KeyTuple::project(row.values(), &key_indices);
            if !keys.insert(key.clone()) {
                return Err(DiffError::DuplicateKey {
                    table: name,
                    key: key.to_string(),
                });
            }
        }

        Ok(Self {
            name,
            columns,
            primary_key: key_indices,
            rows,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Primary key column indices, in declaration order
    pub fn primary_key(&self) -> &[usize] {
        &self.primary_key
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Cell of `row` addressed by column name
    pub fn value<'a>(&self, row: &'a Row, column: &str) -> Option<&'a CellValue> {
        self.column_index(column).and_then(|i| row.get(i))
    }

    /// Normalized primary key of `row`
    pub fn key_of(&self, row: &Row) -> KeyTuple {
        KeyTuple::project(row.values(), &self.primary_key)
    }

    pub fn is_key_column(&self, index: usize) -> bool {
        self.primary_key.contains(&index)
    }
}

/// Incremental table construction
///
/// Errors are deferred to [`TableBuilder::build`], so producers can push rows
/// without handling a `Result` per row.
///
/// ```
/// use confdiff_core::model::{Column, TableBuilder};
///
/// let table = TableBuilder::new("connectors")
///     .column(Column::text("Name"))
///     .column(Column::integer("Precedence"))
///     .primary_key(["Name"])
///     .row(vec!["AD".into(), 1i64.into()])
///     .build()
///     .unwrap();
/// assert_eq!(table.rows().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct TableBuilder {
    name: String,
    columns: Vec<Column>,
    primary_key: Vec<String>,
    rows: Vec<Row>,
}

impl TableBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_key: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn primary_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn row(mut self, values: Vec<CellValue>) -> Self {
        self.rows.push(Row::new(values));
        self
    }

    pub fn push_row(&mut self, values: Vec<CellValue>) {
        self.rows.push(Row::new(values));
    }

    pub fn build(self) -> Result<Table> {
        Table::from_parts(self.name, self.columns, &self.primary_key, self.rows)
    }
}
