use confdiff_core_types::ReportId;
use thiserror::Error;

/// Result type alias using DiffError
pub type Result<T> = std::result::Result<T, DiffError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and log filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Snapshot construction
    /// Table declarations are malformed (duplicate names, empty key)
    InvalidSchema,
    DuplicateKey,
    InvalidRow,
    UnknownTable,
    UnknownColumn,
    InvalidRelation,
    RelationCycle,

    // Reconciliation
    /// Pilot and Production disagree on tables, columns, keys or relations
    ShapeMismatch,

    // Print model
    InvalidPrintModel,
    InvalidHeaderShape,

    // Report assembly
    DuplicateSection,
    InvalidConfig,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidSchema => "ERR_INVALID_SCHEMA",
            ExErrorKind::DuplicateKey => "ERR_DUPLICATE_KEY",
            ExErrorKind::InvalidRow => "ERR_INVALID_ROW",
            ExErrorKind::UnknownTable => "ERR_UNKNOWN_TABLE",
            ExErrorKind::UnknownColumn => "ERR_UNKNOWN_COLUMN",
            ExErrorKind::InvalidRelation => "ERR_INVALID_RELATION",
            ExErrorKind::RelationCycle => "ERR_RELATION_CYCLE",
            ExErrorKind::ShapeMismatch => "ERR_SHAPE_MISMATCH",
            ExErrorKind::InvalidPrintModel => "ERR_INVALID_PRINT_MODEL",
            ExErrorKind::InvalidHeaderShape => "ERR_INVALID_HEADER_SHAPE",
            ExErrorKind::DuplicateSection => "ERR_DUPLICATE_SECTION",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus the report
/// coordinates (section, table, column) where the failure happened.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    section: Option<String>,
    table: Option<String>,
    column: Option<String>,
    report_id: Option<ReportId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            section: None,
            table: None,
            column: None,
            report_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add report section context
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Add table context
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Add column context
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Add report run context
    pub fn with_report_id(mut self, report_id: ReportId) -> Self {
        self.report_id = Some(report_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the section context, if any
    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    /// Get the table context, if any
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Get the column context, if any
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    /// Get the report run context, if any
    pub fn report_id(&self) -> Option<&ReportId> {
        self.report_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(section) = &self.section {
            write!(f, " (section: {})", section)?;
        }
        if let Some(table) = &self.table {
            write!(f, " (table: {})", table)?;
        }
        if let Some(column) = &self.column {
            write!(f, " (column: {})", column)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for snapshot construction, reconciliation and rendering
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiffError {
    // ===== Snapshot Construction =====
    /// Two tables in one snapshot share a name
    #[error("Duplicate table: {table}")]
    DuplicateTable { table: String },

    /// Two columns in one table share a name
    #[error("Duplicate column {column} in table {table}")]
    DuplicateColumn { table: String, column: String },

    /// Table declares no primary key columns
    #[error("Table {table} declares no primary key")]
    EmptyPrimaryKey { table: String },

    /// Primary key tuple appears twice on one side
    #[error("Duplicate primary key {key} in table {table}")]
    DuplicateKey { table: String, key: String },

    /// Row has the wrong number of cells
    #[error("Row in table {table} has {actual} cells, expected {expected}")]
    RowArity {
        table: String,
        expected: usize,
        actual: usize,
    },

    /// Cell value does not match the column's declared type
    #[error("Column {column} in table {table} expects {expected}, got {actual}")]
    CellType {
        table: String,
        column: String,
        expected: String,
        actual: String,
    },

    /// Referenced table does not exist
    #[error("Unknown table: {table}")]
    UnknownTable { table: String },

    /// Referenced column does not exist
    #[error("Unknown column {column} in table {table}")]
    UnknownColumn { table: String, column: String },

    /// Relation is malformed
    #[error("Invalid relation {relation}: {reason}")]
    InvalidRelation { relation: String, reason: String },

    /// Relations form a cycle through the named table
    #[error("Relation cycle detected involving table {table}")]
    RelationCycle { table: String },

    // ===== Reconciliation =====
    /// Pilot and Production snapshots are not the same shape
    #[error("Shape mismatch in table {table}: {reason}")]
    ShapeMismatch { table: String, reason: String },

    // ===== Print Model =====
    /// Directive table does not cover the diffed tables exactly once
    #[error("Invalid print model: {reason}")]
    InvalidPrintModel { reason: String },

    /// Header shape cannot be laid out over the rendered columns
    #[error("Invalid header shape for table {table}: {reason}")]
    InvalidHeaderShape { table: String, reason: String },

    // ===== Report Assembly =====
    /// Section name reused within one report
    #[error("Duplicate section: {section}")]
    DuplicateSection { section: String },

    /// Report configuration cannot be used
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // ===== Generic Errors =====
    /// I/O failure while writing report output
    #[error("I/O error during {op}: {message}")]
    Io { op: String, message: String },

    /// Serialization error (JSON/TOML encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Wrap an I/O error with the operation that produced it
pub fn io_error(op: &str, err: std::io::Error) -> DiffError {
    DiffError::Io {
        op: op.to_string(),
        message: err.to_string(),
    }
}

/// Conversion from DiffError to ExError
impl From<DiffError> for ExError {
    fn from(err: DiffError) -> Self {
        let message = err.to_string();
        match err {
            DiffError::DuplicateTable { table } => ExError::new(ExErrorKind::InvalidSchema)
                .with_table(table)
                .with_message(message),

            DiffError::DuplicateColumn { table, column } => {
                ExError::new(ExErrorKind::InvalidSchema)
                    .with_table(table)
                    .with_column(column)
                    .with_message(message)
            }

            DiffError::EmptyPrimaryKey { table } => ExError::new(ExErrorKind::InvalidSchema)
                .with_table(table)
                .with_message(message),

            DiffError::DuplicateKey { table, .. } => ExError::new(ExErrorKind::DuplicateKey)
                .with_table(table)
                .with_message(message),

            DiffError::RowArity { table, .. } => ExError::new(ExErrorKind::InvalidRow)
                .with_table(table)
                .with_message(message),

            DiffError::CellType { table, column, .. } => ExError::new(ExErrorKind::InvalidRow)
                .with_table(table)
                .with_column(column)
                .with_message(message),

            DiffError::UnknownTable { table } => ExError::new(ExErrorKind::UnknownTable)
                .with_table(table)
                .with_message(message),

            DiffError::UnknownColumn { table, column } => {
                ExError::new(ExErrorKind::UnknownColumn)
                    .with_table(table)
                    .with_column(column)
                    .with_message(message)
            }

            DiffError::InvalidRelation { .. } => {
                ExError::new(ExErrorKind::InvalidRelation).with_message(message)
            }

            DiffError::RelationCycle { table } => ExError::new(ExErrorKind::RelationCycle)
                .with_table(table)
                .with_message(message),

            DiffError::ShapeMismatch { table, .. } => ExError::new(ExErrorKind::ShapeMismatch)
                .with_table(table)
                .with_message(message),

            DiffError::InvalidPrintModel { .. } => {
                ExError::new(ExErrorKind::InvalidPrintModel).with_message(message)
            }

            DiffError::InvalidHeaderShape { table, .. } => {
                ExError::new(ExErrorKind::InvalidHeaderShape)
                    .with_table(table)
                    .with_message(message)
            }

            DiffError::DuplicateSection { section } => {
                ExError::new(ExErrorKind::DuplicateSection)
                    .with_section(section)
                    .with_message(message)
            }

            DiffError::InvalidConfig { .. } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(message)
            }

            DiffError::Io { op, .. } => ExError::new(ExErrorKind::Io)
                .with_op(op)
                .with_message(message),

            DiffError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            DiffError::Internal { .. } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for DiffError {
    fn from(err: serde_json::Error) -> Self {
        DiffError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for DiffError {
    fn from(err: toml::de::Error) -> Self {
        DiffError::InvalidConfig {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code_and_coordinates() {
        let err = ExError::new(ExErrorKind::ShapeMismatch)
            .with_op("reconcile")
            .with_section("run_profiles")
            .with_table("steps")
            .with_message("column count differs");

        let text = err.to_string();
        assert!(text.starts_with("[ERR_SHAPE_MISMATCH]"));
        assert!(text.contains("in operation 'reconcile'"));
        assert!(text.contains("(section: run_profiles)"));
        assert!(text.contains("(table: steps)"));
    }

    #[test]
    fn test_source_chain_is_exposed() {
        let inner = ExError::new(ExErrorKind::Io).with_message("disk full");
        let outer = ExError::new(ExErrorKind::Internal).with_source(inner);

        assert_eq!(
            outer.source_error().map(ExError::kind),
            Some(ExErrorKind::Io)
        );
        assert!(std::error::Error::source(&outer).is_some());
    }

    #[test]
    fn test_io_error_keeps_op() {
        let err = io_error(
            "write_body",
            std::io::Error::new(std::io::ErrorKind::Other, "boom"),
        );
        let ex: ExError = err.into();
        assert_eq!(ex.kind(), ExErrorKind::Io);
        assert_eq!(ex.op(), Some("write_body"));
    }
}
