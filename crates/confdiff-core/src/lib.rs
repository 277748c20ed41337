//! confdiff Core - relational diff and change-report engine
//!
//! This crate compares a Pilot and a Production snapshot of a deployment
//! configuration and renders the differences as an HTML change report:
//! - Typed tables with primary keys and parent→child relations (`model`)
//! - Outer-join reconciliation into a Diffgram with per-row change status (`diff`)
//! - Stable, relation-safe sorting driven by print directives (`sort`)
//! - Declarative print model with multi-row header shapes (`print_model`)
//! - Collapsible/always-show row visibility (`visibility`)
//! - Nested HTML tables with bookmarks and jump links (`render`)
//! - Per-section and report-wide contexts (`context`)
//! - Atomic two-stream report output and assembly (`report`)

pub mod context;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod print_model;
pub mod render;
pub mod report;
pub mod sort;
pub mod visibility;

// Logging macros reach the schema constants through this path.
pub use confdiff_core_types;

// Re-export commonly used types
pub use context::{ReportContext, SectionContext, SectionOutcome};
pub use diff::{reconcile, reconcile_with, ChangeStatus, DiffRow, DiffTable, Diffgram};
pub use errors::{DiffError, ExError, ExErrorKind, Result};
pub use model::{build_snapshot, CellValue, Column, Relation, Snapshot, Table, TableBuilder};
pub use print_model::{HeaderCell, HeaderShape, PrintDirective, PrintModel};
pub use render::{render, RenderedSection, RenderedTable, TocEntry};
pub use report::{generate_report, ReportConfig, ReportOutcome};
pub use sort::sort;
pub use visibility::ReportMode;
