//! Relational diff reconciler.
//!
//! Merges a Pilot and a Production snapshot of identical shape into one
//! [`Diffgram`] in which every row carries a [`ChangeStatus`].
//!
//! ## Entry point
//!
//! ```
//! use confdiff_core::diff::{reconcile, ChangeStatus};
//! use confdiff_core::model::{build_snapshot, Column, TableBuilder};
//!
//! let table = |rows: &[(&str, i64)]| {
//!     let mut b = TableBuilder::new("settings")
//!         .column(Column::text("Name"))
//!         .column(Column::integer("Value"))
//!         .primary_key(["Name"]);
//!     for (n, v) in rows {
//!         b.push_row(vec![(*n).into(), (*v).into()]);
//!     }
//!     build_snapshot(vec![b.build().unwrap()], vec![]).unwrap()
//! };
//!
//! let diffgram = reconcile(&table(&[("A", 1)]), &table(&[])).unwrap();
//! assert_eq!(diffgram.tables()[0].rows[0].status, ChangeStatus::Added);
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: row order is Pilot order, then Production-only rows.
//! - **Referential integrity**: a child row survives only under a surviving parent.
//! - **Null equals empty**: `Null` and `""` never register as a change.

pub mod engine;
pub mod human_summary;
pub mod index;
pub mod model;

pub use engine::{check_shape, reconcile, reconcile_with, ReconcileOptions};
pub use human_summary::render_human_summary;
pub use index::RelationIndex;
pub use model::{ChangeStatus, DiffRow, DiffSummary, DiffTable, Diffgram};
