pub mod relation;
pub mod snapshot;
pub mod table;
pub mod value;

pub use relation::{Relation, ResolvedRelation};
pub use snapshot::{build_snapshot, Snapshot};
pub use table::{Column, KeyTuple, Row, Table, TableBuilder};
pub use value::{CellValue, ValueType};
