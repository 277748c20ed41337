//! Per-column print directives.

use serde::{Deserialize, Deserializer, Serialize};

/// Rendering control record for one `(table_index, column_index)`
///
/// `bookmark_index` and `jump_to_bookmark_index` name a column of the same
/// table whose value is the bookmark identifier. A bookmark turns this
/// column's cell into an anchor target; a jump turns it into a link to the
/// matching anchor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintDirective {
    pub table_index: usize,
    pub column_index: usize,
    #[serde(default)]
    pub hidden: bool,
    /// Lower sorts first; `None` (`-1` on the wire) leaves the column out of
    /// the sort
    #[serde(
        default,
        deserialize_with = "absent_if_negative",
        skip_serializing_if = "Option::is_none"
    )]
    pub sort_order: Option<u32>,
    #[serde(
        default,
        deserialize_with = "absent_if_negative",
        skip_serializing_if = "Option::is_none"
    )]
    pub bookmark_index: Option<usize>,
    #[serde(
        default,
        deserialize_with = "absent_if_negative",
        skip_serializing_if = "Option::is_none"
    )]
    pub jump_to_bookmark_index: Option<usize>,
    /// Shown, but excluded from change detection
    #[serde(default)]
    pub change_ignored: bool,
    /// Header label; the column name when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl PrintDirective {
    /// Visible, unordered, unlinked
    pub fn new(table_index: usize, column_index: usize) -> Self {
        Self {
            table_index,
            column_index,
            ..Self::default()
        }
    }

    pub fn position(&self) -> (usize, usize) {
        (self.table_index, self.column_index)
    }
}

/// `-1` (or any negative number) and `null` both mean "not set"
fn absent_if_negative<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
    T::Error: std::fmt::Display,
{
    match Option::<i64>::deserialize(deserializer)? {
        Some(value) if value >= 0 => T::try_from(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}
