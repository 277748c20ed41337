//! Typed cell values.
//!
//! Comparison follows report semantics rather than strict typing: `Null` and
//! the empty string are the same value for both equality and ordering.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;

/// Declared type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Text,
    Integer,
    Boolean,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Text => "text",
            ValueType::Integer => "integer",
            ValueType::Boolean => "boolean",
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One cell of a row
///
/// Serialized untagged, so JSON `null`, booleans, integers and strings map
/// directly onto the variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Boolean(bool),
    Integer(i64),
    Text(String),
}

impl CellValue {
    /// Type of the value, `None` for `Null`
    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            CellValue::Null => None,
            CellValue::Boolean(_) => Some(ValueType::Boolean),
            CellValue::Integer(_) => Some(ValueType::Integer),
            CellValue::Text(_) => Some(ValueType::Text),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Null or empty text
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Whether a column of type `ty` may hold this value
    pub fn fits(&self, ty: ValueType) -> bool {
        self.value_type().map_or(true, |t| t == ty)
    }

    /// Display string; `Null` renders as the empty string
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            CellValue::Null => Cow::Borrowed(""),
            CellValue::Text(s) => Cow::Borrowed(s.as_str()),
            CellValue::Integer(i) => Cow::Owned(i.to_string()),
            CellValue::Boolean(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
        }
    }

    /// Report equality: `Null` equals `""`, otherwise display strings match
    pub fn same_as(&self, other: &CellValue) -> bool {
        self.display() == other.display()
    }

    /// Ordering used by the sorter
    ///
    /// Blank values sort first. Integers compare numerically and booleans
    /// `false < true`; any other pairing falls back to display text.
    pub fn sort_cmp(&self, other: &CellValue) -> Ordering {
        match (self.is_blank(), other.is_blank()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }
        match (self, other) {
            (CellValue::Integer(a), CellValue::Integer(b)) => a.cmp(b),
            (CellValue::Boolean(a), CellValue::Boolean(b)) => a.cmp(b),
            _ => self.display().cmp(&other.display()),
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(CellValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_equals_empty_string() {
        assert!(CellValue::Null.same_as(&CellValue::from("")));
        assert!(!CellValue::Null.same_as(&CellValue::from("x")));
    }

    #[test]
    fn test_sort_cmp_blank_first_and_numeric() {
        assert_eq!(
            CellValue::Null.sort_cmp(&CellValue::Integer(-5)),
            Ordering::Less
        );
        assert_eq!(
            CellValue::Integer(9).sort_cmp(&CellValue::Integer(10)),
            Ordering::Less
        );
        assert_eq!(
            CellValue::from("9").sort_cmp(&CellValue::from("10")),
            Ordering::Greater
        );
        assert_eq!(
            CellValue::from("").sort_cmp(&CellValue::Null),
            Ordering::Equal
        );
    }

    #[test]
    fn test_untagged_json_mapping() {
        let values: Vec<CellValue> =
            serde_json::from_str(r#"[null, true, 42, "abc"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                CellValue::Null,
                CellValue::Boolean(true),
                CellValue::Integer(42),
                CellValue::from("abc"),
            ]
        );
    }

    #[test]
    fn test_null_fits_every_type() {
        assert!(CellValue::Null.fits(ValueType::Integer));
        assert!(!CellValue::from("1").fits(ValueType::Integer));
    }
}
