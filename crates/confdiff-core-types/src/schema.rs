//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REPORT_ID: &str = "report_id";

// Report structure
pub const FIELD_SECTION: &str = "section";
pub const FIELD_TABLE: &str = "table";

// Row counts
pub const FIELD_ROWS_ADDED: &str = "rows_added";
pub const FIELD_ROWS_DELETED: &str = "rows_deleted";
pub const FIELD_ROWS_MODIFIED: &str = "rows_modified";
pub const FIELD_ROWS_UNCHANGED: &str = "rows_unchanged";
pub const FIELD_ORPHANS_DROPPED: &str = "orphans_dropped";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_accessibility() {
        assert!(!FIELD_COMPONENT.is_empty());
        assert!(!FIELD_OP.is_empty());
        assert!(!FIELD_SECTION.is_empty());
        assert!(!EVENT_START.is_empty());
        assert!(!EVENT_END.is_empty());
        assert!(!EVENT_END_ERROR.is_empty());
    }

    #[test]
    fn test_event_names_are_distinct() {
        assert_ne!(EVENT_START, EVENT_END);
        assert_ne!(EVENT_START, EVENT_END_ERROR);
        assert_ne!(EVENT_END, EVENT_END_ERROR);
    }

    #[test]
    fn test_row_count_fields_are_distinct() {
        let fields = [
            FIELD_ROWS_ADDED,
            FIELD_ROWS_DELETED,
            FIELD_ROWS_MODIFIED,
            FIELD_ROWS_UNCHANGED,
        ];
        for (i, a) in fields.iter().enumerate() {
            for b in &fields[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
