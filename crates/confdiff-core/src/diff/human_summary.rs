//! Human-readable summary renderer for Diffgrams.

use crate::diff::model::{ChangeStatus, DiffRow, DiffTable, Diffgram};

/// Render a Markdown summary of one section's Diffgram.
///
/// Lists per-table counts, then the keys of every changed row. Modified rows
/// show each differing column as `old → new`, leaving out columns that were
/// excluded from change detection. Informational only; the HTML report is the
/// authoritative output.
pub fn render_human_summary(title: &str, diffgram: &Diffgram) -> String {
    let mut out = String::new();

    out.push_str(&format!("## {}\n\n", title));

    let summary = diffgram.summary();
    if !summary.has_changes() {
        out.push_str(&format!(
            "_No changes detected ({} unchanged rows)._\n",
            summary.unchanged
        ));
        return out;
    }

    // Counts
    out.push_str("| Table | Added | Deleted | Modified | Unchanged |\n");
    out.push_str("|---|---|---|---|---|\n");
    for table in diffgram.tables() {
        let s = table.summary();
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            table.name, s.added, s.deleted, s.modified, s.unchanged
        ));
    }
    out.push('\n');

    // Per-table changes
    for (t, table) in diffgram.tables().iter().enumerate() {
        if !table.summary().has_changes() {
            continue;
        }
        out.push_str(&format!("### {}\n\n", table.name));
        for row in table.rows.iter().filter(|r| r.status.is_change()) {
            out.push_str(&format!(
                "- **{}** `{}`\n",
                status_label(row.status),
                key_label(row)
            ));
            if row.status == ChangeStatus::Modified {
                push_changed_columns(&mut out, diffgram, t, row);
            }
        }
        out.push('\n');
    }

    out
}

fn push_changed_columns(out: &mut String, diffgram: &Diffgram, t: usize, row: &DiffRow) {
    let table: &DiffTable = &diffgram.tables()[t];
    for (i, column) in table.columns.iter().enumerate() {
        if table.primary_key.contains(&i)
            || diffgram.is_change_ignored(t, i)
            || !row.column_changed(i)
        {
            continue;
        }
        let old = row.old_value(i).map(|v| v.to_string()).unwrap_or_default();
        let new = row.value(i).map(|v| v.to_string()).unwrap_or_default();
        out.push_str(&format!("  - {}: `{}` → `{}`\n", column.name, old, new));
    }
}

fn status_label(status: ChangeStatus) -> &'static str {
    match status {
        ChangeStatus::Added => "Added",
        ChangeStatus::Deleted => "Deleted",
        ChangeStatus::Modified => "Modified",
        ChangeStatus::Unchanged => "Unchanged",
    }
}

fn key_label(row: &DiffRow) -> String {
    row.key
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" / ")
}
