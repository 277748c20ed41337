use confdiff_core::{build_snapshot, CellValue, Column, Relation, Snapshot, TableBuilder};

/// Single `settings` table keyed by `Name` with a `Value` column
#[allow(dead_code)]
pub fn name_value(rows: &[(&str, i64)]) -> Snapshot {
    let mut builder = TableBuilder::new("settings")
        .column(Column::text("Name"))
        .column(Column::integer("Value"))
        .primary_key(["Name"]);
    for (name, value) in rows {
        builder.push_row(vec![CellValue::from(*name), CellValue::from(*value)]);
    }
    build_snapshot(vec![builder.build().unwrap()], Vec::new()).unwrap()
}

/// `groups` (Group) → `items` (Group, Item) linked by `group_items`
#[allow(dead_code)]
pub fn group_item(items: &[(&str, &str)]) -> Snapshot {
    let mut groups = TableBuilder::new("groups")
        .column(Column::text("Group"))
        .primary_key(["Group"]);
    let mut seen: Vec<&str> = Vec::new();
    for (group, _) in items {
        if !seen.contains(group) {
            seen.push(group);
            groups.push_row(vec![CellValue::from(*group)]);
        }
    }

    let mut rows = TableBuilder::new("items")
        .column(Column::text("Group"))
        .column(Column::text("Item"))
        .primary_key(["Group", "Item"]);
    for (group, item) in items {
        rows.push_row(vec![CellValue::from(*group), CellValue::from(*item)]);
    }

    build_snapshot(
        vec![groups.build().unwrap(), rows.build().unwrap()],
        vec![Relation::new(
            "group_items",
            "groups",
            ["Group"],
            "items",
            ["Group"],
        )],
    )
    .unwrap()
}

/// Text rendering of a key tuple, `X/2` style
#[allow(dead_code)]
pub fn key_label(key: &[CellValue]) -> String {
    key.iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("/")
}
