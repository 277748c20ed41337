//! Group/Item Diff Scenario Tests
//!
//! This test suite reconciles two related tables where items belong to groups.
//!
//! ## Scenarios Covered
//!
//! 1. An item moving between groups
//! 2. Child rows attach to their own group
//! 3. A deleted group takes its items along

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{group_item, key_label};
use confdiff_core::diff::RelationIndex;
use confdiff_core::{reconcile, ChangeStatus, Diffgram};

fn statuses(diffgram: &Diffgram, table: &str) -> Vec<(String, ChangeStatus)> {
    diffgram
        .table(table)
        .unwrap()
        .rows
        .iter()
        .map(|r| (key_label(&r.key), r.status))
        .collect()
}

#[test]
fn test_scenario_item_moves_between_groups() {
    // Production (old): X→1,2; Y→3
    // Pilot (new):      X→1;   Y→3,4
    let production = group_item(&[("X", "1"), ("X", "2"), ("Y", "3")]);
    let pilot = group_item(&[("X", "1"), ("Y", "3"), ("Y", "4")]);

    let diffgram = reconcile(&pilot, &production).unwrap();

    assert_eq!(
        statuses(&diffgram, "groups"),
        vec![
            ("X".to_string(), ChangeStatus::Unchanged),
            ("Y".to_string(), ChangeStatus::Unchanged),
        ]
    );

    let items = statuses(&diffgram, "items");
    assert!(items.contains(&("X/2".to_string(), ChangeStatus::Deleted)));
    assert!(items.contains(&("Y/4".to_string(), ChangeStatus::Added)));
    assert!(items.contains(&("X/1".to_string(), ChangeStatus::Unchanged)));
    assert!(items.contains(&("Y/3".to_string(), ChangeStatus::Unchanged)));
    assert_eq!(items.len(), 4);
}

#[test]
fn test_scenario_children_attach_to_their_group() {
    let production = group_item(&[("X", "1"), ("X", "2"), ("Y", "3")]);
    let pilot = group_item(&[("X", "1"), ("Y", "3"), ("Y", "4")]);

    let diffgram = reconcile(&pilot, &production).unwrap();
    let index = RelationIndex::build(&diffgram);
    let groups = diffgram.table("groups").unwrap();
    let items = diffgram.table("items").unwrap();

    let children_of = |group: &str| -> Vec<String> {
        let row = groups
            .rows
            .iter()
            .position(|r| key_label(&r.key) == group)
            .unwrap();
        index
            .children(0, row)
            .iter()
            .map(|&i| key_label(&items.rows[i].key))
            .collect()
    };

    let mut x = children_of("X");
    x.sort();
    let mut y = children_of("Y");
    y.sort();
    assert_eq!(x, vec!["X/1".to_string(), "X/2".to_string()]);
    assert_eq!(y, vec!["Y/3".to_string(), "Y/4".to_string()]);
}

#[test]
fn test_deleted_group_takes_its_items_along() {
    let production = group_item(&[("X", "1"), ("Z", "9")]);
    let pilot = group_item(&[("X", "1")]);

    let diffgram = reconcile(&pilot, &production).unwrap();
    assert!(statuses(&diffgram, "groups").contains(&("Z".to_string(), ChangeStatus::Deleted)));
    assert!(statuses(&diffgram, "items").contains(&("Z/9".to_string(), ChangeStatus::Deleted)));
}
