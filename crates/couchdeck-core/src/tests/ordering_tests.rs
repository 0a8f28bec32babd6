//! Tests for grid ordering of the inventory

use super::fixtures::{app, apps, ids};
use crate::services::{InventorySnapshot, order_apps};
use couchdeck_types::{AppEntry, RuntimeState};
use std::collections::HashSet;

fn running(list: &[&str]) -> HashSet<String> {
    list.iter().map(ToString::to_string).collect()
}

fn order_of(entries: &[AppEntry]) -> Vec<String> {
    entries.iter().map(|e| e.id.clone()).collect()
}

#[test]
fn test_favorites_then_running_then_rest() {
    let all = apps(&["g", "e", "d", "c", "f", "a", "b"]);
    let ordered = order_apps(&all, &ids(&["a", "b", "c"]), &running(&["d"]));

    assert_eq!(order_of(&ordered), ids(&["a", "b", "c", "d", "e", "f", "g"]));
}

#[test]
fn test_favorite_order_is_list_order_not_alphabetical() {
    let all = apps(&["a", "b", "c"]);
    let ordered = order_apps(&all, &ids(&["c", "a"]), &HashSet::new());
    assert_eq!(order_of(&ordered), ids(&["c", "a", "b"]));
}

#[test]
fn test_running_favorite_stays_in_favorites() {
    let all = apps(&["a", "b", "z"]);
    let ordered = order_apps(&all, &ids(&["z"]), &running(&["z", "b"]));

    assert_eq!(order_of(&ordered), ids(&["z", "b", "a"]));
    assert!(ordered[0].is_favorite);
    assert_eq!(ordered[0].runtime_state, RuntimeState::Running);
    assert_eq!(ordered[2].runtime_state, RuntimeState::Stopped);
}

#[test]
fn test_alphabetical_is_case_insensitive_with_id_tiebreak() {
    let all = vec![
        AppEntry::new("zeta", "beta"),
        AppEntry::new("alpha", "Beta"),
        AppEntry::new("first", "Alpha"),
    ];
    let ordered = order_apps(&all, &[], &HashSet::new());
    assert_eq!(order_of(&ordered), ids(&["first", "alpha", "zeta"]));
}

#[test]
fn test_unknown_and_repeated_favorites_are_skipped() {
    let all = apps(&["a", "b"]);
    let ordered = order_apps(&all, &ids(&["ghost", "b", "b"]), &HashSet::new());
    assert_eq!(order_of(&ordered), ids(&["b", "a"]));
}

#[test]
fn test_snapshot_counts_running() {
    let snapshot = InventorySnapshot {
        apps: vec![app("a")],
        favorites: Vec::new(),
        running: running(&["a", "b"]),
    };
    assert_eq!(snapshot.running_count(), 2);
    assert_eq!(order_of(&snapshot.ordered()), ids(&["a"]));
}
