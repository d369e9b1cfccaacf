// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! State operations that need a model: ranges, recursion, check propagation.

use dataview_model::{CheckState, HierarchyProvider, ItemId, StateProvider, TreeStore, Value};
use dataview_state::{
    HashStateModel, StateModel, first_checked, first_expanded, next_checked, next_selected,
    visible_range,
};

/// root -> [A -> [A1, A2, A3], B -> [B1]]
fn tree() -> (TreeStore, ItemId, [ItemId; 3], ItemId, ItemId) {
    let mut store = TreeStore::new(1);
    let root = store.root_item();
    let a = store.append(&root, vec![Value::from("A")]);
    let a1 = store.append(&a, vec![Value::from("A1")]);
    let a2 = store.append(&a, vec![Value::from("A2")]);
    let a3 = store.append(&a, vec![Value::from("A3")]);
    let b = store.append(&root, vec![Value::from("B")]);
    let b1 = store.append(&b, vec![Value::from("B1")]);
    (store, a, [a1, a2, a3], b, b1)
}

#[test]
fn range_selection_in_either_direction() {
    let (store, a, [a1, a2, a3], b, _) = tree();
    let mut s = HashStateModel::new();
    s.expand(&a, true);
    assert_eq!(visible_range(&store, &s, &a2, &b), vec![a2, a3, b]);
    assert_eq!(visible_range(&store, &s, &b, &a2), vec![a2, a3, b]);
    assert!(s.select_range(&store, &b, &a1, true));
    assert_eq!(s.selected_items().len(), 4);
    assert!(!s.select_range(&store, &a1, &b, true));
}

#[test]
fn range_through_collapsed_node_skips_hidden_items() {
    let (store, a, [a1, ..], b, b1) = tree();
    let mut s = HashStateModel::new();
    s.expand(&b, true);
    assert_eq!(visible_range(&store, &s, &a, &b1), vec![a, b, b1]);
    assert!(visible_range(&store, &s, &a1, &b1).is_empty());
}

#[test]
fn select_all_covers_visible_items() {
    let (store, a, [a1, ..], b, b1) = tree();
    let mut s = HashStateModel::new();
    s.expand(&a, true);
    assert!(s.select_all(&store));
    assert!(s.is_selected(&a1));
    assert!(s.is_selected(&b));
    assert!(!s.is_selected(&b1));
    assert!(!s.is_selected(&store.root_item()));
    assert_eq!(next_selected(&store, &s, &b), None);
}

#[test]
fn recursive_expand_and_iteration() {
    let (store, a, _, b, _) = tree();
    let root = store.root_item();
    let mut s = HashStateModel::new();
    assert!(s.expand_recursive(&store, &root, true));
    assert!(s.is_expanded(&a));
    assert!(s.is_expanded(&b));
    assert_eq!(first_expanded(&store, &s), Some(a));
    assert!(s.expand_recursive(&store, &a, false));
    assert!(!s.expand_recursive(&store, &a, false));
    assert!(s.is_expanded(&b));
}

#[test]
fn check_propagation() {
    let (store, a, [a1, a2, a3], b, b1) = tree();
    let mut s = HashStateModel::new();
    s.set_check(&a1, CheckState::Checked);
    assert!(s.update_parent_checks(&store, &a1));
    assert_eq!(s.check_state(&a), CheckState::Undetermined);

    s.set_check(&a2, CheckState::Checked);
    s.set_check(&a3, CheckState::Checked);
    s.update_parent_checks(&store, &a3);
    assert_eq!(s.check_state(&a), CheckState::Checked);

    assert!(s.set_check_recursive(&store, &b, CheckState::Checked));
    assert_eq!(s.check_state(&b1), CheckState::Checked);
    assert_eq!(first_checked(&store, &s), Some(a));
    assert_eq!(next_checked(&store, &s, &a3), Some(b));

    assert!(s.set_check_recursive(&store, &a, CheckState::Unchecked));
    assert!(!s.update_parent_checks(&store, &a1));
    assert_eq!(s.check_state(&a), CheckState::Unchecked);
}

#[test]
fn clear_forgets_everything() {
    let (_, a, [a1, ..], _, _) = tree();
    let mut s = HashStateModel::new();
    s.select(&a, true);
    s.set_focus(Some(a1));
    s.clear();
    assert!(s.is_empty());
    assert!(!s.is_focused(&a1));
}
