// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dataview State: per-item transient UI state for virtual tree views.
//!
//! Data models stay free of UI state. This crate keeps selection, expansion,
//! tri-state check marks, focus, and enablement in a separate store keyed by
//! [`ItemId`](dataview_model::ItemId):
//!
//! - [`StateModel`]: the mutable contract. It extends the read-only
//!   [`StateProvider`](dataview_model::StateProvider) that traversal consults,
//!   and every mutator reports whether anything changed.
//! - [`HashStateModel`]: a sparse implementation backed by a hash map of
//!   [`ItemState`] bits.
//! - Iteration helpers ([`first_selected`], [`next_checked`], ...) that walk
//!   the data model depth-first and test a predicate at each step.
//!
//! ```rust
//! use dataview_model::{HierarchyProvider, TreeStore, Value};
//! use dataview_state::{HashStateModel, StateModel, first_selected};
//!
//! let mut store = TreeStore::new(1);
//! let root = store.root_item();
//! let a = store.append(&root, vec![Value::from("a")]);
//! let a1 = store.append(&a, vec![Value::from("a1")]);
//!
//! let mut state = HashStateModel::new();
//! assert!(state.expand(&a, true));
//! assert!(!state.expand(&a, true));
//! state.select(&a1, true);
//! assert_eq!(first_selected(&store, &state), Some(a1));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod hash;
mod model;

pub use hash::{HashStateModel, ItemState};
pub use model::{
    StateModel, first_checked, first_enabled, first_expanded, first_matching, first_selected,
    next_checked, next_enabled, next_expanded, next_matching, next_selected, subtree,
    visible_range,
};
