// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dataview Model: the data contract behind virtual tree views.
//!
//! A virtual tree view shows millions of rows without ever materializing
//! them. This crate defines what such a view needs from the data side, and
//! the algorithms it runs on top of it:
//!
//! - [`ItemId`]: an opaque, model-scoped node identifier. The invalid
//!   identifier is the universal "no such item" answer of the primitives.
//! - [`HierarchyProvider`]: three required primitives (`parent`,
//!   `child_count`, `child`) plus overridable performance hooks.
//! - [`DataModel`]: per-field [`Value`]s, [`ItemFlags`], comparison, and
//!   optional self-sorting.
//! - [`StateProvider`]: the read-only view of per-item UI state (selection,
//!   expansion, ...) that traversal consults. [`FullyExpanded`] stands in for
//!   "no state": every node open.
//! - [`traverse`]: depth-first navigation (`next_item`, `prev_item`), subtree
//!   sizes, rank lookups with temporal-coherence hints, and position compare.
//! - [`search`] and [`sort`]: linear search (full, partial, regex) and sort keys.
//! - [`ProxyChain`]: a base model viewed through an ordered stack of sort and
//!   filter stages that preserve identity.
//! - [`TreeStore`]: a small in-memory model for hosts and tests.
//!
//! Mutation is external to the contract. Views are told when a model changed
//! and rebuild their caches from the primitives.
//!
//! ## Example
//!
//! ```rust
//! use dataview_model::{FullyExpanded, HierarchyProvider, TreeStore, Value, traverse};
//!
//! let mut store = TreeStore::new(1);
//! let root = store.root_item();
//! let a = store.append(&root, vec![Value::from("A")]);
//! for name in ["A1", "A2", "A3"] {
//!     store.append(&a, vec![Value::from(name)]);
//! }
//! let b = store.append(&root, vec![Value::from("B")]);
//!
//! let state = FullyExpanded;
//! assert_eq!(store.subtree_size(&root, &state), 6);
//! // Ranks count the root as 0.
//! assert_eq!(traverse::find_item(&store, &state, 5, None), Some(b));
//! assert_eq!(store.item_rank(&b, &state), Some(5));
//! ```
//!
//! This crate is `no_std` and uses `alloc`. The default `regex` feature adds
//! regular expression search.

#![no_std]

extern crate alloc;

mod id;
mod model;
mod proxy;
mod state;
mod store;
mod value;

pub mod search;
pub mod sort;
pub mod traverse;

pub use id::{ItemId, ItemKey, ModelId};
pub use model::{DataModel, HierarchyProvider, ItemFlags};
pub use proxy::{FilterFn, FilterStage, ProxyChain, ProxyError, ProxyStage, SortStage};
pub use search::{MatchMode, SearchError, SearchQuery};
pub use sort::{SortKey, SortOrder};
pub use state::{CheckState, FullyExpanded, StateProvider};
pub use store::TreeStore;
pub use value::Value;
