// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dataview Renderer: the viewport engine of a virtual tree view.
//!
//! [`TreeModelRenderer`] shows a [`DataModel`](dataview_model::DataModel)
//! through a [`StateModel`](dataview_state::StateModel) without ever
//! materializing the tree. It keeps one cached anchor, the item in the top
//! row, and reaches every other row by walking from it. Painting, hit
//! testing, and keyboard navigation therefore cost time proportional to the
//! client area, not to the model.
//!
//! - Painting goes through the [`Surface`] trait using semantic [`Paint`]
//!   roles. [`DisplayList`] records commands for replay or inspection.
//! - Cells are painted by a per-column [`CellKind`] and edited in place by a
//!   per-column [`CellEditor`].
//! - Every state change is announced as a [`Notification`]. The `*Changing`
//!   notifications can be vetoed by returning [`Response::Veto`].
//! - Tree connector lines are computed per row from a [`LastChildStack`];
//!   see [`lines`].
//!
//! ## Example
//!
//! ```rust
//! use dataview_model::{HierarchyProvider, TreeStore, Value};
//! use dataview_renderer::{Column, DisplayList, RendererConfig, TreeModelRenderer};
//! use kurbo::Size;
//!
//! let mut store = TreeStore::new(1);
//! let root = store.root_item();
//! let a = store.append(&root, vec![Value::from("A")]);
//! store.append(&a, vec![Value::from("A1")]);
//! store.append(&root, vec![Value::from("B")]);
//!
//! let mut view: TreeModelRenderer<TreeStore> = TreeModelRenderer::new(RendererConfig::default());
//! view.columns_mut().push(Column::new("Name", 0, 120.0));
//! view.set_model(store);
//! view.set_size(Size::new(200.0, 100.0));
//!
//! // The root is hidden by default, so its children are the top-level rows.
//! assert_eq!(view.row_count(), 2);
//! assert!(view.expand(&a));
//! assert_eq!(view.row_count(), 3);
//!
//! let mut list = DisplayList::new();
//! view.paint(&mut list);
//! assert_eq!(list.texts().collect::<Vec<_>>(), ["A", "A1", "B"]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod cell;
mod column;
mod config;
mod notify;
mod renderer;
mod surface;
mod tracker;

pub mod geometry;
pub mod lines;

pub use cell::{CellEditor, CellKind, CellRenderer, CellState, TextEditor};
pub use column::{Column, Columns};
pub use config::{RendererConfig, RendererFlags, TreeLineStyle};
pub use lines::LastChildStack;
pub use notify::{Listener, ListenerId, Listeners, Notification, Response};
pub use renderer::{
    EditError, HitFlags, HitResult, Modifiers, Navigation, SelectionMode, TreeModelRenderer,
    VisibleRow,
};
pub use surface::{DisplayList, DrawOp, Paint, Surface};
pub use tracker::FirstVisibleItem;

pub use dataview_viewport::ScrollAlign;
