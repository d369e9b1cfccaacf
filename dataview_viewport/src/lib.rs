// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dataview Viewport: scrollbar math and geometry for row-based virtual views.
//!
//! - [`ScrollAxis`]: one scrollbar as a (position, page, range) triple with the
//!   position kept in `0..=range - page`, plus [`ScrollAlign`]-driven targets.
//! - [`compute_layout`]: the scrollbar layout as a pure fixed-point iteration.
//!   Showing one scrollbar can shrink the client area enough to require the
//!   other; [`layout_step`] computes one round and [`compute_layout`] repeats it
//!   until the client size is stable (at most [`MAX_LAYOUT_ITERATIONS`] rounds).
//! - [`Viewport`]: a controller owning the layout inputs, with row-based
//!   vertical scrolling and pixel-based horizontal scrolling.
//! - [`ColumnExtent`] and the column helpers: linear lookups over a short,
//!   ordered list of columns.
//!
//! The crate knows nothing about trees or painting. A tree renderer feeds it
//! the visible row count and the total column width, and reads back pages,
//! positions, and the client size.
//!
//! ```rust
//! use dataview_viewport::{LayoutInput, compute_layout};
//! use kurbo::Size;
//!
//! let layout = compute_layout(&LayoutInput {
//!     outer: Size::new(100.0, 100.0),
//!     scrollbar: Size::new(10.0, 10.0),
//!     row_height: 10.0,
//!     rows: 11,
//!     content_width: 95.0,
//!     row_position: 0,
//!     pixel_position: 0,
//! });
//! // Eleven rows need a vertical bar, which then makes 95px of columns overflow.
//! assert!(layout.show_vertical && layout.show_horizontal);
//! assert_eq!(layout.vertical.page(), 9);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod axis;
mod columns;
mod layout;
mod viewport;

pub use axis::{ScrollAlign, ScrollAxis};
pub use columns::{
    ColumnExtent, column_at, column_start, first_visible_column, last_visible_column, total_width,
};
pub use layout::{
    Layout, LayoutInput, MAX_LAYOUT_ITERATIONS, compute_layout, layout_step, rows_per_page,
};
pub use viewport::Viewport;
