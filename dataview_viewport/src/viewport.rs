// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small controller that owns the scroll state of a row-based view.

use kurbo::Size;

use crate::layout::{Layout, LayoutInput, compute_layout, floor_to_usize};
use crate::{ScrollAlign, ScrollAxis};

/// Scroll state of a view whose vertical axis counts rows and whose
/// horizontal axis counts pixels.
///
/// The controller keeps the last [`Layout`] and recomputes it whenever an
/// input changes, so scrollbar visibility, page sizes, and clamped positions
/// are always consistent with each other.
///
/// ```rust
/// use dataview_viewport::{ScrollAlign, Viewport};
/// use kurbo::Size;
///
/// let mut viewport = Viewport::new(Size::new(200.0, 100.0), Size::new(12.0, 12.0), 20.0);
/// viewport.set_content(50, 150.0);
/// assert_eq!(viewport.vertical().page(), 5);
///
/// viewport.scroll_to_row(30, ScrollAlign::Start);
/// assert_eq!(viewport.first_row(), 30);
/// assert_eq!(viewport.row_at_y(25.0), Some(31));
/// ```
#[derive(Debug, Clone)]
pub struct Viewport {
    input: LayoutInput,
    layout: Layout,
}

impl Viewport {
    /// Creates a viewport with no content.
    #[must_use]
    pub fn new(outer: Size, scrollbar: Size, row_height: f64) -> Self {
        let input = LayoutInput {
            outer,
            scrollbar,
            row_height,
            rows: 0,
            content_width: 0.0,
            row_position: 0,
            pixel_position: 0,
        };
        Self {
            input,
            layout: compute_layout(&input),
        }
    }

    fn relayout(&mut self) -> bool {
        let before = self.layout;
        self.layout = compute_layout(&self.input);
        self.input.row_position = self.layout.vertical.position();
        self.input.pixel_position = self.layout.horizontal.position();
        tracing::trace!(
            target: "dataview_viewport::viewport",
            rows = self.input.rows,
            first_row = self.input.row_position,
            page = self.layout.vertical.page(),
            "relayout"
        );
        before != self.layout
    }

    /// The current layout.
    #[must_use]
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The vertical axis, in rows.
    #[must_use]
    pub const fn vertical(&self) -> ScrollAxis {
        self.layout.vertical
    }

    /// The horizontal axis, in pixels.
    #[must_use]
    pub const fn horizontal(&self) -> ScrollAxis {
        self.layout.horizontal
    }

    /// Area available to content.
    #[must_use]
    pub const fn client_size(&self) -> Size {
        self.layout.client
    }

    /// Size of the whole view.
    #[must_use]
    pub const fn outer_size(&self) -> Size {
        self.input.outer
    }

    /// Nominal row height.
    #[must_use]
    pub const fn row_height(&self) -> f64 {
        self.input.row_height
    }

    /// Index of the first visible row.
    #[must_use]
    pub const fn first_row(&self) -> usize {
        self.layout.vertical.position()
    }

    /// Horizontal scroll offset in pixels.
    #[must_use]
    pub const fn scroll_x(&self) -> usize {
        self.layout.horizontal.position()
    }

    /// Resizes the view. Returns `true` if the layout changed.
    pub fn set_outer_size(&mut self, outer: Size) -> bool {
        self.input.outer = outer;
        self.relayout()
    }

    /// Changes the scrollbar thickness.
    pub fn set_scrollbar_size(&mut self, scrollbar: Size) -> bool {
        self.input.scrollbar = scrollbar;
        self.relayout()
    }

    /// Changes the nominal row height.
    pub fn set_row_height(&mut self, row_height: f64) -> bool {
        self.input.row_height = row_height;
        self.relayout()
    }

    /// Sets the number of visible rows and the total column width.
    pub fn set_content(&mut self, rows: usize, content_width: f64) -> bool {
        self.input.rows = rows;
        self.input.content_width = content_width;
        self.relayout()
    }

    /// Grows or shrinks the row count by `delta` without a recount.
    pub fn adjust_rows(&mut self, delta: isize) -> bool {
        let mut axis = self.layout.vertical;
        axis.adjust_range(delta);
        self.input.rows = axis.range();
        self.relayout()
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.input.rows
    }

    /// Scrolls vertically to `row`, clamped.
    pub fn set_first_row(&mut self, row: usize) -> bool {
        self.input.row_position = row;
        self.relayout()
    }

    /// Scrolls vertically by `delta` rows.
    pub fn scroll_rows(&mut self, delta: isize) -> bool {
        let mut axis = self.layout.vertical;
        axis.scroll_by(delta);
        self.set_first_row(axis.position())
    }

    /// Scrolls horizontally to `x` pixels, clamped.
    pub fn set_scroll_x(&mut self, x: usize) -> bool {
        self.input.pixel_position = x;
        self.relayout()
    }

    /// Brings `row` into view with `align`. Returns `true` if the view moved.
    pub fn scroll_to_row(&mut self, row: usize, align: ScrollAlign) -> bool {
        let target = self.layout.vertical.target_for(row, 1, align);
        self.set_first_row(target)
    }

    /// Brings the pixel span `[x, x + width)` into view horizontally.
    pub fn scroll_to_x(&mut self, x: usize, width: usize, align: ScrollAlign) -> bool {
        let target = self.layout.horizontal.target_for(x, width, align);
        self.set_scroll_x(target)
    }

    /// Rows touched by the client area, the last one possibly partial.
    #[must_use]
    pub fn visible_rows(&self) -> core::ops::Range<usize> {
        let first = self.first_row();
        let rows = if self.input.row_height > 0.0 {
            crate::layout::ceil_to_usize(self.layout.client.height / self.input.row_height)
        } else {
            0
        };
        first..(first + rows).min(self.input.rows)
    }

    /// Returns `true` if `row` is entirely inside the client area.
    #[must_use]
    pub const fn is_row_fully_visible(&self, row: usize) -> bool {
        self.layout.vertical.contains(row)
    }

    /// Row under client-space `y`, assuming uniform row height.
    #[must_use]
    pub fn row_at_y(&self, y: f64) -> Option<usize> {
        if y < 0.0 || self.input.row_height <= 0.0 || y >= self.layout.client.height {
            return None;
        }
        let row = self.first_row() + floor_to_usize(y / self.input.row_height);
        (row < self.input.rows).then_some(row)
    }

    /// Client-space top of `row`, assuming uniform row height.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        reason = "Row distances within a page are small"
    )]
    pub fn row_top(&self, row: usize) -> Option<f64> {
        let first = self.first_row();
        if row < first || row >= self.input.rows {
            return None;
        }
        Some((row - first) as f64 * self.input.row_height)
    }
}
