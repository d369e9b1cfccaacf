// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scrollbar layout as a pure fixed-point computation.
//!
//! Showing a scrollbar shrinks the client area, which shrinks the page, which
//! can make the other scrollbar necessary. [`layout_step`] computes one round
//! and reports whether the client size moved; [`compute_layout`] iterates it
//! until the client size is stable, with an upper bound on the number of
//! rounds. No state is mutated, so nothing can re-enter.

use kurbo::Size;

use crate::ScrollAxis;

/// Upper bound on the rounds run by [`compute_layout`].
pub const MAX_LAYOUT_ITERATIONS: usize = 100;

/// Everything the scrollbar layout depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutInput {
    /// Size of the whole view, scrollbars included.
    pub outer: Size,
    /// Width of the vertical scrollbar and height of the horizontal one.
    pub scrollbar: Size,
    /// Height of one row, used to turn client height into a row page.
    pub row_height: f64,
    /// Number of visible rows in the content.
    pub rows: usize,
    /// Total column width in pixels.
    pub content_width: f64,
    /// Requested vertical position, in rows.
    pub row_position: usize,
    /// Requested horizontal position, in pixels.
    pub pixel_position: usize,
}

/// Result of a scrollbar layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// Area left for content once visible scrollbars are taken out.
    pub client: Size,
    /// Vertical axis in rows.
    pub vertical: ScrollAxis,
    /// Horizontal axis in pixels.
    pub horizontal: ScrollAxis,
    /// Whether the vertical scrollbar is shown.
    pub show_vertical: bool,
    /// Whether the horizontal scrollbar is shown.
    pub show_horizontal: bool,
    /// Rounds needed to reach this result.
    pub iterations: usize,
    /// `false` if the iteration bound was hit before the client size settled.
    pub converged: bool,
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Non-negative pixel quantities well below usize::MAX; float to int casts saturate"
)]
pub(crate) fn floor_to_usize(value: f64) -> usize {
    if value.is_nan() || value <= 0.0 {
        0
    } else {
        value as usize
    }
}

/// Number of whole rows that fit in `height`.
#[must_use]
pub fn rows_per_page(height: f64, row_height: f64) -> usize {
    if row_height <= 0.0 {
        return 0;
    }
    floor_to_usize(height / row_height)
}

/// Smallest whole number of pixels covering `value`.
pub(crate) fn ceil_to_usize(value: f64) -> usize {
    let whole = floor_to_usize(value);
    #[allow(
        clippy::cast_precision_loss,
        reason = "Round trip of a pixel count that fits in f64 exactly"
    )]
    let covered = whole as f64;
    if covered < value { whole + 1 } else { whole }
}

fn client_for(input: &LayoutInput, show_vertical: bool, show_horizontal: bool) -> Size {
    let bar_width = if show_vertical { input.scrollbar.width } else { 0.0 };
    let bar_height = if show_horizontal { input.scrollbar.height } else { 0.0 };
    Size::new(
        (input.outer.width - bar_width).max(0.0),
        (input.outer.height - bar_height).max(0.0),
    )
}

/// One layout round for a given client size.
///
/// Returns the layout implied by `client` and whether the client size that
/// layout needs differs from `client`.
#[must_use]
pub fn layout_step(input: &LayoutInput, client: Size) -> (Layout, bool) {
    let page = rows_per_page(client.height, input.row_height);
    let show_vertical = input.rows > page;
    let width = floor_to_usize(client.width);
    let content_width = ceil_to_usize(input.content_width);
    let show_horizontal = content_width > width;

    let next = client_for(input, show_vertical, show_horizontal);
    let layout = Layout {
        client,
        vertical: ScrollAxis::new(input.row_position, page, input.rows),
        horizontal: ScrollAxis::new(input.pixel_position, width, content_width),
        show_vertical,
        show_horizontal,
        iterations: 1,
        converged: next == client,
    };
    (layout, next != client)
}

/// Iterates [`layout_step`] from the full outer size until the client size
/// stops changing, or [`MAX_LAYOUT_ITERATIONS`] rounds have run.
#[must_use]
pub fn compute_layout(input: &LayoutInput) -> Layout {
    let mut client = input.outer;
    let mut iterations = 0;
    loop {
        iterations += 1;
        let (mut layout, changed) = layout_step(input, client);
        layout.iterations = iterations;
        if !changed {
            tracing::trace!(target: "dataview_viewport::layout", iterations, "layout converged");
            return layout;
        }
        if iterations >= MAX_LAYOUT_ITERATIONS {
            tracing::warn!(
                target: "dataview_viewport::layout",
                iterations,
                "scrollbar layout did not converge"
            );
            return layout;
        }
        client = client_for(input, layout.show_vertical, layout.show_horizontal);
    }
}
