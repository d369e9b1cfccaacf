// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement of the tree decorations inside a row of the tree column.

use kurbo::{Point, Rect};

use crate::config::{RendererConfig, RendererFlags};

/// Where the decorations and the content of one tree-column cell go.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Decorations {
    /// Expander button. Space is reserved even for leaves so siblings line up.
    pub expander: Rect,
    /// Check box, when check boxes are enabled.
    pub checkbox: Option<Rect>,
    /// Remaining area for the cell content.
    pub content: Rect,
}

#[allow(
    clippy::cast_precision_loss,
    reason = "Tree depths are far below 2^52"
)]
fn indent_of(config: &RendererConfig, level: usize) -> f64 {
    level as f64 * config.indent
}

/// Horizontal center of the expander at `level`, for a tree column whose
/// left edge is at `column_x`.
#[must_use]
pub fn expander_center_x(config: &RendererConfig, column_x: f64, level: usize) -> f64 {
    column_x + indent_of(config, level) + config.margin + config.expander_size / 2.0
}

/// Lays out the decorations of a tree-column cell.
///
/// `cell` is the full cell rectangle; `level` the view depth of the item.
#[must_use]
pub fn decorations(config: &RendererConfig, cell: Rect, level: usize) -> Decorations {
    let height = cell.height();
    let side = config.expander_size;
    let x = cell.x0 + indent_of(config, level) + config.margin;
    let expander = Rect::from_origin_size(
        Point::new(x, cell.y0 + (height - side) / 2.0),
        (side, side),
    );
    let mut next = expander.x1 + config.margin;
    let checkbox = config.has(RendererFlags::CHECKBOXES).then(|| {
        let side = config.checkbox_size;
        let rect = Rect::from_origin_size(
            Point::new(next, cell.y0 + (height - side) / 2.0),
            (side, side),
        );
        next = rect.x1 + config.margin;
        rect
    });
    let content = Rect::new(next.min(cell.x1), cell.y0, cell.x1, cell.y1);
    Decorations {
        expander,
        checkbox,
        content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decorations_follow_level() {
        let config = RendererConfig::default();
        let cell = Rect::new(10.0, 40.0, 210.0, 60.0);
        let d = decorations(&config, cell, 2);
        // 10 + 2 * 16 + 2
        assert_eq!(d.expander, Rect::new(44.0, 45.5, 53.0, 54.5));
        assert_eq!(d.checkbox, None);
        assert_eq!(d.content, Rect::new(55.0, 40.0, 210.0, 60.0));
        assert!((expander_center_x(&config, 10.0, 2) - 48.5).abs() < f64::EPSILON);
    }

    #[test]
    fn checkboxes_reserve_space() {
        let config = RendererConfig {
            flags: RendererFlags::CHECKBOXES,
            ..RendererConfig::default()
        };
        let d = decorations(&config, Rect::new(0.0, 0.0, 20.0, 20.0), 0);
        assert_eq!(d.checkbox, Some(Rect::new(13.0, 3.5, 26.0, 16.5)));
        // Content never starts past the cell.
        assert_eq!(d.content.x0, 20.0);
        assert_eq!(d.content.width(), 0.0);
    }
}
