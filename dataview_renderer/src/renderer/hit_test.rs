// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit testing.

use dataview_model::{DataModel, ItemFlags, ItemId};
use dataview_state::StateModel;
use dataview_viewport::{ColumnExtent, column_at, first_visible_column, last_visible_column};
use kurbo::{Point, Rect};

use super::TreeModelRenderer;
use crate::geometry::decorations;

bitflags::bitflags! {
    /// What a point hit inside a cell.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct HitFlags: u16 {
        /// The point is inside the cell.
        const ON_ITEM      = 0b0000_0000_0001;
        /// The point is on the expander of an item with children.
        const ON_EXPANDER  = 0b0000_0000_0010;
        /// The point is on the check box of a checkable item.
        const ON_CHECKBOX  = 0b0000_0000_0100;
        /// The point is in the indentation or decoration gutter of the tree
        /// column, but not on a button.
        const ON_MARGIN    = 0b0000_0000_1000;
        /// Within the edge threshold of the cell's left border.
        const LEFT_EDGE    = 0b0000_0001_0000;
        /// Within the edge threshold of the cell's right border.
        const RIGHT_EDGE   = 0b0000_0010_0000;
        /// Within the edge threshold of the cell's top border.
        const TOP_EDGE     = 0b0000_0100_0000;
        /// Within the edge threshold of the cell's bottom border.
        const BOTTOM_EDGE  = 0b0000_1000_0000;
        /// The point lies outside every cell; the result is the nearest one.
        const OUTSIDE      = 0b0001_0000_0000;
    }
}

/// The cell under a point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HitResult {
    /// Item of the row.
    pub item: ItemId,
    /// View column.
    pub column: usize,
    /// View row.
    pub row: usize,
    /// What was hit.
    pub flags: HitFlags,
    /// Client-space cell rectangle.
    pub cell: Rect,
}

impl HitResult {
    /// Returns `true` if `flag` is set.
    #[must_use]
    pub fn has(&self, flag: HitFlags) -> bool {
        self.flags.contains(flag)
    }
}

impl<M, S> TreeModelRenderer<M, S>
where
    M: DataModel,
    S: StateModel,
{
    /// Finds the cell under the client-space `point`.
    ///
    /// The column is found by accumulating widths, the row by walking the
    /// visible rows from the top. Points left of, right of, above, or below
    /// every cell return `None`, unless `out_of_bounds` is set, in which case
    /// they resolve to the nearest boundary cell flagged
    /// [`OUTSIDE`](HitFlags::OUTSIDE) together with the edge they lie past.
    pub fn hit_test(&mut self, point: Point, out_of_bounds: bool) -> Option<HitResult> {
        let mut flags = HitFlags::empty();
        let scroll_x = super::px(self.viewport.scroll_x());
        let column = if point.x < 0.0 {
            flags |= HitFlags::LEFT_EDGE | HitFlags::OUTSIDE;
            first_visible_column(&self.columns)
        } else {
            column_at(&self.columns, point.x + scroll_x).or_else(|| {
                flags |= HitFlags::RIGHT_EDGE | HitFlags::OUTSIDE;
                last_visible_column(&self.columns)
            })
        }?;

        let rows = self.visible_rows();
        let first = rows.first()?;
        let last = rows.last()?;
        let row = if point.y < 0.0 {
            flags |= HitFlags::TOP_EDGE | HitFlags::OUTSIDE;
            first
        } else if let Some(row) = rows.iter().find(|r| point.y < r.bottom()) {
            row
        } else {
            flags |= HitFlags::BOTTOM_EDGE | HitFlags::OUTSIDE;
            last
        };
        if flags.contains(HitFlags::OUTSIDE) && !out_of_bounds {
            return None;
        }

        let x = self.column_x(column)?;
        let cell = Rect::new(x, row.top, x + self.columns.column_width(column), row.bottom());
        if !flags.contains(HitFlags::OUTSIDE) {
            flags |= self.classify(point, cell, row.id, row.level, column);
        }
        tracing::trace!(target: "dataview_renderer::hit_test", ?point, row = row.row, column, ?flags, "hit");
        Some(HitResult {
            item: row.id,
            column,
            row: row.row,
            flags,
            cell,
        })
    }

    fn classify(&self, point: Point, cell: Rect, id: ItemId, level: usize, column: usize) -> HitFlags {
        let mut flags = HitFlags::ON_ITEM;
        let threshold = self.config.edge_threshold;
        if point.x - cell.x0 < threshold {
            flags |= HitFlags::LEFT_EDGE;
        }
        if cell.x1 - point.x <= threshold {
            flags |= HitFlags::RIGHT_EDGE;
        }
        if point.y - cell.y0 < threshold {
            flags |= HitFlags::TOP_EDGE;
        }
        if cell.y1 - point.y <= threshold {
            flags |= HitFlags::BOTTOM_EDGE;
        }
        if column != self.config.tree_column {
            return flags;
        }
        let Some(model) = self.model.as_ref() else {
            return flags;
        };
        let decor = decorations(&self.config, cell, level);
        let field = self.columns.get(column).map_or(0, |c| c.field);
        if decor.expander.contains(point) && model.child_count(&id) > 0 {
            flags |= HitFlags::ON_EXPANDER;
        } else if let Some(checkbox) = decor.checkbox
            && checkbox.contains(point)
            && model.item_flags(&id, field).contains(ItemFlags::CHECKABLE)
        {
            flags |= HitFlags::ON_CHECKBOX;
        } else if point.x < decor.content.x0 {
            flags |= HitFlags::ON_MARGIN;
        }
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::tests::sample;

    #[test]
    fn out_of_bounds_points_clamp() {
        let (mut renderer, [a, _, _, _, b]) = sample();
        assert!(renderer.hit_test(Point::new(-10.0, 5.0), false).is_none());
        let hit = renderer.hit_test(Point::new(-10.0, 5.0), true).unwrap();
        assert_eq!(hit.item, a);
        assert_eq!(hit.column, 0);
        assert!(hit.has(HitFlags::LEFT_EDGE | HitFlags::OUTSIDE));

        let hit = renderer.hit_test(Point::new(150.0, 25.0), true).unwrap();
        assert_eq!(hit.item, b);
        assert_eq!(hit.column, 0);
        assert!(hit.has(HitFlags::OUTSIDE));

        let hit = renderer.hit_test(Point::new(50.0, 95.0), true).unwrap();
        assert_eq!(hit.item, b);
        assert!(hit.has(HitFlags::BOTTOM_EDGE | HitFlags::OUTSIDE));
        assert!(renderer.hit_test(Point::new(50.0, -1.0), false).is_none());
    }

    #[test]
    fn decorations_are_classified() {
        let (mut renderer, [a, _, _, _, b]) = sample();
        // Expander of A spans x 2..11, y 5.5..14.5.
        let hit = renderer.hit_test(Point::new(6.0, 10.0), false).unwrap();
        assert_eq!(hit.item, a);
        assert!(hit.has(HitFlags::ON_ITEM | HitFlags::ON_EXPANDER));
        // B has no children: the same spot is margin.
        let hit = renderer.hit_test(Point::new(6.0, 30.0), false).unwrap();
        assert_eq!(hit.item, b);
        assert!(hit.has(HitFlags::ON_MARGIN));
        assert!(!hit.has(HitFlags::ON_EXPANDER));
        // Content area, near the right border.
        let hit = renderer.hit_test(Point::new(98.0, 30.0), false).unwrap();
        assert_eq!(hit.flags, HitFlags::ON_ITEM | HitFlags::RIGHT_EDGE);
        assert_eq!(hit.cell, Rect::new(0.0, 20.0, 100.0, 40.0));
    }
}
