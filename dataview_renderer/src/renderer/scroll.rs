// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The visible window: rows in the client area, their rectangles, and
//! scrolling items into view.

use alloc::vec::Vec;

use dataview_model::traverse::{self, TreePos};
use dataview_model::{DataModel, ItemId, StateProvider};
use dataview_state::StateModel;
use dataview_viewport::{ColumnExtent, ScrollAlign, column_start};
use kurbo::Rect;

use super::{TreeModelRenderer, cell_state, px};
use crate::column::Columns;
use crate::config::{RendererConfig, RendererFlags};

/// One row inside the client area.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VisibleRow {
    /// View row index; row 0 is the first shown item.
    pub row: usize,
    /// The item.
    pub id: ItemId,
    /// View depth. Top-level rows are at level 0.
    pub level: usize,
    /// Client-space top edge.
    pub top: f64,
    /// Row height.
    pub height: f64,
}

impl VisibleRow {
    /// Client-space bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Height of the row showing `id`.
pub(crate) fn measure_row<M>(
    config: &RendererConfig,
    columns: &Columns,
    model: &M,
    state: &dyn StateProvider,
    id: &ItemId,
) -> f64
where
    M: DataModel + ?Sized,
{
    if !config.has(RendererFlags::VARIABLE_ROW_HEIGHT) {
        return config.row_height;
    }
    let cell = cell_state(state, id);
    columns
        .iter()
        .enumerate()
        .filter(|(i, _)| columns.is_column_visible(*i))
        .map(|(_, c)| c.kind.size(cell, &model.value(id, c.field)).height)
        .fold(config.row_height, f64::max)
}

impl<M, S> TreeModelRenderer<M, S>
where
    M: DataModel,
    S: StateModel,
{
    /// Position of the first row, with its view level.
    pub(crate) fn first_visible_pos(&mut self) -> Option<TreePos> {
        let model = self.model.as_ref()?;
        let hidden = self.config.hidden_ranks();
        if self.viewport.rows() == 0 {
            return None;
        }
        let rank = self.viewport.first_row() + hidden;
        let pos = self.first_visible.resolve(model, &self.state, rank)?;
        Some(TreePos::new(pos.id, pos.level.saturating_sub(hidden)))
    }

    /// The item shown in the top row.
    pub fn first_visible_item(&mut self) -> Option<ItemId> {
        self.first_visible_pos().map(|p| p.id)
    }

    /// Rows touching the client area, top to bottom.
    ///
    /// Walks forward from the first visible item and stops once the
    /// accumulated height reaches the client height, so the cost depends on
    /// the window, not on the tree.
    pub fn visible_rows(&mut self) -> Vec<VisibleRow> {
        let mut rows = Vec::new();
        let Some(mut pos) = self.first_visible_pos() else {
            return rows;
        };
        let Some(model) = self.model.as_ref() else {
            return rows;
        };
        let limit = self.viewport.client_size().height;
        let mut row = self.viewport.first_row();
        let mut top = 0.0;
        loop {
            let height = measure_row(&self.config, &self.columns, model, &self.state, &pos.id);
            rows.push(VisibleRow {
                row,
                id: pos.id,
                level: pos.level,
                top,
                height,
            });
            top += height;
            if top >= limit {
                break;
            }
            match traverse::next_item_at(model, &self.state, pos, 1) {
                Some(next) => pos = next,
                None => break,
            }
            row += 1;
        }
        rows
    }

    /// Every item with at least one pixel inside the client area.
    pub fn all_visible_items(&mut self) -> Vec<ItemId> {
        self.visible_rows().into_iter().map(|r| r.id).collect()
    }

    /// View row of `id`, or `None` if it is not shown (hidden root, collapsed
    /// ancestor, or foreign identifier).
    ///
    /// Costs one [`HierarchyProvider::item_rank`](dataview_model::HierarchyProvider::item_rank) call.
    pub fn row_of(&self, id: &ItemId) -> Option<usize> {
        let model = self.model.as_ref()?;
        model
            .item_rank(id, &self.state)?
            .checked_sub(self.config.hidden_ranks())
    }

    /// Client-space left edge of `column`.
    pub(crate) fn column_x(&self, column: usize) -> Option<f64> {
        Some(column_start(&self.columns, column)? - px(self.viewport.scroll_x()))
    }

    /// Client-space rectangle of the cell of `id` in `column`, if the row is
    /// inside the client area.
    pub fn item_rect(&mut self, id: &ItemId, column: usize) -> Option<Rect> {
        if !self.columns.is_column_visible(column) {
            return None;
        }
        let x = self.column_x(column)?;
        let width = self.columns.column_width(column);
        let row = self.visible_rows().into_iter().find(|r| r.id == *id)?;
        Some(Rect::new(x, row.top, x + width, row.bottom()))
    }

    /// Scrolls so the first row shows view row `row`.
    pub fn scroll_to_row(&mut self, row: usize) -> bool {
        self.viewport.set_first_row(row)
    }

    /// Scrolls by `delta` rows.
    pub fn scroll_rows(&mut self, delta: isize) -> bool {
        self.viewport.scroll_rows(delta)
    }

    /// Scrolls horizontally to `x` pixels.
    pub fn scroll_to_x(&mut self, x: usize) -> bool {
        self.viewport.set_scroll_x(x)
    }

    /// Expands every collapsed ancestor of `id` and scrolls its row into view.
    ///
    /// Returns `false` if `id` cannot be shown: it is the hidden root, it
    /// belongs to another model, or a listener vetoed an expansion.
    pub fn ensure_visible(&mut self, id: &ItemId, align: ScrollAlign) -> bool {
        let Some(model) = self.model.as_ref() else {
            return false;
        };
        if !id.is_valid() || id.model() != model.model_id() {
            return false;
        }
        let mut collapsed = Vec::new();
        let mut cur = model.parent(id);
        while let Some(parent) = cur.valid() {
            if !parent.is_root() && !self.state.is_expanded(&parent) {
                collapsed.push(parent);
            }
            cur = model.parent(&parent);
        }
        for ancestor in collapsed.iter().rev() {
            if !self.expand(ancestor) {
                return false;
            }
        }
        let Some(row) = self.row_of(id) else {
            return false;
        };
        self.viewport.scroll_to_row(row, align);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::tests::sample;
    use kurbo::Size;

    #[test]
    fn window_is_bounded_by_client_height() {
        let (mut renderer, [a, ..]) = sample();
        renderer.expand(&a);
        renderer.set_size(Size::new(200.0, 50.0));
        let rows = renderer.visible_rows();
        // 50px at 20px per row: two full rows and one partial.
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].top, 40.0);
        assert_eq!(rows[1].level, 1);
    }

    #[test]
    fn ensure_visible_expands_and_scrolls() {
        let (mut renderer, [a, _, _, a3, b]) = sample();
        renderer.set_size(Size::new(200.0, 40.0));
        assert_eq!(renderer.row_of(&a3), None);
        assert!(renderer.ensure_visible(&a3, ScrollAlign::End));
        assert!(renderer.state().is_expanded(&a));
        assert_eq!(renderer.row_of(&a3), Some(3));
        let above = renderer
            .model()
            .and_then(|m| traverse::prev_item(m, renderer.state(), &a3, 1));
        assert_eq!(renderer.first_visible_item(), above);
        assert!(renderer.item_rect(&a3, 0).is_some());
        assert!(renderer.item_rect(&b, 0).is_none());
        assert!(!renderer.ensure_visible(&ItemId::INVALID, ScrollAlign::Start));
    }
}
