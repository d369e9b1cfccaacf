// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Painting the visible window.

use dataview_model::{DataModel, HierarchyProvider, ItemFlags, StateProvider};
use dataview_state::StateModel;
use dataview_viewport::ColumnExtent;
use kurbo::{Point, Rect};

use super::{TreeModelRenderer, cell_state};
use crate::cell::CellState;
use crate::config::{RendererFlags, TreeLineStyle};
use crate::geometry::decorations;
use crate::lines::{last_child_stack, segments};
use crate::surface::{Paint, Surface};

impl<M, S> TreeModelRenderer<M, S>
where
    M: DataModel,
    S: StateModel,
{
    /// Paints the client area onto `surface`.
    ///
    /// Only rows inside the client area are visited. Each row paints its
    /// background, then its cells left to right, then its focus indicator.
    /// Rules and tree lines are drawn in separate passes on top.
    ///
    /// Returns `false` if there is no model; the background is still filled.
    pub fn paint(&mut self, surface: &mut dyn Surface) -> bool {
        let client = self.viewport.client_size();
        let client_rect = Rect::from_origin_size(Point::ZERO, client);
        surface.fill_rect(client_rect, Paint::Background);
        if self.model.is_none() {
            return false;
        }
        let rows = self.visible_rows();
        let columns: alloc::vec::Vec<(usize, f64)> = (0..self.columns.len())
            .filter(|c| self.columns.is_column_visible(*c))
            .filter_map(|c| Some((c, self.column_x(c)?)))
            .filter(|&(c, x)| x < client.width && x + self.columns.column_width(c) > 0.0)
            .collect();
        let Some(model) = self.model.as_ref() else {
            return false;
        };
        let state: &dyn StateProvider = &self.state;
        let config = &self.config;
        let tree_field = self.columns.get(config.tree_column).map_or(0, |c| c.field);

        for row in &rows {
            let band = Rect::new(0.0, row.top, client.width, row.bottom());
            let mut cell = cell_state(state, &row.id);
            if cell.contains(CellState::SELECTED) {
                surface.fill_rect(band, Paint::Selection);
            } else if config.has(RendererFlags::ALTERNATING_ROWS) && row.row % 2 == 1 {
                surface.fill_rect(band, Paint::AlternateBackground);
            }
            for &(c, x) in &columns {
                let Some(column) = self.columns.get(c) else {
                    continue;
                };
                let rect = Rect::new(x, row.top, x + column.width, row.bottom());
                let mut content = rect;
                if c == config.tree_column {
                    let decor = decorations(config, rect, row.level);
                    if model.child_count(&row.id) > 0 {
                        surface.expander(decor.expander, state.is_expanded(&row.id));
                    }
                    if let Some(checkbox) = decor.checkbox
                        && model.item_flags(&row.id, tree_field).contains(ItemFlags::CHECKABLE)
                    {
                        surface.checkbox(checkbox, state.check_state(&row.id), state.is_enabled(&row.id));
                    }
                    content = decor.content;
                }
                let editing = self.edit.is_some_and(|e| e.item == row.id && e.column == c);
                cell.set(CellState::EDITING, editing);
                if editing || content.width() <= 0.0 {
                    continue;
                }
                let value = model.value(&row.id, column.field);
                column
                    .kind
                    .render(surface, content, cell, &value, config.checkbox_size);
            }
            if state.is_focused(&row.id) {
                surface.focus_rect(band);
            }
        }

        if config.has(RendererFlags::HORIZONTAL_RULES) {
            for row in &rows {
                let y = row.bottom();
                surface.line(Point::new(0.0, y), Point::new(client.width, y), Paint::GridLine);
            }
        }
        if config.has(RendererFlags::VERTICAL_RULES) {
            let bottom = rows.last().map_or(0.0, |r| r.bottom()).min(client.height);
            for &(c, x) in &columns {
                let right = x + self.columns.column_width(c);
                surface.line(Point::new(right, 0.0), Point::new(right, bottom), Paint::GridLine);
            }
        }
        if config.tree_lines != TreeLineStyle::None
            && let Some(&(_, x)) = columns.iter().find(|(c, _)| *c == config.tree_column)
        {
            let width = self.columns.column_width(config.tree_column);
            for row in &rows {
                let stack = last_child_stack(model, &row.id, row.level);
                let cell = Rect::new(x, row.top, x + width, row.bottom());
                for line in segments(config, cell, &stack) {
                    surface.line(line.p0, line.p1, Paint::TreeLine);
                }
            }
        }
        tracing::trace!(target: "dataview_renderer::paint", rows = rows.len(), columns = columns.len(), "painted");
        true
    }
}
