// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tree model renderer.

mod edit;
mod expand;
mod hit_test;
mod mouse;
mod navigate;
mod paint;
mod scroll;
mod selection;

pub use edit::EditError;
pub use hit_test::{HitFlags, HitResult};
pub use navigate::{Modifiers, Navigation};
pub use scroll::VisibleRow;
pub use selection::SelectionMode;

use alloc::vec::Vec;

use dataview_model::{DataModel, FullyExpanded, ItemId, StateProvider, traverse};
use dataview_state::{HashStateModel, StateModel};
use dataview_viewport::{Viewport, total_width};
use kurbo::Size;

use crate::cell::CellState;
use crate::column::Columns;
use crate::config::RendererConfig;
use crate::notify::{ListenerId, Listeners, Notification, Response};
use crate::tracker::FirstVisibleItem;

/// A virtual tree view over a [`DataModel`] and a [`StateModel`].
///
/// The renderer never materializes the tree. Every operation works on the
/// rows inside the client area, found by walking forward from the cached
/// first visible item, or on the subtree it was asked about.
///
/// Model and state are owned. Mutate the model through
/// [`model_mut`](Self::model_mut) and call
/// [`on_data_model_changed`](Self::on_data_model_changed) afterwards; no paint
/// or query may run in between.
#[derive(Debug)]
pub struct TreeModelRenderer<M, S = HashStateModel> {
    model: Option<M>,
    state: S,
    config: RendererConfig,
    columns: Columns,
    viewport: Viewport,
    first_visible: FirstVisibleItem,
    listeners: Listeners,
    edit: Option<edit::ActiveEdit>,
    anchor: Option<ItemId>,
}

#[allow(
    clippy::cast_precision_loss,
    reason = "Scroll offsets are far below 2^52 pixels"
)]
pub(crate) fn px(value: usize) -> f64 {
    value as f64
}

pub(crate) fn cell_state(state: &dyn StateProvider, id: &ItemId) -> CellState {
    let mut out = CellState::empty();
    out.set(CellState::SELECTED, state.is_selected(id));
    out.set(CellState::FOCUSED, state.is_focused(id));
    out.set(CellState::DISABLED, !state.is_enabled(id));
    out
}

impl<M, S> TreeModelRenderer<M, S>
where
    M: DataModel,
    S: StateModel + Default,
{
    /// Creates a renderer with no model and an empty state store.
    #[must_use]
    pub fn new(config: RendererConfig) -> Self {
        Self::with_state(config, S::default())
    }
}

impl<M, S> TreeModelRenderer<M, S>
where
    M: DataModel,
    S: StateModel,
{
    /// Creates a renderer with no model around an existing state store.
    pub fn with_state(config: RendererConfig, state: S) -> Self {
        let viewport = Viewport::new(Size::ZERO, config.scrollbar, config.row_height);
        Self {
            model: None,
            state,
            config,
            columns: Columns::new(),
            viewport,
            first_visible: FirstVisibleItem::new(),
            listeners: Listeners::new(),
            edit: None,
            anchor: None,
        }
    }

    /// Attaches `model`, returning the previous one.
    ///
    /// All per-item state is cleared and the view scrolls to the top.
    pub fn set_model(&mut self, model: M) -> Option<M> {
        self.end_edition(true, true);
        let previous = self.model.replace(model);
        self.reset_view();
        previous
    }

    /// Detaches and returns the model.
    pub fn take_model(&mut self) -> Option<M> {
        self.end_edition(true, true);
        let previous = self.model.take();
        self.reset_view();
        previous
    }

    fn reset_view(&mut self) {
        self.state.clear();
        self.anchor = None;
        self.first_visible.invalidate();
        self.viewport.set_first_row(0);
        self.viewport.set_scroll_x(0);
        self.recount();
    }

    /// The attached model.
    pub fn model(&self) -> Option<&M> {
        self.model.as_ref()
    }

    /// The attached model, mutably. Call
    /// [`on_data_model_changed`](Self::on_data_model_changed) after changing
    /// its structure.
    pub fn model_mut(&mut self) -> Option<&mut M> {
        self.model.as_mut()
    }

    /// The state store.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// The state store, mutably. Call
    /// [`on_layout_changed`](Self::on_layout_changed) after changing
    /// expansion through it.
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// The configuration.
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Replaces the configuration and relayouts.
    pub fn set_config(&mut self, config: RendererConfig) {
        self.viewport.set_scrollbar_size(config.scrollbar);
        self.viewport.set_row_height(config.row_height);
        self.config = config;
        self.on_layout_changed();
    }

    /// The columns.
    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    /// The columns, mutably. Call
    /// [`on_layout_changed`](Self::on_layout_changed) after resizing, adding,
    /// or hiding columns.
    pub fn columns_mut(&mut self) -> &mut Columns {
        &mut self.columns
    }

    /// Scroll state and client area.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Resizes the view, scrollbars included. Returns `true` if the layout
    /// changed.
    pub fn set_size(&mut self, size: Size) -> bool {
        self.viewport.set_outer_size(size)
    }

    /// Registers a notification listener.
    pub fn add_listener(
        &mut self,
        listener: impl FnMut(&Notification<'_>) -> Response + 'static,
    ) -> ListenerId {
        self.listeners.add(listener)
    }

    /// Unregisters a notification listener.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Number of rows the view shows when scrolled through entirely.
    pub fn row_count(&self) -> usize {
        self.model.as_ref().map_or(0, |model| {
            traverse::visible_count(model, &self.state).saturating_sub(self.config.hidden_ranks())
        })
    }

    /// The focused item.
    pub fn focused_item(&self) -> Option<ItemId> {
        self.state.focused()
    }

    /// Must be called after the model's structure or values changed.
    ///
    /// Cancels a running edition, deselects items that no longer exist, drops
    /// focus and anchor if they are no longer shown, and recomputes every
    /// cache before returning.
    pub fn on_data_model_changed(&mut self) {
        tracing::debug!(target: "dataview_renderer::renderer", "data model changed");
        self.end_edition(true, true);
        if let Some(model) = self.model.as_ref() {
            let (alive, dead): (Vec<ItemId>, Vec<ItemId>) = self
                .state
                .selected_items()
                .into_iter()
                .partition(|id| traverse::is_reachable(model, &FullyExpanded, id));
            if !dead.is_empty() {
                self.state.select_list(&dead, false);
                tracing::debug!(
                    target: "dataview_renderer::renderer",
                    removed = dead.len(),
                    "dropped selection of removed items"
                );
                self.listeners
                    .send(&Notification::SelectionChanged { selected: &alive });
            }
            if let Some(focused) = self.state.focused()
                && !traverse::is_reachable(model, &self.state, &focused)
            {
                self.state.set_focus(None);
                self.listeners.send(&Notification::FocusChanged {
                    old: Some(focused),
                    new: None,
                });
            }
            if let Some(anchor) = self.anchor
                && !traverse::is_reachable(model, &self.state, &anchor)
            {
                self.anchor = None;
            }
        }
        self.on_layout_changed();
    }

    /// Must be called after expansion state, columns, or row geometry
    /// changed behind the renderer's back.
    pub fn on_layout_changed(&mut self) {
        tracing::debug!(target: "dataview_renderer::renderer", "layout changed");
        self.first_visible.invalidate();
        self.recount();
    }

    pub(crate) fn recount(&mut self) {
        let rows = self.row_count();
        let width = total_width(&self.columns);
        self.viewport.set_content(rows, width);
        tracing::trace!(
            target: "dataview_renderer::renderer",
            rows,
            width,
            iterations = self.viewport.layout().iterations,
            "recounted"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use dataview_model::{HierarchyProvider, TreeStore, Value};

    pub(crate) fn sample() -> (TreeModelRenderer<TreeStore>, [ItemId; 5]) {
        let mut store = TreeStore::new(1);
        let root = store.root_item();
        let a = store.append(&root, [Value::from("A")].into());
        let a1 = store.append(&a, [Value::from("A1")].into());
        let a2 = store.append(&a, [Value::from("A2")].into());
        let a3 = store.append(&a, [Value::from("A3")].into());
        let b = store.append(&root, [Value::from("B")].into());
        let mut renderer = TreeModelRenderer::new(RendererConfig::default());
        renderer.columns_mut().push(Column::new("Name", 0, 100.0));
        renderer.set_model(store);
        renderer.set_size(Size::new(200.0, 100.0));
        (renderer, [a, a1, a2, a3, b])
    }

    #[test]
    fn collapsed_tree_counts_top_level_rows() {
        let (mut renderer, [a, ..]) = sample();
        assert_eq!(renderer.row_count(), 2);
        renderer.state_mut().expand(&a, true);
        assert_eq!(renderer.viewport().rows(), 2);
        renderer.on_layout_changed();
        assert_eq!(renderer.viewport().rows(), 5);
    }

    #[test]
    fn model_replacement_resets_state() {
        let (mut renderer, [a, ..]) = sample();
        renderer.state_mut().select(&a, true);
        let old = renderer.set_model(TreeStore::new(1));
        assert!(old.is_some());
        assert!(renderer.state().selected_items().is_empty());
        assert_eq!(renderer.row_count(), 0);
        assert!(renderer.take_model().is_some());
        assert!(renderer.model().is_none());
    }

    #[test]
    fn removed_focus_is_dropped() {
        let (mut renderer, [a, a1, ..]) = sample();
        renderer.state_mut().expand(&a, true);
        renderer.state_mut().set_focus(Some(a1));
        if let Some(model) = renderer.model_mut() {
            model.remove(&a1);
        }
        renderer.on_data_model_changed();
        assert_eq!(renderer.focused_item(), None);
        assert_eq!(renderer.row_count(), 4);
    }

    #[test]
    fn removed_items_leave_the_selection() {
        let (mut renderer, [a, a1, _, _, b]) = sample();
        renderer.state_mut().expand(&a, true);
        renderer.on_layout_changed();
        renderer.state_mut().select_list(&[a1, b], true);
        let reported = alloc::rc::Rc::new(core::cell::Cell::new(0));
        let seen = reported.clone();
        renderer.add_listener(move |n| {
            if let Notification::SelectionChanged { selected } = n {
                seen.set(selected.len());
            }
            Response::Allow
        });
        if let Some(model) = renderer.model_mut() {
            model.remove(&a);
        }
        renderer.on_data_model_changed();
        assert_eq!(renderer.state().selected_items(), [b]);
        assert_eq!(reported.get(), 1);
    }
}
