// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selection, focus, and check marks.

use alloc::vec::Vec;

use dataview_model::{CheckState, DataModel, ItemFlags, ItemId, traverse};
use dataview_state::{StateModel, visible_range};

use super::TreeModelRenderer;
use crate::notify::Notification;

/// How [`TreeModelRenderer::perform_selection`] changes the selection.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SelectionMode {
    /// Select only the item.
    Replace,
    /// Add the item, or remove it if already selected, keeping the rest.
    Toggle,
    /// Select the shown items between the anchor and the item.
    Extend,
    /// Deselect everything.
    Clear,
}

impl<M, S> TreeModelRenderer<M, S>
where
    M: DataModel,
    S: StateModel,
{
    fn selectable(&self, id: &ItemId) -> bool {
        self.model.as_ref().is_some_and(|model| {
            let field = self.columns.get(self.config.tree_column).map_or(0, |c| c.field);
            self.state.is_enabled(id)
                && model.item_flags(id, field).contains(ItemFlags::SELECTABLE)
                && traverse::is_reachable(model, &self.state, id)
                && !(id.is_root() && self.config.hidden_ranks() > 0)
        })
    }

    /// Changes the selection according to `mode`.
    ///
    /// The prospective selection is computed first and announced with a
    /// vetoable [`SelectionChanging`](Notification::SelectionChanging). It is
    /// committed only if nobody vetoes, and then announced again with
    /// [`SelectionChanged`](Notification::SelectionChanged). Returns `false`
    /// if the selection did not change.
    ///
    /// `id` is ignored by [`SelectionMode::Clear`]. [`SelectionMode::Extend`]
    /// ranges from the anchor, which every other mode moves to `id`.
    pub fn perform_selection(&mut self, id: Option<&ItemId>, mode: SelectionMode) -> bool {
        let Some(model) = self.model.as_ref() else {
            return false;
        };
        let old = self.state.selected_items();
        let mut new = match (mode, id) {
            (SelectionMode::Clear, _) => Vec::new(),
            (_, None) => return false,
            (SelectionMode::Replace, Some(id)) => alloc::vec![*id],
            (SelectionMode::Toggle, Some(id)) => {
                let mut set = old.clone();
                match set.binary_search(id) {
                    Ok(index) => {
                        set.remove(index);
                    }
                    Err(index) => set.insert(index, *id),
                }
                set
            }
            (SelectionMode::Extend, Some(id)) => {
                let anchor = self.anchor.or(self.state.focused()).unwrap_or(*id);
                visible_range(model, &self.state, &anchor, id)
            }
        };
        new.retain(|item| self.selectable(item) || old.binary_search(item).is_ok());
        new.sort_unstable();
        new.dedup();
        if new == old {
            return false;
        }
        if !self.listeners.send(&Notification::SelectionChanging {
            old: &old,
            new: &new,
        }) {
            return false;
        }
        self.state.deselect_all();
        self.state.select_list(&new, true);
        if mode != SelectionMode::Extend {
            self.anchor = id.copied();
        }
        tracing::debug!(
            target: "dataview_renderer::selection",
            ?mode,
            before = old.len(),
            after = new.len(),
            "selection changed"
        );
        self.listeners
            .send(&Notification::SelectionChanged { selected: &new });
        true
    }

    /// Selects every shown item.
    pub fn select_all(&mut self) -> bool {
        let Some(model) = self.model.as_ref() else {
            return false;
        };
        let root = model.root_item();
        let Some(first) = traverse::next_item(model, &self.state, &root, 1) else {
            return false;
        };
        let last = traverse::last_descendent(model, &self.state, &root).id;
        let anchor = self.anchor;
        self.anchor = Some(first);
        let changed = self.perform_selection(Some(&last), SelectionMode::Extend);
        self.anchor = anchor;
        changed
    }

    /// The anchor of range selections.
    pub fn anchor(&self) -> Option<ItemId> {
        self.anchor
    }

    /// Moves keyboard focus to `id`, or removes it.
    ///
    /// Only shown items can take focus. Returns `true` if focus moved.
    pub fn set_focus(&mut self, id: Option<ItemId>) -> bool {
        let Some(model) = self.model.as_ref() else {
            return false;
        };
        if let Some(target) = id
            && (!traverse::is_reachable(model, &self.state, &target)
                || (target.is_root() && self.config.hidden_ranks() > 0))
        {
            return false;
        }
        let old = self.state.focused();
        if !self.state.set_focus(id) {
            return false;
        }
        self.listeners
            .send(&Notification::FocusChanged { old, new: id });
        true
    }

    /// Sets the check state of `id` and its subtree, then recomputes its
    /// ancestors. Vetoable through
    /// [`CheckChanging`](Notification::CheckChanging).
    pub fn set_check(&mut self, id: &ItemId, check: CheckState) -> bool {
        let Some(model) = self.model.as_ref() else {
            return false;
        };
        let field = self.columns.get(self.config.tree_column).map_or(0, |c| c.field);
        if !model.item_flags(id, field).contains(ItemFlags::CHECKABLE)
            || !self.state.is_enabled(id)
            || self.state.check_state(id) == check
        {
            return false;
        }
        if !self
            .listeners
            .send(&Notification::CheckChanging { item: *id, check })
        {
            return false;
        }
        self.state.set_check_recursive(model, id, check);
        self.state.update_parent_checks(model, id);
        self.listeners
            .send(&Notification::CheckChanged { item: *id, check });
        true
    }

    /// Flips the check mark of `id`. Undetermined items become checked.
    pub fn toggle_check(&mut self, id: &ItemId) -> bool {
        let next = self.state.check_state(id).toggled();
        self.set_check(id, next)
    }
}
