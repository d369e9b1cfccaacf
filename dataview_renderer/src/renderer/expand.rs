// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Expanding and collapsing.

use core::cmp::Ordering;

use dataview_model::{DataModel, HierarchyProvider, ItemId, StateProvider, traverse};
use dataview_state::StateModel;

use super::TreeModelRenderer;
use crate::notify::Notification;

fn signed_delta(after: usize, before: usize) -> isize {
    if after >= before {
        isize::try_from(after - before).unwrap_or(isize::MAX)
    } else {
        isize::try_from(before - after).map_or(isize::MIN, |d| -d)
    }
}

/// Closest item at or above `id` whose ancestors are all expanded.
fn nearest_shown<M>(model: &M, state: &dyn StateProvider, id: &ItemId) -> Option<ItemId>
where
    M: HierarchyProvider + ?Sized,
{
    let mut cur = *id;
    while cur.is_valid() {
        if traverse::is_reachable(model, state, &cur) {
            return Some(cur);
        }
        cur = model.parent(&cur);
    }
    None
}

impl<M, S> TreeModelRenderer<M, S>
where
    M: DataModel,
    S: StateModel,
{
    /// Expands `id`. See [`collapse_or_expand`](Self::collapse_or_expand).
    pub fn expand(&mut self, id: &ItemId) -> bool {
        self.collapse_or_expand(id, true, false)
    }

    /// Collapses `id`. See [`collapse_or_expand`](Self::collapse_or_expand).
    pub fn collapse(&mut self, id: &ItemId) -> bool {
        self.collapse_or_expand(id, false, false)
    }

    /// Flips the expansion of `id`.
    pub fn toggle_expansion(&mut self, id: &ItemId) -> bool {
        let expanded = self.state.is_expanded(id);
        self.collapse_or_expand(id, !expanded, false)
    }

    /// Expands or collapses `id`, or its whole subtree when `recursive`.
    ///
    /// Returns `false` without notifying anybody when nothing would change,
    /// and `false` after the *expanding*/*collapsing* notification when a
    /// listener vetoed it. The root never collapses.
    ///
    /// A single toggle adjusts the row count by the size difference of the
    /// subtree and keeps the top row on the same item whenever that item is
    /// still shown. If focus sat inside a collapsing subtree it moves to the
    /// collapsing item.
    pub fn collapse_or_expand(&mut self, id: &ItemId, expand: bool, recursive: bool) -> bool {
        let Some(model) = self.model.as_ref() else {
            return false;
        };
        if !id.is_valid() || id.model() != model.model_id() {
            return false;
        }
        if !recursive && (id.is_root() || self.state.is_expanded(id) == expand) {
            return false;
        }
        if recursive
            && dataview_state::subtree(model, id)
                .iter()
                .all(|n| self.state.is_expanded(n) == expand)
        {
            return false;
        }
        let notification = if expand {
            Notification::ItemExpanding(*id)
        } else {
            Notification::ItemCollapsing(*id)
        };
        if !self.listeners.send(&notification) {
            return false;
        }
        let changed = if recursive {
            self.toggle_subtree(id, expand)
        } else {
            self.toggle_one(id, expand);
            true
        };
        if !changed {
            return false;
        }
        tracing::debug!(target: "dataview_renderer::expand", ?id, expand, recursive, "toggled");
        self.listeners.send(&if expand {
            Notification::ItemExpanded(*id)
        } else {
            Notification::ItemCollapsed(*id)
        });
        true
    }

    /// Expands `id` and all of its descendants.
    pub fn expand_all(&mut self, id: &ItemId) -> bool {
        self.collapse_or_expand(id, true, true)
    }

    /// Collapses `id` and all of its descendants.
    pub fn collapse_all(&mut self, id: &ItemId) -> bool {
        self.collapse_or_expand(id, false, true)
    }

    fn toggle_one(&mut self, id: &ItemId, expand: bool) {
        let first = self.first_visible_pos().map(|p| p.id);
        let hidden = self.config.hidden_ranks();
        let Some(model) = self.model.as_ref() else {
            return;
        };
        let shown = traverse::is_reachable(model, &self.state, id);
        let before = model.subtree_size(id, &self.state);
        self.state.expand(id, expand);
        let after = model.subtree_size(id, &self.state);
        if shown {
            let delta = signed_delta(after, before);
            let mut first_row = self.viewport.first_row();
            match first {
                Some(first) if !expand && traverse::is_ancestor(model, id, &first) => {
                    self.first_visible.invalidate();
                    if let Some(rank) = model.item_rank(id, &self.state) {
                        first_row = rank.saturating_sub(hidden);
                    }
                }
                Some(first) if traverse::compare_position(model, id, &first) == Ordering::Less => {
                    self.first_visible.shift(delta);
                    first_row = first_row.saturating_add_signed(delta);
                }
                _ => {}
            }
            self.viewport.adjust_rows(delta);
            self.viewport.set_first_row(first_row);
            tracing::trace!(
                target: "dataview_renderer::expand",
                delta,
                first_row,
                rows = self.viewport.rows(),
                "row count adjusted"
            );
        }
        self.refocus_shown();
    }

    fn toggle_subtree(&mut self, id: &ItemId, expand: bool) -> bool {
        let first = self.first_visible_pos().map(|p| p.id);
        let hidden = self.config.hidden_ranks();
        let Some(model) = self.model.as_ref() else {
            return false;
        };
        if !self.state.expand_recursive(model, id, expand) {
            return false;
        }
        let first_row = first
            .and_then(|f| nearest_shown(model, &self.state, &f))
            .and_then(|f| model.item_rank(&f, &self.state))
            .map(|rank| rank.saturating_sub(hidden));
        self.first_visible.invalidate();
        self.recount();
        if let Some(row) = first_row {
            self.viewport.set_first_row(row);
        }
        self.refocus_shown();
        true
    }

    /// Moves focus and anchor out of collapsed subtrees and cancels an
    /// edition that went out of view.
    fn refocus_shown(&mut self) {
        if let Some((item, _)) = self.editing()
            && self
                .model
                .as_ref()
                .is_some_and(|m| !traverse::is_reachable(m, &self.state, &item))
        {
            self.end_edition(true, true);
        }
        let Some(model) = self.model.as_ref() else {
            return;
        };
        if let Some(anchor) = self.anchor
            && !traverse::is_reachable(model, &self.state, &anchor)
        {
            self.anchor = nearest_shown(model, &self.state, &anchor);
        }
        let Some(focused) = self.state.focused() else {
            return;
        };
        if traverse::is_reachable(model, &self.state, &focused) {
            return;
        }
        let target = nearest_shown(model, &self.state, &focused)
            .filter(|t| !(t.is_root() && self.config.hidden_ranks() > 0));
        self.state.set_focus(target);
        tracing::debug!(target: "dataview_renderer::expand", ?focused, ?target, "focus left a collapsed subtree");
        self.listeners.send(&Notification::FocusChanged {
            old: Some(focused),
            new: target,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Response;
    use crate::renderer::tests::sample;
    use alloc::rc::Rc;
    use core::cell::Cell;
    use kurbo::Size;

    #[test]
    fn deltas() {
        assert_eq!(signed_delta(5, 2), 3);
        assert_eq!(signed_delta(2, 5), -3);
        assert_eq!(signed_delta(4, 4), 0);
    }

    #[test]
    fn toggles_are_idempotent() {
        let (mut renderer, [a, ..]) = sample();
        let events = Rc::new(Cell::new(0));
        let seen = events.clone();
        renderer.add_listener(move |_| {
            seen.set(seen.get() + 1);
            Response::Allow
        });
        assert!(renderer.expand(&a));
        assert_eq!(events.get(), 2);
        assert_eq!(renderer.viewport().rows(), 5);
        assert!(!renderer.expand(&a));
        assert_eq!(events.get(), 2);
        assert!(renderer.collapse(&a));
        assert!(!renderer.collapse(&a));
        assert_eq!(events.get(), 4);
        assert_eq!(renderer.viewport().rows(), 2);
    }

    #[test]
    fn veto_keeps_state() {
        let (mut renderer, [a, ..]) = sample();
        renderer.add_listener(|n| match n {
            Notification::ItemExpanding(_) => Response::Veto,
            _ => Response::Allow,
        });
        assert!(!renderer.expand(&a));
        assert!(!renderer.state().is_expanded(&a));
        assert_eq!(renderer.viewport().rows(), 2);
    }

    #[test]
    fn top_row_stays_on_its_item() {
        let (mut renderer, [a, _, _, a3, b]) = sample();
        // One row per page.
        renderer.set_size(Size::new(200.0, 20.0));
        assert!(renderer.expand(&a));
        // Rows: A A1 A2 A3 B.
        renderer.scroll_to_row(3);
        assert_eq!(renderer.first_visible_item(), Some(a3));
        // Collapsing the node holding the top row moves the top row to it.
        assert!(renderer.collapse(&a));
        assert_eq!(renderer.first_visible_item(), Some(a));
        assert!(renderer.expand(&a));
        renderer.scroll_to_row(4);
        assert_eq!(renderer.first_visible_item(), Some(b));
        // Toggles above the top row shift it by the subtree delta.
        assert!(renderer.collapse(&a));
        assert_eq!(renderer.viewport().first_row(), 1);
        assert_eq!(renderer.first_visible_item(), Some(b));
        assert!(renderer.expand(&a));
        assert_eq!(renderer.viewport().first_row(), 4);
        assert_eq!(renderer.first_visible_item(), Some(b));
    }

    #[test]
    fn recursive_toggle_recounts() {
        let (mut renderer, [a, ..]) = sample();
        let root = renderer.model().map(|m| m.root_item()).unwrap();
        assert!(renderer.expand_all(&root));
        assert_eq!(renderer.viewport().rows(), 5);
        assert!(renderer.collapse_all(&a));
        assert_eq!(renderer.viewport().rows(), 2);
        assert!(!renderer.collapse_all(&a));
    }

    #[test]
    fn recursive_no_op_is_silent() {
        let (mut renderer, [a, ..]) = sample();
        let events = Rc::new(Cell::new(0));
        let seen = events.clone();
        renderer.add_listener(move |_| {
            seen.set(seen.get() + 1);
            Response::Allow
        });
        assert!(!renderer.collapse_all(&a));
        assert_eq!(events.get(), 0);
        assert!(renderer.expand_all(&a));
        assert_eq!(events.get(), 2);
        assert!(!renderer.expand_all(&a));
        assert_eq!(events.get(), 2);
    }
}
