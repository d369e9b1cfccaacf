// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer input.

use dataview_model::DataModel;
use dataview_state::StateModel;
use kurbo::Point;

use super::{HitFlags, Modifiers, SelectionMode, TreeModelRenderer};
use crate::notify::Notification;

impl<M, S> TreeModelRenderer<M, S>
where
    M: DataModel,
    S: StateModel,
{
    /// Handles a primary button press at the client-space `point`.
    ///
    /// Expanders toggle their item and check boxes toggle their mark.
    /// Anywhere else on a row the press focuses the item and applies the
    /// selection policy of `modifiers`. A plain press on the already focused
    /// item starts editing the cell under the pointer. A press below the last
    /// row clears the selection.
    ///
    /// Returns `true` if anything changed.
    pub fn on_mouse_down(&mut self, point: Point, modifiers: Modifiers) -> bool {
        let Some(hit) = self.hit_test(point, false) else {
            if modifiers.is_empty() {
                return self.perform_selection(None, SelectionMode::Clear);
            }
            return false;
        };
        if hit.has(HitFlags::ON_EXPANDER) {
            return self.toggle_expansion(&hit.item);
        }
        if hit.has(HitFlags::ON_CHECKBOX) {
            return self.toggle_check(&hit.item);
        }
        let old = self.state.focused();
        let was_focused = old == Some(hit.item);
        let focused = self.set_focus(Some(hit.item));
        let mode = if modifiers.contains(Modifiers::SHIFT) {
            // The range starts at the item focused before the press.
            self.anchor = self.anchor.or(old);
            SelectionMode::Extend
        } else if modifiers.contains(Modifiers::CONTROL) {
            SelectionMode::Toggle
        } else {
            SelectionMode::Replace
        };
        let selected = self.perform_selection(Some(&hit.item), mode);
        let edited = modifiers.is_empty()
            && was_focused
            && !hit.has(HitFlags::ON_MARGIN)
            && self.start_edition(&hit.item, hit.column);
        focused || selected || edited
    }

    /// Handles a double click: activates the item under `point`.
    pub fn on_double_click(&mut self, point: Point) -> bool {
        let Some(hit) = self.hit_test(point, false) else {
            return false;
        };
        if hit.has(HitFlags::ON_EXPANDER) || hit.has(HitFlags::ON_CHECKBOX) {
            return false;
        }
        self.listeners.send(&Notification::ItemActivated {
            item: hit.item,
            column: hit.column,
        });
        true
    }
}
