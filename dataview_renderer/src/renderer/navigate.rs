// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard navigation.

use dataview_model::{DataModel, ItemId, traverse};
use dataview_state::StateModel;
use dataview_viewport::ScrollAlign;

use super::{SelectionMode, TreeModelRenderer};

/// A keyboard navigation intent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Navigation {
    /// Previous shown item.
    Up,
    /// Next shown item.
    Down,
    /// One page up, or the first item.
    PageUp,
    /// One page down, or the last item.
    PageDown,
    /// First shown item.
    Home,
    /// Last shown item.
    End,
    /// Collapse the focused item, or move to its parent if it is collapsed
    /// or a leaf.
    Left,
    /// Expand the focused item, or move to its first child if it is already
    /// expanded.
    Right,
}

bitflags::bitflags! {
    /// Keyboard modifiers held during navigation or a click.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Extend the selection from the anchor.
        const SHIFT   = 0b01;
        /// Move focus or toggle single items without replacing the selection.
        const CONTROL = 0b10;
    }
}

enum Step {
    Expand(ItemId),
    Collapse(ItemId),
    Focus(ItemId),
}

impl<M, S> TreeModelRenderer<M, S>
where
    M: DataModel,
    S: StateModel,
{
    fn step_for(&self, nav: Navigation) -> Option<Step> {
        let model = self.model.as_ref()?;
        let state = &self.state;
        let hides_root = self.config.hidden_ranks() > 0;
        let shown = |id: ItemId| !(hides_root && id.is_root());
        let root = model.root_item();
        let first = if hides_root {
            traverse::next_item(model, state, &root, 1)
        } else {
            Some(root)
        };
        let last = Some(traverse::last_descendent(model, state, &root).id).filter(|id| shown(*id));
        let Some(focused) = state.focused() else {
            return match nav {
                Navigation::End => last,
                _ => first,
            }
            .map(Step::Focus);
        };
        let page = self.viewport.vertical().page().max(1);
        let target = match nav {
            Navigation::Down => traverse::next_item(model, state, &focused, 1),
            Navigation::Up => traverse::prev_item(model, state, &focused, 1).filter(|id| shown(*id)),
            Navigation::PageDown => traverse::next_item(model, state, &focused, page).or(last),
            Navigation::PageUp => traverse::prev_item(model, state, &focused, page)
                .filter(|id| shown(*id))
                .or(first),
            Navigation::Home => first,
            Navigation::End => last,
            Navigation::Left => {
                if state.is_expanded(&focused) && model.child_count(&focused) > 0 {
                    return Some(Step::Collapse(focused));
                }
                model.parent(&focused).valid().filter(|id| shown(*id))
            }
            Navigation::Right => {
                if model.child_count(&focused) == 0 {
                    return None;
                }
                if !state.is_expanded(&focused) && !focused.is_root() {
                    return Some(Step::Expand(focused));
                }
                model.child(&focused, 0).valid()
            }
        };
        target.filter(|t| *t != focused).map(Step::Focus)
    }

    /// Applies a navigation intent to the focused item.
    ///
    /// Plain moves select the new focus, [`Modifiers::SHIFT`] extends the
    /// selection from the anchor, and [`Modifiers::CONTROL`] only moves
    /// focus. The new focus is scrolled into view. Returns `true` if focus
    /// moved or an item was expanded or collapsed.
    pub fn navigate(&mut self, nav: Navigation, modifiers: Modifiers) -> bool {
        match self.step_for(nav) {
            None => false,
            Some(Step::Expand(id)) => self.expand(&id),
            Some(Step::Collapse(id)) => self.collapse(&id),
            Some(Step::Focus(id)) => self.move_focus(id, modifiers),
        }
    }

    fn move_focus(&mut self, id: ItemId, modifiers: Modifiers) -> bool {
        let old = self.state.focused();
        if !self.set_focus(Some(id)) {
            return false;
        }
        if modifiers.contains(Modifiers::SHIFT) {
            if self.anchor.is_none() {
                self.anchor = old;
            }
            self.perform_selection(Some(&id), SelectionMode::Extend);
        } else if !modifiers.contains(Modifiers::CONTROL) {
            self.perform_selection(Some(&id), SelectionMode::Replace);
        }
        self.ensure_visible(&id, ScrollAlign::Nearest);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::tests::sample;
    use dataview_model::StateProvider;
    use kurbo::Size;

    #[test]
    fn arrows_walk_and_extend() {
        let (mut renderer, [a, a1, a2, a3, b]) = sample();
        renderer.expand(&a);
        assert!(renderer.navigate(Navigation::Down, Modifiers::empty()));
        assert_eq!(renderer.focused_item(), Some(a));
        assert!(renderer.navigate(Navigation::Down, Modifiers::empty()));
        assert_eq!(renderer.state().selected_items(), [a1]);
        renderer.navigate(Navigation::Down, Modifiers::SHIFT);
        renderer.navigate(Navigation::Down, Modifiers::SHIFT);
        assert_eq!(renderer.focused_item(), Some(a3));
        let mut range = alloc::vec![a1, a2, a3];
        range.sort();
        assert_eq!(renderer.state().selected_items(), range);
        assert!(renderer.navigate(Navigation::Down, Modifiers::CONTROL));
        assert_eq!(renderer.focused_item(), Some(b));
        assert_eq!(renderer.state().selected_items(), range);
        assert!(!renderer.navigate(Navigation::Down, Modifiers::empty()));
        assert!(!renderer.navigate(Navigation::Left, Modifiers::empty()));
    }

    #[test]
    fn left_and_right_fold() {
        let (mut renderer, [a, a1, ..]) = sample();
        assert!(renderer.navigate(Navigation::Home, Modifiers::empty()));
        assert!(renderer.navigate(Navigation::Right, Modifiers::empty()));
        assert!(renderer.state().is_expanded(&a));
        assert!(renderer.navigate(Navigation::Right, Modifiers::empty()));
        assert_eq!(renderer.focused_item(), Some(a1));
        assert!(renderer.navigate(Navigation::Left, Modifiers::empty()));
        assert_eq!(renderer.focused_item(), Some(a));
        assert!(renderer.navigate(Navigation::Left, Modifiers::empty()));
        assert!(!renderer.state().is_expanded(&a));
    }

    #[test]
    fn pages_clamp_to_the_ends() {
        let (mut renderer, [a, _, a2, _, b]) = sample();
        renderer.expand(&a);
        renderer.set_size(Size::new(200.0, 40.0));
        renderer.navigate(Navigation::Home, Modifiers::empty());
        assert!(renderer.navigate(Navigation::PageDown, Modifiers::empty()));
        assert_eq!(renderer.focused_item(), Some(a2));
        assert!(renderer.navigate(Navigation::PageDown, Modifiers::empty()));
        assert_eq!(renderer.focused_item(), Some(b));
        assert_eq!(renderer.first_visible_item().map(|f| f != a), Some(true));
        assert!(renderer.navigate(Navigation::PageUp, Modifiers::empty()));
        assert!(renderer.navigate(Navigation::PageUp, Modifiers::empty()));
        assert_eq!(renderer.focused_item(), Some(a));
        assert!(renderer.navigate(Navigation::End, Modifiers::empty()));
        assert_eq!(renderer.focused_item(), Some(b));
    }
}
