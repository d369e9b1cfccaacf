// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sparse state store keyed by item id.
//!
//! Only items with at least one state bit set own an entry; clearing the
//! last bit drops it.

use alloc::vec::Vec;

use dataview_model::{CheckState, ItemId, StateProvider};
use hashbrown::HashMap;

use crate::StateModel;

bitflags::bitflags! {
    /// Packed state bits of one item.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ItemState: u8 {
        /// Selected.
        const SELECTED     = 0b0000_0001;
        /// Children shown.
        const EXPANDED     = 0b0000_0010;
        /// Check box checked.
        const CHECKED      = 0b0000_0100;
        /// Check box partially checked.
        const UNDETERMINED = 0b0000_1000;
        /// Interaction disabled.
        const DISABLED     = 0b0001_0000;
    }
}

impl ItemState {
    fn check(self) -> CheckState {
        if self.contains(Self::UNDETERMINED) {
            CheckState::Undetermined
        } else if self.contains(Self::CHECKED) {
            CheckState::Checked
        } else {
            CheckState::Unchecked
        }
    }

    fn with_check(self, check: CheckState) -> Self {
        let base = self - (Self::CHECKED | Self::UNDETERMINED);
        match check {
            CheckState::Unchecked => base,
            CheckState::Checked => base | Self::CHECKED,
            CheckState::Undetermined => base | Self::UNDETERMINED,
        }
    }
}

/// Hash map backed [`StateModel`].
///
/// Only items with non-default state occupy an entry, so memory follows the
/// number of touched items rather than the size of the tree.
#[derive(Clone, Debug, Default)]
pub struct HashStateModel {
    items: HashMap<ItemId, ItemState>,
    focused: Option<ItemId>,
}

impl HashStateModel {
    /// Creates an empty state store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Packed state of one item.
    #[must_use]
    pub fn state(&self, id: &ItemId) -> ItemState {
        self.items.get(id).copied().unwrap_or_default()
    }

    /// Number of items with non-default state.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when no item carries state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.focused.is_none()
    }

    fn update(&mut self, id: &ItemId, f: impl FnOnce(ItemState) -> ItemState) -> bool {
        if !id.is_valid() {
            return false;
        }
        let key = id.without_child_index();
        let old = self.state(&key);
        let new = f(old);
        if old == new {
            return false;
        }
        if new.is_empty() {
            self.items.remove(&key);
        } else {
            self.items.insert(key, new);
        }
        true
    }
}

impl StateProvider for HashStateModel {
    fn is_selected(&self, id: &ItemId) -> bool {
        self.state(id).contains(ItemState::SELECTED)
    }

    fn is_expanded(&self, id: &ItemId) -> bool {
        self.state(id).contains(ItemState::EXPANDED)
    }

    fn check_state(&self, id: &ItemId) -> CheckState {
        self.state(id).check()
    }

    fn is_focused(&self, id: &ItemId) -> bool {
        self.focused.as_ref() == Some(id)
    }

    fn is_enabled(&self, id: &ItemId) -> bool {
        !self.state(id).contains(ItemState::DISABLED)
    }
}

impl StateModel for HashStateModel {
    fn select(&mut self, id: &ItemId, selected: bool) -> bool {
        self.update(id, |mut s| {
            s.set(ItemState::SELECTED, selected);
            s
        })
    }

    fn deselect_all(&mut self) -> bool {
        let before = self.items.len();
        let mut changed = false;
        self.items.retain(|_, s| {
            if s.contains(ItemState::SELECTED) {
                changed = true;
                s.remove(ItemState::SELECTED);
            }
            !s.is_empty()
        });
        tracing::trace!(
            target: "dataview_state",
            removed = before - self.items.len(),
            "deselected all"
        );
        changed
    }

    fn expand(&mut self, id: &ItemId, expanded: bool) -> bool {
        self.update(id, |mut s| {
            s.set(ItemState::EXPANDED, expanded);
            s
        })
    }

    fn set_check(&mut self, id: &ItemId, check: CheckState) -> bool {
        self.update(id, |s| s.with_check(check))
    }

    fn set_focus(&mut self, id: Option<ItemId>) -> bool {
        let id = id.filter(ItemId::is_valid).map(ItemId::without_child_index);
        if self.focused == id {
            return false;
        }
        self.focused = id;
        true
    }

    fn focused(&self) -> Option<ItemId> {
        self.focused
    }

    fn enable(&mut self, id: &ItemId, enabled: bool) -> bool {
        self.update(id, |mut s| {
            s.set(ItemState::DISABLED, !enabled);
            s
        })
    }

    fn selected_items(&self) -> Vec<ItemId> {
        let mut out: Vec<ItemId> = self
            .items
            .iter()
            .filter(|(_, s)| s.contains(ItemState::SELECTED))
            .map(|(id, _)| *id)
            .collect();
        out.sort_unstable();
        out
    }

    fn clear(&mut self) {
        tracing::debug!(target: "dataview_state", items = self.items.len(), "state cleared");
        self.items.clear();
        self.focused = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataview_model::{HierarchyProvider, TreeStore};

    #[test]
    fn mutators_report_changes() {
        let mut store = TreeStore::new(1);
        let root = store.root_item();
        let a = store.append(&root, alloc::vec!["a".into()]);
        let mut s = HashStateModel::new();
        assert!(s.select(&a, true));
        assert!(!s.select(&a, true));
        assert!(s.is_selected(&a));
        assert!(s.expand(&a, true));
        assert!(!s.expand(&a, true));
        assert!(s.set_check(&a, CheckState::Undetermined));
        assert_eq!(s.check_state(&a), CheckState::Undetermined);
        assert!(s.set_check(&a, CheckState::Checked));
        assert_eq!(s.check_state(&a), CheckState::Checked);
        assert!(s.enable(&a, false));
        assert!(!s.is_enabled(&a));
        assert!(s.deselect_all());
        assert!(!s.deselect_all());
        assert!(!s.is_selected(&a));
    }

    #[test]
    fn entries_vanish_when_default() {
        let mut store = TreeStore::new(1);
        let root = store.root_item();
        let a = store.append(&root, alloc::vec!["a".into()]);
        let mut s = HashStateModel::new();
        s.select(&a, true);
        s.expand(&a, true);
        assert_eq!(s.len(), 1);
        s.select(&a, false);
        s.expand(&a, false);
        assert_eq!(s.len(), 0);
        assert!(!s.select(&ItemId::INVALID, true));
    }

    #[test]
    fn single_focus() {
        let mut store = TreeStore::new(1);
        let root = store.root_item();
        let a = store.append(&root, alloc::vec!["a".into()]);
        let b = store.append(&root, alloc::vec!["b".into()]);
        let mut s = HashStateModel::new();
        assert!(s.set_focus(Some(a)));
        assert!(!s.set_focus(Some(a)));
        assert!(s.set_focus(Some(b)));
        assert!(!s.is_focused(&a));
        assert!(s.is_focused(&b));
        assert!(s.set_focus(None));
        assert_eq!(s.focused(), None);
    }
}
