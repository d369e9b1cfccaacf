// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only view of per-item UI state consumed by traversal.

use crate::ItemId;

/// Tri-state check mark.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckState {
    /// Not checked.
    #[default]
    Unchecked,
    /// Checked.
    Checked,
    /// Partially checked (some descendants checked).
    Undetermined,
}

impl CheckState {
    /// Next state when the user toggles the check box.
    ///
    /// Undetermined items become checked.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Checked => Self::Unchecked,
            Self::Unchecked | Self::Undetermined => Self::Checked,
        }
    }
}

/// Per-item transient state, independent of the data model.
///
/// Traversal only consults [`StateProvider::is_expanded`]: a node that is not
/// expanded is navigated as a leaf. The root item is always treated as
/// expanded by the traversal functions, whatever this returns for it.
pub trait StateProvider {
    /// Whether the item is selected.
    fn is_selected(&self, id: &ItemId) -> bool;
    /// Whether the item's children are shown.
    fn is_expanded(&self, id: &ItemId) -> bool;
    /// Check state of the item.
    fn check_state(&self, id: &ItemId) -> CheckState;
    /// Whether the item is the focused item.
    fn is_focused(&self, id: &ItemId) -> bool;
    /// Whether the item accepts interaction.
    fn is_enabled(&self, id: &ItemId) -> bool;
}

/// A state view in which every node is expanded and nothing else is set.
///
/// Passing this where a state view is expected walks the whole tree. It plays
/// the part of "no state model".
#[derive(Copy, Clone, Debug, Default)]
pub struct FullyExpanded;

impl StateProvider for FullyExpanded {
    fn is_selected(&self, _id: &ItemId) -> bool {
        false
    }

    fn is_expanded(&self, _id: &ItemId) -> bool {
        true
    }

    fn check_state(&self, _id: &ItemId) -> CheckState {
        CheckState::Unchecked
    }

    fn is_focused(&self, _id: &ItemId) -> bool {
        false
    }

    fn is_enabled(&self, _id: &ItemId) -> bool {
        true
    }
}
