// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change notifications and their listeners.
//!
//! Every user-visible mutation is announced. *Changing* notifications are
//! sent before the mutation and may be vetoed; *changed* notifications are
//! informational and sent after it.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use dataview_model::{CheckState, ItemId, Value};

/// A notification sent by the renderer.
#[derive(Clone, Debug, PartialEq)]
pub enum Notification<'a> {
    /// `item` is about to expand. Vetoable.
    ItemExpanding(ItemId),
    /// `item` expanded.
    ItemExpanded(ItemId),
    /// `item` is about to collapse. Vetoable.
    ItemCollapsing(ItemId),
    /// `item` collapsed.
    ItemCollapsed(ItemId),
    /// The selection is about to change from `old` to `new`. Vetoable.
    SelectionChanging {
        /// Current selection, in identifier order.
        old: &'a [ItemId],
        /// Prospective selection, in identifier order.
        new: &'a [ItemId],
    },
    /// The selection changed.
    SelectionChanged {
        /// New selection, in identifier order.
        selected: &'a [ItemId],
    },
    /// Keyboard focus moved.
    FocusChanged {
        /// Previously focused item.
        old: Option<ItemId>,
        /// Newly focused item.
        new: Option<ItemId>,
    },
    /// The check state of `item` is about to change. Vetoable.
    CheckChanging {
        /// The item.
        item: ItemId,
        /// Prospective state.
        check: CheckState,
    },
    /// The check state of `item` changed.
    CheckChanged {
        /// The item.
        item: ItemId,
        /// New state.
        check: CheckState,
    },
    /// An edition is about to start. Vetoable.
    EditingStarting {
        /// Edited item.
        item: ItemId,
        /// View column.
        column: usize,
    },
    /// An edition started.
    EditingStarted {
        /// Edited item.
        item: ItemId,
        /// View column.
        column: usize,
    },
    /// An edited value is about to be written to the model. Vetoable.
    ValueChanging {
        /// Edited item.
        item: ItemId,
        /// Model field.
        field: usize,
        /// Value about to be written.
        value: &'a Value,
    },
    /// An edited value was written to the model.
    ValueChanged {
        /// Edited item.
        item: ItemId,
        /// Model field.
        field: usize,
    },
    /// An edition ended.
    EditingEnded {
        /// Edited item.
        item: ItemId,
        /// View column.
        column: usize,
        /// Nothing was written to the model.
        cancelled: bool,
        /// The edition was resolved because another one started or the
        /// model changed underneath it.
        forced: bool,
    },
    /// An item was activated, for example by a double click.
    ItemActivated {
        /// Activated item.
        item: ItemId,
        /// View column under the pointer.
        column: usize,
    },
}

impl Notification<'_> {
    /// Returns `true` if listeners may veto this notification.
    #[must_use]
    pub const fn is_vetoable(&self) -> bool {
        matches!(
            self,
            Self::ItemExpanding(_)
                | Self::ItemCollapsing(_)
                | Self::SelectionChanging { .. }
                | Self::CheckChanging { .. }
                | Self::EditingStarting { .. }
                | Self::ValueChanging { .. }
        )
    }
}

/// A listener's answer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Response {
    /// Let the change proceed.
    #[default]
    Allow,
    /// Reject the change. Ignored for informational notifications.
    Veto,
}

/// A notification handler.
pub type Listener = Box<dyn FnMut(&Notification<'_>) -> Response>;

/// Handle returned by [`Listeners::add`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

/// Registered listeners, called in registration order.
#[derive(Default)]
pub struct Listeners {
    list: Vec<(ListenerId, Listener)>,
    next: usize,
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.list.len())
            .finish_non_exhaustive()
    }
}

impl Listeners {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener`.
    pub fn add(&mut self, listener: impl FnMut(&Notification<'_>) -> Response + 'static) -> ListenerId {
        let id = ListenerId(self.next);
        self.next += 1;
        self.list.push((id, Box::new(listener)));
        id
    }

    /// Unregisters a listener. Returns `false` if it was not registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.list.len();
        self.list.retain(|(l, _)| *l != id);
        self.list.len() != before
    }

    /// Number of listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns `true` if nobody listens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Delivers `notification`.
    ///
    /// Returns `false` if it is vetoable and a listener vetoed it. Delivery
    /// stops at the first veto.
    pub fn send(&mut self, notification: &Notification<'_>) -> bool {
        let vetoable = notification.is_vetoable();
        for (_, listener) in &mut self.list {
            if listener(notification) == Response::Veto && vetoable {
                tracing::debug!(
                    target: "dataview_renderer::notify",
                    ?notification,
                    "vetoed"
                );
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::Cell;

    #[test]
    fn first_veto_stops_delivery() {
        let calls = Rc::new(Cell::new(0));
        let mut listeners = Listeners::new();
        listeners.add(|_| Response::Veto);
        let seen = calls.clone();
        listeners.add(move |_| {
            seen.set(seen.get() + 1);
            Response::Allow
        });
        assert!(!listeners.send(&Notification::ItemExpanding(ItemId::INVALID)));
        assert_eq!(calls.get(), 0);
        // Informational notifications ignore vetoes.
        assert!(listeners.send(&Notification::ItemExpanded(ItemId::INVALID)));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn removal() {
        let mut listeners = Listeners::new();
        let veto = listeners.add(|_| Response::Veto);
        assert!(listeners.remove(veto));
        assert!(!listeners.remove(veto));
        assert!(listeners.is_empty());
        assert!(listeners.send(&Notification::ItemCollapsing(ItemId::INVALID)));
    }
}
