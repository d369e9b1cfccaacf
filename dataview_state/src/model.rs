// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The mutable state contract.

use alloc::vec::Vec;
use core::cmp::Ordering;

use dataview_model::{CheckState, FullyExpanded, HierarchyProvider, ItemId, StateProvider, traverse};

/// Per-item transient state, mutable.
///
/// Every mutator returns `true` only when the stored state actually changed,
/// so callers can skip repaints and notifications for no-ops.
///
/// Items never touched are unselected, collapsed, unchecked, and enabled.
/// At most one item is focused.
pub trait StateModel: StateProvider {
    /// Selects or deselects one item.
    fn select(&mut self, id: &ItemId, selected: bool) -> bool;

    /// Deselects everything.
    fn deselect_all(&mut self) -> bool;

    /// Expands or collapses one item.
    fn expand(&mut self, id: &ItemId, expanded: bool) -> bool;

    /// Sets the check state of one item.
    fn set_check(&mut self, id: &ItemId, check: CheckState) -> bool;

    /// Moves focus to `id`, or clears it with `None`.
    fn set_focus(&mut self, id: Option<ItemId>) -> bool;

    /// The focused item.
    fn focused(&self) -> Option<ItemId>;

    /// Enables or disables one item.
    fn enable(&mut self, id: &ItemId, enabled: bool) -> bool;

    /// Selected items in identifier order.
    fn selected_items(&self) -> Vec<ItemId>;

    /// Forgets all state. Used when the data model changed its identity scheme.
    fn clear(&mut self);

    /// Applies `selected` to every item of `ids`.
    fn select_list(&mut self, ids: &[ItemId], selected: bool) -> bool {
        let mut changed = false;
        for id in ids {
            changed |= self.select(id, selected);
        }
        changed
    }

    /// Selects the visible items between `from` and `to`, both included, in
    /// either order.
    fn select_range<M>(&mut self, model: &M, from: &ItemId, to: &ItemId, selected: bool) -> bool
    where
        Self: Sized,
        M: HierarchyProvider + ?Sized,
    {
        let ids = visible_range(model, self, from, to);
        self.select_list(&ids, selected)
    }

    /// Selects every visible item except the root.
    fn select_all<M>(&mut self, model: &M) -> bool
    where
        Self: Sized,
        M: HierarchyProvider + ?Sized,
    {
        let mut ids = Vec::new();
        let mut cur = model.root_item();
        while let Some(next) = traverse::next_item(model, self, &cur, 1) {
            ids.push(next);
            cur = next;
        }
        self.select_list(&ids, true)
    }

    /// Expands or collapses `id` and all of its descendants.
    ///
    /// Walks the full subtree with an explicit stack.
    fn expand_recursive<M>(&mut self, model: &M, id: &ItemId, expanded: bool) -> bool
    where
        Self: Sized,
        M: HierarchyProvider + ?Sized,
    {
        let mut changed = false;
        for node in subtree(model, id) {
            changed |= self.expand(&node, expanded);
        }
        changed
    }

    /// Sets the check state of `id` and all of its descendants.
    fn set_check_recursive<M>(&mut self, model: &M, id: &ItemId, check: CheckState) -> bool
    where
        Self: Sized,
        M: HierarchyProvider + ?Sized,
    {
        let mut changed = false;
        for node in subtree(model, id) {
            changed |= self.set_check(&node, check);
        }
        changed
    }

    /// Recomputes the check state of every ancestor of `id` (the root
    /// excluded) from its children: all checked, all unchecked, or
    /// undetermined.
    fn update_parent_checks<M>(&mut self, model: &M, id: &ItemId) -> bool
    where
        Self: Sized,
        M: HierarchyProvider + ?Sized,
    {
        let mut changed = false;
        let mut cur = model.parent(id);
        while cur.is_valid() && !cur.is_root() {
            let check = aggregate_check(model, self, &cur);
            changed |= self.set_check(&cur, check);
            cur = model.parent(&cur);
        }
        changed
    }
}

fn aggregate_check<M>(model: &M, state: &dyn StateProvider, parent: &ItemId) -> CheckState
where
    M: HierarchyProvider + ?Sized,
{
    let count = model.child_count(parent);
    let mut checked = 0;
    let mut unchecked = 0;
    for i in 0..count {
        match state.check_state(&model.child(parent, i)) {
            CheckState::Checked => checked += 1,
            CheckState::Unchecked => unchecked += 1,
            CheckState::Undetermined => return CheckState::Undetermined,
        }
    }
    if checked == count {
        CheckState::Checked
    } else if unchecked == count {
        CheckState::Unchecked
    } else {
        CheckState::Undetermined
    }
}

/// `id` and every descendant, ignoring expansion, in depth-first order.
pub fn subtree<M>(model: &M, id: &ItemId) -> Vec<ItemId>
where
    M: HierarchyProvider + ?Sized,
{
    let mut out = Vec::new();
    if !id.is_valid() {
        return out;
    }
    let mut stack = Vec::new();
    stack.push(*id);
    while let Some(node) = stack.pop() {
        out.push(node);
        let count = model.child_count(&node);
        for i in (0..count).rev() {
            let child = model.child(&node, i);
            if child.is_valid() {
                stack.push(child);
            }
        }
    }
    out
}

/// Visible items from `from` to `to` inclusive, in depth-first order.
///
/// The endpoints may be given in either order. Returns an empty list if
/// either endpoint is hidden.
pub fn visible_range<M>(model: &M, state: &dyn StateProvider, from: &ItemId, to: &ItemId) -> Vec<ItemId>
where
    M: HierarchyProvider + ?Sized,
{
    if !traverse::is_reachable(model, state, from) || !traverse::is_reachable(model, state, to) {
        return Vec::new();
    }
    let (first, last) = match traverse::compare_position(model, from, to) {
        Ordering::Greater => (*to, *from),
        _ => (*from, *to),
    };
    let mut out = Vec::new();
    out.push(first);
    let mut cur = first;
    while cur != last {
        match traverse::next_item(model, state, &cur, 1) {
            Some(next) => {
                out.push(next);
                cur = next;
            }
            None => break,
        }
    }
    out
}

/// First item, in full depth-first order, satisfying `pred`.
pub fn first_matching<M>(model: &M, pred: impl Fn(&ItemId) -> bool) -> Option<ItemId>
where
    M: HierarchyProvider + ?Sized,
{
    next_matching(model, &model.root_item(), pred)
}

/// Next item after `from`, in full depth-first order, satisfying `pred`.
///
/// Collapsed subtrees are searched too. There is no reverse index, so this
/// costs O(n) in the worst case.
pub fn next_matching<M>(model: &M, from: &ItemId, pred: impl Fn(&ItemId) -> bool) -> Option<ItemId>
where
    M: HierarchyProvider + ?Sized,
{
    let mut cur = *from;
    loop {
        cur = traverse::next_item(model, &FullyExpanded, &cur, 1)?;
        if pred(&cur) {
            return Some(cur);
        }
    }
}

/// First selected item in depth-first order.
pub fn first_selected<M>(model: &M, state: &dyn StateProvider) -> Option<ItemId>
where
    M: HierarchyProvider + ?Sized,
{
    first_matching(model, |id| state.is_selected(id))
}

/// Next selected item after `from`.
pub fn next_selected<M>(model: &M, state: &dyn StateProvider, from: &ItemId) -> Option<ItemId>
where
    M: HierarchyProvider + ?Sized,
{
    next_matching(model, from, |id| state.is_selected(id))
}

/// First checked item in depth-first order.
pub fn first_checked<M>(model: &M, state: &dyn StateProvider) -> Option<ItemId>
where
    M: HierarchyProvider + ?Sized,
{
    first_matching(model, |id| state.check_state(id) == CheckState::Checked)
}

/// Next checked item after `from`.
pub fn next_checked<M>(model: &M, state: &dyn StateProvider, from: &ItemId) -> Option<ItemId>
where
    M: HierarchyProvider + ?Sized,
{
    next_matching(model, from, |id| state.check_state(id) == CheckState::Checked)
}

/// First expanded item in depth-first order.
pub fn first_expanded<M>(model: &M, state: &dyn StateProvider) -> Option<ItemId>
where
    M: HierarchyProvider + ?Sized,
{
    first_matching(model, |id| state.is_expanded(id))
}

/// Next expanded item after `from`.
pub fn next_expanded<M>(model: &M, state: &dyn StateProvider, from: &ItemId) -> Option<ItemId>
where
    M: HierarchyProvider + ?Sized,
{
    next_matching(model, from, |id| state.is_expanded(id))
}

/// First enabled item in depth-first order.
pub fn first_enabled<M>(model: &M, state: &dyn StateProvider) -> Option<ItemId>
where
    M: HierarchyProvider + ?Sized,
{
    first_matching(model, |id| state.is_enabled(id))
}

/// Next enabled item after `from`.
pub fn next_enabled<M>(model: &M, state: &dyn StateProvider, from: &ItemId) -> Option<ItemId>
where
    M: HierarchyProvider + ?Sized,
{
    next_matching(model, from, |id| state.is_enabled(id))
}
