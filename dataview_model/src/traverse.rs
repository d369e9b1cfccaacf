// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Depth-first navigation built only from the hierarchy primitives.
//!
//! Every function here works on demand: a single step costs O(branching
//! factor) and nothing enumerates the whole tree unless the operation is
//! inherently O(n) (for example counting a fully expanded subtree).
//!
//! All functions take a [`StateProvider`]. Nodes it reports as collapsed are
//! treated as leaves. Pass [`FullyExpanded`](crate::FullyExpanded) to walk the
//! complete tree. The root is always treated as expanded.
//!
//! Ranks count depth-first positions among visible nodes with the root at
//! rank 0.

use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::{HierarchyProvider, ItemId, StateProvider};

/// Rank distance below which [`find_item`] steps from its hint instead of
/// searching from the root.
pub const LINEAR_STEP_LIMIT: usize = 64;

/// An item together with its depth (the root has depth 0).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TreePos {
    /// The item.
    pub id: ItemId,
    /// Number of parent links between the item and the root.
    pub level: usize,
}

impl TreePos {
    /// Creates a position.
    #[must_use]
    pub const fn new(id: ItemId, level: usize) -> Self {
        Self { id, level }
    }
}

/// A known (item, rank) pair used to speed up [`find_item`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RankHint {
    /// An item whose rank is known.
    pub id: ItemId,
    /// The rank of `id`.
    pub rank: usize,
}

fn opens(state: &dyn StateProvider, id: &ItemId) -> bool {
    id.is_root() || state.is_expanded(id)
}

/// Default implementation of [`HierarchyProvider::child_index`].
pub fn scan_child_index<M>(model: &M, parent: &ItemId, child: &ItemId) -> Option<usize>
where
    M: HierarchyProvider + ?Sized,
{
    let count = model.child_count(parent);
    if let Some(hint) = child.child_index_hint()
        && hint < count
        && model.child(parent, hint) == *child
    {
        return Some(hint);
    }
    (0..count).find(|&i| model.child(parent, i) == *child)
}

/// Position of `id` among its siblings. `None` for the root.
pub fn sibling_index<M>(model: &M, id: &ItemId) -> Option<usize>
where
    M: HierarchyProvider + ?Sized,
{
    let parent = model.parent(id).valid()?;
    model.child_index(&parent, id)
}

/// Returns `true` if `id` is the last child of its parent (or the root).
pub fn is_last_child<M>(model: &M, id: &ItemId) -> bool
where
    M: HierarchyProvider + ?Sized,
{
    let Some(parent) = model.parent(id).valid() else {
        return true;
    };
    match model.child_index(&parent, id) {
        Some(i) => i + 1 >= model.child_count(&parent),
        None => true,
    }
}

/// Number of parent links between `id` and the root.
pub fn depth<M>(model: &M, id: &ItemId) -> usize
where
    M: HierarchyProvider + ?Sized,
{
    let mut depth = 0;
    let mut cur = *id;
    while let Some(parent) = model.parent(&cur).valid() {
        depth += 1;
        cur = parent;
    }
    depth
}

/// Returns `true` if `ancestor` is a strict ancestor of `id`.
pub fn is_ancestor<M>(model: &M, ancestor: &ItemId, id: &ItemId) -> bool
where
    M: HierarchyProvider + ?Sized,
{
    let mut cur = model.parent(id);
    while cur.is_valid() {
        if cur == *ancestor {
            return true;
        }
        cur = model.parent(&cur);
    }
    false
}

/// Returns `true` if no ancestor of `id` is collapsed and `id` hangs off the root.
pub fn is_reachable<M>(model: &M, state: &dyn StateProvider, id: &ItemId) -> bool
where
    M: HierarchyProvider + ?Sized,
{
    if !id.is_valid() || id.model() != model.model_id() {
        return false;
    }
    let mut cur = *id;
    loop {
        if cur.is_root() {
            return true;
        }
        let parent = model.parent(&cur);
        if !parent.is_valid() {
            return false;
        }
        if !opens(state, &parent) {
            return false;
        }
        cur = parent;
    }
}

/// Walks first children down from `id`, stopping at collapsed nodes.
///
/// Returns `id` itself when it has no visible children.
pub fn first_descendent<M>(model: &M, state: &dyn StateProvider, id: &ItemId) -> TreePos
where
    M: HierarchyProvider + ?Sized,
{
    let mut cur = *id;
    let mut descended = 0;
    while opens(state, &cur) && model.child_count(&cur) > 0 {
        cur = model.child(&cur, 0);
        descended += 1;
    }
    TreePos::new(cur, descended)
}

/// Walks last children down from `id`, stopping at collapsed nodes.
///
/// The returned level counts the links descended from `id`.
pub fn last_descendent<M>(model: &M, state: &dyn StateProvider, id: &ItemId) -> TreePos
where
    M: HierarchyProvider + ?Sized,
{
    let mut cur = *id;
    let mut descended = 0;
    loop {
        if !opens(state, &cur) {
            break;
        }
        let count = model.child_count(&cur);
        if count == 0 {
            break;
        }
        cur = model.child(&cur, count - 1);
        descended += 1;
    }
    TreePos::new(cur, descended)
}

fn step_forward<M>(model: &M, state: &dyn StateProvider, pos: TreePos) -> Option<TreePos>
where
    M: HierarchyProvider + ?Sized,
{
    if opens(state, &pos.id) && model.child_count(&pos.id) > 0 {
        let first = model.child(&pos.id, 0).valid()?;
        return Some(TreePos::new(first, pos.level + 1));
    }
    let mut cur = pos.id;
    let mut level = pos.level;
    loop {
        let parent = model.parent(&cur).valid()?;
        let index = model.child_index(&parent, &cur)?;
        if index + 1 < model.child_count(&parent) {
            let sibling = model.child(&parent, index + 1).valid()?;
            return Some(TreePos::new(sibling, level));
        }
        cur = parent;
        level = level.saturating_sub(1);
    }
}

fn step_backward<M>(model: &M, state: &dyn StateProvider, pos: TreePos) -> Option<TreePos>
where
    M: HierarchyProvider + ?Sized,
{
    let parent = model.parent(&pos.id).valid()?;
    let index = model.child_index(&parent, &pos.id)?;
    if index == 0 {
        return Some(TreePos::new(parent, pos.level.saturating_sub(1)));
    }
    let sibling = model.child(&parent, index - 1).valid()?;
    let last = last_descendent(model, state, &sibling);
    Some(TreePos::new(last.id, pos.level + last.level))
}

/// Depth-first successor of `pos`, `count` steps ahead, tracking the level.
///
/// Prefers the first child when the node is expanded, otherwise the next
/// sibling of the closest ancestor that has one. The root is never returned.
pub fn next_item_at<M>(
    model: &M,
    state: &dyn StateProvider,
    pos: TreePos,
    count: usize,
) -> Option<TreePos>
where
    M: HierarchyProvider + ?Sized,
{
    if !pos.id.is_valid() {
        return None;
    }
    let mut cur = pos;
    for _ in 0..count {
        cur = step_forward(model, state, cur)?;
    }
    Some(cur)
}

/// Depth-first predecessor of `pos`, `count` steps back, tracking the level.
///
/// The previous sibling's last visible descendant, or the parent. The root is
/// returned when stepping back from its first child, and nothing precedes it.
pub fn prev_item_at<M>(
    model: &M,
    state: &dyn StateProvider,
    pos: TreePos,
    count: usize,
) -> Option<TreePos>
where
    M: HierarchyProvider + ?Sized,
{
    if !pos.id.is_valid() {
        return None;
    }
    let mut cur = pos;
    for _ in 0..count {
        cur = step_backward(model, state, cur)?;
    }
    Some(cur)
}

/// Level-agnostic form of [`next_item_at`].
pub fn next_item<M>(model: &M, state: &dyn StateProvider, id: &ItemId, count: usize) -> Option<ItemId>
where
    M: HierarchyProvider + ?Sized,
{
    next_item_at(model, state, TreePos::new(*id, 0), count).map(|p| p.id)
}

/// Level-agnostic form of [`prev_item_at`].
pub fn prev_item<M>(model: &M, state: &dyn StateProvider, id: &ItemId, count: usize) -> Option<ItemId>
where
    M: HierarchyProvider + ?Sized,
{
    // Levels saturate at zero, so start high enough that they never clamp.
    let start = TreePos::new(*id, usize::MAX / 2);
    prev_item_at(model, state, start, count).map(|p| p.id)
}

/// Default implementation of [`HierarchyProvider::subtree_size`].
///
/// Uses an explicit stack so very deep trees cannot overflow the call stack.
pub fn count_subtree<M>(model: &M, id: &ItemId, state: &dyn StateProvider) -> usize
where
    M: HierarchyProvider + ?Sized,
{
    if !id.is_valid() {
        return 0;
    }
    let mut total = 0;
    let mut stack = Vec::new();
    stack.push(*id);
    while let Some(node) = stack.pop() {
        total += 1;
        if !opens(state, &node) {
            continue;
        }
        let count = model.child_count(&node);
        for i in 0..count {
            let child = model.child(&node, i);
            if child.is_valid() {
                stack.push(child);
            }
        }
    }
    total
}

/// Number of visible nodes, the root included.
pub fn visible_count<M>(model: &M, state: &dyn StateProvider) -> usize
where
    M: HierarchyProvider + ?Sized,
{
    model.subtree_size(&model.root_item(), state)
}

/// Default implementation of [`HierarchyProvider::item_rank`]: O(rank).
pub fn rank_by_walk<M>(model: &M, id: &ItemId, state: &dyn StateProvider) -> Option<usize>
where
    M: HierarchyProvider + ?Sized,
{
    if !is_reachable(model, state, id) {
        return None;
    }
    let mut cur = model.root_item();
    let mut rank = 0;
    loop {
        if cur == *id {
            return Some(rank);
        }
        cur = next_item(model, state, &cur, 1)?;
        rank += 1;
    }
}

/// Resolves a visible rank to an item.
///
/// With a hint at the same rank this is O(1). With a hint within
/// [`LINEAR_STEP_LIMIT`] ranks the answer is reached by stepping from the hint.
/// Otherwise the search descends from the root and skips whole subtrees using
/// [`HierarchyProvider::subtree_size`].
pub fn find_item<M>(
    model: &M,
    state: &dyn StateProvider,
    rank: usize,
    hint: Option<RankHint>,
) -> Option<ItemId>
where
    M: HierarchyProvider + ?Sized,
{
    if let Some(hint) = hint.filter(|h| h.id.is_valid()) {
        if hint.rank == rank {
            return Some(hint.id);
        }
        let distance = hint.rank.abs_diff(rank);
        if distance <= LINEAR_STEP_LIMIT {
            return if rank > hint.rank {
                next_item(model, state, &hint.id, distance)
            } else {
                prev_item(model, state, &hint.id, distance)
            };
        }
    }
    tracing::trace!(target: "dataview_model::traverse", rank, "searching rank from root");
    find_from_root(model, state, rank)
}

fn find_from_root<M>(model: &M, state: &dyn StateProvider, rank: usize) -> Option<ItemId>
where
    M: HierarchyProvider + ?Sized,
{
    let mut node = model.root_item();
    let mut remaining = rank;
    loop {
        if remaining == 0 {
            return Some(node);
        }
        remaining -= 1;
        if !opens(state, &node) {
            return None;
        }
        let count = model.child_count(&node);
        let mut descended = false;
        for i in 0..count {
            let child = model.child(&node, i);
            if !child.is_valid() {
                continue;
            }
            let size = model.subtree_size(&child, state);
            if remaining < size {
                node = child;
                descended = true;
                break;
            }
            remaining -= size;
        }
        if !descended {
            return None;
        }
    }
}

/// Like [`find_item`], also reporting the level of the result.
pub fn find_item_at<M>(
    model: &M,
    state: &dyn StateProvider,
    rank: usize,
    hint: Option<RankHint>,
) -> Option<TreePos>
where
    M: HierarchyProvider + ?Sized,
{
    let id = find_item(model, state, rank, hint)?;
    Some(TreePos::new(id, depth(model, &id)))
}

fn path_from_root<M>(model: &M, id: &ItemId) -> Vec<ItemId>
where
    M: HierarchyProvider + ?Sized,
{
    let mut path = Vec::new();
    let mut cur = *id;
    while cur.is_valid() {
        path.push(cur);
        cur = model.parent(&cur);
    }
    path.reverse();
    path
}

/// Orders two items of the same model by depth-first position.
///
/// Costs O(depth) parent lookups plus two sibling index lookups; no rank is
/// computed. Ancestors come before their descendants.
pub fn compare_position<M>(model: &M, a: &ItemId, b: &ItemId) -> Ordering
where
    M: HierarchyProvider + ?Sized,
{
    if a == b {
        return Ordering::Equal;
    }
    let pa = path_from_root(model, a);
    let pb = path_from_root(model, b);
    let common = pa.iter().zip(pb.iter()).take_while(|(x, y)| x == y).count();
    if common == pa.len() {
        return Ordering::Less;
    }
    if common == pb.len() {
        return Ordering::Greater;
    }
    if common == 0 {
        return a.cmp(b);
    }
    let parent = pa[common - 1];
    let ia = model.child_index(&parent, &pa[common]);
    let ib = model.child_index(&parent, &pb[common]);
    match (ia, ib) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}
