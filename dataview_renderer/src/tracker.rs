// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A cached (item, rank) pair that turns rank lookups near the top of the
//! view into short walks.

use dataview_model::traverse::{self, RankHint, TreePos};
use dataview_model::{HierarchyProvider, ModelId, StateProvider};

/// Remembers which item sat at which model rank the last time the view was
/// resolved.
///
/// Scrolling by a few rows then costs a few [`traverse::next_item`] steps
/// instead of a descent from the root. The cached pair must stay correct
/// for the current expansion state: callers [`shift`](Self::shift) it when
/// rows appear or vanish above it and [`invalidate`](Self::invalidate) it on
/// any structural change.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FirstVisibleItem {
    cached: Option<(TreePos, usize)>,
    model: Option<ModelId>,
}

impl FirstVisibleItem {
    /// Creates an empty tracker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cached: None,
            model: None,
        }
    }

    /// The cached position and its model rank.
    #[must_use]
    pub const fn get(&self) -> Option<(TreePos, usize)> {
        self.cached
    }

    /// Forgets the cached pair.
    pub fn invalidate(&mut self) {
        if self.cached.take().is_some() {
            tracing::trace!(target: "dataview_renderer::tracker", "first visible item invalidated");
        }
    }

    /// Records that `pos` sits at model rank `rank`.
    pub fn set(&mut self, model: ModelId, pos: TreePos, rank: usize) {
        self.model = Some(model);
        self.cached = Some((pos, rank));
    }

    /// Moves the cached rank by `delta` rows.
    pub fn shift(&mut self, delta: isize) {
        if let Some((_, rank)) = &mut self.cached {
            match rank.checked_add_signed(delta) {
                Some(r) => *rank = r,
                None => self.cached = None,
            }
        }
    }

    /// Resolves `rank` to a position, using and then refreshing the cache.
    pub fn resolve<M>(&mut self, model: &M, state: &dyn StateProvider, rank: usize) -> Option<TreePos>
    where
        M: HierarchyProvider + ?Sized,
    {
        if self.model != Some(model.model_id()) {
            self.cached = None;
        }
        let pos = match self.cached {
            Some((pos, cached)) if cached == rank => pos,
            cached => {
                let hint = cached.map(|(pos, r)| RankHint { id: pos.id, rank: r });
                traverse::find_item_at(model, state, rank, hint)?
            }
        };
        self.set(model.model_id(), pos, rank);
        Some(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataview_model::{FullyExpanded, TreeStore, Value};

    fn store() -> TreeStore {
        let mut store = TreeStore::new(1);
        let root = store.root_item();
        for i in 0..10_i64 {
            let parent = store.append(&root, [Value::Int(i)].into());
            for j in 0..10_i64 {
                store.append(&parent, [Value::Int(i * 10 + j)].into());
            }
        }
        store
    }

    #[test]
    fn resolution_refreshes_the_cache() {
        let store = store();
        let mut tracker = FirstVisibleItem::new();
        let a = tracker.resolve(&store, &FullyExpanded, 5);
        assert_eq!(tracker.get().map(|(_, r)| r), Some(5));
        let b = tracker.resolve(&store, &FullyExpanded, 7);
        assert_eq!(
            b.map(|p| p.id),
            traverse::next_item(&store, &FullyExpanded, &a.map(|p| p.id).unwrap(), 2)
        );
        assert_eq!(b.map(|p| p.level), Some(2));
    }

    #[test]
    fn shift_and_model_switch() {
        let store = store();
        let mut tracker = FirstVisibleItem::new();
        tracker.resolve(&store, &FullyExpanded, 3);
        tracker.shift(-5);
        assert_eq!(tracker.get(), None);
        tracker.resolve(&store, &FullyExpanded, 3);
        tracker.shift(2);
        assert_eq!(tracker.get().map(|(_, r)| r), Some(5));

        let other = self::store();
        let pos = tracker.resolve(&other, &FullyExpanded, 1);
        assert_eq!(pos.map(|p| p.id.model()), Some(other.model_id()));
    }
}
