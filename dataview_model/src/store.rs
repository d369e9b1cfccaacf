// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A simple in-memory tree model.

use alloc::vec::Vec;
use core::num::NonZeroU64;

use crate::sort::{self, SortKey};
use crate::{DataModel, HierarchyProvider, ItemFlags, ItemId, ItemKey, ModelId, Value};

#[derive(Clone, Debug)]
struct Node {
    parent: usize,
    children: Vec<usize>,
    values: Vec<Value>,
    flags: ItemFlags,
    seq: u64,
}

/// An arena-backed tree with a fixed number of fields per item.
///
/// Handles are arena slots and are never reused, so identifiers of removed
/// items stay invalid. The store can sort itself, which makes it a convenient
/// base for sort-aware hosts and tests.
///
/// ```rust
/// use dataview_model::{FullyExpanded, HierarchyProvider, TreeStore, Value, traverse};
///
/// let mut store = TreeStore::new(1);
/// let root = store.root_item();
/// let a = store.append(&root, vec![Value::from("a")]);
/// let a1 = store.append(&a, vec![Value::from("a1")]);
///
/// assert_eq!(traverse::next_item(&store, &FullyExpanded, &a, 1), Some(a1));
/// assert_eq!(store.subtree_size(&root, &FullyExpanded), 3);
/// ```
#[derive(Clone, Debug)]
pub struct TreeStore {
    id: ModelId,
    field_count: usize,
    nodes: Vec<Option<Node>>,
    next_seq: u64,
    default_flags: ItemFlags,
}

impl TreeStore {
    /// Creates an empty store whose items expose `field_count` fields.
    #[must_use]
    pub fn new(field_count: usize) -> Self {
        let root = Node {
            parent: 0,
            children: Vec::new(),
            values: Vec::new(),
            flags: ItemFlags::default(),
            seq: 0,
        };
        let mut nodes = Vec::new();
        nodes.push(Some(root));
        Self {
            id: ModelId::fresh(),
            field_count,
            nodes,
            next_seq: 1,
            default_flags: ItemFlags::default(),
        }
    }

    /// Sets the flags given to items added from now on.
    #[must_use]
    pub fn with_default_flags(mut self, flags: ItemFlags) -> Self {
        self.default_flags = flags;
        self
    }

    fn slot(&self, id: &ItemId) -> Option<usize> {
        if id.model() != self.id {
            return None;
        }
        let slot = match id.key() {
            ItemKey::Root => 0,
            ItemKey::Handle(h) => usize::try_from(h.get()).ok()?,
            ItemKey::Cell { .. } => return None,
        };
        self.nodes.get(slot)?.as_ref().map(|_| slot)
    }

    fn node(&self, slot: usize) -> Option<&Node> {
        self.nodes.get(slot).and_then(Option::as_ref)
    }

    fn id_of(&self, slot: usize) -> ItemId {
        if slot == 0 {
            return ItemId::root(self.id);
        }
        u64::try_from(slot)
            .ok()
            .and_then(NonZeroU64::new)
            .map_or(ItemId::INVALID, |h| ItemId::from_handle(self.id, h))
    }

    /// Appends a child to `parent`. Returns [`ItemId::INVALID`] for unknown parents.
    pub fn append(&mut self, parent: &ItemId, values: Vec<Value>) -> ItemId {
        let index = self.child_count(parent);
        self.insert(parent, index, values)
    }

    /// Inserts a child at `index` (clamped) under `parent`.
    pub fn insert(&mut self, parent: &ItemId, index: usize, values: Vec<Value>) -> ItemId {
        let Some(parent_slot) = self.slot(parent) else {
            return ItemId::INVALID;
        };
        let slot = self.nodes.len();
        self.nodes.push(Some(Node {
            parent: parent_slot,
            children: Vec::new(),
            values,
            flags: self.default_flags,
            seq: self.next_seq,
        }));
        self.next_seq += 1;
        if let Some(Some(p)) = self.nodes.get_mut(parent_slot) {
            let index = index.min(p.children.len());
            p.children.insert(index, slot);
        }
        self.id_of(slot)
    }

    /// Removes `id` and its whole subtree. The root cannot be removed.
    pub fn remove(&mut self, id: &ItemId) -> bool {
        let Some(slot) = self.slot(id) else {
            return false;
        };
        if slot == 0 {
            return false;
        }
        let parent = self.node(slot).map(|n| n.parent).unwrap_or(0);
        if let Some(Some(p)) = self.nodes.get_mut(parent) {
            p.children.retain(|&c| c != slot);
        }
        let mut stack = Vec::new();
        stack.push(slot);
        while let Some(s) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(s).and_then(Option::take) {
                stack.extend(node.children);
            }
        }
        true
    }

    /// Overrides the flags of one item.
    pub fn set_flags(&mut self, id: &ItemId, flags: ItemFlags) -> bool {
        match self.slot(id).and_then(|s| self.nodes.get_mut(s)) {
            Some(Some(node)) => {
                node.flags = flags;
                true
            }
            _ => false,
        }
    }

    /// Number of live items, the root excluded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.iter().skip(1).filter(|n| n.is_some()).count()
    }

    /// Returns `true` if the store holds no items besides the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node(0).is_none_or(|r| r.children.is_empty())
    }

    fn sort_children(&mut self, keys: &[SortKey]) {
        for slot in 0..self.nodes.len() {
            let Some(children) = self.node(slot).map(|n| n.children.clone()) else {
                continue;
            };
            if children.len() < 2 {
                continue;
            }
            let mut ids: Vec<(usize, ItemId)> =
                children.iter().map(|&c| (c, self.id_of(c))).collect();
            ids.sort_by(|(_, a), (_, b)| sort::compare_by_keys(self, a, b, keys));
            if let Some(Some(node)) = self.nodes.get_mut(slot) {
                node.children = ids.into_iter().map(|(c, _)| c).collect();
            }
        }
    }
}

impl HierarchyProvider for TreeStore {
    fn model_id(&self) -> ModelId {
        self.id
    }

    fn parent(&self, id: &ItemId) -> ItemId {
        match self.slot(id) {
            Some(0) | None => ItemId::INVALID,
            Some(slot) => self.node(slot).map_or(ItemId::INVALID, |n| self.id_of(n.parent)),
        }
    }

    fn child_count(&self, id: &ItemId) -> usize {
        self.slot(id)
            .and_then(|s| self.node(s))
            .map_or(0, |n| n.children.len())
    }

    fn child(&self, parent: &ItemId, index: usize) -> ItemId {
        self.slot(parent)
            .and_then(|s| self.node(s))
            .and_then(|n| n.children.get(index).copied())
            .map_or(ItemId::INVALID, |c| self.id_of(c).with_child_index(index))
    }

    fn child_index(&self, parent: &ItemId, child: &ItemId) -> Option<usize> {
        let parent_node = self.node(self.slot(parent)?)?;
        let child_slot = self.slot(child)?;
        if let Some(hint) = child.child_index_hint()
            && parent_node.children.get(hint) == Some(&child_slot)
        {
            return Some(hint);
        }
        parent_node.children.iter().position(|&c| c == child_slot)
    }
}

impl DataModel for TreeStore {
    fn field_count(&self) -> usize {
        self.field_count
    }

    fn value(&self, id: &ItemId, field: usize) -> Value {
        self.slot(id)
            .and_then(|s| self.node(s))
            .and_then(|n| n.values.get(field).cloned())
            .unwrap_or_default()
    }

    fn set_value(&mut self, id: &ItemId, field: usize, value: Value) -> bool {
        if field >= self.field_count {
            return false;
        }
        let Some(slot) = self.slot(id) else {
            return false;
        };
        match self.nodes.get_mut(slot) {
            Some(Some(node)) if slot != 0 => {
                if node.values.len() <= field {
                    node.values.resize(field + 1, Value::Empty);
                }
                node.values[field] = value;
                true
            }
            _ => false,
        }
    }

    fn item_flags(&self, id: &ItemId, _field: usize) -> ItemFlags {
        self.slot(id)
            .and_then(|s| self.node(s))
            .map_or(ItemFlags::empty(), |n| n.flags)
    }

    fn can_sort(&self, keys: &[SortKey]) -> bool {
        keys.iter().all(|k| k.field < self.field_count)
    }

    fn sort(&mut self, keys: &[SortKey]) -> bool {
        if !self.can_sort(keys) {
            return false;
        }
        self.sort_children(keys);
        true
    }

    fn reset_sorting(&mut self) {
        for slot in 0..self.nodes.len() {
            let Some(mut children) = self.node(slot).map(|n| n.children.clone()) else {
                continue;
            };
            children.sort_by_key(|&c| self.node(c).map_or(u64::MAX, |n| n.seq));
            if let Some(Some(node)) = self.nodes.get_mut(slot) {
                node.children = children;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FullyExpanded, SortOrder};
    use alloc::vec;

    #[test]
    fn insert_remove_and_values() {
        let mut store = TreeStore::new(2);
        let root = store.root_item();
        let a = store.append(&root, vec!["a".into(), Value::Int(1)]);
        let b = store.insert(&root, 0, vec!["b".into()]);
        assert_eq!(store.child(&root, 0), b);
        assert_eq!(store.child(&root, 1), a);
        assert_eq!(store.value(&a, 1), Value::Int(1));
        assert_eq!(store.value(&b, 1), Value::Empty);
        assert!(store.set_value(&b, 1, Value::Int(5)));
        assert_eq!(store.value(&b, 1), Value::Int(5));
        assert!(!store.set_value(&b, 2, Value::Int(5)));

        let a1 = store.append(&a, vec!["a1".into()]);
        assert_eq!(store.parent(&a1), a);
        assert!(store.remove(&a));
        assert_eq!(store.child_count(&root), 1);
        assert_eq!(store.parent(&a1), ItemId::INVALID);
        assert!(!store.remove(&root));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn foreign_ids_are_rejected() {
        let mut one = TreeStore::new(1);
        let other = TreeStore::new(1);
        let root = one.root_item();
        let a = one.append(&root, vec!["a".into()]);
        assert_eq!(other.child_count(&a), 0);
        assert_eq!(other.parent(&a), ItemId::INVALID);
    }

    #[test]
    fn sorts_and_restores_order() {
        let mut store = TreeStore::new(1);
        let root = store.root_item();
        let c = store.append(&root, vec!["c".into()]);
        let a = store.append(&root, vec!["a".into()]);
        let b = store.append(&root, vec!["b".into()]);
        let keys = [SortKey::new(0, SortOrder::Ascending)];
        assert!(store.can_sort(&keys));
        assert!(store.sort(&keys));
        assert_eq!(store.child(&root, 0), a);
        assert_eq!(store.child(&root, 2), c);
        store.reset_sorting();
        assert_eq!(store.child(&root, 0), c);
        assert_eq!(store.child(&root, 1), a);
        assert_eq!(store.child(&root, 2), b);
        assert_eq!(store.subtree_size(&root, &FullyExpanded), 4);
    }
}
