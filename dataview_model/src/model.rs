// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The model contract: hierarchy primitives plus per-field values.

use alloc::boxed::Box;
use core::cmp::Ordering;

use crate::sort::{self, SortKey};
use crate::{ItemId, ModelId, StateProvider, Value, traverse};

bitflags::bitflags! {
    /// Capabilities of one item field.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ItemFlags: u8 {
        /// The item can be selected.
        const SELECTABLE = 0b0000_0001;
        /// The field can be edited in place.
        const EDITABLE   = 0b0000_0010;
        /// The item shows a check box.
        const CHECKABLE  = 0b0000_0100;
        /// The item accepts interaction.
        const ENABLED    = 0b0000_1000;
    }
}

impl Default for ItemFlags {
    fn default() -> Self {
        Self::SELECTABLE | Self::ENABLED
    }
}

/// Tree shape exposed by a model.
///
/// Only [`parent`](Self::parent), [`child_count`](Self::child_count), and
/// [`child`](Self::child) are required. Every derived algorithm in
/// [`traverse`](crate::traverse) is built from these three primitives, so a
/// model never has to materialize its tree.
///
/// The provided methods [`child_index`](Self::child_index),
/// [`subtree_size`](Self::subtree_size), and [`item_rank`](Self::item_rank)
/// are the performance hooks: their defaults scan, and models with better
/// knowledge (for example a flat list, or a tree with cached subtree counts)
/// should override them. Traversal calls the hooks, never the defaults
/// directly.
///
/// Primitives report "no such item" with [`ItemId::INVALID`].
pub trait HierarchyProvider {
    /// Token stamped into every identifier this model produces.
    fn model_id(&self) -> ModelId;

    /// The invisible top of the tree.
    fn root_item(&self) -> ItemId {
        ItemId::root(self.model_id())
    }

    /// Parent of `id`, or [`ItemId::INVALID`] for the root and unknown items.
    fn parent(&self, id: &ItemId) -> ItemId;

    /// Number of children of `id`.
    fn child_count(&self, id: &ItemId) -> usize;

    /// Child `index` of `parent`, or [`ItemId::INVALID`] if out of range.
    fn child(&self, parent: &ItemId, index: usize) -> ItemId;

    /// Position of `child` among the children of `parent`.
    ///
    /// The default uses the identifier's child-index hint when it is correct
    /// and otherwise scans the siblings.
    fn child_index(&self, parent: &ItemId, child: &ItemId) -> Option<usize> {
        traverse::scan_child_index(self, parent, child)
    }

    /// Number of nodes in the subtree of `id`, including `id`.
    ///
    /// Nodes that `state` reports collapsed count as one. The default walks the
    /// expanded part of the subtree.
    fn subtree_size(&self, id: &ItemId, state: &dyn StateProvider) -> usize {
        traverse::count_subtree(self, id, state)
    }

    /// Depth-first rank of `id` among visible nodes, the root being rank 0.
    ///
    /// Returns `None` when `id` sits below a collapsed node. The default walks
    /// forward from the root, which costs O(rank).
    fn item_rank(&self, id: &ItemId, state: &dyn StateProvider) -> Option<usize> {
        traverse::rank_by_walk(self, id, state)
    }
}

/// A hierarchy with per-field values.
///
/// Models are stateless with respect to the UI: selection, expansion, and
/// check marks live in a separate state store.
pub trait DataModel: HierarchyProvider {
    /// Number of fields each item exposes.
    fn field_count(&self) -> usize;

    /// Value of `field` for `id`. Unknown items and fields yield [`Value::Empty`].
    fn value(&self, id: &ItemId, field: usize) -> Value;

    /// Stores a new value. Returns `false` if the model rejected it.
    fn set_value(&mut self, _id: &ItemId, _field: usize, _value: Value) -> bool {
        false
    }

    /// Capabilities of `field` for `id`.
    fn item_flags(&self, _id: &ItemId, _field: usize) -> ItemFlags {
        ItemFlags::default()
    }

    /// Compares the values of `field` for two siblings.
    ///
    /// Ties are broken by identifier so the result is a total order.
    fn compare(&self, a: &ItemId, b: &ItemId, field: usize) -> Ordering {
        sort::compare_items(self, a, b, field)
    }

    /// Returns `true` only if the model can honor every key itself.
    fn can_sort(&self, _keys: &[SortKey]) -> bool {
        false
    }

    /// Reorders children in place. Only called after [`can_sort`](Self::can_sort)
    /// accepted the same keys.
    fn sort(&mut self, _keys: &[SortKey]) -> bool {
        false
    }

    /// Restores the model's natural order.
    fn reset_sorting(&mut self) {}
}

impl<M: HierarchyProvider + ?Sized> HierarchyProvider for Box<M> {
    fn model_id(&self) -> ModelId {
        (**self).model_id()
    }

    fn root_item(&self) -> ItemId {
        (**self).root_item()
    }

    fn parent(&self, id: &ItemId) -> ItemId {
        (**self).parent(id)
    }

    fn child_count(&self, id: &ItemId) -> usize {
        (**self).child_count(id)
    }

    fn child(&self, parent: &ItemId, index: usize) -> ItemId {
        (**self).child(parent, index)
    }

    fn child_index(&self, parent: &ItemId, child: &ItemId) -> Option<usize> {
        (**self).child_index(parent, child)
    }

    fn subtree_size(&self, id: &ItemId, state: &dyn StateProvider) -> usize {
        (**self).subtree_size(id, state)
    }

    fn item_rank(&self, id: &ItemId, state: &dyn StateProvider) -> Option<usize> {
        (**self).item_rank(id, state)
    }
}

impl<M: DataModel + ?Sized> DataModel for Box<M> {
    fn field_count(&self) -> usize {
        (**self).field_count()
    }

    fn value(&self, id: &ItemId, field: usize) -> Value {
        (**self).value(id, field)
    }

    fn set_value(&mut self, id: &ItemId, field: usize, value: Value) -> bool {
        (**self).set_value(id, field, value)
    }

    fn item_flags(&self, id: &ItemId, field: usize) -> ItemFlags {
        (**self).item_flags(id, field)
    }

    fn compare(&self, a: &ItemId, b: &ItemId, field: usize) -> Ordering {
        (**self).compare(a, b, field)
    }

    fn can_sort(&self, keys: &[SortKey]) -> bool {
        (**self).can_sort(keys)
    }

    fn sort(&mut self, keys: &[SortKey]) -> bool {
        (**self).sort(keys)
    }

    fn reset_sorting(&mut self) {
        (**self).reset_sorting();
    }
}
