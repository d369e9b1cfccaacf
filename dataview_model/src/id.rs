// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Item identity: model tokens, item keys, and the [`ItemId`] handle.

use core::cmp::Ordering;
use core::hash::{Hash, Hasher};
use core::num::NonZeroU64;
use core::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};

static NEXT_MODEL_ID: AtomicU32 = AtomicU32::new(1);

/// Token identifying one data model instance.
///
/// Item identifiers carry the token of the model that produced them. The token
/// is only compared, it never keeps the model alive.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModelId(u32);

impl ModelId {
    /// The token used by invalid item identifiers.
    pub const INVALID: Self = Self(0);

    /// Allocates a token that no other model in this process uses.
    #[must_use]
    pub fn fresh() -> Self {
        Self(NEXT_MODEL_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Returns `true` unless this is [`ModelId::INVALID`].
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }

    /// Raw token value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// The model-defined part of an item identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemKey {
    /// The invisible top of the tree.
    Root,
    /// An opaque client handle (for example an arena index or a pointer-sized key).
    Handle(NonZeroU64),
    /// A structured position, used by grid-like models.
    Cell {
        /// Row of the item.
        row: u64,
        /// Column of the item.
        column: u32,
    },
}

/// Identifies one node within exactly one owning model.
///
/// Two identifiers are equal when they come from the same model and carry the
/// same [`ItemKey`]. The optional child-index hint is a lookup accelerator and
/// does not take part in equality, hashing, or ordering.
///
/// An identifier with an invalid model token is the "no such item" sentinel
/// returned by hierarchy primitives (for example the parent of the root).
/// Passing an identifier to a model other than the one that produced it is a
/// logic error; models may answer with invalid identifiers or unrelated items.
#[derive(Copy, Clone, Debug)]
pub struct ItemId {
    model: ModelId,
    key: ItemKey,
    child_index: Option<u32>,
}

impl ItemId {
    /// The universal "not found" identifier.
    pub const INVALID: Self = Self {
        model: ModelId::INVALID,
        key: ItemKey::Root,
        child_index: None,
    };

    /// The root item of `model`.
    #[must_use]
    pub const fn root(model: ModelId) -> Self {
        Self {
            model,
            key: ItemKey::Root,
            child_index: None,
        }
    }

    /// An item identified by an opaque, non-zero handle.
    #[must_use]
    pub const fn from_handle(model: ModelId, handle: NonZeroU64) -> Self {
        Self {
            model,
            key: ItemKey::Handle(handle),
            child_index: None,
        }
    }

    /// An item identified by a row/column pair.
    #[must_use]
    pub const fn from_cell(model: ModelId, row: u64, column: u32) -> Self {
        Self {
            model,
            key: ItemKey::Cell { row, column },
            child_index: None,
        }
    }

    /// Returns a copy carrying `index` as its position among its siblings.
    #[must_use]
    pub fn with_child_index(mut self, index: usize) -> Self {
        self.child_index = u32::try_from(index).ok();
        self
    }

    /// Returns a copy with the child-index hint removed.
    #[must_use]
    pub const fn without_child_index(mut self) -> Self {
        self.child_index = None;
        self
    }

    /// The precomputed position of this item among its siblings, if known.
    #[must_use]
    pub const fn child_index_hint(&self) -> Option<usize> {
        match self.child_index {
            Some(i) => Some(i as usize),
            None => None,
        }
    }

    /// Token of the owning model.
    #[must_use]
    pub const fn model(&self) -> ModelId {
        self.model
    }

    /// Model-defined key.
    #[must_use]
    pub const fn key(&self) -> ItemKey {
        self.key
    }

    /// The opaque handle, for identifiers built with [`ItemId::from_handle`].
    #[must_use]
    pub const fn handle(&self) -> Option<NonZeroU64> {
        match self.key {
            ItemKey::Handle(h) => Some(h),
            _ => None,
        }
    }

    /// Returns `true` if this is not the invalid sentinel.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.model.is_valid()
    }

    /// Returns `true` for the root item of a valid model.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.model.is_valid() && matches!(self.key, ItemKey::Root)
    }

    /// Converts the sentinel into `None`.
    #[must_use]
    pub fn valid(self) -> Option<Self> {
        self.is_valid().then_some(self)
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl PartialEq for ItemId {
    fn eq(&self, other: &Self) -> bool {
        self.model == other.model && self.key == other.key
    }
}

impl Eq for ItemId {}

impl Hash for ItemId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.model.hash(state);
        self.key.hash(state);
    }
}

impl PartialOrd for ItemId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ItemId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.model
            .cmp(&other.model)
            .then_with(|| self.key.cmp(&other.key))
    }
}
