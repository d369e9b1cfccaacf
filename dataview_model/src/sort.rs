// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sort keys and item comparison.

use core::cmp::Ordering;

use crate::{DataModel, ItemId};

/// Direction of a sort key.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Smallest value first.
    #[default]
    Ascending,
    /// Largest value first.
    Descending,
}

impl SortOrder {
    /// Applies this direction to an ascending ordering.
    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// One sort criterion: a field and a direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SortKey {
    /// Field whose values are compared.
    pub field: usize,
    /// Direction.
    pub order: SortOrder,
}

impl SortKey {
    /// Creates a key.
    #[must_use]
    pub const fn new(field: usize, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Ascending key on `field`.
    #[must_use]
    pub const fn ascending(field: usize) -> Self {
        Self::new(field, SortOrder::Ascending)
    }

    /// Descending key on `field`.
    #[must_use]
    pub const fn descending(field: usize) -> Self {
        Self::new(field, SortOrder::Descending)
    }
}

/// Compares the values of `field` only. Equal values yield [`Ordering::Equal`].
pub fn compare_values<M>(model: &M, a: &ItemId, b: &ItemId, field: usize) -> Ordering
where
    M: DataModel + ?Sized,
{
    model.value(a, field).compare(&model.value(b, field))
}

/// Default implementation of [`DataModel::compare`].
///
/// Equal values fall back to identifier order, so two distinct items never
/// compare equal.
pub fn compare_items<M>(model: &M, a: &ItemId, b: &ItemId, field: usize) -> Ordering
where
    M: DataModel + ?Sized,
{
    compare_values(model, a, b, field).then_with(|| a.cmp(b))
}

/// Lexicographic comparison over several keys.
///
/// Leading keys compare values; the last key goes through
/// [`DataModel::compare`] so model overrides and the identifier tie break
/// both apply.
pub fn compare_by_keys<M>(model: &M, a: &ItemId, b: &ItemId, keys: &[SortKey]) -> Ordering
where
    M: DataModel + ?Sized,
{
    let Some((last, leading)) = keys.split_last() else {
        return a.cmp(b);
    };
    for key in leading {
        let ord = key.order.apply(compare_values(model, a, b, key.field));
        if ord != Ordering::Equal {
            return ord;
        }
    }
    last.order.apply(model.compare(a, b, last.field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HierarchyProvider, TreeStore, Value};
    use alloc::vec;

    #[test]
    fn ties_are_broken_by_identifier() {
        let mut store = TreeStore::new(1);
        let root = store.root_item();
        let a = store.append(&root, vec!["same".into()]);
        let b = store.append(&root, vec!["same".into()]);
        assert_eq!(compare_values(&store, &a, &b, 0), Ordering::Equal);
        assert_eq!(store.compare(&a, &b, 0), a.cmp(&b));
        assert_ne!(store.compare(&a, &b, 0), Ordering::Equal);
    }

    #[test]
    fn multiple_keys() {
        let mut store = TreeStore::new(2);
        let root = store.root_item();
        let a = store.append(&root, vec!["x".into(), Value::Int(2)]);
        let b = store.append(&root, vec!["x".into(), Value::Int(1)]);
        let c = store.append(&root, vec!["w".into(), Value::Int(9)]);
        let keys = [SortKey::ascending(0), SortKey::descending(1)];
        assert_eq!(compare_by_keys(&store, &c, &a, &keys), Ordering::Less);
        assert_eq!(compare_by_keys(&store, &a, &b, &keys), Ordering::Less);
        assert_eq!(compare_by_keys(&store, &a, &b, &[]), a.cmp(&b));
    }
}
