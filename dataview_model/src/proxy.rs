// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered stacks of sort and filter stages over a base model.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::cmp::Ordering;
use core::fmt;

use hashbrown::HashMap;

use crate::search::SearchQuery;
use crate::sort::{self, SortKey};
use crate::{DataModel, HierarchyProvider, ItemFlags, ItemId, ModelId, Value};

/// Predicate deciding whether an item (and with it its subtree) stays visible.
pub type FilterFn = Box<dyn Fn(&dyn DataModel, &ItemId) -> bool>;

/// Error returned by structural chain edits.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProxyError {
    /// A stage index was past the end of the chain.
    #[error("stage index {index} is out of range for a chain of {len} stages")]
    OutOfRange {
        /// The requested index.
        index: usize,
        /// Number of stages in the chain.
        len: usize,
    },
    /// The chain has no stage to remove.
    #[error("the proxy chain has no stages")]
    Empty,
}

/// Reorders siblings by a list of keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortStage {
    keys: Vec<SortKey>,
}

impl SortStage {
    /// Creates a stage sorting by `keys`, first key most significant.
    #[must_use]
    pub fn new(keys: impl Into<Vec<SortKey>>) -> Self {
        Self { keys: keys.into() }
    }

    /// The sort keys.
    #[must_use]
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }
}

/// Hides items rejected by a predicate, together with their subtrees.
pub struct FilterStage {
    predicate: FilterFn,
}

impl FilterStage {
    /// Creates a stage keeping the items for which `predicate` returns `true`.
    pub fn new(predicate: impl Fn(&dyn DataModel, &ItemId) -> bool + 'static) -> Self {
        Self {
            predicate: Box::new(predicate),
        }
    }

    /// Keeps items matching `query`.
    #[must_use]
    pub fn matching(query: SearchQuery) -> Self {
        Self::new(move |model, id| query.matches(model, id))
    }

    /// Runs the predicate.
    pub fn accepts(&self, model: &dyn DataModel, id: &ItemId) -> bool {
        (self.predicate)(model, id)
    }
}

impl fmt::Debug for FilterStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterStage").finish_non_exhaustive()
    }
}

/// One transform in a [`ProxyChain`].
#[derive(Debug)]
pub enum ProxyStage {
    /// Reorder siblings.
    Sort(SortStage),
    /// Hide items.
    Filter(FilterStage),
}

impl ProxyStage {
    /// Returns `true` for sort stages.
    #[must_use]
    pub const fn is_sort(&self) -> bool {
        matches!(self, Self::Sort(_))
    }

    fn apply(&self, model: &dyn DataModel, children: &mut Vec<ItemId>) {
        match self {
            Self::Sort(stage) => {
                children.sort_by(|a, b| sort::compare_by_keys(model, a, b, &stage.keys));
            }
            Self::Filter(stage) => children.retain(|c| stage.accepts(model, c)),
        }
    }
}

impl From<SortStage> for ProxyStage {
    fn from(stage: SortStage) -> Self {
        Self::Sort(stage)
    }
}

impl From<FilterStage> for ProxyStage {
    fn from(stage: FilterStage) -> Self {
        Self::Filter(stage)
    }
}

/// A base model viewed through an ordered list of transform stages.
///
/// Stage 0 is innermost: it sees the base model's children first and each
/// later stage transforms the result of the previous one. Identity passes
/// through untouched, so item identifiers of the chain are the base model's
/// identifiers and [`HierarchyProvider::model_id`] is the base model's token.
/// The chain only changes which children a node has and in what order.
///
/// The per-parent child lists are computed lazily and cached. Call
/// [`ProxyChain::invalidate`] after mutating the base model through anything
/// other than [`ProxyChain::base_model_mut`].
///
/// ```rust
/// use dataview_model::{
///     FilterStage, HierarchyProvider, ProxyChain, SortKey, SortStage, TreeStore, Value,
/// };
///
/// let mut store = TreeStore::new(1);
/// let root = store.root_item();
/// let b = store.append(&root, vec![Value::from("b")]);
/// let a = store.append(&root, vec![Value::from("a")]);
///
/// let mut chain = ProxyChain::new(store);
/// chain.push_stage(SortStage::new([SortKey::ascending(0)]));
/// assert_eq!(chain.child(&root, 0), a);
///
/// chain.push_stage(FilterStage::new(|model, id| model.value(id, 0) != Value::from("a")));
/// assert_eq!(chain.child_count(&root), 1);
/// assert_eq!(chain.child(&root, 0), b);
/// ```
pub struct ProxyChain<M> {
    base: M,
    stages: Vec<ProxyStage>,
    mapping: RefCell<HashMap<ItemId, Vec<ItemId>>>,
}

impl<M: fmt::Debug> fmt::Debug for ProxyChain<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyChain")
            .field("base", &self.base)
            .field("stages", &self.stages)
            .field("mapping", &self.mapping.borrow().len())
            .finish()
    }
}

impl<M: DataModel> ProxyChain<M> {
    /// Wraps `base` with no stages; every query forwards verbatim.
    pub fn new(base: M) -> Self {
        Self {
            base,
            stages: Vec::new(),
            mapping: RefCell::new(HashMap::new()),
        }
    }

    /// The innermost model.
    pub fn base_model(&self) -> &M {
        &self.base
    }

    /// Mutable access to the innermost model. Drops cached mappings.
    pub fn base_model_mut(&mut self) -> &mut M {
        self.mapping.get_mut().clear();
        &mut self.base
    }

    /// Unwraps the chain, dropping all stages.
    pub fn into_base(self) -> M {
        self.base
    }

    /// The stages, innermost first.
    pub fn stages(&self) -> &[ProxyStage] {
        &self.stages
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns `true` when the chain forwards everything to the base model.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Adds an outermost stage.
    pub fn push_stage(&mut self, stage: impl Into<ProxyStage>) {
        self.stages.push(stage.into());
        self.stages_changed();
    }

    /// Removes the outermost stage.
    pub fn pop_stage(&mut self) -> Result<ProxyStage, ProxyError> {
        let stage = self.stages.pop().ok_or(ProxyError::Empty)?;
        self.stages_changed();
        Ok(stage)
    }

    /// Inserts a stage at `index`, `0` being innermost.
    pub fn insert_stage(
        &mut self,
        index: usize,
        stage: impl Into<ProxyStage>,
    ) -> Result<(), ProxyError> {
        let len = self.stages.len();
        if index > len {
            return Err(ProxyError::OutOfRange { index, len });
        }
        self.stages.insert(index, stage.into());
        self.stages_changed();
        Ok(())
    }

    /// Removes the stage at `index`. Outer stages then read from the stage
    /// that was below it.
    pub fn remove_stage(&mut self, index: usize) -> Result<ProxyStage, ProxyError> {
        let len = self.stages.len();
        if len == 0 {
            return Err(ProxyError::Empty);
        }
        if index >= len {
            return Err(ProxyError::OutOfRange { index, len });
        }
        let stage = self.stages.remove(index);
        self.stages_changed();
        Ok(stage)
    }

    /// Removes every stage and returns them, innermost first.
    pub fn clear_stages(&mut self) -> Vec<ProxyStage> {
        let stages = core::mem::take(&mut self.stages);
        self.stages_changed();
        stages
    }

    /// Drops cached child lists. Call after the base model changed.
    pub fn invalidate(&self) {
        self.mapping.borrow_mut().clear();
    }

    /// Sorts by `keys`.
    ///
    /// If the base model can honor every key it sorts itself and existing sort
    /// stages are removed. Otherwise the first sort stage is given the new
    /// keys, or a sort stage is pushed when there is none.
    pub fn sort_by(&mut self, keys: &[SortKey]) {
        if self.base.can_sort(keys) && self.base.sort(keys) {
            tracing::debug!(target: "dataview_model::proxy", keys = keys.len(), "base model sorted itself");
            self.stages.retain(|s| !s.is_sort());
        } else if let Some(ProxyStage::Sort(stage)) = self.stages.iter_mut().find(|s| s.is_sort()) {
            stage.keys = keys.to_vec();
        } else {
            self.stages.push(ProxyStage::Sort(SortStage::new(keys)));
        }
        self.stages_changed();
    }

    /// Removes all sort stages and restores the base model's natural order.
    pub fn reset_sorting(&mut self) {
        self.stages.retain(|s| !s.is_sort());
        self.base.reset_sorting();
        self.stages_changed();
    }

    fn stages_changed(&mut self) {
        tracing::debug!(target: "dataview_model::proxy", stages = self.stages.len(), "proxy chain changed");
        self.mapping.get_mut().clear();
    }

    fn compute_children(&self, parent: &ItemId) -> Vec<ItemId> {
        let count = self.base.child_count(parent);
        let mut children: Vec<ItemId> = (0..count)
            .map(|i| self.base.child(parent, i).without_child_index())
            .filter(ItemId::is_valid)
            .collect();
        for stage in &self.stages {
            stage.apply(&self.base, &mut children);
        }
        tracing::trace!(
            target: "dataview_model::proxy",
            base = count,
            mapped = children.len(),
            "mapped children"
        );
        children
    }

    fn with_children<R>(&self, parent: &ItemId, f: impl FnOnce(&[ItemId]) -> R) -> R {
        let key = parent.without_child_index();
        if let Some(children) = self.mapping.borrow().get(&key) {
            return f(children);
        }
        let children = self.compute_children(&key);
        let result = f(&children);
        self.mapping.borrow_mut().insert(key, children);
        result
    }
}

impl<M: DataModel> HierarchyProvider for ProxyChain<M> {
    fn model_id(&self) -> ModelId {
        self.base.model_id()
    }

    fn root_item(&self) -> ItemId {
        self.base.root_item()
    }

    fn parent(&self, id: &ItemId) -> ItemId {
        self.base.parent(&id.without_child_index())
    }

    fn child_count(&self, id: &ItemId) -> usize {
        if self.stages.is_empty() {
            return self.base.child_count(id);
        }
        self.with_children(id, <[ItemId]>::len)
    }

    fn child(&self, parent: &ItemId, index: usize) -> ItemId {
        if self.stages.is_empty() {
            return self.base.child(parent, index);
        }
        self.with_children(parent, |children| {
            children
                .get(index)
                .map_or(ItemId::INVALID, |c| c.with_child_index(index))
        })
    }

    fn child_index(&self, parent: &ItemId, child: &ItemId) -> Option<usize> {
        if self.stages.is_empty() {
            return self.base.child_index(parent, child);
        }
        self.with_children(parent, |children| {
            if let Some(hint) = child.child_index_hint()
                && children.get(hint) == Some(child)
            {
                return Some(hint);
            }
            children.iter().position(|c| c == child)
        })
    }
}

impl<M: DataModel> DataModel for ProxyChain<M> {
    fn field_count(&self) -> usize {
        self.base.field_count()
    }

    fn value(&self, id: &ItemId, field: usize) -> Value {
        self.base.value(&id.without_child_index(), field)
    }

    fn set_value(&mut self, id: &ItemId, field: usize, value: Value) -> bool {
        let changed = self.base.set_value(&id.without_child_index(), field, value);
        if changed && !self.stages.is_empty() {
            self.mapping.get_mut().clear();
        }
        changed
    }

    fn item_flags(&self, id: &ItemId, field: usize) -> ItemFlags {
        self.base.item_flags(&id.without_child_index(), field)
    }

    fn compare(&self, a: &ItemId, b: &ItemId, field: usize) -> Ordering {
        self.base.compare(a, b, field)
    }

    fn can_sort(&self, keys: &[SortKey]) -> bool {
        let fields = self.base.field_count();
        keys.iter().all(|k| k.field < fields)
    }

    fn sort(&mut self, keys: &[SortKey]) -> bool {
        if !self.can_sort(keys) {
            return false;
        }
        self.sort_by(keys);
        true
    }

    fn reset_sorting(&mut self) {
        Self::reset_sorting(self);
    }
}
