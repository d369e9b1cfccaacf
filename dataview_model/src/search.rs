// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear item search over field values.
//!
//! Searches walk the tree with [`next_item`](crate::traverse::next_item) and
//! [`prev_item`](crate::traverse::prev_item), so they only visit nodes the
//! given state view exposes. Pass [`FullyExpanded`](crate::FullyExpanded) to
//! search collapsed subtrees too. The root item is never matched.

use alloc::string::String;

use crate::{DataModel, ItemId, StateProvider, traverse};

/// How a pattern is matched against a field's display string.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// The whole string must equal the pattern.
    #[default]
    Full,
    /// The pattern must occur somewhere in the string.
    Partial,
    /// The pattern is a regular expression that must match somewhere.
    #[cfg(feature = "regex")]
    Regex,
}

/// Failure to build a [`SearchQuery`].
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The regular expression did not compile.
    #[cfg(feature = "regex")]
    #[error("invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// A compiled search request.
#[derive(Clone, Debug)]
pub struct SearchQuery {
    pattern: String,
    mode: MatchMode,
    case_sensitive: bool,
    field: Option<usize>,
    #[cfg(feature = "regex")]
    regex: Option<regex::Regex>,
}

impl SearchQuery {
    /// Case-sensitive full match over all fields.
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: String::from(pattern),
            mode: MatchMode::Full,
            case_sensitive: true,
            field: None,
            #[cfg(feature = "regex")]
            regex: None,
        }
    }

    /// Case-sensitive substring match over all fields.
    #[must_use]
    pub fn partial(pattern: &str) -> Self {
        Self {
            mode: MatchMode::Partial,
            ..Self::new(pattern)
        }
    }

    /// Regular expression search over all fields.
    #[cfg(feature = "regex")]
    pub fn regex(pattern: &str) -> Result<Self, SearchError> {
        Self::new(pattern).with_mode(MatchMode::Regex)
    }

    /// Changes the match mode, compiling the pattern if needed.
    pub fn with_mode(mut self, mode: MatchMode) -> Result<Self, SearchError> {
        self.mode = mode;
        self.compile()?;
        Ok(self)
    }

    /// Restricts matching to one field.
    #[must_use]
    pub fn in_field(mut self, field: usize) -> Self {
        self.field = Some(field);
        self
    }

    /// Sets case sensitivity.
    pub fn case_sensitive(mut self, yes: bool) -> Result<Self, SearchError> {
        self.case_sensitive = yes;
        self.compile()?;
        Ok(self)
    }

    /// The match mode.
    #[must_use]
    pub const fn mode(&self) -> MatchMode {
        self.mode
    }

    /// The searched field, or `None` for every field.
    #[must_use]
    pub const fn field(&self) -> Option<usize> {
        self.field
    }

    #[cfg(feature = "regex")]
    fn compile(&mut self) -> Result<(), SearchError> {
        self.regex = match self.mode {
            MatchMode::Regex => Some(
                regex::RegexBuilder::new(&self.pattern)
                    .case_insensitive(!self.case_sensitive)
                    .build()?,
            ),
            _ => None,
        };
        Ok(())
    }

    #[cfg(not(feature = "regex"))]
    fn compile(&mut self) -> Result<(), SearchError> {
        Ok(())
    }

    /// Tests one string against the query.
    #[must_use]
    pub fn matches_str(&self, text: &str) -> bool {
        #[cfg(feature = "regex")]
        if self.mode == MatchMode::Regex {
            return self.regex.as_ref().is_some_and(|re| re.is_match(text));
        }
        if self.case_sensitive {
            match self.mode {
                MatchMode::Partial => text.contains(self.pattern.as_str()),
                _ => text == self.pattern,
            }
        } else {
            let text = text.to_lowercase();
            let pattern = self.pattern.to_lowercase();
            match self.mode {
                MatchMode::Partial => text.contains(pattern.as_str()),
                _ => text == pattern,
            }
        }
    }

    /// Tests the fields of one item.
    pub fn matches<M>(&self, model: &M, id: &ItemId) -> bool
    where
        M: DataModel + ?Sized,
    {
        match self.field {
            Some(field) => self.matches_str(&model.value(id, field).display_string()),
            None => (0..model.field_count())
                .any(|field| self.matches_str(&model.value(id, field).display_string())),
        }
    }
}

/// First matching item in depth-first order.
pub fn find_first<M>(model: &M, state: &dyn StateProvider, query: &SearchQuery) -> Option<ItemId>
where
    M: DataModel + ?Sized,
{
    find_next(model, state, &model.root_item(), query)
}

/// First match strictly after `from`.
pub fn find_next<M>(
    model: &M,
    state: &dyn StateProvider,
    from: &ItemId,
    query: &SearchQuery,
) -> Option<ItemId>
where
    M: DataModel + ?Sized,
{
    let mut cur = *from;
    loop {
        cur = traverse::next_item(model, state, &cur, 1)?;
        if query.matches(model, &cur) {
            return Some(cur);
        }
    }
}

/// Last match strictly before `from`.
pub fn find_prev<M>(
    model: &M,
    state: &dyn StateProvider,
    from: &ItemId,
    query: &SearchQuery,
) -> Option<ItemId>
where
    M: DataModel + ?Sized,
{
    let mut cur = *from;
    loop {
        cur = traverse::prev_item(model, state, &cur, 1)?;
        if cur.is_root() {
            return None;
        }
        if query.matches(model, &cur) {
            return Some(cur);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FullyExpanded, HierarchyProvider, TreeStore, Value};
    use alloc::vec;

    fn sample() -> (TreeStore, [ItemId; 4]) {
        let mut store = TreeStore::new(2);
        let root = store.root_item();
        let apple = store.append(&root, vec!["Apple".into(), Value::Int(3)]);
        let pear = store.append(&apple, vec!["pear".into(), Value::Int(12)]);
        let grape = store.append(&root, vec!["Grape".into(), Value::Int(3)]);
        let apricot = store.append(&grape, vec!["apricot".into(), Value::Int(7)]);
        (store, [apple, pear, grape, apricot])
    }

    #[test]
    fn full_and_partial() {
        let (store, [apple, pear, ..]) = sample();
        let s = FullyExpanded;
        assert_eq!(find_first(&store, &s, &SearchQuery::new("Apple")), Some(apple));
        assert_eq!(find_first(&store, &s, &SearchQuery::new("apple")), None);
        assert_eq!(find_first(&store, &s, &SearchQuery::partial("ea")), Some(pear));
        let q = SearchQuery::new("APPLE").case_sensitive(false).unwrap();
        assert_eq!(find_first(&store, &s, &q), Some(apple));
    }

    #[test]
    fn field_restriction() {
        let (store, [apple, _, grape, _]) = sample();
        let s = FullyExpanded;
        let q = SearchQuery::new("3");
        assert_eq!(find_first(&store, &s, &q), Some(apple));
        assert_eq!(find_next(&store, &s, &apple, &q), Some(grape));
        assert_eq!(find_first(&store, &s, &q.clone().in_field(0)), None);
    }

    #[test]
    fn backwards() {
        let (store, [apple, _, _, apricot]) = sample();
        let s = FullyExpanded;
        let q = SearchQuery::partial("A").case_sensitive(false).unwrap();
        assert_eq!(find_prev(&store, &s, &apricot, &q), Some(store.child(&store.root_item(), 1)));
        assert_eq!(find_prev(&store, &s, &apple, &q), None);
    }

    #[cfg(feature = "regex")]
    #[test]
    fn regular_expressions() {
        let (store, [_, pear, _, apricot]) = sample();
        let s = FullyExpanded;
        let q = SearchQuery::regex("^ap.*t$").unwrap();
        assert_eq!(find_first(&store, &s, &q), Some(apricot));
        let q = SearchQuery::regex("^1[0-9]$").unwrap().in_field(1);
        assert_eq!(find_first(&store, &s, &q), Some(pear));
        assert!(SearchQuery::regex("(").is_err());
    }
}
