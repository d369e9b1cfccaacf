// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Column descriptions.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use dataview_viewport::ColumnExtent;

use crate::cell::{CellEditor, CellKind};

/// One view column bound to a model field.
pub struct Column {
    /// Header text.
    pub title: String,
    /// Model field shown in this column.
    pub field: usize,
    /// Width in pixels.
    pub width: f64,
    /// Hidden columns take no space and are never hit.
    pub hidden: bool,
    /// How cells are painted.
    pub kind: CellKind,
    /// In-place editor, if the column is editable.
    pub editor: Option<Box<dyn CellEditor>>,
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("title", &self.title)
            .field("field", &self.field)
            .field("width", &self.width)
            .field("hidden", &self.hidden)
            .field("kind", &self.kind)
            .field("editable", &self.editor.is_some())
            .finish()
    }
}

impl Column {
    /// A text column.
    pub fn new(title: impl Into<String>, field: usize, width: f64) -> Self {
        Self {
            title: title.into(),
            field,
            width,
            hidden: false,
            kind: CellKind::Text,
            editor: None,
        }
    }

    /// Replaces the cell kind.
    #[must_use]
    pub fn with_kind(mut self, kind: CellKind) -> Self {
        self.kind = kind;
        self
    }

    /// Makes the column editable.
    #[must_use]
    pub fn with_editor(mut self, editor: impl CellEditor + 'static) -> Self {
        self.editor = Some(Box::new(editor));
        self
    }

    /// Hides or shows the column.
    #[must_use]
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }
}

/// The ordered columns of a view.
#[derive(Debug, Default)]
pub struct Columns {
    list: Vec<Column>,
}

impl Columns {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column and returns its index.
    pub fn push(&mut self, column: Column) -> usize {
        self.list.push(column);
        self.list.len() - 1
    }

    /// Inserts a column at `index`, clamped to the end.
    pub fn insert(&mut self, index: usize, column: Column) {
        let index = index.min(self.list.len());
        self.list.insert(index, column);
    }

    /// Removes the column at `index`.
    pub fn remove(&mut self, index: usize) -> Option<Column> {
        (index < self.list.len()).then(|| self.list.remove(index))
    }

    /// The column at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Column> {
        self.list.get(index)
    }

    /// The column at `index`, mutably.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Column> {
        self.list.get_mut(index)
    }

    /// Number of columns, hidden ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns `true` if there are no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Columns in order.
    pub fn iter(&self) -> core::slice::Iter<'_, Column> {
        self.list.iter()
    }

    /// First column showing `field`.
    #[must_use]
    pub fn position_of_field(&self, field: usize) -> Option<usize> {
        self.list.iter().position(|c| c.field == field)
    }
}

impl<'a> IntoIterator for &'a Columns {
    type Item = &'a Column;
    type IntoIter = core::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}

impl FromIterator<Column> for Columns {
    fn from_iter<I: IntoIterator<Item = Column>>(iter: I) -> Self {
        Self {
            list: iter.into_iter().collect(),
        }
    }
}

impl ColumnExtent for Columns {
    fn column_count(&self) -> usize {
        self.list.len()
    }

    fn column_width(&self, index: usize) -> f64 {
        self.list.get(index).map_or(0.0, |c| c.width)
    }

    fn is_column_visible(&self, index: usize) -> bool {
        self.list.get(index).is_some_and(|c| !c.hidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::TextEditor;
    use dataview_viewport::{column_at, total_width};

    #[test]
    fn hidden_columns_are_skipped() {
        let columns: Columns = [
            Column::new("Name", 0, 120.0),
            Column::new("Size", 1, 60.0).hidden(true),
            Column::new("Kind", 2, 80.0).with_editor(TextEditor::new()),
        ]
        .into_iter()
        .collect();
        assert!((total_width(&columns) - 200.0).abs() < f64::EPSILON);
        assert_eq!(column_at(&columns, 130.0), Some(2));
        assert_eq!(columns.position_of_field(2), Some(2));
        assert!(columns.get(2).is_some_and(|c| c.editor.is_some()));
    }

    #[test]
    fn insert_and_remove() {
        let mut columns = Columns::new();
        columns.push(Column::new("A", 0, 10.0));
        columns.insert(10, Column::new("B", 1, 10.0));
        columns.insert(0, Column::new("C", 2, 10.0));
        let titles: Vec<&str> = columns.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["C", "A", "B"]);
        assert!(columns.remove(3).is_none());
        assert_eq!(columns.remove(0).map(|c| c.field), Some(2));
        assert_eq!(columns.len(), 2);
    }
}
