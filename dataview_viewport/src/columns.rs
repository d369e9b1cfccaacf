// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Column geometry.
//!
//! Column counts are small, so every lookup here is a linear scan over the
//! ordered columns. Hidden columns take no space.

/// An ordered list of columns with pixel widths.
pub trait ColumnExtent {
    /// Number of columns, hidden ones included.
    fn column_count(&self) -> usize;

    /// Width of column `index` in pixels.
    fn column_width(&self, index: usize) -> f64;

    /// Whether column `index` takes space.
    fn is_column_visible(&self, _index: usize) -> bool {
        true
    }
}

impl ColumnExtent for [f64] {
    fn column_count(&self) -> usize {
        self.len()
    }

    fn column_width(&self, index: usize) -> f64 {
        self.get(index).copied().unwrap_or(0.0)
    }
}

fn width_of<C: ColumnExtent + ?Sized>(columns: &C, index: usize) -> f64 {
    if columns.is_column_visible(index) {
        columns.column_width(index).max(0.0)
    } else {
        0.0
    }
}

/// Left edge of column `index` in content coordinates.
pub fn column_start<C: ColumnExtent + ?Sized>(columns: &C, index: usize) -> Option<f64> {
    if index >= columns.column_count() {
        return None;
    }
    Some((0..index).map(|i| width_of(columns, i)).sum())
}

/// Sum of the widths of visible columns.
pub fn total_width<C: ColumnExtent + ?Sized>(columns: &C) -> f64 {
    (0..columns.column_count()).map(|i| width_of(columns, i)).sum()
}

/// Column whose span `[start, start + width)` contains `x`.
///
/// Returns `None` for negative `x` and for `x` past the last column.
pub fn column_at<C: ColumnExtent + ?Sized>(columns: &C, x: f64) -> Option<usize> {
    if x < 0.0 {
        return None;
    }
    let mut start = 0.0;
    for i in 0..columns.column_count() {
        let width = width_of(columns, i);
        if width > 0.0 && x < start + width {
            return Some(i);
        }
        start += width;
    }
    None
}

/// First column that takes space.
pub fn first_visible_column<C: ColumnExtent + ?Sized>(columns: &C) -> Option<usize> {
    (0..columns.column_count()).find(|&i| width_of(columns, i) > 0.0)
}

/// Last column that takes space.
pub fn last_visible_column<C: ColumnExtent + ?Sized>(columns: &C) -> Option<usize> {
    (0..columns.column_count())
        .rev()
        .find(|&i| width_of(columns, i) > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Hidden<'a>(&'a [f64], usize);

    impl ColumnExtent for Hidden<'_> {
        fn column_count(&self) -> usize {
            self.0.len()
        }
        fn column_width(&self, index: usize) -> f64 {
            self.0[index]
        }
        fn is_column_visible(&self, index: usize) -> bool {
            index != self.1
        }
    }

    #[test]
    fn lookups() {
        let cols: &[f64] = &[100.0, 50.0, 25.0];
        assert_eq!(column_start(cols, 0), Some(0.0));
        assert_eq!(column_start(cols, 2), Some(150.0));
        assert_eq!(column_start(cols, 3), None);
        assert!((total_width(cols) - 175.0).abs() < f64::EPSILON);
        assert_eq!(column_at(cols, 0.0), Some(0));
        assert_eq!(column_at(cols, 99.9), Some(0));
        assert_eq!(column_at(cols, 100.0), Some(1));
        assert_eq!(column_at(cols, 174.0), Some(2));
        assert_eq!(column_at(cols, 175.0), None);
        assert_eq!(column_at(cols, -1.0), None);
    }

    #[test]
    fn hidden_columns_take_no_space() {
        let widths = [100.0, 50.0, 25.0];
        let cols = Hidden(&widths, 1);
        assert_eq!(column_start(&cols, 2), Some(100.0));
        assert_eq!(column_at(&cols, 120.0), Some(2));
        assert_eq!(last_visible_column(&Hidden(&widths, 2)), Some(1));
        assert_eq!(first_visible_column(&Hidden(&widths, 0)), Some(1));
    }
}
