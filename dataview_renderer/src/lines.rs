// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree connector lines.
//!
//! A row's connectors depend only on its level and on whether the item and
//! each of its ancestors is the last child of its parent. The renderer
//! builds that "is last" stack per visible row by climbing parents, so the
//! cost is O(depth) per row and never touches rows outside the view.

use dataview_model::{HierarchyProvider, ItemId, traverse};
use kurbo::{Line, Point, Rect};
use smallvec::SmallVec;

use crate::config::{RendererConfig, TreeLineStyle};
use crate::geometry::expander_center_x;

/// "Is last child" flags from the outermost shown level down to the item
/// itself.
pub type LastChildStack = SmallVec<[bool; 16]>;

/// Connector segments of one row.
pub type Segments = SmallVec<[Line; 8]>;

/// Builds the [`LastChildStack`] of `id`, whose view level is `level`.
///
/// The stack has `level + 1` entries; the last one describes `id`.
pub fn last_child_stack<M>(model: &M, id: &ItemId, level: usize) -> LastChildStack
where
    M: HierarchyProvider + ?Sized,
{
    let mut stack = LastChildStack::new();
    let mut cur = *id;
    for _ in 0..=level {
        if !cur.is_valid() {
            stack.push(true);
            continue;
        }
        stack.push(traverse::is_last_child(model, &cur));
        cur = model.parent(&cur);
    }
    stack.reverse();
    stack
}

fn vertical(x: f64, y0: f64, y1: f64) -> Line {
    Line::new(Point::new(x, y0), Point::new(x, y1))
}

/// Connector segments for a row.
///
/// `cell` is the tree-column cell of the row and `stack` its
/// [`LastChildStack`]. With [`TreeLineStyle::AtItem`] each sibling group is
/// joined through its own expanders. With [`TreeLineStyle::AtExpander`] the
/// group is joined in the parent's expander column, so top-level rows get no
/// vertical.
#[must_use]
pub fn segments(config: &RendererConfig, cell: Rect, stack: &[bool]) -> Segments {
    let mut out = Segments::new();
    let Some((&is_last, ancestors)) = stack.split_last() else {
        return out;
    };
    let level = ancestors.len();
    let mid = (cell.y0 + cell.y1) / 2.0;
    let center = |level: usize| expander_center_x(config, cell.x0, level);
    let half = config.expander_size / 2.0;

    let (group_x, connector) = match config.tree_lines {
        TreeLineStyle::None => return out,
        TreeLineStyle::AtItem => {
            // Ancestor groups pass through this row where they continue.
            for (k, &ancestor_last) in ancestors.iter().enumerate() {
                if !ancestor_last {
                    out.push(vertical(center(k), cell.y0, cell.y1));
                }
            }
            let x = center(level);
            (x, Line::new(Point::new(x + half, mid), Point::new(x + half + config.margin, mid)))
        }
        TreeLineStyle::AtExpander => {
            if level == 0 {
                return out;
            }
            for (k, &ancestor_last) in ancestors.iter().enumerate().skip(1) {
                if !ancestor_last {
                    out.push(vertical(center(k - 1), cell.y0, cell.y1));
                }
            }
            let x = center(level - 1);
            (x, Line::new(Point::new(x, mid), Point::new(center(level) - half, mid)))
        }
    };
    out.push(vertical(group_x, cell.y0, mid));
    if !is_last {
        out.push(vertical(group_x, mid, cell.y1));
    }
    out.push(connector);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataview_model::{TreeStore, Value};

    fn config(style: TreeLineStyle) -> RendererConfig {
        RendererConfig {
            tree_lines: style,
            ..RendererConfig::default()
        }
    }

    const CELL: Rect = Rect::new(0.0, 0.0, 100.0, 20.0);

    #[test]
    fn stack_from_model() {
        let mut store = TreeStore::new(1);
        let root = store.root_item();
        let a = store.append(&root, [Value::from("a")].into());
        let a1 = store.append(&a, [Value::from("a1")].into());
        store.append(&a, [Value::from("a2")].into());
        store.append(&root, [Value::from("b")].into());
        // Root hidden: `a` is at level 0, `a1` at level 1.
        assert_eq!(last_child_stack(&store, &a1, 1).as_slice(), [false, false]);
        assert_eq!(last_child_stack(&store, &a, 0).as_slice(), [false]);
        // Root shown: one more level, the root counting as last.
        assert_eq!(last_child_stack(&store, &a1, 2).as_slice(), [true, false, false]);
    }

    #[test]
    fn at_item_lines() {
        let config = config(TreeLineStyle::AtItem);
        // Level 1, not last, ancestor not last.
        let s = segments(&config, CELL, &[false, false]);
        let c0 = 6.5;
        let c1 = 22.5;
        assert_eq!(
            s.as_slice(),
            [
                vertical(c0, 0.0, 20.0),
                vertical(c1, 0.0, 10.0),
                vertical(c1, 10.0, 20.0),
                Line::new(Point::new(27.0, 10.0), Point::new(29.0, 10.0)),
            ]
        );
        // Last child of a last ancestor: only the upper half and the connector.
        assert_eq!(segments(&config, CELL, &[true, true]).len(), 2);
    }

    #[test]
    fn at_expander_lines() {
        let config = config(TreeLineStyle::AtExpander);
        assert!(segments(&config, CELL, &[false]).is_empty());
        let s = segments(&config, CELL, &[false, true, false]);
        // Level 2: ancestor at level 1 is last, so no pass-through vertical.
        assert_eq!(
            s.as_slice(),
            [
                vertical(22.5, 0.0, 10.0),
                vertical(22.5, 10.0, 20.0),
                Line::new(Point::new(22.5, 10.0), Point::new(34.0, 10.0)),
            ]
        );
        let s = segments(&config, CELL, &[true, false, true]);
        assert_eq!(s[0], vertical(22.5 - 16.0, 0.0, 20.0));
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn no_lines() {
        assert!(segments(&config(TreeLineStyle::None), CELL, &[false]).is_empty());
        assert!(segments(&config(TreeLineStyle::AtItem), CELL, &[]).is_empty());
    }
}
