// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The paint surface abstraction and a recording implementation.

use alloc::string::String;
use alloc::vec::Vec;

use dataview_model::CheckState;
use kurbo::{Point, Rect};

/// Semantic paint roles. Hosts map them to actual colors.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Paint {
    /// View background.
    Background,
    /// Background of odd rows when alternating rows are on.
    AlternateBackground,
    /// Background of selected rows.
    Selection,
    /// Row and column rules.
    GridLine,
    /// Tree connector lines.
    TreeLine,
    /// Regular text.
    Text,
    /// Text on a selected row.
    SelectedText,
    /// Text of a disabled item.
    DisabledText,
    /// Progress bar fill.
    Progress,
}

/// A target the renderer paints into.
///
/// Coordinates are client-space pixels. The renderer never paints outside
/// the client area it was given.
pub trait Surface {
    /// Fills `rect`.
    fn fill_rect(&mut self, rect: Rect, paint: Paint);
    /// Draws a one pixel line.
    fn line(&mut self, from: Point, to: Point, paint: Paint);
    /// Draws `text` inside `rect`, clipped.
    fn text(&mut self, rect: Rect, text: &str, paint: Paint);
    /// Draws an expander button.
    fn expander(&mut self, rect: Rect, expanded: bool);
    /// Draws a check box.
    fn checkbox(&mut self, rect: Rect, check: CheckState, enabled: bool);
    /// Draws the focus indicator around `rect`.
    fn focus_rect(&mut self, rect: Rect);
}

/// One recorded drawing command.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// See [`Surface::fill_rect`].
    Fill(Rect, Paint),
    /// See [`Surface::line`].
    Line(Point, Point, Paint),
    /// See [`Surface::text`].
    Text(Rect, String, Paint),
    /// See [`Surface::expander`].
    Expander(Rect, bool),
    /// See [`Surface::checkbox`].
    Checkbox(Rect, CheckState, bool),
    /// See [`Surface::focus_rect`].
    Focus(Rect),
}

/// A [`Surface`] that records commands for later replay or inspection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DisplayList {
    /// Commands in paint order.
    pub ops: Vec<DrawOp>,
}

impl DisplayList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all commands.
    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Recorded texts in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(_, text, _) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Replays the commands onto another surface.
    pub fn replay(&self, target: &mut dyn Surface) {
        for op in &self.ops {
            match op {
                DrawOp::Fill(rect, paint) => target.fill_rect(*rect, *paint),
                DrawOp::Line(from, to, paint) => target.line(*from, *to, *paint),
                DrawOp::Text(rect, text, paint) => target.text(*rect, text, *paint),
                DrawOp::Expander(rect, expanded) => target.expander(*rect, *expanded),
                DrawOp::Checkbox(rect, check, enabled) => target.checkbox(*rect, *check, *enabled),
                DrawOp::Focus(rect) => target.focus_rect(*rect),
            }
        }
    }
}

impl Surface for DisplayList {
    fn fill_rect(&mut self, rect: Rect, paint: Paint) {
        self.ops.push(DrawOp::Fill(rect, paint));
    }

    fn line(&mut self, from: Point, to: Point, paint: Paint) {
        self.ops.push(DrawOp::Line(from, to, paint));
    }

    fn text(&mut self, rect: Rect, text: &str, paint: Paint) {
        self.ops.push(DrawOp::Text(rect, String::from(text), paint));
    }

    fn expander(&mut self, rect: Rect, expanded: bool) {
        self.ops.push(DrawOp::Expander(rect, expanded));
    }

    fn checkbox(&mut self, rect: Rect, check: CheckState, enabled: bool) {
        self.ops.push(DrawOp::Checkbox(rect, check, enabled));
    }

    fn focus_rect(&mut self, rect: Rect) {
        self.ops.push(DrawOp::Focus(rect));
    }
}
