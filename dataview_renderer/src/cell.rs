// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cell rendering and editing capabilities.
//!
//! Each column resolves its renderer once, as a [`CellKind`]. The built-in
//! kinds are dispatched with a `match` in the paint loop; only
//! [`CellKind::Custom`] goes through a trait object.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use core::fmt;

use dataview_model::{CheckState, ItemId, Value};
use kurbo::{Rect, Size};

use crate::surface::{Paint, Surface};

bitflags::bitflags! {
    /// Per-cell state passed to renderers.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CellState: u8 {
        /// The row is selected.
        const SELECTED = 0b0001;
        /// The row has keyboard focus.
        const FOCUSED  = 0b0010;
        /// The item is disabled.
        const DISABLED = 0b0100;
        /// The cell is being edited.
        const EDITING  = 0b1000;
    }
}

impl CellState {
    /// Paint role for text in this state.
    #[must_use]
    pub fn text_paint(self) -> Paint {
        if self.contains(Self::DISABLED) {
            Paint::DisabledText
        } else if self.contains(Self::SELECTED) {
            Paint::SelectedText
        } else {
            Paint::Text
        }
    }
}

/// A custom cell renderer.
pub trait CellRenderer {
    /// Preferred size of the cell. A zero height accepts the nominal row
    /// height.
    fn size(&self, state: CellState, value: &Value) -> Size;

    /// Paints `value` inside `rect`.
    fn render(&self, surface: &mut dyn Surface, rect: Rect, state: CellState, value: &Value);
}

/// How a column paints its cells.
#[derive(Default)]
pub enum CellKind {
    /// The value's display string.
    #[default]
    Text,
    /// A check box driven by a boolean or tri-state value.
    Check,
    /// A horizontal bar filled to the value's percentage, 0 to 100.
    Progress,
    /// A host-provided renderer.
    Custom(Box<dyn CellRenderer>),
}

impl fmt::Debug for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("Text"),
            Self::Check => f.write_str("Check"),
            Self::Progress => f.write_str("Progress"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

fn check_of(value: &Value) -> CheckState {
    match value {
        Value::Check(check) => *check,
        other => match other.as_bool() {
            Some(true) => CheckState::Checked,
            _ => CheckState::Unchecked,
        },
    }
}

impl CellKind {
    /// Preferred size of a cell. Built-in kinds accept the nominal row height.
    #[must_use]
    pub fn size(&self, state: CellState, value: &Value) -> Size {
        match self {
            Self::Custom(renderer) => renderer.size(state, value),
            Self::Text | Self::Check | Self::Progress => Size::ZERO,
        }
    }

    /// Paints `value` inside `rect`.
    pub fn render(
        &self,
        surface: &mut dyn Surface,
        rect: Rect,
        state: CellState,
        value: &Value,
        checkbox_size: f64,
    ) {
        match self {
            Self::Text => {
                let text = value.display_string();
                if !text.is_empty() {
                    surface.text(rect, &text, state.text_paint());
                }
            }
            Self::Check => {
                let side = checkbox_size.min(rect.height()).min(rect.width());
                let origin = (
                    rect.x0 + (rect.width() - side) / 2.0,
                    rect.y0 + (rect.height() - side) / 2.0,
                );
                let boxed = Rect::from_origin_size(origin, (side, side));
                surface.checkbox(boxed, check_of(value), !state.contains(CellState::DISABLED));
            }
            Self::Progress => {
                let percent = value.as_f64().unwrap_or(0.0).clamp(0.0, 100.0);
                let filled = Rect::new(
                    rect.x0,
                    rect.y0,
                    rect.x0 + rect.width() * percent / 100.0,
                    rect.y1,
                );
                surface.fill_rect(filled, Paint::Progress);
                surface.text(rect, &format!("{percent:.0}%"), state.text_paint());
            }
            Self::Custom(renderer) => renderer.render(surface, rect, state, value),
        }
    }
}

/// An in-place editor for one cell at a time.
///
/// The editor owns whatever input widget the host shows. The renderer only
/// drives its lifecycle: start, query, validate, finish.
pub trait CellEditor {
    /// Begins editing `field` of `id`, showing `value` inside `rect`.
    /// Returns `false` if the editor refuses.
    fn start_editing(&mut self, id: &ItemId, field: usize, value: &Value, rect: Rect) -> bool;

    /// The value currently entered.
    fn value(&self) -> Value;

    /// Replaces the entered value, as typing into the input would.
    /// Returns `false` if the editor does not accept it.
    fn set_value(&mut self, _value: Value) -> bool {
        false
    }

    /// Whether the entered value may be committed.
    fn can_finish(&self) -> bool {
        true
    }

    /// Tears down the input.
    fn finish(&mut self);
}

/// A single-line text editor.
#[derive(Clone, Debug, Default)]
pub struct TextEditor {
    text: Option<String>,
    allow_empty: bool,
}

impl TextEditor {
    /// Creates an editor that accepts empty text.
    #[must_use]
    pub fn new() -> Self {
        Self {
            text: None,
            allow_empty: true,
        }
    }

    /// Creates an editor that refuses to commit empty text.
    #[must_use]
    pub fn non_empty() -> Self {
        Self {
            text: None,
            allow_empty: false,
        }
    }

    /// The text being edited, if active.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Whether an edition is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.text.is_some()
    }
}

impl CellEditor for TextEditor {
    fn start_editing(&mut self, _id: &ItemId, _field: usize, value: &Value, _rect: Rect) -> bool {
        self.text = Some(value.display_string());
        true
    }

    fn value(&self) -> Value {
        self.text.clone().map_or(Value::Empty, Value::Text)
    }

    fn set_value(&mut self, value: Value) -> bool {
        match &mut self.text {
            Some(text) => {
                *text = value.display_string();
                true
            }
            None => false,
        }
    }

    fn can_finish(&self) -> bool {
        self.allow_empty || self.text.as_ref().is_some_and(|t| !t.is_empty())
    }

    fn finish(&mut self) {
        self.text = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DisplayList, DrawOp};

    #[test]
    fn progress_fills_proportionally() {
        let mut list = DisplayList::new();
        let rect = Rect::new(0.0, 0.0, 200.0, 20.0);
        CellKind::Progress.render(&mut list, rect, CellState::empty(), &Value::Int(25), 13.0);
        assert_eq!(
            list.ops[0],
            DrawOp::Fill(Rect::new(0.0, 0.0, 50.0, 20.0), Paint::Progress)
        );
        assert_eq!(list.texts().next(), Some("25%"));
    }

    #[test]
    fn check_cells_center_their_box() {
        let mut list = DisplayList::new();
        let rect = Rect::new(0.0, 0.0, 33.0, 23.0);
        CellKind::Check.render(&mut list, rect, CellState::DISABLED, &Value::Bool(true), 13.0);
        assert_eq!(
            list.ops,
            [DrawOp::Checkbox(
                Rect::new(10.0, 5.0, 23.0, 18.0),
                CheckState::Checked,
                false
            )]
        );
    }

    #[test]
    fn empty_text_draws_nothing() {
        let mut list = DisplayList::new();
        CellKind::Text.render(&mut list, Rect::ZERO, CellState::SELECTED, &Value::Empty, 13.0);
        assert!(list.ops.is_empty());
    }

    #[test]
    fn text_editor_lifecycle() {
        let mut editor = TextEditor::non_empty();
        assert!(!editor.set_value(Value::from("x")));
        assert!(editor.start_editing(&ItemId::INVALID, 0, &Value::from("abc"), Rect::ZERO));
        assert_eq!(editor.text(), Some("abc"));
        assert!(editor.set_value(Value::from("")));
        assert!(!editor.can_finish());
        assert!(editor.set_value(Value::from("def")));
        assert!(editor.can_finish());
        assert_eq!(editor.value(), Value::from("def"));
        editor.finish();
        assert!(!editor.is_active());
    }
}
