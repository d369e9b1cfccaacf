// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderer configuration.

use kurbo::Size;

bitflags::bitflags! {
    /// Boolean switches of a [`RendererConfig`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct RendererFlags: u16 {
        /// Do not show the root item; its children become the top-level rows.
        const HIDE_ROOT          = 0b0000_0000_0001;
        /// Reserve space for and draw check boxes on checkable items.
        const CHECKBOXES         = 0b0000_0000_0010;
        /// Draw a rule under every row.
        const HORIZONTAL_RULES   = 0b0000_0000_0100;
        /// Draw a rule after every column.
        const VERTICAL_RULES     = 0b0000_0000_1000;
        /// Alternate the background of odd rows.
        const ALTERNATING_ROWS   = 0b0000_0001_0000;
        /// Measure each row through the cell renderers instead of using the
        /// nominal row height.
        const VARIABLE_ROW_HEIGHT = 0b0000_0010_0000;
    }
}

impl Default for RendererFlags {
    fn default() -> Self {
        Self::HIDE_ROOT
    }
}

/// How tree connector lines are anchored.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TreeLineStyle {
    /// No connector lines.
    #[default]
    None,
    /// Each sibling group is joined through the middle of its own expanders
    /// and a horizontal connector runs from the expander to the item.
    AtItem,
    /// Each sibling group is joined in the column of the parent's expander
    /// and a horizontal connector runs from there to the item's expander.
    AtExpander,
}

/// Geometry and behaviour of a tree renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct RendererConfig {
    /// Switches.
    pub flags: RendererFlags,
    /// Connector line style.
    pub tree_lines: TreeLineStyle,
    /// Nominal row height, and the minimum when rows are measured.
    pub row_height: f64,
    /// Horizontal offset per tree level.
    pub indent: f64,
    /// Side of the square expander button.
    pub expander_size: f64,
    /// Side of the square check box.
    pub checkbox_size: f64,
    /// Gap between decorations and cell content.
    pub margin: f64,
    /// Distance from a cell border within which hits report an edge.
    pub edge_threshold: f64,
    /// Column that carries indentation, expanders, and check boxes.
    pub tree_column: usize,
    /// Width of the vertical scrollbar and height of the horizontal one.
    pub scrollbar: Size,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            flags: RendererFlags::default(),
            tree_lines: TreeLineStyle::default(),
            row_height: 20.0,
            indent: 16.0,
            expander_size: 9.0,
            checkbox_size: 13.0,
            margin: 2.0,
            edge_threshold: 3.0,
            tree_column: 0,
            scrollbar: Size::new(16.0, 16.0),
        }
    }
}

impl RendererConfig {
    /// Returns `true` if `flag` is set.
    #[must_use]
    pub fn has(&self, flag: RendererFlags) -> bool {
        self.flags.contains(flag)
    }

    /// Number of leading ranks the view does not show.
    #[must_use]
    pub fn hidden_ranks(&self) -> usize {
        usize::from(self.has(RendererFlags::HIDE_ROOT))
    }
}
