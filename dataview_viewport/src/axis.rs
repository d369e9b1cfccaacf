// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One scrollbar's state.

/// Alignment mode when scrolling a span into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAlign {
    /// Align the start of the span with the start of the page.
    Start,
    /// Center the span within the page.
    Center,
    /// Align the end of the span with the end of the page.
    End,
    /// Move just enough to make the span fully visible, preferring the
    /// smallest change from the current position.
    Nearest,
}

/// Position, page, and range of one scroll axis, in whole units.
///
/// The vertical axis of a tree view counts rows; the horizontal one counts
/// pixels. The position always stays within `0..=range - page`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollAxis {
    position: usize,
    page: usize,
    range: usize,
}

impl ScrollAxis {
    /// Creates an axis, clamping `position`.
    #[must_use]
    pub fn new(position: usize, page: usize, range: usize) -> Self {
        let mut axis = Self {
            position,
            page,
            range,
        };
        axis.clamp();
        axis
    }

    /// First visible unit.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Number of units visible at once.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Total number of units.
    #[must_use]
    pub const fn range(&self) -> usize {
        self.range
    }

    /// Largest valid position.
    #[must_use]
    pub const fn max_position(&self) -> usize {
        self.range.saturating_sub(self.page)
    }

    /// Returns `true` if the content does not fit in one page.
    #[must_use]
    pub const fn is_needed(&self) -> bool {
        self.range > self.page
    }

    fn clamp(&mut self) {
        self.position = self.position.min(self.max_position());
    }

    /// Sets the position, clamped. Returns `true` if it changed.
    pub fn set_position(&mut self, position: usize) -> bool {
        let old = self.position;
        self.position = position;
        self.clamp();
        self.position != old
    }

    /// Moves the position by `delta` units, clamped.
    pub fn scroll_by(&mut self, delta: isize) -> bool {
        let target = if delta < 0 {
            self.position.saturating_sub(delta.unsigned_abs())
        } else {
            self.position.saturating_add(delta.unsigned_abs())
        };
        self.set_position(target)
    }

    /// Sets the page size and re-clamps the position.
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
        self.clamp();
    }

    /// Sets the range and re-clamps the position.
    pub fn set_range(&mut self, range: usize) {
        self.range = range;
        self.clamp();
    }

    /// Grows or shrinks the range by `delta`, saturating at zero.
    pub fn adjust_range(&mut self, delta: isize) {
        let range = if delta < 0 {
            self.range.saturating_sub(delta.unsigned_abs())
        } else {
            self.range.saturating_add(delta.unsigned_abs())
        };
        self.set_range(range);
    }

    /// Returns `true` if unit `index` is on the current page.
    #[must_use]
    pub const fn contains(&self, index: usize) -> bool {
        index >= self.position && index < self.position + self.page
    }

    /// Position that brings `start..start + len` into view with `align`.
    ///
    /// The result is clamped to the valid range.
    #[must_use]
    pub fn target_for(&self, start: usize, len: usize, align: ScrollAlign) -> usize {
        let end = start + len;
        let target = match align {
            ScrollAlign::Start => start,
            ScrollAlign::End => end.saturating_sub(self.page),
            ScrollAlign::Center => ((start + end) / 2).saturating_sub(self.page / 2),
            ScrollAlign::Nearest => {
                let view_end = self.position + self.page;
                if start >= self.position && end <= view_end {
                    self.position
                } else if start < self.position || len > self.page {
                    start
                } else {
                    end.saturating_sub(self.page)
                }
            }
        };
        target.min(self.max_position())
    }

    /// Scrolls `start..start + len` into view. Returns `true` if the position changed.
    pub fn scroll_to(&mut self, start: usize, len: usize, align: ScrollAlign) -> bool {
        let target = self.target_for(start, len, align);
        self.set_position(target)
    }
}
