use std::ops::Range;

use super::grid::RawGrid;

/// Half-open span along one axis
///
/// Bounds follow slice conventions: `None` is open-ended, negative values
/// count back from the end of the axis. Resolution clamps to the axis, so
/// a span that falls outside the grid resolves to an empty range instead
/// of failing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Option<isize>,
    pub end: Option<isize>,
}

impl Span {
    pub const ALL: Span = Span {
        start: None,
        end: None,
    };

    pub const fn starting_at(start: isize) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    pub const fn between(start: isize, end: isize) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Resolve against an axis of `len` items
    pub fn resolve(&self, len: usize) -> Range<usize> {
        let clamp = |bound: isize| -> usize {
            if bound < 0 {
                len.saturating_sub(bound.unsigned_abs())
            } else {
                (bound as usize).min(len)
            }
        };

        let start = self.start.map(clamp).unwrap_or(0);
        let end = self.end.map(clamp).unwrap_or(len);
        if start >= end {
            start..start
        } else {
            start..end
        }
    }
}

/// Rectangular region of interest within a grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Window {
    pub rows: Span,
    pub cols: Span,
}

impl Window {
    pub const ALL: Window = Window {
        rows: Span::ALL,
        cols: Span::ALL,
    };

    pub const fn new(rows: Span, cols: Span) -> Self {
        Self { rows, cols }
    }
}

/// Slice `grid` down to `window`
///
/// Never fails: an out-of-range window produces an empty grid. Short
/// exports are rejected later when there is no header row to promote.
pub fn select(grid: &RawGrid, window: Window) -> RawGrid {
    let rows = window.rows.resolve(grid.height());
    let cols = window.cols.resolve(grid.width());

    let selected = grid
        .rows()
        .skip(rows.start)
        .take(rows.len())
        .map(|row| row[cols.clone()].to_vec())
        .collect();

    RawGrid::new(selected)
}
