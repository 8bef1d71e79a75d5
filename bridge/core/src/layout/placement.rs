//! Region placement in grid cells
//!
//! Floating elements are positioned relative to the pad (the buffer area).
//! Every placement is clamped so the element stays inside the pad, and
//! clipped when it is larger than the pad.

use super::menu::MenuGrid;
use crate::protocol::{Coord, InfoStyle, MenuStyle};

/// A rectangle in grid cells
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GridRect {
    /// Top row
    pub row: usize,
    /// Left column
    pub column: usize,
    /// Height in rows
    pub rows: usize,
    /// Width in columns
    pub columns: usize,
}

impl GridRect {
    /// Create a rectangle
    #[must_use]
    pub fn new(row: usize, column: usize, rows: usize, columns: usize) -> Self {
        Self {
            row,
            column,
            rows,
            columns,
        }
    }

    /// Row just below the rectangle
    #[must_use]
    pub fn bottom(&self) -> usize {
        self.row + self.rows
    }

    /// Column just right of the rectangle
    #[must_use]
    pub fn right(&self) -> usize {
        self.column + self.columns
    }

    /// Whether the rectangle covers no cell
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.columns == 0
    }

    /// Shift by another rectangle's origin
    #[must_use]
    pub fn offset(&self, origin: &GridRect) -> GridRect {
        GridRect {
            row: self.row + origin.row,
            column: self.column + origin.column,
            ..*self
        }
    }
}

/// Fit a `rows` × `columns` element wanted at (`row`, `column`) into an area
fn clamp(row: usize, column: usize, rows: usize, columns: usize, area: (usize, usize)) -> GridRect {
    let (area_rows, area_columns) = area;
    let row = row.min(area_rows.saturating_sub(rows));
    let column = column.min(area_columns.saturating_sub(columns));
    GridRect {
        row,
        column,
        rows: rows.min(area_rows - row.min(area_rows)),
        columns: columns.min(area_columns - column.min(area_columns)),
    }
}

/// Place the menu inside a pad of `pad_rows` × `pad_columns`
///
/// `prompt` menus dock to the edge shared with the status bar, full width.
/// `inline` menus open below the anchor, or above it when there is no room.
#[must_use]
pub fn place_menu(
    grid: &MenuGrid,
    anchor: Coord,
    style: MenuStyle,
    pad: (usize, usize),
    status_on_top: bool,
) -> GridRect {
    let (pad_rows, pad_columns) = pad;
    match style {
        MenuStyle::Prompt => {
            let row = if status_on_top {
                0
            } else {
                pad_rows.saturating_sub(grid.rows)
            };
            clamp(row, 0, grid.rows, pad_columns, pad)
        }
        MenuStyle::Inline => {
            let below = anchor.line + 1;
            let row = if below + grid.rows <= pad_rows {
                below
            } else {
                anchor.line.saturating_sub(grid.rows)
            };
            clamp(row, anchor.column, grid.rows, grid.width(), pad)
        }
    }
}

/// Place an info box of `size` (rows, columns) inside the pad
///
/// `menu` is the menu placement, if one is shown, in pad coordinates.
#[must_use]
pub fn place_info(
    size: (usize, usize),
    anchor: Coord,
    style: InfoStyle,
    menu: Option<(GridRect, MenuStyle)>,
    pad: (usize, usize),
    status_on_top: bool,
) -> GridRect {
    let (rows, columns) = size;
    let (pad_rows, pad_columns) = pad;
    let below_anchor = (anchor.line + 1, anchor.column);

    let (row, column) = match style {
        InfoStyle::Prompt => {
            let column = pad_columns.saturating_sub(columns);
            let docked_menu = match menu {
                Some((rect, MenuStyle::Prompt)) => rect.rows,
                _ => 0,
            };
            if status_on_top {
                (docked_menu, column)
            } else {
                (pad_rows.saturating_sub(docked_menu + rows), column)
            }
        }
        InfoStyle::Inline | InfoStyle::InlineBelow => below_anchor,
        InfoStyle::InlineAbove => (anchor.line.saturating_sub(rows), anchor.column),
        InfoStyle::MenuDoc => match menu {
            Some((rect, _)) if rect.right() + columns <= pad_columns => (rect.row, rect.right()),
            Some((rect, _)) => (rect.row, rect.column.saturating_sub(columns)),
            None => below_anchor,
        },
        InfoStyle::Modal => (
            pad_rows.saturating_sub(rows) / 2,
            pad_columns.saturating_sub(columns) / 2,
        ),
    };

    clamp(row, column, rows, columns, pad)
}
