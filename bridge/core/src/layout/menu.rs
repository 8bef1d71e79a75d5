//! Menu packing
//!
//! Completion candidates are packed row-major into as many equal-width
//! columns as the screen allows, at most [`MAX_ROWS`] rows high. Candidates
//! that do not fit the grid are not shown.

use crate::protocol::{Atom, Face, Line};
use crate::screen::Menu;

/// Hard cap on visible menu rows
pub const MAX_ROWS: usize = 10;

/// Geometry of a packed menu
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuGrid {
    /// Cell width of one column (widest item, at least 1)
    pub item_width: usize,
    /// Number of columns
    pub columns: usize,
    /// Number of rows
    pub rows: usize,
    /// Number of items shown
    pub visible: usize,
}

impl MenuGrid {
    /// Pack `item_count` items of `item_width` cells into `screen_columns`
    #[must_use]
    pub fn new(item_count: usize, item_width: usize, screen_columns: usize) -> Self {
        let item_width = item_width.max(1);
        let columns = (screen_columns / item_width).max(1);
        let rows = (item_count / columns).min(MAX_ROWS);
        Self {
            item_width,
            columns,
            rows,
            visible: (rows * columns).min(item_count),
        }
    }

    /// Geometry for a menu on a screen of `screen_columns`
    #[must_use]
    pub fn for_menu(menu: &Menu, screen_columns: usize) -> Self {
        Self::new(menu.items.len(), menu.item_width(), screen_columns)
    }

    /// Total width in cells
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns * self.item_width
    }

    /// Whether nothing would be shown
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visible == 0
    }

    /// Grid cell `(row, column)` of item `index`
    #[must_use]
    pub fn cell_of(&self, index: usize) -> (usize, usize) {
        (index / self.columns, index % self.columns)
    }
}

/// The line to draw for item `index`, with the selection overlay applied
///
/// The selected item's first atom takes `selected_face`; every other atom has
/// its `default` components resolved against `menu_face`. The stored item is
/// left untouched.
#[must_use]
pub fn styled_item(item: &Line, selected: bool, selected_face: &Face, menu_face: &Face) -> Line {
    item.atoms()
        .iter()
        .enumerate()
        .map(|(i, atom)| {
            let face = if selected && i == 0 {
                selected_face.clone()
            } else {
                atom.face.resolve(menu_face)
            };
            Atom::new(atom.contents.clone(), face)
        })
        .collect::<Vec<_>>()
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rows_capped_at_ten() {
        // 37 items of width 20 on an 80 column screen: 4 columns
        let grid = MenuGrid::new(37, 20, 80);
        assert_eq!(grid.columns, 4);
        assert_eq!(grid.rows, 9);
        assert_eq!(grid.visible, 36);

        let grid = MenuGrid::new(200, 20, 80);
        assert_eq!(grid.rows, MAX_ROWS);
        assert_eq!(grid.visible, 40);
    }

    #[test]
    fn test_wide_items_get_one_column() {
        let grid = MenuGrid::new(5, 120, 80);
        assert_eq!(grid.columns, 1);
        assert_eq!(grid.rows, 5);
        assert_eq!(grid.visible, 5);
    }

    #[test]
    fn test_short_menus_round_down() {
        let grid = MenuGrid::new(3, 10, 80);
        assert_eq!(grid.columns, 8);
        assert_eq!(grid.rows, 0);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_zero_width_items() {
        let grid = MenuGrid::new(4, 0, 2);
        assert_eq!(grid.item_width, 1);
        assert_eq!(grid.columns, 2);
        assert_eq!(grid.rows, 2);
    }

    #[test]
    fn test_row_major_packing() {
        let grid = MenuGrid::new(12, 20, 80);
        assert_eq!(grid.cell_of(0), (0, 0));
        assert_eq!(grid.cell_of(3), (0, 3));
        assert_eq!(grid.cell_of(4), (1, 0));
        assert_eq!(grid.cell_of(11), (2, 3));
    }

    #[test]
    fn test_selection_overlay_only_touches_first_atom() {
        let item = Line(vec![
            Atom::new("foo", Face::new("default", "default")),
            Atom::new(" fn", Face::new("green", "default")),
        ]);
        let selected_face = Face::new("black", "yellow");
        let menu_face = Face::new("white", "blue");

        let styled = styled_item(&item, true, &selected_face, &menu_face);
        assert_eq!(styled.atoms()[0].face, selected_face);
        assert_eq!(styled.atoms()[1].face, Face::new("green", "blue"));

        let plain = styled_item(&item, false, &selected_face, &menu_face);
        assert_eq!(plain.atoms()[0].face, menu_face);

        // Source untouched
        assert_eq!(item.atoms()[0].face, Face::new("default", "default"));
    }
}
