//! Status/mode width arbitration
//!
//! The status line (prompt, messages) and the mode line share the last grid
//! row. The mode line always gets its exact width on the right when both fit;
//! the status line takes whatever is left.
//!
//! When they do not both fit, the mode line keeps as much of its width as
//! the row allows and the status line is cut short with an ellipsis. The two
//! never overlap.

/// How the row was split
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arrangement {
    /// Both lines fit at their natural width
    Fits,
    /// The status line had to be truncated (or dropped)
    Overflow,
}

/// Widths assigned to the status and mode regions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusLayout {
    /// Cells given to the status line, starting at column 0
    pub status_columns: usize,
    /// Cells given to the mode line, flush right
    pub mode_columns: usize,
    /// Whether the natural widths fit
    pub arrangement: Arrangement,
}

impl StatusLayout {
    /// First column of the mode region
    #[must_use]
    pub fn mode_start(&self) -> usize {
        self.status_columns
    }
}

/// Split `columns` between a status line and a mode line
#[must_use]
pub fn arbitrate(status_len: usize, mode_len: usize, columns: usize) -> StatusLayout {
    let remaining = columns.saturating_sub(status_len);
    if mode_len < remaining {
        return StatusLayout {
            status_columns: columns - mode_len,
            mode_columns: mode_len,
            arrangement: Arrangement::Fits,
        };
    }

    let mode_columns = mode_len.min(columns);
    StatusLayout {
        status_columns: columns - mode_columns,
        mode_columns,
        arrangement: Arrangement::Overflow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mode_gets_exact_width_when_both_fit() {
        let layout = arbitrate(10, 6, 80);
        assert_eq!(
            layout,
            StatusLayout {
                status_columns: 74,
                mode_columns: 6,
                arrangement: Arrangement::Fits,
            }
        );
        assert_eq!(layout.mode_start(), 74);
    }

    #[test]
    fn test_exact_fill_is_overflow() {
        // mode_len < columns - status_len is strict
        let layout = arbitrate(74, 6, 80);
        assert_eq!(layout.arrangement, Arrangement::Overflow);
        assert_eq!(layout.mode_columns, 6);
        assert_eq!(layout.status_columns, 74);
    }

    #[test]
    fn test_overflow_truncates_status() {
        let layout = arbitrate(100, 20, 80);
        assert_eq!(layout.arrangement, Arrangement::Overflow);
        assert_eq!(layout.mode_columns, 20);
        assert_eq!(layout.status_columns, 60);
    }

    #[test]
    fn test_mode_wider_than_row() {
        let layout = arbitrate(5, 120, 80);
        assert_eq!(layout.mode_columns, 80);
        assert_eq!(layout.status_columns, 0);
    }

    #[test]
    fn test_never_overlaps() {
        for columns in 0..12 {
            for status in 0..15 {
                for mode in 0..15 {
                    let layout = arbitrate(status, mode, columns);
                    assert!(layout.status_columns + layout.mode_columns <= columns);
                }
            }
        }
    }
}
