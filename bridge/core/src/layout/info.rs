//! Info box
//!
//! Draws the title and body of an info popup inside a rounded box:
//!
//! ```text
//! ╭─┤type├─╮
//! │ a      │
//! │ bb     │
//! │ ccc    │
//! ╰────────╯
//! ```

use unicode_width::UnicodeWidthStr;

const DASH: &str = "─";

/// A laid out info box: one string per row, all of the same cell width
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InfoBox {
    rows: Vec<String>,
    inner_width: usize,
}

impl InfoBox {
    /// Lay out `title` and `body`
    ///
    /// Leading and trailing newlines of the body are dropped; other
    /// whitespace is kept. A `\r` before a line break is dropped too.
    #[must_use]
    pub fn new(title: &str, body: &str) -> Self {
        let lines: Vec<&str> = body
            .trim_matches(|c| c == '\n' || c == '\r')
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .collect();
        let title_width = title.width();
        let inner_width = lines
            .iter()
            .map(|l| UnicodeWidthStr::width(*l))
            .max()
            .unwrap_or(0)
            .max(title_width + 2);

        let mut rows = Vec::with_capacity(lines.len() + 2);
        rows.push(top_border(title, title_width, inner_width));
        for line in &lines {
            let pad = inner_width - line.width();
            rows.push(format!("│ {line}{} │", " ".repeat(pad)));
        }
        rows.push(format!("╰{}╯", dashes(inner_width + 2)));

        Self { rows, inner_width }
    }

    /// Width available to the longest line
    #[must_use]
    pub fn inner_width(&self) -> usize {
        self.inner_width
    }

    /// Total width in cells, borders included
    #[must_use]
    pub fn width(&self) -> usize {
        self.inner_width + 4
    }

    /// Total height in rows, borders included
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Rows, top to bottom
    #[must_use]
    pub fn rows(&self) -> &[String] {
        &self.rows
    }
}

fn dashes(n: usize) -> String {
    DASH.repeat(n)
}

fn top_border(title: &str, title_width: usize, inner_width: usize) -> String {
    if title.is_empty() {
        return format!("╭{}╮", dashes(inner_width + 2));
    }
    let dash_count = inner_width - title_width - 2;
    let left = dash_count.div_ceil(2);
    let right = dash_count - left;
    format!("╭─{}┤{title}├{}─╮", dashes(left), dashes(right))
}
