//! Shared fixtures for integration tests

#![allow(dead_code)]

use bridge_core::{
    Canvas, CellMetrics, Color, Face, LayoutOptions, PixelPoint, PixelRect, Region, ScreenModel,
    Session, TextStyle, Viewport,
};
use unicode_width::UnicodeWidthChar;

// =============================================================================
// Wire fixtures
// =============================================================================

/// A face in wire JSON
pub fn face_json(fg: &str, bg: &str) -> String {
    format!(r#"{{"fg":"{fg}","bg":"{bg}","attributes":[]}}"#)
}

/// A single-atom line in wire JSON
pub fn line_json(text: &str) -> String {
    format!(
        r#"[{{"face":{},"contents":"{text}"}}]"#,
        face_json("default", "default")
    )
}

/// A complete notification line, newline terminated
pub fn notification(method: &str, params: &str) -> String {
    format!(r#"{{"jsonrpc":"2.0","method":"{method}","params":[{params}]}}"#) + "\n"
}

pub fn draw(lines: &[&str]) -> String {
    let lines: Vec<String> = lines.iter().map(|l| line_json(l)).collect();
    notification(
        "draw",
        &format!(
            "[{}],{},{}",
            lines.join(","),
            face_json("white", "black"),
            face_json("grey", "black")
        ),
    )
}

pub fn draw_status(status: &str, mode: &str) -> String {
    notification(
        "draw_status",
        &format!("{},{}", line_json(status), line_json(mode)),
    )
}

pub fn info_show(title: &str, body: &str, style: &str) -> String {
    notification(
        "info_show",
        &format!(
            r#""{title}","{body}",{{"line":0,"column":0}},{},"{style}""#,
            face_json("black", "yellow")
        ),
    )
}

pub fn menu_show(items: &[&str], style: &str) -> String {
    let items: Vec<String> = items.iter().map(|l| line_json(l)).collect();
    notification(
        "menu_show",
        &format!(
            r#"[{}],{{"line":1,"column":0}},{},{},"{style}""#,
            items.join(","),
            face_json("black", "cyan"),
            face_json("white", "blue")
        ),
    )
}

// =============================================================================
// Session fixtures
// =============================================================================

/// A session on a terminal-like grid (one pixel per cell)
pub fn session(rows: u16, columns: u16) -> Session {
    Session::new(
        ScreenModel::new(),
        Viewport::with_grid(rows, columns, CellMetrics::default()),
        std::time::Duration::from_millis(50),
        LayoutOptions::default(),
    )
}

// =============================================================================
// Text canvas
// =============================================================================

/// A canvas that renders into a character grid, for golden comparisons
///
/// Assumes one pixel per cell.
#[derive(Debug)]
pub struct TextCanvas {
    cells: Vec<Vec<char>>,
    backgrounds: Vec<Vec<Option<Color>>>,
    regions: Vec<(Region, Option<PixelRect>)>,
}

impl TextCanvas {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            cells: vec![vec![' '; columns]; rows],
            backgrounds: vec![vec![None; columns]; rows],
            regions: Vec::new(),
        }
    }

    fn origin(&self, region: Region) -> Option<(usize, usize)> {
        self.regions
            .iter()
            .rev()
            .find(|(r, _)| *r == region)
            .and_then(|(_, rect)| *rect)
            .map(|rect| (rect.y as usize, rect.x as usize))
    }

    /// Row `row` as a string
    pub fn row(&self, row: usize) -> String {
        self.cells[row].iter().collect()
    }

    /// `height` rows of `width` cells starting at (`row`, `column`)
    pub fn snippet(&self, row: usize, column: usize, height: usize, width: usize) -> Vec<String> {
        (row..row + height)
            .map(|r| self.cells[r][column..column + width].iter().collect())
            .collect()
    }

    /// Background color of a cell
    pub fn background(&self, row: usize, column: usize) -> Option<&Color> {
        self.backgrounds[row][column].as_ref()
    }
}

impl Canvas for TextCanvas {
    fn set_region(&mut self, region: Region, rect: Option<PixelRect>) {
        self.regions.push((region, rect));
    }

    fn fill_rect(&mut self, region: Region, rect: PixelRect, color: &Color) {
        let Some((top, left)) = self.origin(region) else {
            return;
        };
        for r in 0..rect.height as usize {
            for c in 0..rect.width as usize {
                let (row, col) = (top + rect.y as usize + r, left + rect.x as usize + c);
                if row < self.cells.len() && col < self.cells[row].len() {
                    self.cells[row][col] = ' ';
                    self.backgrounds[row][col] = Some(color.clone());
                }
            }
        }
    }

    fn draw_text(&mut self, region: Region, origin: PixelPoint, text: &str, _style: &TextStyle) {
        let Some((top, left)) = self.origin(region) else {
            return;
        };
        let row = top + origin.y as usize;
        let mut col = left + origin.x as usize;
        for ch in text.chars() {
            if row < self.cells.len() && col < self.cells[row].len() {
                self.cells[row][col] = ch;
            }
            col += ch.width().unwrap_or(0).max(1);
        }
    }
}

/// Default face used by [`draw`]
pub fn draw_default_face() -> Face {
    Face::new("white", "black")
}
