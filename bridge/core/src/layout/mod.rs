//! Layout / Compositor
//!
//! [`render`] is a pure function from the screen model and viewport to a
//! [`Frame`]: the placement of every region plus an ordered list of drawing
//! operations. Rendering the same inputs twice yields equal frames, so a host
//! can skip repainting when nothing changed.
//!
//! # Regions
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Pad (buffer lines)                           │
//! │            ┌────────────┐                    │
//! │            │ Menu       │   ┌──────────┐     │
//! │            └────────────┘   │ Info     │     │
//! │                             └──────────┘     │
//! ├──────────────────────────────────┬───────────┤
//! │ Status                           │      Mode │
//! └──────────────────────────────────┴───────────┘
//! ```
//!
//! Regions are listed back to front; later regions cover earlier ones.
//! Drawing coordinates are relative to the region they target.

mod canvas;
pub mod info;
pub mod menu;
pub mod placement;
pub mod status;

use unicode_width::UnicodeWidthChar;

use crate::protocol::{Atom, Attribute, Color, Face, Line};
use crate::resize::{CellMetrics, Viewport};
use crate::screen::ScreenModel;

pub use canvas::Canvas;
pub use info::InfoBox;
pub use menu::MenuGrid;
pub use placement::GridRect;
pub use status::{arbitrate, Arrangement, StatusLayout};

/// Marker appended to a truncated status line
pub const ELLIPSIS: char = '…';

/// A point in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PixelPoint {
    /// Horizontal offset
    pub x: f32,
    /// Vertical offset
    pub y: f32,
}

/// A rectangle in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PixelRect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl PixelRect {
    /// Convert a grid rectangle
    #[must_use]
    pub fn from_grid(rect: GridRect, cell: CellMetrics) -> Self {
        Self {
            x: rect.column as f32 * cell.width,
            y: rect.row as f32 * cell.height,
            width: rect.columns as f32 * cell.width,
            height: rect.rows as f32 * cell.height,
        }
    }
}

/// The named drawing regions, back to front
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    /// Buffer area
    Pad,
    /// Status (prompt) line
    Status,
    /// Mode line
    Mode,
    /// Completion menu
    Menu,
    /// Info box
    Info,
}

impl Region {
    /// Every region in paint order
    pub const ALL: [Region; 5] = [
        Region::Pad,
        Region::Status,
        Region::Mode,
        Region::Menu,
        Region::Info,
    ];
}

/// Fully resolved style of a text run
///
/// Never contains the `default` sentinel. `reverse` has already been applied
/// by swapping the colors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextStyle {
    /// Text color
    pub fg: Color,
    /// Background color
    pub bg: Color,
    /// Remaining attributes
    pub attributes: Vec<Attribute>,
}

impl TextStyle {
    /// Resolve a face against a base face
    #[must_use]
    pub fn resolve(face: &Face, base: &Face) -> Self {
        let face = face.resolve(base);
        let reverse = face.attributes.contains(&Attribute::Reverse);
        let attributes = face
            .attributes
            .into_iter()
            .filter(|a| *a != Attribute::Reverse)
            .collect();
        if reverse {
            Self {
                fg: face.bg,
                bg: face.fg,
                attributes,
            }
        } else {
            Self {
                fg: face.fg,
                bg: face.bg,
                attributes,
            }
        }
    }

    /// Whether an attribute is set
    #[must_use]
    pub fn has(&self, attr: &Attribute) -> bool {
        self.attributes.contains(attr)
    }
}

/// One drawing operation
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Fill a rectangle
    Fill {
        /// Target region
        region: Region,
        /// Rectangle relative to the region
        rect: PixelRect,
        /// Fill color
        color: Color,
    },
    /// Draw a text run
    Text {
        /// Target region
        region: Region,
        /// Top-left corner relative to the region
        origin: PixelPoint,
        /// The text
        text: String,
        /// Its style
        style: TextStyle,
    },
}

/// Options that are not part of the screen model
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Put the status bar on the first row instead of the last
    pub status_on_top: bool,
}

/// A rendered screen
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pad: Option<PixelRect>,
    status: Option<PixelRect>,
    mode: Option<PixelRect>,
    menu: Option<PixelRect>,
    info: Option<PixelRect>,
    ops: Vec<DrawOp>,
}

impl Frame {
    /// Placement of a region, `None` when hidden
    #[must_use]
    pub fn region(&self, region: Region) -> Option<PixelRect> {
        match region {
            Region::Pad => self.pad,
            Region::Status => self.status,
            Region::Mode => self.mode,
            Region::Menu => self.menu,
            Region::Info => self.info,
        }
    }

    fn region_mut(&mut self, region: Region) -> &mut Option<PixelRect> {
        match region {
            Region::Pad => &mut self.pad,
            Region::Status => &mut self.status,
            Region::Mode => &mut self.mode,
            Region::Menu => &mut self.menu,
            Region::Info => &mut self.info,
        }
    }

    /// Drawing operations in paint order
    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Replay the frame onto a canvas
    pub fn paint<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        for region in Region::ALL {
            canvas.set_region(region, self.region(region));
        }
        for op in &self.ops {
            match op {
                DrawOp::Fill {
                    region,
                    rect,
                    color,
                } => canvas.fill_rect(*region, *rect, color),
                DrawOp::Text {
                    region,
                    origin,
                    text,
                    style,
                } => canvas.draw_text(*region, *origin, text, style),
            }
        }
    }
}

/// Accumulates a frame in grid units
struct FrameBuilder {
    cell: CellMetrics,
    frame: Frame,
}

impl FrameBuilder {
    fn new(cell: CellMetrics) -> Self {
        Self {
            cell,
            frame: Frame::default(),
        }
    }

    fn place(&mut self, region: Region, rect: GridRect) -> bool {
        if rect.is_empty() {
            return false;
        }
        *self.frame.region_mut(region) = Some(PixelRect::from_grid(rect, self.cell));
        true
    }

    fn fill(&mut self, region: Region, rect: GridRect, color: &Color) {
        if rect.is_empty() {
            return;
        }
        self.frame.ops.push(DrawOp::Fill {
            region,
            rect: PixelRect::from_grid(rect, self.cell),
            color: color.clone(),
        });
    }

    /// Draw a text run; its background covers exactly its cells
    fn text(&mut self, region: Region, row: usize, column: usize, text: String, width: usize, style: TextStyle) {
        if text.is_empty() {
            return;
        }
        self.fill(region, GridRect::new(row, column, 1, width), &style.bg);
        self.frame.ops.push(DrawOp::Text {
            region,
            origin: PixelPoint {
                x: column as f32 * self.cell.width,
                y: row as f32 * self.cell.height,
            },
            text,
            style,
        });
    }

    /// Draw a line at (`row`, `column`), clipped to `max_width` cells
    fn line(&mut self, region: Region, row: usize, column: usize, line: &Line, base: &Face, max_width: usize) {
        let mut x = 0;
        for atom in line.atoms() {
            if x >= max_width {
                break;
            }
            let (text, width) = clip(&atom.contents, max_width - x);
            self.text(region, row, column + x, text, width, TextStyle::resolve(&atom.face, base));
            x += width;
        }
    }

    fn finish(self) -> Frame {
        self.frame
    }
}

/// Longest prefix of `text` that fits in `max_width` cells, and its width
fn clip(text: &str, max_width: usize) -> (String, usize) {
    let mut width = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > max_width {
            break;
        }
        width += w;
        out.push(c);
    }
    (out, width)
}

/// Truncate a line to `max_width` cells, ending it with [`ELLIPSIS`] when cut
fn ellipsize(line: &Line, max_width: usize) -> Line {
    if line.width() <= max_width {
        return line.clone();
    }
    if max_width == 0 {
        return Line::new();
    }

    let mut budget = max_width - 1;
    let mut atoms = Vec::new();
    for atom in line.atoms() {
        let (text, width) = clip(&atom.contents, budget);
        budget -= width;
        let cut = width < atom.width();
        atoms.push(Atom::new(text, atom.face.clone()));
        if cut {
            break;
        }
    }
    if let Some(last) = atoms.last_mut() {
        last.contents.push(ELLIPSIS);
    }
    Line(atoms)
}

/// Lay out the whole screen
#[must_use]
pub fn render(model: &ScreenModel, viewport: &Viewport, options: &LayoutOptions) -> Frame {
    let rows = viewport.rows();
    let columns = viewport.columns();
    let mut out = FrameBuilder::new(viewport.cell);
    if rows == 0 || columns == 0 {
        return out.finish();
    }

    let default_face = model.default_face();
    let status_row = if options.status_on_top { 0 } else { rows - 1 };
    let pad = GridRect::new(usize::from(options.status_on_top), 0, rows - 1, columns);

    // Pad
    if out.place(Region::Pad, pad) {
        let local = GridRect::new(0, 0, pad.rows, pad.columns);
        out.fill(Region::Pad, local, &default_face.bg);
        let lines = model.buffer_lines();
        for (row, line) in lines.iter().take(pad.rows).enumerate() {
            out.line(Region::Pad, row, 0, line, default_face, columns);
        }
        if lines.len() < pad.rows {
            let padding = model.padding_face().resolve(default_face);
            let rest = GridRect::new(lines.len(), 0, pad.rows - lines.len(), columns);
            out.fill(Region::Pad, rest, &padding.bg);
        }
    }

    // Status and mode
    let split = arbitrate(model.status().width(), model.mode().width(), columns);
    let status_rect = GridRect::new(status_row, 0, 1, split.status_columns);
    if out.place(Region::Status, status_rect) {
        let status = ellipsize(model.status(), split.status_columns);
        out.fill(Region::Status, GridRect::new(0, 0, 1, split.status_columns), &default_face.bg);
        out.line(Region::Status, 0, 0, &status, default_face, split.status_columns);
    }
    let mode_rect = GridRect::new(status_row, split.mode_start(), 1, split.mode_columns);
    if out.place(Region::Mode, mode_rect) {
        out.fill(Region::Mode, GridRect::new(0, 0, 1, split.mode_columns), &default_face.bg);
        out.line(Region::Mode, 0, 0, model.mode(), default_face, split.mode_columns);
    }

    if pad.is_empty() {
        return out.finish();
    }
    let pad_size = (pad.rows, pad.columns);

    // Menu
    let mut menu_rect = None;
    if let Some(menu) = model.menu() {
        let grid = MenuGrid::for_menu(menu, columns);
        let rect = placement::place_menu(&grid, menu.anchor, menu.style, pad_size, options.status_on_top);
        if !grid.is_empty() && out.place(Region::Menu, rect.offset(&pad)) {
            menu_rect = Some((rect, menu.style));
            let menu_face = menu.menu_face.resolve(default_face);
            let selected_face = menu.selected_face.resolve(default_face);
            out.fill(Region::Menu, GridRect::new(0, 0, rect.rows, rect.columns), &menu_face.bg);
            for (index, item) in menu.items.iter().take(grid.visible).enumerate() {
                let (row, col) = grid.cell_of(index);
                let x = col * grid.item_width;
                if row >= rect.rows || x >= rect.columns {
                    continue;
                }
                let styled = menu::styled_item(item, menu.selected == Some(index), &selected_face, &menu_face);
                let max = grid.item_width.min(rect.columns - x);
                out.line(Region::Menu, row, x, &styled, &menu_face, max);
            }
        }
    }

    // Info
    if let Some(info) = model.info() {
        let info_box = InfoBox::new(&info.title, &info.body);
        let rect = placement::place_info(
            (info_box.height(), info_box.width()),
            info.anchor,
            info.style,
            menu_rect,
            pad_size,
            options.status_on_top,
        );
        if out.place(Region::Info, rect.offset(&pad)) {
            let style = TextStyle::resolve(&info.face, default_face);
            out.fill(Region::Info, GridRect::new(0, 0, rect.rows, rect.columns), &style.bg);
            for (row, text) in info_box.rows().iter().take(rect.rows).enumerate() {
                let (text, width) = clip(text, rect.columns);
                out.text(Region::Info, row, 0, text, width, style.clone());
            }
        }
    }

    out.finish()
}
