//! Layered Compositor
//!
//! Manages z-ordered layers for rendering. Each editor region (pad, status,
//! mode, menu, info) gets its own layer that can be positioned, resized and
//! hidden independently.
//!
//! The compositor is the terminal's [`Canvas`]: a [`bridge_core::Frame`]
//! paints into the layers, then [`Compositor::composite`] flattens all
//! visible layers into a final output buffer. Layers are opaque; a floating
//! menu hides whatever lies beneath it, blank cells included.
//!
//! Terminal cells are the pixel unit, so the core renders with 1×1 cell
//! metrics and rectangles map onto cells directly.

mod layer;

use std::collections::HashMap;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;

use bridge_core::{Canvas, Color, PixelPoint, PixelRect, Region, TextStyle};

use crate::theme;

pub use layer::Layer;

/// Unique identifier for a layer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerId(u32);

/// The compositor manages all layers and composites them together
pub struct Compositor {
    /// All layers by ID
    layers: HashMap<LayerId, Layer>,
    /// Layer backing each editor region
    regions: HashMap<Region, LayerId>,
    /// Layers sorted by z-index for rendering
    render_order: Vec<LayerId>,
    /// Next layer ID to assign
    next_id: u32,
    /// Output buffer (composited result)
    output: Buffer,
    /// Total area
    area: Rect,
}

impl Compositor {
    /// Create a new compositor for the given area
    pub fn new(area: Rect) -> Self {
        let mut compositor = Self {
            layers: HashMap::new(),
            regions: HashMap::new(),
            render_order: Vec::new(),
            next_id: 0,
            output: Buffer::empty(area),
            area,
        };

        // One hidden layer per region, stacked in paint order
        for (z_index, region) in (0i32..).zip(Region::ALL) {
            let id = compositor.create_layer(Rect::default(), z_index * 10);
            compositor.set_visible(id, false);
            compositor.regions.insert(region, id);
        }
        compositor
    }

    /// Create a new layer and return its ID
    pub fn create_layer(&mut self, bounds: Rect, z_index: i32) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;

        let layer = Layer::new(id, bounds, z_index);
        self.layers.insert(id, layer);
        self.update_render_order();

        id
    }

    /// The layer backing a region
    pub fn region_layer(&self, region: Region) -> Option<&Layer> {
        self.regions.get(&region).and_then(|id| self.layers.get(id))
    }

    /// Move a layer to a new position
    pub fn move_layer(&mut self, id: LayerId, x: u16, y: u16) {
        if let Some(layer) = self.layers.get_mut(&id) {
            layer.bounds.x = x;
            layer.bounds.y = y;
        }
    }

    /// Resize a layer, clearing its contents
    pub fn resize_layer(&mut self, id: LayerId, width: u16, height: u16) {
        if let Some(layer) = self.layers.get_mut(&id) {
            let bounds = Rect::new(layer.bounds.x, layer.bounds.y, width, height);
            layer.reset(bounds);
        }
    }

    /// Set layer visibility
    pub fn set_visible(&mut self, id: LayerId, visible: bool) {
        if let Some(layer) = self.layers.get_mut(&id) {
            layer.visible = visible;
        }
    }

    /// Resize the entire compositor
    pub fn resize(&mut self, area: Rect) {
        self.area = area;
        self.output = Buffer::empty(area);
    }

    /// Total area
    pub fn area(&self) -> Rect {
        self.area
    }

    /// Composite all visible layers into the output buffer
    pub fn composite(&mut self) -> &Buffer {
        // Clear output
        self.output.reset();

        // Render layers in z-order (back to front)
        for id in &self.render_order {
            if let Some(layer) = self.layers.get(id) {
                if layer.visible {
                    Self::blit_layer(&mut self.output, &self.area, layer);
                }
            }
        }

        &self.output
    }

    /// Blit a layer onto the output buffer (opaque)
    fn blit_layer(output: &mut Buffer, area: &Rect, layer: &Layer) {
        let lb = &layer.bounds;

        for ly in 0..lb.height {
            for lx in 0..lb.width {
                let dst_x = lb.x + lx;
                let dst_y = lb.y + ly;

                // Bounds check
                if dst_x >= area.width || dst_y >= area.height {
                    continue;
                }

                let src_idx = layer.buffer.index_of(lx, ly);
                let dst_idx = output.index_of(dst_x, dst_y);
                if let (Some(src), Some(dst)) = (
                    layer.buffer.content.get(src_idx),
                    output.content.get_mut(dst_idx),
                ) {
                    *dst = src.clone();
                }
            }
        }
    }

    /// Update render order based on z-indices
    fn update_render_order(&mut self) {
        self.render_order = self.layers.keys().copied().collect();
        self.render_order
            .sort_by_key(|id| self.layers.get(id).map_or(0, |l| l.z_index));
    }

    fn region_layer_mut(&mut self, region: Region) -> Option<&mut Layer> {
        let id = self.regions.get(&region)?;
        self.layers.get_mut(id)
    }

    /// Screen rectangle for a pixel rectangle, clipped to the screen
    fn to_cells(&self, rect: PixelRect) -> Rect {
        let cell = |v: f32| v.max(0.0) as u16;
        Rect::new(cell(rect.x), cell(rect.y), cell(rect.width), cell(rect.height))
            .intersection(self.area)
    }
}

impl Canvas for Compositor {
    fn set_region(&mut self, region: Region, rect: Option<PixelRect>) {
        let Some(id) = self.regions.get(&region).copied() else {
            return;
        };
        match rect {
            Some(rect) => {
                let bounds = self.to_cells(rect);
                self.move_layer(id, bounds.x, bounds.y);
                self.resize_layer(id, bounds.width, bounds.height);
                self.set_visible(id, !bounds.is_empty());
            }
            None => self.set_visible(id, false),
        }
    }

    fn fill_rect(&mut self, region: Region, rect: PixelRect, color: &Color) {
        let bg = theme::to_color(color);
        let Some(layer) = self.region_layer_mut(region) else {
            return;
        };
        let cell = |v: f32| v.max(0.0) as u16;
        let target = Rect::new(cell(rect.x), cell(rect.y), cell(rect.width), cell(rect.height))
            .intersection(layer.buffer.area);

        for y in target.top()..target.bottom() {
            for x in target.left()..target.right() {
                if let Some(c) = layer.buffer.cell_mut((x, y)) {
                    c.reset();
                    c.set_bg(bg);
                }
            }
        }
    }

    fn draw_text(&mut self, region: Region, origin: PixelPoint, text: &str, style: &TextStyle) {
        let style: Style = theme::to_style(style);
        let Some(layer) = self.region_layer_mut(region) else {
            return;
        };
        let (x, y) = (origin.x.max(0.0) as u16, origin.y.max(0.0) as u16);
        let area = layer.buffer.area;
        if x >= area.width || y >= area.height {
            return;
        }
        layer
            .buffer
            .set_stringn(x, y, text, usize::from(area.width - x), style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_core::{CellMetrics, EditorMessage, Face, LayoutOptions, Line, ScreenModel, Viewport};
    use pretty_assertions::assert_eq;
    use ratatui::style::Color as TermColor;

    fn row(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol().to_string())
            .collect()
    }

    fn paint(model: &ScreenModel, width: u16, height: u16) -> Compositor {
        let mut compositor = Compositor::new(Rect::new(0, 0, width, height));
        let viewport = Viewport::with_grid(height, width, CellMetrics::default());
        bridge_core::render(model, &viewport, &LayoutOptions::default()).paint(&mut compositor);
        compositor
    }

    #[test]
    fn test_regions_start_hidden() {
        let compositor = Compositor::new(Rect::new(0, 0, 10, 4));
        for region in Region::ALL {
            assert!(!compositor.region_layer(region).unwrap().visible);
        }
    }

    #[test]
    fn test_frame_paints_into_layers() {
        let mut model = ScreenModel::new();
        model
            .apply(EditorMessage::Draw {
                lines: vec![Line::plain("hello", Face::default())],
                default_face: Face::new("white", "black"),
                padding_face: Face::new("blue", "black"),
            })
            .unwrap();
        model
            .apply(EditorMessage::DrawStatus {
                status: Line::plain(":w", Face::default()),
                mode: Line::plain("normal", Face::default()),
            })
            .unwrap();

        let mut compositor = paint(&model, 12, 3);
        let out = compositor.composite();
        assert_eq!(row(out, 0), "hello       ");
        assert_eq!(row(out, 2), ":w    normal");
        assert_eq!(out[(0, 0)].fg, TermColor::Gray);
        assert_eq!(out[(0, 0)].bg, TermColor::Black);
    }

    #[test]
    fn test_layers_are_opaque() {
        let mut compositor = Compositor::new(Rect::new(0, 0, 6, 2));
        let pad = PixelRect {
            x: 0.0,
            y: 0.0,
            width: 6.0,
            height: 2.0,
        };
        compositor.set_region(Region::Pad, Some(pad));
        compositor.draw_text(Region::Pad, PixelPoint::default(), "xxxxxx", &TextStyle::default());

        let info = PixelRect {
            x: 2.0,
            y: 0.0,
            width: 2.0,
            height: 1.0,
        };
        compositor.set_region(Region::Info, Some(info));
        compositor.fill_rect(
            Region::Info,
            PixelRect {
                width: 2.0,
                height: 1.0,
                ..PixelRect::default()
            },
            &Color::new("red"),
        );

        let out = compositor.composite();
        assert_eq!(row(out, 0), "xx  xx");
        assert_eq!(out[(2, 0)].bg, TermColor::Red);
    }

    #[test]
    fn test_hidden_region_is_not_composited() {
        let mut compositor = Compositor::new(Rect::new(0, 0, 4, 1));
        let rect = PixelRect {
            width: 4.0,
            height: 1.0,
            ..PixelRect::default()
        };
        compositor.set_region(Region::Menu, Some(rect));
        compositor.draw_text(Region::Menu, PixelPoint::default(), "menu", &TextStyle::default());
        compositor.set_region(Region::Menu, None);
        assert_eq!(row(compositor.composite(), 0), "    ");
    }

    #[test]
    fn test_text_is_clipped_to_layer() {
        let mut compositor = Compositor::new(Rect::new(0, 0, 8, 1));
        let rect = PixelRect {
            x: 5.0,
            width: 3.0,
            height: 1.0,
            ..PixelRect::default()
        };
        compositor.set_region(Region::Mode, Some(rect));
        compositor.draw_text(
            Region::Mode,
            PixelPoint { x: 1.0, y: 0.0 },
            "insert",
            &TextStyle::default(),
        );
        compositor.draw_text(
            Region::Mode,
            PixelPoint { x: 9.0, y: 0.0 },
            "ignored",
            &TextStyle::default(),
        );
        assert_eq!(row(compositor.composite(), 0), "      in");
    }
}
