//! Layer - A single compositable layer

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use super::LayerId;

/// A single layer in the compositor
pub struct Layer {
    /// Unique identifier
    pub id: LayerId,
    /// Z-order (higher = in front)
    pub z_index: i32,
    /// Position and size on screen
    pub bounds: Rect,
    /// Whether the layer is visible
    pub visible: bool,
    /// The layer's render buffer, in layer-local coordinates
    pub buffer: Buffer,
}

impl Layer {
    /// Create a new, blank layer
    pub fn new(id: LayerId, bounds: Rect, z_index: i32) -> Self {
        // Buffer uses origin coordinates (0,0) internally
        // The bounds store the screen position for compositing
        let buffer_area = Rect::new(0, 0, bounds.width, bounds.height);
        Self {
            id,
            z_index,
            bounds,
            visible: true,
            buffer: Buffer::empty(buffer_area),
        }
    }

    /// Place the layer and clear its contents
    pub fn reset(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.buffer = Buffer::empty(Rect::new(0, 0, bounds.width, bounds.height));
    }

    /// Check if a point is within this layer's bounds
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.bounds.x
            && x < self.bounds.x + self.bounds.width
            && y >= self.bounds.y
            && y < self.bounds.y + self.bounds.height
    }
}
