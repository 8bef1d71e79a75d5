//! Drawing capability
//!
//! The only thing the core asks of a host. Coordinates passed to
//! [`Canvas::fill_rect`] and [`Canvas::draw_text`] are relative to the origin
//! of the region they target, which is the last rectangle announced for it
//! through [`Canvas::set_region`].

use super::{PixelPoint, PixelRect, Region, TextStyle};
use crate::protocol::Color;

/// A drawing surface split into named regions
pub trait Canvas {
    /// Place, resize or hide (`None`) a region
    ///
    /// Called for every region at the start of each frame, back to front.
    /// A region that is re-placed starts out blank.
    fn set_region(&mut self, region: Region, rect: Option<PixelRect>);

    /// Fill a rectangle with a solid color
    fn fill_rect(&mut self, region: Region, rect: PixelRect, color: &Color);

    /// Draw text with its top-left corner at `origin`
    fn draw_text(&mut self, region: Region, origin: PixelPoint, text: &str, style: &TextStyle);
}

impl<C: Canvas + ?Sized> Canvas for &mut C {
    fn set_region(&mut self, region: Region, rect: Option<PixelRect>) {
        (**self).set_region(region, rect);
    }

    fn fill_rect(&mut self, region: Region, rect: PixelRect, color: &Color) {
        (**self).fill_rect(region, rect, color);
    }

    fn draw_text(&mut self, region: Region, origin: PixelPoint, text: &str, style: &TextStyle) {
        (**self).draw_text(region, origin, text, style);
    }
}
