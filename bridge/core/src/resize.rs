//! Resize Coordinator
//!
//! Turns pixel dimensions into a character grid and decides when the editor
//! should hear about it.
//!
//! Local re-layout must follow the window immediately, but the editor redraws
//! its whole screen on every `resize`, so the outbound notification is
//! debounced: a burst of observations produces one notification carrying the
//! final grid, `debounce` after the last observation of the burst.
//!
//! The coordinator holds no timer of its own. The host asks for the pending
//! [`ResizeCoordinator::deadline`], sleeps until then and calls
//! [`ResizeCoordinator::poll`].

use std::time::{Duration, Instant};

/// Default quiet period before a resize is sent
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(50);

/// Size of one grid cell in pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellMetrics {
    /// Cell width
    pub width: f32,
    /// Cell height
    pub height: f32,
}

impl CellMetrics {
    /// Create cell metrics
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for CellMetrics {
    /// One pixel per cell, which is what a terminal host uses
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

/// Pixel dimensions of the drawable area
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PixelSize {
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl PixelSize {
    /// Create a pixel size
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Size of the character grid
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GridSize {
    /// Number of rows
    pub rows: u16,
    /// Number of columns
    pub columns: u16,
}

impl GridSize {
    /// Create a grid size
    #[must_use]
    pub fn new(rows: u16, columns: u16) -> Self {
        Self { rows, columns }
    }

    /// Compute the grid that fits in `pixels`
    ///
    /// Partial cells are dropped. Degenerate metrics yield an empty grid.
    #[must_use]
    pub fn fit(pixels: PixelSize, cell: CellMetrics) -> Self {
        Self {
            rows: cells_in(pixels.height, cell.height),
            columns: cells_in(pixels.width, cell.width),
        }
    }
}

fn cells_in(extent: f32, cell: f32) -> u16 {
    if cell <= 0.0 || !extent.is_finite() || extent <= 0.0 {
        return 0;
    }
    (extent / cell).floor().min(f32::from(u16::MAX)) as u16
}

/// Current viewport: grid size plus the metrics it was derived from
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    /// Grid dimensions
    pub grid: GridSize,
    /// Cell metrics
    pub cell: CellMetrics,
    /// Pixel dimensions
    pub pixels: PixelSize,
}

impl Viewport {
    /// Derive a viewport from pixel dimensions and cell metrics
    #[must_use]
    pub fn new(pixels: PixelSize, cell: CellMetrics) -> Self {
        Self {
            grid: GridSize::fit(pixels, cell),
            cell,
            pixels,
        }
    }

    /// A viewport of exactly `rows` × `columns` cells
    #[must_use]
    pub fn with_grid(rows: u16, columns: u16, cell: CellMetrics) -> Self {
        Self {
            grid: GridSize::new(rows, columns),
            cell,
            pixels: PixelSize::new(
                f32::from(columns) * cell.width,
                f32::from(rows) * cell.height,
            ),
        }
    }

    /// Number of rows
    #[must_use]
    pub fn rows(&self) -> usize {
        usize::from(self.grid.rows)
    }

    /// Number of columns
    #[must_use]
    pub fn columns(&self) -> usize {
        usize::from(self.grid.columns)
    }
}

/// Debounces outbound resize notifications
#[derive(Debug)]
pub struct ResizeCoordinator {
    viewport: Viewport,
    debounce: Duration,
    deadline: Option<Instant>,
    last_sent: Option<GridSize>,
}

impl ResizeCoordinator {
    /// Create a coordinator for an initial viewport
    ///
    /// Nothing counts as sent yet: call [`flush`](Self::flush) to announce
    /// the initial size.
    #[must_use]
    pub fn new(viewport: Viewport, debounce: Duration) -> Self {
        Self {
            viewport,
            debounce,
            deadline: None,
            last_sent: None,
        }
    }

    /// The viewport as of the latest observation
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The size last announced to the editor
    #[must_use]
    pub fn last_sent(&self) -> Option<GridSize> {
        self.last_sent
    }

    /// When a pending notification becomes due
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Record new pixel dimensions
    ///
    /// The viewport changes right away; the notification is (re)scheduled.
    /// Returns whether the grid changed.
    pub fn observe(&mut self, pixels: PixelSize, now: Instant) -> bool {
        self.update(Viewport::new(pixels, self.viewport.cell), now)
    }

    /// Record new cell metrics (font change), treated like a resize
    pub fn set_cell_metrics(&mut self, cell: CellMetrics, now: Instant) -> bool {
        self.update(Viewport::new(self.viewport.pixels, cell), now)
    }

    fn update(&mut self, viewport: Viewport, now: Instant) -> bool {
        let changed = viewport.grid != self.viewport.grid;
        self.viewport = viewport;
        self.deadline = Some(now + self.debounce);
        tracing::trace!(
            rows = viewport.grid.rows,
            columns = viewport.grid.columns,
            "Viewport observed"
        );
        changed
    }

    /// Emit the pending notification if its deadline has passed
    ///
    /// Returns `None` while the burst is still settling, and also when the
    /// burst ended on the size the editor already knows.
    pub fn poll(&mut self, now: Instant) -> Option<GridSize> {
        match self.deadline {
            Some(deadline) if now >= deadline => self.flush(),
            _ => None,
        }
    }

    /// Emit immediately, regardless of the deadline
    pub fn flush(&mut self) -> Option<GridSize> {
        self.deadline = None;
        let grid = self.viewport.grid;
        if self.last_sent == Some(grid) {
            return None;
        }
        self.last_sent = Some(grid);
        Some(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn coordinator() -> ResizeCoordinator {
        let viewport = Viewport::new(PixelSize::new(800.0, 600.0), CellMetrics::new(8.0, 12.0));
        ResizeCoordinator::new(viewport, DEFAULT_DEBOUNCE)
    }

    #[test]
    fn test_grid_fit_floors() {
        let grid = GridSize::fit(PixelSize::new(805.0, 599.0), CellMetrics::new(8.0, 12.0));
        assert_eq!(grid, GridSize::new(49, 100));
    }

    #[test]
    fn test_grid_fit_degenerate_metrics() {
        let grid = GridSize::fit(PixelSize::new(800.0, 600.0), CellMetrics::new(0.0, 12.0));
        assert_eq!(grid, GridSize::new(50, 0));

        let grid = GridSize::fit(PixelSize::new(-1.0, 600.0), CellMetrics::new(8.0, 12.0));
        assert_eq!(grid.columns, 0);
    }

    #[test]
    fn test_initial_flush_sends_once() {
        let mut coord = coordinator();
        assert_eq!(coord.flush(), Some(GridSize::new(50, 100)));
        assert_eq!(coord.flush(), None);
    }

    #[test]
    fn test_viewport_updates_immediately() {
        let mut coord = coordinator();
        let now = Instant::now();

        assert!(coord.observe(PixelSize::new(400.0, 300.0), now));
        assert_eq!(coord.viewport().grid, GridSize::new(25, 50));
        assert_eq!(coord.poll(now), None);
    }

    #[test]
    fn test_burst_emits_final_size_once() {
        let mut coord = coordinator();
        coord.flush();
        let start = Instant::now();

        coord.observe(PixelSize::new(700.0, 600.0), start);
        coord.observe(PixelSize::new(600.0, 600.0), start + Duration::from_millis(20));
        coord.observe(PixelSize::new(480.0, 360.0), start + Duration::from_millis(40));

        // Deadline moves with each event
        assert_eq!(
            coord.deadline(),
            Some(start + Duration::from_millis(40) + DEFAULT_DEBOUNCE)
        );
        assert_eq!(coord.poll(start + Duration::from_millis(60)), None);
        assert_eq!(
            coord.poll(start + Duration::from_millis(90)),
            Some(GridSize::new(30, 60))
        );
        assert_eq!(coord.deadline(), None);
        assert_eq!(coord.poll(start + Duration::from_millis(200)), None);
    }

    #[test]
    fn test_burst_back_to_sent_size_is_silent() {
        let mut coord = coordinator();
        coord.flush();
        let start = Instant::now();

        coord.observe(PixelSize::new(400.0, 300.0), start);
        coord.observe(PixelSize::new(800.0, 600.0), start);

        assert_eq!(coord.poll(start + DEFAULT_DEBOUNCE), None);
        assert_eq!(coord.last_sent(), Some(GridSize::new(50, 100)));
    }

    #[test]
    fn test_cell_metrics_change_counts_as_resize() {
        let mut coord = coordinator();
        coord.flush();
        let now = Instant::now();

        assert!(coord.set_cell_metrics(CellMetrics::new(16.0, 24.0), now));
        assert_eq!(coord.viewport().grid, GridSize::new(25, 50));
        assert_eq!(coord.poll(now + DEFAULT_DEBOUNCE), Some(GridSize::new(25, 50)));
    }

    #[test]
    fn test_with_grid_viewport() {
        let viewport = Viewport::with_grid(24, 80, CellMetrics::default());
        assert_eq!(viewport.rows(), 24);
        assert_eq!(viewport.columns(), 80);
        assert_eq!(viewport.pixels, PixelSize::new(80.0, 24.0));
    }
}
