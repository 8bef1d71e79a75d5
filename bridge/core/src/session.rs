//! Session controller
//!
//! Owns everything that changes during one editor session: the screen model,
//! the viewport and the resize coordinator. Bridge events are handed to
//! [`Session::handle`] in arrival order; once the session has ended, nothing
//! mutates the model any more.
//!
//! The session never talks to the bridge itself. The host forwards keys and
//! the sizes returned by [`Session::poll_resize`], which keeps this type
//! fully synchronous and testable.

use std::time::{Duration, Instant};

use crate::layout::{render, Frame, LayoutOptions};
use crate::resize::{CellMetrics, GridSize, PixelSize, ResizeCoordinator, Viewport};
use crate::screen::{Applied, ScreenError, ScreenModel};
use crate::transport::BridgeEvent;

/// Suffix of the window title
pub const TITLE_SUFFIX: &str = "kak-surface";

/// Lifecycle of a session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    /// The editor is connected
    Running,
    /// The editor is gone; terminal
    Ended,
}

/// UI controller for one editor session
#[derive(Debug)]
pub struct Session {
    model: ScreenModel,
    resize: ResizeCoordinator,
    options: LayoutOptions,
    status: SessionStatus,
}

impl Session {
    /// Create a session
    #[must_use]
    pub fn new(
        model: ScreenModel,
        viewport: Viewport,
        debounce: Duration,
        options: LayoutOptions,
    ) -> Self {
        Self {
            model,
            resize: ResizeCoordinator::new(viewport, debounce),
            options,
            status: SessionStatus::Running,
        }
    }

    /// Apply one bridge event
    ///
    /// Returns `Applied::Updated` when the screen needs repainting.
    ///
    /// # Errors
    ///
    /// Returns the `ScreenError` of a rejected message; the model is
    /// unchanged and the session keeps running.
    pub fn handle(&mut self, event: BridgeEvent) -> Result<Applied, ScreenError> {
        if self.status == SessionStatus::Ended {
            tracing::debug!("Ignoring event after session end");
            return Ok(Applied::Ignored);
        }

        match event {
            BridgeEvent::Message(msg) => {
                let method = msg.method().to_string();
                self.model.apply(msg).inspect_err(|e| {
                    tracing::warn!(method = %method, error = %e, "Rejected editor message");
                })
            }
            BridgeEvent::SessionEnded => {
                tracing::info!("Session ended");
                self.status = SessionStatus::Ended;
                Ok(Applied::Updated)
            }
        }
    }

    /// Current lifecycle state
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Whether the session has ended
    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.status == SessionStatus::Ended
    }

    /// The screen model
    #[must_use]
    pub fn model(&self) -> &ScreenModel {
        &self.model
    }

    /// The current viewport
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        self.resize.viewport()
    }

    /// Layout options
    #[must_use]
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Lay out the current state
    #[must_use]
    pub fn render(&self) -> Frame {
        render(&self.model, self.resize.viewport(), &self.options)
    }

    /// Window title: the mode line followed by the program name
    #[must_use]
    pub fn title(&self) -> String {
        let mode = self.model.mode().text();
        if mode.is_empty() {
            TITLE_SUFFIX.to_string()
        } else {
            format!("{mode} - {TITLE_SUFFIX}")
        }
    }

    /// Record new window dimensions; returns whether the grid changed
    pub fn observe_resize(&mut self, pixels: PixelSize, now: Instant) -> bool {
        self.resize.observe(pixels, now)
    }

    /// Record new cell metrics; returns whether the grid changed
    pub fn set_cell_metrics(&mut self, cell: CellMetrics, now: Instant) -> bool {
        self.resize.set_cell_metrics(cell, now)
    }

    /// When the pending resize notification is due
    #[must_use]
    pub fn resize_deadline(&self) -> Option<Instant> {
        self.resize.deadline()
    }

    /// Size to send to the editor, if a debounced resize has settled
    pub fn poll_resize(&mut self, now: Instant) -> Option<GridSize> {
        self.resize.poll(now)
    }

    /// Size to send right away (startup)
    pub fn flush_resize(&mut self) -> Option<GridSize> {
        self.resize.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{EditorMessage, Face, Line};
    use crate::resize::DEFAULT_DEBOUNCE;
    use pretty_assertions::assert_eq;

    fn session() -> Session {
        Session::new(
            ScreenModel::new(),
            Viewport::with_grid(24, 80, CellMetrics::default()),
            DEFAULT_DEBOUNCE,
            LayoutOptions::default(),
        )
    }

    fn status(mode: &str) -> BridgeEvent {
        BridgeEvent::Message(EditorMessage::DrawStatus {
            status: Line::new(),
            mode: Line::plain(mode, Face::default()),
        })
    }

    #[test]
    fn test_no_mutation_after_end() {
        let mut session = session();
        session.handle(status("normal")).unwrap();
        assert_eq!(session.handle(BridgeEvent::SessionEnded).unwrap(), Applied::Updated);

        let before = session.model().clone();
        assert_eq!(session.handle(status("insert")).unwrap(), Applied::Ignored);
        assert_eq!(session.handle(BridgeEvent::SessionEnded).unwrap(), Applied::Ignored);
        assert_eq!(session.model(), &before);
        assert!(session.is_ended());
    }

    #[test]
    fn test_rejected_message_keeps_running() {
        let mut session = session();
        let err = session
            .handle(BridgeEvent::Message(EditorMessage::MenuSelect { index: 3 }))
            .unwrap_err();
        assert_eq!(err, ScreenError::MenuNotShown { index: 3 });
        assert_eq!(session.status(), SessionStatus::Running);
    }

    #[test]
    fn test_title_follows_mode_line() {
        let mut session = session();
        assert_eq!(session.title(), "kak-surface");
        session.handle(status("insert")).unwrap();
        assert_eq!(session.title(), "insert - kak-surface");
    }

    #[test]
    fn test_resize_flow() {
        let mut session = session();
        assert_eq!(session.flush_resize(), Some(GridSize::new(24, 80)));

        let now = Instant::now();
        assert!(session.observe_resize(PixelSize::new(100.0, 30.0), now));
        assert_eq!(session.viewport().grid, GridSize::new(30, 100));
        assert_eq!(session.poll_resize(now), None);
        assert_eq!(
            session.poll_resize(now + DEFAULT_DEBOUNCE),
            Some(GridSize::new(30, 100))
        );
    }

    #[test]
    fn test_render_uses_current_viewport() {
        let mut session = session();
        session.observe_resize(PixelSize::new(40.0, 10.0), Instant::now());
        let frame = session.render();
        let pad = frame.region(crate::layout::Region::Pad).unwrap();
        assert_eq!(pad.width, 40.0);
        assert_eq!(pad.height, 9.0);
    }
}
