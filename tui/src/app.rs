//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin host around a
//! [`Session`]:
//! - Event loop (keyboard, resize)
//! - RpcBridge to the editor process
//! - Compositor for rendering
//!
//! One `tokio::select!` loop multiplexes three sources: terminal events,
//! bridge events and the pending resize deadline. Everything runs on the
//! current thread; the session is only ever touched from this loop.

use std::io;
use std::time::Instant;

use anyhow::Context;
use crossterm::event::{Event, EventStream, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::SetTitle;
use futures::StreamExt;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::Rect;
use ratatui::Terminal;

use bridge_core::{
    Applied, BridgeError, BridgeEvent, CellMetrics, GridSize, LayoutOptions, PixelSize, RpcBridge,
    ScreenModel, Session, SurfaceConfig, Viewport,
};

use crate::compositor::Compositor;
use crate::input;

/// Main application state
pub struct App {
    // === Core State ===
    /// Is the app still running?
    running: bool,
    /// Something changed since the last draw
    dirty: bool,
    /// Last title sent to the terminal
    title: Option<String>,

    // === Editor ===
    /// The editor session (screen model, viewport, resize debouncing)
    session: Session,
    /// Pipe to the editor process
    bridge: RpcBridge,

    // === UI Components ===
    /// The layered compositor
    compositor: Compositor,
}

impl App {
    /// Start the editor and size the session to the terminal
    ///
    /// # Errors
    ///
    /// Fails when the terminal size is unknown or the editor cannot be started.
    pub fn new(config: &SurfaceConfig) -> anyhow::Result<Self> {
        let (width, height) = crossterm::terminal::size()?;

        let command = config.editor();
        tracing::info!(program = %command.program(), args = ?command.argv(), "Starting editor");
        let bridge = RpcBridge::spawn(&command)
            .with_context(|| format!("Failed to start editor: {}", command.program()))?;

        let model = ScreenModel::with_faces(config.default_face.clone(), config.padding_face.clone());
        let session = Session::new(
            model,
            Viewport::with_grid(height, width, CellMetrics::default()),
            config.resize_debounce,
            LayoutOptions {
                status_on_top: config.status_on_top,
            },
        );

        Ok(Self::with_parts(session, bridge))
    }

    /// Assemble an app from an existing session and bridge
    pub fn with_parts(session: Session, bridge: RpcBridge) -> Self {
        let viewport = session.viewport();
        let area = Rect::new(0, 0, viewport.grid.columns, viewport.grid.rows);

        Self {
            running: true,
            dirty: true,
            title: None,
            session,
            bridge,
            compositor: Compositor::new(area),
        }
    }

    /// Main event loop
    ///
    /// Returns when the editor exits or the terminal event stream closes.
    ///
    /// # Errors
    ///
    /// Fails on terminal I/O errors.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        // Create async event stream for non-blocking terminal events
        let mut event_stream = EventStream::new();

        // The editor draws nothing until it knows its size
        if let Some(size) = self.session.flush_resize() {
            self.send_resize(size);
        }

        while self.running {
            let deadline = self.session.resize_deadline();

            tokio::select! {
                // Terminal events
                maybe_event = event_stream.next() => match maybe_event {
                    Some(Ok(event)) => self.handle_terminal_event(event),
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "Terminal event error");
                    }
                    None => {
                        tracing::info!("Terminal event stream closed");
                        self.running = false;
                    }
                },

                // Editor display updates
                _ = self.pump_bridge() => {}

                // Debounced resize notification
                () = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now).into()),
                    if deadline.is_some() =>
                {
                    if let Some(size) = self.session.poll_resize(Instant::now()) {
                        self.send_resize(size);
                    }
                }
            }

            if self.dirty && !self.session.is_ended() {
                self.sync_title(terminal)?;
                self.draw(terminal)?;
            }
        }

        Ok(())
    }

    /// Stop the editor process
    ///
    /// # Errors
    ///
    /// Fails if the editor could not be waited for.
    pub async fn shutdown(self) -> anyhow::Result<()> {
        self.bridge.shutdown().await?;
        Ok(())
    }

    /// Is the app still running?
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The editor session
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Handle one terminal event
    pub fn handle_terminal_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                if let Some(keys) = input::translate(&key) {
                    tracing::trace!(keys = %keys, "Key");
                    if let Err(e) = self.bridge.send_keys(keys) {
                        tracing::debug!(error = %e, "Dropping key");
                    }
                }
            }
            Event::Resize(width, height) => self.handle_resize(width, height),
            _ => {}
        }
    }

    /// Handle terminal resize
    fn handle_resize(&mut self, width: u16, height: u16) {
        self.compositor.resize(Rect::new(0, 0, width, height));
        self.session
            .observe_resize(PixelSize::new(f32::from(width), f32::from(height)), Instant::now());
        self.dirty = true;
    }

    /// Apply one bridge event to the session
    pub fn handle_bridge_event(&mut self, event: BridgeEvent) {
        // Rejected messages are logged by the session and change nothing
        if let Ok(Applied::Updated) = self.session.handle(event) {
            self.dirty = true;
        }
        if self.session.is_ended() {
            self.running = false;
        }
    }

    /// Wait for the next bridge event, then apply it with everything queued
    /// behind it so a burst of updates is drawn once
    ///
    /// Returns `false` once the bridge has closed.
    pub async fn pump_bridge(&mut self) -> bool {
        match self.bridge.recv().await {
            Some(event) => {
                self.handle_bridge_event(event);
                self.drain_bridge();
                true
            }
            None => {
                self.running = false;
                false
            }
        }
    }

    /// Apply bridge events that are already waiting
    pub fn drain_bridge(&mut self) {
        while self.running {
            let Some(event) = self.bridge.try_recv() else {
                break;
            };
            self.handle_bridge_event(event);
        }
    }

    fn send_resize(&mut self, size: GridSize) {
        tracing::debug!(rows = size.rows, columns = size.columns, "Sending resize");
        match self.bridge.send_resize(size.rows, size.columns) {
            Ok(()) => {}
            Err(BridgeError::SessionEnded) => self.running = false,
            Err(e) => tracing::warn!(error = %e, "Failed to send resize"),
        }
    }

    /// Update the terminal title when the mode line changed
    fn sync_title(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let title = self.session.title();
        if self.title.as_deref() != Some(title.as_str()) {
            execute!(terminal.backend_mut(), SetTitle(&title))?;
            self.title = Some(title);
        }
        Ok(())
    }

    /// Render the session and push it to the terminal
    ///
    /// # Errors
    ///
    /// Fails on terminal I/O errors.
    pub fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        self.session.render().paint(&mut self.compositor);

        terminal.draw(|frame| {
            let output = self.compositor.composite();
            let area = frame.area();
            let buf = frame.buffer_mut();

            for y in 0..area.height.min(output.area.height) {
                for x in 0..area.width.min(output.area.width) {
                    let idx = output.index_of(x, y);
                    if idx < output.content.len() {
                        buf[(x, y)] = output.content[idx].clone();
                    }
                }
            }
        })?;

        self.dirty = false;
        Ok(())
    }
}
