//! Bridge Core - Headless protocol bridge and screen compositor for kak-surface
//!
//! This crate drives a Kakoune editor running in JSON UI mode (`kak -ui json`)
//! and turns its display updates into drawing operations. It is completely
//! independent of any UI toolkit: a host shell (terminal, GPU window, test
//! harness) only has to deliver key and resize events and implement the
//! [`Canvas`] capability.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          Host shell                              │
//! │    key events          resize events             Canvas impl     │
//! └───────┬──────────────────────┬──────────────────────▲────────────┘
//!         │                      │                      │ Frame::paint
//! ┌───────┼──────────────────────┼──────────────────────┼────────────┐
//! │       ▼                      ▼                      │            │
//! │  ┌─────────┐        ┌────────────────┐      ┌──────────────┐     │
//! │  │  keys   │        │ ResizeCoord.   │      │    layout    │     │
//! │  │ encode  │        │ (debounced)    │      │ render()     │     │
//! │  └────┬────┘        └───────┬────────┘      └──────▲───────┘     │
//! │       │ notation            │ rows/cols            │             │
//! │       ▼                     ▼                      │             │
//! │  ┌───────────────────────────────┐  BridgeEvent ┌──┴──────────┐  │
//! │  │           RpcBridge           │─────────────▶│   Session   │  │
//! │  │  (child process, NDJSON)      │              │ ScreenModel │  │
//! │  └───────────────┬───────────────┘              └─────────────┘  │
//! └──────────────────┼───────────────────────────────────────────────┘
//!                    ▼
//!             kak -ui json
//! ```
//!
//! # Key Types
//!
//! - [`RpcBridge`]: Owns the editor process and its newline-delimited JSON streams
//! - [`EditorMessage`]: Typed inbound display updates
//! - [`ScreenModel`]: What the editor currently wants displayed
//! - [`Session`]: The UI controller that owns the model for one editor session
//! - [`render`]: Pure layout function producing a [`Frame`] of draw operations
//! - [`ResizeCoordinator`]: Viewport metrics and debounced resize notifications
//! - [`encode_key`]: Key press to Kakoune key notation
//!
//! # Module Overview
//!
//! - [`config`]: TOML configuration, environment and CLI overrides
//! - [`keys`]: Key encoder
//! - [`layout`]: Compositor, status/mode arbitration, info box, menu grid
//! - [`protocol`]: Wire types and message decoding
//! - [`resize`]: Viewport and resize debouncing
//! - [`screen`]: Screen model state machine
//! - [`session`]: UI controller
//! - [`transport`]: Line codec, editor process, RPC bridge

#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod config;
pub mod keys;
pub mod layout;
pub mod protocol;
pub mod resize;
pub mod screen;
pub mod session;
pub mod transport;

// Re-exports for convenience
pub use config::{
    default_config_path, load_config, load_config_from_path, ConfigError, ConfigOverrides,
    ConfigSource, SurfaceConfig, SurfaceToml,
};
pub use keys::{encode as encode_key, Modifiers};
pub use layout::{
    render, Canvas, DrawOp, Frame, LayoutOptions, PixelPoint, PixelRect, Region, TextStyle,
};
pub use protocol::{
    Atom, Attribute, Color, Coord, EditorMessage, Face, InfoStyle, Line, MenuStyle,
    ProtocolError, RawMessage, Request,
};
pub use resize::{CellMetrics, GridSize, PixelSize, ResizeCoordinator, Viewport};
pub use screen::{Applied, Info, Menu, ScreenError, ScreenModel};
pub use session::{Session, SessionStatus};
pub use transport::{
    BridgeError, BridgeEvent, EditorCommand, LineDecoder, RpcBridge, SessionTarget,
};
