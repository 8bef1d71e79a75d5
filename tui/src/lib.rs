//! kak-surface TUI - Terminal front-end for Kakoune's JSON UI
//!
//! This crate hosts a [`bridge_core::Session`] in a terminal: crossterm
//! delivers keys and resizes, and a layered ratatui compositor implements the
//! core's drawing capability.
//!
//! # Architecture
//!
//! - **App**: The single-threaded event loop
//! - **Compositor**: One opaque layer per editor region, z-ordered
//! - **Input**: crossterm key events to editor key notation
//! - **Theme**: Editor colors and attributes to terminal styles

pub mod app;
pub mod compositor;
pub mod input;
pub mod theme;

pub use app::App;
