//! Transport Layer
//!
//! Everything between the screen model and the editor process:
//!
//! - [`codec`]: newline-delimited JSON framing
//! - [`process`]: editor command line and session selection
//! - [`bridge`]: the child process, its I/O tasks and the event stream
//!
//! # Example
//!
//! ```ignore
//! use bridge_core::transport::{BridgeEvent, EditorCommand, RpcBridge, SessionTarget};
//!
//! let command = EditorCommand::new("kak").with_target(SessionTarget::Connect("main".into()));
//! let mut bridge = RpcBridge::spawn(&command)?;
//! bridge.send_resize(24, 80)?;
//!
//! while let Some(event) = bridge.recv().await {
//!     match event {
//!         BridgeEvent::Message(msg) => { /* apply to the screen model */ }
//!         BridgeEvent::SessionEnded => break,
//!     }
//! }
//! ```

pub mod bridge;
pub mod codec;
pub mod process;

pub use bridge::{BridgeError, BridgeEvent, RpcBridge, SHUTDOWN_TIMEOUT};
pub use codec::{LineDecoder, MAX_LINE_SIZE};
pub use process::{EditorCommand, SessionTarget};
