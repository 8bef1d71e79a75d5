//! JSON UI Protocol
//!
//! Types shared by both directions of the editor connection:
//! - [`types`]: Styled text (colors, faces, atoms, lines) and placement hints
//! - [`messages`]: Inbound display updates and outbound requests

pub mod messages;
pub mod types;

pub use messages::{EditorMessage, ProtocolError, RawMessage, Request, JSONRPC_VERSION};
pub use types::{
    Atom, Attribute, Color, Coord, Face, InfoStyle, Line, MenuStyle, DEFAULT_COLOR,
};
