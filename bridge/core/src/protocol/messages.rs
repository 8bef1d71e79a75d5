//! Editor Messages
//!
//! Inbound display updates sent by the editor, decoded from the positional
//! `params` array of a JSON-RPC notification into a typed sum.
//!
//! # Wire Format
//!
//! ```text
//! {"jsonrpc":"2.0","method":"menu_select","params":[3]}
//! ```
//!
//! Params are read by index, so trailing params added by the editor are
//! tolerated. A missing or ill-typed param is a [`ProtocolError`] naming the
//! method and position.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::types::{Coord, Face, InfoStyle, Line, MenuStyle};

/// Protocol version tag carried by every message
pub const JSONRPC_VERSION: &str = "2.0";

/// Errors raised while decoding a line from the editor
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The line is not a JSON object of the expected shape
    #[error("Malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The line is not valid UTF-8
    #[error("Message is not valid UTF-8")]
    InvalidUtf8,

    /// The line exceeds the maximum accepted size
    #[error("Message too large: {size} bytes (max: {max})")]
    TooLarge {
        /// Size of the offending line
        size: usize,
        /// Configured maximum
        max: usize,
    },

    /// A required positional param is absent
    #[error("{method}: missing param #{index}")]
    MissingParam {
        /// Method being decoded
        method: String,
        /// Zero-based param position
        index: usize,
    },

    /// A positional param has the wrong shape
    #[error("{method}: invalid param #{index}: {source}")]
    InvalidParam {
        /// Method being decoded
        method: String,
        /// Zero-based param position
        index: usize,
        /// Underlying decode error
        source: serde_json::Error,
    },
}

/// A notification as it appears on the wire, version tag stripped
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawMessage {
    /// Method name
    pub method: String,
    /// Positional parameters
    #[serde(default)]
    pub params: Vec<Value>,
}

impl RawMessage {
    /// Parse one line of editor output
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(line)?)
    }

    fn param<T: DeserializeOwned>(&self, index: usize) -> Result<T, ProtocolError> {
        let value = self
            .params
            .get(index)
            .ok_or_else(|| ProtocolError::MissingParam {
                method: self.method.clone(),
                index,
            })?;

        T::deserialize(value).map_err(|source| ProtocolError::InvalidParam {
            method: self.method.clone(),
            index,
            source,
        })
    }
}

/// Display updates from the editor
#[derive(Clone, Debug, PartialEq)]
pub enum EditorMessage {
    /// Replace the buffer grid and the base faces
    Draw {
        /// Visible buffer lines, top to bottom
        lines: Vec<Line>,
        /// Face that `default` colors resolve to
        default_face: Face,
        /// Face for the area past the last buffer line
        padding_face: Face,
    },

    /// Replace the status and mode lines together
    DrawStatus {
        /// Prompt / message line
        status: Line,
        /// Mode line (right aligned)
        mode: Line,
    },

    /// Show the info box
    InfoShow {
        /// Box title (may be empty)
        title: String,
        /// Body text, newline separated
        body: String,
        /// Anchor in grid cells
        anchor: Coord,
        /// Face for the whole box
        face: Face,
        /// Placement hint
        style: InfoStyle,
    },

    /// Hide the info box
    InfoHide,

    /// Show the completion menu
    MenuShow {
        /// Menu entries
        items: Vec<Line>,
        /// Anchor in grid cells
        anchor: Coord,
        /// Face of the selected entry
        selected_face: Face,
        /// Face of the other entries
        menu_face: Face,
        /// Placement hint
        style: MenuStyle,
    },

    /// Select a menu entry; `-1` clears the selection
    MenuSelect {
        /// Entry index or -1
        index: i64,
    },

    /// Hide the completion menu
    MenuHide,

    /// A method this front-end does not know about
    Unknown {
        /// The method name
        method: String,
    },
}

impl EditorMessage {
    /// Decode one line of editor output
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        Self::decode(&RawMessage::parse(line)?)
    }

    /// Decode a raw notification into its typed form
    pub fn decode(raw: &RawMessage) -> Result<Self, ProtocolError> {
        let msg = match raw.method.as_str() {
            "draw" => Self::Draw {
                lines: raw.param(0)?,
                default_face: raw.param(1)?,
                padding_face: raw.param(2)?,
            },
            "draw_status" => Self::DrawStatus {
                status: raw.param(0)?,
                mode: raw.param(1)?,
            },
            "info_show" => Self::InfoShow {
                title: raw.param(0)?,
                body: raw.param(1)?,
                anchor: raw.param(2)?,
                face: raw.param(3)?,
                style: raw.param(4)?,
            },
            "info_hide" => Self::InfoHide,
            "menu_show" => Self::MenuShow {
                items: raw.param(0)?,
                anchor: raw.param(1)?,
                selected_face: raw.param(2)?,
                menu_face: raw.param(3)?,
                style: raw.param(4)?,
            },
            "menu_select" => Self::MenuSelect {
                index: raw.param(0)?,
            },
            "menu_hide" => Self::MenuHide,
            other => Self::Unknown {
                method: other.to_string(),
            },
        };
        Ok(msg)
    }

    /// The protocol method name of this message
    #[must_use]
    pub fn method(&self) -> &str {
        match self {
            Self::Draw { .. } => "draw",
            Self::DrawStatus { .. } => "draw_status",
            Self::InfoShow { .. } => "info_show",
            Self::InfoHide => "info_hide",
            Self::MenuShow { .. } => "menu_show",
            Self::MenuSelect { .. } => "menu_select",
            Self::MenuHide => "menu_hide",
            Self::Unknown { method } => method,
        }
    }
}

/// Requests sent from the front-end to the editor
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    /// Keys in editor notation, e.g. `<c-a>`
    Keys(String),
    /// New grid size
    Resize {
        /// Rows
        rows: u16,
        /// Columns
        columns: u16,
    },
}

#[derive(Serialize)]
struct Envelope<'a> {
    jsonrpc: &'static str,
    method: &'static str,
    params: &'a Value,
}

impl Request {
    /// The protocol method name
    #[must_use]
    pub fn method(&self) -> &'static str {
        match self {
            Self::Keys(_) => "keys",
            Self::Resize { .. } => "resize",
        }
    }

    /// Positional params for this request
    #[must_use]
    pub fn params(&self) -> Value {
        match self {
            Self::Keys(notation) => Value::Array(vec![Value::String(notation.clone())]),
            Self::Resize { rows, columns } => {
                Value::Array(vec![Value::from(*rows), Value::from(*columns)])
            }
        }
    }

    /// Serialize as one newline-terminated JSON line
    pub fn to_line(&self) -> Result<Vec<u8>, serde_json::Error> {
        let params = self.params();
        let envelope = Envelope {
            jsonrpc: JSONRPC_VERSION,
            method: self.method(),
            params: &params,
        };
        let mut buf = serde_json::to_vec(&envelope)?;
        buf.push(b'\n');
        Ok(buf)
    }
}
