//! Screen Model
//!
//! The authoritative representation of what the editor wants displayed.
//! It is mutated only through [`ScreenModel::apply`], one message at a time,
//! and every handler replaces state wholesale: there is no merging of partial
//! updates.
//!
//! # States
//!
//! A fresh model is *uninitialized* (empty buffer, no status, no floating
//! elements). The first message moves it to *ready*, which absorbs every
//! further message.
//!
//! # Invariants
//!
//! - `info` and `menu` are either fully present or absent
//! - a menu selection, when set, is a valid index into the menu items

use thiserror::Error;

use crate::protocol::{Coord, EditorMessage, Face, InfoStyle, Line, MenuStyle};

/// Invalid state transitions requested by the editor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScreenError {
    /// `menu_select` arrived while no menu is shown
    #[error("menu_select({index}) without a visible menu")]
    MenuNotShown {
        /// Requested index
        index: i64,
    },

    /// `menu_select` index is neither -1 nor a valid item index
    #[error("menu_select({index}) out of range for {len} items")]
    MenuIndexOutOfRange {
        /// Requested index
        index: i64,
        /// Number of menu items
        len: usize,
    },
}

/// Outcome of applying a message
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    /// The model changed
    Updated,
    /// The message was not relevant (unknown method)
    Ignored,
}

/// The floating info box
#[derive(Clone, Debug, PartialEq)]
pub struct Info {
    /// Title (may be empty)
    pub title: String,
    /// Body text, newline separated
    pub body: String,
    /// Anchor in grid cells
    pub anchor: Coord,
    /// Face of the whole box
    pub face: Face,
    /// Placement hint
    pub style: InfoStyle,
}

/// The completion menu
#[derive(Clone, Debug, PartialEq)]
pub struct Menu {
    /// Entries as sent by the editor (never restyled in place)
    pub items: Vec<Line>,
    /// Anchor in grid cells
    pub anchor: Coord,
    /// Selected entry
    pub selected: Option<usize>,
    /// Face of the selected entry
    pub selected_face: Face,
    /// Face of the other entries
    pub menu_face: Face,
    /// Placement hint
    pub style: MenuStyle,
}

impl Menu {
    /// Widest entry in grid cells
    #[must_use]
    pub fn item_width(&self) -> usize {
        self.items.iter().map(Line::width).max().unwrap_or(0)
    }
}

/// Display state for one editor session
#[derive(Clone, Debug, PartialEq)]
pub struct ScreenModel {
    buffer_lines: Vec<Line>,
    default_face: Face,
    padding_face: Face,
    status: Line,
    mode: Line,
    info: Option<Info>,
    menu: Option<Menu>,
    ready: bool,
}

impl Default for ScreenModel {
    fn default() -> Self {
        Self::with_faces(Face::new("white", "black"), Face::new("#999999", "black"))
    }
}

impl ScreenModel {
    /// Create an uninitialized model with the stock faces
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an uninitialized model with the given base faces
    ///
    /// These faces are used until the first `draw` replaces them.
    #[must_use]
    pub fn with_faces(default_face: Face, padding_face: Face) -> Self {
        Self {
            buffer_lines: Vec::new(),
            default_face,
            padding_face,
            status: Line::new(),
            mode: Line::new(),
            info: None,
            menu: None,
            ready: false,
        }
    }

    /// Apply one inbound message
    ///
    /// On error the model is left untouched.
    pub fn apply(&mut self, msg: EditorMessage) -> Result<Applied, ScreenError> {
        match msg {
            EditorMessage::Draw {
                lines,
                default_face,
                padding_face,
            } => {
                // `default` is frozen against the face that came with the draw
                self.buffer_lines = lines.iter().map(|l| l.resolved(&default_face)).collect();
                self.default_face = default_face;
                self.padding_face = padding_face;
            }
            EditorMessage::DrawStatus { status, mode } => {
                self.status = status;
                self.mode = mode;
            }
            EditorMessage::InfoShow {
                title,
                body,
                anchor,
                face,
                style,
            } => {
                self.info = Some(Info {
                    title,
                    body,
                    anchor,
                    face,
                    style,
                });
            }
            EditorMessage::InfoHide => {
                self.info = None;
            }
            EditorMessage::MenuShow {
                items,
                anchor,
                selected_face,
                menu_face,
                style,
            } => {
                self.menu = Some(Menu {
                    items,
                    anchor,
                    selected: None,
                    selected_face,
                    menu_face,
                    style,
                });
            }
            EditorMessage::MenuSelect { index } => {
                let menu = self
                    .menu
                    .as_mut()
                    .ok_or(ScreenError::MenuNotShown { index })?;
                menu.selected = selection(index, menu.items.len())?;
            }
            EditorMessage::MenuHide => {
                self.menu = None;
            }
            EditorMessage::Unknown { method } => {
                tracing::debug!(method = %method, "Ignoring unknown method");
                return Ok(Applied::Ignored);
            }
        }

        self.ready = true;
        Ok(Applied::Updated)
    }

    /// Whether at least one message has been applied
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Buffer lines with `default` colors already resolved
    #[must_use]
    pub fn buffer_lines(&self) -> &[Line] {
        &self.buffer_lines
    }

    /// Face that `default` colors resolve to
    #[must_use]
    pub fn default_face(&self) -> &Face {
        &self.default_face
    }

    /// Face for the area past the last buffer line
    #[must_use]
    pub fn padding_face(&self) -> &Face {
        &self.padding_face
    }

    /// Status (prompt) line
    #[must_use]
    pub fn status(&self) -> &Line {
        &self.status
    }

    /// Mode line
    #[must_use]
    pub fn mode(&self) -> &Line {
        &self.mode
    }

    /// The info box, if shown
    #[must_use]
    pub fn info(&self) -> Option<&Info> {
        self.info.as_ref()
    }

    /// The menu, if shown
    #[must_use]
    pub fn menu(&self) -> Option<&Menu> {
        self.menu.as_ref()
    }
}

fn selection(index: i64, len: usize) -> Result<Option<usize>, ScreenError> {
    if index == -1 {
        return Ok(None);
    }
    match usize::try_from(index) {
        Ok(i) if i < len => Ok(Some(i)),
        _ => Err(ScreenError::MenuIndexOutOfRange { index, len }),
    }
}
