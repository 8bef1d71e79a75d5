//! Display Types
//!
//! The styled-text vocabulary of the JSON UI protocol: colors, faces, atoms
//! and lines, plus the anchor and style hints that accompany floating
//! elements.
//!
//! Widths are always measured in grid cells (Unicode display width), never in
//! bytes or pixels.

use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

/// The color token that defers to the active default face
pub const DEFAULT_COLOR: &str = "default";

/// An opaque color token (`"red"`, `"rgb:ff8800"`, `"default"`, ...)
///
/// The bridge never interprets colors; only the host shell does. The one
/// exception is the `default` sentinel, which is resolved against a base face
/// before anything is drawn.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub String);

impl Color {
    /// Create a color from any token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The `default` sentinel
    #[must_use]
    pub fn default_color() -> Self {
        Self(DEFAULT_COLOR.to_string())
    }

    /// Whether this is the `default` sentinel
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_COLOR
    }

    /// The raw token
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve the `default` sentinel against a fallback color
    #[must_use]
    pub fn or(&self, fallback: &Color) -> Color {
        if self.is_default() {
            fallback.clone()
        } else {
            self.clone()
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::default_color()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Color {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

/// A face attribute
///
/// Unknown attribute names are kept verbatim so newer editors do not break
/// decoding.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Attribute {
    /// `underline`
    Underline,
    /// `reverse`: swap foreground and background
    Reverse,
    /// `blink`
    Blink,
    /// `bold`
    Bold,
    /// `dim`
    Dim,
    /// `italic`
    Italic,
    /// `final_fg`
    FinalFg,
    /// `final_bg`
    FinalBg,
    /// `final_attr`
    FinalAttr,
    /// Anything else
    Other(String),
}

impl Attribute {
    /// The wire name of this attribute
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Underline => "underline",
            Self::Reverse => "reverse",
            Self::Blink => "blink",
            Self::Bold => "bold",
            Self::Dim => "dim",
            Self::Italic => "italic",
            Self::FinalFg => "final_fg",
            Self::FinalBg => "final_bg",
            Self::FinalAttr => "final_attr",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for Attribute {
    fn from(name: String) -> Self {
        match name.as_str() {
            "underline" => Self::Underline,
            "reverse" => Self::Reverse,
            "blink" => Self::Blink,
            "bold" => Self::Bold,
            "dim" => Self::Dim,
            "italic" => Self::Italic,
            "final_fg" => Self::FinalFg,
            "final_bg" => Self::FinalBg,
            "final_attr" => Self::FinalAttr,
            _ => Self::Other(name),
        }
    }
}

impl From<Attribute> for String {
    fn from(attr: Attribute) -> Self {
        attr.name().to_string()
    }
}

/// Foreground, background and attributes
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Face {
    /// Foreground color
    pub fg: Color,
    /// Background color
    pub bg: Color,
    /// Attribute set
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl Face {
    /// Create a face without attributes
    pub fn new(fg: impl Into<Color>, bg: impl Into<Color>) -> Self {
        Self {
            fg: fg.into(),
            bg: bg.into(),
            attributes: Vec::new(),
        }
    }

    /// Add an attribute
    #[must_use]
    pub fn with_attribute(mut self, attr: Attribute) -> Self {
        self.attributes.push(attr);
        self
    }

    /// Whether either color is the `default` sentinel
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.fg.is_default() || self.bg.is_default()
    }

    /// Resolve `default` components against a base face
    ///
    /// Attributes are kept as-is.
    #[must_use]
    pub fn resolve(&self, base: &Face) -> Face {
        Face {
            fg: self.fg.or(&base.fg),
            bg: self.bg.or(&base.bg),
            attributes: self.attributes.clone(),
        }
    }
}

impl From<String> for Color {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// The smallest styled unit of text
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Atom {
    /// Face used to draw the text
    pub face: Face,
    /// The text itself
    pub contents: String,
}

impl Atom {
    /// Create an atom
    pub fn new(contents: impl Into<String>, face: Face) -> Self {
        Self {
            face,
            contents: contents.into(),
        }
    }

    /// Width in grid cells
    #[must_use]
    pub fn width(&self) -> usize {
        self.contents.width()
    }
}

/// An ordered run of atoms, drawn left to right
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Line(pub Vec<Atom>);

impl Line {
    /// An empty line
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// A line made of a single atom
    pub fn plain(contents: impl Into<String>, face: Face) -> Self {
        Self(vec![Atom::new(contents, face)])
    }

    /// Width in grid cells
    #[must_use]
    pub fn width(&self) -> usize {
        self.0.iter().map(Atom::width).sum()
    }

    /// The atoms of this line
    #[must_use]
    pub fn atoms(&self) -> &[Atom] {
        &self.0
    }

    /// Whether the line has no atoms
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Concatenated text of every atom
    #[must_use]
    pub fn text(&self) -> String {
        self.0.iter().map(|a| a.contents.as_str()).collect()
    }

    /// A copy of this line with every `default` color resolved against `base`
    #[must_use]
    pub fn resolved(&self, base: &Face) -> Line {
        Line(
            self.0
                .iter()
                .map(|atom| Atom {
                    face: atom.face.resolve(base),
                    contents: atom.contents.clone(),
                })
                .collect(),
        )
    }
}

impl From<Vec<Atom>> for Line {
    fn from(atoms: Vec<Atom>) -> Self {
        Self(atoms)
    }
}

/// Anchor point in grid cells
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// Row (the protocol calls it `line`)
    #[serde(alias = "row")]
    pub line: usize,
    /// Column
    pub column: usize,
}

impl Coord {
    /// Create a coordinate
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Placement hint for the info box
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InfoStyle {
    /// Attached to the prompt
    #[default]
    Prompt,
    /// Next to the anchor
    Inline,
    /// Above the anchor
    InlineAbove,
    /// Below the anchor
    #[serde(alias = "inlineBellow")]
    InlineBelow,
    /// Documentation for the selected menu item
    MenuDoc,
    /// Centered over the buffer
    Modal,
}

/// Placement hint for the menu
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MenuStyle {
    /// Prompt completion, docked above the status bar
    #[default]
    Prompt,
    /// Insert completion, next to the cursor
    Inline,
}
