//! Theme and Colors
//!
//! Converts editor color tokens and attributes into ratatui styles.
//!
//! Supported color forms:
//!
//! | Token                      | Terminal color        |
//! |----------------------------|-----------------------|
//! | `default`                  | terminal default      |
//! | `black` .. `white`         | ANSI 0-7              |
//! | `bright-black` .. `bright-white` | ANSI 8-15       |
//! | `rgb:RRGGBB`, `rgba:RRGGBBAA` | true color         |
//! | `#RRGGBB`, `#RGB`          | true color            |

use ratatui::style::{Color, Modifier, Style};

use bridge_core::{Attribute, TextStyle};

/// Color token that cannot be shown in a terminal
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThemeError {
    /// Not a known color name or notation
    #[error("Unknown color: {0}")]
    UnknownColor(String),

    /// Hex digits did not parse
    #[error("Invalid hex color: {0}")]
    InvalidHex(String),
}

// ============================================================================
// Colors
// ============================================================================

/// Parse an editor color token
///
/// # Errors
///
/// Returns `ThemeError` for names the terminal has no equivalent for.
pub fn parse_color(token: &str) -> Result<Color, ThemeError> {
    let color = match token {
        "default" => Color::Reset,
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::Gray,
        "bright-black" => Color::DarkGray,
        "bright-red" => Color::LightRed,
        "bright-green" => Color::LightGreen,
        "bright-yellow" => Color::LightYellow,
        "bright-blue" => Color::LightBlue,
        "bright-magenta" => Color::LightMagenta,
        "bright-cyan" => Color::LightCyan,
        "bright-white" => Color::White,
        _ => {
            if let Some(hex) = token.strip_prefix("rgb:") {
                return parse_hex(hex, token);
            }
            if let Some(hex) = token.strip_prefix("rgba:") {
                // Terminals have no alpha channel
                return parse_hex(hex.get(..6).unwrap_or(hex), token);
            }
            if let Some(hex) = token.strip_prefix('#') {
                return parse_hex(hex, token);
            }
            return Err(ThemeError::UnknownColor(token.to_string()));
        }
    };
    Ok(color)
}

/// `RRGGBB` or `RGB`
fn parse_hex(hex: &str, token: &str) -> Result<Color, ThemeError> {
    let invalid = || ThemeError::InvalidHex(token.to_string());
    if !hex.is_ascii() {
        return Err(invalid());
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());

    match hex.len() {
        6 => Ok(Color::Rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        3 => {
            let short = |s: &str| channel(s).map(|v| v * 17);
            Ok(Color::Rgb(
                short(&hex[0..1])?,
                short(&hex[1..2])?,
                short(&hex[2..3])?,
            ))
        }
        _ => Err(invalid()),
    }
}

/// Terminal color for a token, falling back to the terminal default
pub fn to_color(color: &bridge_core::Color) -> Color {
    parse_color(color.as_str()).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Falling back to default color");
        Color::Reset
    })
}

// ============================================================================
// Attributes
// ============================================================================

/// Terminal modifier for an attribute (empty for the `final_*` markers)
pub fn to_modifier(attr: &Attribute) -> Modifier {
    match attr {
        Attribute::Underline => Modifier::UNDERLINED,
        Attribute::Reverse => Modifier::REVERSED,
        Attribute::Blink => Modifier::SLOW_BLINK,
        Attribute::Bold => Modifier::BOLD,
        Attribute::Dim => Modifier::DIM,
        Attribute::Italic => Modifier::ITALIC,
        Attribute::FinalFg | Attribute::FinalBg | Attribute::FinalAttr | Attribute::Other(_) => {
            Modifier::empty()
        }
    }
}

/// ratatui style of a resolved text run
pub fn to_style(style: &TextStyle) -> Style {
    let modifiers = style
        .attributes
        .iter()
        .fold(Modifier::empty(), |acc, attr| acc | to_modifier(attr));
    Style::default()
        .fg(to_color(&style.fg))
        .bg(to_color(&style.bg))
        .add_modifier(modifiers)
}
