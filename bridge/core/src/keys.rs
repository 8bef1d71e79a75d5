//! Key Encoder
//!
//! Maps a key press (key identifier + modifiers) to Kakoune key notation.
//!
//! Key identifiers follow the DOM `KeyboardEvent.key` naming (`ArrowDown`,
//! `Backspace`, `a`, `A`, ...). Hosts translate their native events into that
//! vocabulary before calling [`encode`].
//!
//! | Input                         | Notation   |
//! |-------------------------------|------------|
//! | `Enter`                       | `<ret>`    |
//! | `a`                           | `a`        |
//! | `a` + Control                 | `<c-a>`    |
//! | `x` + Control + Alt           | `<c-a-x>`  |
//! | `Shift`                       | (nothing)  |

use std::ops::BitOr;

/// Named keys and their editor tokens
pub const SPECIAL_KEYS: &[(&str, &str)] = &[
    ("ArrowDown", "down"),
    ("ArrowLeft", "left"),
    ("ArrowRight", "right"),
    ("ArrowUp", "up"),
    ("Backspace", "backspace"),
    ("Delete", "del"),
    ("Enter", "ret"),
    ("Escape", "esc"),
    ("Tab", "tab"),
    ("PageDown", "pagedown"),
    ("PageUp", "pageup"),
    ("Home", "home"),
    ("End", "end"),
    ("+", "plus"),
    ("-", "minus"),
    ("<", "lt"),
    (">", "gt"),
    (" ", "space"),
];

/// Modifier set of a key press
///
/// Only Control and Alt reach the editor; Shift is already reflected in the
/// character produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Control held
    pub control: bool,
    /// Alt held
    pub alt: bool,
}

impl Modifiers {
    /// No modifier
    pub const NONE: Self = Self {
        control: false,
        alt: false,
    };

    /// Control only
    pub const CONTROL: Self = Self {
        control: true,
        alt: false,
    };

    /// Alt only
    pub const ALT: Self = Self {
        control: false,
        alt: true,
    };

    /// Whether no modifier is held
    #[must_use]
    pub fn is_empty(self) -> bool {
        !self.control && !self.alt
    }

    /// Notation prefix, Control first
    fn prefix(self) -> &'static str {
        match (self.control, self.alt) {
            (true, true) => "c-a-",
            (true, false) => "c-",
            (false, true) => "a-",
            (false, false) => "",
        }
    }
}

impl BitOr for Modifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            control: self.control || rhs.control,
            alt: self.alt || rhs.alt,
        }
    }
}

/// Look up the editor token of a named key
#[must_use]
pub fn special_token(key_id: &str) -> Option<&'static str> {
    SPECIAL_KEYS
        .iter()
        .find(|(name, _)| *name == key_id)
        .map(|(_, token)| *token)
}

/// Encode a key press into editor notation
///
/// Returns `None` for keys that produce nothing on their own (a lone
/// modifier, function keys outside the table, control characters).
#[must_use]
pub fn encode(key_id: &str, modifiers: Modifiers) -> Option<String> {
    let (key, bracketed) = if let Some(token) = special_token(key_id) {
        (token, true)
    } else if is_single_printable(key_id) {
        (key_id, false)
    } else {
        return None;
    };

    if !modifiers.is_empty() {
        return Some(format!("<{}{}>", modifiers.prefix(), key));
    }

    if bracketed {
        Some(format!("<{key}>"))
    } else {
        Some(key.to_string())
    }
}

fn is_single_printable(key_id: &str) -> bool {
    let mut chars = key_id.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if !c.is_control())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_special_key_table() {
        let expected = [
            ("ArrowDown", "<down>"),
            ("ArrowLeft", "<left>"),
            ("ArrowRight", "<right>"),
            ("ArrowUp", "<up>"),
            ("Backspace", "<backspace>"),
            ("Delete", "<del>"),
            ("Enter", "<ret>"),
            ("Escape", "<esc>"),
            ("Tab", "<tab>"),
            ("PageDown", "<pagedown>"),
            ("PageUp", "<pageup>"),
            ("Home", "<home>"),
            ("End", "<end>"),
            ("+", "<plus>"),
            ("-", "<minus>"),
            ("<", "<lt>"),
            (">", "<gt>"),
            (" ", "<space>"),
        ];

        assert_eq!(expected.len(), SPECIAL_KEYS.len());
        for (key, notation) in expected {
            assert_eq!(encode(key, Modifiers::NONE).as_deref(), Some(notation), "{key}");
        }
    }

    #[test]
    fn test_printable_characters_pass_through() {
        for key in ["a", "Z", "0", ":", "é", "日"] {
            assert_eq!(encode(key, Modifiers::NONE).as_deref(), Some(key));
        }
    }

    #[test]
    fn test_modifiers_force_brackets() {
        assert_eq!(encode("a", Modifiers::CONTROL).as_deref(), Some("<c-a>"));
        assert_eq!(encode("a", Modifiers::ALT).as_deref(), Some("<a-a>"));
        assert_eq!(
            encode("a", Modifiers::CONTROL | Modifiers::ALT).as_deref(),
            Some("<c-a-a>")
        );
        assert_eq!(
            encode("x", Modifiers::ALT | Modifiers::CONTROL).as_deref(),
            Some("<c-a-x>")
        );
    }

    #[test]
    fn test_modifiers_with_special_keys() {
        assert_eq!(encode("ArrowUp", Modifiers::CONTROL).as_deref(), Some("<c-up>"));
        assert_eq!(encode("Enter", Modifiers::ALT).as_deref(), Some("<a-ret>"));
        assert_eq!(encode("-", Modifiers::ALT).as_deref(), Some("<a-minus>"));
    }

    #[test]
    fn test_unmapped_keys_are_no_op() {
        assert_eq!(encode("Shift", Modifiers::NONE), None);
        assert_eq!(encode("Control", Modifiers::CONTROL), None);
        assert_eq!(encode("F13", Modifiers::NONE), None);
        assert_eq!(encode("", Modifiers::NONE), None);
        assert_eq!(encode("\u{7}", Modifiers::NONE), None);
    }
}
