//! Terminal key events → editor key notation
//!
//! crossterm reports keys as [`KeyCode`]s; the core's encoder speaks DOM-style
//! key identifiers. This module bridges the two.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use bridge_core::{encode_key, Modifiers};

/// Key identifier for a key code, `None` for keys the editor has no name for
pub fn key_id(code: KeyCode) -> Option<String> {
    let id = match code {
        KeyCode::Down => "ArrowDown",
        KeyCode::Left => "ArrowLeft",
        KeyCode::Right => "ArrowRight",
        KeyCode::Up => "ArrowUp",
        KeyCode::Backspace => "Backspace",
        KeyCode::Delete => "Delete",
        KeyCode::Enter => "Enter",
        KeyCode::Esc => "Escape",
        KeyCode::Tab | KeyCode::BackTab => "Tab",
        KeyCode::PageDown => "PageDown",
        KeyCode::PageUp => "PageUp",
        KeyCode::Home => "Home",
        KeyCode::End => "End",
        KeyCode::Char(c) => return Some(c.to_string()),
        _ => return None,
    };
    Some(id.to_string())
}

/// Modifier set for crossterm modifiers (Shift is dropped)
pub fn modifiers(mods: KeyModifiers) -> Modifiers {
    let mut out = Modifiers::NONE;
    if mods.contains(KeyModifiers::CONTROL) {
        out = out | Modifiers::CONTROL;
    }
    if mods.contains(KeyModifiers::ALT) {
        out = out | Modifiers::ALT;
    }
    out
}

/// Key notation to send for a terminal key event
///
/// Release events and keys without notation yield `None`.
pub fn translate(event: &KeyEvent) -> Option<String> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    let id = key_id(event.code)?;
    encode_key(&id, modifiers(event.modifiers))
}
