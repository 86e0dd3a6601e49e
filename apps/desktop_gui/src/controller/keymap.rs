//! Keyboard input for the calculator window.

use client_core::KeyPress;
use egui::{Event, Key};

/// Keypad keys typed this frame. Characters come from text events so layout
/// differences (`+` on shift, numpad, `,` decimal) are handled by the OS;
/// only Enter, Backspace and Escape are read as physical keys.
pub fn keys_from_events(events: &[Event]) -> Vec<KeyPress> {
    events
        .iter()
        .flat_map(|event| -> Vec<KeyPress> {
            match event {
                Event::Text(text) => text.chars().filter_map(KeyPress::from_char).collect(),
                Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } if !modifiers.command && !modifiers.alt => named_key(*key).into_iter().collect(),
                _ => Vec::new(),
            }
        })
        .collect()
}

fn named_key(key: Key) -> Option<KeyPress> {
    match key {
        Key::Enter => Some(KeyPress::Equals),
        Key::Backspace => Some(KeyPress::Delete),
        Key::Escape => Some(KeyPress::Clear),
        _ => None,
    }
}
