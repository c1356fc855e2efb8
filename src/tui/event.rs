use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, warn};

use crate::core::action::KeyInput;

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    Key(KeyInput),
    /// Bracketed paste
    Paste(String),
    Resize(u16, u16),
    /// Ctrl+C, honoured in every view
    ForceQuit,
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(Duration::ZERO)
}

/// Poll for an event, blocking up to `timeout`.
pub fn poll_event_timeout(timeout: Duration) -> Option<TuiEvent> {
    match event::poll(timeout) {
        Ok(true) => {}
        Ok(false) => return None,
        Err(e) => {
            warn!("Event poll failed: {}", e);
            return None;
        }
    }
    match event::read() {
        Ok(event) => translate(event),
        Err(e) => {
            warn!("Event read failed: {}", e);
            None
        }
    }
}

fn translate(event: Event) -> Option<TuiEvent> {
    match event {
        Event::Key(key_event) => translate_key(key_event),
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(width, height) => Some(TuiEvent::Resize(width, height)),
        _ => None,
    }
}

fn translate_key(key_event: KeyEvent) -> Option<TuiEvent> {
    // Terminals with event-type reporting also send releases
    if key_event.kind != KeyEventKind::Press {
        return None;
    }
    debug!(
        "Key event: {:?} with modifiers {:?}",
        key_event.code, key_event.modifiers
    );

    let key = match (key_event.modifiers, key_event.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Some(TuiEvent::ForceQuit),
        (m, KeyCode::Char(_)) if m.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            return None;
        }
        (_, KeyCode::Char(c)) => KeyInput::Char(c),
        (_, KeyCode::Enter) => KeyInput::Enter,
        (_, KeyCode::Esc) => KeyInput::Esc,
        (_, KeyCode::Up) => KeyInput::Up,
        (_, KeyCode::Down) => KeyInput::Down,
        (_, KeyCode::Left) => KeyInput::Left,
        (_, KeyCode::Right) => KeyInput::Right,
        (_, KeyCode::Home) => KeyInput::Home,
        (_, KeyCode::End) => KeyInput::End,
        (_, KeyCode::PageUp) => KeyInput::PageUp,
        (_, KeyCode::PageDown) => KeyInput::PageDown,
        (_, KeyCode::Backspace) => KeyInput::Backspace,
        (_, KeyCode::Delete) => KeyInput::Delete,
        _ => return None,
    };
    Some(TuiEvent::Key(key))
}
