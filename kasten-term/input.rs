//! Maps crossterm events to kasten events.

use crossterm::event::{
  Event as CrosstermEvent,
  KeyCode,
  KeyEvent as CrosstermKeyEvent,
  KeyEventKind,
  KeyModifiers,
};
use kasten_lib::input::{
  Event,
  Key,
  KeyEvent,
  Modifiers,
};

/// `None` for events the app has no use for (mouse, focus, key release).
pub fn to_event(event: CrosstermEvent) -> Option<Event> {
  match event {
    CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => to_key_event(key).map(Event::Key),
    CrosstermEvent::Resize(cols, rows) => {
      Some(Event::Resize {
        rows: rows as usize,
        cols: cols as usize,
      })
    },
    _ => None,
  }
}

fn to_key_event(event: CrosstermKeyEvent) -> Option<KeyEvent> {
  Some(KeyEvent {
    key:       to_key(event.code)?,
    modifiers: to_modifiers(event.modifiers),
  })
}

fn to_key(code: KeyCode) -> Option<Key> {
  let key = match code {
    KeyCode::Char(c) => Key::Char(c),
    KeyCode::Enter => Key::Enter,
    KeyCode::Tab | KeyCode::BackTab => Key::Tab,
    KeyCode::Esc => Key::Escape,
    KeyCode::Backspace => Key::Backspace,
    KeyCode::Delete => Key::Delete,
    KeyCode::Home => Key::Home,
    KeyCode::End => Key::End,
    KeyCode::PageUp => Key::PageUp,
    KeyCode::PageDown => Key::PageDown,
    KeyCode::Left => Key::Left,
    KeyCode::Right => Key::Right,
    KeyCode::Up => Key::Up,
    KeyCode::Down => Key::Down,
    KeyCode::Null | KeyCode::Modifier(_) => return None,
    _ => Key::Other,
  };
  Some(key)
}

fn to_modifiers(modifiers: KeyModifiers) -> Modifiers {
  let mut out = Modifiers::empty();
  if modifiers.contains(KeyModifiers::CONTROL) {
    out.insert(Modifiers::CTRL);
  }
  if modifiers.contains(KeyModifiers::ALT) {
    out.insert(Modifiers::ALT);
  }
  if modifiers.contains(KeyModifiers::SHIFT) {
    out.insert(Modifiers::SHIFT);
  }
  out
}
