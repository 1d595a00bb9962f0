//! Input event types handed to the app by the terminal client.

use bitflags::bitflags;

bitflags! {
  #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
  pub struct Modifiers: u8 {
    const CTRL  = 0b0000_0001;
    const ALT   = 0b0000_0010;
    const SHIFT = 0b0000_0100;
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
  Char(char),
  Enter,
  Escape,
  Backspace,
  Tab,
  Delete,
  Home,
  End,
  PageUp,
  PageDown,
  Left,
  Right,
  Up,
  Down,
  Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
  pub key:       Key,
  pub modifiers: Modifiers,
}

impl KeyEvent {
  pub const fn new(key: Key, modifiers: Modifiers) -> Self {
    Self { key, modifiers }
  }

  pub const fn plain(key: Key) -> Self {
    Self::new(key, Modifiers::empty())
  }

  pub const fn ctrl(key: Key) -> Self {
    Self::new(key, Modifiers::CTRL)
  }

  pub const fn ctrl_shift(key: Key) -> Self {
    Self::new(key, Modifiers::CTRL.union(Modifiers::SHIFT))
  }

  pub fn is_ctrl(&self) -> bool {
    self.modifiers.contains(Modifiers::CTRL)
  }

  /// `Ctrl` + the given letter, case-insensitive.
  pub fn is_ctrl_char(&self, c: char) -> bool {
    self.is_ctrl()
      && !self.modifiers.contains(Modifiers::ALT)
      && matches!(self.key, Key::Char(k) if k.eq_ignore_ascii_case(&c))
  }

  /// The character to insert for this key, if it is plain text.
  pub fn printable(&self) -> Option<char> {
    if self
      .modifiers
      .intersects(Modifiers::CTRL | Modifiers::ALT)
    {
      return None;
    }
    match self.key {
      Key::Char(c) if !c.is_control() => Some(c),
      _ => None,
    }
  }

  /// Human readable name, echoed in the status line.
  pub fn name(&self) -> String {
    let base = match self.key {
      Key::Char(' ') => "SPACE".to_string(),
      Key::Char(c) if self.modifiers.is_empty() || self.modifiers == Modifiers::SHIFT => {
        return c.to_string();
      },
      Key::Char(c) => c.to_string(),
      Key::Enter => "RETURN".to_string(),
      Key::Escape => "ESC".to_string(),
      Key::Backspace => "BACKSPACE".to_string(),
      Key::Tab => "TAB".to_string(),
      Key::Delete => "DELETE".to_string(),
      Key::Home => "HOME".to_string(),
      Key::End => "END".to_string(),
      Key::PageUp => "PAGE_UP".to_string(),
      Key::PageDown => "PAGE_DOWN".to_string(),
      Key::Left => "LEFT".to_string(),
      Key::Right => "RIGHT".to_string(),
      Key::Up => "UP".to_string(),
      Key::Down => "DOWN".to_string(),
      Key::Other => "?".to_string(),
    };
    let mut name = String::new();
    if self.modifiers.contains(Modifiers::CTRL) {
      name.push_str("CTRL_");
    }
    if self.modifiers.contains(Modifiers::ALT) {
      name.push_str("ALT_");
    }
    if self.modifiers.contains(Modifiers::SHIFT) {
      name.push_str("SHIFT_");
    }
    name.push_str(&base);
    name
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
  Key(KeyEvent),
  Resize { rows: usize, cols: usize },
}
