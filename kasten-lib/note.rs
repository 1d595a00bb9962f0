//! Note identifiers and the bits of note text the tool understands.

use std::fmt;

use chrono::NaiveDate;
use serde::{
  Deserialize,
  Serialize,
};

/// `YYMMDD` followed by a lowercase letter suffix, e.g. `220113e`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }

  /// Id named by a `#ID` link.
  pub fn from_link(link: &str) -> Self {
    Self::new(link.trim_start_matches('#'))
  }

  /// Accepts names made of digits followed by lowercase letters.
  pub fn parse(name: &str) -> Option<Self> {
    let digits = name.bytes().take_while(u8::is_ascii_digit).count();
    let letters = &name[digits..];
    let valid = digits > 0 && !letters.is_empty() && letters.bytes().all(|b| b.is_ascii_lowercase());
    valid.then(|| Self::new(name))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  fn date_prefix(&self) -> &str {
    let digits = self.0.bytes().take_while(u8::is_ascii_digit).count();
    &self.0[..digits]
  }

  fn letters(&self) -> &str {
    &self.0[self.date_prefix().len()..]
  }
}

impl fmt::Display for NoteId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for NoteId {
  fn from(value: &str) -> Self {
    Self::new(value)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSummary {
  pub id:    NoteId,
  pub title: String,
}

/// `a -> b -> ... -> z -> aa -> ab -> ...`
pub fn increment_letters(letters: &str) -> String {
  let mut digits: Vec<u8> = letters.bytes().map(|b| b - b'a').collect();
  let mut carried = true;
  for digit in digits.iter_mut().rev() {
    if *digit < 25 {
      *digit += 1;
      carried = false;
      break;
    }
    *digit = 0;
  }
  if carried {
    digits.insert(0, 0);
  }
  digits.into_iter().map(|d| (d + b'a') as char).collect()
}

/// Id for a note created on `date`, following the latest id of that day.
pub fn next_id<'a>(date: NaiveDate, existing: impl IntoIterator<Item = &'a NoteId>) -> NoteId {
  let prefix = date.format("%y%m%d").to_string();
  // Longer suffixes come later: `z` < `aa`.
  let latest = existing
    .into_iter()
    .filter(|id| id.date_prefix() == prefix && NoteId::parse(id.as_str()).is_some())
    .map(NoteId::letters)
    .max_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
  let letters = match latest {
    Some(letters) => increment_letters(letters),
    None => "a".to_string(),
  };
  NoteId::new(prefix + &letters)
}

/// Title of a note: the `TITLE:` key of a front-matter block or a top-level
/// `TITLE:` line, else the first non-empty line.
pub fn parse_title(text: &str) -> Option<String> {
  let mut lines = text.lines().peekable();
  let mut in_front_matter = false;
  if lines.peek().map(|line| line.trim_end()) == Some("---") {
    lines.next();
    in_front_matter = true;
  }

  let mut first_non_empty = None;
  for line in lines {
    if in_front_matter && line.trim_end() == "---" {
      in_front_matter = false;
      continue;
    }
    if let Some(title) = title_value(line) {
      return Some(title);
    }
    if !in_front_matter && first_non_empty.is_none() && !line.trim().is_empty() {
      first_non_empty = Some(line.trim().to_string());
    }
  }
  first_non_empty
}

fn title_value(line: &str) -> Option<String> {
  let value = line.strip_prefix("TITLE:")?.trim();
  let value = value
    .strip_prefix('"')
    .and_then(|v| v.strip_suffix('"'))
    .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
    .unwrap_or(value);
  Some(value.to_string())
}

/// Whether `text` links to `id` with a `#ID` reference.
pub fn references(text: &str, id: &NoteId) -> bool {
  let needle = format!("#{id}");
  text.match_indices(&needle).any(|(start, _)| {
    !text[start + needle.len()..]
      .chars()
      .next()
      .is_some_and(|c| c.is_ascii_lowercase())
  })
}

/// Body of a freshly created note.
pub const NOTE_TEMPLATE: &str = "TITLE: ";

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn letters_increment_with_carry() {
    assert_eq!(increment_letters("a"), "b");
    assert_eq!(increment_letters("y"), "z");
    assert_eq!(increment_letters("z"), "aa");
    assert_eq!(increment_letters("az"), "ba");
    assert_eq!(increment_letters("zz"), "aaa");
  }

  #[test]
  fn next_id_follows_latest_of_the_day() {
    let date = NaiveDate::from_ymd_opt(2022, 1, 13).unwrap();
    let ids: Vec<NoteId> = ["220112c", "220113a", "220113z", "220113b"]
      .into_iter()
      .map(NoteId::from)
      .collect();
    assert_eq!(next_id(date, &ids), NoteId::from("220113aa"));
    assert_eq!(next_id(date, &ids[..1]), NoteId::from("220113a"));
    assert_eq!(next_id(date, std::iter::empty()), NoteId::from("220113a"));
  }

  #[test]
  fn parses_ids() {
    assert_eq!(NoteId::parse("220113e"), Some(NoteId::from("220113e")));
    assert_eq!(NoteId::parse("220113"), None);
    assert_eq!(NoteId::parse("notes.txt"), None);
    assert_eq!(NoteId::parse("220113E"), None);
    assert_eq!(NoteId::from_link("#220113e"), NoteId::from("220113e"));
  }

  #[test]
  fn title_from_front_matter() {
    let text = "---\nTAGS: x\nTITLE: \"Hello\"\n---\nbody";
    assert_eq!(parse_title(text).as_deref(), Some("Hello"));
  }

  #[test]
  fn title_from_top_level_key() {
    assert_eq!(
      parse_title("TITLE: Plain title\nbody").as_deref(),
      Some("Plain title")
    );
  }

  #[test]
  fn title_falls_back_to_first_line() {
    assert_eq!(parse_title("\n\n  first  \nsecond").as_deref(), Some("first"));
    assert_eq!(parse_title(""), None);
  }

  #[test]
  fn references_need_a_boundary() {
    let id = NoteId::from("220113e");
    assert!(references("see #220113e.", &id));
    assert!(references("#220113e", &id));
    assert!(!references("see #220113ea", &id));
    assert!(!references("see 220113e", &id));
  }
}
