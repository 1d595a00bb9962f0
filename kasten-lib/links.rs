//! Link annotations found in wrapped viewer text.

use std::sync::OnceLock;

use regex::Regex;

use crate::{
  geometry::Position,
  note::NoteId,
  wrap,
};

const NOTE_REF: &str = r"#\d+[a-z]+";
const URL_REF: &str = r"https?://\S+";
const FILE_REF: &str = r"~/[-_a-zA-Z0-9/]+(\.|\*)[a-zA-Z]*";

static PATTERNS: OnceLock<[(LinkKind, Regex); 3]> = OnceLock::new();

fn patterns() -> &'static [(LinkKind, Regex); 3] {
  PATTERNS.get_or_init(|| {
    [
      (LinkKind::Note, Regex::new(NOTE_REF).unwrap()),
      (LinkKind::Url, Regex::new(URL_REF).unwrap()),
      (LinkKind::File, Regex::new(FILE_REF).unwrap()),
    ]
  })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
  Note,
  Url,
  File,
}

/// A link and where it starts in the wrapped text (physical row, column).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
  pub text: String,
  pub row:  usize,
  pub col:  usize,
  pub kind: LinkKind,
}

impl Link {
  pub fn anchor(&self) -> Position {
    Position::new(self.row, self.col)
  }

  pub fn len(&self) -> usize {
    self.text.chars().count()
  }

  pub fn is_empty(&self) -> bool {
    self.text.is_empty()
  }

  pub fn note_id(&self) -> Option<NoteId> {
    (self.kind == LinkKind::Note).then(|| NoteId::from_link(&self.text))
  }

  /// Pieces of the link per physical row it covers, for painting.
  pub fn segments(&self, width: usize) -> Vec<(Position, String)> {
    let width = width.max(1);
    let mut segments = Vec::new();
    let mut chars = self.text.chars().peekable();
    let mut pos = self.anchor();
    while chars.peek().is_some() {
      let piece: String = chars.by_ref().take(width - pos.col).collect();
      segments.push((pos, piece));
      pos = Position::new(pos.row + 1, 0);
    }
    segments
  }
}

/// Every link in `lines` wrapped at `width`, in document order.
pub fn extract<S: AsRef<str>>(lines: &[S], width: usize) -> Vec<Link> {
  let mut links = Vec::new();
  let mut row = 0;
  for line in lines {
    let line = line.as_ref();
    for (kind, regex) in patterns() {
      for found in regex.find_iter(line) {
        let start = line[..found.start()].chars().count();
        let anchor = wrap::logical_to_physical(start, width);
        links.push(Link {
          text: found.as_str().to_string(),
          row:  row + anchor.row,
          col:  anchor.col,
          kind: *kind,
        });
      }
    }
    row += wrap::line_rows(line, width);
  }
  links.sort_by_key(|link| (link.row, link.col));
  links
}
