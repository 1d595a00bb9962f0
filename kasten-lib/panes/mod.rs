mod editor;
mod index;
mod status;
mod viewer;

pub use editor::EditorPane;
pub use index::{
  IndexPane,
  SortOrder,
};
pub use status::{
  StatusBar,
  StatusMode,
};
pub use viewer::ViewerPane;
