//! Core of the kasten note tool.
//!
//! Everything here is deterministic apart from the [`store`] and [`external`]
//! collaborators. Terminal IO lives in `kasten-term`, which copies a
//! [`surface::Surface`] to the screen after every event.

pub mod app;
pub mod command;
pub mod compositor;
pub mod config;
pub mod density;
pub mod error;
pub mod external;
pub mod geometry;
pub mod input;
pub mod links;
pub mod note;
pub mod pane;
pub mod panes;
pub mod session;
pub mod store;
pub mod surface;
pub mod wrap;

pub use error::{
  Error,
  Result,
};
