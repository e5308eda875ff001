#![forbid(unsafe_code)]

//! Retained-mode terminal widgets.
//!
//! Everything here is built on the `shoji-render` surface stack: a
//! widget owns one surface, tracks a dirty flag, and repaints only when
//! its state changed. Modal loops (`run`) block until a stop key and
//! compose depth-first: a menu action opens a panel, which may open a
//! dialog, each returning to its caller when dismissed.
//!
//! The [`task`] module bridges blocking background operations into
//! those loops without busy-waiting, using the self-pipe primitive from
//! `shoji-core`.

pub mod dialog;
pub mod input;
pub mod menu;
pub mod message;
pub mod panel;
pub mod row;
pub mod scrolling;
#[cfg(unix)]
pub mod task;
pub mod tree;

pub use dialog::DialogBox;
pub use input::InputPanel;
pub use menu::{MainMenu, MenuAction, MenuItem};
pub use message::MessagePanel;
pub use panel::Panel;
pub use row::{Column, Row};
pub use scrolling::{RunResult, ScrollingPanel};
#[cfg(unix)]
pub use task::{run_cancellable, run_cancellable_dialog};
