#![forbid(unsafe_code)]

//! Facade over the shoji toolkit crates.
//!
//! Most applications only need [`console_main`] plus the [`prelude`]:
//!
//! ```no_run
//! use shoji::prelude::*;
//!
//! fn main() -> Result<(), Error> {
//!     shoji::console_main(|screen| {
//!         let mut menu = MainMenu::new(screen, vec![
//!             MenuItem::new("Do the thing", || Ok(())),
//!         ]);
//!         menu.run_modally()
//!     })
//! }
//! ```

use tracing::info;

pub use shoji_core as core;
pub use shoji_render as render;
pub use shoji_widgets as widgets;

use shoji_core::error::Error;
use shoji_core::session::{SessionOptions, TerminalSession};
use shoji_render::backend::CrosstermBackend;
use shoji_render::screen::Screen;

/// The common imports for applications built on the toolkit.
pub mod prelude {
    pub use shoji_core::error::Error;
    pub use shoji_core::geometry::{Extent, PanelExtents, Rect};
    pub use shoji_core::keys::Key;
    pub use shoji_core::style::ColorPair;
    #[cfg(unix)]
    pub use shoji_core::task::{TaskError, TaskOutcome};
    pub use shoji_render::screen::Screen;
    pub use shoji_widgets::{
        Column, DialogBox, InputPanel, MainMenu, MenuItem, MessagePanel, Panel, Row, RunResult,
        ScrollingPanel,
    };
    #[cfg(unix)]
    pub use shoji_widgets::{run_cancellable, run_cancellable_dialog};
}

/// Run `f` inside a fully initialized terminal.
///
/// Enters raw mode on the alternate screen with the cursor hidden,
/// builds a [`Screen`] over the native backend, and hands it to `f`.
/// Terminal state is restored on every exit path, including panics
/// unwinding out of `f`.
pub fn console_main<T>(f: impl FnOnce(&Screen) -> Result<T, Error>) -> Result<T, Error> {
    let _session = TerminalSession::new(SessionOptions::default())?;
    let screen = Screen::new(Box::new(CrosstermBackend::new()))?;
    info!("console session started");
    f(&screen)
}
