//! Terminal user interface for ftpdu.
//!
//! Browses a finished [`RemoteTree`](ftpdu_core::RemoteTree) one folder at a
//! time, built with ratatui.
//!
//! # Usage
//!
//! ```rust,no_run
//! use ftpdu_core::RemoteTree;
//!
//! let tree = RemoteTree::new("root");
//! ftpdu_tui::run(tree).unwrap();
//! ```
//!
//! # Keyboard Navigation
//!
//! - `j`/`k` - Move down/up
//! - `Enter`/`l` - Open folder
//! - `Backspace`/`h` - Back to parent
//! - `s` - Cycle sort order
//! - `t` - Toggle theme
//! - `?` - Help
//! - `q` - Quit

pub mod app;
mod event;
mod theme;
mod ui;

pub use app::{App, AppResult, SortMode};
pub use theme::{Theme, ThemeVariant};

/// Run the TUI on a scanned tree until the user quits.
pub fn run(tree: ftpdu_core::RemoteTree) -> AppResult<()> {
    let terminal = ratatui::init();
    let result = App::new(tree).run(terminal);
    ratatui::restore();
    result
}
