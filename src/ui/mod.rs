//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus and reruns
//! - **[`panes`]**: stateless render functions for each visible pane (source,
//!   console output, diagnostics, status bar)
//! - **[`theme`]**: color palette shared by all panes
//!
//! The entry point for consumers is [`App`]: construct it with the program
//! source and call [`App::run`] to start the event loop.
//!
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
