//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: program text with Java keyword highlighting and diagnostic
//!   markers in the gutter
//! - [`terminal`]: captured console output of the last run
//! - [`diagnostics`]: errors and warnings from validation
//! - [`status`]: status bar with keybindings and the run outcome
//!
//! Each pane module exports a `render_*` function taking the frame, its area,
//! the data to show, focus, and a mutable scroll offset it clamps in place.

pub mod diagnostics;
pub mod source;
pub mod status;
pub mod terminal;

pub use diagnostics::render_diagnostics_pane;
pub use source::render_source_pane;
pub use status::render_status_bar;
pub use terminal::render_terminal_pane;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::style::{Modifier, Style};

/// Border style for a pane, highlighted when it has focus
pub(crate) fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    }
}

/// Clamp `offset` so a list of `total` rows fills `visible` rows
pub(crate) fn clamp_scroll(offset: &mut usize, total: usize, visible: usize) {
    if total > visible {
        *offset = (*offset).min(total - visible);
    } else {
        *offset = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_scroll() {
        let mut offset = usize::MAX;
        clamp_scroll(&mut offset, 30, 10);
        assert_eq!(offset, 20);

        let mut offset = 5;
        clamp_scroll(&mut offset, 3, 10);
        assert_eq!(offset, 0);
    }
}
