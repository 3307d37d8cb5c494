//! Console output pane rendering
//!
//! Each output line carries the source line of the statement that printed it,
//! shown dimmed in a left gutter.

use super::{border_style, clamp_scroll};
use crate::console::OutputLine;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the captured output of the last run
pub fn render_terminal_pane(
    frame: &mut Frame,
    area: Rect,
    output: &[OutputLine],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(" Console Output ")
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    if output.is_empty() {
        let paragraph = Paragraph::new("(no output)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    clamp_scroll(scroll_offset, output.len(), visible_height);

    let items: Vec<ListItem> = output
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|out| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("L{:<4}", out.line),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(out.text.as_str(), Style::default().fg(DEFAULT_THEME.fg)),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
