//! Diagnostics pane: validation errors first, then warnings

use super::{border_style, clamp_scroll};
use crate::ui::theme::DEFAULT_THEME;
use crate::validator::{Diagnostic, Diagnostics};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub fn render_diagnostics_pane(
    frame: &mut Frame,
    area: Rect,
    diagnostics: &Diagnostics,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let title = format!(
        " Diagnostics ({} error(s), {} warning(s)) ",
        diagnostics.errors.len(),
        diagnostics.warnings.len()
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    if diagnostics.errors.is_empty() && diagnostics.warnings.is_empty() {
        let paragraph = Paragraph::new("No problems found")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.success));
        frame.render_widget(paragraph, area);
        return;
    }

    let error_style = Style::default()
        .fg(DEFAULT_THEME.error)
        .add_modifier(Modifier::BOLD);
    let warning_style = Style::default().fg(DEFAULT_THEME.warning);

    let rows: Vec<ListItem> = diagnostics
        .errors
        .iter()
        .map(|d| diagnostic_row("error", d, error_style))
        .chain(
            diagnostics
                .warnings
                .iter()
                .map(|d| diagnostic_row("warning", d, warning_style)),
        )
        .collect();

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    clamp_scroll(scroll_offset, rows.len(), visible_height);
    let rows: Vec<ListItem> = rows
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    frame.render_widget(List::new(rows).block(block), area);
}

fn diagnostic_row<'a>(label: &'a str, diag: &'a Diagnostic, label_style: Style) -> ListItem<'a> {
    let location = match diag.line {
        Some(line) => format!("{:>4} ", line),
        None => "   - ".to_string(),
    };
    ListItem::new(Line::from(vec![
        Span::styled(location, Style::default().fg(DEFAULT_THEME.comment)),
        Span::styled(format!("{:<8}", label), label_style),
        Span::styled(diag.message.as_str(), Style::default().fg(DEFAULT_THEME.fg)),
    ]))
}
