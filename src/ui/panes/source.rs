//! Source code pane rendering with syntax highlighting
//!
//! Displays the program with line numbers, a light Java highlighter and a
//! gutter marker on every line that carries a diagnostic: `E` for errors,
//! `W` for warnings. Error lines also get a tinted background.
//!
//! # Rendering
//!
//! The highlighter is a single pass over the characters of one line. It knows
//! about `//` comments, string and char literals, numbers, keywords, primitive
//! type names, and identifiers followed by `(`. Block comments spanning lines
//! are not tracked.

use super::{border_style, clamp_scroll};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const TYPE_WORDS: &[&str] = &[
    "int", "long", "short", "byte", "double", "float", "boolean", "char", "void", "String",
];

const KEYWORDS: &[&str] = &[
    "public", "private", "protected", "static", "final", "abstract", "class", "interface",
    "extends", "implements", "import", "package", "new", "return", "if", "else", "while", "for",
    "do", "switch", "case", "default", "break", "continue", "try", "catch", "finally", "throw",
    "throws", "this",
];

/// Highlight one line of Java source
fn highlight_line(line: &str) -> Vec<Span<'_>> {
    let mut spans = Vec::new();
    let mut chars = line.char_indices().peekable();
    let mut word_start: Option<usize> = None;

    while let Some((i, c)) = chars.next() {
        if c.is_alphanumeric() || c == '_' {
            word_start.get_or_insert(i);
            continue;
        }
        push_word(&mut spans, line, word_start.take(), i, Some(c));

        if c == '/' && chars.peek().map(|&(_, n)| n) == Some('/') {
            spans.push(Span::styled(&line[i..], Style::default().fg(DEFAULT_THEME.comment)));
            return spans;
        }

        if c == '"' || c == '\'' {
            let mut end = line.len();
            let mut escaped = false;
            for (j, d) in chars.by_ref() {
                if escaped {
                    escaped = false;
                } else if d == '\\' {
                    escaped = true;
                } else if d == c {
                    end = j + d.len_utf8();
                    break;
                }
            }
            spans.push(Span::styled(&line[i..end], Style::default().fg(DEFAULT_THEME.string)));
            continue;
        }

        let style = match c {
            '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.primary),
            _ => Style::default().fg(DEFAULT_THEME.fg),
        };
        spans.push(Span::styled(&line[i..i + c.len_utf8()], style));
    }
    push_word(&mut spans, line, word_start, line.len(), None);
    spans
}

fn push_word<'a>(
    spans: &mut Vec<Span<'a>>,
    line: &'a str,
    start: Option<usize>,
    end: usize,
    next: Option<char>,
) {
    if let Some(start) = start {
        let word = &line[start..end];
        spans.push(Span::styled(word, word_style(word, next == Some('('))));
    }
}

fn word_style(word: &str, is_call: bool) -> Style {
    if TYPE_WORDS.contains(&word) {
        Style::default().fg(DEFAULT_THEME.type_name)
    } else if KEYWORDS.contains(&word) {
        Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD)
    } else if matches!(word, "true" | "false" | "null")
        || word.starts_with(|c: char| c.is_ascii_digit())
    {
        Style::default().fg(DEFAULT_THEME.number)
    } else if is_call {
        Style::default().fg(DEFAULT_THEME.function)
    } else {
        Style::default().fg(DEFAULT_THEME.fg)
    }
}

/// Render the source code pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    error_lines: &[usize],
    warning_lines: &[usize],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(" Source Code ")
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    let lines: Vec<&str> = source_code.lines().collect();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    clamp_scroll(scroll_offset, lines.len(), visible_height);

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let is_error = error_lines.contains(&line_num);
            let is_warning = !is_error && warning_lines.contains(&line_num);

            let (marker, marker_style) = if is_error {
                ("E", Style::default().fg(DEFAULT_THEME.error).add_modifier(Modifier::BOLD))
            } else if is_warning {
                ("W", Style::default().fg(DEFAULT_THEME.warning))
            } else {
                (" ", Style::default())
            };

            let mut spans = vec![
                Span::styled(marker, marker_style),
                Span::styled(
                    format!("{:4} ", line_num),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
            ];
            let mut content = highlight_line(line);
            if is_error {
                for span in &mut content {
                    span.style = span.style.patch(
                        Style::default()
                            .bg(DEFAULT_THEME.current_line_bg)
                            .fg(Color::White),
                    );
                }
            }
            spans.extend(content);
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(visible_lines).block(block), area);
}
