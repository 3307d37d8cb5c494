//! Main TUI application state and logic

use crate::{compile_and_run, RunResult};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Output,
    Diagnostics,
}

impl FocusedPane {
    /// Move focus to the next pane (source -> output -> diagnostics)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Diagnostics,
            FocusedPane::Diagnostics => FocusedPane::Source,
        }
    }

    /// Move focus to the previous pane
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Diagnostics,
            FocusedPane::Output => FocusedPane::Source,
            FocusedPane::Diagnostics => FocusedPane::Output,
        }
    }
}

/// The main application state
pub struct App {
    /// File the source was read from; `r` reloads it before rerunning
    pub path: Option<PathBuf>,

    /// The program being shown
    pub source_code: String,

    /// Outcome of the latest run
    pub result: RunResult,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub source_scroll: usize,
    pub output_scroll: usize,
    pub diagnostics_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Number of runs so far, including the first
    pub runs: usize,
}

impl App {
    /// Run `source_code` once and build the app around the result
    pub fn new(source_code: String, path: Option<PathBuf>) -> Self {
        let result = compile_and_run(&source_code);
        let status_message = summary(&result);
        App {
            path,
            source_code,
            result,
            focused_pane: FocusedPane::Source,
            source_scroll: 0,
            output_scroll: 0,
            diagnostics_scroll: 0,
            should_quit: false,
            status_message,
            runs: 1,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        // Source on the left, output over diagnostics on the right
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[0]);

        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(columns[1]);

        super::panes::render_source_pane(
            frame,
            columns[0],
            &self.source_code,
            &self.marked_error_lines(),
            &self.result.diagnostics.warning_lines(),
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        super::panes::render_terminal_pane(
            frame,
            right_rows[0],
            &self.result.output_lines,
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        super::panes::render_diagnostics_pane(
            frame,
            right_rows[1],
            &self.result.diagnostics,
            self.focused_pane == FocusedPane::Diagnostics,
            &mut self.diagnostics_scroll,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            self.result.success,
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Up => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_sub(1);
            }
            KeyCode::Down => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_add(1);
            }
            KeyCode::PageUp => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_sub(10);
            }
            KeyCode::PageDown => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_add(10);
            }
            KeyCode::Home => *self.focused_scroll() = 0,
            // Clamped by the pane on the next draw
            KeyCode::End => *self.focused_scroll() = usize::MAX,
            KeyCode::Char('r') | KeyCode::Char('R') => self.rerun(),
            _ => {}
        }
    }

    /// Validation error lines plus the line a runtime error stopped at
    fn marked_error_lines(&self) -> Vec<usize> {
        let mut lines = self.result.diagnostics.error_lines();
        if let Some(line) = self.result.fault_line {
            if !lines.contains(&line) {
                lines.push(line);
            }
        }
        lines
    }

    fn focused_scroll(&mut self) -> &mut usize {
        match self.focused_pane {
            FocusedPane::Source => &mut self.source_scroll,
            FocusedPane::Output => &mut self.output_scroll,
            FocusedPane::Diagnostics => &mut self.diagnostics_scroll,
        }
    }

    /// Reload the source file if there is one, then run it again
    pub fn rerun(&mut self) {
        if let Some(path) = &self.path {
            match fs::read_to_string(path) {
                Ok(source) => self.source_code = source,
                Err(err) => {
                    warn!(path = %path.display(), %err, "reload failed");
                    self.status_message = format!("Cannot reload {}: {}", path.display(), err);
                    return;
                }
            }
        }

        self.result = compile_and_run(&self.source_code);
        self.runs += 1;
        self.output_scroll = 0;
        self.diagnostics_scroll = 0;
        self.status_message = format!("Run #{}: {}", self.runs, summary(&self.result));
        debug!(runs = self.runs, success = self.result.success, "rerun finished");
    }
}

/// First line of the run message
fn summary(result: &RunResult) -> String {
    result.message.lines().next().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    const PROGRAM: &str =
        "public class Main {\n  public static void main(String[] args) {\n    System.out.println(\"hi\");\n  }\n}";

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_new_runs_program() {
        let app = App::new(PROGRAM.to_string(), None);
        assert!(app.result.success);
        assert_eq!(app.result.output, "hi\n");
        assert_eq!(app.status_message, "Compilation successful");
    }

    #[test]
    fn test_focus_cycles() {
        let mut app = App::new(PROGRAM.to_string(), None);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Output);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Source);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focused_pane, FocusedPane::Diagnostics);
    }

    #[test]
    fn test_scroll_targets_focused_pane() {
        let mut app = App::new(PROGRAM.to_string(), None);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.source_scroll, 1);
        assert_eq!(app.output_scroll, 0);
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.source_scroll, 0);
    }

    #[test]
    fn test_rerun_without_file() {
        let mut app = App::new(PROGRAM.to_string(), None);
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.runs, 2);
        assert_eq!(app.result.output, "hi\n");
        assert_eq!(app.status_message, "Run #2: Compilation successful");
    }

    #[test]
    fn test_runtime_fault_line_is_marked() {
        let source = "public class Main {\n  static int down(int n) {\n    return down(n - 1);\n  }\n  public static void main(String[] args) {\n    down(2);\n  }\n}";
        let app = App::new(source.to_string(), None);
        assert!(!app.result.success);
        assert_eq!(app.marked_error_lines(), vec![3]);

        let clean = App::new(PROGRAM.to_string(), None);
        assert!(clean.marked_error_lines().is_empty());
    }

    #[test]
    fn test_quit() {
        let mut app = App::new(PROGRAM.to_string(), None);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
