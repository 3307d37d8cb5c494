// Captured console output for one run

/// Append-only buffer standing in for the subject program's standard output
#[derive(Debug, Clone, Default)]
pub struct Console {
    pub writes: Vec<ConsoleWrite>,
}

impl Console {
    pub fn new() -> Self {
        Console { writes: Vec::new() }
    }

    /// Print without newline
    pub fn print(&mut self, text: String, line: usize) {
        if let Some(last) = self.writes.last_mut() {
            if last.line == line && !last.text.ends_with('\n') {
                last.text.push_str(&text);
                return;
            }
        }
        self.writes.push(ConsoleWrite { text, line });
    }

    /// Print followed by a newline
    pub fn println(&mut self, text: String, line: usize) {
        self.print(text + "\n", line);
    }

    /// Everything written so far, verbatim
    pub fn output(&self) -> String {
        self.writes.iter().map(|w| w.text.as_str()).collect()
    }

    /// Output split into display lines, each tagged with the source line
    /// of the write that started it
    pub fn lines(&self) -> Vec<OutputLine> {
        let mut lines = Vec::new();
        let mut pending: Option<OutputLine> = None;
        for write in &self.writes {
            let mut rest = write.text.as_str();
            while let Some(pos) = rest.find('\n') {
                let current = pending.get_or_insert_with(|| OutputLine::empty(write.line));
                current.text.push_str(&rest[..pos]);
                lines.extend(pending.take());
                rest = &rest[pos + 1..];
            }
            if !rest.is_empty() {
                pending
                    .get_or_insert_with(|| OutputLine::empty(write.line))
                    .text
                    .push_str(rest);
            }
        }
        lines.extend(pending);
        lines
    }

    /// Number of completed or partial output lines
    pub fn line_count(&self) -> usize {
        self.lines().len()
    }
}

/// A chunk of output with the source line that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleWrite {
    pub text: String,
    pub line: usize,
}

/// One display line of output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    pub text: String,
    /// Source line of the statement that began this output line
    pub line: usize,
}

impl OutputLine {
    fn empty(line: usize) -> Self {
        OutputLine {
            text: String::new(),
            line,
        }
    }
}
