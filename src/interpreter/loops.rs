//! Loop and conditional simulation (`for`, `while`, `if`).
//!
//! Adds `impl Interpreter` methods for the block headers found while walking
//! a method body. None of these run the nested block: the header is
//! simulated, a placeholder trace line is written to the console in place of
//! the body, and the block is skipped.
//!
//! - `for (init; cond; step)`: `init` runs once, then `cond`/`step` repeat up
//!   to [`MAX_LOOP_ITERATIONS`] times, one trace line per iteration
//! - `while (cond)`: at most [`MAX_WHILE_PASSES`] trace lines
//! - `if (cond)`: one trace line reporting the result, also for the `if` of
//!   an `else if (cond)` header
//!
//! A plain `else`, `do`, `switch` and any other header skip their block
//! silently. The `while (...)` trailer of a skipped `do` block is consumed
//! with it.

use crate::interpreter::constants::{MAX_LOOP_ITERATIONS, MAX_WHILE_PASSES};
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::expressions::paren_group;
use crate::parser::scan::{ident_at, skip_ws, split_top_level, Segment, SegmentKind};
use tracing::{trace, warn};

impl Interpreter {
    /// Handles the block header at `segs[open]` and returns the index of the
    /// first segment after its block.
    pub(crate) fn execute_block_header(
        &mut self,
        segs: &[Segment],
        open: usize,
    ) -> Result<usize, RuntimeError> {
        let header = segs[open].text.as_str();
        let end = block_end(segs, open);

        match ident_at(header, 0).unwrap_or("") {
            "for" => self.simulate_for(header)?,
            "while" => self.simulate_while(header)?,
            "if" => self.simulate_if(header)?,
            "else" => match else_if(header) {
                Some(chained) => self.simulate_if(chained)?,
                None => trace!(line = segs[open].line, "else block skipped"),
            },
            "do" => {
                let trailer = segs
                    .get(end)
                    .filter(|s| s.kind == SegmentKind::Statement)
                    .and_then(|s| ident_at(&s.text, 0));
                if trailer == Some("while") {
                    return Ok(end + 1);
                }
            }
            _ => trace!(line = segs[open].line, header, "block skipped"),
        }
        Ok(end)
    }

    pub(crate) fn simulate_for(&mut self, header: &str) -> Result<(), RuntimeError> {
        let Some((inner, _)) = paren_group(header) else {
            return Ok(());
        };
        let parts = split_top_level(inner, b';');
        let [init, cond, step] = parts.as_slice() else {
            trace!(header, "enhanced for loop not simulated");
            return Ok(());
        };

        if !init.trim().is_empty() {
            self.execute_statement(init)?;
        }

        let line = self.current_line;
        let mut iterations = 0;
        while iterations < MAX_LOOP_ITERATIONS {
            if !self.evaluate_condition(cond)? {
                break;
            }
            iterations += 1;
            self.console.println(format!("Loop iteration {}", iterations), line);
            for piece in split_top_level(step, b',') {
                if !piece.trim().is_empty() {
                    self.execute_statement(piece)?;
                }
            }
        }
        if iterations == MAX_LOOP_ITERATIONS {
            warn!(line, limit = MAX_LOOP_ITERATIONS, "for loop stopped at the iteration cap");
        }
        Ok(())
    }

    pub(crate) fn simulate_while(&mut self, header: &str) -> Result<(), RuntimeError> {
        let Some((cond, _)) = paren_group(header) else {
            return Ok(());
        };
        let line = self.current_line;
        let mut passes = 0;
        while passes < MAX_WHILE_PASSES && self.evaluate_condition(cond)? {
            passes += 1;
            self.console
                .println(format!("While loop iteration {}", passes), line);
        }
        Ok(())
    }

    pub(crate) fn simulate_if(&mut self, header: &str) -> Result<(), RuntimeError> {
        let Some((cond, _)) = paren_group(header) else {
            return Ok(());
        };
        let result = self.evaluate_condition(cond)?;
        let line = self.current_line;
        self.console.println(
            format!("If condition ({}) evaluated to {}", cond.trim(), result),
            line,
        );
        Ok(())
    }
}

/// The `if (...)` part of an `else if (...)` header
pub(crate) fn else_if(header: &str) -> Option<&str> {
    let rest = header.trim_start().strip_prefix("else")?;
    let start = skip_ws(rest, 0);
    if start == 0 {
        return None;
    }
    match ident_at(rest, start) {
        Some("if") => Some(&rest[start..]),
        _ => None,
    }
}

/// Index just past the `}` that closes the block opened at `segs[open]`
fn block_end(segs: &[Segment], open: usize) -> usize {
    let mut depth = 0usize;
    for (i, seg) in segs.iter().enumerate().skip(open) {
        match seg.kind {
            SegmentKind::BlockOpen => depth += 1,
            SegmentKind::BlockClose => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i + 1;
                }
            }
            SegmentKind::Statement => {}
        }
    }
    segs.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::Declarations;
    use crate::parser::scan::segments;

    fn run_body(body: &str) -> Interpreter {
        let mut interp = Interpreter::new(Declarations::default());
        interp.scope.push_frame("main".to_string());
        interp.execute_body(body, 1).expect("body");
        interp
    }

    #[test]
    fn test_for_emits_one_line_per_iteration() {
        let interp = run_body("int sum = 0;\nfor (int i = 0; i < 3; i++) {\n  sum += i;\n}\nSystem.out.println(sum);");
        assert_eq!(
            interp.output(),
            "Loop iteration 1\nLoop iteration 2\nLoop iteration 3\n0\n"
        );
    }

    #[test]
    fn test_for_is_capped() {
        let interp = run_body("for (;;) { }");
        assert_eq!(interp.console().line_count(), MAX_LOOP_ITERATIONS);
        assert!(interp.output().ends_with("Loop iteration 1000\n"));
    }

    #[test]
    fn test_unsupported_for_condition_never_iterates() {
        let interp = run_body("for (int i = 0; i <= 3; i++) { }\nSystem.out.print(i);");
        assert_eq!(interp.output(), "0");
    }

    #[test]
    fn test_while_runs_at_most_once() {
        let interp = run_body("int n = 0;\nwhile (n < 10) {\n  n++;\n}\nwhile (n == 5) { }");
        assert_eq!(interp.output(), "While loop iteration 1\n");
    }

    #[test]
    fn test_if_reports_condition_and_skips_branches() {
        let interp = run_body(
            "int x = 1;\nif (x == 1) {\n  System.out.println(\"then\");\n} else {\n  System.out.println(\"else\");\n}\nSystem.out.println(\"after\");",
        );
        assert_eq!(
            interp.output(),
            "If condition (x == 1) evaluated to true\nafter\n"
        );
    }

    #[test]
    fn test_else_if_reports_its_own_condition() {
        let interp = run_body(
            "int x = 1;\nif (x == 2) {\n} else if (x == 1) {\n  x = 5;\n} else {\n}\nSystem.out.println(x);",
        );
        assert_eq!(
            interp.output(),
            "If condition (x == 2) evaluated to false\nIf condition (x == 1) evaluated to true\n1\n"
        );
    }

    #[test]
    fn test_inline_else_if() {
        let interp = run_body("int y = 3;\nif (y > 5) y = 0;\nelse if (y > 2) y = 1;\nelse y = 2;\nSystem.out.print(y);");
        assert_eq!(
            interp.output(),
            "If condition (y > 5) evaluated to false\nIf condition (y > 2) evaluated to true\n3"
        );
    }

    #[test]
    fn test_else_if_header_split() {
        assert_eq!(else_if("else if (a) "), Some("if (a) "));
        assert_eq!(else_if("else"), None);
        assert_eq!(else_if("elseif (a)"), None);
        assert_eq!(else_if("else iffy"), None);
    }

    #[test]
    fn test_inline_if_and_do_while() {
        let interp = run_body(
            "int y = 2;\nif (y < 1) y = 9;\ndo {\n  y++;\n} while (y < 100);\nSystem.out.print(y);",
        );
        assert_eq!(interp.output(), "If condition (y < 1) evaluated to false\n2");
    }

    #[test]
    fn test_bare_blocks_run_inline() {
        let interp = run_body("{\n  System.out.print(\"in\");\n}\nSystem.out.print(\"out\");");
        assert_eq!(interp.output(), "inout");
    }

    #[test]
    fn test_block_end_counts_nesting() {
        let segs = segments("if (a) { if (b) { x = 1; } y = 2; } z = 3;", 1);
        assert_eq!(block_end(&segs, 0), segs.len() - 1);
        assert_eq!(segs[block_end(&segs, 0)].text, "z = 3");
    }
}
