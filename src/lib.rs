//! # Introduction
//!
//! javasim validates and simulates short Java-style teaching programs. A
//! program is checked by a set of heuristic compiler-like passes; if no errors
//! are found its `main` method is interpreted straight from the source text
//! and every console write is captured.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Preprocessor → Validator (gate) → Extractor → Entry point → Interpreter → RunResult
//! ```
//!
//! 1. [`parser`]: comment stripping, literal-aware scanning helpers and the
//!    class/method declaration extractor.
//! 2. [`validator`]: five heuristic phases producing errors and warnings.
//! 3. [`interpreter`]: resolves the entry point and walks its body, evaluating
//!    expressions and invoking methods.
//! 4. [`memory`]: tagged [`memory::value::Value`]s held in a
//!    [`memory::scope::Scope`] of global and per-call bindings.
//! 5. [`console`]: the captured output buffer.
//! 6. [`ui`]: ratatui-based result viewer; not part of the stable library API.
//!
//! ## Supported subset
//!
//! Types: `int`, `long`, `short`, `byte`, `double`, `float`, `boolean`,
//! `char`, `String`. Statements: declarations, assignment (plain and
//! compound), `++`/`--`, `System.out.print`/`println`, static method calls,
//! `return`, `break`, `continue`. Loop and `if` headers are simulated without
//! entering their blocks.
//!
//! ```
//! let result = javasim::compile_and_run(
//!     "public class Main { public static void main(String[] args) { int x = 5; System.out.println(\"Value: \" + x); } }",
//! );
//! assert!(result.success);
//! assert_eq!(result.output, "Value: 5\n");
//! ```

pub mod console;
pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod ui;
pub mod validator;

use console::{Console, OutputLine};
use interpreter::engine::Interpreter;
use interpreter::errors::RuntimeError;
use parser::declarations::extract;
use parser::preprocess::SourceUnit;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};
use validator::{Diagnostic, Diagnostics};

/// Outcome of one compile-and-run request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub success: bool,
    /// Diagnostic summary or status line
    pub message: String,
    /// Everything the program printed, verbatim
    pub output: String,
    /// `output` split into lines tagged with the statement that printed them
    pub output_lines: Vec<OutputLine>,
    /// The errors and warnings behind `message`
    pub diagnostics: Diagnostics,
    /// Source line of the statement a runtime error stopped at
    pub fault_line: Option<usize>,
}

/// Validate `source` and, when it has no errors, run it
///
/// Every call builds its own tables, scopes and output buffer, so calls are
/// independent of each other. Faults never escape: a runtime error or a panic
/// inside the pipeline becomes a failed result.
pub fn compile_and_run(source: &str) -> RunResult {
    match panic::catch_unwind(AssertUnwindSafe(|| run_pipeline(source))) {
        Ok(result) => result,
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            warn!(%reason, "pipeline panicked");
            runtime_failure(&RuntimeError::Internal(reason), &Console::new(), Diagnostics::new())
        }
    }
}

fn run_pipeline(source: &str) -> RunResult {
    let unit = SourceUnit::new(source);
    let diagnostics = validator::validate(&unit);
    if diagnostics.has_errors() {
        debug!(errors = diagnostics.errors.len(), "validation failed");
        return RunResult {
            success: false,
            message: format!(
                "Compilation failed with {} error(s):{}",
                diagnostics.errors.len(),
                bullet_list(&diagnostics.errors)
            ),
            output: String::new(),
            output_lines: Vec::new(),
            diagnostics,
            fault_line: None,
        };
    }

    let mut interp = Interpreter::new(extract(&unit.cleaned));
    match interp.run() {
        Ok(()) => {
            let mut message = "Compilation successful".to_string();
            if !diagnostics.warnings.is_empty() {
                message.push_str("\n\nWarnings:");
                message.push_str(&bullet_list(&diagnostics.warnings));
            }
            RunResult {
                success: true,
                message,
                output: interp.output(),
                output_lines: interp.console().lines(),
                diagnostics,
                fault_line: None,
            }
        }
        Err(err) => {
            debug!(%err, "run failed");
            runtime_failure(&err, interp.console(), diagnostics)
        }
    }
}

fn runtime_failure(err: &RuntimeError, console: &Console, diagnostics: Diagnostics) -> RunResult {
    RunResult {
        success: false,
        message: format!("Runtime error: {}", err),
        output: console.output(),
        output_lines: console.lines(),
        diagnostics,
        fault_line: err.line(),
    }
}

fn bullet_list(items: &[Diagnostic]) -> String {
    items.iter().map(|d| format!("\n  - {}", d)).collect()
}
