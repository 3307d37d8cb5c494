//! Static validation of the subject program
//!
//! Five heuristic phases run in a fixed order over the raw and cleaned text:
//!
//! 1. [`structural`]: a type declaration exists, brackets balance, `main`
//!    has the canonical signature
//! 2. [`syntax`]: likely missing semicolons, method headers without a body
//! 3. [`semantic`]: unreachable code, naming conventions, unused imports
//! 4. [`types`]: literal/declared-type compatibility, `length()` misuse
//! 5. [`advanced`]: interfaces, abstract instantiation, generics, lambdas
//!
//! Every phase runs even when an earlier one reported errors. Execution is
//! allowed only when the error list is empty; warnings never block.

mod advanced;
mod semantic;
mod structural;
mod syntax;
mod types;

use crate::parser::preprocess::SourceUnit;
use std::fmt;

/// A single error or warning, tagged with its 1-based line when known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: Option<usize>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "Line {}: {}", line, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Ordered errors and warnings accumulated across all phases
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, line: Option<usize>, message: impl Into<String>) {
        self.errors.push(Diagnostic {
            line,
            message: message.into(),
        });
    }

    pub fn warning(&mut self, line: Option<usize>, message: impl Into<String>) {
        self.warnings.push(Diagnostic {
            line,
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Lines that carry at least one error
    pub fn error_lines(&self) -> Vec<usize> {
        self.errors.iter().filter_map(|d| d.line).collect()
    }

    /// Lines that carry at least one warning
    pub fn warning_lines(&self) -> Vec<usize> {
        self.warnings.iter().filter_map(|d| d.line).collect()
    }
}

/// Run every validation phase over `unit`
#[tracing::instrument(level = "trace", skip_all)]
pub fn validate(unit: &SourceUnit) -> Diagnostics {
    let mut diags = Diagnostics::new();

    structural::check_structure(unit, &mut diags);
    syntax::check_syntax(unit, &mut diags);
    semantic::check_semantics(unit, &mut diags);
    types::check_types(unit, &mut diags);
    advanced::check_advanced_features(unit, &mut diags);

    tracing::debug!(
        errors = diags.errors.len(),
        warnings = diags.warnings.len(),
        "validation finished"
    );
    diags
}

/// Iterate `(line_number, line)` over `text`, 1-based
fn numbered_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines().enumerate().map(|(i, l)| (i + 1, l))
}

/// Remove leading declaration modifiers from a statement
fn strip_modifiers(mut text: &str) -> (&str, bool) {
    const MODS: &[&str] = &[
        "public",
        "private",
        "protected",
        "static",
        "final",
        "transient",
        "volatile",
    ];
    let mut is_final = false;
    loop {
        text = text.trim_start();
        let Some(word) = MODS.iter().find(|m| {
            text.strip_prefix(**m)
                .is_some_and(|rest| rest.starts_with(char::is_whitespace))
        }) else {
            return (text, is_final);
        };
        is_final |= *word == "final";
        text = &text[word.len()..];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic {
            line: Some(4),
            message: "Missing semicolon".to_string(),
        };
        assert_eq!(d.to_string(), "Line 4: Missing semicolon");
        let d = Diagnostic {
            line: None,
            message: "oops".to_string(),
        };
        assert_eq!(d.to_string(), "oops");
    }

    #[test]
    fn test_strip_modifiers() {
        assert_eq!(
            strip_modifiers("private static final int MAX = 1"),
            ("int MAX = 1", true)
        );
        assert_eq!(strip_modifiers("publicity x"), ("publicity x", false));
    }

    #[test]
    fn test_clean_program_has_no_diagnostics() {
        let unit = SourceUnit::new(
            r#"
public class Main {
    public static void main(String[] args) {
        int x = 5;
        System.out.println("Value: " + x);
    }
}
"#,
        );
        let diags = validate(&unit);
        assert!(diags.errors.is_empty(), "{:?}", diags.errors);
        assert!(diags.warnings.is_empty(), "{:?}", diags.warnings);
    }
}
