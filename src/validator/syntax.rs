//! Syntax heuristics: missing semicolons and method headers without a body.

use super::{numbered_lines, Diagnostics};
use crate::parser::declarations::split_assignment;
use crate::parser::preprocess::SourceUnit;
use crate::parser::scan::{find_matching, ident_at, line_of, mask_literals, skip_ws, word_positions};

/// Lines starting with these never need a trailing semicolon
const CONTROL_KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "do", "switch", "case", "default", "try", "catch", "finally",
];

pub(crate) fn check_syntax(unit: &SourceUnit, diags: &mut Diagnostics) {
    let masked = mask_literals(&unit.cleaned);
    check_semicolons(&masked, diags);
    check_method_bodies(&masked, diags);
}

fn starts_with_keyword(line: &str, keywords: &[&str]) -> bool {
    ident_at(line, 0).is_some_and(|w| keywords.contains(&w))
}

fn check_semicolons(masked: &str, diags: &mut Diagnostics) {
    for (line_no, line) in numbered_lines(masked) {
        let t = line.trim();
        if t.is_empty() || t.starts_with('@') {
            continue;
        }
        if t.ends_with(';') || t.ends_with('{') || t.ends_with('}') {
            continue;
        }
        if starts_with_keyword(t, CONTROL_KEYWORDS) {
            continue;
        }
        let looks_like_statement = split_assignment(t).is_some()
            || t.contains("System.out.print")
            || t.contains("++")
            || t.contains("--");
        if looks_like_statement {
            diags.error(Some(line_no), "Missing semicolon ';' at end of statement");
        }
    }
}

/// `visibility [static] Type name(...)` must be followed by `{`
fn check_method_bodies(masked: &str, diags: &mut Diagnostics) {
    let interfaces = interface_bodies(masked);

    for vis in ["public", "private", "protected"] {
        for at in word_positions(masked, vis) {
            if interfaces.iter().any(|(s, e)| at > *s && at < *e) {
                continue;
            }
            let Some((name, close)) = method_signature_at(masked, at + vis.len()) else {
                continue;
            };
            let mut next = skip_ws(masked, close + 1);
            if masked[next..].starts_with("throws") {
                next = masked[next..]
                    .find(|c| c == '{' || c == ';')
                    .map(|n| next + n)
                    .unwrap_or(masked.len());
            }
            if !masked[next..].starts_with('{') {
                diags.error(
                    Some(line_of(masked, at)),
                    format!("Method '{}' is missing its opening brace '{{'", name),
                );
            }
        }
    }
}

/// Match `[static] Type name (` at `i`; returns the method name and the index
/// of the closing parenthesis.
fn method_signature_at(masked: &str, i: usize) -> Option<(&str, usize)> {
    let mut i = skip_ws(masked, i);
    if ident_at(masked, i) == Some("static") {
        i = skip_ws(masked, i + "static".len());
    }
    let ty = ident_at(masked, i)?;
    if matches!(ty, "class" | "interface" | "enum") {
        return None;
    }
    let after_ty = i + ty.len();
    let name_at = skip_ws(masked, after_ty);
    if name_at == after_ty {
        return None; // Type and name must be separated by whitespace
    }
    let name = ident_at(masked, name_at)?;
    let open = skip_ws(masked, name_at + name.len());
    if !masked[open..].starts_with('(') {
        return None;
    }
    Some((name, find_matching(masked, open)?))
}

/// Byte ranges of `interface` bodies, where bodiless methods are legal
fn interface_bodies(masked: &str) -> Vec<(usize, usize)> {
    word_positions(masked, "interface")
        .into_iter()
        .filter_map(|at| {
            let open = at + masked[at..].find('{')?;
            Some((open, find_matching(masked, open).unwrap_or(masked.len())))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(src: &str) -> Diagnostics {
        let mut diags = Diagnostics::new();
        check_syntax(&SourceUnit::new(src), &mut diags);
        diags
    }

    #[test]
    fn test_missing_semicolon_reported_with_line() {
        let diags = run("class A {\n void f() {\n  int x = 5\n  x++;\n  System.out.println(x)\n }\n}");
        let lines: Vec<_> = diags.errors.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![Some(3), Some(5)]);
    }

    #[test]
    fn test_control_lines_and_comparisons_not_flagged() {
        let diags = run("class A {\n void f() {\n  for (int i = 0; i < 3; i++)\n  if (a == b)\n  return x\n }\n}");
        assert!(diags.errors.is_empty(), "{:?}", diags.errors);
    }

    #[test]
    fn test_trailing_comment_does_not_hide_semicolon() {
        let diags = run("class A { void f() {\n int x = 1; // set x\n } }");
        assert!(diags.errors.is_empty(), "{:?}", diags.errors);
    }

    #[test]
    fn test_method_without_brace() {
        let diags = run("class A {\n public static void go()\n int x;\n}");
        assert_eq!(diags.errors.len(), 1);
        assert_eq!(diags.errors[0].line, Some(2));
        assert!(diags.errors[0].message.contains("'go'"));
    }

    #[test]
    fn test_brace_on_next_line_and_throws_accepted() {
        let diags = run("class A {\n public void go()\n {\n }\n public void io() throws Exception { }\n}");
        assert!(diags.errors.is_empty(), "{:?}", diags.errors);
    }

    #[test]
    fn test_interface_methods_may_omit_body() {
        let diags = run("interface Shape {\n public double area();\n}");
        assert!(diags.errors.is_empty(), "{:?}", diags.errors);
    }
}
