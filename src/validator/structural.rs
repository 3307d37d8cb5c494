//! Structural checks: type declaration present, brackets balanced, canonical
//! `main` signature.

use super::Diagnostics;
use crate::parser::preprocess::SourceUnit;
use crate::parser::scan::{
    find_matching, ident_at, is_identifier, line_of, mask_literals, skip_ws, word_positions,
};

const MAIN_PREFIX: &str = "public static void main(String[] ";

pub(crate) fn check_structure(unit: &SourceUnit, diags: &mut Diagnostics) {
    let masked = mask_literals(&unit.cleaned);

    if !has_type_declaration(&masked) {
        diags.error(None, "No class, interface, or enum declaration found");
    }
    check_balance(&unit.raw, diags);
    check_main_signature(&unit.cleaned, &masked, diags);
}

fn has_type_declaration(masked: &str) -> bool {
    ["class", "interface", "enum"].iter().any(|kw| {
        word_positions(masked, kw).into_iter().any(|at| {
            !masked[..at].trim_end().ends_with('.')
                && ident_at(masked, skip_ws(masked, at + kw.len())).is_some()
        })
    })
}

/// Count `{}`, `()` and `[]` in one forward pass, ignoring anything inside
/// string literals, character literals and comments.
fn check_balance(raw: &str, diags: &mut Diagnostics) {
    #[derive(PartialEq)]
    enum Mode {
        Code,
        Str,
        Char,
        LineComment,
        BlockComment,
    }

    // [open, close] counts for {}, (), []
    let mut counts = [[0usize; 2]; 3];
    let mut mode = Mode::Code;
    let bytes = raw.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();
        match mode {
            Mode::Code => match b {
                b'"' => mode = Mode::Str,
                b'\'' => mode = Mode::Char,
                b'/' if next == Some(b'/') => {
                    mode = Mode::LineComment;
                    i += 1;
                }
                b'/' if next == Some(b'*') => {
                    mode = Mode::BlockComment;
                    i += 1;
                }
                b'{' => counts[0][0] += 1,
                b'}' => counts[0][1] += 1,
                b'(' => counts[1][0] += 1,
                b')' => counts[1][1] += 1,
                b'[' => counts[2][0] += 1,
                b']' => counts[2][1] += 1,
                _ => {}
            },
            Mode::Str | Mode::Char => {
                let quote = if mode == Mode::Str { b'"' } else { b'\'' };
                if b == b'\\' {
                    i += 1;
                } else if b == quote || b == b'\n' {
                    mode = Mode::Code;
                }
            }
            Mode::LineComment => {
                if b == b'\n' {
                    mode = Mode::Code;
                }
            }
            Mode::BlockComment => {
                if b == b'*' && next == Some(b'/') {
                    mode = Mode::Code;
                    i += 1;
                }
            }
        }
        i += 1;
    }

    let names = [
        ("curly braces", '{', '}'),
        ("parentheses", '(', ')'),
        ("square brackets", '[', ']'),
    ];
    for ([open, close], (name, o, c)) in counts.iter().zip(names) {
        if open != close {
            diags.error(
                None,
                format!(
                    "Unbalanced {}: {} opening '{}' but {} closing '{}'",
                    name, open, o, close, c
                ),
            );
        }
    }
}

/// Every declaration of a method named `main` must read exactly
/// `public static void main(String[] <identifier>)`.
fn check_main_signature(cleaned: &str, masked: &str, diags: &mut Diagnostics) {
    for at in word_positions(masked, "main") {
        let open = skip_ws(masked, at + "main".len());
        if !masked[open..].starts_with('(') {
            continue;
        }
        // Only declarations: the word before `main` must be a type name
        let before = masked[..at].trim_end();
        let Some(prev) = before
            .rsplit(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '$'))
            .next()
            .filter(|w| !w.is_empty())
        else {
            continue;
        };
        if matches!(prev, "new" | "return" | "else") {
            continue;
        }
        let Some(close) = find_matching(masked, open) else {
            continue;
        };

        let start = masked[..at]
            .rfind(|c| c == ';' || c == '{' || c == '}')
            .map(|i| i + 1)
            .unwrap_or(0);
        let signature = normalize_signature(&cleaned[start..=close]);
        if !is_canonical_main(&signature) {
            diags.error(
                Some(line_of(cleaned, at)),
                format!(
                    "Invalid main method signature '{}': expected 'public static void main(String[] args)'",
                    signature
                ),
            );
        }
    }
}

/// Collapse whitespace and drop it around brackets
fn normalize_signature(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut out = String::with_capacity(collapsed.len());
    let chars: Vec<char> = collapsed.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if c == ' ' {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let tight = |x: Option<char>| matches!(x, Some('(' | ')' | '[' | ']'));
            // `String[] args` keeps its space after the `]`
            if tight(next) || (tight(prev) && prev != Some(']')) {
                continue;
            }
        }
        out.push(c);
    }
    out
}

fn is_canonical_main(signature: &str) -> bool {
    signature
        .strip_prefix(MAIN_PREFIX)
        .and_then(|rest| rest.strip_suffix(')'))
        .is_some_and(is_identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(src: &str) -> Diagnostics {
        let mut diags = Diagnostics::new();
        check_structure(&SourceUnit::new(src), &mut diags);
        diags
    }

    #[test]
    fn test_well_formed_program_passes() {
        let diags = run("public class A { public static void main(String[] args) { int[] a = {1}; } }");
        assert!(diags.errors.is_empty(), "{:?}", diags.errors);
    }

    #[test]
    fn test_missing_type_declaration() {
        let diags = run("int x = 5;");
        assert_eq!(
            diags.errors[0].message,
            "No class, interface, or enum declaration found"
        );
    }

    #[test]
    fn test_unbalanced_braces() {
        let diags = run("public class A { void f() { }");
        assert_eq!(diags.errors.len(), 1);
        assert!(diags.errors[0].message.starts_with("Unbalanced curly braces"));
    }

    #[test]
    fn test_brackets_in_strings_and_comments_are_ignored() {
        let diags = run("class A { String s = \"{(\"; char c = '}'; // )\n /* [ */ }");
        assert!(diags.errors.is_empty(), "{:?}", diags.errors);
    }

    #[test]
    fn test_non_canonical_main_rejected() {
        let diags = run("public class A {\n static void main(String[] args) { } }");
        assert_eq!(diags.errors.len(), 1);
        assert_eq!(diags.errors[0].line, Some(2));
        assert!(diags.errors[0].message.contains("Invalid main method signature"));
    }

    #[test]
    fn test_main_whitespace_is_normalized() {
        let diags = run("public class A { public  static void main( String [] argv ) { } }");
        assert!(diags.errors.is_empty(), "{:?}", diags.errors);
    }

    #[test]
    fn test_calls_to_main_are_not_signatures() {
        let diags = run("public class A { public static void main(String[] a) { } void g() { A.main(null); main(null); } }");
        assert!(diags.errors.is_empty(), "{:?}", diags.errors);
    }
}
