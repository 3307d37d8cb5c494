//! Advanced-feature checks: interfaces, abstract classes, generics, lambdas.
//!
//! None of these features execute; the checks only point learners at rules
//! the simulator cannot verify.

use super::Diagnostics;
use crate::parser::preprocess::SourceUnit;
use crate::parser::scan::{
    find_matching, ident_at, is_ident_char, line_of, mask_literals, skip_ws, word_positions,
};

pub(crate) fn check_advanced_features(unit: &SourceUnit, diags: &mut Diagnostics) {
    let masked = mask_literals(&unit.cleaned);
    check_interfaces(&masked, diags);
    check_abstract_instantiation(&masked, diags);
    check_generic_arguments(&masked, diags);
    check_lambdas(&masked, diags);
}

fn check_interfaces(masked: &str, diags: &mut Diagnostics) {
    for at in word_positions(masked, "implements") {
        let class = word_positions(&masked[..at], "class")
            .last()
            .and_then(|&c| ident_at(masked, skip_ws(masked, c + "class".len())))
            .unwrap_or("class");
        let list_start = at + "implements".len();
        let list_end = masked[list_start..]
            .find('{')
            .map(|n| list_start + n)
            .unwrap_or(masked.len());
        for iface in masked[list_start..list_end].split(',') {
            let iface = iface.trim();
            let iface = iface.split('<').next().unwrap_or(iface).trim();
            if iface.is_empty() {
                continue;
            }
            diags.warning(
                Some(line_of(masked, at)),
                format!(
                    "Class '{}' implements '{}': make sure every method of the interface is implemented",
                    class, iface
                ),
            );
        }
    }
}

fn check_abstract_instantiation(masked: &str, diags: &mut Diagnostics) {
    let abstract_classes: Vec<&str> = word_positions(masked, "abstract")
        .into_iter()
        .filter_map(|at| {
            let kw = skip_ws(masked, at + "abstract".len());
            if ident_at(masked, kw) != Some("class") {
                return None;
            }
            ident_at(masked, skip_ws(masked, kw + "class".len()))
        })
        .collect();
    if abstract_classes.is_empty() {
        return;
    }

    for at in word_positions(masked, "new") {
        let name_at = skip_ws(masked, at + "new".len());
        let Some(name) = ident_at(masked, name_at) else {
            continue;
        };
        let open = skip_ws(masked, name_at + name.len());
        if abstract_classes.contains(&name) && masked[open..].starts_with('(') {
            diags.error(
                Some(line_of(masked, at)),
                format!("Cannot instantiate abstract class '{}'", name),
            );
        }
    }
}

/// `Container<arg>` where `arg` is not a capitalized identifier
fn check_generic_arguments(masked: &str, diags: &mut Diagnostics) {
    let bytes = masked.as_bytes();
    for (open, _) in masked.match_indices('<') {
        let base_start = masked[..open]
            .char_indices()
            .rev()
            .find(|&(_, c)| !is_ident_char(c))
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        let base = &masked[base_start..open];
        if !base.starts_with(|c: char| c.is_ascii_uppercase()) {
            continue;
        }
        let Some(close) = find_matching(masked, open) else {
            continue;
        };
        let inner = &masked[open + 1..close];
        let type_like = inner.bytes().all(|b| {
            is_ident_char(b as char) || matches!(b, b' ' | b',' | b'?' | b'<' | b'>' | b'[' | b']' | b'.')
        });
        if !type_like || bytes.get(open + 1) == Some(&b'=') {
            continue;
        }
        for arg in split_type_args(inner) {
            let arg = arg.trim();
            if arg.is_empty() || arg.starts_with('?') || arg.starts_with(|c: char| c.is_ascii_uppercase()) {
                continue;
            }
            diags.warning(
                Some(line_of(masked, open)),
                format!(
                    "Generic type argument '{}' in '{}<{}>' should be a class type (use a wrapper such as Integer)",
                    arg, base, inner.trim()
                ),
            );
        }
    }
}

/// Split `K, List<V>` on commas outside nested angle brackets
fn split_type_args(inner: &str) -> Vec<&str> {
    let mut args = Vec::new();
    let mut depth = 0;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth -= 1,
            ',' if depth == 0 => {
                args.push(&inner[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    args.push(&inner[start..]);
    args
}

fn check_lambdas(masked: &str, diags: &mut Diagnostics) {
    for (at, _) in masked.match_indices("->") {
        diags.warning(
            Some(line_of(masked, at)),
            "Lambda expression: its target type must be a functional interface",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(src: &str) -> Diagnostics {
        let mut diags = Diagnostics::new();
        check_advanced_features(&SourceUnit::new(src), &mut diags);
        diags
    }

    #[test]
    fn test_implements_warns_per_interface() {
        let diags = run("class Dog implements Animal, Comparable<Dog> { }");
        assert_eq!(diags.warnings.len(), 2);
        assert!(diags.warnings[0].message.contains("'Dog' implements 'Animal'"));
        assert!(diags.warnings[1].message.contains("'Comparable'"));
        assert!(diags.errors.is_empty());
    }

    #[test]
    fn test_abstract_instantiation_is_an_error() {
        let diags = run("abstract class Shape { }\nclass M { void f() {\n Shape s = new Shape();\n } }");
        assert_eq!(diags.errors.len(), 1);
        assert_eq!(diags.errors[0].line, Some(3));
    }

    #[test]
    fn test_primitive_generic_argument() {
        let diags = run("class A { List<int> xs; Map<String, Integer> m; List<> d; }");
        assert_eq!(diags.warnings.len(), 1);
        assert!(diags.warnings[0].message.contains("'int'"));
    }

    #[test]
    fn test_comparisons_are_not_generics() {
        let diags = run("class A { void f() { if (MAX < n && n > 0) { } } }");
        assert!(diags.warnings.is_empty(), "{:?}", diags.warnings);
    }

    #[test]
    fn test_lambda_warning_ignores_strings() {
        let diags = run("class A { String s = \"->\"; Runnable r = () -> go(); }");
        assert_eq!(diags.warnings.len(), 1);
    }
}
