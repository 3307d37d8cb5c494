//! Coarse type checks: declared type versus literal shape, and `length()`
//! called on something that is not a string.

use super::{strip_modifiers, Diagnostics};
use crate::parser::ast::TypeTag;
use crate::parser::preprocess::SourceUnit;
use crate::parser::scan::{
    ident_at, is_ident_char, line_of, literal_end, mask_literals, segments, skip_ws, word_positions,
    SegmentKind,
};

/// Declared types with a string-like `length()` method
const STRING_TYPES: &[&str] = &["String", "StringBuilder", "StringBuffer", "CharSequence"];

/// Name fragments that suggest a string-valued variable
const STRING_HINTS: &[&str] = &["str", "text", "name", "word", "line", "msg", "message", "input"];

/// Literal shape of an initializer expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    StringLit,
    CharLit,
    BoolLit,
    IntLit,
    DecimalLit,
}

impl Shape {
    fn type_name(self) -> &'static str {
        match self {
            Shape::StringLit => "String",
            Shape::CharLit => "char",
            Shape::BoolLit => "boolean",
            Shape::IntLit => "int",
            Shape::DecimalLit => "double",
        }
    }
}

pub(crate) fn check_types(unit: &SourceUnit, diags: &mut Diagnostics) {
    check_initializers(&unit.cleaned, diags);
    check_length_calls(&unit.cleaned, diags);
}

fn check_initializers(cleaned: &str, diags: &mut Diagnostics) {
    for seg in segments(cleaned, 1) {
        if seg.kind != SegmentKind::Statement {
            continue;
        }
        let (stmt, _) = strip_modifiers(&seg.text);
        let Some(ty) = ident_at(stmt, 0) else {
            continue;
        };
        let tag = TypeTag::parse(ty);
        let checked = tag.is_integral()
            || tag.is_floating()
            || matches!(tag, TypeTag::String | TypeTag::Boolean);
        // Boxed names parse to the same tags but are not checked
        if !checked || !matches!(ty, "int" | "long" | "short" | "byte" | "double" | "float" | "String" | "boolean") {
            continue;
        }

        let name_at = skip_ws(stmt, ty.len());
        if name_at == ty.len() {
            continue;
        }
        let Some(name) = ident_at(stmt, name_at) else {
            continue;
        };
        let rest = stmt[name_at + name.len()..].trim_start();
        let Some(expr) = rest.strip_prefix('=').filter(|r| !r.starts_with('=')) else {
            continue;
        };
        let expr = expr.trim();

        if let Some(found) = incompatible(&tag, expr) {
            diags.error(
                Some(seg.line),
                format!(
                    "Type mismatch: cannot convert from {} to {} in declaration of '{}'",
                    found.type_name(),
                    ty,
                    name
                ),
            );
        }
    }
}

/// Returns the offending literal shape when `expr` cannot initialize `tag`
fn incompatible(tag: &TypeTag, expr: &str) -> Option<Shape> {
    let shape = literal_shape(expr);
    let bad = match (tag, shape) {
        (_, None) => {
            // Not a bare literal; only boolean has an operator-shape rule
            return None;
        }
        (t, Some(s)) if t.is_integral() => {
            matches!(s, Shape::StringLit | Shape::BoolLit | Shape::DecimalLit)
        }
        (t, Some(s)) if t.is_floating() => matches!(s, Shape::StringLit | Shape::BoolLit),
        (TypeTag::String, Some(s)) => s != Shape::StringLit,
        (TypeTag::Boolean, Some(s)) => s != Shape::BoolLit && !is_boolean_expression(expr),
        _ => false,
    };
    if bad {
        shape
    } else {
        None
    }
}

fn is_boolean_expression(expr: &str) -> bool {
    let masked = mask_literals(expr);
    ["==", "!=", "<", ">", "&&", "||", "!"]
        .iter()
        .any(|op| masked.contains(op))
}

fn literal_shape(expr: &str) -> Option<Shape> {
    let bytes = expr.as_bytes();
    match bytes.first()? {
        b'"' if literal_end(bytes, 0) == bytes.len() && bytes.len() >= 2 => {
            return Some(Shape::StringLit)
        }
        b'\'' if literal_end(bytes, 0) == bytes.len() && bytes.len() >= 3 => {
            return Some(Shape::CharLit)
        }
        _ => {}
    }
    if expr == "true" || expr == "false" {
        return Some(Shape::BoolLit);
    }
    let digits = expr.strip_prefix('-').unwrap_or(expr);
    let digits = digits.trim_end_matches(['l', 'L']);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return Some(Shape::IntLit);
    }
    let decimal = expr
        .strip_prefix('-')
        .unwrap_or(expr)
        .trim_end_matches(['f', 'F', 'd', 'D']);
    if let Some((whole, frac)) = decimal.split_once('.') {
        if !whole.is_empty()
            && whole.bytes().all(|b| b.is_ascii_digit())
            && frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Some(Shape::DecimalLit);
        }
    }
    None
}

/// `x.length()` where `x` is neither declared as a string type nor named like one
fn check_length_calls(cleaned: &str, diags: &mut Diagnostics) {
    let masked = mask_literals(cleaned);
    let mut from = 0;
    while let Some(rel) = masked[from..].find(".length") {
        let dot = from + rel;
        from = dot + 1;
        let after = skip_ws(&masked, dot + ".length".len());
        if !masked[after..].starts_with('(') {
            continue; // array `.length` field
        }
        let receiver_start = masked[..dot]
            .char_indices()
            .rev()
            .find(|&(_, c)| !is_ident_char(c))
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        let receiver = &masked[receiver_start..dot];
        if ident_at(receiver, 0) != Some(receiver) {
            continue; // literal, call result, etc.
        }
        if is_string_like_name(receiver) || declared_as_string(&masked, receiver) {
            continue;
        }
        diags.error(
            Some(line_of(cleaned, dot)),
            format!(
                "Cannot call length() on '{}': it is not declared as a String",
                receiver
            ),
        );
    }
}

fn is_string_like_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower == "s" || STRING_HINTS.iter().any(|h| lower.contains(h))
}

fn declared_as_string(masked: &str, name: &str) -> bool {
    word_positions(masked, name).into_iter().any(|at| {
        let before = masked[..at].trim_end();
        let prev = before
            .rsplit(|c: char| !is_ident_char(c))
            .next()
            .unwrap_or("");
        STRING_TYPES.contains(&prev)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(src: &str) -> Diagnostics {
        let mut diags = Diagnostics::new();
        check_types(&SourceUnit::new(src), &mut diags);
        diags
    }

    #[test]
    fn test_literal_shapes() {
        assert_eq!(literal_shape("\"hi\""), Some(Shape::StringLit));
        assert_eq!(literal_shape("'c'"), Some(Shape::CharLit));
        assert_eq!(literal_shape("-42"), Some(Shape::IntLit));
        assert_eq!(literal_shape("10L"), Some(Shape::IntLit));
        assert_eq!(literal_shape("3.5f"), Some(Shape::DecimalLit));
        assert_eq!(literal_shape("\"a\" + b"), None);
        assert_eq!(literal_shape("x + 1"), None);
    }

    #[test]
    fn test_boolean_initializers() {
        let diags = run("class A { void f() {\n boolean a = true;\n boolean b = x < 3 && y;\n boolean c = \"yes\";\n } }");
        assert_eq!(diags.errors.len(), 1);
        assert_eq!(diags.errors[0].line, Some(4));
        assert!(diags.errors[0].message.contains("from String to boolean"));
    }

    #[test]
    fn test_numeric_and_string_initializers() {
        let diags = run("class A { void f() {\n int a = \"5\";\n int b = 2.5;\n double c = 3;\n String d = 7;\n String e = \"ok\" + 1;\n } }");
        let lines: Vec<_> = diags.errors.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![Some(2), Some(3), Some(5)]);
    }

    #[test]
    fn test_length_on_non_string() {
        let diags = run("class A { void f() {\n int count = 3;\n int n = count.length();\n String word = \"x\";\n int m = word.length();\n int k = arr.length;\n } }");
        assert_eq!(diags.errors.len(), 1);
        assert_eq!(diags.errors[0].line, Some(3));
        assert!(diags.errors[0].message.contains("'count'"));
    }

    #[test]
    fn test_length_on_declared_string() {
        let diags = run("class A { void f(String p) {\n int n = p.length();\n } }");
        assert!(diags.errors.is_empty(), "{:?}", diags.errors);
    }
}
