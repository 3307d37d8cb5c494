//! Semantic heuristics: unreachable code, naming conventions, unused imports.

use super::{numbered_lines, strip_modifiers, Diagnostics};
use crate::parser::preprocess::SourceUnit;
use crate::parser::scan::{find_matching, ident_at, mask_literals, skip_ws, word_positions};

/// Words that look like a type at the start of a statement but are not
const STATEMENT_KEYWORDS: &[&str] = &[
    "return", "new", "else", "case", "throw", "package", "import", "class", "interface", "enum",
    "extends", "implements", "goto", "assert", "break", "continue",
];

pub(crate) fn check_semantics(unit: &SourceUnit, diags: &mut Diagnostics) {
    let masked = mask_literals(&unit.cleaned);
    check_unreachable(&masked, diags);
    check_naming(&masked, diags);
    check_unused_imports(&masked, diags);
}

/// Lines after a value-returning `return` and before the next brace
fn check_unreachable(masked: &str, diags: &mut Diagnostics) {
    let mut after_return = false;
    for (line_no, line) in numbered_lines(masked) {
        let t = line.trim();
        if after_return {
            if t.contains('}') || t.contains('{') {
                after_return = false;
            } else if !t.is_empty() {
                diags.warning(Some(line_no), "Unreachable code after return statement");
            }
            continue;
        }
        if let Some(rest) = t.strip_prefix("return") {
            let rest = rest.trim_start();
            let returns_value = !rest.is_empty() && !rest.starts_with(';');
            let word_boundary = !t["return".len()..].starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_');
            after_return = returns_value && word_boundary && !t.contains('}');
        }
    }
}

/// Declarations whose variable name starts with an uppercase letter
fn check_naming(masked: &str, diags: &mut Diagnostics) {
    for (line_no, line) in numbered_lines(masked) {
        let (stmt, is_final) = strip_modifiers(line.trim());
        let Some(name) = declared_name(stmt) else {
            continue;
        };
        let constant = is_final
            && name
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');
        if name.starts_with(|c: char| c.is_ascii_uppercase()) && !constant {
            diags.warning(
                Some(line_no),
                format!(
                    "Variable '{}' should start with a lowercase letter (camelCase)",
                    name
                ),
            );
        }
    }
}

/// Name declared by `Type name =`, `Type name;` or `Type name,`
fn declared_name(stmt: &str) -> Option<&str> {
    let ty = ident_at(stmt, 0)?;
    if STATEMENT_KEYWORDS.contains(&ty) {
        return None;
    }
    let mut i = ty.len();
    if stmt[i..].starts_with('<') {
        i = find_matching(stmt, i)? + 1;
    }
    while stmt[i..].starts_with("[]") {
        i += 2;
    }
    let name_at = skip_ws(stmt, i);
    if name_at == i {
        return None;
    }
    let name = ident_at(stmt, name_at)?;
    let rest = stmt[name_at + name.len()..].trim_start();
    let terminated = rest.starts_with(';')
        || rest.starts_with(',')
        || (rest.starts_with('=') && !rest.starts_with("=="));
    terminated.then_some(name)
}

/// `import a.b.Name;` where `Name` never appears outside import lines
fn check_unused_imports(masked: &str, diags: &mut Diagnostics) {
    let is_header = |l: &str| {
        let t = l.trim_start();
        t.starts_with("import ") || t.starts_with("package ")
    };
    let code: String = masked
        .lines()
        .filter(|l| !is_header(l))
        .collect::<Vec<_>>()
        .join("\n");

    for (line_no, line) in numbered_lines(masked) {
        let Some(rest) = line.trim().strip_prefix("import ") else {
            continue;
        };
        let rest = rest.trim_start();
        let rest = rest.strip_prefix("static ").unwrap_or(rest);
        let path = rest.trim_end().trim_end_matches(';').trim();
        if path.ends_with(".*") || path.is_empty() {
            continue;
        }
        let simple = path.rsplit('.').next().unwrap_or(path);
        if word_positions(&code, simple).is_empty() {
            diags.warning(Some(line_no), format!("Unused import '{}'", path));
        }
    }
}
