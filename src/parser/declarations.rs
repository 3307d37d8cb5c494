//! Declaration extraction
//!
//! Scans comment-stripped source for the declarations the interpreter needs:
//!
//! - Classes: `[public] class Name [extends Parent] [implements ...] { body }`
//! - Fields: `[visibility] [static] Type name [= initializer];`
//! - Methods: `[visibility] [static] ReturnType name(params) { body }`
//! - Free methods: the method shape at source level, outside any class body
//!
//! Bodies are captured by counting nested braces (string and character
//! literals are skipped), never by single-level matching.
//!
//! # Duplicates
//!
//! A later declaration with the same name replaces the earlier one, both for
//! classes in the class table and for members within a class.
//!
//! Extraction never fails; unrecognised text is simply ignored.

use crate::parser::ast::*;
use crate::parser::scan::{find_matching, ident_at, line_of, literal_end, skip_ws, word_positions};

const MODIFIERS: &[&str] = &[
    "public",
    "protected",
    "private",
    "static",
    "final",
    "abstract",
    "synchronized",
    "native",
    "transient",
    "volatile",
    "strictfp",
    "default",
];

/// Words that can never be a declared type
const NOT_A_TYPE: &[&str] = &[
    "return", "new", "import", "package", "throw", "break", "continue", "else", "if", "while",
    "for", "do", "switch", "case", "class", "interface", "enum", "extends", "implements",
    "assert", "goto", "try", "catch", "finally",
];

/// A member found while scanning a class body (or the source top level)
#[derive(Debug, Clone, PartialEq)]
enum Member {
    Field(FieldDef),
    Method(MethodDef),
}

/// Build the class and method tables from cleaned source
#[tracing::instrument(level = "trace", skip_all)]
pub fn extract(cleaned: &str) -> Declarations {
    let mut decls = Declarations::default();

    for at in word_positions(cleaned, "class") {
        if cleaned[..at].trim_end().ends_with('.') {
            continue; // `Foo.class` literal
        }
        if let Some(class) = extract_class(cleaned, at, &mut decls) {
            tracing::trace!(class = %class.name, fields = class.fields.len(), methods = class.methods.len(), "class extracted");
            decls.classes.insert(class.name.clone(), class);
        }
    }

    for member in scan_members(cleaned, 1) {
        if let Member::Method(method) = member {
            decls.methods.insert(method.key(), method);
        }
    }

    tracing::debug!(
        classes = decls.classes.len(),
        methods = decls.methods.len(),
        "declarations extracted"
    );
    decls
}

/// Parse the class whose `class` keyword starts at `at`
fn extract_class(cleaned: &str, at: usize, decls: &mut Declarations) -> Option<ClassDef> {
    let name_start = skip_ws(cleaned, at + "class".len());
    let name = ident_at(cleaned, name_start)?.to_string();

    let header_start = name_start + name.len();
    let brace = header_start + cleaned[header_start..].find('{')?;
    let header = &cleaned[header_start..brace];
    if header.contains(';') {
        return None;
    }

    let parent = header
        .split_whitespace()
        .skip_while(|w| *w != "extends")
        .nth(1)
        .map(|p| p.split('<').next().unwrap_or(p).trim_end_matches(',').to_string());

    let close = find_matching(cleaned, brace).unwrap_or(cleaned.len());
    let body = &cleaned[(brace + 1).min(close)..close];
    let body_line = line_of(cleaned, brace + 1);

    let mut class = ClassDef {
        name: name.clone(),
        parent,
        ..ClassDef::default()
    };

    for member in scan_members(body, body_line) {
        match member {
            Member::Field(field) => class.put_field(field),
            Member::Method(mut method) => {
                method.owner = Some(name.clone());
                decls.methods.insert(method.key(), method.clone());
                class.put_method(method);
            }
        }
    }
    Some(class)
}

/// Walk `body` at nesting depth zero and classify each `;`- or `{`-terminated
/// header as a field or method declaration. `base_line` is the line of `body`'s
/// first byte.
fn scan_members(body: &str, base_line: usize) -> Vec<Member> {
    let bytes = body.as_bytes();
    let mut members = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                i = literal_end(bytes, i);
                continue;
            }
            b'(' => {
                // Parameter lists and annotation arguments never end a header
                i = find_matching(body, i).map(|c| c + 1).unwrap_or(bytes.len());
                continue;
            }
            b';' => {
                let header = &body[start..i];
                if let Some(field) = parse_field(header) {
                    let line = base_line + line_of(body, start + leading_ws(header)) - 1;
                    members.push(Member::Field(FieldDef { line, ..field }));
                }
                start = i + 1;
            }
            b'{' => {
                let close = find_matching(body, i).unwrap_or(bytes.len());
                let header = &body[start..i];
                if let Some(method) = parse_method(header) {
                    let body_line = base_line + line_of(body, i + 1) - 1;
                    members.push(Member::Method(MethodDef {
                        body: body[i + 1..close.max(i + 1)].to_string(),
                        body_line,
                        ..method
                    }));
                }
                i = close + 1;
                start = i;
                continue;
            }
            b'}' => start = i + 1,
            _ => {}
        }
        i += 1;
    }
    members
}

fn leading_ws(s: &str) -> usize {
    s.len() - s.trim_start().len()
}

/// Drop leading annotations such as `@Override` or `@SuppressWarnings("x")`
fn strip_annotations(mut header: &str) -> &str {
    loop {
        header = header.trim_start();
        let Some(rest) = header.strip_prefix('@') else {
            return header;
        };
        let Some(name) = ident_at(rest, 0) else {
            return header;
        };
        let after = skip_ws(rest, name.len());
        header = if rest[after..].starts_with('(') {
            match find_matching(rest, after) {
                Some(close) => &rest[close + 1..],
                None => return "",
            }
        } else {
            &rest[name.len()..]
        };
    }
}

/// Split declaration text into words, keeping `<...>` generic arguments
/// attached to the word they follow.
fn type_tokens(text: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    let mut depth = 0i32;
    for word in text.split_whitespace() {
        if depth > 0 || (word.starts_with('<') && !tokens.is_empty() && !is_type_params(word)) {
            if let Some(last) = tokens.last_mut() {
                last.push(' ');
                last.push_str(word);
            }
        } else {
            tokens.push(word.to_string());
        }
        depth += word.matches('<').count() as i32 - word.matches('>').count() as i32;
    }
    tokens
}

/// `<T>` written before a generic method's return type
fn is_type_params(word: &str) -> bool {
    word.starts_with('<') && word.ends_with('>')
}

/// Strip modifiers and generic type parameters; returns the remaining tokens
/// plus the visibility and static flag.
fn split_modifiers(tokens: Vec<String>) -> (Visibility, bool, Vec<String>) {
    let mut visibility = Visibility::Package;
    let mut is_static = false;
    let mut rest = Vec::new();
    let mut in_modifiers = true;
    for tok in tokens {
        if in_modifiers && MODIFIERS.contains(&tok.as_str()) {
            if let Some(v) = Visibility::from_keyword(&tok) {
                visibility = v;
            }
            is_static |= tok == "static";
            continue;
        }
        if in_modifiers && is_type_params(&tok) {
            continue;
        }
        in_modifiers = false;
        rest.push(tok);
    }
    (visibility, is_static, rest)
}

fn is_type_text(ty: &str) -> bool {
    ty.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && !NOT_A_TYPE.contains(&ty)
}

fn parse_method(header: &str) -> Option<MethodDef> {
    let header = strip_annotations(header);
    let open = header.find('(')?;
    let close = find_matching(header, open)?;
    let tail = header[close + 1..].trim();
    if !(tail.is_empty() || tail.starts_with("throws")) {
        return None;
    }

    let before = &header[..open];
    if before.contains('=') || before.contains('.') {
        return None;
    }
    let (visibility, is_static, rest) = split_modifiers(type_tokens(before));
    let [ret, name] = rest.as_slice() else {
        return None; // constructors and anything else
    };
    if !is_type_text(ret) || ident_at(name, 0) != Some(name.as_str()) {
        return None;
    }

    Some(MethodDef {
        name: name.clone(),
        owner: None,
        return_type: TypeTag::parse(ret),
        visibility,
        is_static,
        params: header[open + 1..close].trim().to_string(),
        body: String::new(),
        body_line: 0,
    })
}

fn parse_field(header: &str) -> Option<FieldDef> {
    let header = strip_annotations(header);
    let (decl, init) = match split_assignment(header) {
        Some(eq) => (&header[..eq], Some(header[eq + 1..].trim().to_string())),
        None => (header, None),
    };
    if decl.contains('(') {
        return None;
    }
    let (visibility, is_static, rest) = split_modifiers(type_tokens(decl));
    let [ty, name] = rest.as_slice() else {
        return None;
    };
    if !is_type_text(ty) || ident_at(name, 0) != Some(name.as_str()) {
        return None;
    }
    Some(FieldDef {
        name: name.clone(),
        field_type: TypeTag::parse(ty),
        visibility,
        is_static,
        initializer: init,
        line: 0,
    })
}

/// Position of the first `=` that is an assignment rather than part of a
/// comparison operator.
pub(crate) fn split_assignment(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                i = literal_end(bytes, i);
                continue;
            }
            b'=' => {
                let prev = if i > 0 { bytes[i - 1] } else { b' ' };
                let next = bytes.get(i + 1).copied().unwrap_or(b' ');
                if next == b'=' {
                    i += 2;
                    continue;
                }
                if !matches!(prev, b'=' | b'!' | b'<' | b'>') {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROGRAM: &str = r#"
public class Main extends Base implements Runnable {
    private static int count = 3;
    public String label;

    public static void main(String[] args) {
        if (count > 0) { count--; }
        System.out.println("{" + label);
    }

    static int square(int n) {
        return n * n;
    }

    public Main() { }
}

class Helper {
    int value;
}

static int twice(int x) {
    return x * 2;
}
"#;

    #[test]
    fn test_extracts_classes_and_parent() {
        let decls = extract(PROGRAM);
        assert_eq!(decls.classes.len(), 2);
        let main = &decls.classes["Main"];
        assert_eq!(main.parent.as_deref(), Some("Base"));
        assert_eq!(main.fields.len(), 2);
        assert_eq!(main.fields[0].name, "count");
        assert!(main.fields[0].is_static);
        assert_eq!(main.fields[0].initializer.as_deref(), Some("3"));
        assert_eq!(main.fields[1].visibility, Visibility::Public);
    }

    #[test]
    fn test_method_bodies_are_brace_balanced() {
        let decls = extract(PROGRAM);
        let main = decls.methods.get("Main.main").expect("main extracted");
        assert!(main.is_static);
        assert_eq!(main.return_type, TypeTag::Void);
        assert_eq!(main.params, "String[] args");
        assert!(main.body.contains("count--;"));
        assert!(main.body.contains(r#"System.out.println("{" + label);"#));
        assert_eq!(main.body_line, 6);
    }

    #[test]
    fn test_constructors_are_not_methods() {
        let decls = extract(PROGRAM);
        assert_eq!(decls.classes["Main"].methods.len(), 2);
    }

    #[test]
    fn test_free_methods_use_bare_key() {
        let decls = extract(PROGRAM);
        let twice = decls.free_method("twice").expect("free method");
        assert_eq!(twice.owner, None);
        assert!(decls.free_method("square").is_none());
        assert!(decls.methods.contains_key("Main.square"));
    }

    #[test]
    fn test_duplicate_declarations_last_wins() {
        let decls = extract("class A { int f() { return 1; } int f() { return 2; } } class A { int g; }");
        assert_eq!(decls.classes.len(), 1);
        assert_eq!(decls.classes["A"].fields[0].name, "g");
        assert!(decls.methods["A.f"].body.contains("return 2"));
    }

    #[test]
    fn test_empty_source_gives_empty_tables() {
        let decls = extract("");
        assert!(decls.classes.is_empty());
        assert!(decls.methods.is_empty());
    }

    #[test]
    fn test_split_assignment_skips_comparisons() {
        assert_eq!(split_assignment("boolean b = x == y"), Some(10));
        assert_eq!(split_assignment("x <= y"), None);
    }
}
