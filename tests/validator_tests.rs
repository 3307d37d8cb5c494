use javasim::parser::preprocess::SourceUnit;
use javasim::validator::{validate, Diagnostics};

fn check(source: &str) -> Diagnostics {
    validate(&SourceUnit::new(source))
}

fn messages(diags: &[javasim::validator::Diagnostic]) -> Vec<String> {
    diags.iter().map(|d| d.to_string()).collect()
}

#[test]
fn test_clean_program_has_no_diagnostics() {
    let diags = check(
        r#"public class Main {
    static int twice(int n) {
        return n * 2;
    }

    public static void main(String[] args) {
        String name = "Ann";
        System.out.println(name.length() + twice(2));
    }
}
"#,
    );
    assert!(diags.errors.is_empty(), "{:?}", messages(&diags.errors));
    assert!(diags.warnings.is_empty(), "{:?}", messages(&diags.warnings));
}

#[test]
fn test_every_unbalanced_kind_is_reported() {
    let diags = check("public class Main { void f( { int[ x; }");
    let errors = messages(&diags.errors);
    assert!(errors.iter().any(|e| e.contains("Unbalanced curly braces")));
    assert!(errors.iter().any(|e| e.contains("Unbalanced parentheses")));
    assert!(errors.iter().any(|e| e.contains("Unbalanced square brackets")));
}

#[test]
fn test_brackets_in_literals_and_comments_are_ignored() {
    let diags = check(
        "public class Main {\n    // a stray { here\n    String s = \"(((\";\n    char c = '}';\n}\n",
    );
    assert!(!diags.has_errors(), "{:?}", messages(&diags.errors));
}

#[test]
fn test_missing_semicolon_reports_line() {
    let diags = check("public class Main {\n    int x = 1\n}\n");
    assert_eq!(diags.errors.len(), 1);
    assert_eq!(diags.errors[0].line, Some(2));
    assert!(diags.errors[0].message.contains("Missing semicolon"));
}

#[test]
fn test_type_mismatch_in_declaration() {
    let diags = check("public class Main {\n    int count = \"three\";\n}\n");
    assert_eq!(diags.error_lines(), vec![2]);
    assert!(diags.errors[0].message.contains("Type mismatch"));
}

#[test]
fn test_unreachable_code_after_return_warns() {
    let diags = check(
        "public class Main {\n    static int f() {\n        return 1;\n        int x = 2;\n    }\n}\n",
    );
    assert!(!diags.has_errors());
    assert_eq!(diags.warning_lines(), vec![4]);
}

#[test]
fn test_final_constants_may_be_uppercase() {
    let diags = check(
        "public class Main {\n    static final int MAX_SIZE = 10;\n    int Size = 3;\n}\n",
    );
    assert_eq!(diags.warning_lines(), vec![3]);
}

#[test]
fn test_wildcard_and_used_imports_do_not_warn() {
    let diags = check(
        "import java.util.*;\nimport java.util.List;\npublic class Main {\n    List<String> items;\n}\n",
    );
    assert!(diags.warnings.is_empty(), "{:?}", messages(&diags.warnings));
}
