// End-to-end tests for the validate-then-simulate pipeline

use javasim::compile_and_run;

/// Wrap `body` in a `Main` class with a canonical `main`
fn program(body: &str) -> String {
    format!(
        "public class Main {{\n    public static void main(String[] args) {{\n{}\n    }}\n}}\n",
        body
    )
}

#[test]
fn test_single_line_program() {
    let result = compile_and_run(
        r#"public class Main { public static void main(String[] args) { int x = 5; System.out.println("Value: " + x); } }"#,
    );

    assert!(result.success, "{}", result.message);
    assert_eq!(result.message, "Compilation successful");
    assert_eq!(result.output, "Value: 5\n");
}

#[test]
fn test_unbalanced_braces_fail() {
    let result = compile_and_run(
        r#"public class Main { public static void main(String[] args) { int x = 1; }"#,
    );

    assert!(!result.success);
    assert!(
        result.message.contains("Unbalanced curly braces"),
        "{}",
        result.message
    );
    assert!(result.output.is_empty());
}

#[test]
fn test_missing_type_declaration_fails() {
    let result = compile_and_run("int x = 5;\nSystem.out.println(x);\n");

    assert!(!result.success);
    assert!(result
        .message
        .contains("No class, interface, or enum declaration found"));
    assert!(result.output.is_empty());
}

#[test]
fn test_bad_main_signature_fails() {
    let result = compile_and_run(
        "public class Main {\n    static void main(String[] args) {\n        System.out.println(1);\n    }\n}\n",
    );

    assert!(!result.success);
    assert!(result.message.contains("Invalid main method signature"));
}

#[test]
fn test_repeated_runs_are_independent() {
    let source = program(
        "        int total = 10;\n        total += 5;\n        System.out.println(total);",
    );

    let first = compile_and_run(&source);
    let second = compile_and_run(&source);

    assert_eq!(first, second);
    assert_eq!(first.output, "15\n");
}

#[test]
fn test_compound_assignment_and_increment() {
    let result = compile_and_run(&program(
        "        int total = 10;\n        total += 5;\n        total -= 3;\n        total *= 2;\n        total++;\n        System.out.println(total);",
    ));

    assert!(result.success, "{}", result.message);
    assert_eq!(result.output, "25\n");
}

#[test]
fn test_print_and_println_share_a_line() {
    let result = compile_and_run(&program(
        "        System.out.print(\"a\");\n        System.out.print(\"b\");\n        System.out.println();\n        System.out.println(\"c\");",
    ));

    assert_eq!(result.output, "ab\nc\n");
}

#[test]
fn test_infinite_for_loop_is_capped() {
    let result = compile_and_run(&program("        for (;;) {\n        }"));

    assert!(result.success, "{}", result.message);
    let lines: Vec<&str> = result.output.lines().collect();
    assert_eq!(lines.len(), 1000);
    assert_eq!(lines[0], "Loop iteration 1");
    assert_eq!(lines[999], "Loop iteration 1000");
}

#[test]
fn test_static_methods_and_qualified_calls() {
    let source = r#"public class Main {
    static int square(int n) {
        return n * n;
    }

    static void show(String label, int value) {
        System.out.println(label + ": " + value);
    }

    public static void main(String[] args) {
        int a = square(3);
        show("square", a);
        show("qualified", Main.square(4) + 1);
    }
}
"#;
    let result = compile_and_run(source);

    assert!(result.success, "{}", result.message);
    assert_eq!(result.output, "square: 9\nqualified: 17\n");
}

#[test]
fn test_assignment_in_callee_shadows_static_field() {
    let source = r#"public class Main {
    static int count = 1;

    static void bump() {
        count = 5;
        System.out.println(count);
    }

    public static void main(String[] args) {
        bump();
        System.out.println(count);
    }
}
"#;
    let result = compile_and_run(source);

    assert!(result.success, "{}", result.message);
    assert_eq!(result.output, "5\n1\n");
}

#[test]
fn test_if_header_is_traced_not_executed() {
    let result = compile_and_run(&program(
        "        int x = 3;\n        if (x == 3) {\n            System.out.println(\"inside\");\n        }\n        System.out.println(\"after\");",
    ));

    assert_eq!(
        result.output,
        "If condition (x == 3) evaluated to true\nafter\n"
    );
}

#[test]
fn test_runtime_error_keeps_partial_output() {
    let source = r#"public class Main {
    static int down(int n) {
        return down(n - 1);
    }

    public static void main(String[] args) {
        System.out.println("start");
        down(5);
        System.out.println("never");
    }
}
"#;
    let result = compile_and_run(source);

    assert!(!result.success);
    assert!(
        result
            .message
            .starts_with("Runtime error: Call depth limit of 64 exceeded"),
        "{}",
        result.message
    );
    assert_eq!(result.output, "start\n");
}

#[test]
fn test_warnings_do_not_block_execution() {
    let source = r#"import java.util.Scanner;

public class Main {
    public static void main(String[] args) {
        int Total = 2;
        System.out.println(Total);
    }
}
"#;
    let result = compile_and_run(source);

    assert!(result.success);
    assert_eq!(result.diagnostics.warnings.len(), 2);
    assert!(result.message.contains("Line 1: Unused import 'java.util.Scanner'"));
    assert!(result
        .message
        .contains("Line 5: Variable 'Total' should start with a lowercase letter (camelCase)"));
    assert_eq!(result.output, "2\n");
}

#[test]
fn test_comments_are_ignored() {
    let source = r#"public class Main {
    /* block comment with "quotes" and { braces */
    public static void main(String[] args) {
        // System.out.println("hidden");
        System.out.println("shown // not a comment");
    }
}
"#;
    let result = compile_and_run(source);

    assert!(result.success, "{}", result.message);
    assert_eq!(result.output, "shown // not a comment\n");
}

#[test]
fn test_long_expressions_return_a_result() {
    let sum = vec!["(1)"; 5000].join(" + ");
    let result = compile_and_run(&program(&format!("        System.out.println({});", sum)));
    assert!(result.success, "{}", result.message);
    assert_eq!(result.output, "5000\n");

    let nested = format!("{}1{}", "(".repeat(5000), ")".repeat(5000));
    let result = compile_and_run(&program(&format!("        System.out.println({});", nested)));
    assert!(result.success, "{}", result.message);
    assert_eq!(result.output, format!("{}\n", nested));
}
