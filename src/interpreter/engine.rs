// Execution engine for the simulator

use crate::console::Console;
use crate::interpreter::constants::MAX_CALL_DEPTH;
use crate::interpreter::entry;
use crate::interpreter::errors::RuntimeError;
use crate::memory::{scope::Scope, value::Value};
use crate::parser::ast::{Declarations, MethodDef};
use crate::parser::scan::{segments, Segment, SegmentKind};
use tracing::{debug, trace};

/// Control-flow state of the running method
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ControlSignal {
    #[default]
    Normal,
    Break,
    Continue,
    Returning(Value),
}

impl ControlSignal {
    pub fn is_normal(&self) -> bool {
        matches!(self, ControlSignal::Normal)
    }
}

/// Simulates one program run over the extracted declarations
pub struct Interpreter {
    /// Classes and methods found by the extractor
    decls: Declarations,

    /// Global layer plus one frame per active invocation
    pub(crate) scope: Scope,

    /// Captured console writes
    pub(crate) console: Console,

    /// Signal of the innermost running method
    pub(crate) signal: ControlSignal,

    /// Source line of the statement being executed
    pub(crate) current_line: usize,

    /// Declaring class of each active invocation, innermost last
    class_stack: Vec<Option<String>>,
}

impl Interpreter {
    pub fn new(decls: Declarations) -> Self {
        Interpreter {
            decls,
            scope: Scope::new(),
            console: Console::new(),
            signal: ControlSignal::Normal,
            current_line: 1,
            class_stack: Vec::new(),
        }
    }

    /// Run the program from its entry point to completion
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        let main = entry::resolve(&self.decls)
            .cloned()
            .ok_or(RuntimeError::NoEntryPoint)?;
        debug!(method = %main.key(), line = main.body_line, "entry point resolved");

        if let Some(class) = &main.owner {
            self.init_static_fields(class)?;
        }

        self.invoke(&main, Vec::new())?;
        Ok(())
    }

    /// Evaluate the static fields of `class` into the global layer
    fn init_static_fields(&mut self, class: &str) -> Result<(), RuntimeError> {
        let fields = match self.decls.classes.get(class) {
            Some(def) => def.fields.clone(),
            None => return Ok(()),
        };

        self.class_stack.push(Some(class.to_string()));
        for field in fields.iter().filter(|f| f.is_static) {
            self.current_line = field.line;
            let value = match &field.initializer {
                Some(text) => Some(self.evaluate(text, Some(&field.field_type))?),
                None => Value::default_for(&field.field_type),
            };
            if let Some(value) = value {
                trace!(field = %field.name, %value, "static field initialized");
                self.scope.set_global(&field.name, value);
            }
        }
        self.class_stack.pop();
        Ok(())
    }

    /// Invoke `method` with already-evaluated arguments and return its value
    ///
    /// A frame is pushed for the parameters and popped again whether or not
    /// the body faulted. The returned value is converted to the declared
    /// return type; a method that finishes without `return` yields Null.
    pub(crate) fn invoke(
        &mut self,
        method: &MethodDef,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        if self.class_stack.len() >= MAX_CALL_DEPTH {
            return Err(RuntimeError::CallDepthExceeded {
                method: method.key(),
                limit: MAX_CALL_DEPTH,
                line: self.current_line,
            });
        }

        let call_line = self.current_line;
        self.scope.push_frame(method.key());
        for ((tag, name), value) in method.param_list().into_iter().zip(args) {
            self.scope.set(&name, value.coerce(&tag));
        }
        self.class_stack.push(method.owner.clone());
        let caller_signal = std::mem::take(&mut self.signal);

        let result = self.execute_body(&method.body, method.body_line);

        let signal = std::mem::replace(&mut self.signal, caller_signal);
        self.class_stack.pop();
        self.scope.pop_frame();
        self.current_line = call_line;
        result?;

        Ok(match signal {
            ControlSignal::Returning(value) => value.coerce(&method.return_type),
            _ => Value::Null,
        })
    }

    /// Interpret a method body, starting at source line `first_line`
    pub(crate) fn execute_body(&mut self, body: &str, first_line: usize) -> Result<(), RuntimeError> {
        let segs = segments(body, first_line);
        self.execute_segments(&segs)
    }

    /// Walk statement segments until the list ends or the signal leaves Normal
    pub(crate) fn execute_segments(&mut self, segs: &[Segment]) -> Result<(), RuntimeError> {
        let mut i = 0;
        while i < segs.len() {
            if !self.signal.is_normal() {
                trace!(signal = ?self.signal, line = segs[i].line, "skipping rest of block");
                break;
            }
            let seg = &segs[i];
            self.current_line = seg.line;
            i = match seg.kind {
                // Bare `{ ... }` blocks are walked inline
                SegmentKind::BlockOpen if seg.text.is_empty() => i + 1,
                SegmentKind::BlockOpen => self.execute_block_header(segs, i)?,
                SegmentKind::BlockClose => i + 1,
                SegmentKind::Statement => {
                    self.execute_statement(&seg.text)?;
                    i + 1
                }
            };
        }
        Ok(())
    }

    /// Class whose method is currently running, if any
    pub(crate) fn current_class(&self) -> Option<&str> {
        self.class_stack.last().and_then(|c| c.as_deref())
    }

    pub(crate) fn declarations(&self) -> &Declarations {
        &self.decls
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Captured output so far
    pub fn output(&self) -> String {
        self.console.output()
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn signal(&self) -> &ControlSignal {
        &self.signal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::declarations::extract;
    use crate::parser::preprocess::SourceUnit;

    fn interpreter(src: &str) -> Interpreter {
        let unit = SourceUnit::new(src);
        Interpreter::new(extract(&unit.cleaned))
    }

    fn run(src: &str) -> (Result<(), RuntimeError>, String) {
        let mut interp = interpreter(src);
        let result = interp.run();
        (result, interp.output())
    }

    #[test]
    fn test_hello_world() {
        let (result, out) = run(
            "public class Main {\n  public static void main(String[] args) {\n    System.out.println(\"Hello\");\n  }\n}",
        );
        assert!(result.is_ok());
        assert_eq!(out, "Hello\n");
    }

    #[test]
    fn test_no_entry_point() {
        let (result, out) = run("public class Main { void helper() { } }");
        assert_eq!(result, Err(RuntimeError::NoEntryPoint));
        assert!(out.is_empty());
    }

    #[test]
    fn test_several_statements_on_one_line() {
        let (_, out) = run(
            "class A { public static void main(String[] a) { int x = 1; x++; System.out.print(x); System.out.print(\"!\"); } }",
        );
        assert_eq!(out, "2!");
    }

    #[test]
    fn test_static_fields_become_globals() {
        let (_, out) = run(
            "class A {\n static int base = 40;\n static String tag;\n public static void main(String[] a) {\n  System.out.println(base + 2);\n  System.out.println(\"[\" + tag + \"]\");\n }\n}",
        );
        assert_eq!(out, "42\n[]\n");
    }

    #[test]
    fn test_method_call_returns_value() {
        let (_, out) = run(
            "class A {\n static int twice(int n) {\n  return n * 2;\n }\n public static void main(String[] a) {\n  int r = twice(21);\n  System.out.println(r);\n }\n}",
        );
        assert_eq!(out, "42\n");
    }

    #[test]
    fn test_void_call_runs_body() {
        let (_, out) = run(
            "class A {\n static void greet(String who) {\n  System.out.println(\"Hi \" + who);\n }\n public static void main(String[] a) {\n  greet(\"Ann\");\n  greet(\"Bo\");\n }\n}",
        );
        assert_eq!(out, "Hi Ann\nHi Bo\n");
    }

    #[test]
    fn test_parameters_do_not_leak() {
        let mut interp = interpreter(
            "class A {\n static void f(int hidden) { }\n public static void main(String[] a) {\n  f(3);\n }\n}",
        );
        interp.run().expect("run");
        assert!(interp.scope().get("hidden").is_none());
        assert_eq!(interp.scope().depth(), 0);
    }

    #[test]
    fn test_unbounded_recursion_faults() {
        let (result, _) = run(
            "class A {\n static int down(int n) {\n  return down(n - 1);\n }\n public static void main(String[] a) {\n  down(3);\n }\n}",
        );
        match result {
            Err(RuntimeError::CallDepthExceeded { method, limit, .. }) => {
                assert_eq!(method, "A.down");
                assert_eq!(limit, MAX_CALL_DEPTH);
            }
            other => panic!("expected call depth fault, got {:?}", other),
        }
    }

    #[test]
    fn test_return_stops_main() {
        let (_, out) = run(
            "class A { public static void main(String[] a) { System.out.print(1); return; System.out.print(2); } }",
        );
        assert_eq!(out, "1");
    }
}
