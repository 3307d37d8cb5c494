//! Built-in library calls
//!
//! A handful of standard-library calls that teaching programs use constantly
//! are evaluated directly rather than looked up in the declaration table.
//!
//! # Supported Built-ins
//!
//! - `Math.max`, `Math.min`, `Math.abs`: keep integer results integral
//! - `Math.pow`, `Math.sqrt`: always floating
//! - `String.valueOf(x)`, `Integer.parseInt(s)`
//! - on a String variable: `length()`, `charAt(i)`, `toUpperCase()`,
//!   `toLowerCase()`, `equals(x)`
//! - constants: `Math.PI`, `Math.E`, `Integer.MAX_VALUE`, `Integer.MIN_VALUE`
//!
//! A builtin given arguments it cannot use returns `None`, and the caller
//! treats the call like any other unknown call.

use crate::interpreter::engine::Interpreter;
use crate::memory::value::Value;
use tracing::trace;

impl Interpreter {
    pub(crate) fn call_builtin(&self, name: &str, args: &[Value]) -> Option<Value> {
        match (name, args) {
            ("Math.max", [a, b]) => numeric_pair(a, b, f64::max),
            ("Math.min", [a, b]) => numeric_pair(a, b, f64::min),
            ("Math.abs", [a]) => match a {
                Value::Int(n) => Some(Value::Int(n.wrapping_abs())),
                Value::Long(n) => Some(Value::Long(n.wrapping_abs())),
                Value::Double(n) => Some(Value::Double(n.abs())),
                _ => None,
            },
            ("Math.pow", [a, b]) => Some(Value::Double(a.as_f64()?.powf(b.as_f64()?))),
            ("Math.sqrt", [a]) => Some(Value::Double(a.as_f64()?.sqrt())),
            ("String.valueOf", [a]) => Some(Value::Str(a.to_string())),
            ("Integer.parseInt", [Value::Str(s)]) => Some(match s.trim().parse::<i32>() {
                Ok(n) => Value::Int(n),
                Err(_) => {
                    trace!(input = %s, "unparseable integer counts as zero");
                    Value::Int(0)
                }
            }),
            _ => self.call_string_method(name, args),
        }
    }

    /// `receiver.method(args)` where `receiver` currently holds a String
    fn call_string_method(&self, name: &str, args: &[Value]) -> Option<Value> {
        let (receiver, method) = name.rsplit_once('.')?;
        let Value::Str(s) = self.lookup(receiver)? else {
            return None;
        };
        match (method, args) {
            ("length", []) => Some(Value::Int(s.chars().count() as i32)),
            ("charAt", [index]) => {
                let index = usize::try_from(index.as_f64()? as i64).ok()?;
                s.chars().nth(index).map(Value::Char)
            }
            ("toUpperCase", []) => Some(Value::Str(s.to_uppercase())),
            ("toLowerCase", []) => Some(Value::Str(s.to_lowercase())),
            ("equals", [other]) => Some(Value::Bool(matches!(other, Value::Str(t) if *t == s))),
            _ => None,
        }
    }
}

/// Apply `f` to two numbers; the result stays integral unless an argument
/// was floating
fn numeric_pair(a: &Value, b: &Value, f: fn(f64, f64) -> f64) -> Option<Value> {
    let n = f(a.as_f64()?, b.as_f64()?);
    if matches!(a, Value::Double(_)) || matches!(b, Value::Double(_)) {
        Some(Value::Double(n))
    } else {
        Some(Value::from_f64(n))
    }
}

/// Library constants that read like variables
pub(crate) fn builtin_constant(name: &str) -> Option<Value> {
    match name {
        "Math.PI" => Some(Value::Double(std::f64::consts::PI)),
        "Math.E" => Some(Value::Double(std::f64::consts::E)),
        "Integer.MAX_VALUE" => Some(Value::Int(i32::MAX)),
        "Integer.MIN_VALUE" => Some(Value::Int(i32::MIN)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::Declarations;

    fn interp() -> Interpreter {
        Interpreter::new(Declarations::default())
    }

    #[test]
    fn test_math() {
        let mut i = interp();
        assert_eq!(i.evaluate("Math.max(3, 9)", None).unwrap(), Value::Int(9));
        assert_eq!(i.evaluate("Math.min(2.5, 9)", None).unwrap(), Value::Double(2.5));
        assert_eq!(i.evaluate("Math.abs(-4)", None).unwrap(), Value::Int(4));
        assert_eq!(i.evaluate("Math.pow(2, 10)", None).unwrap(), Value::Double(1024.0));
        assert_eq!(i.evaluate("Math.sqrt(2.25)", None).unwrap(), Value::Double(1.5));
        assert_eq!(i.evaluate("Math.max(1, Math.abs(-7)) * 2", None).unwrap(), Value::Int(14));
    }

    #[test]
    fn test_conversions() {
        let mut i = interp();
        assert_eq!(i.evaluate("String.valueOf(12)", None).unwrap(), Value::Str("12".into()));
        assert_eq!(i.evaluate("Integer.parseInt(\"42\") + 1", None).unwrap(), Value::Int(43));
        assert_eq!(i.evaluate("Integer.parseInt(\"4x\")", None).unwrap(), Value::Int(0));
    }

    #[test]
    fn test_string_methods() {
        let mut i = interp();
        i.scope.set("word", Value::Str("Hello".into()));
        assert_eq!(i.evaluate("word.length()", None).unwrap(), Value::Int(5));
        assert_eq!(i.evaluate("word.charAt(1)", None).unwrap(), Value::Char('e'));
        assert_eq!(i.evaluate("word.toUpperCase()", None).unwrap(), Value::Str("HELLO".into()));
        assert_eq!(i.evaluate("word.equals(\"Hello\")", None).unwrap(), Value::Bool(true));
        assert_eq!(i.evaluate("word.length() * 2", None).unwrap(), Value::Int(10));
    }

    #[test]
    fn test_constants() {
        let mut i = interp();
        assert_eq!(i.evaluate("Integer.MAX_VALUE", None).unwrap(), Value::Int(i32::MAX));
        assert!(matches!(i.evaluate("Math.PI * 2", None).unwrap(), Value::Double(_)));
    }
}
