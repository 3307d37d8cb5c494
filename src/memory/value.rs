//! Runtime value representation
//!
//! This module defines the [`Value`] enum, the only thing the expression
//! evaluator ever produces. Values are tagged; there are no object references
//! because no instances are modelled.
//!
//! # Value Types
//!
//! - [`Value::Int`]: 32-bit signed integer (`int`, `short`, `byte`)
//! - [`Value::Long`]: 64-bit signed integer
//! - [`Value::Double`]: 64-bit float (`double`, `float`)
//! - [`Value::Bool`], [`Value::Char`], [`Value::Str`]
//! - [`Value::Null`]: `null`, and the result of a `void` call
//!
//! # Narrowing
//!
//! Arithmetic is done in `f64`; [`Value::from_f64`] turns a result with a zero
//! fractional part back into an integer value.

use crate::parser::ast::TypeTag;
use std::fmt;

/// Runtime values in the interpreter
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    Int(i32),
    Long(i64),
    Double(f64),
    Bool(bool),
    Char(char),
    Str(String),
    #[default]
    Null,
}

impl Value {
    /// Narrow an arithmetic result: integral results become `Int` (or `Long`
    /// when out of `i32` range), everything else stays `Double`.
    pub fn from_f64(n: f64) -> Value {
        if n.is_finite() && n.fract() == 0.0 {
            if n >= i32::MIN as f64 && n <= i32::MAX as f64 {
                return Value::Int(n as i32);
            }
            if n >= i64::MIN as f64 && n <= i64::MAX as f64 {
                return Value::Long(n as i64);
            }
        }
        Value::Double(n)
    }

    /// Default value of a freshly declared variable, `None` for unknown types
    pub fn default_for(tag: &TypeTag) -> Option<Value> {
        match tag {
            TypeTag::Int | TypeTag::Short | TypeTag::Byte => Some(Value::Int(0)),
            TypeTag::Long => Some(Value::Long(0)),
            TypeTag::Double | TypeTag::Float => Some(Value::Double(0.0)),
            TypeTag::Boolean => Some(Value::Bool(false)),
            TypeTag::Char => Some(Value::Char('\0')),
            TypeTag::String => Some(Value::Str(String::new())),
            TypeTag::Void | TypeTag::Other(_) => None,
        }
    }

    /// The type this value was produced as, `None` for null
    pub fn tag(&self) -> Option<TypeTag> {
        match self {
            Value::Int(_) => Some(TypeTag::Int),
            Value::Long(_) => Some(TypeTag::Long),
            Value::Double(_) => Some(TypeTag::Double),
            Value::Bool(_) => Some(TypeTag::Boolean),
            Value::Char(_) => Some(TypeTag::Char),
            Value::Str(_) => Some(TypeTag::String),
            Value::Null => None,
        }
    }

    /// Numeric view of `Int`, `Long` and `Double`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Long(n) => Some(*n as f64),
            Value::Double(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.as_f64().is_some()
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert to the declared type of the variable receiving it
    ///
    /// Conversions that make no sense leave the value unchanged.
    pub fn coerce(self, tag: &TypeTag) -> Value {
        match (tag, self) {
            (TypeTag::Int | TypeTag::Short | TypeTag::Byte, Value::Long(n)) => Value::Int(n as i32),
            (TypeTag::Int | TypeTag::Short | TypeTag::Byte, Value::Double(n)) => {
                Value::Int(n as i32)
            }
            (TypeTag::Int | TypeTag::Short | TypeTag::Byte, Value::Char(c)) => {
                Value::Int(c as i32)
            }
            (TypeTag::Long, Value::Int(n)) => Value::Long(n as i64),
            (TypeTag::Long, Value::Double(n)) => Value::Long(n as i64),
            (TypeTag::Long, Value::Char(c)) => Value::Long(c as i64),
            (TypeTag::Double | TypeTag::Float, Value::Int(n)) => Value::Double(n as f64),
            (TypeTag::Double | TypeTag::Float, Value::Long(n)) => Value::Double(n as f64),
            (TypeTag::Double | TypeTag::Float, Value::Char(c)) => Value::Double(c as u32 as f64),
            (TypeTag::Char, Value::Int(n)) => {
                char::from_u32(n as u32).map(Value::Char).unwrap_or(Value::Int(n))
            }
            (TypeTag::String, Value::Null) => Value::Null,
            (TypeTag::String, v @ Value::Str(_)) => v,
            (TypeTag::String, v) => Value::Str(v.to_string()),
            (_, v) => v,
        }
    }

    /// Source text that evaluates back to this value, used when an inner
    /// result is spliced into the surrounding expression text
    pub fn to_literal(&self) -> String {
        match self {
            Value::Str(s) => format!("\"{}\"", escape(s)),
            Value::Char('\'') => "'\\''".to_string(),
            Value::Char('\\') => "'\\\\'".to_string(),
            Value::Char(c) => format!("'{}'", c),
            other => other.to_string(),
        }
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Long(n) => write!(f, "{}", n),
            Value::Double(n) if n.is_nan() => write!(f, "NaN"),
            Value::Double(n) if n.is_infinite() => {
                write!(f, "{}Infinity", if *n < 0.0 { "-" } else { "" })
            }
            Value::Double(n) if n.fract() == 0.0 => write!(f, "{:.1}", n),
            Value::Double(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Char(c) => write!(f, "{}", c),
            Value::Str(s) => write!(f, "{}", s),
            Value::Null => write!(f, "null"),
        }
    }
}
