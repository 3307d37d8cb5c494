//! Expression and condition evaluation
//!
//! Expressions are evaluated straight from their source text. The first rule
//! that applies wins:
//!
//! 1. literals: string, char, `true`/`false`, `null`, integer, decimal
//! 2. a variable (or builtin constant) naming the whole expression
//! 3. parentheses, innermost first: a call is invoked, a cast is dropped, a
//!    group is evaluated; the result is spliced back as literal text and the
//!    whole expression is evaluated again
//! 4. pure arithmetic: every operand of `+ - * / %` is a number or a numeric
//!    variable
//! 5. concatenation: a `+` with at least one string operand joins the
//!    stringified operands left to right
//! 6. any other text with an arithmetic operator is computed arithmetically,
//!    unknown operands counting as zero
//! 7. anything else is echoed back unchanged
//!
//! Arithmetic runs in `f64` with `* / %` before `+ -`, left to right within a
//! level, and narrows results with no fractional part back to integers.
//!
//! Nothing here fails on malformed input. The only error that passes through
//! is a fault from a method invoked inside the expression.

use crate::interpreter::builtins::builtin_constant;
use crate::interpreter::constants::MAX_GROUP_DEPTH;
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::{MethodDef, TypeTag};
use crate::parser::scan::{
    find_matching, is_ident_char, is_ident_start, literal_end, mask_literals, split_top_level,
};
use tracing::trace;

const ARITHMETIC_OPS: &[u8] = b"+-*/%";

/// Operators the condition evaluator knows how to compare with
const CONDITION_OPS: &[&str] = &["==", "!=", "<"];

/// Operators a condition may contain that always make it false
const UNSUPPORTED_CONDITION_OPS: &[&str] = &[">", "<=", ">=", "&&", "||"];

/// Result of resolving expression text
#[derive(Debug, Clone, PartialEq)]
enum Resolved {
    Value(Value),
    /// Text that could not be resolved, carried through unchanged
    Echo(String),
}

impl Resolved {
    fn into_value(self) -> Value {
        match self {
            Resolved::Value(value) => value,
            Resolved::Echo(text) => Value::Str(text),
        }
    }

    /// Text to splice back into an enclosing expression
    fn splice_text(&self) -> String {
        match self {
            Resolved::Value(value) => value.to_literal(),
            Resolved::Echo(text) => text.clone(),
        }
    }
}

/// What a parenthesised group turned out to be
enum Group {
    /// Replace the group (and its callee, if any) with this text
    Splice { start: usize, end: usize, text: String },
    /// A call to something unknown; the whole expression is unresolvable
    Unknown,
}

impl Interpreter {
    /// Evaluate `expr`, converting the result to `hint` when one is given
    pub(crate) fn evaluate(
        &mut self,
        expr: &str,
        hint: Option<&TypeTag>,
    ) -> Result<Value, RuntimeError> {
        let expr = expr.trim();
        let value = if hint == Some(&TypeTag::Boolean) && has_comparison(expr) {
            Value::Bool(self.evaluate_condition(expr)?)
        } else {
            self.resolve(expr)?.into_value()
        };
        Ok(match hint {
            Some(tag) => value.coerce(tag),
            None => value,
        })
    }

    fn resolve(&mut self, expr: &str) -> Result<Resolved, RuntimeError> {
        let mut expr = expr.trim().to_string();

        let depth = group_depth(&mask_literals(&expr));
        if depth > MAX_GROUP_DEPTH {
            trace!(depth, limit = MAX_GROUP_DEPTH, "expression nested too deeply, echoing");
            return Ok(Resolved::Echo(expr));
        }

        // Each pass resolves one parenthesis group and splices its result back
        loop {
            let text = expr.trim();

            if let Some(value) = literal_value(text) {
                return Ok(Resolved::Value(value));
            }
            if let Some(value) = self.lookup(text) {
                return Ok(Resolved::Value(value));
            }
            // Instances are not modelled
            if text.starts_with("new ") {
                return Ok(Resolved::Echo(text.to_string()));
            }

            let masked = mask_literals(text);
            if masked.contains('(') && masked.contains(')') {
                match self.resolve_innermost_group(text, &masked)? {
                    Some(Group::Splice { start, end, text: piece }) => {
                        expr = format!("{}{}{}", &text[..start], piece, &text[end..]);
                        continue;
                    }
                    Some(Group::Unknown) => {
                        trace!(expr = text, "unknown call, echoing expression");
                        return Ok(Resolved::Echo(text.to_string()));
                    }
                    None => {}
                }
            }

            return self.resolve_flat(text, &masked);
        }
    }

    /// Resolution once no parenthesis group is left to take apart
    fn resolve_flat(&mut self, expr: &str, masked: &str) -> Result<Resolved, RuntimeError> {
        if self.is_pure_numeric(expr, masked) {
            return Ok(Resolved::Value(self.arithmetic(expr)));
        }

        if masked.contains('+') {
            let operands = split_top_level(expr, b'+');
            if operands.len() > 1 && operands.iter().any(|op| self.is_string_operand(op)) {
                let mut joined = String::new();
                for operand in operands {
                    joined.push_str(&self.resolve(operand)?.into_value().to_string());
                }
                return Ok(Resolved::Value(Value::Str(joined)));
            }
        }

        if masked.bytes().any(|b| ARITHMETIC_OPS.contains(&b)) {
            return Ok(Resolved::Value(self.arithmetic(expr)));
        }

        Ok(Resolved::Echo(expr.to_string()))
    }

    /// Resolve the first closing parenthesis and the opening one paired with it
    fn resolve_innermost_group(
        &mut self,
        expr: &str,
        masked: &str,
    ) -> Result<Option<Group>, RuntimeError> {
        let Some(close) = masked.find(')') else {
            return Ok(None);
        };
        let Some(open) = masked[..close].rfind('(') else {
            return Ok(None);
        };
        let inner = &expr[open + 1..close];
        let (callee_start, callee) = callee_before(expr, open);

        if callee.is_empty() {
            let text = if is_cast(inner) {
                String::new()
            } else {
                self.resolve(inner)?.splice_text()
            };
            return Ok(Some(Group::Splice {
                start: open,
                end: close + 1,
                text,
            }));
        }

        let mut args = Vec::new();
        if !inner.trim().is_empty() {
            for arg in split_top_level(inner, b',') {
                args.push(self.resolve(arg)?.into_value());
            }
        }
        Ok(Some(match self.call(callee, args)? {
            Some(value) => Group::Splice {
                start: callee_start,
                end: close + 1,
                text: value.to_literal(),
            },
            None => Group::Unknown,
        }))
    }

    /// Call a builtin or a user method; `None` when `name` is neither
    fn call(&mut self, name: &str, args: Vec<Value>) -> Result<Option<Value>, RuntimeError> {
        if let Some(value) = self.call_builtin(name, &args) {
            return Ok(Some(value));
        }
        match self.find_method(name) {
            Some(method) => {
                trace!(method = %method.key(), args = args.len(), "invoking method");
                self.invoke(&method, args).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Bare names resolve to a free method, then a method of the running
    /// class, then a method of any class. `Class.name` is looked up directly.
    fn find_method(&self, name: &str) -> Option<MethodDef> {
        let name = name.strip_prefix("this.").unwrap_or(name);
        let decls = self.declarations();
        if name.contains('.') {
            return decls.methods.get(name).cloned();
        }
        decls
            .free_method(name)
            .or_else(|| {
                self.current_class()
                    .and_then(|class| decls.classes.get(class))
                    .and_then(|class| class.method(name))
            })
            .or_else(|| decls.classes.values().find_map(|class| class.method(name)))
            .cloned()
    }

    /// Current value of a variable, qualified static field or builtin constant
    pub(crate) fn lookup(&self, name: &str) -> Option<Value> {
        let name = name.strip_prefix("this.").unwrap_or(name);
        if name.is_empty() || !name.starts_with(is_ident_start) {
            return None;
        }
        if let Some(value) = self.scope.get(name) {
            return Some(value.clone());
        }
        if let Some((class, field)) = name.split_once('.') {
            if self.declarations().classes.contains_key(class) {
                if let Some(value) = self.scope.get(field) {
                    return Some(value.clone());
                }
            }
        }
        builtin_constant(name)
    }

    fn is_pure_numeric(&self, expr: &str, masked: &str) -> bool {
        if masked.contains('"') || masked.contains('\'') {
            return false;
        }
        let mut operands = expr
            .split(|c: char| c.is_ascii() && ARITHMETIC_OPS.contains(&(c as u8)))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .peekable();
        operands.peek().is_some()
            && operands.all(|t| {
                parse_number(t).is_some() || self.lookup(t).is_some_and(|v| v.is_numeric())
            })
    }

    fn is_string_operand(&self, operand: &str) -> bool {
        let operand = operand.trim();
        is_string_literal(operand) || self.lookup(operand).is_some_and(|v| v.is_string())
    }

    /// Two-pass arithmetic over `+ - * / %`; never fails
    pub(crate) fn arithmetic(&self, expr: &str) -> Value {
        let bytes = expr.as_bytes();
        let mut operands: Vec<f64> = Vec::new();
        let mut operators: Vec<u8> = Vec::new();
        let mut expect_operand = true;
        let mut sign = 1.0;
        let mut i = 0;

        while i < bytes.len() {
            let b = bytes[i];
            if b.is_ascii_whitespace() {
                i += 1;
                continue;
            }
            if expect_operand {
                // A sign only where an operand is expected: at the start or
                // right after another operator
                match b {
                    b'-' => {
                        sign = -sign;
                        i += 1;
                        continue;
                    }
                    b'+' => {
                        i += 1;
                        continue;
                    }
                    _ => {}
                }
                let start = i;
                while i < bytes.len() && !ARITHMETIC_OPS.contains(&bytes[i]) {
                    if bytes[i] == b'"' || bytes[i] == b'\'' {
                        i = literal_end(bytes, i);
                    } else {
                        i += 1;
                    }
                }
                operands.push(sign * self.operand_value(expr[start..i].trim()));
                sign = 1.0;
                expect_operand = false;
            } else {
                if ARITHMETIC_OPS.contains(&b) {
                    operators.push(b);
                    expect_operand = true;
                }
                i += 1;
            }
        }
        if expect_operand && !operators.is_empty() {
            operands.push(0.0); // dangling operator
        }
        let Some((&first, rest)) = operands.split_first() else {
            return Value::Int(0);
        };

        // Multiplicative level first, folding into the running term
        let mut terms = vec![first];
        let mut additive = Vec::new();
        for (&op, &rhs) in operators.iter().zip(rest) {
            let Some(last) = terms.last_mut() else {
                break;
            };
            match op {
                b'*' => *last *= rhs,
                b'/' => *last /= rhs,
                b'%' => *last %= rhs,
                _ => {
                    additive.push(op);
                    terms.push(rhs);
                }
            }
        }

        let mut total = terms[0];
        for (&op, &term) in additive.iter().zip(&terms[1..]) {
            if op == b'+' {
                total += term;
            } else {
                total -= term;
            }
        }
        Value::from_f64(total)
    }

    fn operand_value(&self, text: &str) -> f64 {
        let value = literal_value(text).or_else(|| self.lookup(text));
        match value {
            Some(Value::Char(c)) => c as u32 as f64,
            Some(v) if v.is_numeric() => v.as_f64().unwrap_or(0.0),
            _ => {
                trace!(operand = text, "non-numeric operand counts as zero");
                0.0
            }
        }
    }

    /// Evaluate a loop or `if` condition
    ///
    /// Only `==`, `!=` and `<` compare; a condition containing `>`, `<=`, `>=`,
    /// `&&` or `||` is always false. Without an operator the condition is its
    /// own boolean value, and an empty condition is true.
    pub(crate) fn evaluate_condition(&mut self, cond: &str) -> Result<bool, RuntimeError> {
        let cond = cond.trim();
        if cond.is_empty() {
            return Ok(true);
        }
        let masked = mask_literals(cond);
        if UNSUPPORTED_CONDITION_OPS.iter().any(|op| masked.contains(op)) {
            trace!(cond, "unsupported condition operator");
            return Ok(false);
        }

        for op in CONDITION_OPS {
            if let Some(at) = masked.find(op) {
                let lhs = self.evaluate(&cond[..at], None)?;
                let rhs = self.evaluate(&cond[at + op.len()..], None)?;
                return Ok(match *op {
                    "==" => values_equal(&lhs, &rhs),
                    "!=" => !values_equal(&lhs, &rhs),
                    _ => less_than(&lhs, &rhs),
                });
            }
        }

        Ok(self.evaluate(cond, None)?.as_bool().unwrap_or(false))
    }
}

/// Numeric view for comparisons; chars compare by code point
fn comparable(value: &Value) -> Option<f64> {
    match value {
        Value::Char(c) => Some(*c as u32 as f64),
        other => other.as_f64(),
    }
}

pub(crate) fn values_equal(a: &Value, b: &Value) -> bool {
    match (comparable(a), comparable(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a.to_string() == b.to_string(),
    }
}

fn less_than(a: &Value, b: &Value) -> bool {
    match (comparable(a), comparable(b)) {
        (Some(x), Some(y)) => x < y,
        _ => false,
    }
}

fn has_comparison(expr: &str) -> bool {
    let masked = mask_literals(expr);
    ["==", "!=", "<", ">", "&&", "||"]
        .iter()
        .any(|op| masked.contains(op))
}

/// Deepest parenthesis nesting in masked text
fn group_depth(masked: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0;
    for b in masked.bytes() {
        match b {
            b'(' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

/// The (possibly qualified) name written directly before `open`, and where it
/// starts. Empty when the parenthesis is a plain group.
fn callee_before(expr: &str, open: usize) -> (usize, &str) {
    let head = expr[..open].trim_end();
    let start = head
        .char_indices()
        .rev()
        .find(|&(_, c)| !(is_ident_char(c) || c == '.'))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let name = &head[start..];
    if name.starts_with(is_ident_start) {
        (start, name)
    } else {
        (open, "")
    }
}

/// `(int)`, `(double)`, `(String)`: casts are left to the receiving type
fn is_cast(inner: &str) -> bool {
    let inner = inner.trim();
    (TypeTag::is_primitive_keyword(inner) && inner != "void") || inner == "String"
}

fn is_string_literal(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() >= 2
        && bytes[0] == b'"'
        && literal_end(bytes, 0) == bytes.len()
        && bytes[bytes.len() - 1] == b'"'
}

/// Literal syntax: string, char, boolean, null, integer and decimal
pub(crate) fn literal_value(text: &str) -> Option<Value> {
    let bytes = text.as_bytes();
    match bytes.first()? {
        b'"' if is_string_literal(text) => {
            return Some(Value::Str(unescape(&text[1..text.len() - 1])));
        }
        b'\'' if bytes.len() >= 3
            && literal_end(bytes, 0) == bytes.len()
            && bytes[bytes.len() - 1] == b'\'' =>
        {
            let inner = unescape(&text[1..text.len() - 1]);
            let mut chars = inner.chars();
            return match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Value::Char(c)),
                _ => None,
            };
        }
        _ => {}
    }
    match text {
        "true" => Some(Value::Bool(true)),
        "false" => Some(Value::Bool(false)),
        "null" => Some(Value::Null),
        _ => parse_number(text),
    }
}

/// `-?\d+` (optionally `L`), `-?\d+.\d+` (optionally `f`/`d`), `-?\d+[fd]`
pub(crate) fn parse_number(text: &str) -> Option<Value> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    let negative = digits.len() != text.len();
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    if let Some(whole) = digits.strip_suffix(['l', 'L']) {
        if all_digits(whole) {
            let n: i64 = whole.parse().ok()?;
            return Some(Value::Long(if negative { -n } else { n }));
        }
    }
    if all_digits(digits) {
        let signed = if negative { format!("-{}", digits) } else { digits.to_string() };
        return Some(match signed.parse::<i64>() {
            Ok(n) => match i32::try_from(n) {
                Ok(small) => Value::Int(small),
                Err(_) => Value::Long(n),
            },
            Err(_) => Value::Double(signed.parse().ok()?),
        });
    }

    let decimal = digits.strip_suffix(['f', 'F', 'd', 'D']).unwrap_or(digits);
    let is_decimal = match decimal.split_once('.') {
        Some((whole, frac)) => {
            (all_digits(whole) || whole.is_empty())
                && (all_digits(frac) || frac.is_empty())
                && !(whole.is_empty() && frac.is_empty())
        }
        None => decimal.len() != digits.len() && all_digits(decimal),
    };
    if !is_decimal {
        return None;
    }
    let n: f64 = decimal.parse().ok()?;
    Some(Value::Double(if negative { -n } else { n }))
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Split `for (...) rest` into the text inside the first parentheses and
/// whatever follows the closing one
pub(crate) fn paren_group(text: &str) -> Option<(&str, &str)> {
    let open = mask_literals(text).find('(')?;
    let close = find_matching(text, open)?;
    Some((&text[open + 1..close], &text[close + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::Declarations;

    fn interp() -> Interpreter {
        Interpreter::new(Declarations::default())
    }

    fn eval(interp: &mut Interpreter, expr: &str) -> Value {
        interp.evaluate(expr, None).expect("evaluation never faults without calls")
    }

    #[test]
    fn test_literals() {
        let mut i = interp();
        assert_eq!(eval(&mut i, "\"hi there\""), Value::Str("hi there".into()));
        assert_eq!(eval(&mut i, "'c'"), Value::Char('c'));
        assert_eq!(eval(&mut i, "'\\n'"), Value::Char('\n'));
        assert_eq!(eval(&mut i, "true"), Value::Bool(true));
        assert_eq!(eval(&mut i, "-17"), Value::Int(-17));
        assert_eq!(eval(&mut i, "3000000000"), Value::Long(3_000_000_000));
        assert_eq!(eval(&mut i, "7L"), Value::Long(7));
        assert_eq!(eval(&mut i, "2.50"), Value::Double(2.5));
        assert_eq!(eval(&mut i, "null"), Value::Null);
    }

    #[test]
    fn test_precedence_and_grouping() {
        let mut i = interp();
        assert_eq!(eval(&mut i, "2+3*4"), Value::Int(14));
        assert_eq!(eval(&mut i, "(2+3)*4"), Value::Int(20));
        assert_eq!(eval(&mut i, "10 - 4 - 3"), Value::Int(3));
        assert_eq!(eval(&mut i, "2 * -3"), Value::Int(-6));
        assert_eq!(eval(&mut i, "17 % 5 + 1"), Value::Int(3));
        assert_eq!(eval(&mut i, "((1 + 1) * (2 + 2))"), Value::Int(8));
    }

    #[test]
    fn test_narrowing() {
        let mut i = interp();
        assert_eq!(eval(&mut i, "4/2"), Value::Int(2));
        assert_eq!(eval(&mut i, "5/2"), Value::Double(2.5));
    }

    #[test]
    fn test_concatenation_is_left_to_right() {
        let mut i = interp();
        assert_eq!(eval(&mut i, "\"x=\" + 1 + 2"), Value::Str("x=12".into()));
        assert_eq!(eval(&mut i, "\"sum=\" + (1 + 2)"), Value::Str("sum=3".into()));
        assert_eq!(eval(&mut i, "\"a+b\" + 'c'"), Value::Str("a+bc".into()));
    }

    #[test]
    fn test_variables_and_shadowing() {
        let mut i = interp();
        i.scope.set("x", Value::Int(5));
        i.scope.set("name", Value::Str("Ann".into()));
        assert_eq!(eval(&mut i, "x * 2 + 1"), Value::Int(11));
        assert_eq!(eval(&mut i, "\"Hi \" + name"), Value::Str("Hi Ann".into()));
        assert_eq!(eval(&mut i, "-x"), Value::Int(-5));

        i.scope.push_frame("f".into());
        i.scope.set("x", Value::Int(100));
        assert_eq!(eval(&mut i, "x"), Value::Int(100));
        i.scope.pop_frame();
        assert_eq!(eval(&mut i, "x"), Value::Int(5));
    }

    #[test]
    fn test_unresolvable_text_is_echoed() {
        let mut i = interp();
        assert_eq!(eval(&mut i, "scanner next"), Value::Str("scanner next".into()));
        assert_eq!(eval(&mut i, "obj.run()"), Value::Str("obj.run()".into()));
        assert_eq!(eval(&mut i, "unknown + 2"), Value::Int(2));
    }

    #[test]
    fn test_hint_coerces() {
        let mut i = interp();
        assert_eq!(i.evaluate("5", Some(&TypeTag::Double)).unwrap(), Value::Double(5.0));
        assert_eq!(i.evaluate("(int) 7.9", Some(&TypeTag::Int)).unwrap(), Value::Int(7));
        i.scope.set("n", Value::Int(2));
        assert_eq!(i.evaluate("n < 3", Some(&TypeTag::Boolean)).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_char_arithmetic() {
        let mut i = interp();
        assert_eq!(eval(&mut i, "'a' + 1"), Value::Int(98));
    }

    #[test]
    fn test_conditions() {
        let mut i = interp();
        i.scope.set("n", Value::Int(3));
        i.scope.set("s", Value::Str("abc".into()));
        i.scope.set("done", Value::Bool(true));
        assert!(i.evaluate_condition("n == 3").unwrap());
        assert!(i.evaluate_condition("n != 4").unwrap());
        assert!(i.evaluate_condition("n < 4").unwrap());
        assert!(!i.evaluate_condition("n < 3").unwrap());
        assert!(i.evaluate_condition("s == \"abc\"").unwrap());
        assert!(i.evaluate_condition("done").unwrap());
        assert!(i.evaluate_condition("").unwrap());
    }

    #[test]
    fn test_unsupported_condition_operators_are_false() {
        let mut i = interp();
        i.scope.set("n", Value::Int(3));
        for cond in ["n > 1", "n <= 3", "n >= 0", "n == 3 && n == 3", "n == 3 || true"] {
            assert!(!i.evaluate_condition(cond).unwrap(), "{}", cond);
        }
    }

    #[test]
    fn test_many_groups_are_resolved_iteratively() {
        let mut i = interp();
        let expr = vec!["(1)"; 5000].join(" + ");
        assert_eq!(eval(&mut i, &expr), Value::Int(5000));
    }

    #[test]
    fn test_deep_nesting_is_echoed() {
        let mut i = interp();
        let expr = format!("{}1{}", "(".repeat(5000), ")".repeat(5000));
        assert_eq!(eval(&mut i, &expr), Value::Str(expr.clone()));

        let shallow = format!("{}1{}", "(".repeat(MAX_GROUP_DEPTH), ")".repeat(MAX_GROUP_DEPTH));
        assert_eq!(eval(&mut i, &shallow), Value::Int(1));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("42"), Some(Value::Int(42)));
        assert_eq!(parse_number("-0.5"), Some(Value::Double(-0.5)));
        assert_eq!(parse_number("3f"), Some(Value::Double(3.0)));
        assert_eq!(parse_number("1.5e3"), None);
        assert_eq!(parse_number("x1"), None);
        assert_eq!(parse_number("-"), None);
    }
}
