//! Statement execution
//!
//! Each statement segment is classified by its shape and handed to one
//! handler. The first matching rule wins:
//!
//! - console writes: `System.out.println(x)` / `System.out.print(x)`
//! - keyword statements: `for`, `while`, `if` and `else if` headers written
//!   without a block, plain `else`/`do`/`switch` (ignored), `break`,
//!   `continue`, `return`
//! - typed declarations: `[final] Type name [= expr] [, name2 [= expr]]`
//! - compound assignment `x op= e`, rewritten to `x = x op (e)`
//! - plain assignment `x = e`, converted to the type `x` currently holds
//! - `x++`, `x--`, `++x`, `--x` on integer variables
//! - a bare method call, evaluated for its side effects
//!
//! Anything else is a no-op.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::expressions::paren_group;
use crate::interpreter::loops::else_if;
use crate::memory::value::Value;
use crate::parser::ast::TypeTag;
use crate::parser::declarations::split_assignment;
use crate::parser::scan::{find_matching, ident_at, is_identifier, skip_ws, split_top_level};
use tracing::trace;

/// Words that start a statement but never a declaration
const STATEMENT_KEYWORDS: &[&str] = &[
    "return", "new", "throw", "break", "continue", "else", "if", "while", "for", "do", "switch",
    "case", "default", "try", "catch", "finally", "assert", "yield",
];

/// A parsed `Type name [= expr], ...` statement
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Declaration<'a> {
    pub type_text: &'a str,
    pub declarators: Vec<(&'a str, Option<&'a str>)>,
}

impl Interpreter {
    pub(crate) fn execute_statement(&mut self, text: &str) -> Result<(), RuntimeError> {
        let text = text.trim();

        if let Some((arg, newline)) = console_write(text) {
            return self.execute_console_write(arg, newline);
        }

        match ident_at(text, 0).unwrap_or("") {
            keyword @ ("for" | "while" | "if") => return self.execute_inline_control(keyword, text),
            "else" if else_if(text).is_some() => {
                if let Some(chained) = else_if(text) {
                    return self.execute_inline_control("if", chained);
                }
            }
            "else" | "do" | "switch" => {
                trace!(line = self.current_line, text, "branch body not simulated");
                return Ok(());
            }
            keyword @ ("break" | "continue" | "return") => return self.execute_jump(keyword, text),
            _ => {}
        }

        if let Some(decl) = parse_declaration(text) {
            return self.execute_declaration(decl);
        }
        if let Some(rewritten) = rewrite_compound(text) {
            self.execute_assignment(&rewritten)?;
            return Ok(());
        }
        if self.execute_assignment(text)? {
            return Ok(());
        }
        if self.execute_step(text) {
            return Ok(());
        }
        if ident_at(text, 0).is_some() && text.ends_with(')') {
            self.evaluate(text, None)?;
            return Ok(());
        }

        trace!(line = self.current_line, text, "statement ignored");
        Ok(())
    }

    fn execute_console_write(&mut self, arg: &str, newline: bool) -> Result<(), RuntimeError> {
        let text = if arg.trim().is_empty() {
            String::new()
        } else {
            self.evaluate(arg, None)?.to_string()
        };
        let line = self.current_line;
        if newline {
            self.console.println(text, line);
        } else {
            self.console.print(text, line);
        }
        Ok(())
    }

    fn execute_declaration(&mut self, decl: Declaration<'_>) -> Result<(), RuntimeError> {
        let tag = TypeTag::parse(decl.type_text);
        for (name, init) in decl.declarators {
            let value = match init {
                Some(expr) => Some(self.evaluate(expr, Some(&tag))?),
                None => Value::default_for(&tag),
            };
            match value {
                Some(value) => self.scope.set(name, value),
                None => trace!(name, ty = decl.type_text, "declared without a value"),
            }
        }
        Ok(())
    }

    /// `name = expr`; returns false when `text` is not an assignment to a
    /// plain variable
    fn execute_assignment(&mut self, text: &str) -> Result<bool, RuntimeError> {
        let Some(eq) = split_assignment(text) else {
            return Ok(false);
        };
        let target = variable_name(&text[..eq]);
        if !is_identifier(target) {
            return Ok(false);
        }
        let tag = self.scope.get(target).and_then(Value::tag);
        let value = self.evaluate(&text[eq + 1..], tag.as_ref())?;
        self.scope.set(target, value);
        Ok(true)
    }

    /// `x++`, `x--`, `++x`, `--x`; returns false when `text` has neither shape
    fn execute_step(&mut self, text: &str) -> bool {
        let (name, delta) = if let Some(name) = text.strip_suffix("++") {
            (name, 1)
        } else if let Some(name) = text.strip_suffix("--") {
            (name, -1)
        } else if let Some(name) = text.strip_prefix("++") {
            (name, 1)
        } else if let Some(name) = text.strip_prefix("--") {
            (name, -1)
        } else {
            return false;
        };
        let name = variable_name(name);
        if !is_identifier(name) {
            return false;
        }
        match self.scope.get(name) {
            Some(Value::Int(n)) => {
                let next = Value::Int(n.wrapping_add(delta));
                self.scope.set(name, next);
            }
            Some(Value::Long(n)) => {
                let next = Value::Long(n.wrapping_add(delta as i64));
                self.scope.set(name, next);
            }
            _ => trace!(name, "increment of a non-integer ignored"),
        }
        true
    }

    /// `for`, `while` or `if` whose body is a single statement on the same
    /// segment; only the header is simulated
    fn execute_inline_control(&mut self, keyword: &str, text: &str) -> Result<(), RuntimeError> {
        let Some((inner, _body)) = paren_group(text) else {
            return Ok(());
        };
        let header = format!("{} ({})", keyword, inner);
        match keyword {
            "for" => self.simulate_for(&header),
            "while" => self.simulate_while(&header),
            _ => self.simulate_if(&header),
        }
    }
}

/// `System.out.println(arg)` / `System.out.print(arg)`, returning the argument
/// text and whether a newline follows
fn console_write(text: &str) -> Option<(&str, bool)> {
    let (rest, newline) = if let Some(rest) = text.strip_prefix("System.out.println") {
        (rest, true)
    } else {
        (text.strip_prefix("System.out.print")?, false)
    };
    let open = skip_ws(rest, 0);
    if !rest[open..].starts_with('(') {
        return None;
    }
    let close = find_matching(rest, open)?;
    Some((&rest[open + 1..close], newline))
}

/// Strip `this.` and surrounding whitespace from an assignment target
fn variable_name(text: &str) -> &str {
    let text = text.trim();
    text.strip_prefix("this.").unwrap_or(text)
}

/// Parse `[final] Type name [= expr], ...`
pub(crate) fn parse_declaration(text: &str) -> Option<Declaration<'_>> {
    let mut stmt = text.trim();
    while let Some(rest) = stmt.strip_prefix("final") {
        if !rest.starts_with(char::is_whitespace) {
            break;
        }
        stmt = rest.trim_start();
    }

    let ty = ident_at(stmt, 0)?;
    if STATEMENT_KEYWORDS.contains(&ty) {
        return None;
    }
    let is_type = TypeTag::is_primitive_keyword(ty)
        || ty == "var"
        || ty.starts_with(|c: char| c.is_ascii_uppercase());
    if !is_type || ty == "void" {
        return None;
    }

    let mut end = ty.len();
    if stmt[end..].starts_with('<') {
        end = find_matching(stmt, end)? + 1;
    }
    while stmt[skip_ws(stmt, end)..].starts_with("[]") {
        end = skip_ws(stmt, end) + 2;
    }
    let name_at = skip_ws(stmt, end);
    if name_at == end && !stmt[..end].ends_with(['>', ']']) {
        return None;
    }

    let mut declarators = Vec::new();
    for part in split_top_level(&stmt[name_at..], b',') {
        let part = part.trim();
        let name = ident_at(part, 0)?;
        let rest = part[name.len()..].trim_start();
        let init = if rest.is_empty() {
            None
        } else {
            let expr = rest.strip_prefix('=')?;
            if expr.starts_with('=') {
                return None;
            }
            Some(expr.trim())
        };
        declarators.push((name, init));
    }
    Some(Declaration {
        type_text: &stmt[..end],
        declarators,
    })
}

/// `x += e` becomes `x = x + (e)`, likewise for `-= *= /= %=`
fn rewrite_compound(text: &str) -> Option<String> {
    let eq = split_assignment(text)?;
    let op = *text.as_bytes().get(eq.checked_sub(1)?)?;
    if !matches!(op, b'+' | b'-' | b'*' | b'/' | b'%') {
        return None;
    }
    let target = variable_name(&text[..eq - 1]);
    if !is_identifier(target) {
        return None;
    }
    Some(format!(
        "{} = {} {} ({})",
        target,
        target,
        op as char,
        text[eq + 1..].trim()
    ))
}
