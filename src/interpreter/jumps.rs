use crate::interpreter::engine::{ControlSignal, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;

impl Interpreter {
    /// `break`, `continue` and `return [expr]`
    pub(crate) fn execute_jump(&mut self, keyword: &str, text: &str) -> Result<(), RuntimeError> {
        self.signal = match keyword {
            "break" => ControlSignal::Break,
            "continue" => ControlSignal::Continue,
            _ => {
                let expr = text[keyword.len()..].trim();
                let value = if expr.is_empty() {
                    Value::Null
                } else {
                    self.evaluate(expr, None)?
                };
                ControlSignal::Returning(value)
            }
        };
        Ok(())
    }
}
