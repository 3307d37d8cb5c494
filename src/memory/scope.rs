//! Variable scopes
//!
//! - [`Scope`]: the global mapping plus a stack of per-invocation frames
//! - [`Frame`]: one method invocation's local variables
//!
//! # Lookup and update
//!
//! Reads walk frames from the most recently pushed to the oldest, then the
//! globals; the first binding found wins. Writes go to the top frame when one
//! exists, otherwise to the globals. A write never searches outward to update
//! an existing outer binding, so assigning to a global from inside a method
//! creates a local that shadows it until the frame is popped.

use super::value::Value;
use rustc_hash::FxHashMap;

/// Local variables of one method invocation
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub method_name: String,
    pub locals: FxHashMap<String, Value>,
}

impl Frame {
    pub fn new(method_name: String) -> Self {
        Frame {
            method_name,
            ..Frame::default()
        }
    }

    fn set(&mut self, name: &str, value: Value) {
        self.locals.insert(name.to_string(), value);
    }
}

/// Global bindings plus the stack of invocation frames
#[derive(Debug, Clone, Default)]
pub struct Scope {
    globals: FxHashMap<String, Value>,
    frames: Vec<Frame>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look a name up, innermost frame first
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.locals.get(name))
            .or_else(|| self.globals.get(name))
    }

    /// Bind `name` in the innermost frame, or globally when no frame is active
    pub fn set(&mut self, name: &str, value: Value) {
        match self.frames.last_mut() {
            Some(frame) => frame.set(name, value),
            None => {
                self.globals.insert(name.to_string(), value);
            }
        }
    }

    /// Bind `name` in the global layer regardless of active frames
    pub fn set_global(&mut self, name: &str, value: Value) {
        self.globals.insert(name.to_string(), value);
    }

    /// Push a new frame for a method invocation
    pub fn push_frame(&mut self, method_name: String) {
        self.frames.push(Frame::new(method_name));
    }

    /// Pop the top frame
    pub fn pop_frame(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    pub fn globals(&self) -> &FxHashMap<String, Value> {
        &self.globals
    }

    /// Get the depth of the frame stack
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}
