//! Entry-point resolution
//!
//! A free method named `main` wins. Otherwise the first class (in class-table
//! iteration order) with a static `main` supplies it. The table is an
//! `FxHashMap`, whose fixed hasher makes that order repeatable for the same
//! program, though it is not declaration order.

use crate::parser::ast::{Declarations, MethodDef};

pub const ENTRY_METHOD: &str = "main";

/// Find the method a run starts from
pub fn resolve(decls: &Declarations) -> Option<&MethodDef> {
    decls.free_method(ENTRY_METHOD).or_else(|| {
        decls
            .classes
            .values()
            .find_map(|class| class.method(ENTRY_METHOD).filter(|m| m.is_static))
    })
}
