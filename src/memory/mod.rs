//! Runtime state for the simulated program
//!
//! - [`value`]: tagged runtime values and their display/coercion rules
//! - [`scope`]: global bindings plus one local frame per method invocation
//!
//! There is no heap and no object model. Every binding holds a [`value::Value`]
//! directly, and a fresh [`scope::Scope`] is built for each run.

pub mod scope;
pub mod value;
