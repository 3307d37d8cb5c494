//! Statement interpreter
//!
//! This module runs a validated program:
//! - [`engine`]: the [`engine::Interpreter`] state, method invocation and the
//!   segment walker
//! - [`entry`]: entry-point resolution
//! - [`errors`]: runtime error types
//! - [`constants`]: iteration and call-depth limits
//!
//! Statement dispatch, expression evaluation, loop simulation, jumps and
//! builtins are further `impl Interpreter` blocks in their own files.
//!
//! # Execution Model
//!
//! A method body is cut into statement segments and walked in order. Loop and
//! `if` blocks are never entered; their headers are simulated and leave a
//! placeholder line in the output instead. Method calls found inside
//! expressions do run their bodies, each in a fresh local frame.

mod builtins;
pub mod constants;
pub mod engine;
pub mod entry;
pub mod errors;
mod expressions;
mod jumps;
mod loops;
mod statements;
