//! Runtime error types for the simulator
//!
//! This module defines [`RuntimeError`], the faults that stop a run after the
//! program passed validation. Malformed expressions never produce one of
//! these; the evaluator degrades to a zero or an echoed string instead.
//!
//! All runtime errors are fatal. The pipeline turns them into a failed result
//! that still carries whatever output was captured before the fault.

use thiserror::Error;

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Neither a free `main` nor a static `main` inside a class was found
    #[error("No main method found")]
    NoEntryPoint,

    /// Method invocations nested deeper than the configured limit
    #[error("Call depth limit of {limit} exceeded while calling '{method}' at line {line}")]
    CallDepthExceeded {
        method: String,
        limit: usize,
        line: usize,
    },

    /// A panic caught at the request boundary
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RuntimeError {
    pub fn line(&self) -> Option<usize> {
        match self {
            RuntimeError::CallDepthExceeded { line, .. } => Some(*line),
            RuntimeError::NoEntryPoint | RuntimeError::Internal(_) => None,
        }
    }
}
