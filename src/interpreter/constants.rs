// Limits for the simulator

/// Upper bound on simulated `for` iterations; also the number of trace lines a
/// never-ending `for` produces before it is cut off
pub const MAX_LOOP_ITERATIONS: usize = 1000;

/// Deepest allowed nesting of method invocations
pub const MAX_CALL_DEPTH: usize = 64;

/// Iterations a `while` loop is allowed to simulate
pub const MAX_WHILE_PASSES: usize = 1;

/// Deepest parenthesis nesting the evaluator will take apart; deeper
/// expressions are echoed unevaluated
pub const MAX_GROUP_DEPTH: usize = 256;
