//! Source scanning and declaration extraction
//!
//! There is no grammar and no token stream here. The subject program is
//! handled as text:
//! - [`preprocess`]: comment stripping ([`preprocess::SourceUnit`])
//! - [`scan`]: literal-aware helpers shared by every heuristic pass
//! - [`declarations`]: class, field and method discovery
//! - [`ast`]: the declaration tables those passes produce
//!
//! # Supported subset
//!
//! Classes with fields and methods, primitive and `String` variables,
//! arithmetic and string expressions, console output, and the headers of
//! `if`, `for` and `while`. Everything else is tolerated and ignored.

pub mod ast;
pub mod declarations;
pub mod preprocess;
pub mod scan;
