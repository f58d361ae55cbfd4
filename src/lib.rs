#![forbid(unsafe_code)]

//! wflint: audit core for CI workflow definitions
//!
//! wflint turns a parsed workflow document into a navigable, position-aware
//! tree and evaluates user-authored conditions against it. Every key and
//! scalar in the tree remembers its original source line, so a check that
//! fires deep inside a job can point back at the exact line of the input.

pub mod checks;
pub mod document;
pub mod error;
pub mod expr;
pub mod types;

// Re-export error types for convenient access
pub use error::{
    CheckError, NormalizationError, RuleEvaluationError, RuleSyntaxError, WflintError,
};

// Re-export core domain types for convenient access
pub use document::{Job, Key, Node, NodeKind, Scalar, Step, Workflow};
pub use expr::{Bindings, Condition, Value};
pub use types::{CheckId, Severity};
