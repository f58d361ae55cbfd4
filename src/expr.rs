#![forbid(unsafe_code)]

//! Condition expression language: lexer, parser, and evaluator
//!
//! A condition is a single boolean/value expression such as
//! `$step.with.type_bool == true` or `get_key($step.with, "key")`, parsed
//! once into an immutable AST and evaluated against named root bindings.

pub mod ast;
pub mod builtins;
pub mod eval;
pub mod parser;
pub mod token;

pub use ast::{Accessor, BinaryOp, Condition, Expr, Literal};
pub use builtins::{Builtin, FnCtx, FunctionRegistry};
pub use eval::{Bindings, Value};

use crate::error::RuleSyntaxError;

/// Parses a condition's text into an evaluable [`Condition`]
///
/// # Errors
///
/// Returns `RuleSyntaxError` naming the offending token and position on
/// malformed input.
pub fn parse_rule(text: &str) -> Result<Condition, RuleSyntaxError> {
    Condition::parse(text)
}
