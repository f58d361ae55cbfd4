#![forbid(unsafe_code)]

//! Condition AST
//!
//! A parsed condition is immutable and side-effect-free: evaluating it twice
//! against the same bindings yields the same result.

use crate::error::{RuleEvaluationError, RuleSyntaxError};
use crate::expr::eval::{self, Bindings, Value};
use crate::expr::builtins::FunctionRegistry;
use crate::expr::parser;

/// A typed literal value appearing in a condition's text
///
/// Integer and float literals are distinct kinds; they never unify.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Nil,
}

/// One accessor step of a path expression
#[derive(Debug, Clone, PartialEq)]
pub enum Accessor {
    /// Mapping key lookup, e.g. `.with`
    Key(String),
    /// Sequence index lookup, e.g. `[0]`
    Index(usize),
}

/// Binary operators, lowest-precedence first in the grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// A node of the condition AST
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    /// `$root.segment[0].segment`
    Path {
        root: String,
        accessors: Vec<Accessor>,
    },
    /// `name(arg, arg, ...)`
    Call { name: String, args: Vec<Expr> },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

/// A parsed condition: the source text plus its AST
///
/// The source is kept so evaluation errors can name the condition they come
/// from.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    source: String,
    expr: Expr,
}

impl Condition {
    /// Parses a condition's text
    ///
    /// # Errors
    ///
    /// Returns `RuleSyntaxError` naming the offending token and position on
    /// malformed input: unterminated strings, unknown operators, mismatched
    /// parentheses, empty path expressions, trailing input.
    pub fn parse(text: &str) -> Result<Self, RuleSyntaxError> {
        let expr = parser::parse_expression(text)?;
        Ok(Condition {
            source: text.to_string(),
            expr,
        })
    }

    /// The condition's source text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The condition's parsed expression
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Evaluates the condition against named root bindings, using the
    /// standard built-in functions
    ///
    /// # Errors
    ///
    /// Returns `RuleEvaluationError` on authoring mistakes: an unbound root
    /// name, an unknown function, or a built-in called with the wrong arity
    /// or argument kind. Missing keys and null intermediates are not errors;
    /// they resolve to null.
    pub fn eval_with<'a>(&self, bindings: &Bindings<'a>) -> Result<Value<'a>, RuleEvaluationError> {
        self.eval_with_registry(bindings, FunctionRegistry::standard())
    }

    /// Evaluates the condition with an explicit function registry
    ///
    /// Use this to extend the built-in function set beyond the standard one.
    pub fn eval_with_registry<'a>(
        &self,
        bindings: &Bindings<'a>,
        registry: &FunctionRegistry,
    ) -> Result<Value<'a>, RuleEvaluationError> {
        eval::eval(&self.source, &self.expr, bindings, registry)
    }
}
