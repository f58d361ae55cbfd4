#![forbid(unsafe_code)]

//! Condition evaluation
//!
//! Evaluation walks the AST against a [`Bindings`] table of named root nodes
//! and produces a typed [`Value`]. Path navigation is nil-safe end-to-end:
//! a missing key, an out-of-range index, or a descent through a scalar
//! resolves to [`Value::Null`] rather than erroring, so conditions can probe
//! optional fields. Authoring mistakes (unbound roots, bad function calls)
//! are hard errors.

use crate::document::node::{Node, NodeKind, Scalar};
use crate::error::RuleEvaluationError;
use crate::expr::ast::{Accessor, BinaryOp, Expr, Literal};
use crate::expr::builtins::{FnCtx, FunctionRegistry};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashMap;

/// A typed runtime value
///
/// Equality is type-strict: values are equal only when both kind and value
/// match, so `Int(1)` never equals `Float(1.0)` and null equals only null.
/// Sequences and mappings compare structurally, ignoring source lines.
#[derive(Debug, Clone)]
pub enum Value<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Cow<'a, str>),
    Sequence(&'a Node),
    Mapping(&'a Node),
}

impl<'a> Value<'a> {
    /// Converts a document node into its runtime value
    ///
    /// Scalars become the matching scalar value; containers are borrowed
    /// whole, so navigation and `get_key` stay copy-free.
    pub fn from_node(node: &'a Node) -> Self {
        match node.kind() {
            NodeKind::Scalar(Scalar::Null) => Value::Null,
            NodeKind::Scalar(Scalar::Bool(b)) => Value::Bool(*b),
            NodeKind::Scalar(Scalar::Int(i)) => Value::Int(*i),
            NodeKind::Scalar(Scalar::Float(x)) => Value::Float(*x),
            NodeKind::Scalar(Scalar::Str(s)) => Value::Str(Cow::Borrowed(s)),
            NodeKind::Sequence(_) => Value::Sequence(node),
            NodeKind::Mapping(_) => Value::Mapping(node),
        }
    }

    /// Builds an owned string value
    pub fn str(value: impl Into<String>) -> Self {
        Value::Str(Cow::Owned(value.into()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Null and `false` are falsey; every other value is truthy
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Bool(false))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_ref()),
            _ => None,
        }
    }
}

impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => structural_eq(a, b),
            (Value::Mapping(a), Value::Mapping(b)) => structural_eq(a, b),
            _ => false,
        }
    }
}

/// Deep node equality ignoring source lines
///
/// Scalar comparison is type-strict by construction (distinct variants never
/// compare equal); mapping comparison is order-sensitive, matching the
/// ordered-mapping data model.
fn structural_eq(a: &Node, b: &Node) -> bool {
    match (a.kind(), b.kind()) {
        (NodeKind::Scalar(x), NodeKind::Scalar(y)) => x == y,
        (NodeKind::Sequence(xs), NodeKind::Sequence(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| structural_eq(x, y))
        }
        (NodeKind::Mapping(xs), NodeKind::Mapping(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .zip(ys)
                    .all(|((ka, va), (kb, vb))| ka.text() == kb.text() && structural_eq(va, vb))
        }
        _ => false,
    }
}

/// Named root values for path expressions
///
/// The caller binds the roots a condition may start from, typically
/// `workflow`, `job`, and `step` at the current traversal position.
#[derive(Debug, Default, Clone)]
pub struct Bindings<'a> {
    values: HashMap<String, &'a Node>,
}

impl<'a> Bindings<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a root name to a node, replacing any previous binding
    pub fn bind(mut self, name: impl Into<String>, node: &'a Node) -> Self {
        self.values.insert(name.into(), node);
        self
    }

    pub fn get(&self, name: &str) -> Option<&'a Node> {
        self.values.get(name).copied()
    }
}

/// Evaluates an expression against bindings
///
/// `source` is the condition's text, carried into evaluation errors.
pub(crate) fn eval<'a>(
    source: &str,
    expr: &Expr,
    bindings: &Bindings<'a>,
    registry: &FunctionRegistry,
) -> Result<Value<'a>, RuleEvaluationError> {
    match expr {
        Expr::Literal(literal) => Ok(literal_value(literal)),
        Expr::Path { root, accessors } => resolve_path(source, root, accessors, bindings),
        Expr::Call { name, args } => {
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(eval(source, arg, bindings, registry)?);
            }
            let ctx = FnCtx {
                condition: source,
                function: name.as_str(),
            };
            let Some(builtin) = registry.get(name) else {
                return Err(RuleEvaluationError::UnknownFunction {
                    condition: source.to_string(),
                    function: name.clone(),
                });
            };
            if values.len() != builtin.arity {
                return Err(ctx.wrong_arity(builtin.arity, values.len()));
            }
            (builtin.func)(&ctx, &values)
        }
        Expr::Binary { op, lhs, rhs } => eval_binary(source, *op, lhs, rhs, bindings, registry),
    }
}

/// Materializes a literal; string literals are cloned out of the AST so the
/// result does not borrow from the condition
fn literal_value<'a>(literal: &Literal) -> Value<'a> {
    match literal {
        Literal::Str(s) => Value::Str(Cow::Owned(s.clone())),
        Literal::Int(i) => Value::Int(*i),
        Literal::Float(x) => Value::Float(*x),
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Nil => Value::Null,
    }
}

/// Resolves a path expression, nil-safe past the root
fn resolve_path<'a>(
    source: &str,
    root: &str,
    accessors: &[Accessor],
    bindings: &Bindings<'a>,
) -> Result<Value<'a>, RuleEvaluationError> {
    let Some(root_node) = bindings.get(root) else {
        return Err(RuleEvaluationError::UnboundRoot {
            condition: source.to_string(),
            root: root.to_string(),
        });
    };

    let mut current = Some(root_node);
    for accessor in accessors {
        let Some(node) = current else { break };
        current = match accessor {
            Accessor::Key(key) => node.get(key),
            Accessor::Index(i) => node.index(*i),
        };
    }

    Ok(current.map(Value::from_node).unwrap_or(Value::Null))
}

fn eval_binary<'a>(
    source: &str,
    op: BinaryOp,
    lhs: &Expr,
    rhs: &Expr,
    bindings: &Bindings<'a>,
    registry: &FunctionRegistry,
) -> Result<Value<'a>, RuleEvaluationError> {
    // Logical operators short-circuit; everything else is eager.
    match op {
        BinaryOp::And => {
            if !eval(source, lhs, bindings, registry)?.is_truthy() {
                return Ok(Value::Bool(false));
            }
            let rhs = eval(source, rhs, bindings, registry)?;
            return Ok(Value::Bool(rhs.is_truthy()));
        }
        BinaryOp::Or => {
            if eval(source, lhs, bindings, registry)?.is_truthy() {
                return Ok(Value::Bool(true));
            }
            let rhs = eval(source, rhs, bindings, registry)?;
            return Ok(Value::Bool(rhs.is_truthy()));
        }
        _ => {}
    }

    let left = eval(source, lhs, bindings, registry)?;
    let right = eval(source, rhs, bindings, registry)?;

    let result = match op {
        BinaryOp::Eq => left == right,
        BinaryOp::Ne => left != right,
        BinaryOp::Lt => compare(&left, &right).is_some_and(|o| o == Ordering::Less),
        BinaryOp::Le => compare(&left, &right).is_some_and(|o| o != Ordering::Greater),
        BinaryOp::Gt => compare(&left, &right).is_some_and(|o| o == Ordering::Greater),
        BinaryOp::Ge => compare(&left, &right).is_some_and(|o| o != Ordering::Less),
        BinaryOp::And | BinaryOp::Or => unreachable!("handled above"),
    };
    Ok(Value::Bool(result))
}

/// Orders two values of the same kind; mismatched kinds do not order
fn compare(left: &Value<'_>, right: &Value<'_>) -> Option<Ordering> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
