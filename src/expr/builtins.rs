#![forbid(unsafe_code)]

//! Built-in function registry
//!
//! Built-ins are dispatched through a registry (name → arity + function)
//! rather than a fixed match, so helpers can be added without touching the
//! evaluator core. Each built-in is data-shape tolerant (null inputs yield
//! null or false, never an error) but strict about authoring mistakes: the
//! wrong number of arguments or an argument of the wrong kind is a
//! `RuleEvaluationError`.

use crate::error::RuleEvaluationError;
use crate::expr::eval::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Call-site context handed to built-ins for error construction
#[derive(Debug, Clone, Copy)]
pub struct FnCtx<'c> {
    /// Source text of the condition being evaluated
    pub condition: &'c str,
    /// Name the function was called as
    pub function: &'c str,
}

impl FnCtx<'_> {
    pub fn wrong_arity(&self, expected: usize, got: usize) -> RuleEvaluationError {
        RuleEvaluationError::WrongArity {
            condition: self.condition.to_string(),
            function: self.function.to_string(),
            expected,
            got,
        }
    }

    pub fn wrong_argument(&self, message: impl Into<String>) -> RuleEvaluationError {
        RuleEvaluationError::WrongArgument {
            condition: self.condition.to_string(),
            function: self.function.to_string(),
            message: message.into(),
        }
    }
}

/// Implementation signature shared by all built-ins
///
/// Arity is checked by the evaluator before the call, so implementations may
/// index `args` up to their declared arity.
pub type BuiltinFn =
    for<'a, 'c> fn(&FnCtx<'c>, &[Value<'a>]) -> Result<Value<'a>, RuleEvaluationError>;

/// A registered built-in function
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub arity: usize,
    pub func: BuiltinFn,
}

impl std::fmt::Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builtin")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

/// Registry of built-in functions available to conditions
#[derive(Debug, Default)]
pub struct FunctionRegistry {
    functions: HashMap<&'static str, Builtin>,
}

impl FunctionRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard registry: `get_key`, `length`, `starts_with`, `contains`
    pub fn standard() -> &'static FunctionRegistry {
        static STANDARD: OnceLock<FunctionRegistry> = OnceLock::new();
        STANDARD.get_or_init(|| {
            let mut registry = FunctionRegistry::new();
            registry.register(Builtin {
                name: "get_key",
                arity: 2,
                func: builtin_get_key,
            });
            registry.register(Builtin {
                name: "length",
                arity: 1,
                func: builtin_length,
            });
            registry.register(Builtin {
                name: "starts_with",
                arity: 2,
                func: builtin_starts_with,
            });
            registry.register(Builtin {
                name: "contains",
                arity: 2,
                func: builtin_contains,
            });
            registry
        })
    }

    /// Registers a built-in, replacing any previous one of the same name
    pub fn register(&mut self, builtin: Builtin) {
        self.functions.insert(builtin.name, builtin);
    }

    pub fn get(&self, name: &str) -> Option<&Builtin> {
        self.functions.get(name)
    }
}

/// `get_key(map, key)`: the value at `key`, or null
///
/// Null when `map` is null, is not a mapping, or lacks the key. The key
/// argument must be a string.
fn builtin_get_key<'a>(
    ctx: &FnCtx<'_>,
    args: &[Value<'a>],
) -> Result<Value<'a>, RuleEvaluationError> {
    let Some(key) = args[1].as_str() else {
        return Err(ctx.wrong_argument("key must be a string"));
    };
    match &args[0] {
        Value::Mapping(node) => Ok(node.get(key).map(Value::from_node).unwrap_or(Value::Null)),
        _ => Ok(Value::Null),
    }
}

/// `length(value)`: element count of a sequence or mapping, character count
/// of a string, null for null
fn builtin_length<'a>(
    ctx: &FnCtx<'_>,
    args: &[Value<'a>],
) -> Result<Value<'a>, RuleEvaluationError> {
    match &args[0] {
        Value::Null => Ok(Value::Null),
        Value::Str(s) => Ok(Value::Int(s.chars().count() as i64)),
        Value::Sequence(node) | Value::Mapping(node) => Ok(Value::Int(node.len() as i64)),
        _ => Err(ctx.wrong_argument("expected a string, sequence, or mapping")),
    }
}

/// `starts_with(value, prefix)`: string prefix test
///
/// False when `value` is null or not a string; `prefix` must be a string.
fn builtin_starts_with<'a>(
    ctx: &FnCtx<'_>,
    args: &[Value<'a>],
) -> Result<Value<'a>, RuleEvaluationError> {
    let Some(prefix) = args[1].as_str() else {
        return Err(ctx.wrong_argument("prefix must be a string"));
    };
    match &args[0] {
        Value::Str(s) => Ok(Value::Bool(s.starts_with(prefix))),
        _ => Ok(Value::Bool(false)),
    }
}

/// `contains(haystack, needle)`: substring test for strings, typed-equality
/// membership for sequences; false for null
fn builtin_contains<'a>(
    ctx: &FnCtx<'_>,
    args: &[Value<'a>],
) -> Result<Value<'a>, RuleEvaluationError> {
    match &args[0] {
        Value::Null => Ok(Value::Bool(false)),
        Value::Str(s) => {
            let Some(needle) = args[1].as_str() else {
                return Err(ctx.wrong_argument("needle must be a string"));
            };
            Ok(Value::Bool(s.contains(needle)))
        }
        Value::Sequence(node) => Ok(Value::Bool(
            node.items().any(|item| Value::from_node(item) == args[1]),
        )),
        _ => Err(ctx.wrong_argument("expected a string or sequence")),
    }
}
