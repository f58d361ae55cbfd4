#![forbid(unsafe_code)]

//! Error types for wflint
//!
//! This module defines the error types used throughout wflint, following
//! a hierarchical structure with specific error variants for different
//! error categories.
//!
//! Data-shape absence (a missing key, a null value midway through a path)
//! is deliberately not represented here: it is a first-class null result,
//! so that conditions can express "this optional field is absent" without
//! special-casing every access.

/// Errors raised while normalizing a parsed workflow document
///
/// Every variant names the offending key and its source line.
#[derive(Debug, thiserror::Error)]
pub enum NormalizationError {
    /// The document root (or a required sub-tree) is not a mapping
    #[error("Expected a mapping at '{key}' (line {line})")]
    NotAMapping { key: String, line: u32 },

    /// The trigger declaration has a shape that cannot be normalized
    #[error("Malformed trigger declaration at '{key}' (line {line}): {message}")]
    MalformedTrigger {
        key: String,
        line: u32,
        message: String,
    },

    /// Rewriting a hyphenated key would collide with an existing key
    #[error("Duplicate key '{key}' after normalization (line {line})")]
    DuplicateKey { key: String, line: u32 },
}

/// Errors raised while parsing a condition's text
///
/// Positions are byte offsets into the condition source.
#[derive(Debug, thiserror::Error)]
pub enum RuleSyntaxError {
    /// A string literal is missing its closing quote
    #[error("Unterminated string literal at position {position}")]
    UnterminatedString { position: usize },

    /// A character that cannot start any token
    #[error("Unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },

    /// An operator-like sequence that is not a known operator
    #[error("Unknown operator '{operator}' at position {position}")]
    UnknownOperator { operator: String, position: usize },

    /// A token that is valid on its own but not at this point in the grammar
    #[error("Unexpected token '{token}' at position {position}")]
    UnexpectedToken { token: String, position: usize },

    /// The input ended where more tokens were required
    #[error("Unexpected end of input at position {position}: expected {expected}")]
    UnexpectedEnd { position: usize, expected: String },

    /// A `$` sigil with no root name after it
    #[error("Empty path expression at position {position}")]
    EmptyPath { position: usize },
}

/// Errors raised while evaluating a condition against bindings
///
/// These are authoring mistakes in the condition, not data-shape issues;
/// every variant carries the condition source so the author can find it.
#[derive(Debug, thiserror::Error)]
pub enum RuleEvaluationError {
    /// A path expression names a root that is not bound
    #[error("Unbound root '${root}' in condition: {condition}")]
    UnboundRoot { condition: String, root: String },

    /// A call to a function that is not registered
    #[error("Unknown function '{function}' in condition: {condition}")]
    UnknownFunction { condition: String, function: String },

    /// A built-in called with the wrong number of arguments
    #[error(
        "Function '{function}' expects {expected} argument(s), got {got}, in condition: {condition}"
    )]
    WrongArity {
        condition: String,
        function: String,
        expected: usize,
        got: usize,
    },

    /// A built-in called with an argument of an unsupported kind
    #[error("Invalid argument to '{function}' ({message}) in condition: {condition}")]
    WrongArgument {
        condition: String,
        function: String,
        message: String,
    },
}

/// Errors raised while loading a check definition
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// Invalid check definition (TOML shape, id, severity, target)
    #[error("Invalid check definition: {0}")]
    InvalidDefinition(String),

    /// The check's condition failed to parse
    #[error("Invalid condition: {0}")]
    Syntax(#[from] RuleSyntaxError),
}

/// Top-level error type for wflint
#[derive(Debug, thiserror::Error)]
pub enum WflintError {
    /// Document normalization error
    #[error("Normalization error: {0}")]
    Normalization(#[from] NormalizationError),

    /// Condition syntax error
    #[error("Syntax error: {0}")]
    Syntax(#[from] RuleSyntaxError),

    /// Condition evaluation error
    #[error("Evaluation error: {0}")]
    Evaluation(#[from] RuleEvaluationError),

    /// Check definition error
    #[error("Check error: {0}")]
    Check(#[from] CheckError),
}
