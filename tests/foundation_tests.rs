//! Integration tests for wflint foundation types
//!
//! This module contains integration tests for the error taxonomy and domain
//! types defined in the wflint library.

use wflint::{
    CheckError, CheckId, NormalizationError, RuleEvaluationError, RuleSyntaxError, Severity,
    WflintError,
};

// Error hierarchy tests

#[test]
fn test_error_hierarchy_normalization_to_wflint() {
    let err = NormalizationError::DuplicateKey {
        key: "runs_on".to_string(),
        line: 4,
    };
    let top: WflintError = err.into();
    assert!(matches!(top, WflintError::Normalization(_)));
}

#[test]
fn test_error_hierarchy_syntax_to_wflint() {
    let err = RuleSyntaxError::EmptyPath { position: 0 };
    let top: WflintError = err.into();
    assert!(matches!(top, WflintError::Syntax(_)));
}

#[test]
fn test_error_hierarchy_evaluation_to_wflint() {
    let err = RuleEvaluationError::UnboundRoot {
        condition: "$matrix.os == nil".to_string(),
        root: "matrix".to_string(),
    };
    let top: WflintError = err.into();
    assert!(matches!(top, WflintError::Evaluation(_)));
}

#[test]
fn test_error_hierarchy_check_to_wflint() {
    let err = CheckError::InvalidDefinition("missing [match] section".to_string());
    let top: WflintError = err.into();
    assert!(matches!(top, WflintError::Check(_)));
}

#[test]
fn test_syntax_error_nests_inside_check_error() {
    let syntax = RuleSyntaxError::UnterminatedString { position: 12 };
    let err: CheckError = syntax.into();
    assert!(matches!(err, CheckError::Syntax(_)));
}

// Display tests: errors must name the offending construct

#[test]
fn test_normalization_error_names_key_and_line() {
    let err = NormalizationError::MalformedTrigger {
        key: "on".to_string(),
        line: 3,
        message: "expected a trigger name".to_string(),
    };
    let text = err.to_string();
    assert!(text.contains("'on'"));
    assert!(text.contains("line 3"));
}

#[test]
fn test_syntax_error_names_position() {
    let err = RuleSyntaxError::UnknownOperator {
        operator: "=".to_string(),
        position: 11,
    };
    let text = err.to_string();
    assert!(text.contains("'='"));
    assert!(text.contains("11"));
}

#[test]
fn test_evaluation_error_names_condition_text() {
    let err = RuleEvaluationError::WrongArity {
        condition: "get_key($step.with)".to_string(),
        function: "get_key".to_string(),
        expected: 2,
        got: 1,
    };
    let text = err.to_string();
    assert!(text.contains("get_key($step.with)"));
    assert!(text.contains("expects 2"));
}

// Domain type tests

#[test]
fn test_check_id_round_trip() {
    let id = CheckId::new("automerge-action").unwrap();
    assert_eq!(id.as_str(), "automerge-action");
    assert_eq!(id.to_string(), "automerge-action");
    assert!(CheckId::new("no spaces allowed").is_none());
}

#[test]
fn test_severity_ordering_is_stable_in_serde() {
    for (severity, expected) in [
        (Severity::Error, "\"error\""),
        (Severity::Warning, "\"warning\""),
        (Severity::Info, "\"info\""),
    ] {
        assert_eq!(serde_json::to_string(&severity).unwrap(), expected);
    }
}
