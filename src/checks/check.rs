#![forbid(unsafe_code)]

//! Check definitions
//!
//! A check pairs a condition with an id, a description, a severity, and the
//! granularity it runs at (workflow, job, or step). Checks are defined as
//! TOML documents and validated eagerly: id, severity, target, and condition
//! are all checked at load time, not at evaluation time.

use crate::error::CheckError;
use crate::expr::Condition;
use crate::types::{CheckId, Severity};
use serde::{Deserialize, Serialize};

/// TOML structure for check definitions
///
/// ```toml
/// [check]
/// id = "automerge-action"
/// description = "Automerge action can be abused to merge arbitrary PRs"
/// severity = "warning"
///
/// [match]
/// target = "step"
/// condition = 'starts_with($step.uses, "pascalgn/automerge-action")'
/// ```
#[derive(Debug, Deserialize)]
struct CheckDefinition {
    check: CheckSection,
    #[serde(rename = "match")]
    match_section: MatchSection,
}

#[derive(Debug, Deserialize)]
struct CheckSection {
    id: String,
    description: String,
    severity: Severity,
}

#[derive(Debug, Deserialize)]
struct MatchSection {
    target: Target,
    condition: String,
}

/// The granularity a check's condition is evaluated at
///
/// The runner binds `$workflow` for all targets, adds `$job` for `job`, and
/// both `$job` and `$step` for `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Workflow,
    Job,
    Step,
}

/// A loaded check, ready to run
#[derive(Debug, Clone)]
pub struct Check {
    id: CheckId,
    description: String,
    severity: Severity,
    target: Target,
    condition: Condition,
}

impl Check {
    /// Builds a check from already-validated parts
    pub fn new(
        id: CheckId,
        description: impl Into<String>,
        severity: Severity,
        target: Target,
        condition: Condition,
    ) -> Self {
        Check {
            id,
            description: description.into(),
            severity,
            target,
            condition,
        }
    }

    /// Parses a check from TOML content
    ///
    /// # Errors
    ///
    /// Returns `CheckError::InvalidDefinition` if:
    /// - TOML syntax is invalid
    /// - Required fields are missing
    /// - The check ID is invalid
    ///
    /// Returns `CheckError::Syntax` if the condition fails to parse.
    pub fn from_toml(content: &str) -> Result<Self, CheckError> {
        let def: CheckDefinition = toml::from_str(content)
            .map_err(|e| CheckError::InvalidDefinition(format!("Failed to parse TOML: {}", e)))?;

        let id = CheckId::new(def.check.id.clone()).ok_or_else(|| {
            CheckError::InvalidDefinition(format!("Invalid check ID: {}", def.check.id))
        })?;

        let condition = Condition::parse(&def.match_section.condition)?;

        Ok(Check {
            id,
            description: def.check.description,
            severity: def.check.severity,
            target: def.match_section.target,
            condition,
        })
    }

    pub fn id(&self) -> &CheckId {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }
}
