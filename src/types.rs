#![forbid(unsafe_code)]

//! Core domain types for wflint
//!
//! The small validated vocabulary shared by check definitions and findings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a firing check is
///
/// Carried from the `[check]` definition onto every finding it produces,
/// and serialized lowercase in finding output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A validated check identifier
///
/// The `id` field of a `[check]` definition, echoed on every finding so a
/// reader can trace it back to the check that fired. An id starts with an
/// alphanumeric character and may continue with alphanumerics, hyphens, and
/// underscores (`automerge-action`, `unpinned_uses`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CheckId(String);

impl CheckId {
    /// Creates a new CheckId, or None if the text is not a valid id
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let mut chars = id.chars();
        let starts_well = chars.next().is_some_and(char::is_alphanumeric);
        let rest_well = chars.all(|c| c.is_alphanumeric() || c == '-' || c == '_');
        (starts_well && rest_well).then_some(CheckId(id))
    }

    /// Returns the check ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CheckId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CheckId::new(value.as_str()).ok_or_else(|| format!("Invalid check ID: '{value}'"))
    }
}

impl From<CheckId> for String {
    fn from(check_id: CheckId) -> Self {
        check_id.0
    }
}
