#![forbid(unsafe_code)]

//! Parallel check runner
//!
//! Runs a set of checks against one normalized workflow, producing findings
//! where a check's condition is truthy. Checks run in parallel with rayon;
//! the workflow tree is shared read-only since nodes are immutable.
//! Evaluation errors abort the run and propagate to the caller.

use crate::checks::check::{Check, Target};
use crate::document::workflow::Workflow;
use crate::error::RuleEvaluationError;
use crate::expr::Bindings;
use crate::types::{CheckId, Severity};
use rayon::prelude::*;
use serde::Serialize;

/// One check firing at one site in the workflow
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub check_id: CheckId,
    pub severity: Severity,
    pub message: String,
    /// Source line of the site the check fired at: the workflow root, the
    /// job's name key, or the step's first line
    pub line: u32,
    /// Job name, for job- and step-level findings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
    /// Step position within its job, for step-level findings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<usize>,
}

/// Result of running all checks against a workflow
#[derive(Debug)]
pub struct AuditResult {
    /// All findings, ordered by (job, step, check id)
    pub findings: Vec<Finding>,
    /// Number of jobs visited
    pub jobs_checked: usize,
    /// Number of checks executed
    pub checks_executed: usize,
}

/// Runs every check against the workflow at its target granularity
///
/// # Errors
///
/// Returns the first `RuleEvaluationError` raised by any condition; these
/// are authoring mistakes in a check and are never swallowed.
pub fn run_checks(
    workflow: &Workflow,
    checks: &[Check],
) -> Result<AuditResult, RuleEvaluationError> {
    let per_check: Vec<Vec<Finding>> = checks
        .par_iter()
        .map(|check| run_check(workflow, check))
        .collect::<Result<_, _>>()?;

    let mut findings: Vec<Finding> = per_check.into_iter().flatten().collect();
    findings.sort_by(|a, b| {
        (a.job.as_deref(), a.step, a.check_id.as_str()).cmp(&(
            b.job.as_deref(),
            b.step,
            b.check_id.as_str(),
        ))
    });

    Ok(AuditResult {
        findings,
        jobs_checked: workflow.jobs().len(),
        checks_executed: checks.len(),
    })
}

/// Runs one check against every site of its target granularity
fn run_check(workflow: &Workflow, check: &Check) -> Result<Vec<Finding>, RuleEvaluationError> {
    let mut findings = Vec::new();
    let root = workflow.as_node();

    match check.target() {
        Target::Workflow => {
            let bindings = Bindings::new().bind("workflow", root);
            if check.condition().eval_with(&bindings)?.is_truthy() {
                findings.push(finding(check, root.line(), None, None));
            }
        }
        Target::Job => {
            for (name, node) in workflow.jobs().entries() {
                let bindings = Bindings::new().bind("workflow", root).bind("job", node);
                if check.condition().eval_with(&bindings)?.is_truthy() {
                    findings.push(finding(
                        check,
                        name.line(),
                        Some(name.text().to_string()),
                        None,
                    ));
                }
            }
        }
        Target::Step => {
            for (name, job_node) in workflow.jobs().entries() {
                let steps = job_node.get("steps");
                for (index, step_node) in steps.into_iter().flat_map(|s| s.items()).enumerate() {
                    let bindings = Bindings::new()
                        .bind("workflow", root)
                        .bind("job", job_node)
                        .bind("step", step_node);
                    if check.condition().eval_with(&bindings)?.is_truthy() {
                        findings.push(finding(
                            check,
                            step_node.line(),
                            Some(name.text().to_string()),
                            Some(index),
                        ));
                    }
                }
            }
        }
    }

    Ok(findings)
}

fn finding(check: &Check, line: u32, job: Option<String>, step: Option<usize>) -> Finding {
    Finding {
        check_id: check.id().clone(),
        severity: check.severity(),
        message: check.description().to_string(),
        line,
        job,
        step,
    }
}
