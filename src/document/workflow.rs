#![forbid(unsafe_code)]

//! Typed facade over a normalized document tree
//!
//! [`Workflow`] owns the normalized root node; [`Job`] and [`Step`] are
//! pass-through views borrowing into it, with no copying or transformation.
//! Missing-key lookups yield `None`, never an error, so checks can probe
//! optional fields freely. Lookups use normalized key names (`runs_on`, not
//! `runs-on`).

use crate::document::node::{Key, Node};
use crate::document::normalize::normalize;
use crate::error::NormalizationError;

/// A workflow document, normalized and ready for check evaluation
#[derive(Debug, Clone)]
pub struct Workflow {
    root: Node,
}

impl Workflow {
    /// Builds a workflow from a raw parsed tree, normalizing it
    ///
    /// # Errors
    ///
    /// Returns `NormalizationError` if the tree's shape cannot be normalized
    /// (non-mapping root or jobs, malformed trigger, key collision).
    pub fn from_node(raw: Node) -> Result<Self, NormalizationError> {
        Ok(Workflow {
            root: normalize(raw)?,
        })
    }

    /// The normalized root node, for use as a condition binding
    pub fn as_node(&self) -> &Node {
        &self.root
    }

    /// Top-level metadata: every entry except `jobs`, with the trigger field
    /// normalized into `triggers`
    pub fn meta(&self) -> &Node {
        // The normalizer guarantees both entries exist on the root.
        self.root.get("meta").unwrap_or(&self.root)
    }

    /// Mapping of job name → job definition
    pub fn jobs(&self) -> &Node {
        self.root.get("jobs").unwrap_or(&self.root)
    }

    /// Looks up a job by name
    pub fn job(&self, name: &str) -> Option<Job<'_>> {
        self.jobs()
            .entries()
            .find(|(key, _)| key.text() == name)
            .map(|(key, node)| Job {
                name: key.text(),
                node,
            })
    }

    /// Iterates jobs in declaration order
    pub fn iter_jobs(&self) -> impl Iterator<Item = Job<'_>> {
        self.jobs().entries().map(|(key, node)| Job {
            name: key.text(),
            node,
        })
    }
}

/// A borrowed view of one job's mapping
#[derive(Debug, Clone, Copy)]
pub struct Job<'a> {
    name: &'a str,
    node: &'a Node,
}

impl<'a> Job<'a> {
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// The underlying mapping node, for use as a condition binding
    pub fn node(&self) -> &'a Node {
        self.node
    }

    /// Looks up a job field by normalized key name
    pub fn get(&self, key: &str) -> Option<&'a Node> {
        self.node.get(key)
    }

    /// The job's keys, with their source lines
    pub fn keys(&self) -> impl Iterator<Item = &'a Key> {
        self.node.keys()
    }

    /// Iterates the job's steps in declaration order
    ///
    /// Empty when the job has no `steps` entry.
    pub fn steps(&self) -> impl Iterator<Item = Step<'a>> {
        self.node
            .get("steps")
            .into_iter()
            .flat_map(|steps| steps.items())
            .map(|node| Step { node })
    }

    /// Looks up a step by position
    pub fn step(&self, index: usize) -> Option<Step<'a>> {
        self.node
            .get("steps")
            .and_then(|steps| steps.index(index))
            .map(|node| Step { node })
    }
}

/// A borrowed view of one step's mapping
#[derive(Debug, Clone, Copy)]
pub struct Step<'a> {
    node: &'a Node,
}

impl<'a> Step<'a> {
    /// The underlying mapping node, for use as a condition binding
    pub fn node(&self) -> &'a Node {
        self.node
    }

    /// Looks up a step field by normalized key name
    pub fn get(&self, key: &str) -> Option<&'a Node> {
        self.node.get(key)
    }

    /// The `with` mapping of inputs passed to an action, if present
    pub fn with(&self) -> Option<&'a Node> {
        self.node.get("with")
    }

    /// The `uses` action reference, if present and a string
    pub fn uses(&self) -> Option<&'a str> {
        self.node.get("uses").and_then(Node::as_str)
    }

    /// Source line where this step starts
    pub fn line(&self) -> u32 {
        self.node.line()
    }
}
