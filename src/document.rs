#![forbid(unsafe_code)]

//! Position-aware document model: line-tagged nodes, normalization, and the
//! typed workflow facade.

pub mod node;
pub mod normalize;
pub mod workflow;

pub use node::{Key, Node, NodeKind, Scalar};
pub use normalize::normalize;
pub use workflow::{Job, Step, Workflow};
