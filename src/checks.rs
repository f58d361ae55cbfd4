#![forbid(unsafe_code)]

//! Check definitions and the parallel check runner

pub mod check;
pub mod runner;

pub use check::{Check, Target};
pub use runner::{AuditResult, Finding, run_checks};
