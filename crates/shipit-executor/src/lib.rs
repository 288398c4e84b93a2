//! Build tool backends for shipit.
//!
//! Provides implementations of [`BuildTool`]:
//! - Maven subprocess (production)
//! - Dry run (prints command lines only)

pub mod dry_run;
pub mod maven;

pub use dry_run::DryRunBuildTool;
pub use maven::MavenBuildTool;
pub use shipit_core::build_tool::{BuildTool, CommandInvocation, CommandOutcome};
