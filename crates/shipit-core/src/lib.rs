//! Core domain types and traits for the shipit deploy orchestrator.
//!
//! This crate contains:
//! - Run identifiers
//! - The build tool trait and invocation types
//! - Deploy plan definitions (modules, repositories, policy, flags)

pub mod build_tool;
pub mod error;
pub mod id;
pub mod plan;

pub use build_tool::{BuildTool, CommandInvocation, CommandOutcome};
pub use error::{Error, Result};
pub use id::RunId;
pub use plan::{
    DeployFlags, DeployMode, DeployPlan, Module, PackagingVariant, PlannedDeploy, PublishPolicy,
    RepositoryTarget,
};
