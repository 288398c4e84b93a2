//! Deploy sweep orchestration for shipit.

pub mod error;
pub mod orchestrator;
pub mod report;

pub use error::DeployError;
pub use orchestrator::{DeployEvent, DeployOrchestrator};
pub use report::{
    RunReport, StepRecord, StepStatus, clean_failure_block, failure_block, success_line,
};
