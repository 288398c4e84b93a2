//! Dry-run backend: reports what would run without spawning anything.

use async_trait::async_trait;
use shipit_core::Result;
use shipit_core::build_tool::{BuildTool, CommandInvocation, CommandOutcome};
use tracing::info;

pub struct DryRunBuildTool {
    program: String,
    global_args: Vec<String>,
}

impl DryRunBuildTool {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            global_args: Vec::new(),
        }
    }

    /// Arguments shown before `-f`, matching what the real tool would get.
    pub fn with_global_args(mut self, args: Vec<String>) -> Self {
        self.global_args = args;
        self
    }
}

#[async_trait]
impl BuildTool for DryRunBuildTool {
    fn name(&self) -> &'static str {
        "dry-run"
    }

    async fn run(&self, invocation: &CommandInvocation) -> Result<CommandOutcome> {
        let line = invocation.command_line(&self.program, &self.global_args);
        info!(command = %line, "Dry run, not executing");
        Ok(CommandOutcome::Succeeded { output: line })
    }
}
