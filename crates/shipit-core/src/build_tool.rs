//! Build tool trait and invocation types.
//!
//! A build tool runs one lifecycle phase against one module descriptor
//! (e.g. `mvn -f core/pom.xml deploy ...`) and reports how it went.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// The `clean` lifecycle phase.
pub const PHASE_CLEAN: &str = "clean";
/// The `deploy` lifecycle phase.
pub const PHASE_DEPLOY: &str = "deploy";

/// A single build tool call: descriptor, phase and extra arguments.
///
/// Only obtainable through [`CommandInvocation::new`], so every value that
/// reaches a [`BuildTool`] has both a descriptor and a phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    descriptor: PathBuf,
    phase: String,
    args: Vec<String>,
}

impl CommandInvocation {
    pub fn new(
        descriptor: impl Into<PathBuf>,
        phase: impl Into<String>,
        args: Vec<String>,
    ) -> Result<Self> {
        let descriptor = descriptor.into();
        let phase = phase.into();

        if descriptor.as_os_str().is_empty() {
            return Err(Error::InvalidInvocation(
                "descriptor path is not set".to_string(),
            ));
        }
        if phase.trim().is_empty() {
            return Err(Error::InvalidInvocation(format!(
                "phase is not set for {}",
                descriptor.display()
            )));
        }

        Ok(Self {
            descriptor,
            phase,
            args,
        })
    }

    pub fn descriptor(&self) -> &Path {
        &self.descriptor
    }

    pub fn phase(&self) -> &str {
        &self.phase
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Full argument vector passed to the build tool binary.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 3);
        argv.push("-f".to_string());
        argv.push(self.descriptor.display().to_string());
        argv.push(self.phase.clone());
        argv.extend(self.args.iter().cloned());
        argv
    }

    /// Human-readable command line, for logs and dry runs. `global_args`
    /// are the tool's own arguments, placed before `-f`.
    pub fn command_line(&self, program: &str, global_args: &[String]) -> String {
        let mut line = program.to_string();
        for arg in global_args.iter().cloned().chain(self.argv()) {
            line.push(' ');
            line.push_str(&arg);
        }
        line
    }
}

/// Outcome of a finished build tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Process exited with status 0.
    Succeeded { output: String },
    /// Process exited nonzero, or was killed by a signal (`exit_code` is None).
    Failed {
        exit_code: Option<i32>,
        output: String,
    },
}

impl CommandOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CommandOutcome::Succeeded { .. })
    }

    /// Captured output of the call. Backends that capture the streams
    /// separately report stdout first, then stderr.
    pub fn output(&self) -> &str {
        match self {
            CommandOutcome::Succeeded { output } | CommandOutcome::Failed { output, .. } => output,
        }
    }
}

/// Trait for build tool backends.
#[async_trait]
pub trait BuildTool: Send + Sync {
    /// Name of this backend.
    fn name(&self) -> &'static str;

    /// Run the invocation to completion.
    ///
    /// Returns `Err` only when the tool could not be started at all; a
    /// process that ran and exited nonzero is `Ok(CommandOutcome::Failed)`.
    async fn run(&self, invocation: &CommandInvocation) -> Result<CommandOutcome>;
}
