//! Maven build tool backend.

use async_trait::async_trait;
use shipit_core::build_tool::{BuildTool, CommandInvocation, CommandOutcome};
use shipit_core::{Error, Result};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// Runs invocations as `<program> [global args] -f <descriptor> <phase> <args>`.
///
/// stdout and stderr are captured on separate pipes, so the reported output
/// is all of stdout followed by all of stderr rather than their interleaving.
pub struct MavenBuildTool {
    program: String,
    global_args: Vec<String>,
}

impl MavenBuildTool {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            global_args: Vec::new(),
        }
    }

    /// Arguments placed before `-f`, e.g. `--batch-mode`.
    pub fn with_global_args(mut self, args: Vec<String>) -> Self {
        self.global_args = args;
        self
    }
}

#[async_trait]
impl BuildTool for MavenBuildTool {
    fn name(&self) -> &'static str {
        "maven"
    }

    async fn run(&self, invocation: &CommandInvocation) -> Result<CommandOutcome> {
        info!(
            descriptor = %invocation.descriptor().display(),
            phase = %invocation.phase(),
            "Running build tool"
        );
        debug!(
            command = %invocation.command_line(&self.program, &self.global_args),
            "Command line"
        );

        let mut command = Command::new(&self.program);
        command
            .args(&self.global_args)
            .args(invocation.argv())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = command.output().await.map_err(|e| {
            Error::ExecutionFailed(format!("failed to start '{}': {}", self.program, e))
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let combined = if stderr.trim().is_empty() {
            stdout.trim_end().to_string()
        } else {
            format!("{}\n{}", stdout.trim_end(), stderr.trim_end())
        };

        if output.status.success() {
            Ok(CommandOutcome::Succeeded { output: combined })
        } else {
            debug!(exit_code = ?output.status.code(), "Build tool exited nonzero");
            Ok(CommandOutcome::Failed {
                exit_code: output.status.code(),
                output: combined,
            })
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use shipit_core::build_tool::{PHASE_CLEAN, PHASE_DEPLOY};
    use std::path::Path;

    /// Fake `mvn` that echoes what it was asked to do.
    /// Run through `sh` so the script itself never needs to be executable.
    fn fake_maven(dir: &Path) -> MavenBuildTool {
        let script = dir.join("fake-mvn.sh");
        std::fs::write(
            &script,
            r#"
echo "descriptor=$2 phase=$3"
shift 3
echo "args=$*"
echo "warning from stderr" >&2
"#,
        )
        .unwrap();
        MavenBuildTool::new("sh").with_global_args(vec![script.display().to_string()])
    }

    fn failing_maven(dir: &Path) -> MavenBuildTool {
        let script = dir.join("failing-mvn.sh");
        std::fs::write(&script, "echo \"BUILD FAILURE in $3\"\nexit 3\n").unwrap();
        MavenBuildTool::new("sh").with_global_args(vec![script.display().to_string()])
    }

    #[tokio::test]
    async fn test_success_captures_combined_output() {
        let tmp = tempfile::tempdir().unwrap();
        let tool = fake_maven(tmp.path());
        let invocation = CommandInvocation::new(
            "core/pom.xml",
            PHASE_DEPLOY,
            vec!["-DreleaseRepository=default".to_string()],
        )
        .unwrap();

        let outcome = tool.run(&invocation).await.unwrap();

        assert!(outcome.is_success());
        let output = outcome.output();
        assert!(output.contains("descriptor=core/pom.xml phase=deploy"));
        assert!(output.contains("args=-DreleaseRepository=default"));
        assert!(output.contains("warning from stderr"));
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_failed_outcome() {
        let tmp = tempfile::tempdir().unwrap();
        let tool = failing_maven(tmp.path());
        let invocation = CommandInvocation::new("core/pom.xml", PHASE_CLEAN, vec![]).unwrap();

        let outcome = tool.run(&invocation).await.unwrap();

        match outcome {
            CommandOutcome::Failed { exit_code, output } => {
                assert_eq!(exit_code, Some(3));
                assert_eq!(output, "BUILD FAILURE in clean");
            }
            other => panic!("Expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_program_is_error() {
        let tool = MavenBuildTool::new("shipit-no-such-build-tool");
        let invocation = CommandInvocation::new("core/pom.xml", PHASE_CLEAN, vec![]).unwrap();

        let result = tool.run(&invocation).await;
        assert!(matches!(result, Err(Error::ExecutionFailed(_))));
    }

    #[tokio::test]
    async fn test_stderr_follows_stdout_in_output() {
        let tmp = tempfile::tempdir().unwrap();
        let script = tmp.path().join("noisy-mvn.sh");
        std::fs::write(
            &script,
            "echo first >&2\necho second\necho third >&2\necho fourth\nexit 1\n",
        )
        .unwrap();
        let tool = MavenBuildTool::new("sh").with_global_args(vec![script.display().to_string()]);
        let invocation = CommandInvocation::new("pom.xml", PHASE_DEPLOY, vec![]).unwrap();

        let outcome = tool.run(&invocation).await.unwrap();
        assert!(!outcome.is_success());
        assert_eq!(outcome.output(), "second\nfourth\nfirst\nthird");
    }
}
