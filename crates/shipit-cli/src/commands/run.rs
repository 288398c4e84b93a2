//! Deploy sweep command.

use anyhow::{Context, Result};
use shipit_config::load_plan;
use shipit_core::{BuildTool, DeployMode};
use shipit_executor::{DryRunBuildTool, MavenBuildTool};
use shipit_scheduler::{
    DeployEvent, DeployOrchestrator, clean_failure_block, failure_block, success_line,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

pub struct RunOptions {
    pub config: PathBuf,
    pub root: Option<PathBuf>,
    pub mode: DeployMode,
    pub build_tool: String,
    pub tool_args: Vec<String>,
    pub dry_run: bool,
}

/// Clean and deploy every module in the plan.
///
/// Exits 0 when every deploy succeeded and 1 when any failed. A failed
/// clean ends the run with an error instead.
pub async fn run_deploy(options: RunOptions) -> Result<ExitCode> {
    let plan = load_plan(&options.config, options.mode, options.root.as_deref())
        .with_context(|| format!("Failed to load deploy plan: {}", options.config.display()))?;

    info!(
        project = %plan.project,
        mode = %plan.mode,
        modules = plan.modules.len(),
        "Loaded deploy plan"
    );

    let tool: Arc<dyn BuildTool> = if options.dry_run {
        Arc::new(DryRunBuildTool::new(options.build_tool).with_global_args(options.tool_args))
    } else {
        Arc::new(MavenBuildTool::new(options.build_tool).with_global_args(options.tool_args))
    };

    let orchestrator = DeployOrchestrator::new(tool);
    let (mut rx, result_handle) = orchestrator.execute(plan);

    while let Some(event) = rx.recv().await {
        match event {
            DeployEvent::DeploySucceeded {
                descriptor,
                repository,
                variant,
                ..
            } => {
                println!("{}", success_line(&descriptor, &repository, variant));
            }
            DeployEvent::DeployFailed {
                descriptor,
                repository,
                variant,
                output,
                ..
            } => {
                eprintln!(
                    "{}",
                    failure_block(&descriptor, &repository, variant, &output)
                );
            }
            DeployEvent::CleanFailed {
                descriptor, output, ..
            } => {
                eprintln!("{}", clean_failure_block(&descriptor, &output));
            }
            // Logged by the orchestrator.
            DeployEvent::ModuleSkipped { .. }
            | DeployEvent::CleanStarted { .. }
            | DeployEvent::RepositorySkipped { .. }
            | DeployEvent::RunCompleted { .. } => {}
        }
    }

    let report = result_handle
        .await
        .context("Deploy task failed")?
        .context("Deploy run aborted")?;

    eprintln!("{}", report.summary());
    for failure in report.failures() {
        eprintln!(
            "  failed: {} -> {}{}",
            failure.module,
            failure.repository,
            if failure.variant { " [variant]" } else { "" }
        );
    }

    Ok(ExitCode::from(report.exit_code() as u8))
}
