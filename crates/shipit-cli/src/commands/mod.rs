//! CLI command implementations.

pub mod run;

use anyhow::{Context, Result};
use shipit_config::{VariableContext, load_plan, parse_config};
use shipit_core::build_tool::{CommandInvocation, PHASE_CLEAN, PHASE_DEPLOY};
use shipit_core::{DeployMode, PlannedDeploy};
use std::path::Path;
use std::process::ExitCode;

pub fn validate(path: &Path) -> Result<ExitCode> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let vars = VariableContext::from_env(DeployMode::default());
    match parse_config(&content, &vars) {
        Ok(_config) => {
            println!("Configuration is valid");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Print every invocation a deploy would make, without touching the build tool.
pub fn plan(
    config: &Path,
    root: Option<&Path>,
    mode: DeployMode,
    program: &str,
    tool_args: &[String],
) -> Result<()> {
    let plan = load_plan(config, mode, root)
        .with_context(|| format!("Failed to load deploy plan: {}", config.display()))?;

    println!("Project: {} ({})", plan.project, plan.mode);
    for module in &plan.modules {
        println!("\n{} [{}]", module.name, module.descriptor.display());

        let clean = CommandInvocation::new(&module.descriptor, PHASE_CLEAN, Vec::new())?;
        println!("  {}", clean.command_line(program, tool_args));

        for step in plan.schedule(&module.name) {
            match step {
                PlannedDeploy::Excluded { repository } => {
                    println!("  (skip {}: excluded by publish policy)", repository.id);
                }
                PlannedDeploy::Deploy { args, .. } => {
                    let deploy = CommandInvocation::new(&module.descriptor, PHASE_DEPLOY, args)?;
                    println!("  {}", deploy.command_line(program, tool_args));
                }
            }
        }
    }

    Ok(())
}
