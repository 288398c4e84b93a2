//! Deploy orchestrator - runs clean and deploy for every module in order.

use crate::error::DeployError;
use crate::report::{RunReport, StepRecord, StepStatus};
use chrono::Utc;
use shipit_core::build_tool::{
    BuildTool, CommandInvocation, CommandOutcome, PHASE_CLEAN, PHASE_DEPLOY,
};
use shipit_core::plan::{DeployPlan, Module, PlannedDeploy, RepositoryTarget};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{Instrument, error, info, info_span, warn};

/// Event emitted during a deploy sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployEvent {
    /// Descriptor file missing; nothing ran for this module.
    ModuleSkipped { module: String, descriptor: PathBuf },
    CleanStarted { module: String },
    CleanFailed {
        module: String,
        descriptor: PathBuf,
        output: String,
    },
    RepositorySkipped { module: String, repository: String },
    DeploySucceeded {
        module: String,
        descriptor: PathBuf,
        repository: String,
        variant: bool,
    },
    DeployFailed {
        module: String,
        descriptor: PathBuf,
        repository: String,
        variant: bool,
        exit_code: Option<i32>,
        output: String,
    },
    RunCompleted { success: bool },
}

/// Drives a [`DeployPlan`] through a [`BuildTool`], one command at a time.
///
/// A failed `clean` aborts the run. A failed `deploy` is recorded and the
/// sweep moves on to the next repository.
pub struct DeployOrchestrator {
    tool: Arc<dyn BuildTool>,
}

impl DeployOrchestrator {
    pub fn new(tool: Arc<dyn BuildTool>) -> Self {
        Self { tool }
    }

    /// Run the plan on a background task, returning a channel of events and
    /// a handle to the final report.
    pub fn execute(
        &self,
        plan: DeployPlan,
    ) -> (
        mpsc::UnboundedReceiver<DeployEvent>,
        tokio::task::JoinHandle<Result<RunReport, DeployError>>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let tool = self.tool.clone();

        let handle = tokio::spawn(async move { Self::run_inner(tool, &plan, &tx).await });

        (rx, handle)
    }

    /// Run the plan inline, sending events to `tx`.
    ///
    /// The channel is unbounded, so the sweep never waits on a caller that
    /// only drains it after `run` returns.
    pub async fn run(
        &self,
        plan: &DeployPlan,
        tx: &mpsc::UnboundedSender<DeployEvent>,
    ) -> Result<RunReport, DeployError> {
        Self::run_inner(self.tool.clone(), plan, tx).await
    }

    async fn run_inner(
        tool: Arc<dyn BuildTool>,
        plan: &DeployPlan,
        tx: &mpsc::UnboundedSender<DeployEvent>,
    ) -> Result<RunReport, DeployError> {
        let mut report = RunReport::new(plan.mode);
        let span = info_span!(
            "deploy_run",
            run_id = %report.run_id,
            mode = %plan.mode,
            tool = tool.name()
        );

        async {
            info!(
                modules = plan.modules.len(),
                repositories = plan.repositories.len(),
                "Starting deploy sweep"
            );

            for module in &plan.modules {
                Self::deploy_module(tool.as_ref(), plan, module, &mut report, tx).await?;
            }

            report.finished_at = Some(Utc::now());
            let success = report.success();
            info!(success, summary = %report.summary(), "Deploy sweep finished");
            let _ = tx.send(DeployEvent::RunCompleted { success });

            Ok(report)
        }
        .instrument(span)
        .await
    }

    async fn deploy_module(
        tool: &dyn BuildTool,
        plan: &DeployPlan,
        module: &Module,
        report: &mut RunReport,
        tx: &mpsc::UnboundedSender<DeployEvent>,
    ) -> Result<(), DeployError> {
        if !module.descriptor.is_file() {
            info!(
                module = %module.name,
                descriptor = %module.descriptor.display(),
                "Skipping module without descriptor"
            );
            let _ = tx.send(DeployEvent::ModuleSkipped {
                module: module.name.clone(),
                descriptor: module.descriptor.clone(),
            });
            return Ok(());
        }

        Self::clean(tool, module, tx).await?;

        for step in plan.schedule(&module.name) {
            match step {
                PlannedDeploy::Excluded { repository } => {
                    info!(
                        module = %module.name,
                        repository = %repository.id,
                        "Publish policy excludes repository"
                    );
                    report.steps.push(StepRecord {
                        module: module.name.clone(),
                        descriptor: module.descriptor.clone(),
                        repository: repository.id.clone(),
                        variant: false,
                        status: StepStatus::Skipped {
                            reason: format!(
                                "module '{}' may not publish to '{}'",
                                module.name, repository.id
                            ),
                        },
                    });
                    let _ = tx.send(DeployEvent::RepositorySkipped {
                        module: module.name.clone(),
                        repository: repository.id.clone(),
                    });
                }
                PlannedDeploy::Deploy {
                    repository,
                    args,
                    variant,
                } => {
                    Self::deploy(tool, module, repository, args, variant, report, tx).await?;
                }
            }
        }

        Ok(())
    }

    async fn clean(
        tool: &dyn BuildTool,
        module: &Module,
        tx: &mpsc::UnboundedSender<DeployEvent>,
    ) -> Result<(), DeployError> {
        let invocation = CommandInvocation::new(&module.descriptor, PHASE_CLEAN, Vec::new())?;

        let _ = tx.send(DeployEvent::CleanStarted {
            module: module.name.clone(),
        });

        let (exit_code, output) = match tool.run(&invocation).await {
            Ok(CommandOutcome::Succeeded { .. }) => return Ok(()),
            Ok(CommandOutcome::Failed { exit_code, output }) => (exit_code, output),
            Err(e) => (None, e.to_string()),
        };

        error!(module = %module.name, ?exit_code, "Clean failed, aborting run");
        let _ = tx.send(DeployEvent::CleanFailed {
            module: module.name.clone(),
            descriptor: module.descriptor.clone(),
            output: output.clone(),
        });

        Err(DeployError::CleanFailed {
            module: module.name.clone(),
            descriptor: module.descriptor.clone(),
            exit_code,
            output,
        })
    }

    async fn deploy(
        tool: &dyn BuildTool,
        module: &Module,
        repository: &RepositoryTarget,
        args: Vec<String>,
        variant: bool,
        report: &mut RunReport,
        tx: &mpsc::UnboundedSender<DeployEvent>,
    ) -> Result<(), DeployError> {
        let invocation = CommandInvocation::new(&module.descriptor, PHASE_DEPLOY, args)?;

        let outcome = match tool.run(&invocation).await {
            Ok(outcome) => outcome,
            Err(e) => CommandOutcome::Failed {
                exit_code: None,
                output: e.to_string(),
            },
        };

        let status = match outcome {
            CommandOutcome::Succeeded { .. } => {
                info!(module = %module.name, repository = %repository.id, variant, "Deploy succeeded");
                let _ = tx.send(DeployEvent::DeploySucceeded {
                    module: module.name.clone(),
                    descriptor: module.descriptor.clone(),
                    repository: repository.id.clone(),
                    variant,
                });
                StepStatus::Succeeded
            }
            CommandOutcome::Failed { exit_code, output } => {
                warn!(module = %module.name, repository = %repository.id, variant, ?exit_code, "Deploy failed");
                let _ = tx.send(DeployEvent::DeployFailed {
                    module: module.name.clone(),
                    descriptor: module.descriptor.clone(),
                    repository: repository.id.clone(),
                    variant,
                    exit_code,
                    output: output.clone(),
                });
                StepStatus::Failed { exit_code, output }
            }
        };

        report.steps.push(StepRecord {
            module: module.name.clone(),
            descriptor: module.descriptor.clone(),
            repository: repository.id.clone(),
            variant,
            status,
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::success_line;
    use shipit_core::Error;
    use shipit_core::plan::{DEFAULT_REPOSITORY, DeployMode, PackagingVariant, PublishPolicy};
    use std::collections::HashSet;
    use std::path::Path;
    use std::sync::Mutex;

    /// Records every invocation; fails the (descriptor, phase[, repository])
    /// combinations it was told to fail. Phases in `unavailable` return
    /// `Err` as if the binary could not be started.
    #[derive(Default)]
    struct MockBuildTool {
        calls: Mutex<Vec<CommandInvocation>>,
        fail_clean: HashSet<PathBuf>,
        fail_deploy: HashSet<(PathBuf, String)>,
        unavailable: HashSet<&'static str>,
    }

    impl MockBuildTool {
        fn calls(&self) -> Vec<CommandInvocation> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl BuildTool for MockBuildTool {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn run(
            &self,
            invocation: &CommandInvocation,
        ) -> shipit_core::Result<CommandOutcome> {
            self.calls.lock().unwrap().push(invocation.clone());
            if self.unavailable.contains(invocation.phase()) {
                return Err(Error::ExecutionFailed(format!(
                    "failed to start 'mvn' for {}",
                    invocation.phase()
                )));
            }
            let descriptor = invocation.descriptor().to_path_buf();

            let failed = match invocation.phase() {
                PHASE_CLEAN => self.fail_clean.contains(&descriptor),
                _ => self.fail_deploy.iter().any(|(d, repo)| {
                    *d == descriptor
                        && invocation
                            .args()
                            .iter()
                            .any(|a| a.ends_with(&format!("Repository={}", repo)))
                }),
            };

            if failed {
                Ok(CommandOutcome::Failed {
                    exit_code: Some(1),
                    output: format!("BUILD FAILURE {}", invocation.phase()),
                })
            } else {
                Ok(CommandOutcome::Succeeded {
                    output: "BUILD SUCCESS".to_string(),
                })
            }
        }
    }

    fn make_modules(root: &Path, names: &[&str]) -> Vec<Module> {
        names
            .iter()
            .map(|name| {
                let module = Module::in_root(root, *name, "pom.xml");
                std::fs::create_dir_all(root.join(name)).unwrap();
                std::fs::write(&module.descriptor, "<project/>").unwrap();
                module
            })
            .collect()
    }

    fn kong() -> RepositoryTarget {
        RepositoryTarget::with_url("kong", "file:///shares/maven2")
    }

    async fn run_plan(
        tool: Arc<MockBuildTool>,
        plan: DeployPlan,
    ) -> (Vec<DeployEvent>, Result<RunReport, DeployError>) {
        let orchestrator = DeployOrchestrator::new(tool);
        let (mut rx, handle) = orchestrator.execute(plan);

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        (events, handle.await.unwrap())
    }

    fn deploy_calls(calls: &[CommandInvocation]) -> Vec<(PathBuf, Vec<String>)> {
        calls
            .iter()
            .filter(|c| c.phase() == PHASE_DEPLOY)
            .map(|c| (c.descriptor().to_path_buf(), c.args().to_vec()))
            .collect()
    }

    fn targets(calls: &[CommandInvocation], descriptor: &Path) -> Vec<String> {
        deploy_calls(calls)
            .into_iter()
            .filter(|(d, _)| d == descriptor)
            .filter_map(|(_, args)| {
                args.iter()
                    .find_map(|a| a.split_once("Repository=").map(|(_, id)| id.to_string()))
            })
            .collect()
    }

    #[tokio::test]
    async fn test_missing_descriptor_skips_module() {
        let tmp = tempfile::tempdir().unwrap();
        let mut modules = make_modules(tmp.path(), &["core"]);
        modules.insert(0, Module::in_root(tmp.path(), "ghost", "pom.xml"));

        let tool = Arc::new(MockBuildTool::default());
        let plan = DeployPlan {
            modules,
            repositories: vec![RepositoryTarget::new(DEFAULT_REPOSITORY)],
            ..Default::default()
        };

        let (events, result) = run_plan(tool.clone(), plan).await;
        let report = result.unwrap();

        assert!(matches!(
            &events[0],
            DeployEvent::ModuleSkipped { module, .. } if module == "ghost"
        ));
        let ghost = tmp.path().join("ghost").join("pom.xml");
        assert!(tool.calls().iter().all(|c| c.descriptor() != ghost));
        assert!(report.steps.iter().all(|s| s.module != "ghost"));
        assert_eq!(report.steps.len(), 1);
        assert!(report.success());
    }

    #[tokio::test]
    async fn test_clean_failure_aborts_run() {
        let tmp = tempfile::tempdir().unwrap();
        let modules = make_modules(tmp.path(), &["a", "b", "c"]);

        let tool = Arc::new(MockBuildTool {
            fail_clean: [modules[1].descriptor.clone()].into_iter().collect(),
            ..Default::default()
        });
        let plan = DeployPlan {
            modules: modules.clone(),
            repositories: vec![RepositoryTarget::new(DEFAULT_REPOSITORY), kong()],
            ..Default::default()
        };

        let (events, result) = run_plan(tool.clone(), plan).await;

        match result {
            Err(DeployError::CleanFailed { module, exit_code, .. }) => {
                assert_eq!(module, "b");
                assert_eq!(exit_code, Some(1));
            }
            other => panic!("Expected CleanFailed, got {:?}", other),
        }

        let calls = tool.calls();
        // a: clean + 2 deploys, b: clean only, c: nothing
        assert_eq!(calls.len(), 4);
        assert!(targets(&calls, &modules[1].descriptor).is_empty());
        assert!(calls.iter().all(|c| c.descriptor() != modules[2].descriptor));
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, DeployEvent::RunCompleted { .. }))
        );
    }

    #[tokio::test]
    async fn test_default_repository_allow_list() {
        let tmp = tempfile::tempdir().unwrap();
        let modules = make_modules(tmp.path(), &["a", "b"]);

        let mut policy = PublishPolicy::new();
        policy.allow(DEFAULT_REPOSITORY, ["a"]);

        let tool = Arc::new(MockBuildTool::default());
        let plan = DeployPlan {
            modules: modules.clone(),
            repositories: vec![RepositoryTarget::new(DEFAULT_REPOSITORY), kong()],
            policy,
            ..Default::default()
        };

        let (events, result) = run_plan(tool.clone(), plan).await;
        let report = result.unwrap();

        let calls = tool.calls();
        assert_eq!(targets(&calls, &modules[0].descriptor), vec!["default", "kong"]);
        assert_eq!(targets(&calls, &modules[1].descriptor), vec!["kong"]);
        assert!(events.contains(&DeployEvent::RepositorySkipped {
            module: "b".to_string(),
            repository: "default".to_string(),
        }));
        assert!(report.success());
        assert_eq!(report.summary(), "3 deployed, 0 failed, 1 skipped");
    }

    #[tokio::test]
    async fn test_deploy_failure_is_recorded_and_run_continues() {
        let tmp = tempfile::tempdir().unwrap();
        // B runs before A here.
        let modules = make_modules(tmp.path(), &["b", "a"]);

        let tool = Arc::new(MockBuildTool {
            fail_deploy: [(modules[0].descriptor.clone(), "kong".to_string())]
                .into_iter()
                .collect(),
            ..Default::default()
        });
        let plan = DeployPlan {
            modules: modules.clone(),
            repositories: vec![kong()],
            ..Default::default()
        };

        let (events, result) = run_plan(tool.clone(), plan).await;
        let report = result.unwrap();

        assert_eq!(report.exit_code(), 1);
        assert_eq!(targets(&tool.calls(), &modules[1].descriptor), vec!["kong"]);

        let failed_at = events
            .iter()
            .position(|e| matches!(e, DeployEvent::DeployFailed { module, .. } if module == "b"))
            .unwrap();
        let succeeded_at = events
            .iter()
            .position(|e| matches!(e, DeployEvent::DeploySucceeded { module, .. } if module == "a"))
            .unwrap();
        assert!(failed_at < succeeded_at);
        assert_eq!(
            events.last(),
            Some(&DeployEvent::RunCompleted { success: false })
        );
    }

    #[tokio::test]
    async fn test_release_to_default_repository() {
        let tmp = tempfile::tempdir().unwrap();
        let modules = make_modules(tmp.path(), &["core"]);

        let tool = Arc::new(MockBuildTool::default());
        let plan = DeployPlan {
            modules: modules.clone(),
            repositories: vec![RepositoryTarget::new(DEFAULT_REPOSITORY)],
            mode: DeployMode::Release,
            ..Default::default()
        };

        let (_, result) = run_plan(tool.clone(), plan).await;
        assert!(result.unwrap().success());

        let calls = tool.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].phase(), PHASE_CLEAN);
        assert!(calls[0].args().is_empty());
        assert_eq!(calls[1].phase(), PHASE_DEPLOY);
        assert!(
            calls[1]
                .args()
                .contains(&"-DreleaseRepository=default".to_string())
        );
        assert!(
            !calls[1]
                .args()
                .iter()
                .any(|a| a.starts_with("-DaltDeploymentRepository"))
        );
    }

    #[tokio::test]
    async fn test_repository_url_override() {
        let tmp = tempfile::tempdir().unwrap();
        let modules = make_modules(tmp.path(), &["core"]);

        let tool = Arc::new(MockBuildTool::default());
        let plan = DeployPlan {
            modules,
            repositories: vec![kong()],
            ..Default::default()
        };

        let (_, result) = run_plan(tool.clone(), plan).await;
        result.unwrap();

        let deploys = deploy_calls(&tool.calls());
        assert_eq!(deploys.len(), 1);
        assert!(deploys[0].1.contains(
            &"-DaltDeploymentRepository=kong::default::file:///shares/maven2".to_string()
        ));
        assert!(deploys[0].1.contains(&"-DsnapshotRepository=kong".to_string()));
    }

    #[tokio::test]
    async fn test_packaging_variant_adds_second_deploy() {
        let tmp = tempfile::tempdir().unwrap();
        let modules = make_modules(tmp.path(), &["core", "terracotta"]);

        let tool = Arc::new(MockBuildTool::default());
        let plan = DeployPlan {
            modules: modules.clone(),
            repositories: vec![RepositoryTarget::new(DEFAULT_REPOSITORY), kong()],
            variants: vec![PackagingVariant {
                module: "terracotta".to_string(),
                repository: "kong".to_string(),
                args: vec!["-Pexpress".to_string()],
            }],
            ..Default::default()
        };

        let (_, result) = run_plan(tool.clone(), plan).await;
        let report = result.unwrap();

        let deploys: Vec<_> = deploy_calls(&tool.calls())
            .into_iter()
            .filter(|(d, _)| *d == modules[1].descriptor)
            .collect();
        assert_eq!(deploys.len(), 3);
        assert_eq!(deploys[2].0, modules[1].descriptor);
        assert_eq!(deploys[2].1.last().map(String::as_str), Some("-Pexpress"));
        assert_eq!(&deploys[2].1[..deploys[1].1.len()], deploys[1].1.as_slice());

        let variants: Vec<_> = report.steps.iter().filter(|s| s.variant).collect();
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].repository, "kong");
    }

    #[tokio::test]
    async fn test_repeated_runs_are_identical() {
        let tmp = tempfile::tempdir().unwrap();
        let modules = make_modules(tmp.path(), &["core", "web"]);
        let plan = DeployPlan {
            modules,
            repositories: vec![RepositoryTarget::new(DEFAULT_REPOSITORY), kong()],
            ..Default::default()
        };

        let mut runs = Vec::new();
        for _ in 0..2 {
            let tool = Arc::new(MockBuildTool::default());
            let (events, result) = run_plan(tool, plan.clone()).await;
            let report = result.unwrap();
            assert_eq!(report.exit_code(), 0);

            let lines: Vec<String> = events
                .iter()
                .filter_map(|e| match e {
                    DeployEvent::DeploySucceeded {
                        descriptor,
                        repository,
                        variant,
                        ..
                    } => Some(success_line(descriptor, repository, *variant)),
                    _ => None,
                })
                .collect();
            runs.push(lines);
        }

        assert_eq!(runs[0].len(), 4);
        assert_eq!(runs[0], runs[1]);
    }

    #[tokio::test]
    async fn test_run_inline() {
        let tmp = tempfile::tempdir().unwrap();
        let modules = make_modules(tmp.path(), &["core"]);
        let plan = DeployPlan {
            modules,
            repositories: vec![kong()],
            ..Default::default()
        };

        let orchestrator = DeployOrchestrator::new(Arc::new(MockBuildTool::default()));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let report = orchestrator.run(&plan, &tx).await.unwrap();
        drop(tx);

        assert!(report.finished_at.is_some());
        let mut count = 0;
        while rx.recv().await.is_some() {
            count += 1;
        }
        // clean started, deploy succeeded, run completed
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn test_run_inline_does_not_wait_on_undrained_receiver() {
        let tmp = tempfile::tempdir().unwrap();
        let names: Vec<String> = (0..8).map(|i| format!("module-{}", i)).collect();
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let plan = DeployPlan {
            modules: make_modules(tmp.path(), &names),
            repositories: vec![RepositoryTarget::new(DEFAULT_REPOSITORY), kong()],
            ..Default::default()
        };

        let orchestrator = DeployOrchestrator::new(Arc::new(MockBuildTool::default()));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let report = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            orchestrator.run(&plan, &tx),
        )
        .await
        .expect("inline run finished without the receiver being drained")
        .unwrap();
        drop(tx);

        assert_eq!(report.steps.len(), 16);
        let mut count = 0;
        while rx.recv().await.is_some() {
            count += 1;
        }
        // per module: clean started + 2 deploys; then run completed
        assert_eq!(count, 8 * 3 + 1);
    }

    #[tokio::test]
    async fn test_clean_tool_unavailable_aborts_run() {
        let tmp = tempfile::tempdir().unwrap();
        let modules = make_modules(tmp.path(), &["a", "b"]);

        let tool = Arc::new(MockBuildTool {
            unavailable: [PHASE_CLEAN].into_iter().collect(),
            ..Default::default()
        });
        let plan = DeployPlan {
            modules,
            repositories: vec![kong()],
            ..Default::default()
        };

        let (events, result) = run_plan(tool.clone(), plan).await;

        match result {
            Err(DeployError::CleanFailed {
                module,
                exit_code,
                output,
                ..
            }) => {
                assert_eq!(module, "a");
                assert_eq!(exit_code, None);
                assert!(output.contains("failed to start"));
            }
            other => panic!("Expected CleanFailed, got {:?}", other),
        }

        let calls = tool.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].phase(), PHASE_CLEAN);
        assert!(
            events
                .iter()
                .any(|e| matches!(e, DeployEvent::CleanFailed { module, .. } if module == "a"))
        );
    }

    #[tokio::test]
    async fn test_deploy_tool_unavailable_is_recorded_and_run_continues() {
        let tmp = tempfile::tempdir().unwrap();
        let modules = make_modules(tmp.path(), &["a", "b"]);

        let tool = Arc::new(MockBuildTool {
            unavailable: [PHASE_DEPLOY].into_iter().collect(),
            ..Default::default()
        });
        let plan = DeployPlan {
            modules: modules.clone(),
            repositories: vec![kong()],
            ..Default::default()
        };

        let (events, result) = run_plan(tool.clone(), plan).await;
        let report = result.unwrap();

        assert_eq!(report.exit_code(), 1);
        assert_eq!(report.summary(), "0 deployed, 2 failed, 0 skipped");
        assert!(report.failures().all(|s| matches!(
            &s.status,
            StepStatus::Failed { exit_code: None, output } if output.contains("failed to start")
        )));
        // b was still cleaned and deployed after a's deploy failed
        assert_eq!(targets(&tool.calls(), &modules[1].descriptor), vec!["kong"]);
        assert_eq!(
            events.last(),
            Some(&DeployEvent::RunCompleted { success: false })
        );
    }

    #[tokio::test]
    async fn test_descriptor_directory_is_not_a_module() {
        let tmp = tempfile::tempdir().unwrap();
        let mut modules = make_modules(tmp.path(), &["core"]);
        let odd = Module::in_root(tmp.path(), "odd", "pom.xml");
        std::fs::create_dir_all(&odd.descriptor).unwrap();
        modules.push(odd.clone());

        let tool = Arc::new(MockBuildTool::default());
        let plan = DeployPlan {
            modules,
            repositories: vec![RepositoryTarget::new(DEFAULT_REPOSITORY)],
            ..Default::default()
        };

        let (events, result) = run_plan(tool.clone(), plan).await;
        assert!(result.unwrap().success());

        assert!(events.contains(&DeployEvent::ModuleSkipped {
            module: "odd".to_string(),
            descriptor: odd.descriptor.clone(),
        }));
        assert!(tool.calls().iter().all(|c| c.descriptor() != odd.descriptor));
    }
}
