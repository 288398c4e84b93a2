//! Run reports and the human-readable lines printed for them.

use chrono::{DateTime, Utc};
use shipit_core::{DeployMode, RunId};
use std::path::{Path, PathBuf};

/// How one deploy attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Succeeded,
    Failed {
        exit_code: Option<i32>,
        output: String,
    },
    /// Not attempted because the publish policy rejected the pair.
    Skipped { reason: String },
}

/// One module/repository deploy, or the skip of one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub module: String,
    pub descriptor: PathBuf,
    pub repository: String,
    /// True for the extra packaging-variant deploy.
    pub variant: bool,
    pub status: StepStatus,
}

/// Result of a deploy sweep.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: RunId,
    pub mode: DeployMode,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub steps: Vec<StepRecord>,
}

impl RunReport {
    pub fn new(mode: DeployMode) -> Self {
        Self {
            run_id: RunId::new(),
            mode,
            started_at: Utc::now(),
            finished_at: None,
            steps: Vec::new(),
        }
    }

    /// True unless some deploy step failed.
    pub fn success(&self) -> bool {
        !self
            .steps
            .iter()
            .any(|s| matches!(s.status, StepStatus::Failed { .. }))
    }

    /// Process exit status for this run.
    pub fn exit_code(&self) -> i32 {
        if self.success() { 0 } else { 1 }
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps
            .iter()
            .filter(|s| matches!(s.status, StepStatus::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&StepStatus) -> bool) -> usize {
        self.steps.iter().filter(|s| pred(&s.status)).count()
    }

    /// One-line tally, e.g. `4 deployed, 1 failed, 1 skipped`.
    pub fn summary(&self) -> String {
        let deployed = self.count(|s| matches!(s, StepStatus::Succeeded));
        let failed = self.count(|s| matches!(s, StepStatus::Failed { .. }));
        let skipped = self.count(|s| matches!(s, StepStatus::Skipped { .. }));
        format!(
            "{} deployed, {} failed, {} skipped",
            deployed, failed, skipped
        )
    }
}

fn target_label(repository: &str, variant: bool) -> String {
    if variant {
        format!("{} [variant]", repository)
    } else {
        repository.to_string()
    }
}

/// Confirmation printed to stdout after a successful deploy.
pub fn success_line(descriptor: &Path, repository: &str, variant: bool) -> String {
    format!(
        "Deployed {} to {}",
        descriptor.display(),
        target_label(repository, variant)
    )
}

fn bracketed(label: &str, output: &str) -> String {
    format!(
        "===== BEGIN {label} =====\n{}\n===== END {label} =====",
        output.trim_end()
    )
}

/// Block printed to stderr after a failed deploy, bracketing the captured
/// build output with markers naming the descriptor and repository.
pub fn failure_block(descriptor: &Path, repository: &str, variant: bool, output: &str) -> String {
    let label = format!(
        "DEPLOY FAILURE: {} -> {}",
        descriptor.display(),
        target_label(repository, variant)
    );
    bracketed(&label, output)
}

/// Block printed to stderr when `clean` fails and the run is aborted.
pub fn clean_failure_block(descriptor: &Path, output: &str) -> String {
    bracketed(&format!("CLEAN FAILURE: {}", descriptor.display()), output)
}
