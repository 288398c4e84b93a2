//! Errors that end a deploy sweep early.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeployError {
    /// `clean` did not succeed; nothing after it in the sweep ran.
    #[error(
        "clean failed for module '{module}' ({}){}",
        .descriptor.display(),
        .exit_code.map(|c| format!(", exit code {}", c)).unwrap_or_default()
    )]
    CleanFailed {
        module: String,
        descriptor: PathBuf,
        exit_code: Option<i32>,
        output: String,
    },

    #[error(transparent)]
    Core(#[from] shipit_core::Error),
}
