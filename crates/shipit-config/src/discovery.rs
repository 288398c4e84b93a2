//! Module discovery by directory scan.

use crate::{ConfigError, ConfigResult};
use shipit_core::Module;
use std::path::Path;
use tracing::{debug, warn};

/// Find modules under `root`: immediate subdirectories that contain
/// `descriptor_file`, minus anything named in `exclude`.
///
/// Hidden directories are never modules. Results are sorted by name so the
/// sweep order does not depend on the filesystem.
pub fn discover_modules(
    root: &Path,
    descriptor_file: &str,
    exclude: &[String],
) -> ConfigResult<Vec<Module>> {
    if !root.is_dir() {
        return Err(ConfigError::RootNotFound(root.to_path_buf()));
    }

    let mut modules = Vec::new();

    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }

        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            warn!(path = %entry.path().display(), "Skipping directory with non UTF-8 name");
            continue;
        };

        if name.starts_with('.') {
            continue;
        }
        if exclude.iter().any(|e| e == name) {
            debug!(module = %name, "Excluded from discovery");
            continue;
        }

        let descriptor = entry.path().join(descriptor_file);
        if descriptor.is_file() {
            modules.push(Module::new(name, descriptor));
        }
    }

    modules.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(root = %root.display(), count = modules.len(), "Discovered modules");
    Ok(modules)
}
