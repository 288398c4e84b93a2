//! Deploy plan configuration parsing.

use crate::discovery::discover_modules;
use crate::{ConfigError, ConfigResult, VariableContext};
use kdl::{KdlDocument, KdlNode};
use shipit_core::plan::{
    DeployFlags, DeployMode, DeployPlan, Module, PackagingVariant, PublishPolicy,
    RepositoryTarget,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "shipit.kdl";

/// Default build descriptor file name.
pub const DEFAULT_DESCRIPTOR: &str = "pom.xml";

/// A parsed `shipit.kdl`, before module paths are resolved.
#[derive(Debug, Clone)]
pub struct PlanConfig {
    pub project: String,
    /// Module root, relative to the config file unless absolute.
    pub root: Option<PathBuf>,
    pub descriptor: String,
    /// Explicit module names in sweep order. Empty means discover.
    pub modules: Vec<String>,
    /// Directory names dropped from discovery.
    pub exclude: Vec<String>,
    pub repositories: Vec<RepositoryTarget>,
    pub policy: PublishPolicy,
    pub variants: Vec<PackagingVariant>,
    pub flags: DeployFlags,
}

impl PlanConfig {
    /// Directory holding the modules. An override wins over the config's
    /// `root`, which is taken relative to `base_dir`.
    pub fn module_root(&self, base_dir: &Path, root_override: Option<&Path>) -> PathBuf {
        match (root_override, &self.root) {
            (Some(dir), _) => dir.to_path_buf(),
            (None, Some(root)) if root.is_absolute() => root.clone(),
            (None, Some(root)) => base_dir.join(root),
            (None, None) => base_dir.to_path_buf(),
        }
    }

    /// Resolve module descriptors and produce the plan for `mode`.
    pub fn into_plan(
        self,
        base_dir: &Path,
        root_override: Option<&Path>,
        mode: DeployMode,
    ) -> ConfigResult<DeployPlan> {
        let root = self.module_root(base_dir, root_override);

        let modules = if self.modules.is_empty() {
            discover_modules(&root, &self.descriptor, &self.exclude)?
        } else {
            if !self.exclude.is_empty() {
                warn!("Ignoring discover excludes because modules are listed explicitly");
            }
            self.modules
                .iter()
                .map(|name| Module::in_root(&root, name.as_str(), &self.descriptor))
                .collect()
        };

        for variant in &self.variants {
            if !modules.iter().any(|m| m.name == variant.module) {
                warn!(
                    module = %variant.module,
                    repository = %variant.repository,
                    "Packaging variant names a module that is not part of this plan"
                );
            }
        }

        debug!(
            project = %self.project,
            root = %root.display(),
            modules = modules.len(),
            repositories = self.repositories.len(),
            "Resolved deploy plan"
        );

        Ok(DeployPlan {
            project: self.project,
            modules,
            repositories: self.repositories,
            mode,
            policy: self.policy,
            variants: self.variants,
            flags: self.flags,
        })
    }
}

/// Read `path` and resolve it into a plan for `mode`.
pub fn load_plan(
    path: &Path,
    mode: DeployMode,
    root_override: Option<&Path>,
) -> ConfigResult<DeployPlan> {
    let content = std::fs::read_to_string(path)?;
    let vars = VariableContext::from_env(mode);
    let config = parse_config(&content, &vars)?;

    let base_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    config.into_plan(&base_dir, root_override, mode)
}

/// Parse a deploy configuration from KDL text.
pub fn parse_config(kdl: &str, vars: &VariableContext) -> ConfigResult<PlanConfig> {
    let doc: KdlDocument = kdl.parse()?;

    // `${project}` must be available to every other node.
    let mut vars = vars.clone();
    let project = doc
        .nodes()
        .iter()
        .find(|n| n.name().value() == "project")
        .map(|n| {
            get_first_string_arg(n, &vars)
                .ok_or_else(|| ConfigError::MissingField("project name".to_string()))
        })
        .transpose()?
        .unwrap_or_default();
    vars.project = project.clone();

    let mut root = None;
    let mut descriptor = DEFAULT_DESCRIPTOR.to_string();
    let mut modules: Vec<String> = Vec::new();
    let mut exclude = Vec::new();
    let mut repositories: Vec<RepositoryTarget> = Vec::new();
    let mut policy = PublishPolicy::new();
    let mut variants: Vec<PackagingVariant> = Vec::new();
    let mut flags = None;

    for node in doc.nodes() {
        match node.name().value() {
            "root" => {
                let dir = get_first_string_arg(node, &vars)
                    .ok_or_else(|| ConfigError::MissingField("root path".to_string()))?;
                root = Some(PathBuf::from(dir));
            }
            "descriptor" => {
                descriptor = get_first_string_arg(node, &vars)
                    .filter(|d| !d.is_empty())
                    .ok_or_else(|| ConfigError::MissingField("descriptor file name".to_string()))?;
            }
            "module" => {
                let name = get_first_string_arg(node, &vars)
                    .ok_or_else(|| ConfigError::MissingField("module name".to_string()))?;
                if modules.contains(&name) {
                    return Err(ConfigError::Duplicate(format!("module '{}'", name)));
                }
                modules.push(name);
            }
            "discover" => {
                if let Some(children) = node.children() {
                    for child in children.nodes() {
                        if child.name().value() == "exclude" {
                            exclude.extend(get_all_string_args(child, &vars));
                        }
                    }
                }
            }
            "repository" => {
                let repository = parse_repository(node, &vars, &mut policy)?;
                if repositories.iter().any(|r| r.id == repository.id) {
                    return Err(ConfigError::Duplicate(format!(
                        "repository '{}'",
                        repository.id
                    )));
                }
                repositories.push(repository);
            }
            "variant" => {
                let variant = parse_variant(node, &vars)?;
                if variants
                    .iter()
                    .any(|v| v.module == variant.module && v.repository == variant.repository)
                {
                    return Err(ConfigError::Duplicate(format!(
                        "variant for module '{}' in repository '{}'",
                        variant.module, variant.repository
                    )));
                }
                variants.push(variant);
            }
            "flags" => {
                if flags.is_some() {
                    return Err(ConfigError::Duplicate("flags".to_string()));
                }
                flags = Some(parse_flags(node, &vars));
            }
            _ => {} // Ignore unknown nodes
        }
    }

    if repositories.is_empty() {
        return Err(ConfigError::MissingField("repository".to_string()));
    }

    let repository_ids: HashSet<&str> = repositories.iter().map(|r| r.id.as_str()).collect();
    for variant in &variants {
        if !repository_ids.contains(variant.repository.as_str()) {
            return Err(ConfigError::InvalidReference(format!(
                "variant for module '{}' targets unknown repository '{}'",
                variant.module, variant.repository
            )));
        }
    }

    Ok(PlanConfig {
        project,
        root,
        descriptor,
        modules,
        exclude,
        repositories,
        policy,
        variants,
        flags: flags.unwrap_or_default(),
    })
}

fn parse_repository(
    node: &KdlNode,
    vars: &VariableContext,
    policy: &mut PublishPolicy,
) -> ConfigResult<RepositoryTarget> {
    let id = get_first_string_arg(node, vars)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ConfigError::MissingField("repository id".to_string()))?;

    let url = get_string_prop(node, "url", vars);
    if let Some(url) = &url {
        if url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: format!("url of repository '{}'", id),
                message: "must not be empty".to_string(),
            });
        }
    }

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "allow" => policy.allow(&id, get_all_string_args(child, vars)),
                "deny" => policy.deny(&id, get_all_string_args(child, vars)),
                _ => {}
            }
        }
    }

    Ok(RepositoryTarget { id, url })
}

fn parse_variant(node: &KdlNode, vars: &VariableContext) -> ConfigResult<PackagingVariant> {
    let module = get_string_prop(node, "module", vars)
        .ok_or_else(|| ConfigError::MissingField("variant module".to_string()))?;
    let repository = get_string_prop(node, "repository", vars)
        .ok_or_else(|| ConfigError::MissingField("variant repository".to_string()))?;

    let mut args = get_all_string_args(node, vars);
    if let Some(children) = node.children() {
        for child in children.nodes() {
            if child.name().value() == "arg" {
                args.extend(get_all_string_args(child, vars));
            }
        }
    }

    if args.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: format!("variant for module '{}'", module),
            message: "needs at least one argument".to_string(),
        });
    }

    Ok(PackagingVariant {
        module,
        repository,
        args,
    })
}

/// Flags left out of the block keep their defaults; a flag node without a
/// value (or with an empty string) disables that flag.
fn parse_flags(node: &KdlNode, vars: &VariableContext) -> DeployFlags {
    let mut flags = DeployFlags::default();

    if let Some(children) = node.children() {
        for child in children.nodes() {
            let value = get_first_string_arg(child, vars).filter(|v| !v.is_empty());
            match child.name().value() {
                "skip-tests" => flags.skip_tests = value,
                "skip-analysis" => flags.skip_analysis = value,
                "skip-quality" => flags.skip_quality = value,
                "exclude-profile" => flags.excluded_profile = value,
                "arg" => flags.extra.extend(get_all_string_args(child, vars)),
                _ => {}
            }
        }
    }

    flags
}

// Helper functions for extracting values from KDL nodes

fn get_first_string_arg(node: &KdlNode, vars: &VariableContext) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(|s| vars.interpolate(s))
}

fn get_all_string_args(node: &KdlNode, vars: &VariableContext) -> Vec<String> {
    node.entries()
        .iter()
        .filter(|e| e.name().is_none())
        .filter_map(|e| e.value().as_string())
        .map(|s| vars.interpolate(s))
        .collect()
}

fn get_string_prop(node: &KdlNode, name: &str, vars: &VariableContext) -> Option<String> {
    node.get(name)
        .and_then(|v| v.as_string())
        .map(|s| vars.interpolate(s))
}
