//! Deploy plan definitions.

use derive_more::Display;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Repository id that stands for the build tool's own distribution settings.
pub const DEFAULT_REPOSITORY: &str = "default";

/// Which class of artifact version is being published.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
pub enum DeployMode {
    #[default]
    #[display("snapshot")]
    Snapshot,
    #[display("release")]
    Release,
}

impl DeployMode {
    /// Flag naming the mode and the repository being targeted,
    /// e.g. `-DreleaseRepository=default`.
    pub fn repository_flag(&self, repository_id: &str) -> String {
        format!("-D{}Repository={}", self, repository_id)
    }
}

impl std::str::FromStr for DeployMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "snapshot" => Ok(DeployMode::Snapshot),
            "release" => Ok(DeployMode::Release),
            _ => Err(format!(
                "unknown deploy mode '{}' (expected 'snapshot' or 'release')",
                s
            )),
        }
    }
}

/// A buildable module and the path of its build descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    pub descriptor: PathBuf,
}

impl Module {
    pub fn new(name: impl Into<String>, descriptor: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            descriptor: descriptor.into(),
        }
    }

    /// Module living at `<root>/<name>/<descriptor_file>`.
    pub fn in_root(root: &Path, name: impl Into<String>, descriptor_file: &str) -> Self {
        let name = name.into();
        let descriptor = root.join(&name).join(descriptor_file);
        Self { name, descriptor }
    }
}

/// A named publish destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryTarget {
    pub id: String,
    /// Explicit destination. `None` defers to the build tool's default policy.
    pub url: Option<String>,
}

impl RepositoryTarget {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: None,
        }
    }

    pub fn with_url(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: Some(url.into()),
        }
    }

    /// The `id::layout::url` override, only when a URL is bound.
    pub fn alt_deployment_flag(&self) -> Option<String> {
        self.url
            .as_ref()
            .map(|url| format!("-DaltDeploymentRepository={}::default::{}", self.id, url))
    }
}

/// Module restrictions for one repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryRule {
    /// When set, only these modules may publish here.
    pub allow: Option<Vec<String>>,
    /// These modules may never publish here.
    pub deny: Vec<String>,
}

impl RepositoryRule {
    fn permits(&self, module: &str) -> bool {
        if self.deny.iter().any(|m| m == module) {
            return false;
        }
        match &self.allow {
            Some(allow) => allow.iter().any(|m| m == module),
            None => true,
        }
    }
}

/// Which modules may publish to which repositories.
///
/// Repositories without a rule accept every module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishPolicy {
    rules: HashMap<String, RepositoryRule>,
}

impl PublishPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict `repository` to the given modules.
    pub fn allow<I, S>(&mut self, repository: &str, modules: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rule = self.rules.entry(repository.to_string()).or_default();
        rule.allow
            .get_or_insert_with(Vec::new)
            .extend(modules.into_iter().map(Into::into));
    }

    /// Bar the given modules from `repository`.
    pub fn deny<I, S>(&mut self, repository: &str, modules: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rule = self.rules.entry(repository.to_string()).or_default();
        rule.deny.extend(modules.into_iter().map(Into::into));
    }

    pub fn permits(&self, module: &str, repository: &str) -> bool {
        self.rules
            .get(repository)
            .map(|rule| rule.permits(module))
            .unwrap_or(true)
    }
}

/// An extra deploy of one module/repository pair with additional arguments,
/// issued right after the regular deploy of that pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagingVariant {
    pub module: String,
    pub repository: String,
    pub args: Vec<String>,
}

/// Suppression flags passed to every deploy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployFlags {
    pub skip_tests: Option<String>,
    pub skip_analysis: Option<String>,
    pub skip_quality: Option<String>,
    /// Profile deactivated with `-P!<name>`.
    pub excluded_profile: Option<String>,
    /// Appended after the suppression flags.
    pub extra: Vec<String>,
}

impl Default for DeployFlags {
    fn default() -> Self {
        Self {
            skip_tests: Some("-Dmaven.test.skip=true".to_string()),
            skip_analysis: Some("-Dfindbugs.skip=true".to_string()),
            skip_quality: Some("-Dcheckstyle.skip=true".to_string()),
            excluded_profile: Some("system-tests".to_string()),
            extra: Vec::new(),
        }
    }
}

impl DeployFlags {
    pub fn to_args(&self) -> Vec<String> {
        let mut args: Vec<String> = [&self.skip_tests, &self.skip_analysis, &self.skip_quality]
            .into_iter()
            .flatten()
            .cloned()
            .collect();
        if let Some(profile) = &self.excluded_profile {
            args.push(format!("-P!{}", profile));
        }
        args.extend(self.extra.iter().cloned());
        args
    }
}

/// Everything a deploy sweep needs.
#[derive(Debug, Clone, Default)]
pub struct DeployPlan {
    pub project: String,
    pub modules: Vec<Module>,
    pub repositories: Vec<RepositoryTarget>,
    pub mode: DeployMode,
    pub policy: PublishPolicy,
    pub variants: Vec<PackagingVariant>,
    pub flags: DeployFlags,
}

impl DeployPlan {
    /// Arguments for a deploy to `repository`: suppression flags, the mode
    /// flag, then the URL override when the repository has one.
    pub fn deploy_args(&self, repository: &RepositoryTarget) -> Vec<String> {
        let mut args = self.flags.to_args();
        args.push(self.mode.repository_flag(&repository.id));
        if let Some(alt) = repository.alt_deployment_flag() {
            args.push(alt);
        }
        args
    }

    pub fn variant_for(&self, module: &str, repository: &str) -> Option<&PackagingVariant> {
        self.variants
            .iter()
            .find(|v| v.module == module && v.repository == repository)
    }

    /// Deploys for `module`, in repository order. A matching packaging
    /// variant follows the regular deploy of its repository.
    pub fn schedule(&self, module: &str) -> Vec<PlannedDeploy<'_>> {
        let mut steps = Vec::new();

        for repository in &self.repositories {
            if !self.policy.permits(module, &repository.id) {
                steps.push(PlannedDeploy::Excluded { repository });
                continue;
            }

            let args = self.deploy_args(repository);
            if let Some(variant) = self.variant_for(module, &repository.id) {
                let mut variant_args = args.clone();
                variant_args.extend(variant.args.iter().cloned());
                steps.push(PlannedDeploy::Deploy {
                    repository,
                    args,
                    variant: false,
                });
                steps.push(PlannedDeploy::Deploy {
                    repository,
                    args: variant_args,
                    variant: true,
                });
            } else {
                steps.push(PlannedDeploy::Deploy {
                    repository,
                    args,
                    variant: false,
                });
            }
        }

        steps
    }
}

/// One entry of a module's deploy schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedDeploy<'a> {
    /// The publish policy keeps the module out of this repository.
    Excluded { repository: &'a RepositoryTarget },
    Deploy {
        repository: &'a RepositoryTarget,
        args: Vec<String>,
        /// True for the extra packaging-variant deploy.
        variant: bool,
    },
}
