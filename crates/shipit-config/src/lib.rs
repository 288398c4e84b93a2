//! KDL configuration parsing for shipit.
//!
//! This crate handles:
//! - Deploy plan definitions (shipit.kdl)
//! - Module discovery under a root directory
//! - Variable interpolation

pub mod discovery;
pub mod error;
pub mod plan;
pub mod variables;

pub use discovery::discover_modules;
pub use error::{ConfigError, ConfigResult};
pub use plan::{DEFAULT_CONFIG_FILE, PlanConfig, load_plan, parse_config};
pub use variables::{VariableContext, VariableContextBuilder};
