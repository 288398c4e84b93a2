//! shipit CLI tool.

use clap::{Args, Parser, Subcommand};
use shipit_core::DeployMode;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "shipit")]
#[command(about = "Clean and deploy every module of a multi-module build", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(flatten)]
    run: RunArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct SourceArgs {
    /// Path to the deploy configuration
    #[arg(long, env = "SHIPIT_CONFIG", default_value = "shipit.kdl")]
    config: PathBuf,

    /// Module root, overriding the config's `root`
    #[arg(long, env = "SHIPIT_ROOT")]
    root: Option<PathBuf>,
}

#[derive(Args)]
struct RunArgs {
    /// Deploy mode: snapshot or release
    #[arg(default_value = "snapshot")]
    mode: DeployMode,

    #[command(flatten)]
    source: SourceArgs,

    /// Build tool binary
    #[arg(long, env = "SHIPIT_BUILD_TOOL", default_value = "mvn")]
    build_tool: String,

    /// Argument passed to the build tool before `-f` (repeatable)
    #[arg(long = "tool-arg", allow_hyphen_values = true)]
    tool_args: Vec<String>,

    /// Print the commands instead of running them
    #[arg(long)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a deploy configuration
    Validate {
        /// Path to the configuration file
        #[arg(default_value = "shipit.kdl")]
        path: PathBuf,
    },
    /// Show the commands a deploy would run
    Plan {
        /// Deploy mode: snapshot or release
        #[arg(default_value = "snapshot")]
        mode: DeployMode,

        #[command(flatten)]
        source: SourceArgs,

        /// Build tool binary shown in the commands
        #[arg(long, env = "SHIPIT_BUILD_TOOL", default_value = "mvn")]
        build_tool: String,

        /// Argument passed to the build tool before `-f` (repeatable)
        #[arg(long = "tool-arg", allow_hyphen_values = true)]
        tool_args: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr; stdout carries deploy confirmations only.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Validate { path }) => commands::validate(&path),
        Some(Commands::Plan {
            mode,
            source,
            build_tool,
            tool_args,
        }) => {
            commands::plan(
                &source.config,
                source.root.as_deref(),
                mode,
                &build_tool,
                &tool_args,
            )?;
            Ok(ExitCode::SUCCESS)
        }
        None => {
            let run = cli.run;
            let options = commands::run::RunOptions {
                config: run.source.config,
                root: run.source.root,
                mode: run.mode,
                build_tool: run.build_tool,
                tool_args: run.tool_args,
                dry_run: run.dry_run,
            };
            commands::run::run_deploy(options).await
        }
    }
}
