//! CLI argument definitions.
//!
//! Running `launch3r` with no arguments is the same as `launch3r run`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// launch3r - create the environment, install, seed, serve, pause
#[derive(Parser, Debug)]
#[command(name = "launch3r")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project directory holding the manifest and scripts
    #[arg(short, long, global = true, env = "LAUNCH3R_PROJECT", default_value = ".")]
    pub project: PathBuf,

    /// Config file path (default: <project>/launch3r.toml)
    #[arg(short, long, global = true, env = "LAUNCH3R_CONFIG")]
    pub config: Option<PathBuf>,

    /// Interpreter used to create the environment
    #[arg(long, global = true, env = "LAUNCH3R_PYTHON")]
    pub python: Option<String>,

    /// Database connection string; its host and port replace `[database]`
    #[arg(long, global = true, env = "MONGODB_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<LaunchCommands>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum LaunchCommands {
    /// Run the full sequence (environment, install, seed, serve, pause)
    #[command(alias = "up")]
    Run(RunArgs),

    /// Check interpreter, collaborator files and database reachability
    Check,

    /// Create and activate the isolated environment only
    Env,
}

impl Default for LaunchCommands {
    fn default() -> Self {
        LaunchCommands::Run(RunArgs::default())
    }
}

#[derive(Debug, Args, Clone, Default)]
pub struct RunArgs {
    /// Skip dependency installation
    #[arg(long)]
    pub skip_install: bool,

    /// Skip the seed script
    #[arg(long)]
    pub skip_seed: bool,

    /// Do not wait for Enter after the main process exits
    #[arg(long)]
    pub no_pause: bool,

    /// Print the steps and commands without running anything
    #[arg(long)]
    pub dry_run: bool,

    /// Write a Toon report of the run to this path
    #[arg(short, long)]
    pub report: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_arguments_means_run() {
        let cli = Cli::try_parse_from(["launch3r"]).unwrap();
        assert!(cli.command.is_none());
        assert!(matches!(
            cli.command.unwrap_or_default(),
            LaunchCommands::Run(RunArgs {
                dry_run: false,
                ..
            })
        ));
    }

    #[test]
    fn test_up_alias_and_flags() {
        let cli = Cli::try_parse_from([
            "launch3r",
            "up",
            "--skip-seed",
            "--no-pause",
            "--report",
            "out.toon",
            "-p",
            "/srv/api",
        ])
        .unwrap();
        assert_eq!(cli.project, PathBuf::from("/srv/api"));
        let Some(LaunchCommands::Run(args)) = cli.command else {
            panic!("expected run");
        };
        assert!(args.skip_seed);
        assert!(args.no_pause);
        assert!(!args.skip_install);
        assert_eq!(args.report, Some(PathBuf::from("out.toon")));
    }

    #[test]
    fn test_database_url_flag() {
        let cli = Cli::try_parse_from([
            "launch3r",
            "check",
            "--database-url",
            "mongodb://db:27018/hr",
        ])
        .unwrap();
        assert_eq!(cli.database_url.as_deref(), Some("mongodb://db:27018/hr"));
        assert!(matches!(cli.command, Some(LaunchCommands::Check)));
    }
}
