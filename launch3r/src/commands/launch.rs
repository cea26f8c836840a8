//! Launch command handlers
//!
//! Each handler returns the exit code the process should terminate with.

use crate::bootstrap::prereq::print_prereq_result;
use crate::bootstrap::{
    DuctRunner, LaunchOptions, Launcher, check_prerequisites, generate_toon_report, print_report,
};
use crate::cli::{Cli, LaunchCommands, RunArgs};
use crate::config::{CONFIG_FILE_NAME, LaunchConfig, PausePolicy};
use anyhow::{Context, Result};
use std::path::Path;
use tokio::task::JoinHandle;

/// Handle launch3r commands
pub async fn handle_launch_command(cli: Cli) -> Result<i32> {
    let project = std::path::absolute(&cli.project)
        .with_context(|| format!("Invalid project directory: {}", cli.project.display()))?;

    // Only the implicit <project>/launch3r.toml may be absent
    let config = match &cli.config {
        Some(path) => LaunchConfig::load_required(path),
        None => LaunchConfig::load(&project.join(CONFIG_FILE_NAME)),
    }
    .context("Failed to load launch3r config")?
    .with_interpreter(cli.python.clone())
    .with_database_url(cli.database_url.as_deref());

    match cli.command.unwrap_or_default() {
        LaunchCommands::Run(args) => run_launch(config, &project, args).await,
        LaunchCommands::Check => check_only(&config, &project).await,
        LaunchCommands::Env => env_only(config, &project).await,
    }
}

/// Keep the launcher alive on Ctrl-C while a step runs; the child gets the
/// signal from the terminal. Abort the handle before pausing.
fn hold_interrupts() -> JoinHandle<()> {
    tokio::spawn(async {
        while tokio::signal::ctrl_c().await.is_ok() {
            eprintln!();
            eprintln!("⏳ Interrupt received, waiting for the current step to exit...");
        }
    })
}

async fn run_launch(config: LaunchConfig, project: &Path, args: RunArgs) -> Result<i32> {
    let options = LaunchOptions {
        skip_install: args.skip_install,
        skip_seed: args.skip_seed,
        pause: args.no_pause.then_some(PausePolicy::Never),
    };
    let launcher = Launcher::new(DuctRunner, config, project).with_options(options);

    if args.dry_run {
        println!("🥾 launch3r plan for {}", project.display());
        println!();
        let plan = launcher.plan().context("Failed to build launch plan")?;
        for (index, step) in plan.iter().enumerate() {
            println!("  {}. {:<22} {}", index + 1, step.kind, step.description);
        }
        return Ok(0);
    }

    println!("🥾 launch3r - bootstrapping {}", project.display());
    println!();

    let holder = hold_interrupts();
    let mut report = launcher.execute_steps().await;
    holder.abort();
    launcher.hold_console(&mut report).await;

    if let Some(output) = args.report {
        let written =
            generate_toon_report(&report, &output).context("Failed to generate Toon report")?;
        println!("📄 Report written to: {}", written.display());
    }

    Ok(report.exit_code)
}

async fn check_only(config: &LaunchConfig, project: &Path) -> Result<i32> {
    println!("📋 Checking prerequisites...");
    let result = check_prerequisites(config, project).await;
    print_prereq_result(&result);

    Ok(i32::from(!result.all_required_met))
}

async fn env_only(config: LaunchConfig, project: &Path) -> Result<i32> {
    let launcher = Launcher::new(DuctRunner, config, project);
    let report = launcher.prepare_environment().await;
    print_report(&report);

    Ok(report.exit_code)
}
