//! Hold the console open until the operator acknowledges

use crate::bootstrap::step::{StepKind, StepRecord, StepStatus};
use crate::config::PausePolicy;
use crate::error::{ConsoleSnafu, Result};
use snafu::ResultExt;
use std::io::{IsTerminal, Write};
use tokio::io::{AsyncBufReadExt, BufReader};

/// What ended a pause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Release {
    Enter,
    Interrupt,
}

fn should_pause(policy: PausePolicy, interactive: bool) -> bool {
    match policy {
        PausePolicy::Always => true,
        PausePolicy::Never => false,
        PausePolicy::Auto => interactive,
    }
}

async fn wait_for_enter() -> Result<()> {
    print!("Press Enter to continue . . . ");
    std::io::stdout().flush().context(ConsoleSnafu)?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context(ConsoleSnafu)?;
    Ok(())
}

async fn hold_until<E, I>(enter: E, interrupt: I) -> Release
where
    E: Future<Output = Result<()>>,
    I: Future<Output = std::io::Result<()>>,
{
    tokio::select! {
        result = enter => {
            if let Err(e) = result {
                tracing::warn!("{e}");
            }
            Release::Enter
        }
        _ = interrupt => Release::Interrupt,
    }
}

/// Step 7: wait for Enter or Ctrl-C; a closed or unreadable stdin ends the wait
pub async fn pause(policy: PausePolicy) -> StepRecord {
    if !should_pause(policy, std::io::stdin().is_terminal()) {
        tracing::debug!(?policy, "pause skipped");
        let reason = match policy {
            PausePolicy::Never => "disabled",
            _ => "non-interactive",
        };
        return StepRecord::new(
            StepKind::Pause,
            StepStatus::Skipped {
                reason: reason.to_string(),
            },
        );
    }

    println!();
    let record = StepRecord::new(StepKind::Pause, StepStatus::Succeeded);
    match hold_until(wait_for_enter(), tokio::signal::ctrl_c()).await {
        Release::Enter => record,
        Release::Interrupt => {
            println!();
            record.with_detail("interrupted")
        }
    }
}
