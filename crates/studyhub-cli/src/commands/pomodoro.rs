//! Terminal Pomodoro timer.

use std::io::Write;

use clap::Args;
use tokio::sync::{mpsc, watch};

use crate::output;
use studyhub_core::error::AppError;
use studyhub_service::{PomodoroDriver, PomodoroEvent, PomodoroTimer};

/// Arguments for the pomodoro command
#[derive(Debug, Args)]
pub struct PomodoroArgs {
    /// Work phase length in minutes
    #[arg(long)]
    pub work: Option<u32>,

    /// Short break length in minutes
    #[arg(long)]
    pub short_break: Option<u32>,

    /// Long break length in minutes
    #[arg(long)]
    pub long_break: Option<u32>,

    /// Keep running across phase boundaries
    #[arg(long)]
    pub auto: bool,

    /// Stop after this many completed work sessions
    #[arg(long)]
    pub sessions: Option<u32>,
}

/// Execute the pomodoro command
pub async fn execute(args: &PomodoroArgs, config_path: &str) -> Result<(), AppError> {
    let mut config = super::load_config(config_path)?.pomodoro;
    if let Some(work) = args.work {
        config.work_minutes = work;
    }
    if let Some(short) = args.short_break {
        config.short_break_minutes = short;
    }
    if let Some(long) = args.long_break {
        config.long_break_minutes = long;
    }

    let driver = PomodoroDriver::new(PomodoroTimer::new(config).with_auto_continue(args.auto));
    driver.start().await;
    let first = driver.snapshot().await;
    println!("{} started: {}  (Ctrl+C to stop)", first.phase, first.clock());

    let (event_tx, mut event_rx) = mpsc::channel(16);
    let (cancel_tx, cancel_rx) = watch::channel(false);
    let runner = {
        let driver = driver.clone();
        tokio::spawn(async move { driver.run(event_tx, cancel_rx).await })
    };

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
            event = event_rx.recv() => {
                let Some(event) = event else { break };
                match event {
                    PomodoroEvent::Tick(snapshot) => {
                        print!("\r  {:<12} {}", snapshot.phase.as_str(), snapshot.clock());
                        let _ = std::io::stdout().flush();
                    }
                    PomodoroEvent::PhaseCompleted { finished, next, completed_sessions } => {
                        println!();
                        let hint = if next.is_break() { "take a break" } else { "back to work" };
                        output::print_success(&format!(
                            "{finished} finished ({completed_sessions} sessions), next: {next}, {hint}"
                        ));
                        if args.sessions.is_some_and(|target| completed_sessions >= target) {
                            break;
                        }
                        if !args.auto {
                            // Paused at the boundary; continue on Enter.
                            wait_for_enter().await?;
                            driver.start().await;
                        }
                    }
                }
            }
        }
    }

    let _ = cancel_tx.send(true);
    let _ = runner.await;

    let last = driver.snapshot().await;
    output::print_kv("Completed sessions", &last.completed_sessions.to_string());
    Ok(())
}

async fn wait_for_enter() -> Result<(), AppError> {
    println!("Press Enter to start the next phase");
    tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line).map(|_| ())
    })
    .await
    .map_err(|e| AppError::internal(format!("Input task failed: {e}")))?
    .map_err(|e| AppError::internal(format!("Input error: {e}")))
}
