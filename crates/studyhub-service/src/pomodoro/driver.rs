use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc, watch};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use super::timer::{PomodoroEvent, PomodoroSnapshot, PomodoroTimer};

/// Drives a [`PomodoroTimer`] with a one-second interval.
///
/// Controls (`start`, `pause`, `reset`, `skip`) may be called from any
/// task while [`PomodoroDriver::run`] is ticking.
#[derive(Debug, Clone)]
pub struct PomodoroDriver {
    timer: Arc<Mutex<PomodoroTimer>>,
}

impl PomodoroDriver {
    pub fn new(timer: PomodoroTimer) -> Self {
        Self {
            timer: Arc::new(Mutex::new(timer)),
        }
    }

    pub async fn start(&self) {
        self.timer.lock().await.start();
    }

    pub async fn pause(&self) {
        self.timer.lock().await.pause();
    }

    pub async fn reset(&self) {
        self.timer.lock().await.reset();
    }

    pub async fn skip(&self) -> PomodoroEvent {
        self.timer.lock().await.skip()
    }

    pub async fn snapshot(&self) -> PomodoroSnapshot {
        self.timer.lock().await.snapshot()
    }

    /// Tick once per second, forwarding events, until `cancel` flips to
    /// `true` or the receiver goes away.
    pub async fn run(&self, events: mpsc::Sender<PomodoroEvent>, mut cancel: watch::Receiver<bool>) {
        let mut ticker = time::interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let event = self.timer.lock().await.tick();
                    let Some(event) = event else { continue };
                    if let PomodoroEvent::PhaseCompleted { finished, next, completed_sessions } = event {
                        info!(%finished, %next, completed_sessions, "Pomodoro phase completed");
                    }
                    if events.send(event).await.is_err() {
                        debug!("Pomodoro event receiver dropped");
                        break;
                    }
                }
            }
        }
    }
}
