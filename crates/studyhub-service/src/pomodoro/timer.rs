use std::fmt;

use serde::{Deserialize, Serialize};

use studyhub_core::config::PomodoroConfig;

/// Timer phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::ShortBreak => "short_break",
            Self::LongBreak => "long_break",
        }
    }

    pub fn is_break(&self) -> bool {
        !matches!(self, Self::Work)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Point-in-time view of a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroSnapshot {
    pub phase: Phase,
    pub remaining_seconds: u32,
    pub running: bool,
    pub completed_sessions: u32,
}

impl PomodoroSnapshot {
    /// Remaining time as `MM:SS`.
    pub fn clock(&self) -> String {
        format!("{:02}:{:02}", self.remaining_seconds / 60, self.remaining_seconds % 60)
    }
}

/// Something a tick produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PomodoroEvent {
    /// One second elapsed.
    Tick(PomodoroSnapshot),
    /// A phase ran out and the next one was loaded.
    PhaseCompleted {
        finished: Phase,
        next: Phase,
        completed_sessions: u32,
    },
}

/// Work/break countdown.
///
/// Each completed work phase increments the session count; every
/// `long_break_interval` sessions the following break is long. When a
/// phase runs out the next one is loaded and the timer pauses, unless
/// auto-continue is on.
#[derive(Debug, Clone)]
pub struct PomodoroTimer {
    config: PomodoroConfig,
    phase: Phase,
    remaining_seconds: u32,
    running: bool,
    completed_sessions: u32,
    auto_continue: bool,
}

impl PomodoroTimer {
    /// A paused timer at the start of a work phase.
    pub fn new(config: PomodoroConfig) -> Self {
        Self {
            config,
            phase: Phase::Work,
            remaining_seconds: phase_seconds(&config, Phase::Work),
            running: false,
            completed_sessions: 0,
            auto_continue: false,
        }
    }

    /// Keep running across phase boundaries.
    pub fn with_auto_continue(mut self, auto_continue: bool) -> Self {
        self.auto_continue = auto_continue;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn completed_sessions(&self) -> u32 {
        self.completed_sessions
    }

    pub fn snapshot(&self) -> PomodoroSnapshot {
        PomodoroSnapshot {
            phase: self.phase,
            remaining_seconds: self.remaining_seconds,
            running: self.running,
            completed_sessions: self.completed_sessions,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Back to a paused, full-length work phase with no sessions counted.
    pub fn reset(&mut self) {
        self.phase = Phase::Work;
        self.remaining_seconds = phase_seconds(&self.config, Phase::Work);
        self.running = false;
        self.completed_sessions = 0;
    }

    /// Abandon the current phase and load the next one. A skipped work
    /// phase does not count as a session.
    pub fn skip(&mut self) -> PomodoroEvent {
        self.advance(false)
    }

    /// Advance one second. Returns `None` while paused.
    pub fn tick(&mut self) -> Option<PomodoroEvent> {
        if !self.running {
            return None;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            let event = self.advance(true);
            self.running = self.auto_continue;
            Some(event)
        } else {
            Some(PomodoroEvent::Tick(self.snapshot()))
        }
    }

    fn advance(&mut self, completed: bool) -> PomodoroEvent {
        let finished = self.phase;
        let next = match finished {
            Phase::Work => {
                if completed {
                    self.completed_sessions += 1;
                }
                let interval = self.config.long_break_interval.max(1);
                if completed && self.completed_sessions % interval == 0 {
                    Phase::LongBreak
                } else {
                    Phase::ShortBreak
                }
            }
            Phase::ShortBreak | Phase::LongBreak => Phase::Work,
        };
        self.phase = next;
        self.remaining_seconds = phase_seconds(&self.config, next);
        PomodoroEvent::PhaseCompleted {
            finished,
            next,
            completed_sessions: self.completed_sessions,
        }
    }
}

fn phase_seconds(config: &PomodoroConfig, phase: Phase) -> u32 {
    let minutes = match phase {
        Phase::Work => config.work_minutes,
        Phase::ShortBreak => config.short_break_minutes,
        Phase::LongBreak => config.long_break_minutes,
    };
    minutes.saturating_mul(60).max(1)
}
